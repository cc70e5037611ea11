//! Render boundary
//!
//! touchstick never draws. Once per frame the frame loop pushes a
//! [`FrameSnapshot`] to a [`Renderer`], which translates it into whatever
//! visual transform the host uses.

use tracing::{debug, info};

use crate::config::JoystickConfig;
use crate::geometry::Vec2;

/// Joystick colors, passed through from the configuration untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoystickStyle {
    pub base_color: String,
    pub stick_color: String,
}

impl From<&JoystickConfig> for JoystickStyle {
    fn from(config: &JoystickConfig) -> Self {
        Self {
            base_color: config.base_color.clone(),
            stick_color: config.stick_color.clone(),
        }
    }
}

/// Live state for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    /// Frame counter, starting at 1
    pub frame: u64,
    /// Input vector used for this tick
    pub input: Vec2,
    /// Character position after this tick
    pub position: Vec2,
    /// Half the character's visual size
    pub half_extent: f32,
    /// Knob offset from the joystick base centre
    pub stick_offset: Vec2,
    /// Whether a drag is in progress (hosts typically raise the opacity)
    pub active: bool,
    /// Joystick colors, `None` when no joystick is attached
    pub style: Option<JoystickStyle>,
}

/// External renderer polled by the frame loop
pub trait Renderer: Send {
    fn render(&mut self, frame: &FrameSnapshot);
}

/// Renderer that logs position changes
///
/// Useful for running without a display: idle frames are counted but not
/// logged.
#[derive(Debug, Default)]
pub struct ConsoleRenderer {
    last_position: Option<Vec2>,
    last_style: Option<JoystickStyle>,
    rendered: u64,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames received
    pub fn rendered(&self) -> u64 {
        self.rendered
    }
}

impl Renderer for ConsoleRenderer {
    fn render(&mut self, frame: &FrameSnapshot) {
        self.rendered += 1;

        if frame.style.is_some() && frame.style != self.last_style {
            if let Some(style) = &frame.style {
                info!("🕹️ Joystick colors: base {} stick {}", style.base_color, style.stick_color);
            }
            self.last_style = frame.style.clone();
        }

        if self.last_position == Some(frame.position) {
            return;
        }

        if self.last_position.is_none() {
            info!("🎮 Character at ({:.1}, {:.1})", frame.position.x, frame.position.y);
        } else {
            info!(
                "🏃 [frame {}] ({:.1}, {:.1}) input=({:.2}, {:.2})",
                frame.frame, frame.position.x, frame.position.y, frame.input.x, frame.input.y
            );
        }

        debug!(
            frame = frame.frame,
            stick_x = frame.stick_offset.x,
            stick_y = frame.stick_offset.y,
            active = frame.active,
            "ConsoleRenderer frame"
        );

        self.last_position = Some(frame.position);
    }
}

/// Renderer that keeps every snapshot, for tests and headless runs
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<FrameSnapshot>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &FrameSnapshot) {
        self.frames.push(frame.clone());
    }
}
