//! Virtual joystick input
//!
//! Tracks a single drag gesture delivered by the host's gesture recognizer
//! and turns it into a normalized direction vector:
//!
//! 1. `on_drag_start` grabs the knob (`Idle -> Dragging`).
//! 2. `on_drag_update(dx, dy)` projects the drag onto the boundary circle and
//!    reports `offset / max_distance` to the listener.
//! 3. `on_drag_end` reports `(0, 0)` immediately and lets the knob spring
//!    back to the centre (`Dragging -> Idle`).
//!
//! Hit-testing and touch tracking stay with the host.

pub mod normalize;
pub mod spring;

use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::config::JoystickConfig;
use crate::error::ConfigError;
use crate::geometry::Vec2;

use normalize::{normalize_offset, project_to_circle};
use spring::ReturnSpring;

/// Callback receiving the reported vector, each axis in [-1, 1]
///
/// Invoked synchronously from the drag handlers. It must not block: copy
/// the values somewhere (see [`crate::shared::InputSlot::listener`]) and return.
pub type MoveListener = Arc<dyn Fn(f32, f32) + Send + Sync>;

/// Gesture state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging,
}

/// Joystick widget logic: drag tracking, projection, listener dispatch
pub struct JoystickInput {
    config: JoystickConfig,
    max_distance: f32,
    state: DragState,
    /// Raw displacement of the active gesture
    drag: Vec2,
    /// Knob offset while dragging
    offset: Vec2,
    /// Last reported vector
    output: Vec2,
    spring: ReturnSpring,
    listener: Option<MoveListener>,
}

impl JoystickInput {
    /// Build a joystick, rejecting degenerate diameters up front
    pub fn new(config: JoystickConfig, listener: Option<MoveListener>) -> Result<Self, ConfigError> {
        config.validate()?;

        let max_distance = config.max_distance();
        let spring = ReturnSpring::new(config.return_stiffness, config.return_damping);

        debug!(
            "Joystick created: base={} stick={} max_distance={}",
            config.base_diameter, config.stick_diameter, max_distance
        );

        Ok(Self {
            config,
            max_distance,
            state: DragState::Idle,
            drag: Vec2::ZERO,
            offset: Vec2::ZERO,
            output: Vec2::ZERO,
            spring,
            listener,
        })
    }

    /// Gesture began on the joystick
    pub fn on_drag_start(&mut self) {
        if self.state == DragState::Dragging {
            debug!("Drag restarted while already dragging");
        }

        self.spring.cancel();
        self.state = DragState::Dragging;
        self.drag = Vec2::ZERO;
        self.offset = Vec2::ZERO;
        trace!("Joystick: Idle -> Dragging");
    }

    /// Gesture moved to `(dx, dy)` from its start point
    pub fn on_drag_update(&mut self, dx: f32, dy: f32) {
        if self.state != DragState::Dragging {
            trace!("Ignoring drag update ({}, {}) while idle", dx, dy);
            return;
        }

        self.drag = Vec2::new(dx, dy);
        self.offset = project_to_circle(dx, dy, self.max_distance);
        let reported = normalize_offset(self.offset, self.max_distance);

        trace!(
            "Drag ({:.1}, {:.1}) -> offset ({:.1}, {:.1}) -> ({:.3}, {:.3})",
            dx, dy, self.offset.x, self.offset.y, reported.x, reported.y
        );

        self.emit(reported);
    }

    /// Gesture released
    ///
    /// Reports `(0, 0)` right away, even when no drag was active, and starts
    /// the knob's return animation.
    pub fn on_drag_end(&mut self) {
        if self.state == DragState::Dragging {
            self.spring.release_from(self.offset);
            trace!("Joystick: Dragging -> Idle");
        }

        self.state = DragState::Idle;
        self.drag = Vec2::ZERO;
        self.offset = Vec2::ZERO;
        self.emit(Vec2::ZERO);
    }

    /// Advance the return animation by `dt` seconds, returning the knob offset
    pub fn advance(&mut self, dt: f32) -> Vec2 {
        if self.state == DragState::Idle {
            self.spring.step(dt);
        }
        self.stick_offset()
    }

    /// Swap in a new configuration and recompute the travel radius
    ///
    /// An active drag is re-projected with the new radius and reported again;
    /// an in-flight return animation is scaled to the new radius.
    pub fn reconfigure(&mut self, config: JoystickConfig) -> Result<(), ConfigError> {
        config.validate()?;

        let old_max = self.max_distance;
        self.max_distance = config.max_distance();
        self.spring.set_parameters(config.return_stiffness, config.return_damping);
        self.config = config;

        debug!("Joystick reconfigured: max_distance {} -> {}", old_max, self.max_distance);

        match self.state {
            DragState::Dragging => {
                let Vec2 { x, y } = self.drag;
                self.on_drag_update(x, y);
            }
            DragState::Idle => self.spring.rescale(self.max_distance / old_max),
        }

        Ok(())
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == DragState::Dragging
    }

    /// Radius of allowed stick travel, `(base - stick) / 2`
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Raw displacement of the active gesture, `(0, 0)` when idle
    pub fn drag_vector(&self) -> Vec2 {
        self.drag
    }

    /// Knob offset from the base centre, for the renderer
    pub fn stick_offset(&self) -> Vec2 {
        match self.state {
            DragState::Dragging => self.offset,
            DragState::Idle => self.spring.offset(),
        }
    }

    /// Last vector reported to the listener
    pub fn output(&self) -> Vec2 {
        self.output
    }

    pub fn config(&self) -> &JoystickConfig {
        &self.config
    }

    fn emit(&mut self, reported: Vec2) {
        self.output = reported;
        if let Some(listener) = &self.listener {
            listener(reported.x, reported.y);
        }
    }
}

impl fmt::Debug for JoystickInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoystickInput")
            .field("max_distance", &self.max_distance)
            .field("state", &self.state)
            .field("offset", &self.stick_offset())
            .field("output", &self.output)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
