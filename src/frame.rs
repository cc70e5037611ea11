//! Display-refresh driven frame loop
//!
//! Stands in for the host's "run this every frame" primitive: a tokio
//! interval at the configured refresh rate reads the latest input vector,
//! steps the character, and pushes a snapshot to the renderer.
//!
//! Missed ticks are skipped, never replayed. The next tick just uses
//! whatever input is current, so a stalled frame lowers the update rate
//! without compounding movement.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::character::Character;
use crate::config::{AppConfig, ConfigWatcher, FrameConfig};
use crate::error::ConfigError;
use crate::geometry::Vec2;
use crate::joystick::JoystickInput;
use crate::render::{FrameSnapshot, JoystickStyle, Renderer};
use crate::shared::InputSlot;

/// Joystick shared between the gesture side and the frame loop
pub type JoystickHandle = Arc<Mutex<JoystickInput>>;

pub struct FrameLoop<R: Renderer> {
    character: Character,
    input: InputSlot,
    joystick: Option<JoystickHandle>,
    renderer: R,
    refresh_hz: u32,
    frame: u64,
}

impl<R: Renderer> FrameLoop<R> {
    pub fn new(character: Character, input: InputSlot, renderer: R, refresh_hz: u32) -> Result<Self, ConfigError> {
        FrameConfig { refresh_hz }.validate()?;

        Ok(Self {
            character,
            input,
            joystick: None,
            renderer,
            refresh_hz,
            frame: 0,
        })
    }

    /// Animate this joystick's knob and include it in snapshots
    pub fn with_joystick(mut self, joystick: JoystickHandle) -> Self {
        self.joystick = Some(joystick);
        self
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.refresh_hz as f64)
    }

    pub(crate) fn new_interval(&self) -> Interval {
        let mut ticker = interval(self.period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker
    }

    /// Run a single frame; `dt` (seconds) only drives the knob animation
    pub fn tick_once(&mut self, dt: f32) -> FrameSnapshot {
        let input = self.input.load();

        let (stick_offset, active, style) = match &self.joystick {
            Some(joystick) => {
                let mut joystick = joystick.lock();
                let offset = joystick.advance(dt);
                (offset, joystick.is_active(), Some(JoystickStyle::from(joystick.config())))
            }
            None => (Vec2::ZERO, false, None),
        };

        let position = self.character.step(input);
        self.frame += 1;

        let snapshot = FrameSnapshot {
            frame: self.frame,
            input,
            position,
            half_extent: self.character.half_extent(),
            stick_offset,
            active,
            style,
        };
        self.renderer.render(&snapshot);
        snapshot
    }

    /// Tick at the refresh rate until `shutdown` resolves
    ///
    /// Config reloads from `reloads` are applied between frames. Returns the
    /// number of frames run.
    pub async fn run<F>(&mut self, shutdown: F, mut reloads: Option<&mut ConfigWatcher>) -> u64
    where
        F: Future<Output = ()>,
    {
        let mut ticker = self.new_interval();
        let mut last_tick = Instant::now();
        let mut ticks = 0u64;

        info!("Frame loop started at {} Hz", self.refresh_hz);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = Instant::now();
                    let dt = now.duration_since(last_tick).as_secs_f32();
                    last_tick = now;

                    self.tick_once(dt);
                    ticks += 1;
                }

                Some(config) = next_reload(&mut reloads) => {
                    if self.apply_config(config) {
                        ticker = self.new_interval();
                    }
                }

                _ = &mut shutdown => {
                    debug!("Frame loop shutdown requested");
                    break;
                }
            }
        }

        info!("Frame loop stopped after {} frames", ticks);
        ticks
    }

    /// Apply a reloaded configuration; returns true when the refresh rate changed
    ///
    /// Each section is applied independently: a rejected section keeps its
    /// previous settings.
    pub fn apply_config(&mut self, config: AppConfig) -> bool {
        if let Some(joystick) = &self.joystick {
            if let Err(e) = joystick.lock().reconfigure(config.joystick) {
                warn!("⚠️  Joystick config rejected (keeping old): {}", e);
            }
        }

        if let Err(e) = self.character.reconfigure(config.character) {
            warn!("⚠️  Character config rejected (keeping old): {}", e);
        }

        if config.frame.refresh_hz == self.refresh_hz {
            return false;
        }
        match config.frame.validate() {
            Ok(()) => {
                info!("Refresh rate {} Hz -> {} Hz", self.refresh_hz, config.frame.refresh_hz);
                self.refresh_hz = config.frame.refresh_hz;
                true
            }
            Err(e) => {
                warn!("⚠️  Frame config rejected (keeping old): {}", e);
                false
            }
        }
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn frames(&self) -> u64 {
        self.frame
    }

    pub fn refresh_hz(&self) -> u32 {
        self.refresh_hz
    }
}

async fn next_reload(reloads: &mut Option<&mut ConfigWatcher>) -> Option<AppConfig> {
    match reloads {
        Some(watcher) => watcher.next_config().await,
        None => std::future::pending().await,
    }
}
