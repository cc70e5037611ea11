//! Return-to-centre animation for the stick knob
//!
//! Purely visual: the reported input vector drops to zero the moment the
//! drag ends, while the knob eases back with a damped spring.

use crate::geometry::Vec2;

/// Offsets and velocities below this are treated as settled (in size units)
const SETTLE_EPSILON: f32 = 0.01;

/// Longest integration step; larger frame gaps are split into sub-steps
const MAX_STEP_SECS: f32 = 1.0 / 240.0;

/// Frame gaps longer than this are truncated
const MAX_FRAME_SECS: f32 = 1.0;

/// Damped spring pulling the knob offset back to `(0, 0)`
#[derive(Debug, Clone)]
pub struct ReturnSpring {
    offset: Vec2,
    velocity: Vec2,
    stiffness: f32,
    damping: f32,
    active: bool,
}

impl ReturnSpring {
    pub fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            offset: Vec2::ZERO,
            velocity: Vec2::ZERO,
            stiffness,
            damping,
            active: false,
        }
    }

    /// Start returning from `offset` at rest
    pub fn release_from(&mut self, offset: Vec2) {
        self.offset = offset;
        self.velocity = Vec2::ZERO;
        self.active = !offset.is_zero();
    }

    /// Abort the animation (a new drag grabbed the knob)
    pub fn cancel(&mut self) {
        self.offset = Vec2::ZERO;
        self.velocity = Vec2::ZERO;
        self.active = false;
    }

    pub fn set_parameters(&mut self, stiffness: f32, damping: f32) {
        self.stiffness = stiffness;
        self.damping = damping;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Scale the in-flight offset (used when the travel radius changes)
    pub fn rescale(&mut self, factor: f32) {
        self.offset = self.offset * factor;
        self.velocity = self.velocity * factor;
    }

    /// Advance by `dt` seconds and return the new offset
    pub fn step(&mut self, dt: f32) -> Vec2 {
        if !self.active || dt.is_nan() || dt <= 0.0 {
            return self.offset;
        }

        let mut remaining = dt.min(MAX_FRAME_SECS);
        while remaining > 0.0 {
            let h = remaining.min(MAX_STEP_SECS);
            remaining -= h;

            // Backward Euler, stable for any stiffness >= 0 and damping >= 0:
            // v' = v + h * (-k * x' - c * v'), x' = x + h * v'
            let denom = 1.0 + h * self.damping + h * h * self.stiffness;
            self.velocity = (self.velocity - self.offset * (h * self.stiffness)) * (1.0 / denom);
            self.offset = self.offset + self.velocity * h;

            if self.offset.length() < SETTLE_EPSILON && self.velocity.length() < SETTLE_EPSILON {
                self.cancel();
                break;
            }
        }

        self.offset
    }
}
