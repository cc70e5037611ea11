//! 2D value types shared by the joystick and the integrator

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

use crate::error::{ensure_finite, ConfigError};

/// Plain 2D vector (drag offsets, input vectors, positions)
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Exact zero test (no epsilon), used for the idle short-circuit
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, scalar: f32) -> Vec2 {
        Vec2::new(self.x * scalar, self.y * scalar)
    }
}

/// Axis-aligned movement rectangle `[min_x, max_x] x [min_y, max_y]`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Bounds {
    pub const fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self { min_x, max_x, min_y, max_y }
    }

    /// Check that the rectangle is finite and not inverted
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite("bounds.min_x", self.min_x)?;
        ensure_finite("bounds.max_x", self.max_x)?;
        ensure_finite("bounds.min_y", self.min_y)?;
        ensure_finite("bounds.max_y", self.max_y)?;

        if self.min_x > self.max_x {
            return Err(ConfigError::InvertedBounds { axis: 'x', min: self.min_x, max: self.max_x });
        }
        if self.min_y > self.max_y {
            return Err(ConfigError::InvertedBounds { axis: 'y', min: self.min_y, max: self.max_y });
        }
        Ok(())
    }

    /// Shrink every edge by `inset`, failing if the result would be inverted
    ///
    /// The check runs on the shrunk rectangle itself: `min + inset` can round
    /// past `max - inset` even when `2 * inset` equals the span.
    pub fn inset(&self, inset: f32) -> Result<Bounds, ConfigError> {
        let inner = Bounds::new(
            self.min_x + inset,
            self.max_x - inset,
            self.min_y + inset,
            self.max_y - inset,
        );
        if !ordered(inner.min_x, inner.max_x) {
            return Err(ConfigError::EntityLargerThanBounds {
                axis: 'x',
                extent: inset * 2.0,
                span: self.max_x - self.min_x,
            });
        }
        if !ordered(inner.min_y, inner.max_y) {
            return Err(ConfigError::EntityLargerThanBounds {
                axis: 'y',
                extent: inset * 2.0,
                span: self.max_y - self.min_y,
            });
        }
        Ok(inner)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Clamp each axis of `point` independently into the rectangle
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min_x, self.max_x),
            point.y.clamp(self.min_y, self.max_y),
        )
    }

    pub fn contains(&self, point: Vec2) -> bool {
        (self.min_x..=self.max_x).contains(&point.x) && (self.min_y..=self.max_y).contains(&point.y)
    }
}

/// `min <= max`, false when either side is NaN
fn ordered(min: f32, max: f32) -> bool {
    min <= max
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::new(0.0, 1000.0, 0.0, 1000.0)
    }
}
