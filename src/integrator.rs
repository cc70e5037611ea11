//! Per-refresh position integrator
//!
//! Advances a position by `input * speed` once per display refresh and keeps
//! the moving entity's full extent (not just its centre) inside the bounds.
//!
//! There is no time step: the contract is one call per refresh. Missed
//! refreshes are not replayed, so they only lower the effective update rate.
//!
//! Diagonal input is not normalized by default. `(1, 1)` moves by `speed` on
//! both axes, i.e. `speed * sqrt(2)` overall. Enable
//! [`Integrator::with_diagonal_normalization`] to cap the input at unit length.

use tracing::trace;

use crate::error::{ensure_non_negative, ensure_positive, ConfigError};
use crate::geometry::{Bounds, Vec2};
use crate::joystick::normalize::radial_clamp;

/// One integration step with explicit parameters
///
/// A zero input returns `position` untouched, so an idle entity accumulates
/// no floating-point drift. Otherwise each axis of `position + input * speed`
/// is clamped to `[min + half_extent, max - half_extent]`.
///
/// # Panics
/// If the bounds shrunk by `half_extent` are inverted or NaN. That is a
/// configuration error; [`Integrator::new`] rejects it up front.
///
/// # Example
/// ```
/// use touchstick::geometry::{Bounds, Vec2};
/// use touchstick::integrator::tick;
///
/// let bounds = Bounds::new(0.0, 1000.0, 0.0, 1000.0);
/// let next = tick(Vec2::new(1.0, 0.0), Vec2::new(973.0, 500.0), &bounds, 5.0, 25.0);
/// assert_eq!(next, Vec2::new(975.0, 500.0));
/// ```
pub fn tick(input: Vec2, position: Vec2, bounds: &Bounds, speed: f32, half_extent: f32) -> Vec2 {
    if input.is_zero() {
        return position;
    }

    let allowed = Bounds::new(
        bounds.min_x + half_extent,
        bounds.max_x - half_extent,
        bounds.min_y + half_extent,
        bounds.max_y - half_extent,
    );
    allowed.clamp(position + input * speed)
}

/// Validated integrator parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Integrator {
    half_extent: f32,
    speed: f32,
    /// Region the entity centre may occupy
    allowed: Bounds,
    normalize_diagonal: bool,
}

impl Integrator {
    /// Reject inverted bounds, entities larger than the bounds, and non-positive speed
    pub fn new(bounds: Bounds, half_extent: f32, speed: f32) -> Result<Self, ConfigError> {
        bounds.validate()?;
        ensure_non_negative("half_extent", half_extent)?;
        ensure_positive("speed", speed)?;
        let allowed = bounds.inset(half_extent)?;

        Ok(Self {
            half_extent,
            speed,
            allowed,
            normalize_diagonal: false,
        })
    }

    /// Rescale inputs longer than 1 to unit length before applying speed
    pub fn with_diagonal_normalization(mut self, enabled: bool) -> Self {
        self.normalize_diagonal = enabled;
        self
    }

    /// Advance `position` by one refresh
    pub fn tick(&self, input: Vec2, position: Vec2) -> Vec2 {
        if input.is_zero() {
            return position;
        }

        let input = if self.normalize_diagonal { radial_clamp(input) } else { input };
        let next = self.allowed.clamp(position + input * self.speed);

        trace!(
            "tick: ({:.2}, {:.2}) + ({:.3}, {:.3}) * {} -> ({:.2}, {:.2})",
            position.x, position.y, input.x, input.y, self.speed, next.x, next.y
        );

        next
    }

    /// Pull an arbitrary position into the allowed region
    pub fn clamp(&self, position: Vec2) -> Vec2 {
        self.allowed.clamp(position)
    }

    /// Bounds shrunk by the half-extent
    pub fn allowed(&self) -> &Bounds {
        &self.allowed
    }

    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }
}
