//! Configuration errors
//!
//! The only failure class in touchstick is caller misconfiguration. These
//! errors are raised eagerly when a joystick, integrator or frame loop is
//! built (or reconfigured), never from a per-frame update.

use thiserror::Error;

/// Rejected configuration value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be greater than 0 (got {value})")]
    NonPositive { name: &'static str, value: f32 },

    #[error("stick diameter {stick} must be smaller than base diameter {base}")]
    StickNotSmallerThanBase { base: f32, stick: f32 },

    #[error("{name} must be a finite number (got {value})")]
    NonFinite { name: &'static str, value: f32 },

    #[error("bounds are inverted on the {axis} axis: min {min} > max {max}")]
    InvertedBounds { axis: char, min: f32, max: f32 },

    #[error("entity extent {extent} does not fit in {axis} bounds of width {span}")]
    EntityLargerThanBounds { axis: char, extent: f32, span: f32 },

    #[error("{name} must not be negative (got {value})")]
    Negative { name: &'static str, value: f32 },

    #[error("refresh rate must be between 1 and 1000 Hz (got {0})")]
    InvalidRefreshRate(u32),
}

/// Reject NaN and infinities for a named value
pub(crate) fn ensure_finite(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

/// Finite and strictly positive
pub(crate) fn ensure_positive(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if ensure_finite(name, value)? > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

/// Finite and not negative
pub(crate) fn ensure_non_negative(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if ensure_finite(name, value)? >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
