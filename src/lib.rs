//! touchstick - virtual touch joystick and character integrator
//!
//! Two pieces of logic for touch game controls, decoupled through shared
//! lock-free slots:
//! - [`joystick::JoystickInput`] maps drag gestures to a normalized vector
//! - [`integrator::Integrator`] advances a position once per display refresh
//!
//! Gesture capture and drawing belong to the host; [`frame::FrameLoop`] and
//! [`render::Renderer`] are the seams it plugs into.

pub mod character;
pub mod cli;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod integrator;
pub mod joystick;
pub mod render;
pub mod shared;

pub use character::Character;
pub use config::AppConfig;
pub use error::ConfigError;
pub use frame::{FrameLoop, JoystickHandle};
pub use geometry::{Bounds, Vec2};
pub use integrator::Integrator;
pub use joystick::{DragState, JoystickInput, MoveListener};
pub use render::{ConsoleRenderer, FrameSnapshot, JoystickStyle, Renderer};
pub use shared::{InputSlot, PositionSlot};
