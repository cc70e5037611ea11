//! Configuration management for touchstick
//!
//! Handles loading, parsing, validation, and hot-reloading of YAML configuration files.
//! Every section has defaults, so an empty file (or no file at all) is a valid setup.

pub mod watcher;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

use crate::error::{ensure_finite, ensure_non_negative, ensure_positive, ConfigError};
use crate::geometry::{Bounds, Vec2};

pub use watcher::ConfigWatcher;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub joystick: JoystickConfig,
    #[serde(default)]
    pub character: CharacterConfig,
    #[serde(default)]
    pub frame: FrameConfig,
}

/// Per-instance joystick configuration
///
/// Colors are opaque presentation values; touchstick passes them to the
/// renderer untouched.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JoystickConfig {
    #[serde(default = "default_base_diameter")]
    pub base_diameter: f32,
    #[serde(default = "default_stick_diameter")]
    pub stick_diameter: f32,
    #[serde(default = "default_base_color")]
    pub base_color: String,
    #[serde(default = "default_stick_color")]
    pub stick_color: String,
    /// Spring constant of the return-to-centre animation (1/s^2)
    #[serde(default = "default_return_stiffness")]
    pub return_stiffness: f32,
    /// Damping of the return-to-centre animation (1/s)
    #[serde(default = "default_return_damping")]
    pub return_damping: f32,
}

/// Character sprite and movement configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CharacterConfig {
    /// Visual size of the sprite; half of it keeps the sprite inside the bounds
    #[serde(default = "default_character_size")]
    pub size: f32,
    /// Distance travelled per tick at full deflection on one axis
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default)]
    pub bounds: Bounds,
    /// Initial position, defaults to the centre of the bounds
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub start: Option<Vec2>,
    /// Rescale inputs longer than 1 to unit length (diagonals no faster than axes)
    #[serde(default)]
    pub normalize_diagonal: bool,
}

/// Frame scheduling configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FrameConfig {
    #[serde(default = "default_refresh_hz")]
    pub refresh_hz: u32,
}

impl JoystickConfig {
    /// Radius the stick centre may travel from the base centre
    pub fn max_distance(&self) -> f32 {
        (self.base_diameter - self.stick_diameter) / 2.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("base_diameter", self.base_diameter)?;
        ensure_positive("stick_diameter", self.stick_diameter)?;
        if self.stick_diameter >= self.base_diameter {
            return Err(ConfigError::StickNotSmallerThanBase {
                base: self.base_diameter,
                stick: self.stick_diameter,
            });
        }
        ensure_positive("return_stiffness", self.return_stiffness)?;
        ensure_non_negative("return_damping", self.return_damping)?;
        Ok(())
    }
}

impl CharacterConfig {
    pub fn half_extent(&self) -> f32 {
        self.size / 2.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("character.size", self.size)?;
        ensure_positive("character.speed", self.speed)?;
        self.bounds.validate()?;
        self.bounds.inset(self.half_extent())?;
        if let Some(start) = self.start {
            ensure_finite("character.start.x", start.x)?;
            ensure_finite("character.start.y", start.y)?;
        }
        Ok(())
    }
}

impl FrameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=1000).contains(&self.refresh_hz) {
            return Err(ConfigError::InvalidRefreshRate(self.refresh_hz));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_yaml(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(contents: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to an empty mapping
        let config: AppConfig = if contents.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?
        };

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self)
            .context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate every section, naming the section that failed
    pub fn validate(&self) -> Result<()> {
        self.joystick.validate().context("Invalid joystick section")?;
        self.character.validate().context("Invalid character section")?;
        self.frame.validate().context("Invalid frame section")?;
        Ok(())
    }
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            base_diameter: default_base_diameter(),
            stick_diameter: default_stick_diameter(),
            base_color: default_base_color(),
            stick_color: default_stick_color(),
            return_stiffness: default_return_stiffness(),
            return_damping: default_return_damping(),
        }
    }
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            size: default_character_size(),
            speed: default_speed(),
            bounds: Bounds::default(),
            start: None,
            normalize_diagonal: false,
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { refresh_hz: default_refresh_hz() }
    }
}

// Default value functions
fn default_base_diameter() -> f32 { 150.0 }
fn default_stick_diameter() -> f32 { 60.0 }
fn default_base_color() -> String { "rgba(255,255,255,0.3)".to_string() }
fn default_stick_color() -> String { "rgba(255,255,255,0.8)".to_string() }
fn default_return_stiffness() -> f32 { 200.0 }
fn default_return_damping() -> f32 { 22.0 }
fn default_character_size() -> f32 { 50.0 }
fn default_speed() -> f32 { 5.0 }
fn default_refresh_hz() -> u32 { 60 }

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.joystick.max_distance(), 45.0);
        assert_eq!(config.character.half_extent(), 25.0);
        assert_eq!(config.frame.refresh_hz, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
joystick:
  base_diameter: 200
character:
  speed: 8
  bounds: { min_x: 0, max_x: 400, min_y: 0, max_y: 300 }
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.joystick.base_diameter, 200.0);
        assert_eq!(config.joystick.stick_diameter, 60.0);
        assert_eq!(config.joystick.max_distance(), 70.0);
        assert_eq!(config.character.speed, 8.0);
        assert_eq!(config.character.bounds.max_y, 300.0);
        assert_eq!(config.frame.refresh_hz, 60);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(AppConfig::from_yaml("").unwrap(), AppConfig::default());
        assert_eq!(AppConfig::from_yaml("  \n").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_rejects_stick_larger_than_base() {
        let yaml = r#"
joystick:
  base_diameter: 60
  stick_diameter: 60
"#;
        let err = AppConfig::from_yaml(yaml).unwrap_err();
        let root = err.downcast_ref::<ConfigError>().unwrap();
        assert!(matches!(root, ConfigError::StickNotSmallerThanBase { .. }));
        assert!(format!("{:#}", err).contains("joystick"));
    }

    #[test]
    fn test_rejects_non_positive_diameter() {
        let mut joystick = JoystickConfig::default();
        joystick.stick_diameter = 0.0;
        assert_eq!(
            joystick.validate(),
            Err(ConfigError::NonPositive { name: "stick_diameter", value: 0.0 })
        );

        joystick.stick_diameter = 60.0;
        joystick.base_diameter = -1.0;
        assert!(matches!(
            joystick.validate(),
            Err(ConfigError::NonPositive { name: "base_diameter", .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let yaml = r#"
character:
  bounds: { min_x: 500, max_x: 100, min_y: 0, max_y: 300 }
"#;
        let err = AppConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvertedBounds { axis: 'x', .. })
        ));
    }

    #[test]
    fn test_rejects_sprite_that_only_fits_before_rounding() {
        let yaml = r#"
character:
  size: 8.022
  bounds: { min_x: 0.74, max_x: 8.762, min_y: 0, max_y: 1000 }
"#;
        let err = AppConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::EntityLargerThanBounds { axis: 'x', .. })
        ));
    }

    #[test]
    fn test_rejects_bad_refresh_rate() {
        let config = FrameConfig { refresh_hz: 0 };
        assert_eq!(config.validate(), Err(ConfigError::InvalidRefreshRate(0)));
    }

    #[test]
    fn test_rejects_unparseable_yaml() {
        assert!(AppConfig::from_yaml("joystick: [1, 2").is_err());
    }

    #[tokio::test]
    async fn test_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("touchstick.yaml");

        let mut config = AppConfig::default();
        config.character.start = Some(Vec2::new(100.0, 200.0));
        config.character.normalize_diagonal = true;
        config.save(&path).await?;

        let loaded = AppConfig::load(&path).await?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_or_default_missing_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("absent.yaml");
        let config = AppConfig::load_or_default(&path).await?;
        assert_eq!(config, AppConfig::default());
        Ok(())
    }
}
