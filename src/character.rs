//! Controllable character sprite state
//!
//! The character owns its position: it is the only writer of the shared
//! [`PositionSlot`], advancing it through the [`Integrator`] once per tick.

use tracing::debug;

use crate::config::CharacterConfig;
use crate::error::ConfigError;
use crate::geometry::Vec2;
use crate::integrator::Integrator;
use crate::shared::PositionSlot;

#[derive(Debug)]
pub struct Character {
    config: CharacterConfig,
    integrator: Integrator,
    position: Vec2,
    slot: PositionSlot,
}

impl Character {
    /// Build the character and publish its (clamped) start position
    pub fn new(config: CharacterConfig, slot: PositionSlot) -> Result<Self, ConfigError> {
        config.validate()?;
        let integrator = Self::build_integrator(&config)?;

        let start = config.start.unwrap_or_else(|| config.bounds.center());
        let position = integrator.clamp(start);
        slot.store(position);

        debug!(
            "Character created at ({}, {}) size={} speed={}",
            position.x, position.y, config.size, config.speed
        );

        Ok(Self {
            config,
            integrator,
            position,
            slot,
        })
    }

    fn build_integrator(config: &CharacterConfig) -> Result<Integrator, ConfigError> {
        Ok(Integrator::new(config.bounds, config.half_extent(), config.speed)?
            .with_diagonal_normalization(config.normalize_diagonal))
    }

    /// Advance one refresh with the latest input vector
    pub fn step(&mut self, input: Vec2) -> Vec2 {
        let next = self.integrator.tick(input, self.position);
        if next != self.position {
            self.position = next;
            self.slot.store(next);
        }
        self.position
    }

    /// Apply new size/speed/bounds, keeping the character inside the new bounds
    ///
    /// The start position is only used at construction; a reload never teleports.
    pub fn reconfigure(&mut self, config: CharacterConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let integrator = Self::build_integrator(&config)?;

        self.position = integrator.clamp(self.position);
        self.slot.store(self.position);
        self.integrator = integrator;
        self.config = config;

        debug!(
            "Character reconfigured: position=({}, {}) speed={}",
            self.position.x, self.position.y, self.config.speed
        );
        Ok(())
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn size(&self) -> f32 {
        self.config.size
    }

    pub fn half_extent(&self) -> f32 {
        self.integrator.half_extent()
    }

    pub fn integrator(&self) -> &Integrator {
        &self.integrator
    }

    pub fn config(&self) -> &CharacterConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;

    fn config_at(start: Vec2) -> CharacterConfig {
        CharacterConfig {
            start: Some(start),
            ..CharacterConfig::default()
        }
    }

    #[test]
    fn test_starts_at_centre_by_default() {
        let slot = PositionSlot::default();
        let character = Character::new(CharacterConfig::default(), slot.clone()).unwrap();
        assert_eq!(character.position(), Vec2::new(500.0, 500.0));
        assert_eq!(slot.load(), Vec2::new(500.0, 500.0));
        assert_eq!(character.half_extent(), 25.0);
    }

    #[test]
    fn test_start_is_clamped() {
        let character = Character::new(config_at(Vec2::new(0.0, 990.0)), PositionSlot::default()).unwrap();
        assert_eq!(character.position(), Vec2::new(25.0, 975.0));
    }

    #[test]
    fn test_step_publishes_position() {
        let slot = PositionSlot::default();
        let mut character = Character::new(config_at(Vec2::new(973.0, 500.0)), slot.clone()).unwrap();

        assert_eq!(character.step(Vec2::new(1.0, 0.0)), Vec2::new(975.0, 500.0));
        assert_eq!(slot.load(), Vec2::new(975.0, 500.0));

        // Pinned against the wall
        assert_eq!(character.step(Vec2::new(1.0, 0.0)), Vec2::new(975.0, 500.0));
    }

    #[test]
    fn test_reconfigure_reclamps() {
        let slot = PositionSlot::default();
        let mut character = Character::new(config_at(Vec2::new(900.0, 900.0)), slot.clone()).unwrap();

        let smaller = CharacterConfig {
            bounds: Bounds::new(0.0, 400.0, 0.0, 400.0),
            ..CharacterConfig::default()
        };
        character.reconfigure(smaller).unwrap();

        assert_eq!(character.position(), Vec2::new(375.0, 375.0));
        assert_eq!(slot.load(), Vec2::new(375.0, 375.0));
    }

    #[test]
    fn test_rejects_entity_larger_than_bounds() {
        let config = CharacterConfig {
            size: 200.0,
            bounds: Bounds::new(0.0, 100.0, 0.0, 1000.0),
            ..CharacterConfig::default()
        };
        assert!(matches!(
            Character::new(config, PositionSlot::default()),
            Err(ConfigError::EntityLargerThanBounds { .. })
        ));
    }
}
