//! Gameplay constants.
//!
//! [`GalaxyRules`] gathers every tunable number of the simulation in one
//! place. The defaults reproduce the standard game; a RON file can
//! override any subset of them.
//!
//! # Example RON
//!
//! ```ron
//! GalaxyRules(
//!     seconds_per_day: 10.0,
//!     starting_resources: 2000,
//! )
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::math::{decimal_serde, Fixed, Vec2Fixed};

/// All gameplay constants.
///
/// Durations are in simulation seconds, distances in world units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyRules {
    /// Length of one in-game day.
    #[serde(with = "decimal_serde")]
    pub seconds_per_day: Fixed,
    /// Day counter value at game start.
    pub starting_day: u32,
    /// Initial resource pool of each resource-holding faction.
    pub starting_resources: i64,

    /// Time to finish one station level.
    #[serde(with = "decimal_serde")]
    pub station_build_time: Fixed,
    /// Station cost per level; level `L -> L+1` costs `base * (L + 1)`.
    pub station_base_cost: i64,
    /// Highest reachable station level.
    pub max_station_level: u8,

    /// Time to finish one fighter.
    #[serde(with = "decimal_serde")]
    pub fighter_build_time: Fixed,
    /// Flat cost of one fighter.
    pub fighter_cost: i64,

    /// Fleet travel speed, world units per second.
    #[serde(with = "decimal_serde")]
    pub fleet_speed: Fixed,

    /// Click radius around a planet centre.
    #[serde(with = "decimal_serde")]
    pub planet_radius: Fixed,
    /// Click radius of a fleet marker.
    #[serde(with = "decimal_serde")]
    pub fleet_click_radius: Fixed,
    /// Distance of the fleet marker above its planet centre.
    #[serde(with = "decimal_serde")]
    pub fleet_marker_offset: Fixed,

    /// Fraction of the remaining zoom distance covered each frame.
    #[serde(with = "decimal_serde")]
    pub zoom_rate: Fixed,
    /// Zoom stops moving once this close to its target.
    #[serde(with = "decimal_serde")]
    pub zoom_settle_epsilon: Fixed,
    /// Zoom above this value shows the planet detail view.
    #[serde(with = "decimal_serde")]
    pub detail_zoom_threshold: Fixed,

    /// World width in world units.
    #[serde(with = "decimal_serde")]
    pub world_width: Fixed,
    /// World height in world units.
    #[serde(with = "decimal_serde")]
    pub world_height: Fixed,
    /// Viewport width in screen pixels (1:1 with world units).
    #[serde(with = "decimal_serde")]
    pub viewport_width: Fixed,
    /// Viewport height in screen pixels.
    #[serde(with = "decimal_serde")]
    pub viewport_height: Fixed,
    /// Camera pan distance per frame per pressed direction.
    #[serde(with = "decimal_serde")]
    pub camera_speed: Fixed,
}

impl Default for GalaxyRules {
    fn default() -> Self {
        Self {
            seconds_per_day: Fixed::from_num(30),
            starting_day: 1,
            starting_resources: 100_000,
            station_build_time: Fixed::from_num(20),
            station_base_cost: 500,
            max_station_level: 5,
            fighter_build_time: Fixed::from_num(10),
            fighter_cost: 100,
            fleet_speed: Fixed::from_num(100),
            planet_radius: Fixed::from_num(40),
            fleet_click_radius: Fixed::from_num(12),
            fleet_marker_offset: Fixed::from_num(60),
            zoom_rate: Fixed::from_num(0.1),
            zoom_settle_epsilon: Fixed::from_num(0.01),
            detail_zoom_threshold: Fixed::from_num(0.5),
            world_width: Fixed::from_num(4096),
            world_height: Fixed::from_num(3072),
            viewport_width: Fixed::from_num(1024),
            viewport_height: Fixed::from_num(768),
            camera_speed: Fixed::from_num(10),
        }
    }
}

impl GalaxyRules {
    /// Parse rules from RON text. Missing fields keep their defaults.
    pub fn from_ron(source: &str, path: &str) -> Result<Self> {
        let rules: Self = ron::from_str(source).map_err(|e| GameError::DataParseError {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        rules.validate()?;
        Ok(rules)
    }

    /// Check that every constant is usable.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("seconds_per_day", self.seconds_per_day),
            ("station_build_time", self.station_build_time),
            ("fighter_build_time", self.fighter_build_time),
            ("fleet_speed", self.fleet_speed),
            ("planet_radius", self.planet_radius),
            ("fleet_click_radius", self.fleet_click_radius),
            ("zoom_rate", self.zoom_rate),
        ];
        for (name, value) in positive {
            if value <= Fixed::ZERO {
                return Err(GameError::InvalidRules(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        if self.zoom_rate > Fixed::ONE {
            return Err(GameError::InvalidRules(format!(
                "zoom_rate must be at most 1, got {}",
                self.zoom_rate
            )));
        }
        if self.max_station_level == 0 {
            return Err(GameError::InvalidRules(
                "max_station_level must be at least 1".to_string(),
            ));
        }
        if self.station_base_cost < 0 || self.fighter_cost < 0 || self.starting_resources < 0 {
            return Err(GameError::InvalidRules(
                "costs and starting resources must not be negative".to_string(),
            ));
        }
        if self.world_width < self.viewport_width || self.world_height < self.viewport_height {
            return Err(GameError::InvalidRules(
                "viewport must fit inside the world".to_string(),
            ));
        }

        Ok(())
    }

    /// Cost of raising a station from `current_level` to the next level.
    #[must_use]
    pub fn station_cost(&self, current_level: u8) -> i64 {
        self.station_base_cost * (i64::from(current_level) + 1)
    }

    /// Largest camera position on each axis (world minus viewport).
    #[must_use]
    pub fn camera_bounds(&self) -> Vec2Fixed {
        Vec2Fixed::new(
            self.world_width - self.viewport_width,
            self.world_height - self.viewport_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let rules = GalaxyRules::default();
        assert!(rules.validate().is_ok());
        assert_eq!(rules.camera_bounds(), Vec2Fixed::from_num(3072, 2304));
    }

    #[test]
    fn test_station_cost_scales_with_level() {
        let rules = GalaxyRules::default();
        assert_eq!(rules.station_cost(0), 500);
        assert_eq!(rules.station_cost(1), 1000);
        assert_eq!(rules.station_cost(4), 2500);
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let rules =
            GalaxyRules::from_ron("(seconds_per_day: 10.0, fighter_cost: 50)", "test").unwrap();
        assert_eq!(rules.seconds_per_day, Fixed::from_num(10));
        assert_eq!(rules.fighter_cost, 50);
        assert_eq!(rules.station_base_cost, 500);
    }

    #[test]
    fn test_rejects_zero_day_length() {
        let result = GalaxyRules::from_ron("(seconds_per_day: 0.0)", "test");
        assert!(matches!(result, Err(GameError::InvalidRules(_))));
    }

    #[test]
    fn test_rejects_garbage() {
        let result = GalaxyRules::from_ron("(seconds_per_day: \"soon\")", "rules.ron");
        assert!(matches!(result, Err(GameError::DataParseError { .. })));
    }
}
