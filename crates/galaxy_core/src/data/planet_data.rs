//! Static planet table definitions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::factions::Faction;
use crate::math::Vec2Fixed;

/// The standard galaxy, embedded at compile time.
const STANDARD_GALAXY: &str = include_str!("../../data/standard_galaxy.ron");

/// One row of the planet table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetData {
    /// Unique planet name.
    pub name: String,

    /// World position (x, y).
    pub position: (i32, i32),

    /// Initial owner.
    pub owner: Faction,

    /// Income granted to the owner once per day.
    pub resource_rate: u32,

    /// Flavour text lines shown by the detail view.
    #[serde(default)]
    pub lore: Vec<String>,
}

impl PlanetData {
    /// Create a planet row without lore.
    #[must_use]
    pub fn new(name: impl Into<String>, position: (i32, i32), owner: Faction, rate: u32) -> Self {
        Self {
            name: name.into(),
            position,
            owner,
            resource_rate: rate,
            lore: Vec::new(),
        }
    }

    /// Position as a fixed-point vector.
    #[must_use]
    pub fn world_position(&self) -> Vec2Fixed {
        Vec2Fixed::from_num(self.position.0, self.position.1)
    }
}

/// The complete planet table, in the order planets are registered.
///
/// # Example RON
///
/// ```ron
/// GalaxyData(
///     name: "Duel",
///     planets: [
///         (name: "Home", position: (100, 100), owner: Player, resource_rate: 50),
///         (name: "Away", position: (900, 100), owner: Ai, resource_rate: 50),
///     ],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalaxyData {
    /// Display name of the map.
    pub name: String,

    /// Planet rows in registration order.
    pub planets: Vec<PlanetData>,
}

impl GalaxyData {
    /// The standard 20-planet galaxy.
    pub fn standard() -> Result<Self> {
        Self::from_ron(STANDARD_GALAXY, "standard_galaxy.ron")
    }

    /// Parse and validate a planet table from RON text.
    pub fn from_ron(source: &str, path: &str) -> Result<Self> {
        let data: Self = ron::from_str(source).map_err(|e| GameError::DataParseError {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        data.validate()?;
        Ok(data)
    }

    /// Check the table can seed a galaxy: non-empty, unique names.
    pub fn validate(&self) -> Result<()> {
        if self.planets.is_empty() {
            return Err(GameError::InvalidGalaxyData(format!(
                "'{}' has no planets",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for planet in &self.planets {
            if planet.name.is_empty() {
                return Err(GameError::InvalidGalaxyData(
                    "planet with empty name".to_string(),
                ));
            }
            if !seen.insert(planet.name.as_str()) {
                return Err(GameError::InvalidGalaxyData(format!(
                    "duplicate planet name '{}'",
                    planet.name
                )));
            }
        }

        Ok(())
    }

    /// Find a planet row by name.
    #[must_use]
    pub fn get_planet(&self, name: &str) -> Option<&PlanetData> {
        self.planets.iter().find(|p| p.name == name)
    }
}
