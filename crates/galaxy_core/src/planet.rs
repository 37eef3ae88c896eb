//! Planets.

use serde::{Deserialize, Serialize};

use crate::construction::BuildTimer;
use crate::data::PlanetData;
use crate::factions::Faction;
use crate::fleet::FleetId;
use crate::math::Vec2Fixed;

/// A planet on the galaxy map.
///
/// Created once from the planet table and never destroyed. Position and
/// income rate are fixed; ownership, station and builds change over time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Planet {
    /// Unique name.
    pub name: String,
    /// World position.
    pub position: Vec2Fixed,
    /// Current owner.
    pub owner: Faction,
    /// Income paid to the owner once per day.
    pub resource_rate: u32,
    /// Station level, `0..=max_station_level`. Level 0 means no station.
    pub station_level: u8,
    /// Station upgrade slot.
    pub station_build: BuildTimer,
    /// Fighter production slot.
    pub fighter_build: BuildTimer,
    /// Fleet currently stationed here, if any.
    pub fleet: Option<FleetId>,
    /// Flavour text.
    #[serde(default)]
    pub lore: Vec<String>,
}

impl Planet {
    /// Create a planet with no station, no fleet and idle build slots.
    #[must_use]
    pub fn new(name: impl Into<String>, position: Vec2Fixed, owner: Faction, rate: u32) -> Self {
        Self {
            name: name.into(),
            position,
            owner,
            resource_rate: rate,
            station_level: 0,
            station_build: BuildTimer::IDLE,
            fighter_build: BuildTimer::IDLE,
            fleet: None,
            lore: Vec::new(),
        }
    }

    /// Whether a station of any level exists.
    #[must_use]
    pub const fn has_station(&self) -> bool {
        self.station_level >= 1
    }
}

impl From<&PlanetData> for Planet {
    fn from(data: &PlanetData) -> Self {
        let mut planet = Self::new(
            data.name.clone(),
            data.world_position(),
            data.owner,
            data.resource_rate,
        );
        planet.lore = data.lore.clone();
        planet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_planet_is_bare() {
        let planet = Planet::new("Hoth", Vec2Fixed::from_num(2048, 200), Faction::Neutral, 10);
        assert!(!planet.has_station());
        assert!(!planet.station_build.is_building());
        assert!(!planet.fighter_build.is_building());
        assert_eq!(planet.fleet, None);
    }

    #[test]
    fn test_from_planet_data_keeps_lore() {
        let mut data = PlanetData::new("Bastion", (3296, 1536), Faction::Ai, 50);
        data.lore.push("A fortress".to_string());
        let planet = Planet::from(&data);
        assert_eq!(planet.position, Vec2Fixed::from_num(3296, 1536));
        assert_eq!(planet.owner, Faction::Ai);
        assert_eq!(planet.lore, vec!["A fortress".to_string()]);
    }
}
