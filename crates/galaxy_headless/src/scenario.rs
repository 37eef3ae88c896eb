//! Scenario loading.
//!
//! A scenario picks the planet table and rules for a headless session and
//! can place fleets before the first frame. Every part is optional; an
//! empty scenario is the standard galaxy with default rules.
//!
//! # Example RON
//!
//! ```ron
//! Scenario(
//!     name: "Fast days",
//!     rules: (seconds_per_day: 5.0),
//!     fleets: [
//!         (planet: "Coruscant", owner: Player, fighters: 3),
//!     ],
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use galaxy_core::config::GalaxyRules;
use galaxy_core::data::GalaxyData;
use galaxy_core::error::GameError;
use galaxy_core::factions::Faction;
use galaxy_core::game::Game;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// The scenario describes an impossible game.
    #[error("Invalid scenario: {0}")]
    Invalid(#[from] GameError),
}

/// A fleet placed at game start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingFleet {
    /// Planet to place it at.
    pub planet: String,
    /// Owner.
    pub owner: Faction,
    /// Fighter count.
    pub fighters: u32,
}

/// A complete scenario configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Planet table; the standard galaxy when absent.
    pub galaxy: Option<GalaxyData>,
    /// Gameplay constants.
    pub rules: GalaxyRules,
    /// Fleets placed before the first frame.
    pub fleets: Vec<StartingFleet>,
}

impl Scenario {
    /// The standard galaxy with default rules and no fleets.
    pub fn standard() -> Self {
        Self {
            name: "Standard".to_string(),
            ..Self::default()
        }
    }

    /// Load a scenario from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_ron(&content)
    }

    /// Parse a scenario from RON text.
    pub fn from_ron(source: &str) -> Result<Self, ScenarioError> {
        Ok(ron::from_str(source)?)
    }

    /// The planet table this scenario plays on.
    pub fn galaxy_data(&self) -> Result<GalaxyData, ScenarioError> {
        match &self.galaxy {
            Some(data) => Ok(data.clone()),
            None => Ok(GalaxyData::standard()?),
        }
    }

    /// Build the starting game.
    pub fn build_game(&self) -> Result<Game, ScenarioError> {
        let data = self.galaxy_data()?;
        let mut game = Game::new(&data, self.rules.clone())?;
        for fleet in &self.fleets {
            game.galaxy_mut()
                .spawn_fleet(&fleet.planet, fleet.owner, fleet.fighters)?;
        }
        tracing::info!(
            scenario = %self.name,
            planets = game.galaxy().planet_count(),
            fleets = self.fleets.len(),
            "Scenario loaded"
        );
        Ok(game)
    }
}
