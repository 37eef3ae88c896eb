//! Station and fighter construction.
//!
//! Every planet runs two independent build timers, one for station
//! upgrades and one for fighters. Each is a two-state machine:
//!
//! ```text
//!   Idle --start (eligible, paid)--> Building --elapsed >= duration--> Idle
//! ```
//!
//! Cost is charged when a build starts. Builds cannot be paused,
//! cancelled or refunded; once started they complete after the fixed
//! duration, measured in simulation seconds.

use serde::{Deserialize, Serialize};

use crate::config::GalaxyRules;
use crate::economy::ResourcePools;
use crate::factions::Faction;
use crate::fleet::{FleetId, FleetRegistry};
use crate::math::{option_fixed_serde, Fixed};
use crate::planet::Planet;

/// Which of a planet's two build slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstructionKind {
    /// Space station level upgrade.
    Station,
    /// One fighter for the planet's fleet.
    Fighter,
}

/// A single build slot: idle, or building since a simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BuildTimer {
    /// Simulation time the current build started, if any.
    #[serde(with = "option_fixed_serde")]
    started_at: Option<Fixed>,
}

impl BuildTimer {
    /// An idle slot.
    pub const IDLE: Self = Self { started_at: None };

    /// Whether a build is in progress.
    #[must_use]
    pub const fn is_building(&self) -> bool {
        self.started_at.is_some()
    }

    /// Simulation time the current build started.
    #[must_use]
    pub const fn started_at(&self) -> Option<Fixed> {
        self.started_at
    }

    /// Begin building at `now`.
    fn start(&mut self, now: Fixed) {
        self.started_at = Some(now);
    }

    /// Time left until completion, clamped at zero. `None` when idle.
    #[must_use]
    pub fn remaining(&self, now: Fixed, duration: Fixed) -> Option<Fixed> {
        self.started_at
            .map(|start| (duration - (now - start)).max(Fixed::ZERO))
    }

    /// Complete the build if enough time has elapsed.
    ///
    /// Returns true exactly once per build, on the poll that finishes it.
    fn poll(&mut self, now: Fixed, duration: Fixed) -> bool {
        match self.started_at {
            Some(start) if now - start >= duration => {
                self.started_at = None;
                true
            }
            _ => false,
        }
    }
}

/// Why a build request was refused. The refused request changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildRejection {
    /// No planet with the requested name.
    UnknownPlanet,
    /// Only the player faction issues build commands.
    NotPlayerFaction,
    /// The requester does not own the planet.
    NotOwner,
    /// This slot already has a build in progress.
    AlreadyBuilding,
    /// The station is already at the maximum level.
    MaxLevelReached,
    /// Fighters need a station of level 1 or higher.
    NoStation,
    /// The requester's pool cannot cover the cost.
    InsufficientResources,
}

impl std::fmt::Display for BuildRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPlanet => write!(f, "Unknown planet"),
            Self::NotPlayerFaction => write!(f, "Only the player can build"),
            Self::NotOwner => write!(f, "Planet is not owned by the requester"),
            Self::AlreadyBuilding => write!(f, "Already building"),
            Self::MaxLevelReached => write!(f, "Station is at maximum level"),
            Self::NoStation => write!(f, "Planet has no space station"),
            Self::InsufficientResources => write!(f, "Insufficient resources"),
        }
    }
}

impl std::error::Error for BuildRejection {}

/// Events generated by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstructionEvent {
    /// A build was paid for and started.
    Started {
        /// Planet name.
        planet: String,
        /// Which slot.
        kind: ConstructionKind,
        /// Amount charged.
        cost: i64,
    },
    /// A station level finished.
    StationCompleted {
        /// Planet name.
        planet: String,
        /// New station level.
        level: u8,
    },
    /// A fighter finished and joined the planet's fleet.
    FighterCompleted {
        /// Planet name.
        planet: String,
        /// Fleet the fighter joined.
        fleet: FleetId,
        /// Fighters in that fleet afterwards.
        fighters: u32,
    },
}

fn check_requester(planet: &Planet, requester: Faction) -> Result<(), BuildRejection> {
    if requester != Faction::Player {
        return Err(BuildRejection::NotPlayerFaction);
    }
    if planet.owner != requester {
        return Err(BuildRejection::NotOwner);
    }
    Ok(())
}

/// Start the next station level on `planet`, charging `requester`.
///
/// Cost is `station_base_cost * (level + 1)`.
pub fn start_station(
    planet: &mut Planet,
    requester: Faction,
    pools: &mut ResourcePools,
    rules: &GalaxyRules,
    now: Fixed,
) -> Result<ConstructionEvent, BuildRejection> {
    check_requester(planet, requester)?;
    if planet.station_build.is_building() {
        return Err(BuildRejection::AlreadyBuilding);
    }
    if planet.station_level >= rules.max_station_level {
        return Err(BuildRejection::MaxLevelReached);
    }

    let cost = rules.station_cost(planet.station_level);
    if !pools.spend(requester, cost) {
        return Err(BuildRejection::InsufficientResources);
    }

    planet.station_build.start(now);
    Ok(ConstructionEvent::Started {
        planet: planet.name.clone(),
        kind: ConstructionKind::Station,
        cost,
    })
}

/// Start a fighter on `planet`, charging `requester` the flat fighter cost.
pub fn start_fighter(
    planet: &mut Planet,
    requester: Faction,
    pools: &mut ResourcePools,
    rules: &GalaxyRules,
    now: Fixed,
) -> Result<ConstructionEvent, BuildRejection> {
    check_requester(planet, requester)?;
    if !planet.has_station() {
        return Err(BuildRejection::NoStation);
    }
    if planet.fighter_build.is_building() {
        return Err(BuildRejection::AlreadyBuilding);
    }
    if !pools.spend(requester, rules.fighter_cost) {
        return Err(BuildRejection::InsufficientResources);
    }

    planet.fighter_build.start(now);
    Ok(ConstructionEvent::Started {
        planet: planet.name.clone(),
        kind: ConstructionKind::Fighter,
        cost: rules.fighter_cost,
    })
}

/// Finish any builds on `planet` whose duration has elapsed by `now`.
///
/// A finished fighter joins the planet's fleet, creating a one-fighter
/// fleet at the planet when it has none.
pub fn complete_builds(
    planet: &mut Planet,
    fleets: &mut FleetRegistry,
    rules: &GalaxyRules,
    now: Fixed,
) -> Vec<ConstructionEvent> {
    let mut events = Vec::new();

    if planet.station_build.poll(now, rules.station_build_time) {
        planet.station_level = (planet.station_level + 1).min(rules.max_station_level);
        events.push(ConstructionEvent::StationCompleted {
            planet: planet.name.clone(),
            level: planet.station_level,
        });
    }

    if planet.fighter_build.poll(now, rules.fighter_build_time) {
        let fleet_id = match planet.fleet.and_then(|id| fleets.get_mut(id)) {
            Some(fleet) => {
                fleet.fighters += 1;
                fleet.id
            }
            None => {
                let id = fleets.spawn(planet.owner, 1, planet.position);
                planet.fleet = Some(id);
                id
            }
        };
        let fighters = fleets.get(fleet_id).map_or(0, |fleet| fleet.fighters);
        events.push(ConstructionEvent::FighterCompleted {
            planet: planet.name.clone(),
            fleet: fleet_id,
            fighters,
        });
    }

    events
}
