//! Galaxy state and the per-frame tick.
//!
//! [`Galaxy`] owns every planet, the fleet registry, the faction resource
//! pools and the simulation clock. It is the only mutable game state; the
//! view, camera and input layers hold nothing but presentation state and
//! act on the galaxy through its methods.
//!
//! # Tick order
//!
//! Each call to [`Galaxy::tick`] runs, in this order:
//! 1. **Clock** - simulation time and the day timer advance by `dt`
//! 2. **Construction** - every planet's build slots are checked for completion
//! 3. **Fleets** - fleets in transit move toward their destinations
//! 4. **Day boundary** - if the day timer reached the day length it resets
//!    to zero, the day counter increments and income is paid
//!
//! The day timer is reset rather than decremented, so a single `dt` longer
//! than a day still advances exactly one day. At 60 frames per second with
//! a 30 second day this cannot happen in practice.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::config::GalaxyRules;
use crate::construction::{self, BuildRejection, ConstructionEvent, ConstructionKind};
use crate::data::GalaxyData;
use crate::economy::{self, DailyIncome, ResourcePools};
use crate::error::{GameError, Result};
use crate::factions::Faction;
use crate::fleet::{Fleet, FleetId, FleetRegistry};
use crate::math::{fixed_serde, Fixed};
use crate::planet::Planet;

/// Income paid at a day boundary crossed during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAdvanced {
    /// The day that just began.
    pub day: u32,
    /// Income paid to each faction.
    pub income: DailyIncome,
}

/// Events generated during a galaxy tick.
///
/// The outer layers use these for notifications, sounds and logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// Builds that finished this tick.
    pub construction: Vec<ConstructionEvent>,
    /// Fleets that reached their destination this tick.
    pub arrivals: Vec<FleetId>,
    /// Set when a day boundary was crossed.
    pub day_advanced: Option<DayAdvanced>,
}

/// Result of moving a fleet from one planet to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetTransfer {
    /// Fleet now stationed at the target.
    pub fleet: FleetId,
    /// Planet the fleet left.
    pub from: String,
    /// Planet the fleet reached.
    pub to: String,
    /// Previous owner of the target, if the arrival changed its owner.
    pub conquered_from: Option<Faction>,
    /// True when the moved fighters joined a fleet already at the target.
    pub merged: bool,
}

/// The complete galaxy simulation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Galaxy {
    /// Gameplay constants.
    rules: GalaxyRules,
    /// Planets in table order.
    planets: Vec<Planet>,
    /// All fleets.
    fleets: FleetRegistry,
    /// Player and AI stockpiles.
    pools: ResourcePools,
    /// Current in-game day.
    day: u32,
    /// Seconds elapsed within the current day.
    #[serde(with = "fixed_serde")]
    day_timer: Fixed,
    /// Total simulation seconds since the game started.
    #[serde(with = "fixed_serde")]
    time: Fixed,
    /// Number of ticks run.
    frame: u64,
}

impl Galaxy {
    /// Build a galaxy from a planet table.
    ///
    /// # Errors
    ///
    /// Fails when the table or the rules are invalid. This is a startup
    /// precondition; a running galaxy never produces these errors.
    pub fn new(data: &GalaxyData, rules: GalaxyRules) -> Result<Self> {
        data.validate()?;
        rules.validate()?;

        let planets: Vec<Planet> = data.planets.iter().map(Planet::from).collect();
        tracing::info!(
            galaxy = %data.name,
            planets = planets.len(),
            starting_resources = rules.starting_resources,
            "Galaxy initialized"
        );

        Ok(Self {
            pools: ResourcePools::new(rules.starting_resources),
            day: rules.starting_day,
            day_timer: Fixed::ZERO,
            time: Fixed::ZERO,
            frame: 0,
            planets,
            fleets: FleetRegistry::new(),
            rules,
        })
    }

    /// The standard 20-planet galaxy with default rules.
    pub fn standard() -> Result<Self> {
        Self::new(&GalaxyData::standard()?, GalaxyRules::default())
    }

    /// Gameplay constants in effect.
    #[must_use]
    pub const fn rules(&self) -> &GalaxyRules {
        &self.rules
    }

    /// Planets in table order.
    pub fn planets(&self) -> impl Iterator<Item = &Planet> {
        self.planets.iter()
    }

    /// Number of planets.
    #[must_use]
    pub fn planet_count(&self) -> usize {
        self.planets.len()
    }

    /// Look up a planet by name.
    #[must_use]
    pub fn planet(&self, name: &str) -> Option<&Planet> {
        self.planets.iter().find(|p| p.name == name)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.planets.iter().position(|p| p.name == name)
    }

    /// The fleet registry.
    #[must_use]
    pub const fn fleets(&self) -> &FleetRegistry {
        &self.fleets
    }

    /// Look up a fleet by id.
    #[must_use]
    pub fn fleet(&self, id: FleetId) -> Option<&Fleet> {
        self.fleets.get(id)
    }

    /// The fleet stationed at a planet, if it has any fighters.
    ///
    /// Zero-fighter fleets count as no fleet.
    #[must_use]
    pub fn active_fleet_at(&self, name: &str) -> Option<&Fleet> {
        self.planet(name)
            .and_then(|planet| planet.fleet)
            .and_then(|id| self.fleets.get(id))
            .filter(|fleet| fleet.is_active())
    }

    /// The planet whose fleet slot holds `id`.
    #[must_use]
    pub fn home_of(&self, id: FleetId) -> Option<&Planet> {
        self.planets.iter().find(|p| p.fleet == Some(id))
    }

    /// Faction resource pools.
    #[must_use]
    pub const fn pools(&self) -> &ResourcePools {
        &self.pools
    }

    /// Current in-game day.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Seconds elapsed within the current day.
    #[must_use]
    pub const fn day_timer(&self) -> Fixed {
        self.day_timer
    }

    /// Seconds left until the next day boundary.
    #[must_use]
    pub fn seconds_until_next_day(&self) -> Fixed {
        (self.rules.seconds_per_day - self.day_timer).max(Fixed::ZERO)
    }

    /// Total simulation seconds elapsed.
    #[must_use]
    pub const fn time(&self) -> Fixed {
        self.time
    }

    /// Number of ticks run.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Income a faction would receive at the next day boundary.
    #[must_use]
    pub fn daily_income(&self, faction: Faction) -> i64 {
        economy::daily_income(&self.planets, faction)
    }

    /// Time left on a planet's build slot, `None` when idle or unknown.
    #[must_use]
    pub fn remaining_build_time(&self, name: &str, kind: ConstructionKind) -> Option<Fixed> {
        let planet = self.planet(name)?;
        match kind {
            ConstructionKind::Station => planet
                .station_build
                .remaining(self.time, self.rules.station_build_time),
            ConstructionKind::Fighter => planet
                .fighter_build
                .remaining(self.time, self.rules.fighter_build_time),
        }
    }

    /// Advance the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: Fixed) -> TickEvents {
        let mut events = TickEvents::default();

        // 1. Clock
        self.time += dt;
        self.day_timer += dt;

        // 2. Construction
        for planet in &mut self.planets {
            let completed =
                construction::complete_builds(planet, &mut self.fleets, &self.rules, self.time);
            for event in &completed {
                tracing::info!(time = %self.time, ?event, "Construction complete");
            }
            events.construction.extend(completed);
        }

        // 3. Fleets
        events.arrivals = self.fleets.advance_all(self.rules.fleet_speed, dt);

        // 4. Day boundary
        if self.day_timer >= self.rules.seconds_per_day {
            self.day_timer = Fixed::ZERO;
            self.day += 1;
            let income = economy::advance_day(&self.planets, &mut self.pools);
            tracing::info!(
                day = self.day,
                player_income = income.player,
                ai_income = income.ai,
                player_pool = self.pools.player,
                ai_pool = self.pools.ai,
                "New day"
            );
            events.day_advanced = Some(DayAdvanced {
                day: self.day,
                income,
            });
        }

        self.frame += 1;

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(frame = self.frame, state_hash = hash, "Galaxy state hash");
        }

        events
    }

    /// Start the next station level on a planet.
    ///
    /// Rejected requests leave the galaxy untouched.
    pub fn start_station_build(
        &mut self,
        name: &str,
        requester: Faction,
    ) -> std::result::Result<ConstructionEvent, BuildRejection> {
        let index = self.index_of(name).ok_or(BuildRejection::UnknownPlanet)?;
        let result = construction::start_station(
            &mut self.planets[index],
            requester,
            &mut self.pools,
            &self.rules,
            self.time,
        );
        log_build_request(name, ConstructionKind::Station, &result);
        result
    }

    /// Start a fighter on a planet.
    ///
    /// Rejected requests leave the galaxy untouched.
    pub fn start_fighter_build(
        &mut self,
        name: &str,
        requester: Faction,
    ) -> std::result::Result<ConstructionEvent, BuildRejection> {
        let index = self.index_of(name).ok_or(BuildRejection::UnknownPlanet)?;
        let result = construction::start_fighter(
            &mut self.planets[index],
            requester,
            &mut self.pools,
            &self.rules,
            self.time,
        );
        log_build_request(name, ConstructionKind::Fighter, &result);
        result
    }

    /// Move the fleet stationed at `from` to `to`.
    ///
    /// The fleet is placed at the target immediately. If the target is not
    /// owned by the fleet's owner it changes hands on arrival; there is no
    /// combat. If the target already holds a fleet of the same owner the
    /// fighters merge into it; a fleet of another owner is displaced.
    ///
    /// Returns `None` (and changes nothing) when either planet is unknown,
    /// `from == to`, or `from` has no fleet with fighters.
    pub fn transfer_fleet(&mut self, from: &str, to: &str) -> Option<FleetTransfer> {
        let source = self.index_of(from)?;
        let target = self.index_of(to)?;
        if source == target {
            return None;
        }

        let moving_id = self.planets[source].fleet?;
        let moving = self.fleets.get(moving_id).filter(|f| f.is_active())?;
        let owner = moving.owner;
        let fighters = moving.fighters;
        let target_position = self.planets[target].position;

        self.planets[source].fleet = None;

        let target_planet = &mut self.planets[target];
        let conquered_from = (target_planet.owner != owner).then(|| {
            let previous = target_planet.owner;
            target_planet.owner = owner;
            previous
        });

        let resident = target_planet
            .fleet
            .and_then(|id| self.fleets.get(id).map(|f| (id, f.owner)));
        let (fleet, merged) = match resident {
            Some((resident_id, resident_owner)) if resident_owner == owner => {
                if let Some(resident) = self.fleets.get_mut(resident_id) {
                    resident.fighters += fighters;
                }
                self.fleets.remove(moving_id);
                (resident_id, true)
            }
            other => {
                if let Some((displaced, _)) = other {
                    tracing::warn!(planet = to, fleet = %displaced, "Fleet displaced by arrival");
                    self.fleets.remove(displaced);
                }
                if let Some(moving) = self.fleets.get_mut(moving_id) {
                    moving.teleport(target_position);
                }
                self.planets[target].fleet = Some(moving_id);
                (moving_id, false)
            }
        };

        if let Some(previous) = conquered_from {
            tracing::info!(planet = to, from = %previous, to = %owner, "Planet conquered");
        }

        Some(FleetTransfer {
            fleet,
            from: from.to_string(),
            to: to.to_string(),
            conquered_from,
            merged,
        })
    }

    /// Place a new fleet at a planet (scenario setup and tests).
    ///
    /// # Errors
    ///
    /// Fails for an unknown planet, a neutral owner, or a planet that
    /// already holds a fleet.
    pub fn spawn_fleet(&mut self, name: &str, owner: Faction, fighters: u32) -> Result<FleetId> {
        if !owner.has_resources() {
            return Err(GameError::InvalidState(format!(
                "{owner} cannot own a fleet"
            )));
        }
        let index = self
            .index_of(name)
            .ok_or_else(|| GameError::UnknownPlanet(name.to_string()))?;
        if self.planets[index].fleet.is_some() {
            return Err(GameError::InvalidState(format!(
                "{name} already has a fleet"
            )));
        }

        let id = self
            .fleets
            .spawn(owner, fighters, self.planets[index].position);
        self.planets[index].fleet = Some(id);
        Ok(id)
    }

    /// Change a planet's owner (scenario setup and tests).
    pub fn set_owner(&mut self, name: &str, owner: Faction) -> Result<()> {
        let index = self
            .index_of(name)
            .ok_or_else(|| GameError::UnknownPlanet(name.to_string()))?;
        self.planets[index].owner = owner;
        Ok(())
    }

    /// Compute a hash of the current state for determinism checks.
    ///
    /// Covers the clock, pools, every planet in table order and every
    /// fleet in id order. Rules are constant and excluded.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.frame.hash(&mut hasher);
        self.time.to_bits().hash(&mut hasher);
        self.day.hash(&mut hasher);
        self.day_timer.to_bits().hash(&mut hasher);
        self.pools.hash(&mut hasher);

        self.planets.len().hash(&mut hasher);
        for planet in &self.planets {
            planet.hash(&mut hasher);
        }

        self.fleets.len().hash(&mut hasher);
        for fleet in self.fleets.iter() {
            fleet.hash(&mut hasher);
        }

        hasher.finish()
    }

    /// Serialize galaxy state to bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| GameError::InvalidState(format!("Failed to serialize galaxy: {e}")))
    }

    /// Deserialize galaxy state from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| GameError::InvalidState(format!("Failed to deserialize galaxy: {e}")))
    }
}

fn log_build_request(
    planet: &str,
    kind: ConstructionKind,
    result: &std::result::Result<ConstructionEvent, BuildRejection>,
) {
    match result {
        Ok(ConstructionEvent::Started { cost, .. }) => {
            tracing::info!(planet, ?kind, cost, "Construction started");
        }
        Ok(_) => {}
        Err(reason) => {
            tracing::debug!(planet, ?kind, %reason, "Build request rejected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PlanetData;
    use crate::math::Vec2Fixed;

    fn t(seconds: f64) -> Fixed {
        Fixed::from_num(seconds)
    }

    fn small_galaxy() -> Galaxy {
        let data = GalaxyData {
            name: "Test".to_string(),
            planets: vec![
                PlanetData::new("Home", (100, 100), Faction::Player, 50),
                PlanetData::new("Enemy", (900, 100), Faction::Ai, 40),
                PlanetData::new("Alpha", (300, 300), Faction::Neutral, 20),
                PlanetData::new("Beta", (500, 300), Faction::Neutral, 10),
            ],
        };
        Galaxy::new(&data, GalaxyRules::default()).unwrap()
    }

    #[test]
    fn test_new_galaxy_starts_at_day_one() {
        let galaxy = small_galaxy();
        assert_eq!(galaxy.day(), 1);
        assert_eq!(galaxy.time(), Fixed::ZERO);
        assert_eq!(galaxy.pools().player, 100_000);
        assert_eq!(galaxy.pools().ai, 100_000);
        assert_eq!(galaxy.seconds_until_next_day(), t(30.0));
        assert!(galaxy.fleets().is_empty());
        let names: Vec<_> = galaxy.planets().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Home", "Enemy", "Alpha", "Beta"]);
    }

    #[test]
    fn test_standard_galaxy() {
        let galaxy = Galaxy::standard().unwrap();
        assert_eq!(galaxy.planet_count(), 20);
        assert_eq!(galaxy.daily_income(Faction::Player), 50);
        assert_eq!(galaxy.daily_income(Faction::Ai), 50);
    }

    #[test]
    fn test_day_boundary_pays_income_once() {
        let mut galaxy = small_galaxy();

        for _ in 0..59 {
            assert!(galaxy.tick(t(0.5)).day_advanced.is_none());
        }
        let events = galaxy.tick(t(0.5));

        assert_eq!(
            events.day_advanced,
            Some(DayAdvanced {
                day: 2,
                income: DailyIncome { player: 50, ai: 40 },
            })
        );
        assert_eq!(galaxy.day(), 2);
        assert_eq!(galaxy.day_timer(), Fixed::ZERO);
        assert_eq!(galaxy.pools().player, 100_050);
        assert_eq!(galaxy.pools().ai, 100_040);
    }

    #[test]
    fn test_long_frame_advances_only_one_day() {
        let mut galaxy = small_galaxy();
        let events = galaxy.tick(t(95.0));

        assert_eq!(galaxy.day(), 2);
        assert_eq!(galaxy.day_timer(), Fixed::ZERO);
        assert_eq!(events.day_advanced.map(|d| d.day), Some(2));
        assert_eq!(galaxy.pools().player, 100_050);
    }

    #[test]
    fn test_station_build_through_ticks() {
        let mut galaxy = small_galaxy();
        galaxy.tick(t(1.0));
        galaxy.start_station_build("Home", Faction::Player).unwrap();
        assert_eq!(galaxy.pools().player, 99_500);
        assert_eq!(
            galaxy.remaining_build_time("Home", ConstructionKind::Station),
            Some(t(20.0))
        );

        galaxy.tick(t(19.5));
        assert!(galaxy.planet("Home").unwrap().station_build.is_building());
        assert_eq!(
            galaxy.remaining_build_time("Home", ConstructionKind::Station),
            Some(t(0.5))
        );

        let events = galaxy.tick(t(0.5));
        assert_eq!(
            events.construction,
            vec![ConstructionEvent::StationCompleted {
                planet: "Home".to_string(),
                level: 1,
            }]
        );
        assert!(galaxy.planet("Home").unwrap().has_station());
        assert_eq!(
            galaxy.remaining_build_time("Home", ConstructionKind::Station),
            None
        );
    }

    #[test]
    fn test_build_on_unknown_planet() {
        let mut galaxy = small_galaxy();
        assert_eq!(
            galaxy.start_station_build("Nowhere", Faction::Player),
            Err(BuildRejection::UnknownPlanet)
        );
        assert_eq!(
            galaxy.start_fighter_build("Nowhere", Faction::Player),
            Err(BuildRejection::UnknownPlanet)
        );
    }

    #[test]
    fn test_transfer_conquers_neutral() {
        let mut galaxy = small_galaxy();
        galaxy.set_owner("Alpha", Faction::Player).unwrap();
        let id = galaxy.spawn_fleet("Alpha", Faction::Player, 3).unwrap();

        let transfer = galaxy.transfer_fleet("Alpha", "Beta").unwrap();

        assert_eq!(transfer.fleet, id);
        assert_eq!(transfer.conquered_from, Some(Faction::Neutral));
        assert!(!transfer.merged);
        let beta = galaxy.planet("Beta").unwrap();
        assert_eq!(beta.owner, Faction::Player);
        assert_eq!(beta.fleet, Some(id));
        assert_eq!(galaxy.planet("Alpha").unwrap().fleet, None);
        let fleet = galaxy.fleet(id).unwrap();
        assert_eq!(fleet.fighters, 3);
        assert_eq!(fleet.position, Vec2Fixed::from_num(500, 300));
    }

    #[test]
    fn test_transfer_takes_enemy_planet_without_combat() {
        let mut galaxy = small_galaxy();
        galaxy.spawn_fleet("Home", Faction::Player, 1).unwrap();

        let transfer = galaxy.transfer_fleet("Home", "Enemy").unwrap();

        assert_eq!(transfer.conquered_from, Some(Faction::Ai));
        assert_eq!(galaxy.planet("Enemy").unwrap().owner, Faction::Player);
        assert_eq!(galaxy.daily_income(Faction::Ai), 0);
    }

    #[test]
    fn test_transfer_to_own_planet_merges() {
        let mut galaxy = small_galaxy();
        galaxy.set_owner("Alpha", Faction::Player).unwrap();
        let home_fleet = galaxy.spawn_fleet("Home", Faction::Player, 2).unwrap();
        let alpha_fleet = galaxy.spawn_fleet("Alpha", Faction::Player, 5).unwrap();

        let transfer = galaxy.transfer_fleet("Home", "Alpha").unwrap();

        assert!(transfer.merged);
        assert_eq!(transfer.conquered_from, None);
        assert_eq!(transfer.fleet, alpha_fleet);
        assert_eq!(galaxy.fleet(alpha_fleet).unwrap().fighters, 7);
        assert!(galaxy.fleet(home_fleet).is_none());
        assert_eq!(galaxy.fleets().len(), 1);
    }

    #[test]
    fn test_transfer_displaces_enemy_fleet() {
        let mut galaxy = small_galaxy();
        let attacker = galaxy.spawn_fleet("Home", Faction::Player, 1).unwrap();
        let defender = galaxy.spawn_fleet("Enemy", Faction::Ai, 9).unwrap();

        let transfer = galaxy.transfer_fleet("Home", "Enemy").unwrap();

        assert!(!transfer.merged);
        assert_eq!(transfer.fleet, attacker);
        assert!(galaxy.fleet(defender).is_none());
        assert_eq!(galaxy.planet("Enemy").unwrap().fleet, Some(attacker));
        assert_eq!(galaxy.fleets().len(), 1);
    }

    #[test]
    fn test_transfer_noops() {
        let mut galaxy = small_galaxy();
        let before = galaxy.clone();

        // No fleet at the source
        assert!(galaxy.transfer_fleet("Home", "Alpha").is_none());
        // Same planet
        galaxy.spawn_fleet("Home", Faction::Player, 1).unwrap();
        let with_fleet = galaxy.clone();
        assert!(galaxy.transfer_fleet("Home", "Home").is_none());
        // Unknown target
        assert!(galaxy.transfer_fleet("Home", "Nowhere").is_none());
        assert_eq!(galaxy, with_fleet);
        assert_ne!(galaxy, before);
    }

    #[test]
    fn test_empty_fleet_cannot_move() {
        let mut galaxy = small_galaxy();
        galaxy.spawn_fleet("Home", Faction::Player, 0).unwrap();
        assert!(galaxy.active_fleet_at("Home").is_none());
        assert!(galaxy.transfer_fleet("Home", "Alpha").is_none());
    }

    #[test]
    fn test_spawn_fleet_errors() {
        let mut galaxy = small_galaxy();
        assert!(matches!(
            galaxy.spawn_fleet("Nowhere", Faction::Player, 1),
            Err(GameError::UnknownPlanet(_))
        ));
        assert!(galaxy.spawn_fleet("Alpha", Faction::Neutral, 1).is_err());
        galaxy.spawn_fleet("Alpha", Faction::Player, 1).unwrap();
        assert!(galaxy.spawn_fleet("Alpha", Faction::Player, 1).is_err());
    }

    #[test]
    fn test_fleet_in_transit_moves_each_tick() {
        let mut galaxy = small_galaxy();
        let id = galaxy.spawn_fleet("Home", Faction::Player, 1).unwrap();
        galaxy
            .fleets
            .get_mut(id)
            .unwrap()
            .set_destination(Vec2Fixed::from_num(300, 100));

        assert!(galaxy.tick(t(1.0)).arrivals.is_empty());
        assert_eq!(galaxy.fleet(id).unwrap().position, Vec2Fixed::from_num(200, 100));
        assert_eq!(galaxy.tick(t(1.0)).arrivals, vec![id]);
        assert_eq!(galaxy.home_of(id).map(|p| p.name.as_str()), Some("Home"));
    }

    #[test]
    fn test_state_hash_tracks_changes() {
        let mut a = small_galaxy();
        let mut b = small_galaxy();
        assert_eq!(a.state_hash(), b.state_hash());

        a.tick(t(0.5));
        assert_ne!(a.state_hash(), b.state_hash());
        b.tick(t(0.5));
        assert_eq!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut galaxy = small_galaxy();
        galaxy.spawn_fleet("Home", Faction::Player, 4).unwrap();
        galaxy.start_station_build("Home", Faction::Player).unwrap();
        galaxy.tick(t(3.25));

        let bytes = galaxy.serialize().unwrap();
        let restored = Galaxy::deserialize(&bytes).unwrap();

        assert_eq!(restored, galaxy);
        assert_eq!(restored.state_hash(), galaxy.state_hash());
    }
}
