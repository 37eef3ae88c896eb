//! Fleets and the fleet registry.
//!
//! Fleets live in a single [`FleetRegistry`] keyed by [`FleetId`]. A planet
//! refers to its fleet by id and never holds a copy, so there is exactly
//! one authoritative record per fleet.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::factions::Faction;
use crate::math::{Fixed, Vec2Fixed};

/// Unique identifier for a fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FleetId(pub u32);

impl std::fmt::Display for FleetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fleet#{}", self.0)
    }
}

/// A faction-owned group of fighters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fleet {
    /// Registry id.
    pub id: FleetId,
    /// Owning faction.
    pub owner: Faction,
    /// Number of fighters. A fleet with zero fighters is inert.
    pub fighters: u32,
    /// Current world position.
    pub position: Vec2Fixed,
    /// Travel target; `Some` exactly while the fleet is in transit.
    pub destination: Option<Vec2Fixed>,
}

impl Fleet {
    /// Whether the fleet is travelling.
    #[must_use]
    pub const fn in_transit(&self) -> bool {
        self.destination.is_some()
    }

    /// Whether the fleet can be picked up and moved.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.fighters > 0
    }

    /// Send the fleet toward a point.
    pub fn set_destination(&mut self, destination: Vec2Fixed) {
        self.destination = Some(destination);
    }

    /// Move toward the destination at `speed` for `dt` seconds.
    ///
    /// Straight-line motion with no acceleration. If the destination is
    /// within reach this frame the fleet snaps onto it and stops, so it
    /// never overshoots. Returns true on the frame the fleet arrives.
    pub fn advance(&mut self, speed: Fixed, dt: Fixed) -> bool {
        let Some(destination) = self.destination else {
            return false;
        };

        let step = speed.saturating_mul(dt);
        if self.position.within(destination, step) {
            self.position = destination;
            self.destination = None;
            return true;
        }

        let direction = (destination - self.position).normalize();
        self.position += direction.scale(step);
        false
    }

    /// Place the fleet at a point and cancel any travel.
    pub fn teleport(&mut self, position: Vec2Fixed) {
        self.position = position;
        self.destination = None;
    }
}

/// Storage for every fleet in the galaxy.
///
/// Ordered by id so iteration is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetRegistry {
    fleets: BTreeMap<FleetId, Fleet>,
    next_id: u32,
}

impl FleetRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fleets: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Create a stationary fleet and return its id.
    pub fn spawn(&mut self, owner: Faction, fighters: u32, position: Vec2Fixed) -> FleetId {
        let id = FleetId(self.next_id);
        self.next_id += 1;
        self.fleets.insert(
            id,
            Fleet {
                id,
                owner,
                fighters,
                position,
                destination: None,
            },
        );
        id
    }

    /// Remove a fleet by id.
    pub fn remove(&mut self, id: FleetId) -> Option<Fleet> {
        self.fleets.remove(&id)
    }

    /// Get a fleet by id.
    #[must_use]
    pub fn get(&self, id: FleetId) -> Option<&Fleet> {
        self.fleets.get(&id)
    }

    /// Get a mutable reference to a fleet by id.
    pub fn get_mut(&mut self, id: FleetId) -> Option<&mut Fleet> {
        self.fleets.get_mut(&id)
    }

    /// Get the number of fleets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fleets.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fleets.is_empty()
    }

    /// Iterate over fleets in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Fleet> {
        self.fleets.values()
    }

    /// Advance every fleet in transit. Returns the ids that arrived.
    pub fn advance_all(&mut self, speed: Fixed, dt: Fixed) -> Vec<FleetId> {
        self.fleets
            .values_mut()
            .filter_map(|fleet| fleet.advance(speed, dt).then_some(fleet.id))
            .collect()
    }
}

impl Default for FleetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet_at(position: Vec2Fixed) -> Fleet {
        Fleet {
            id: FleetId(1),
            owner: Faction::Player,
            fighters: 3,
            position,
            destination: None,
        }
    }

    #[test]
    fn test_stationary_fleet_does_not_move() {
        let mut fleet = fleet_at(Vec2Fixed::from_num(5, 5));
        assert!(!fleet.advance(Fixed::from_num(100), Fixed::from_num(1)));
        assert_eq!(fleet.position, Vec2Fixed::from_num(5, 5));
    }

    #[test]
    fn test_fleet_moves_toward_destination() {
        let mut fleet = fleet_at(Vec2Fixed::ZERO);
        fleet.set_destination(Vec2Fixed::from_num(100, 0));

        let arrived = fleet.advance(Fixed::from_num(100), Fixed::from_num(0.25));

        assert!(!arrived);
        assert_eq!(fleet.position, Vec2Fixed::from_num(25, 0));
        assert!(fleet.in_transit());
    }

    #[test]
    fn test_fleet_snaps_on_arrival() {
        let mut fleet = fleet_at(Vec2Fixed::ZERO);
        fleet.set_destination(Vec2Fixed::from_num(100, 0));

        // dt = distance / speed exactly
        let arrived = fleet.advance(Fixed::from_num(100), Fixed::from_num(1));

        assert!(arrived);
        assert_eq!(fleet.position, Vec2Fixed::from_num(100, 0));
        assert_eq!(fleet.destination, None);
    }

    #[test]
    fn test_fleet_never_overshoots() {
        let mut fleet = fleet_at(Vec2Fixed::ZERO);
        fleet.set_destination(Vec2Fixed::from_num(30, 40));

        assert!(fleet.advance(Fixed::from_num(100), Fixed::from_num(5)));
        assert_eq!(fleet.position, Vec2Fixed::from_num(30, 40));
    }

    #[test]
    fn test_diagonal_travel_stays_on_line() {
        let mut fleet = fleet_at(Vec2Fixed::ZERO);
        fleet.set_destination(Vec2Fixed::from_num(300, 400));

        fleet.advance(Fixed::from_num(100), Fixed::from_num(1));

        let epsilon = Fixed::from_num(0.001);
        assert!((fleet.position.x - Fixed::from_num(60)).abs() < epsilon);
        assert!((fleet.position.y - Fixed::from_num(80)).abs() < epsilon);
    }

    #[test]
    fn test_registry_ids_are_sequential() {
        let mut registry = FleetRegistry::new();
        let a = registry.spawn(Faction::Player, 1, Vec2Fixed::ZERO);
        let b = registry.spawn(Faction::Ai, 2, Vec2Fixed::ZERO);
        assert_eq!(a, FleetId(1));
        assert_eq!(b, FleetId(2));
        assert_eq!(registry.len(), 2);

        registry.remove(a);
        let c = registry.spawn(Faction::Player, 1, Vec2Fixed::ZERO);
        assert_eq!(c, FleetId(3));
        assert_eq!(registry.iter().map(|f| f.id).collect::<Vec<_>>(), vec![b, c]);
    }

    #[test]
    fn test_advance_all_reports_arrivals() {
        let mut registry = FleetRegistry::new();
        let near = registry.spawn(Faction::Player, 1, Vec2Fixed::ZERO);
        let far = registry.spawn(Faction::Player, 1, Vec2Fixed::ZERO);
        registry
            .get_mut(near)
            .unwrap()
            .set_destination(Vec2Fixed::from_num(10, 0));
        registry
            .get_mut(far)
            .unwrap()
            .set_destination(Vec2Fixed::from_num(1000, 0));

        let arrived = registry.advance_all(Fixed::from_num(100), Fixed::from_num(0.5));

        assert_eq!(arrived, vec![near]);
        assert!(registry.get(far).unwrap().in_transit());
    }
}
