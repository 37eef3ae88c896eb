//! Pointer interaction: planet selection and fleet drag-and-drop.
//!
//! [`DragController`] is a two-state machine fed with pointer events in
//! world coordinates. It knows nothing about any input library; the
//! outer layer converts its own events into [`PointerEvent`]s.
//!
//! ```text
//!            down on own fleet marker
//!   Idle ──────────────────────────────▶ DraggingFleet
//!    ▲  down on planet: select + zoom        │  move: update pointer
//!    │                                       │
//!    └────────── up: drop or cancel ◀────────┘
//! ```
//!
//! Fleet markers are tested before planets, so a press on a marker never
//! also selects a planet.

use serde::{Deserialize, Serialize};

use crate::factions::Faction;
use crate::fleet::{Fleet, FleetId};
use crate::galaxy::{FleetTransfer, Galaxy};
use crate::math::{Fixed, Vec2Fixed};
use crate::planet::Planet;
use crate::view::ViewState;

/// A pointer event in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Button pressed.
    Down(Vec2Fixed),
    /// Button released.
    Up(Vec2Fixed),
    /// Pointer moved.
    Move(Vec2Fixed),
}

/// Drag state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DragState {
    /// Nothing held.
    #[default]
    Idle,
    /// A fleet is being dragged.
    DraggingFleet {
        /// Planet the fleet was picked up from.
        source: String,
        /// Fleet being dragged.
        fleet: FleetId,
        /// Last known pointer position.
        pointer: Vec2Fixed,
    },
}

/// What a pointer event did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionOutcome {
    /// Nothing was hit or nothing changed.
    Nothing,
    /// A planet was selected and the view starts zooming in.
    PlanetSelected(String),
    /// A fleet was picked up.
    DragStarted {
        /// Planet the fleet sits at.
        source: String,
        /// Picked fleet.
        fleet: FleetId,
    },
    /// The dragged fleet moved to another planet.
    FleetMoved(FleetTransfer),
    /// The drag ended without a valid target; nothing moved.
    DragCancelled {
        /// Planet the fleet stays at.
        source: String,
    },
}

/// Returns the planet whose fleet marker contains `point`, with its fleet.
///
/// Only fleets with fighters have a marker. Planets are scanned in table
/// order and the first hit wins.
#[must_use]
pub fn fleet_marker_at(galaxy: &Galaxy, point: Vec2Fixed) -> Option<(&Planet, &Fleet)> {
    let rules = galaxy.rules();
    galaxy.planets().find_map(|planet| {
        let fleet = galaxy.active_fleet_at(&planet.name)?;
        let marker = fleet_marker_position(planet, galaxy);
        point
            .within(marker, rules.fleet_click_radius)
            .then_some((planet, fleet))
    })
}

/// Where a planet's fleet marker is drawn and hit-tested.
#[must_use]
pub fn fleet_marker_position(planet: &Planet, galaxy: &Galaxy) -> Vec2Fixed {
    planet.position - Vec2Fixed::new(Fixed::ZERO, galaxy.rules().fleet_marker_offset)
}

/// Returns the first planet whose click radius contains `point`.
#[must_use]
pub fn planet_at(galaxy: &Galaxy, point: Vec2Fixed) -> Option<&Planet> {
    let radius = galaxy.rules().planet_radius;
    galaxy.planets().find(|planet| point.within(planet.position, radius))
}

/// Pointer state machine acting for one faction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DragController {
    faction: Faction,
    state: DragState,
}

impl DragController {
    /// Controller that may drag fleets owned by `faction`.
    #[must_use]
    pub const fn new(faction: Faction) -> Self {
        Self {
            faction,
            state: DragState::Idle,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    /// Faction whose fleets this controller moves.
    #[must_use]
    pub const fn faction(&self) -> Faction {
        self.faction
    }

    /// Whether a fleet is being dragged.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::DraggingFleet { .. })
    }

    /// Feed one pointer event.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        galaxy: &mut Galaxy,
        view: &mut ViewState,
    ) -> InteractionOutcome {
        match event {
            PointerEvent::Down(point) => self.pointer_down(point, galaxy, view),
            PointerEvent::Move(point) => {
                if let DragState::DraggingFleet { pointer, .. } = &mut self.state {
                    *pointer = point;
                }
                InteractionOutcome::Nothing
            }
            PointerEvent::Up(point) => self.pointer_up(point, galaxy),
        }
    }

    fn pointer_down(
        &mut self,
        point: Vec2Fixed,
        galaxy: &Galaxy,
        view: &mut ViewState,
    ) -> InteractionOutcome {
        if self.is_dragging() {
            return InteractionOutcome::Nothing;
        }

        if let Some((planet, fleet)) = fleet_marker_at(galaxy, point) {
            if fleet.owner == self.faction {
                tracing::debug!(planet = %planet.name, fleet = %fleet.id, "Fleet picked up");
                self.state = DragState::DraggingFleet {
                    source: planet.name.clone(),
                    fleet: fleet.id,
                    pointer: point,
                };
                return InteractionOutcome::DragStarted {
                    source: planet.name.clone(),
                    fleet: fleet.id,
                };
            }
        }

        match planet_at(galaxy, point) {
            Some(planet) => {
                view.select_planet(planet.name.clone());
                InteractionOutcome::PlanetSelected(planet.name.clone())
            }
            None => InteractionOutcome::Nothing,
        }
    }

    fn pointer_up(&mut self, point: Vec2Fixed, galaxy: &mut Galaxy) -> InteractionOutcome {
        let DragState::DraggingFleet { source, fleet, .. } = std::mem::take(&mut self.state)
        else {
            return InteractionOutcome::Nothing;
        };

        let target = planet_at(galaxy, point)
            .map(|planet| planet.name.clone())
            .filter(|name| *name != source);
        let still_there = galaxy.active_fleet_at(&source).map(|f| f.id) == Some(fleet);

        let transfer = match target {
            Some(target) if still_there => galaxy.transfer_fleet(&source, &target),
            _ => None,
        };

        match transfer {
            Some(transfer) => {
                tracing::debug!(from = %transfer.from, to = %transfer.to, "Fleet dropped");
                InteractionOutcome::FleetMoved(transfer)
            }
            None => {
                tracing::debug!(planet = %source, "Fleet drag cancelled");
                InteractionOutcome::DragCancelled { source }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GalaxyRules;
    use crate::data::{GalaxyData, PlanetData};

    fn setup() -> (Galaxy, ViewState, DragController) {
        let data = GalaxyData {
            name: "Test".to_string(),
            planets: vec![
                PlanetData::new("A", (200, 200), Faction::Neutral, 10),
                PlanetData::new("B", (600, 200), Faction::Neutral, 10),
                PlanetData::new("C", (600, 600), Faction::Ai, 10),
            ],
        };
        let mut galaxy = Galaxy::new(&data, GalaxyRules::default()).unwrap();
        galaxy.set_owner("A", Faction::Player).unwrap();
        (galaxy, ViewState::new(), DragController::new(Faction::Player))
    }

    fn p(x: i32, y: i32) -> Vec2Fixed {
        Vec2Fixed::from_num(x, y)
    }

    #[test]
    fn test_drag_conquers_neutral_planet() {
        let (mut galaxy, mut view, mut drag) = setup();
        let id = galaxy.spawn_fleet("A", Faction::Player, 3).unwrap();

        // Marker of A is at (200, 140)
        let outcome = drag.handle(PointerEvent::Down(p(200, 140)), &mut galaxy, &mut view);
        assert_eq!(
            outcome,
            InteractionOutcome::DragStarted {
                source: "A".to_string(),
                fleet: id,
            }
        );
        assert_eq!(view.selected(), None);

        drag.handle(PointerEvent::Move(p(400, 200)), &mut galaxy, &mut view);
        assert!(matches!(
            drag.state(),
            DragState::DraggingFleet { pointer, .. } if *pointer == p(400, 200)
        ));

        let outcome = drag.handle(PointerEvent::Up(p(610, 190)), &mut galaxy, &mut view);

        assert!(matches!(outcome, InteractionOutcome::FleetMoved(_)));
        assert_eq!(*drag.state(), DragState::Idle);
        let b = galaxy.planet("B").unwrap();
        assert_eq!(b.owner, Faction::Player);
        assert_eq!(b.fleet, Some(id));
        assert_eq!(galaxy.planet("A").unwrap().fleet, None);
        let fleet = galaxy.fleet(id).unwrap();
        assert_eq!(fleet.fighters, 3);
        assert_eq!(fleet.position, p(600, 200));
    }

    #[test]
    fn test_drop_on_source_cancels() {
        let (mut galaxy, mut view, mut drag) = setup();
        galaxy.spawn_fleet("A", Faction::Player, 3).unwrap();
        let before = galaxy.clone();

        drag.handle(PointerEvent::Down(p(200, 140)), &mut galaxy, &mut view);
        let outcome = drag.handle(PointerEvent::Up(p(200, 200)), &mut galaxy, &mut view);

        assert_eq!(
            outcome,
            InteractionOutcome::DragCancelled {
                source: "A".to_string()
            }
        );
        assert_eq!(galaxy, before);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_drop_on_empty_space_cancels() {
        let (mut galaxy, mut view, mut drag) = setup();
        galaxy.spawn_fleet("A", Faction::Player, 3).unwrap();
        let before = galaxy.clone();

        drag.handle(PointerEvent::Down(p(200, 140)), &mut galaxy, &mut view);
        let outcome = drag.handle(PointerEvent::Up(p(400, 400)), &mut galaxy, &mut view);

        assert!(matches!(outcome, InteractionOutcome::DragCancelled { .. }));
        assert_eq!(galaxy, before);
    }

    #[test]
    fn test_click_on_planet_selects_and_zooms() {
        let (mut galaxy, mut view, mut drag) = setup();

        let outcome = drag.handle(PointerEvent::Down(p(630, 630)), &mut galaxy, &mut view);

        assert_eq!(outcome, InteractionOutcome::PlanetSelected("C".to_string()));
        assert_eq!(view.selected(), Some("C"));
        assert_eq!(view.target_zoom(), Fixed::ONE);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_click_on_nothing_keeps_selection() {
        let (mut galaxy, mut view, mut drag) = setup();
        drag.handle(PointerEvent::Down(p(200, 200)), &mut galaxy, &mut view);

        let outcome = drag.handle(PointerEvent::Down(p(1000, 1000)), &mut galaxy, &mut view);

        assert_eq!(outcome, InteractionOutcome::Nothing);
        assert_eq!(view.selected(), Some("A"));
    }

    #[test]
    fn test_enemy_fleet_cannot_be_dragged() {
        let (mut galaxy, mut view, mut drag) = setup();
        galaxy.spawn_fleet("C", Faction::Ai, 2).unwrap();

        let outcome = drag.handle(PointerEvent::Down(p(600, 540)), &mut galaxy, &mut view);

        assert_eq!(outcome, InteractionOutcome::Nothing);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_empty_fleet_has_no_marker() {
        let (mut galaxy, _, _) = setup();
        galaxy.spawn_fleet("A", Faction::Player, 0).unwrap();
        assert!(fleet_marker_at(&galaxy, p(200, 140)).is_none());
    }

    #[test]
    fn test_hit_radius_is_inclusive() {
        let (galaxy, _, _) = setup();
        assert_eq!(planet_at(&galaxy, p(240, 200)).map(|p| p.name.as_str()), Some("A"));
        assert!(planet_at(&galaxy, p(241, 200)).is_none());
    }

    #[test]
    fn test_pointer_up_while_idle_is_ignored() {
        let (mut galaxy, mut view, mut drag) = setup();
        let before = galaxy.clone();
        let outcome = drag.handle(PointerEvent::Up(p(600, 200)), &mut galaxy, &mut view);
        assert_eq!(outcome, InteractionOutcome::Nothing);
        assert_eq!(galaxy, before);
    }
}
