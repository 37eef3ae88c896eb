//! The game aggregate: galaxy plus presentation state, driven per frame.
//!
//! [`Game`] is what a front end (window, headless runner, test) talks to.
//! It routes screen-space pointer input through the camera into the drag
//! controller, issues build commands as the player, and produces a
//! read-only [`GameSnapshot`] for rendering.

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, PanInput};
use crate::config::GalaxyRules;
use crate::construction::{BuildRejection, ConstructionEvent, ConstructionKind};
use crate::data::GalaxyData;
use crate::economy::ResourcePools;
use crate::error::{GameError, Result};
use crate::factions::Faction;
use crate::fleet::FleetId;
use crate::galaxy::{Galaxy, TickEvents};
use crate::interaction::{DragController, DragState, InteractionOutcome, PointerEvent};
use crate::math::{fixed_serde, Fixed, Vec2Fixed};
use crate::view::{ViewMode, ViewState};

/// One player action, in screen coordinates where positional.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameCommand {
    /// Pointer pressed at a screen position.
    PointerDown(Vec2Fixed),
    /// Pointer released at a screen position.
    PointerUp(Vec2Fixed),
    /// Pointer moved to a screen position.
    PointerMove(Vec2Fixed),
    /// Start the next station level on a planet.
    BuildStation(String),
    /// Start a fighter on a planet.
    BuildFighter(String),
}

/// Result of applying a [`GameCommand`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    /// A pointer event was handled.
    Pointer(InteractionOutcome),
    /// A build started.
    BuildStarted(ConstructionEvent),
    /// A build request was refused; nothing changed.
    BuildRejected(BuildRejection),
}

/// Everything that happens in one frame.
///
/// Commands are applied first, in order, then the simulation advances by
/// `dt`. A zero `dt` applies the commands without advancing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameInput {
    /// Frame duration in seconds.
    #[serde(with = "fixed_serde")]
    pub dt: Fixed,
    /// Keys held for camera panning.
    pub pan: PanInput,
    /// Player actions issued since the previous frame.
    pub commands: Vec<GameCommand>,
}

impl FrameInput {
    /// A frame with no player actions.
    #[must_use]
    pub const fn idle(dt: Fixed) -> Self {
        Self {
            dt,
            pan: PanInput::NONE,
            commands: Vec::new(),
        }
    }

    /// Commands only, no time passing.
    #[must_use]
    pub const fn commands_only(commands: Vec<GameCommand>) -> Self {
        Self {
            dt: Fixed::ZERO,
            pan: PanInput::NONE,
            commands,
        }
    }
}

/// What one call to [`Game::step`] produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Outcome of each command, in input order.
    pub commands: Vec<CommandOutcome>,
    /// Simulation events; empty when `dt` was zero.
    pub tick: TickEvents,
}

/// Render-facing view of one planet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetSnapshot {
    /// Planet name.
    pub name: String,
    /// World position.
    pub position: Vec2Fixed,
    /// Current owner.
    pub owner: Faction,
    /// Daily income rate.
    pub resource_rate: u32,
    /// Station level; 0 means none.
    pub station_level: u8,
    /// Seconds until the station upgrade finishes, if one is running.
    #[serde(with = "crate::math::option_fixed_serde")]
    pub station_remaining: Option<Fixed>,
    /// Seconds until the fighter finishes, if one is running.
    #[serde(with = "crate::math::option_fixed_serde")]
    pub fighter_remaining: Option<Fixed>,
    /// Fleet stationed here.
    pub fleet: Option<FleetId>,
    /// Flavour text.
    pub lore: Vec<String>,
}

impl PlanetSnapshot {
    /// Whether a station of any level exists.
    #[must_use]
    pub const fn has_station(&self) -> bool {
        self.station_level >= 1
    }
}

/// Render-facing view of one fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    /// Fleet id.
    pub id: FleetId,
    /// Owner.
    pub owner: Faction,
    /// Fighter count.
    pub fighters: u32,
    /// World position.
    pub position: Vec2Fixed,
    /// Travel target, if moving.
    pub destination: Option<Vec2Fixed>,
    /// Planet holding the fleet.
    pub home: Option<String>,
}

/// Drag line from the source planet to the pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragIndicator {
    /// Planet the fleet is dragged from.
    pub source: String,
    /// Dragged fleet.
    pub fleet: FleetId,
    /// Pointer position in world coordinates.
    pub pointer: Vec2Fixed,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Frames run so far.
    pub frame: u64,
    /// Current day.
    pub day: u32,
    /// Seconds until the next day.
    #[serde(with = "fixed_serde")]
    pub seconds_until_next_day: Fixed,
    /// Resource pools.
    pub pools: ResourcePools,
    /// Player income per day at current ownership.
    pub player_income: i64,
    /// AI income per day at current ownership.
    pub ai_income: i64,
    /// All planets in table order.
    pub planets: Vec<PlanetSnapshot>,
    /// Fleets with fighters, in id order.
    pub fleets: Vec<FleetSnapshot>,
    /// Current zoom.
    #[serde(with = "fixed_serde")]
    pub zoom: Fixed,
    /// Derived view mode.
    pub mode: ViewMode,
    /// Selected planet.
    pub selected: Option<String>,
    /// Camera top-left corner.
    pub camera: Vec2Fixed,
    /// Largest camera position.
    pub camera_bounds: Vec2Fixed,
    /// Fleet drag in progress.
    pub drag: Option<DragIndicator>,
}

/// A running game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    galaxy: Galaxy,
    view: ViewState,
    camera: Camera,
    drag: DragController,
}

impl Game {
    /// Start a game on a planet table.
    ///
    /// The camera starts centred on the first planet.
    ///
    /// # Errors
    ///
    /// Fails when the table or rules are invalid.
    pub fn new(data: &GalaxyData, rules: GalaxyRules) -> Result<Self> {
        let galaxy = Galaxy::new(data, rules)?;
        let focus = galaxy
            .planets()
            .next()
            .map(|planet| planet.position)
            .ok_or_else(|| GameError::InvalidGalaxyData("no planets".to_string()))?;
        let camera = Camera::centered_on(focus, galaxy.rules());

        Ok(Self {
            galaxy,
            view: ViewState::new(),
            camera,
            drag: DragController::new(Faction::Player),
        })
    }

    /// Standard galaxy with default rules.
    ///
    /// # Errors
    ///
    /// Fails only if the embedded table is broken.
    pub fn standard() -> Result<Self> {
        Self::new(&GalaxyData::standard()?, GalaxyRules::default())
    }

    /// The simulation state.
    #[must_use]
    pub const fn galaxy(&self) -> &Galaxy {
        &self.galaxy
    }

    /// Mutable simulation state, for scenario setup.
    pub fn galaxy_mut(&mut self) -> &mut Galaxy {
        &mut self.galaxy
    }

    /// Zoom and selection.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Current view mode.
    #[must_use]
    pub fn mode(&self) -> ViewMode {
        self.view.mode(self.galaxy.rules())
    }

    /// The camera.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The pointer state machine.
    #[must_use]
    pub const fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Run one frame: galaxy tick, zoom update, then camera pan.
    ///
    /// The camera only pans in overview mode.
    pub fn frame(&mut self, dt: Fixed, pan: PanInput) -> TickEvents {
        let events = self.galaxy.tick(dt);
        self.view.update(self.galaxy.rules());
        if self.mode() == ViewMode::Overview {
            self.camera.pan(pan, self.galaxy.rules());
        }
        events
    }

    /// Apply a recorded frame: its commands, then (for nonzero `dt`) a frame.
    pub fn step(&mut self, input: &FrameInput) -> FrameReport {
        let commands = input
            .commands
            .iter()
            .map(|command| self.apply(command))
            .collect();
        let tick = if input.dt > Fixed::ZERO {
            self.frame(input.dt, input.pan)
        } else {
            TickEvents::default()
        };
        FrameReport { commands, tick }
    }

    /// Apply one player action.
    pub fn apply(&mut self, command: &GameCommand) -> CommandOutcome {
        match command {
            GameCommand::PointerDown(screen) => {
                CommandOutcome::Pointer(self.pointer(PointerEvent::Down(self.to_world(*screen))))
            }
            GameCommand::PointerUp(screen) => {
                CommandOutcome::Pointer(self.pointer(PointerEvent::Up(self.to_world(*screen))))
            }
            GameCommand::PointerMove(screen) => {
                CommandOutcome::Pointer(self.pointer(PointerEvent::Move(self.to_world(*screen))))
            }
            GameCommand::BuildStation(name) => self.build(name, ConstructionKind::Station),
            GameCommand::BuildFighter(name) => self.build(name, ConstructionKind::Fighter),
        }
    }

    /// Pointer pressed at a screen position.
    pub fn pointer_down(&mut self, screen: Vec2Fixed) -> InteractionOutcome {
        self.pointer(PointerEvent::Down(self.to_world(screen)))
    }

    /// Pointer released at a screen position.
    pub fn pointer_up(&mut self, screen: Vec2Fixed) -> InteractionOutcome {
        self.pointer(PointerEvent::Up(self.to_world(screen)))
    }

    /// Pointer moved to a screen position.
    pub fn pointer_move(&mut self, screen: Vec2Fixed) -> InteractionOutcome {
        self.pointer(PointerEvent::Move(self.to_world(screen)))
    }

    /// Start the next station level on a player planet.
    pub fn build_station(
        &mut self,
        name: &str,
    ) -> std::result::Result<ConstructionEvent, BuildRejection> {
        self.galaxy.start_station_build(name, Faction::Player)
    }

    /// Start a fighter on a player planet.
    pub fn build_fighter(
        &mut self,
        name: &str,
    ) -> std::result::Result<ConstructionEvent, BuildRejection> {
        self.galaxy.start_fighter_build(name, Faction::Player)
    }

    fn build(&mut self, name: &str, kind: ConstructionKind) -> CommandOutcome {
        let result = match kind {
            ConstructionKind::Station => self.build_station(name),
            ConstructionKind::Fighter => self.build_fighter(name),
        };
        match result {
            Ok(event) => CommandOutcome::BuildStarted(event),
            Err(reason) => CommandOutcome::BuildRejected(reason),
        }
    }

    fn to_world(&self, screen: Vec2Fixed) -> Vec2Fixed {
        self.camera.screen_to_world(screen)
    }

    fn pointer(&mut self, event: PointerEvent) -> InteractionOutcome {
        // The galaxy map is not shown in detail mode; presses there hit nothing
        if matches!(event, PointerEvent::Down(_)) && self.mode() == ViewMode::PlanetDetail {
            return InteractionOutcome::Nothing;
        }
        self.drag.handle(event, &mut self.galaxy, &mut self.view)
    }

    /// Hash of the whole game, presentation state included.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        use std::hash::{Hash, Hasher};

        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.galaxy.state_hash().hash(&mut hasher);
        self.view.hash(&mut hasher);
        self.camera.hash(&mut hasher);
        self.drag.hash(&mut hasher);
        hasher.finish()
    }

    /// Capture everything a renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        let galaxy = &self.galaxy;

        let planets = galaxy
            .planets()
            .map(|planet| PlanetSnapshot {
                name: planet.name.clone(),
                position: planet.position,
                owner: planet.owner,
                resource_rate: planet.resource_rate,
                station_level: planet.station_level,
                station_remaining: galaxy
                    .remaining_build_time(&planet.name, ConstructionKind::Station),
                fighter_remaining: galaxy
                    .remaining_build_time(&planet.name, ConstructionKind::Fighter),
                fleet: planet.fleet,
                lore: planet.lore.clone(),
            })
            .collect();

        let fleets = galaxy
            .fleets()
            .iter()
            .filter(|fleet| fleet.is_active())
            .map(|fleet| FleetSnapshot {
                id: fleet.id,
                owner: fleet.owner,
                fighters: fleet.fighters,
                position: fleet.position,
                destination: fleet.destination,
                home: galaxy.home_of(fleet.id).map(|planet| planet.name.clone()),
            })
            .collect();

        let drag = match self.drag.state() {
            DragState::Idle => None,
            DragState::DraggingFleet {
                source,
                fleet,
                pointer,
            } => Some(DragIndicator {
                source: source.clone(),
                fleet: *fleet,
                pointer: *pointer,
            }),
        };

        GameSnapshot {
            frame: galaxy.frame(),
            day: galaxy.day(),
            seconds_until_next_day: galaxy.seconds_until_next_day(),
            pools: *galaxy.pools(),
            player_income: galaxy.daily_income(Faction::Player),
            ai_income: galaxy.daily_income(Faction::Ai),
            planets,
            fleets,
            zoom: self.view.zoom(),
            mode: self.mode(),
            selected: self.view.selected().map(str::to_string),
            camera: self.camera.position(),
            camera_bounds: self.camera.bounds(),
            drag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(seconds: f64) -> Fixed {
        Fixed::from_num(seconds)
    }

    fn screen_of(game: &Game, name: &str) -> Vec2Fixed {
        let planet = game.galaxy().planet(name).unwrap();
        game.camera().world_to_screen(planet.position)
    }

    #[test]
    fn test_standard_game_starts_over_capital() {
        let game = Game::standard().unwrap();
        let snapshot = game.snapshot();

        assert_eq!(snapshot.day, 1);
        assert_eq!(snapshot.mode, ViewMode::Overview);
        assert_eq!(snapshot.planets.len(), 20);
        assert!(snapshot.fleets.is_empty());
        assert_eq!(snapshot.drag, None);

        let capital = &snapshot.planets[0];
        let on_screen = game.camera().world_to_screen(capital.position);
        assert!(on_screen.x >= Fixed::ZERO && on_screen.x <= game.galaxy().rules().viewport_width);
        assert!(on_screen.y >= Fixed::ZERO && on_screen.y <= game.galaxy().rules().viewport_height);
    }

    #[test]
    fn test_click_selects_and_zooms_to_detail() {
        let mut game = Game::standard().unwrap();
        let capital = game.galaxy().planets().next().unwrap().name.clone();
        let screen = screen_of(&game, &capital);

        let outcome = game.pointer_down(screen);
        assert_eq!(outcome, InteractionOutcome::PlanetSelected(capital.clone()));

        for _ in 0..10 {
            game.frame(t(0.25), PanInput::NONE);
        }
        assert_eq!(game.mode(), ViewMode::PlanetDetail);
        assert_eq!(game.snapshot().selected, Some(capital));
    }

    #[test]
    fn test_camera_frozen_in_detail_mode() {
        let mut game = Game::standard().unwrap();
        let pan = PanInput {
            left: true,
            ..PanInput::NONE
        };

        let start = game.camera().position();
        game.frame(t(0.25), pan);
        assert_ne!(game.camera().position(), start);

        let capital = game.galaxy().planets().next().unwrap().name.clone();
        let screen = screen_of(&game, &capital);
        game.pointer_down(screen);
        for _ in 0..20 {
            game.frame(t(0.25), PanInput::NONE);
        }
        let frozen = game.camera().position();
        game.frame(t(0.25), pan);
        assert_eq!(game.camera().position(), frozen);
    }

    #[test]
    fn test_step_applies_commands_then_ticks() {
        let mut game = Game::standard().unwrap();
        let capital = game.galaxy().planets().next().unwrap().name.clone();

        let report = game.step(&FrameInput {
            dt: t(0.5),
            pan: PanInput::NONE,
            commands: vec![
                GameCommand::BuildStation(capital.clone()),
                GameCommand::BuildStation(capital.clone()),
            ],
        });

        assert!(matches!(report.commands[0], CommandOutcome::BuildStarted(_)));
        assert_eq!(
            report.commands[1],
            CommandOutcome::BuildRejected(BuildRejection::AlreadyBuilding)
        );
        assert_eq!(game.galaxy().frame(), 1);
        let planet = &game.snapshot().planets[0];
        assert_eq!(planet.station_remaining, Some(t(19.5)));
    }

    #[test]
    fn test_zero_dt_step_does_not_tick() {
        let mut game = Game::standard().unwrap();
        let report = game.step(&FrameInput::commands_only(vec![GameCommand::PointerMove(
            Vec2Fixed::ZERO,
        )]));
        assert_eq!(game.galaxy().frame(), 0);
        assert_eq!(report.commands.len(), 1);
        assert_eq!(report.tick, TickEvents::default());
    }

    #[test]
    fn test_drag_shows_indicator_then_moves_fleet() {
        let mut game = Game::standard().unwrap();
        let capital = game.galaxy().planets().next().unwrap().name.clone();
        let id = game
            .galaxy_mut()
            .spawn_fleet(&capital, Faction::Player, 2)
            .unwrap();
        let target = game
            .galaxy()
            .planets()
            .find(|p| p.owner == Faction::Neutral)
            .map(|p| p.name.clone())
            .unwrap();

        let marker = screen_of(&game, &capital) - Vec2Fixed::from_num(0, 60);
        assert!(matches!(
            game.pointer_down(marker),
            InteractionOutcome::DragStarted { .. }
        ));
        game.pointer_move(Vec2Fixed::from_num(5, 5));
        let indicator = game.snapshot().drag.unwrap();
        assert_eq!(indicator.source, capital);
        assert_eq!(
            indicator.pointer,
            game.camera().screen_to_world(Vec2Fixed::from_num(5, 5))
        );

        let outcome = game.pointer_up(screen_of(&game, &target));
        assert!(matches!(outcome, InteractionOutcome::FleetMoved(_)));
        let snapshot = game.snapshot();
        assert_eq!(snapshot.drag, None);
        assert_eq!(snapshot.fleets.len(), 1);
        assert_eq!(snapshot.fleets[0].id, id);
        assert_eq!(snapshot.fleets[0].home.as_deref(), Some(target.as_str()));
    }
}
