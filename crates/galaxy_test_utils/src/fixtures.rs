//! Test fixtures and helpers.
//!
//! Small galaxies and scripted sessions for consistent testing.

use fixed::types::I32F32;
use galaxy_core::camera::PanInput;
use galaxy_core::config::GalaxyRules;
use galaxy_core::data::{GalaxyData, PlanetData};
use galaxy_core::factions::Faction;
use galaxy_core::galaxy::Galaxy;
use galaxy_core::game::{FrameInput, Game, GameCommand};
use galaxy_core::math::Vec2Fixed;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// A quarter second; exactly representable, so timers land on exact values.
#[must_use]
pub fn quarter_second() -> I32F32 {
    fixed_f(0.25)
}

/// Player capital of the duel galaxy.
pub const HOME: &str = "Home";
/// AI capital of the duel galaxy.
pub const AWAY: &str = "Away";
/// Neutral planet next to the player capital.
pub const OUTPOST: &str = "Outpost";
/// Neutral planet in the middle of the map.
pub const FRONTIER: &str = "Frontier";

/// Four-planet galaxy: one capital each and two neutral planets.
///
/// The player capital sits near the top-left corner so the initial camera
/// is clamped to the origin and screen coordinates equal world coordinates.
#[must_use]
pub fn duel_galaxy() -> GalaxyData {
    GalaxyData {
        name: "Duel".to_string(),
        planets: vec![
            PlanetData::new(HOME, (400, 300), Faction::Player, 50),
            PlanetData::new(AWAY, (3600, 2600), Faction::Ai, 50),
            PlanetData::new(OUTPOST, (900, 300), Faction::Neutral, 20),
            PlanetData::new(FRONTIER, (2000, 1500), Faction::Neutral, 10),
        ],
    }
}

/// Simulation state of the duel galaxy with default rules.
///
/// # Panics
///
/// Never with the built-in fixture.
#[must_use]
pub fn duel_state() -> Galaxy {
    Galaxy::new(&duel_galaxy(), GalaxyRules::default()).expect("duel galaxy is valid")
}

/// Full game on the duel galaxy with default rules.
///
/// # Panics
///
/// Never with the built-in fixture.
#[must_use]
pub fn duel_game() -> Game {
    Game::new(&duel_galaxy(), GalaxyRules::default()).expect("duel galaxy is valid")
}

/// World position of a duel planet's fleet marker with default rules.
#[must_use]
pub fn marker_of(game: &Game, planet: &str) -> Vec2Fixed {
    let position = game
        .galaxy()
        .planet(planet)
        .map_or(Vec2Fixed::ZERO, |p| p.position);
    position - Vec2Fixed::new(I32F32::ZERO, game.galaxy().rules().fleet_marker_offset)
}

/// A complete session on the duel galaxy at four frames per second.
///
/// Builds a station and a fighter on the player capital, drags the new
/// fleet onto the outpost, then idles into the third day. Screen and
/// world coordinates coincide for this galaxy.
#[must_use]
pub fn scripted_session() -> Vec<FrameInput> {
    let dt = quarter_second();
    let mut frames: Vec<FrameInput> = (0..260).map(|_| FrameInput::idle(dt)).collect();

    frames[0]
        .commands
        .push(GameCommand::BuildStation(HOME.to_string()));
    // Station done after 80 ticks
    frames[80]
        .commands
        .push(GameCommand::BuildFighter(HOME.to_string()));
    // Fighter done after 40 more
    frames[125].commands.extend([
        GameCommand::PointerDown(Vec2Fixed::from_num(400, 240)),
        GameCommand::PointerMove(Vec2Fixed::from_num(600, 280)),
        GameCommand::PointerUp(Vec2Fixed::from_num(900, 300)),
    ]);
    frames[130].pan = PanInput {
        right: true,
        ..PanInput::NONE
    };

    frames
}
