//! # Galaxy Core
//!
//! Deterministic simulation core for Galaxy Conquest.
//!
//! This crate contains **only** game logic:
//! - No rendering
//! - No IO apart from replay files
//! - No wall clock (time advances only by the `dt` passed in)
//! - No floating-point math (uses fixed-point)
//!
//! This separation enables:
//! - Headless runs driven over a pipe
//! - Replays and determinism testing
//! - Unit tests that feed synthetic pointer events
//!
//! ## Crate Structure
//!
//! - [`galaxy`] - Planets, fleets, pools and the per-frame tick
//! - [`economy`] - Resource pools and daily income
//! - [`construction`] - Station and fighter build timers
//! - [`fleet`] - Fleet registry and movement
//! - [`interaction`] - Pointer selection and fleet drag-and-drop
//! - [`view`] - Zoom easing and view mode
//! - [`camera`] - Viewport panning and screen/world mapping
//! - [`game`] - Everything above wired into one frame loop
//! - [`replay`] - Recording and verified playback
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod camera;
pub mod config;
pub mod construction;
pub mod data;
pub mod economy;
pub mod error;
pub mod factions;
pub mod fleet;
pub mod galaxy;
pub mod game;
pub mod interaction;
pub mod math;
pub mod planet;
pub mod replay;
pub mod view;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::camera::{Camera, PanInput};
    pub use crate::config::GalaxyRules;
    pub use crate::construction::{BuildRejection, ConstructionEvent, ConstructionKind};
    pub use crate::data::{GalaxyData, PlanetData};
    pub use crate::economy::{DailyIncome, ResourcePools};
    pub use crate::error::{GameError, Result};
    pub use crate::factions::Faction;
    pub use crate::fleet::{Fleet, FleetId};
    pub use crate::galaxy::{DayAdvanced, FleetTransfer, Galaxy, TickEvents};
    pub use crate::game::{
        CommandOutcome, FrameInput, Game, GameCommand, GameSnapshot, PlanetSnapshot,
    };
    pub use crate::interaction::{DragState, InteractionOutcome, PointerEvent};
    pub use crate::math::{Fixed, Vec2Fixed};
    pub use crate::planet::Planet;
    pub use crate::replay::{Replay, ReplayPlayer};
    pub use crate::view::{ViewMode, ViewState};
}
