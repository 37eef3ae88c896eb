//! JSON protocol for headless game communication.
//!
//! The headless runner communicates via JSON lines (one JSON object per line):
//!
//! **Input (stdin):** Commands from the controller
//! **Output (stdout):** Game state updates and responses
//!
//! # Protocol Flow
//!
//! 1. Runner starts, outputs `{"type":"ready","version":"1.0","frame":0}`
//! 2. Controller sends commands as JSON lines
//! 3. Runner answers every command with exactly one response line
//! 4. On `quit` (or end of input), outputs `{"type":"bye"}`
//!
//! Pointer coordinates are screen pixels; times are seconds.
//!
//! # Example Session
//!
//! ```text
//! <- {"type":"ready","version":"1.0","frame":0}
//! -> {"cmd":"build_station","planet":"Coruscant"}
//! <- {"type":"ack","cmd":"build_station"}
//! -> {"cmd":"build_fighter","planet":"Coruscant"}
//! <- {"type":"rejected","cmd":"build_fighter","reason":"Planet has no space station"}
//! -> {"cmd":"tick","count":1200}
//! <- {"type":"ack","cmd":"tick"}
//! -> {"cmd":"pointer_down","x":512,"y":384}
//! <- {"type":"ack","cmd":"pointer_down"}
//! -> {"cmd":"query"}
//! <- {"type":"state","frame":1200,"day":1,...}
//! ```

use serde::{Deserialize, Serialize};

use galaxy_core::factions::Faction;
use galaxy_core::game::GameSnapshot;
use galaxy_core::math::{Fixed, Vec2Fixed};
use galaxy_core::view::ViewMode;

/// Protocol version reported in the ready message.
pub const PROTOCOL_VERSION: &str = "1.0";

// ============================================================================
// Input Commands (Controller -> Runner)
// ============================================================================

/// Commands that can be sent to the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Advance the game by N frames (default: 1).
    Tick {
        /// Number of frames.
        #[serde(default = "default_tick_count")]
        count: u32,
        /// Frame duration in seconds (default: 1/60).
        #[serde(default)]
        dt: Option<f64>,
    },

    /// Press the pointer at a screen position.
    PointerDown {
        /// Screen x.
        x: f64,
        /// Screen y.
        y: f64,
    },

    /// Release the pointer at a screen position.
    PointerUp {
        /// Screen x.
        x: f64,
        /// Screen y.
        y: f64,
    },

    /// Move the pointer to a screen position.
    PointerMove {
        /// Screen x.
        x: f64,
        /// Screen y.
        y: f64,
    },

    /// Set the held camera keys; they stay held until the next `pan`.
    Pan {
        /// Left key.
        #[serde(default)]
        left: bool,
        /// Right key.
        #[serde(default)]
        right: bool,
        /// Up key.
        #[serde(default)]
        up: bool,
        /// Down key.
        #[serde(default)]
        down: bool,
    },

    /// Start a station upgrade on a player planet.
    BuildStation {
        /// Planet name.
        planet: String,
    },

    /// Start a fighter on a player planet.
    BuildFighter {
        /// Planet name.
        planet: String,
    },

    /// Query current game state without advancing time.
    Query,

    /// Report the current state hash (for determinism verification).
    Hash,

    /// Write everything played so far as a replay file.
    SaveReplay {
        /// Output path.
        path: String,
    },

    /// Quit the runner.
    Quit,
}

fn default_tick_count() -> u32 {
    1
}

// ============================================================================
// Output Responses (Runner -> Controller)
// ============================================================================

/// Responses sent from the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Runner is ready to accept commands.
    Ready {
        /// Protocol version.
        version: String,
        /// Frames already run.
        frame: u64,
    },

    /// Command accepted.
    Ack {
        /// Command name.
        cmd: String,
    },

    /// The game refused a build request; nothing changed.
    Rejected {
        /// Command name.
        cmd: String,
        /// Human-readable reason.
        reason: String,
    },

    /// Error processing a command.
    Error {
        /// Error message.
        message: String,
        /// Command name, if the line parsed.
        cmd: Option<String>,
    },

    /// Current game state.
    State(Box<GameState>),

    /// State hash for determinism verification.
    StateHash {
        /// Frames run.
        frame: u64,
        /// Hash of the full game state.
        hash: u64,
    },

    /// Goodbye message before shutdown.
    Bye,
}

// ============================================================================
// State Types
// ============================================================================

/// Full game state as reported by `query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Frames run.
    pub frame: u64,
    /// Current day.
    pub day: u32,
    /// Seconds until the next day.
    pub seconds_until_next_day: f64,
    /// Pools and income.
    pub resources: ResourceState,
    /// Planets in table order.
    pub planets: Vec<PlanetState>,
    /// Fleets with fighters.
    pub fleets: Vec<FleetState>,
    /// Zoom, selection and camera.
    pub view: ViewStateOut,
    /// Fleet drag in progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drag: Option<DragState>,
    /// Hash of the full game state.
    pub hash: u64,
}

/// Resource pools and daily income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    /// Player stockpile.
    pub player: i64,
    /// AI stockpile.
    pub ai: i64,
    /// Player income per day.
    pub player_income: i64,
    /// AI income per day.
    pub ai_income: i64,
}

/// State of a single planet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetState {
    /// Planet name.
    pub name: String,
    /// World x.
    pub x: f64,
    /// World y.
    pub y: f64,
    /// Owner.
    pub owner: Faction,
    /// Income per day.
    pub resource_rate: u32,
    /// Station level.
    pub station_level: u8,
    /// Seconds left on the station upgrade.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_remaining: Option<f64>,
    /// Seconds left on the fighter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fighter_remaining: Option<f64>,
    /// Stationed fleet id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fleet: Option<u32>,
}

/// State of a single fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetState {
    /// Fleet id.
    pub id: u32,
    /// Owner.
    pub owner: Faction,
    /// Fighter count.
    pub fighters: u32,
    /// World x.
    pub x: f64,
    /// World y.
    pub y: f64,
    /// Travel target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<[f64; 2]>,
    /// Planet holding the fleet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,
}

/// Zoom, selection and camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewStateOut {
    /// Zoom in `[0, 1]`.
    pub zoom: f64,
    /// Derived mode.
    pub mode: ViewMode,
    /// Selected planet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    /// Camera top-left corner.
    pub camera: [f64; 2],
    /// Largest camera position.
    pub camera_bounds: [f64; 2],
}

/// Fleet drag indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    /// Source planet.
    pub source: String,
    /// Pointer in world coordinates.
    pub pointer: [f64; 2],
}

fn to_f64(value: Fixed) -> f64 {
    value.to_num::<f64>()
}

fn point(value: Vec2Fixed) -> [f64; 2] {
    [to_f64(value.x), to_f64(value.y)]
}

impl GameState {
    /// Build the wire state from a core snapshot.
    pub fn from_snapshot(snapshot: &GameSnapshot, hash: u64) -> Self {
        Self {
            frame: snapshot.frame,
            day: snapshot.day,
            seconds_until_next_day: to_f64(snapshot.seconds_until_next_day),
            resources: ResourceState {
                player: snapshot.pools.player,
                ai: snapshot.pools.ai,
                player_income: snapshot.player_income,
                ai_income: snapshot.ai_income,
            },
            planets: snapshot
                .planets
                .iter()
                .map(|planet| PlanetState {
                    name: planet.name.clone(),
                    x: to_f64(planet.position.x),
                    y: to_f64(planet.position.y),
                    owner: planet.owner,
                    resource_rate: planet.resource_rate,
                    station_level: planet.station_level,
                    station_remaining: planet.station_remaining.map(to_f64),
                    fighter_remaining: planet.fighter_remaining.map(to_f64),
                    fleet: planet.fleet.map(|id| id.0),
                })
                .collect(),
            fleets: snapshot
                .fleets
                .iter()
                .map(|fleet| FleetState {
                    id: fleet.id.0,
                    owner: fleet.owner,
                    fighters: fleet.fighters,
                    x: to_f64(fleet.position.x),
                    y: to_f64(fleet.position.y),
                    destination: fleet.destination.map(point),
                    home: fleet.home.clone(),
                })
                .collect(),
            view: ViewStateOut {
                zoom: to_f64(snapshot.zoom),
                mode: snapshot.mode,
                selected: snapshot.selected.clone(),
                camera: point(snapshot.camera),
                camera_bounds: point(snapshot.camera_bounds),
            },
            drag: snapshot.drag.as_ref().map(|drag| DragState {
                source: drag.source.clone(),
                pointer: point(drag.pointer),
            }),
            hash,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Convert a wire number to fixed-point, rejecting NaN, infinities and
/// values out of range.
pub fn to_fixed(value: f64) -> Option<Fixed> {
    Fixed::checked_from_num(value)
}

/// Convert a wire screen position to fixed-point.
pub fn to_point(x: f64, y: f64) -> Option<Vec2Fixed> {
    Some(Vec2Fixed::new(to_fixed(x)?, to_fixed(y)?))
}

impl Response {
    /// Create a ready response.
    pub fn ready(frame: u64) -> Self {
        Self::Ready {
            version: PROTOCOL_VERSION.to_string(),
            frame,
        }
    }

    /// Create an acknowledgment.
    pub fn ack(cmd: &str) -> Self {
        Self::Ack {
            cmd: cmd.to_string(),
        }
    }

    /// Create a rejection.
    pub fn rejected(cmd: &str, reason: impl ToString) -> Self {
        Self::Rejected {
            cmd: cmd.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an error response.
    pub fn error(message: impl Into<String>, cmd: Option<&str>) -> Self {
        Self::Error {
            message: message.into(),
            cmd: cmd.map(String::from),
        }
    }

    /// Create a state response.
    pub fn state(snapshot: &GameSnapshot, hash: u64) -> Self {
        Self::State(Box::new(GameState::from_snapshot(snapshot, hash)))
    }

    /// Serialize to JSON line (with newline).
    pub fn to_json_line(&self) -> String {
        let mut json = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","message":"Serialization failed: {e}"}}"#)
        });
        json.push('\n');
        json
    }
}

impl Command {
    /// Parse from a JSON line.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get command name for acknowledgment.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tick { .. } => "tick",
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerUp { .. } => "pointer_up",
            Self::PointerMove { .. } => "pointer_move",
            Self::Pan { .. } => "pan",
            Self::BuildStation { .. } => "build_station",
            Self::BuildFighter { .. } => "build_fighter",
            Self::Query => "query",
            Self::Hash => "hash",
            Self::SaveReplay { .. } => "save_replay",
            Self::Quit => "quit",
        }
    }
}
