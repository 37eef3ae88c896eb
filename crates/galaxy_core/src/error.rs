//! Error types for the galaxy simulation.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all galaxy simulation errors.
///
/// These are startup and tooling failures. Gameplay requests that the
/// rules refuse (unaffordable builds, cancelled drags) are not errors;
/// see [`crate::construction::BuildRejection`].
#[derive(Debug, Error)]
pub enum GameError {
    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path (or embedded name) of the file that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// The planet table is unusable.
    #[error("Invalid galaxy data: {0}")]
    InvalidGalaxyData(String),

    /// A gameplay constant is out of range.
    #[error("Invalid rules: {0}")]
    InvalidRules(String),

    /// No planet with this name exists.
    #[error("Unknown planet: {0}")]
    UnknownPlanet(String),

    /// Invalid game state.
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Replay file was written by an incompatible version.
    #[error("Replay version mismatch: expected {expected}, got {found}")]
    ReplayVersionMismatch {
        /// Version this build understands.
        expected: u32,
        /// Version found in the file.
        found: u32,
    },

    /// Replay produced a different final state than recorded.
    #[error("Desync detected at frame {frame}: local hash {local_hash}, recorded hash {recorded_hash}")]
    DesyncDetected {
        /// Frame where the comparison was made.
        frame: u64,
        /// Hash produced by this run.
        local_hash: u64,
        /// Hash stored in the replay.
        recorded_hash: u64,
    },
}
