//! Replay system for recording and playing back games.
//!
//! A replay stores the planet table and rules a game started from, plus
//! every [`FrameInput`] applied to it. Because the simulation is
//! deterministic, re-applying the inputs to a fresh [`Game`] reproduces
//! the game exactly; the recorded final hash detects any divergence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::camera::PanInput;
use crate::config::GalaxyRules;
use crate::data::GalaxyData;
use crate::error::{GameError, Result};
use crate::game::{FrameInput, Game, GameCommand};
use crate::math::Fixed;

/// Replay file format version for compatibility.
pub const REPLAY_VERSION: u32 = 1;

/// Complete replay data structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
    /// Replay format version.
    pub version: u32,
    /// Planet table the game started from.
    pub galaxy: GalaxyData,
    /// Rules in effect.
    pub rules: GalaxyRules,
    /// Frames in the order they were applied.
    pub frames: Vec<FrameInput>,
    /// Commands issued after the last recorded frame.
    pending: Vec<GameCommand>,
    /// Game hash when recording ended.
    pub final_hash: u64,
}

impl Replay {
    /// Start recording a game that begins from `galaxy` and `rules`.
    #[must_use]
    pub fn new(galaxy: GalaxyData, rules: GalaxyRules) -> Self {
        Self {
            version: REPLAY_VERSION,
            galaxy,
            rules,
            frames: Vec::new(),
            pending: Vec::new(),
            final_hash: 0,
        }
    }

    /// Record a command applied between frames.
    pub fn record_command(&mut self, command: GameCommand) {
        self.pending.push(command);
    }

    /// Record a frame. Commands recorded since the previous frame are
    /// attached to it.
    pub fn record_frame(&mut self, dt: Fixed, pan: PanInput) {
        self.frames.push(FrameInput {
            dt,
            pan,
            commands: std::mem::take(&mut self.pending),
        });
    }

    /// Finish recording with the game's final hash.
    ///
    /// Trailing commands become a zero-length frame.
    pub fn finalize(&mut self, final_hash: u64) {
        if !self.pending.is_empty() {
            let commands = std::mem::take(&mut self.pending);
            self.frames.push(FrameInput::commands_only(commands));
        }
        self.final_hash = final_hash;
    }

    /// Number of recorded frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Total number of recorded commands.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.frames.iter().map(|f| f.commands.len()).sum::<usize>() + self.pending.len()
    }

    /// Build the game this replay starts from.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored table or rules are invalid.
    pub fn initial_game(&self) -> Result<Game> {
        Game::new(&self.galaxy, self.rules.clone())
    }

    /// Save the replay to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)
            .map_err(|e| GameError::InvalidState(format!("Failed to serialize replay: {e}")))?;
        std::fs::write(path.as_ref(), bytes)
            .map_err(|e| GameError::InvalidState(format!("Failed to write replay file: {e}")))?;
        tracing::info!(
            path = %path.as_ref().display(),
            frames = self.frames.len(),
            "Replay saved"
        );
        Ok(())
    }

    /// Load a replay from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded, or was
    /// written by another replay version.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| GameError::InvalidState(format!("Failed to read replay file: {e}")))?;
        let replay: Self = bincode::deserialize(&bytes)
            .map_err(|e| GameError::InvalidState(format!("Failed to deserialize replay: {e}")))?;

        if replay.version != REPLAY_VERSION {
            return Err(GameError::ReplayVersionMismatch {
                expected: REPLAY_VERSION,
                found: replay.version,
            });
        }

        Ok(replay)
    }
}

/// Replay playback controller.
#[derive(Debug)]
pub struct ReplayPlayer {
    replay: Replay,
    game: Game,
    next_frame: usize,
}

impl ReplayPlayer {
    /// Create a player positioned before the first frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial game cannot be built.
    pub fn new(replay: Replay) -> Result<Self> {
        let game = replay.initial_game()?;
        Ok(Self {
            replay,
            game,
            next_frame: 0,
        })
    }

    /// Apply the next frame.
    ///
    /// Returns true if there are more frames to play.
    pub fn advance(&mut self) -> bool {
        if let Some(input) = self.replay.frames.get(self.next_frame) {
            self.game.step(input);
            self.next_frame += 1;
        }
        !self.is_finished()
    }

    /// Play every remaining frame.
    pub fn run_to_end(&mut self) {
        while self.advance() {}
    }

    /// Restart and play up to (not including) frame `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial game cannot be rebuilt.
    pub fn seek(&mut self, target: usize) -> Result<()> {
        self.game = self.replay.initial_game()?;
        self.next_frame = 0;
        while self.next_frame < target && self.advance() {}
        Ok(())
    }

    /// Index of the next frame to apply.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.next_frame
    }

    /// The game as replayed so far.
    #[must_use]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// The replay being played.
    #[must_use]
    pub const fn replay(&self) -> &Replay {
        &self.replay
    }

    /// Whether every frame has been applied.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.next_frame >= self.replay.frames.len()
    }

    /// Replay from the start and compare the final hash with the recording.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DesyncDetected`] if the hashes differ.
    pub fn verify(&mut self) -> Result<()> {
        self.seek(self.replay.frames.len())?;
        let local_hash = self.game.state_hash();
        if local_hash != self.replay.final_hash {
            tracing::warn!(
                local_hash,
                recorded_hash = self.replay.final_hash,
                "Replay desync"
            );
            return Err(GameError::DesyncDetected {
                frame: self.game.galaxy().frame(),
                local_hash,
                recorded_hash: self.replay.final_hash,
            });
        }
        Ok(())
    }
}
