//! Headless game runner implementation.
//!
//! Reads commands line by line, applies them to a [`Game`] and writes one
//! response line per command. Every applied command and frame is also
//! recorded so the session can be saved as a replay at any point.

use std::io::{self, BufRead, Write};

use galaxy_core::camera::PanInput;
use galaxy_core::data::GalaxyData;
use galaxy_core::game::{CommandOutcome, Game, GameCommand};
use galaxy_core::interaction::InteractionOutcome;
use galaxy_core::math::{Fixed, Vec2Fixed};
use galaxy_core::replay::Replay;

use crate::protocol::{to_fixed, to_point, Command, Response};
use crate::scenario::{Scenario, ScenarioError};

/// Default frame duration: 60 frames per second.
pub fn default_dt() -> Fixed {
    Fixed::from_num(1) / 60
}

/// Longest frame accepted from the protocol, in seconds.
pub const MAX_DT_SECONDS: f64 = 60.0;

/// Headless runner configuration.
#[derive(Debug, Clone, Default)]
pub struct HeadlessConfig {
    /// Output state after every tick command (instead of an ack).
    pub auto_state_output: bool,
}

/// Headless runner for controller-driven gameplay.
#[derive(Debug)]
pub struct HeadlessRunner {
    config: HeadlessConfig,
    game: Game,
    replay: Replay,
    pan: PanInput,
    should_quit: bool,
}

impl HeadlessRunner {
    /// Create a runner on the standard galaxy.
    pub fn new() -> Result<Self, ScenarioError> {
        Self::from_scenario(&Scenario::standard(), HeadlessConfig::default())
    }

    /// Create a runner for a scenario.
    pub fn from_scenario(
        scenario: &Scenario,
        config: HeadlessConfig,
    ) -> Result<Self, ScenarioError> {
        let data: GalaxyData = scenario.galaxy_data()?;
        let game = scenario.build_game()?;
        // Replays start from the bare planet table
        if !scenario.fleets.is_empty() {
            tracing::warn!(
                fleets = scenario.fleets.len(),
                "Starting fleets are not recorded; saved replays will not verify"
            );
        }
        let replay = Replay::new(data, scenario.rules.clone());
        Ok(Self {
            config,
            game,
            replay,
            pan: PanInput::NONE,
            should_quit: false,
        })
    }

    /// The game being played.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Whether a `quit` command was received.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The session recorded so far, finalized with the current hash.
    pub fn replay(&self) -> Replay {
        let mut replay = self.replay.clone();
        replay.finalize(self.game.state_hash());
        replay
    }

    /// Handle one command and produce its response.
    pub fn handle(&mut self, command: Command) -> Response {
        let name = command.name();
        match command {
            Command::Tick { count, dt } => self.tick(count, dt),
            Command::PointerDown { x, y } => {
                self.pointer(name, x, y, GameCommand::PointerDown)
            }
            Command::PointerUp { x, y } => self.pointer(name, x, y, GameCommand::PointerUp),
            Command::PointerMove { x, y } => {
                self.pointer(name, x, y, GameCommand::PointerMove)
            }
            Command::Pan {
                left,
                right,
                up,
                down,
            } => {
                self.pan = PanInput {
                    left,
                    right,
                    up,
                    down,
                };
                Response::ack(name)
            }
            Command::BuildStation { planet } => self.apply(name, GameCommand::BuildStation(planet)),
            Command::BuildFighter { planet } => self.apply(name, GameCommand::BuildFighter(planet)),
            Command::Query => Response::state(&self.game.snapshot(), self.game.state_hash()),
            Command::Hash => Response::StateHash {
                frame: self.game.galaxy().frame(),
                hash: self.game.state_hash(),
            },
            Command::SaveReplay { path } => match self.replay().save(&path) {
                Ok(()) => Response::ack(name),
                Err(e) => Response::error(e.to_string(), Some(name)),
            },
            Command::Quit => {
                self.should_quit = true;
                Response::Bye
            }
        }
    }

    fn tick(&mut self, count: u32, dt: Option<f64>) -> Response {
        let dt = match dt {
            None => default_dt(),
            Some(seconds) if seconds > 0.0 && seconds <= MAX_DT_SECONDS => match to_fixed(seconds) {
                Some(dt) => dt,
                None => return Response::error(format!("Invalid dt: {seconds}"), Some("tick")),
            },
            Some(seconds) => {
                return Response::error(
                    format!("dt must be in (0, {MAX_DT_SECONDS}], got {seconds}"),
                    Some("tick"),
                )
            }
        };

        for _ in 0..count {
            let events = self.game.frame(dt, self.pan);
            self.replay.record_frame(dt, self.pan);
            if let Some(day) = events.day_advanced {
                tracing::debug!(day = day.day, "Day advanced during tick command");
            }
        }

        if self.config.auto_state_output {
            Response::state(&self.game.snapshot(), self.game.state_hash())
        } else {
            Response::ack("tick")
        }
    }

    fn pointer(
        &mut self,
        name: &str,
        x: f64,
        y: f64,
        make: fn(Vec2Fixed) -> GameCommand,
    ) -> Response {
        match to_point(x, y) {
            Some(point) => self.apply(name, make(point)),
            None => Response::error(format!("Invalid position ({x}, {y})"), Some(name)),
        }
    }

    fn apply(&mut self, name: &str, command: GameCommand) -> Response {
        let outcome = self.game.apply(&command);
        self.replay.record_command(command);
        match outcome {
            CommandOutcome::BuildRejected(reason) => Response::rejected(name, reason),
            CommandOutcome::Pointer(InteractionOutcome::FleetMoved(transfer)) => {
                tracing::info!(from = %transfer.from, to = %transfer.to, "Fleet moved");
                Response::ack(name)
            }
            CommandOutcome::Pointer(_) | CommandOutcome::BuildStarted(_) => Response::ack(name),
        }
    }

    /// Run the command loop until `quit` or end of input.
    ///
    /// Malformed lines get an error response and the loop continues.
    pub fn run<R: BufRead, W: Write>(mut self, input: R, mut output: W) -> io::Result<Self> {
        write!(output, "{}", Response::ready(self.game.galaxy().frame()).to_json_line())?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match Command::from_json(line) {
                Ok(command) => self.handle(command),
                Err(e) => Response::error(format!("Parse error: {e}"), None),
            };
            write!(output, "{}", response.to_json_line())?;
            output.flush()?;

            if self.should_quit {
                return Ok(self);
            }
        }

        tracing::info!("Input closed");
        write!(output, "{}", Response::Bye.to_json_line())?;
        output.flush()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_core::factions::Faction;

    fn run_lines(lines: &[&str]) -> (HeadlessRunner, Vec<Response>) {
        let input = lines.join("\n");
        let mut output = Vec::new();
        let runner = HeadlessRunner::new()
            .unwrap()
            .run(input.as_bytes(), &mut output)
            .unwrap();
        let responses = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        (runner, responses)
    }

    #[test]
    fn test_session_starts_ready_and_ends_bye() {
        let (_, responses) = run_lines(&[r#"{"cmd":"quit"}"#]);
        assert_eq!(responses, vec![Response::ready(0), Response::Bye]);
    }

    #[test]
    fn test_end_of_input_says_bye() {
        let (_, responses) = run_lines(&[r#"{"cmd":"tick","count":3}"#]);
        assert_eq!(
            responses,
            vec![Response::ready(0), Response::ack("tick"), Response::Bye]
        );
    }

    #[test]
    fn test_build_and_reject() {
        let (runner, responses) = run_lines(&[
            r#"{"cmd":"build_station","planet":"Coruscant"}"#,
            r#"{"cmd":"build_station","planet":"Coruscant"}"#,
            r#"{"cmd":"build_fighter","planet":"Bastion"}"#,
        ]);

        assert_eq!(responses[1], Response::ack("build_station"));
        assert_eq!(
            responses[2],
            Response::rejected("build_station", "Already building")
        );
        assert!(matches!(&responses[3], Response::Rejected { cmd, .. } if cmd == "build_fighter"));
        assert_eq!(runner.game().galaxy().pools().player, 99_500);
    }

    #[test]
    fn test_parse_errors_do_not_stop_the_loop() {
        let (_, responses) = run_lines(&["not json", r#"{"cmd":"hash"}"#]);
        assert!(matches!(&responses[1], Response::Error { cmd: None, .. }));
        assert!(matches!(responses[2], Response::StateHash { frame: 0, .. }));
    }

    #[test]
    fn test_invalid_dt_is_an_error() {
        let (runner, responses) = run_lines(&[
            r#"{"cmd":"tick","dt":-1}"#,
            r#"{"cmd":"tick","dt":0}"#,
            r#"{"cmd":"tick","dt":1000}"#,
        ]);
        assert!(responses[1..4]
            .iter()
            .all(|r| matches!(r, Response::Error { .. })));
        assert_eq!(runner.game().galaxy().frame(), 0);
    }

    #[test]
    fn test_query_reports_state() {
        let (_, responses) = run_lines(&[
            r#"{"cmd":"tick","count":4,"dt":0.25}"#,
            r#"{"cmd":"query"}"#,
        ]);
        let Response::State(state) = &responses[2] else {
            panic!("expected state, got {:?}", responses[2]);
        };
        assert_eq!(state.frame, 4);
        assert_eq!(state.day, 1);
        assert!((state.seconds_until_next_day - 29.0).abs() < 1e-9);
        assert_eq!(state.planets.len(), 20);
        assert_eq!(state.planets[0].owner, Faction::Player);
    }

    #[test]
    fn test_pan_is_held_across_ticks() {
        let (runner, _) = run_lines(&[
            r#"{"cmd":"pan","right":true}"#,
            r#"{"cmd":"tick","count":3}"#,
            r#"{"cmd":"pan"}"#,
            r#"{"cmd":"tick","count":3}"#,
        ]);
        let start = HeadlessRunner::new().unwrap().game().camera().position();
        let end = runner.game().camera().position();
        assert_eq!(end.x - start.x, Fixed::from_num(30));
        assert_eq!(end.y, start.y);
    }

    #[test]
    fn test_saved_replay_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.replay");
        let save = format!(
            r#"{{"cmd":"save_replay","path":"{}"}}"#,
            path.display().to_string().replace('\\', "/")
        );
        let (runner, responses) = run_lines(&[
            r#"{"cmd":"build_station","planet":"Coruscant"}"#,
            r#"{"cmd":"tick","count":120}"#,
            r#"{"cmd":"pointer_down","x":512,"y":384}"#,
            r#"{"cmd":"tick","count":30}"#,
            &save,
        ]);

        assert_eq!(responses[5], Response::ack("save_replay"));
        let replay = Replay::load(&path).unwrap();
        assert_eq!(replay.final_hash, runner.game().state_hash());
        let mut player = galaxy_core::replay::ReplayPlayer::new(replay).unwrap();
        assert!(player.verify().is_ok());
    }
}
