//! Headless galaxy conquest runner.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode - read commands from stdin
//! cargo run -p galaxy_headless
//!
//! # Play a scenario, printing state after every tick
//! cargo run -p galaxy_headless -- run --scenario fast_days.ron --auto-state
//!
//! # Check the scripted session is deterministic
//! cargo run -p galaxy_headless -- verify --runs 5
//!
//! # Verify a saved replay
//! cargo run -p galaxy_headless -- replay --file session.replay --verify
//! ```
//!
//! Protocol responses go to stdout; logs go to stderr.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use galaxy_core::game::FrameInput;
use galaxy_core::replay::{Replay, ReplayPlayer};
use galaxy_headless::{
    runner::{HeadlessConfig, HeadlessRunner},
    scenario::Scenario,
    session::{scripted_session, verify_determinism},
};

#[derive(Parser)]
#[command(name = "galaxy_headless")]
#[command(about = "Headless galaxy conquest runner for scripted play and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive session on stdin/stdout
    Run {
        /// Scenario file to load
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Output state after every tick
        #[arg(long)]
        auto_state: bool,
    },

    /// Verify determinism by playing the scripted session several times
    Verify {
        /// Scenario file to load
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Number of verification runs
        #[arg(
            short,
            long,
            default_value = "5",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        runs: u32,

        /// Frames per run (a quarter second each)
        #[arg(short, long, default_value = "1200")]
        frames: u64,
    },

    /// Play back a recorded session
    Replay {
        /// Replay file path
        #[arg(short, long)]
        file: PathBuf,

        /// Verify the replay reproduces its final hash
        #[arg(long)]
        verify: bool,
    },

    /// Run the scripted session for timing
    Benchmark {
        /// Number of frames to run
        #[arg(short, long, default_value = "36000")]
        frames: u64,

        /// Scenario file to load
        #[arg(short, long)]
        scenario: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr (stdout is for protocol). RUST_LOG overrides.
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(filter)
        .init();

    match cli.command {
        Some(Commands::Run {
            scenario,
            auto_state,
        }) => cmd_run(scenario, auto_state),
        Some(Commands::Verify {
            scenario,
            runs,
            frames,
        }) => cmd_verify(scenario, runs, frames),
        Some(Commands::Replay { file, verify }) => cmd_replay(file, verify),
        Some(Commands::Benchmark { frames, scenario }) => cmd_benchmark(frames, scenario),
        None => cmd_run(None, false),
    }
}

fn load_scenario(path: Option<PathBuf>) -> Scenario {
    let Some(path) = path else {
        return Scenario::standard();
    };
    tracing::info!("Using scenario: {}", path.display());
    match Scenario::load(&path) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Failed to load scenario: {e}");
            std::process::exit(1);
        }
    }
}

/// Run an interactive session
fn cmd_run(scenario: Option<PathBuf>, auto_state: bool) {
    tracing::info!("Starting interactive session");

    let scenario = load_scenario(scenario);
    let config = HeadlessConfig {
        auto_state_output: auto_state,
    };
    let runner = match HeadlessRunner::from_scenario(&scenario, config) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("Failed to start game: {e}");
            std::process::exit(1);
        }
    };

    let stdin = std::io::stdin();
    if let Err(e) = runner.run(stdin.lock(), std::io::stdout().lock()) {
        tracing::error!(error = %e, "Session ended with I/O error");
        std::process::exit(1);
    }
}

/// Verify determinism
fn cmd_verify(scenario: Option<PathBuf>, runs: u32, frames: u64) {
    let scenario = load_scenario(scenario);
    tracing::info!(
        "Verifying determinism: {} ({} runs of {} frames)",
        scenario.name,
        runs,
        frames
    );

    let report = match verify_determinism(&scenario, frames, runs) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("FAIL: {e}");
            std::process::exit(1);
        }
    };

    for (run, hash) in report.hashes.iter().enumerate() {
        eprintln!("  Run {run}: {hash:016x}");
    }
    if report.passed() {
        eprintln!("PASS: All {runs} runs produced identical results");
    } else if !report.replay_verified {
        eprintln!("FAIL: Replay diverged from the recorded session!");
        std::process::exit(1);
    } else {
        eprintln!("FAIL: Non-determinism detected!");
        std::process::exit(1);
    }
}

/// Replay a recorded session
fn cmd_replay(file: PathBuf, verify: bool) {
    if verify {
        tracing::info!("Verifying replay: {}", file.display());
    } else {
        tracing::info!("Playing replay: {}", file.display());
    }

    let replay = match Replay::load(&file) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to load replay: {e}");
            std::process::exit(1);
        }
    };

    eprintln!("Loaded replay:");
    eprintln!("  Galaxy: {}", replay.galaxy.name);
    eprintln!("  Frames: {}", replay.frame_count());
    eprintln!("  Commands: {}", replay.command_count());

    let mut player = match ReplayPlayer::new(replay) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to create replay player: {e}");
            std::process::exit(1);
        }
    };

    if verify {
        eprintln!("Verifying replay...");
        match player.verify() {
            Ok(()) => {
                eprintln!("PASS: Replay verification successful");
                eprintln!("  Hash: {:016x}", player.replay().final_hash);
            }
            Err(e) => {
                eprintln!("FAIL: {e}");
                std::process::exit(1);
            }
        }
    } else {
        let total = player.replay().frame_count().max(1);
        let mut last_percent = 0;

        while player.advance() {
            let percent = player.position() * 100 / total;
            if percent > last_percent && percent % 10 == 0 {
                eprintln!("Progress: {percent}%");
                last_percent = percent;
            }
        }

        let galaxy = player.game().galaxy();
        eprintln!("Replay complete at frame {}", galaxy.frame());
        eprintln!("Final state hash: {:016x}", player.game().state_hash());
        eprintln!("\nFinal State:");
        eprintln!("  Day: {}", galaxy.day());
        eprintln!(
            "  Pools: player {}, ai {}",
            galaxy.pools().player,
            galaxy.pools().ai
        );
        eprintln!("  Fleets: {}", galaxy.fleets().len());
    }
}

/// Run benchmark
fn cmd_benchmark(frames: u64, scenario: Option<PathBuf>) {
    tracing::info!("Running {} frame benchmark", frames);

    let scenario = load_scenario(scenario);
    let mut game = match scenario.build_game() {
        Ok(game) => game,
        Err(e) => {
            eprintln!("Failed to start game: {e}");
            std::process::exit(1);
        }
    };
    let inputs: Vec<FrameInput> = scripted_session(&game, frames);

    eprintln!(
        "Starting benchmark on {} ({} planets)",
        scenario.name,
        game.galaxy().planet_count()
    );

    let start = Instant::now();
    for input in &inputs {
        game.step(input);
    }
    let elapsed = start.elapsed();

    #[allow(clippy::cast_precision_loss)]
    let fps = frames as f64 / elapsed.as_secs_f64();

    eprintln!("\n{}", "=".repeat(50));
    eprintln!("BENCHMARK RESULTS");
    eprintln!("{}", "=".repeat(50));
    eprintln!("Frames: {frames}");
    eprintln!("Duration: {:.3}s", elapsed.as_secs_f64());
    eprintln!("Frames/second: {fps:.1}");
    eprintln!("Game days: {}", game.galaxy().day());
    eprintln!("State hash: {:016x}", game.state_hash());
}
