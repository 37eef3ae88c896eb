//! Headless galaxy conquest runner.
//!
//! Runs the game without a window, controlled by JSON commands on stdin
//! with responses on stdout. Useful for:
//!
//! - **Scripted play**: a controller drags fleets and queues builds
//! - **CI verification**: determinism and replay checks
//! - **Profiling**: long idle sessions over the economy
//!
//! # Protocol
//!
//! Communication uses JSON lines (one JSON object per line):
//!
//! - **stdin**: commands (`tick`, `pointer_down`, `build_station`, ...)
//! - **stdout**: responses and state (JSON)
//! - **stderr**: logs (human-readable)
//!
//! See [`protocol`] for the full command and response set.
//!
//! # Example
//!
//! ```bash
//! echo '{"cmd":"tick","count":60}' | cargo run -p galaxy_headless
//! cargo run -p galaxy_headless -- run --scenario scenarios/fast_days.ron
//! cargo run -p galaxy_headless -- replay --file session.replay --verify
//! ```

pub mod protocol;
pub mod runner;
pub mod scenario;
pub mod session;

pub use protocol::{Command, Response};
pub use runner::{HeadlessConfig, HeadlessRunner};
pub use scenario::{Scenario, ScenarioError};
pub use session::{scripted_session, verify_determinism, DeterminismReport};
