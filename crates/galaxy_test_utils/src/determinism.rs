//! Harness for checking that equal inputs give equal galaxies.
//!
//! Replays only work if a recorded input stream always leads to the same
//! state. The usual ways that breaks:
//!
//! - **Floating-point math**: Results can differ across targets.
//!   We use fixed-point arithmetic via [`galaxy_core::math::Fixed`] throughout.
//!
//! - **Unordered containers**: planets keep table order and fleets live
//!   in a `BTreeMap`, so iteration never depends on hasher seeds.
//!
//! - **Wall-clock time**: The core never reads a clock; time only moves
//!   by the `dt` passed to each frame.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use galaxy_core::game::{FrameInput, Game};

/// Hashes collected by [`verify_determinism`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// True when every run ended on the same hash.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps simulated per run.
    pub steps: u64,
}

impl DeterminismResult {
    /// Distinct final hashes, sorted.
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Panic with every run's hash unless all runs agree.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Game is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Build `runs` fresh states with `setup`, call `step` on each `steps`
/// times (with the step index), and compare the final `hash` values.
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S, u64),
    HashFn: Fn(&S) -> u64,
{
    let hashes: Vec<u64> = (0..runs)
        .map(|_| {
            let mut state = setup();
            (0..steps).for_each(|index| step(&mut state, index));
            hash(&state)
        })
        .collect();

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    if !is_deterministic {
        tracing::warn!(?hashes, "Determinism check failed");
    }

    DeterminismResult {
        is_deterministic,
        hashes,
        steps,
    }
}

/// Play the same input script `runs` times from fresh games.
#[allow(clippy::cast_possible_truncation)]
pub fn verify_session_determinism<F>(
    setup: F,
    inputs: &[FrameInput],
    runs: usize,
) -> DeterminismResult
where
    F: Fn() -> Game,
{
    verify_determinism(
        runs,
        inputs.len() as u64,
        setup,
        |game, index| {
            game.step(&inputs[index as usize]);
        },
        Game::state_hash,
    )
}

/// Play an input script on two games side by side and find the first
/// frame after which their hashes differ.
///
/// Returns `None` if they never diverge.
pub fn find_first_divergence<F>(setup: F, inputs: &[FrameInput]) -> Option<usize>
where
    F: Fn() -> Game,
{
    let mut first = setup();
    let mut second = setup();

    if first.state_hash() != second.state_hash() {
        return Some(0);
    }

    for (index, input) in inputs.iter().enumerate() {
        first.step(input);
        second.step(input);

        if first.state_hash() != second.state_hash() {
            return Some(index + 1);
        }
    }

    None
}

/// Check that serializing the galaxy after a script preserves its hash.
pub fn verify_serialization_determinism<F>(setup: F, inputs: &[FrameInput]) -> bool
where
    F: Fn() -> Game,
{
    let mut game = setup();
    for input in inputs {
        game.step(input);
    }
    let galaxy = game.galaxy();
    let hash_before = galaxy.state_hash();

    let Ok(bytes) = galaxy.serialize() else {
        return false;
    };
    let Ok(restored) = galaxy_core::galaxy::Galaxy::deserialize(&bytes) else {
        return false;
    };

    restored.state_hash() == hash_before
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for determinism testing.
///
/// These strategies generate random but reproducible inputs for
/// property-based testing of the game.
pub mod strategies {
    use galaxy_core::camera::PanInput;
    use galaxy_core::game::{FrameInput, GameCommand};
    use galaxy_core::math::{Fixed, Vec2Fixed};
    use proptest::prelude::*;

    use crate::fixtures::{AWAY, FRONTIER, HOME, OUTPOST};

    /// Frame duration from a set of exactly representable values.
    pub fn arb_dt() -> impl Strategy<Value = Fixed> {
        prop_oneof![
            Just(Fixed::from_num(0.125)),
            Just(Fixed::from_num(0.25)),
            Just(Fixed::from_num(0.5)),
            Just(Fixed::from_num(1)),
        ]
    }

    /// Frame duration split into 1/64 s steps, from 1 to 256 steps.
    pub fn arb_fine_dt() -> impl Strategy<Value = Fixed> {
        (1i32..=256).prop_map(|steps| Fixed::from_num(steps) / 64)
    }

    /// A screen position inside the default 1024 x 768 viewport.
    pub fn arb_screen_point() -> impl Strategy<Value = Vec2Fixed> {
        (0i32..1024, 0i32..768).prop_map(|(x, y)| Vec2Fixed::from_num(x, y))
    }

    /// Any combination of pan keys.
    pub fn arb_pan() -> impl Strategy<Value = PanInput> {
        any::<(bool, bool, bool, bool)>().prop_map(|(left, right, up, down)| PanInput {
            left,
            right,
            up,
            down,
        })
    }

    /// A planet name from the duel galaxy, or one that does not exist.
    pub fn arb_planet_name() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(HOME.to_string()),
            Just(AWAY.to_string()),
            Just(OUTPOST.to_string()),
            Just(FRONTIER.to_string()),
            Just("Nowhere".to_string()),
        ]
    }

    /// Any player action.
    pub fn arb_command() -> impl Strategy<Value = GameCommand> {
        prop_oneof![
            arb_screen_point().prop_map(GameCommand::PointerDown),
            arb_screen_point().prop_map(GameCommand::PointerUp),
            arb_screen_point().prop_map(GameCommand::PointerMove),
            arb_planet_name().prop_map(GameCommand::BuildStation),
            arb_planet_name().prop_map(GameCommand::BuildFighter),
        ]
    }

    /// One frame with up to three actions.
    pub fn arb_frame_input() -> impl Strategy<Value = FrameInput> {
        (
            arb_dt(),
            arb_pan(),
            proptest::collection::vec(arb_command(), 0..3),
        )
            .prop_map(|(dt, pan, commands)| FrameInput { dt, pan, commands })
    }

    /// A session of frames.
    pub fn arb_session(max_frames: usize) -> impl Strategy<Value = Vec<FrameInput>> {
        proptest::collection::vec(arb_frame_input(), 1..max_frames)
    }
}
