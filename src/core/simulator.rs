//! Simulator adapter trait.
//!
//! The planner treats the environment as an opaque generative model:
//! it can be snapshotted, stepped with a discrete action index, and asked
//! for a uniformly random action.
//!
//! ## Implementation Notes
//!
//! - `snapshot`: Must be a deep copy; stepping the copy never affects the source
//! - `step`: Mutates the simulator in place and reports reward and termination
//! - `num_actions`: Fixed for the simulator's lifetime, at least 1

use super::error::SimulatorError;
use super::rng::SimRng;

/// Outcome of a single simulator step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    /// Scalar reward for the step.
    pub reward: f64,

    /// The episode ended on this step.
    pub terminal: bool,
}

impl Transition {
    /// Create a new transition.
    #[must_use]
    pub const fn new(reward: f64, terminal: bool) -> Self {
        Self { reward, terminal }
    }
}

/// A discrete-action simulator the planner can search over.
pub trait Simulator: Sized + Send {
    /// Size of the discrete action space.
    fn num_actions(&self) -> usize;

    /// Take an independent deep copy of the current simulator state.
    fn snapshot(&self) -> Result<Self, SimulatorError>;

    /// Advance the simulator by one step.
    fn step(&mut self, action: usize) -> Result<Transition, SimulatorError>;

    /// Sample an action uniformly from the legal action set.
    fn sample_action(&self, rng: &mut SimRng) -> usize {
        rng.gen_range_usize(0..self.num_actions())
    }

    /// Reject actions outside `0..num_actions()`.
    fn check_action(&self, action: usize) -> Result<(), SimulatorError> {
        let num_actions = self.num_actions();
        if action < num_actions {
            Ok(())
        } else {
            Err(SimulatorError::InvalidAction { action, num_actions })
        }
    }
}
