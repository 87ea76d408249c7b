//! Concrete simulators.
//!
//! `CartPole` is the pole-balancing task the planner is benchmarked on.
//! Any other environment only needs to implement `core::Simulator`.

pub mod cartpole;

pub use cartpole::{CartPole, CartPoleState};
