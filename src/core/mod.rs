//! Core types: simulator adapter, errors, RNG.
//!
//! Everything the planner needs from the outside world goes through the
//! `Simulator` trait; concrete environments live in `envs`.

pub mod error;
pub mod rng;
pub mod simulator;

pub use error::{ConfigError, SearchError, SimulatorError};
pub use rng::SimRng;
pub use simulator::{Simulator, Transition};
