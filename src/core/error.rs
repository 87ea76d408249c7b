//! Error types shared by the simulator adapter, the planner, and its config.

use thiserror::Error;

/// Failures reported by a simulator adapter.
///
/// The planner never retries or recovers from these; they abort the whole
/// `run` call and reach the caller unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulatorError {
    #[error("action {action} out of range for {num_actions} actions")]
    InvalidAction { action: usize, num_actions: usize },

    #[error("simulator has no actions")]
    NoActions,

    #[error("snapshot failed: {0}")]
    Snapshot(String),

    #[error("step failed: {0}")]
    Step(String),
}

/// Invalid tuning constants in an `MctsConfig`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("exploration constant must be finite and non-negative, got {0}")]
    ExplorationConstant(f64),

    #[error("discount factor must lie in [0, 1], got {0}")]
    Gamma(f64),

    #[error("rollout horizon must be at least 1")]
    ZeroHorizon,
}

/// Errors that can occur during a search run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("iteration count must be positive, got {0}")]
    InvalidIterations(u32),

    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Simulator(#[from] SimulatorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_error_is_transparent() {
        let inner = SimulatorError::Step("boom".to_string());
        let err: SearchError = inner.clone().into();

        assert_eq!(err.to_string(), inner.to_string());
        assert_eq!(err, SearchError::Simulator(inner));
    }

    #[test]
    fn test_messages() {
        let err = SimulatorError::InvalidAction { action: 3, num_actions: 2 };
        assert_eq!(err.to_string(), "action 3 out of range for 2 actions");

        assert_eq!(SimulatorError::NoActions.to_string(), "simulator has no actions");

        let err = SearchError::InvalidIterations(0);
        assert_eq!(err.to_string(), "iteration count must be positive, got 0");

        let err: SearchError = ConfigError::ZeroHorizon.into();
        assert_eq!(err.to_string(), "invalid config: rollout horizon must be at least 1");
    }
}
