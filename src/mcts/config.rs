//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

use crate::core::ConfigError;

/// MCTS configuration parameters.
///
/// Fixed for the lifetime of a planner, so planners with different tuning
/// can run side by side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MctsConfig {
    /// UCT exploration constant `C` (default: 2.0).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Maximum number of steps in a single rollout (default: 10).
    pub rollout_horizon: usize,

    /// Discount factor applied to rollout rewards (default: 0.9).
    pub gamma: f64,

    /// Random seed for rollout action sampling.
    /// Same seed produces deterministic searches.
    pub seed: u64,

    /// Action returned when no root child has been visited.
    pub fallback_action: usize,

    /// Node arena pre-allocation.
    pub initial_capacity: usize,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration_constant: 2.0,
            rollout_horizon: 10,
            gamma: 0.9,
            seed: 42,
            fallback_action: 0,
            initial_capacity: 1024,
        }
    }
}

impl MctsConfig {
    /// Create a new config with custom exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Create a new config with custom rollout horizon.
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.rollout_horizon = horizon;
        self
    }

    /// Create a new config with custom discount factor.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Create a new config with custom seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with custom fallback action.
    pub fn with_fallback_action(mut self, action: usize) -> Self {
        self.fallback_action = action;
        self
    }

    /// Check that the tuning constants are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = self.exploration_constant;
        if !c.is_finite() || c < 0.0 {
            return Err(ConfigError::ExplorationConstant(c));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(ConfigError::Gamma(self.gamma));
        }
        if self.rollout_horizon == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        Ok(())
    }

    /// Geometric discount vector `[γ⁰, γ¹, …, γ^{H-1}]`.
    #[must_use]
    pub fn discount_factors(&self) -> Vec<f64> {
        std::iter::successors(Some(1.0), |d| Some(d * self.gamma))
            .take(self.rollout_horizon)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.exploration_constant, 2.0);
        assert_eq!(config.rollout_horizon, 10);
        assert_eq!(config.gamma, 0.9);
        assert_eq!(config.seed, 42);
        assert_eq!(config.fallback_action, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_exploration(1.0)
            .with_seed(123)
            .with_horizon(5)
            .with_gamma(0.5)
            .with_fallback_action(1);

        assert_eq!(config.exploration_constant, 1.0);
        assert_eq!(config.seed, 123);
        assert_eq!(config.rollout_horizon, 5);
        assert_eq!(config.gamma, 0.5);
        assert_eq!(config.fallback_action, 1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = MctsConfig::default().with_exploration(f64::NAN);
        assert!(matches!(config.validate(), Err(ConfigError::ExplorationConstant(_))));

        let config = MctsConfig::default().with_exploration(-1.0);
        assert!(matches!(config.validate(), Err(ConfigError::ExplorationConstant(_))));

        let config = MctsConfig::default().with_gamma(1.5);
        assert_eq!(config.validate(), Err(ConfigError::Gamma(1.5)));

        let config = MctsConfig::default().with_horizon(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroHorizon));
    }

    #[test]
    fn test_discount_factors() {
        let config = MctsConfig::default().with_horizon(4).with_gamma(0.5);
        assert_eq!(config.discount_factors(), vec![1.0, 0.5, 0.25, 0.125]);

        let config = MctsConfig::default();
        let factors = config.discount_factors();
        assert_eq!(factors.len(), 10);
        assert!((factors[9] - 0.9f64.powi(9)).abs() < 1e-12);
    }

    #[test]
    fn test_serialization() {
        let config = MctsConfig::default().with_seed(7);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MctsConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
