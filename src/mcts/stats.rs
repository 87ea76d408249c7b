//! MCTS search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected during one `run`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Completed iterations.
    pub iterations: u32,

    /// Nodes expanded (each adds one child per action).
    pub expansions: u32,

    /// Rollouts actually simulated.
    pub rollouts: u32,

    /// Evaluations of terminal nodes (no rollout).
    pub terminal_evaluations: u32,

    /// Maximum depth reached during search.
    pub max_depth: u32,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Calculate iterations per second.
    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.iterations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Calculate rollouts per second.
    #[must_use]
    pub fn rollouts_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.rollouts as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = SearchStats::new();
        assert_eq!(stats.iterations, 0);
        assert_eq!(stats.rollouts, 0);
        assert_eq!(stats.iterations_per_second(), 0.0);
    }

    #[test]
    fn test_stats_per_second() {
        let mut stats = SearchStats::new();
        stats.iterations = 1000;
        stats.rollouts = 500;
        stats.time_us = 1_000_000;

        assert_eq!(stats.iterations_per_second(), 1000.0);
        assert_eq!(stats.rollouts_per_second(), 500.0);
    }

    #[test]
    fn test_stats_reset() {
        let mut stats = SearchStats::new();
        stats.iterations = 100;
        stats.expansions = 50;

        stats.reset();

        assert_eq!(stats, SearchStats::default());
    }

    #[test]
    fn test_stats_serialization() {
        let mut stats = SearchStats::new();
        stats.iterations = 42;

        let json = serde_json::to_string(&stats).unwrap();
        let deserialized: SearchStats = serde_json::from_str(&json).unwrap();

        assert_eq!(stats, deserialized);
    }
}
