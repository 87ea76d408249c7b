//! MCTS policies for selection and leaf evaluation.
//!
//! Policies are trait-based to allow customization:
//! - `SelectionPolicy`: How to score children during descent (UCT)
//! - `EvaluationPolicy`: How to estimate the value of a leaf (random rollout)

use crate::core::{SimRng, Simulator, SimulatorError};

use super::config::MctsConfig;
use super::node::{MctsNode, NodeStats};

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for scoring children during tree descent.
///
/// The planner follows the child with the highest score, taking the first
/// one on ties.
pub trait SelectionPolicy: Send + Sync {
    /// Score a child given its statistics and its parent's visit count.
    fn score(&self, child: &NodeStats, parent_visits: u32, config: &MctsConfig) -> f64;
}

/// UCT (UCB1 applied to trees) selection policy.
///
/// Formula: Q(a) + c * sqrt(ln(N) / n(a)); unvisited children score +inf.
#[derive(Clone, Debug, Default)]
pub struct Uct;

impl SelectionPolicy for Uct {
    fn score(&self, child: &NodeStats, parent_visits: u32, config: &MctsConfig) -> f64 {
        if child.visits == 0 {
            return f64::INFINITY;
        }

        let ln_parent = (parent_visits.max(1) as f64).ln();
        let exploration = config.exploration_constant * (ln_parent / child.visits as f64).sqrt();

        child.mean_value + exploration
    }
}

/// Index of the first maximal value, or `None` for an empty input.
///
/// NaN entries are skipped.
pub fn first_argmax<I>(values: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.into_iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

// =============================================================================
// Evaluation Policy
// =============================================================================

/// Policy for estimating the value of a leaf node.
///
/// Must not mutate the node's own simulator state.
pub trait EvaluationPolicy<S: Simulator>: Send + Sync {
    /// Estimate the value of `node`.
    fn evaluate(&self, node: &MctsNode<S>, rng: &mut SimRng) -> Result<f64, SimulatorError>;
}

/// Discounted random rollout.
///
/// Plays uniformly random actions on a disposable snapshot of the node's
/// simulator for up to `H` steps (or until termination) and returns the
/// discounted sum of the collected rewards. Terminal nodes evaluate to 0.
#[derive(Clone, Debug)]
pub struct RandomRollout {
    /// `[γ⁰, γ¹, …, γ^{H-1}]`, computed once.
    discounts: Vec<f64>,
}

impl RandomRollout {
    /// Create a rollout policy with the given horizon and discount factor.
    pub fn new(horizon: usize, gamma: f64) -> Self {
        let config = MctsConfig::default().with_horizon(horizon).with_gamma(gamma);
        Self::from_config(&config)
    }

    /// Create a rollout policy from the planner configuration.
    pub fn from_config(config: &MctsConfig) -> Self {
        Self {
            discounts: config.discount_factors(),
        }
    }

    /// Maximum number of steps per rollout.
    #[must_use]
    pub fn horizon(&self) -> usize {
        self.discounts.len()
    }

    /// The precomputed discount vector.
    #[must_use]
    pub fn discounts(&self) -> &[f64] {
        &self.discounts
    }
}

impl Default for RandomRollout {
    fn default() -> Self {
        Self::from_config(&MctsConfig::default())
    }
}

impl<S: Simulator> EvaluationPolicy<S> for RandomRollout {
    fn evaluate(&self, node: &MctsNode<S>, rng: &mut SimRng) -> Result<f64, SimulatorError> {
        if node.is_terminal {
            return Ok(0.0);
        }

        let mut sim = node.sim.snapshot()?;
        let mut value = 0.0;

        for &discount in &self.discounts {
            let action = sim.sample_action(rng);
            let transition = sim.step(action)?;
            value += discount * transition.reward;

            if transition.terminal {
                break;
            }
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transition;

    /// Pays `reward` every step and terminates after `life` steps.
    #[derive(Clone, Debug)]
    struct Countdown {
        life: u32,
        reward: f64,
        steps: u32,
    }

    impl Simulator for Countdown {
        fn num_actions(&self) -> usize {
            2
        }

        fn snapshot(&self) -> Result<Self, SimulatorError> {
            Ok(self.clone())
        }

        fn step(&mut self, action: usize) -> Result<Transition, SimulatorError> {
            self.check_action(action)?;
            self.steps += 1;
            Ok(Transition::new(self.reward, self.steps >= self.life))
        }
    }

    fn leaf(life: u32, reward: f64) -> MctsNode<Countdown> {
        MctsNode::root(Countdown { life, reward, steps: 0 })
    }

    fn stats(visits: u32, total: f64) -> NodeStats {
        NodeStats {
            visits,
            total_return: total,
            mean_value: if visits == 0 { 0.0 } else { total / visits as f64 },
        }
    }

    #[test]
    fn test_uct_unvisited_is_infinite() {
        let config = MctsConfig::default();
        assert_eq!(Uct.score(&stats(0, 0.0), 10, &config), f64::INFINITY);
    }

    #[test]
    fn test_uct_formula() {
        let config = MctsConfig::default();
        let child = stats(4, 2.0);

        let expected = 0.5 + 2.0 * ((20f64).ln() / 4.0).sqrt();
        assert!((Uct.score(&child, 20, &config) - expected).abs() < 1e-12);

        // ln(1) = 0: only the mean remains.
        assert_eq!(Uct.score(&child, 1, &config), 0.5);
    }

    #[test]
    fn test_uct_exploration_favors_rarely_visited() {
        let config = MctsConfig::default();
        let often = stats(100, 80.0);
        let rarely = stats(2, 1.4);

        assert!(Uct.score(&rarely, 102, &config) > Uct.score(&often, 102, &config));
    }

    #[test]
    fn test_first_argmax() {
        assert_eq!(first_argmax(Vec::<f64>::new()), None);
        assert_eq!(first_argmax([1.0, 3.0, 2.0]), Some(1));
        assert_eq!(first_argmax([3.0, 3.0, 3.0]), Some(0));
        assert_eq!(first_argmax([1.0, f64::INFINITY, f64::INFINITY]), Some(1));
        assert_eq!(first_argmax([f64::NAN, 1.0]), Some(1));
        assert_eq!(first_argmax([2.0, f64::NAN]), Some(0));
    }

    #[test]
    fn test_rollout_terminal_is_zero() {
        let mut node = leaf(100, 5.0);
        node.is_terminal = true;
        let mut rng = SimRng::new(1);

        let value = RandomRollout::default().evaluate(&node, &mut rng).unwrap();
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_rollout_full_horizon() {
        let node = leaf(100, 1.0);
        let mut rng = SimRng::new(1);
        let rollout = RandomRollout::new(10, 0.9);

        let value = rollout.evaluate(&node, &mut rng).unwrap();
        let expected = (1.0 - 0.9f64.powi(10)) / (1.0 - 0.9);
        assert!((value - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rollout_stops_at_termination() {
        let node = leaf(3, 1.0);
        let mut rng = SimRng::new(1);
        let rollout = RandomRollout::new(10, 0.5);

        let value = rollout.evaluate(&node, &mut rng).unwrap();
        assert!((value - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_rollout_does_not_touch_node_state() {
        let node = leaf(100, 1.0);
        let mut rng = SimRng::new(1);

        RandomRollout::default().evaluate(&node, &mut rng).unwrap();
        assert_eq!(node.sim.steps, 0);
    }

    #[test]
    fn test_rollout_precomputes_discounts() {
        let rollout = RandomRollout::new(3, 0.5);
        assert_eq!(rollout.horizon(), 3);
        assert_eq!(rollout.discounts(), &[1.0, 0.5, 0.25]);
    }
}
