//! Core MCTS search algorithm.
//!
//! Each iteration runs four phases:
//! 1. Selection: descend by UCT score until reaching a leaf of the current tree
//! 2. Expansion: a leaf that was already evaluated (and is not terminal) gets
//!    one child per action, and the search continues at child 0
//! 3. Evaluation: estimate the chosen node with the evaluation policy
//! 4. Backpropagation: add the estimate to every node up to the root

use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::core::{SearchError, SimRng, Simulator, SimulatorError};

use super::config::MctsConfig;
use super::node::NodeId;
use super::policy::{first_argmax, EvaluationPolicy, RandomRollout, SelectionPolicy, Uct};
use super::stats::SearchStats;
use super::tree::MctsTree;

/// Main MCTS planner.
///
/// Generic over the simulator type. Owns a snapshot of the caller's
/// simulator, the search tree, and the configuration.
pub struct MctsPlanner<S: Simulator> {
    /// Snapshot taken at construction; every `run` starts from it.
    root_sim: S,

    /// Search configuration.
    config: MctsConfig,

    /// The search tree of the latest run.
    tree: MctsTree<S>,

    /// RNG for rollout action sampling.
    rng: SimRng,

    /// Selection policy.
    selection: Box<dyn SelectionPolicy>,

    /// Leaf evaluation policy.
    evaluation: Box<dyn EvaluationPolicy<S>>,

    /// Statistics of the latest run.
    stats: SearchStats,
}

impl<S: Simulator> MctsPlanner<S> {
    /// Create a planner around a snapshot of `sim`.
    ///
    /// The caller's simulator is left untouched. A simulator with an empty
    /// action space is rejected.
    pub fn new(sim: &S, config: MctsConfig) -> Result<Self, SearchError> {
        config.validate()?;
        if sim.num_actions() == 0 {
            return Err(SimulatorError::NoActions.into());
        }

        let root_sim = sim.snapshot()?;
        let tree = MctsTree::with_capacity(root_sim.snapshot()?, config.initial_capacity);
        let evaluation = RandomRollout::from_config(&config);

        Ok(Self {
            root_sim,
            rng: SimRng::new(config.seed),
            config,
            tree,
            selection: Box::new(Uct),
            evaluation: Box::new(evaluation),
            stats: SearchStats::default(),
        })
    }

    /// Set a custom selection policy.
    pub fn with_selection<P: SelectionPolicy + 'static>(mut self, selection: P) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set a custom evaluation policy.
    pub fn with_evaluation<P: EvaluationPolicy<S> + 'static>(mut self, evaluation: P) -> Self {
        self.evaluation = Box::new(evaluation);
        self
    }

    /// Run `iterations` passes of MCTS and return the best root action.
    ///
    /// Every call starts from a fresh tree and a freshly seeded RNG, so
    /// repeated calls are independent and reproducible. A simulator failure
    /// aborts the whole call.
    pub fn run(&mut self, iterations: u32) -> Result<usize, SearchError> {
        if iterations == 0 {
            return Err(SearchError::InvalidIterations(iterations));
        }

        let start = Instant::now();
        self.stats.reset();
        self.rng = SimRng::new(self.config.seed);
        self.tree = MctsTree::with_capacity(self.root_sim.snapshot()?, self.config.initial_capacity);

        for _ in 0..iterations {
            self.iteration()?;
            self.stats.iterations += 1;
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;

        let action = match self.visited_best_action() {
            Some(action) => action,
            None => {
                warn!(
                    iterations,
                    fallback = self.config.fallback_action,
                    "no root child visited, using fallback action"
                );
                self.config.fallback_action
            }
        };

        debug!(
            iterations,
            nodes = self.tree.len(),
            rollouts = self.stats.rollouts,
            max_depth = self.stats.max_depth,
            time_us = self.stats.time_us,
            action,
            "search finished"
        );

        Ok(action)
    }

    /// Single MCTS iteration: select, expand, evaluate, backpropagate.
    fn iteration(&mut self) -> Result<(), SearchError> {
        let leaf = self.select();

        let node = self.tree.get(leaf);
        let target = if node.stats.is_visited() && !node.is_terminal {
            self.expand(leaf)?
        } else {
            leaf
        };

        let value = self.evaluate(target)?;
        self.tree.backpropagate(target, value);

        Ok(())
    }

    /// Descend from the root to a leaf, following the best-scoring child.
    fn select(&self) -> NodeId {
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);
            if node.is_leaf() {
                return current;
            }

            let parent_visits = node.visits();
            let scores = node.children.iter().map(|&child| {
                self.selection
                    .score(&self.tree.get(child).stats, parent_visits, &self.config)
            });
            let idx = first_argmax(scores).unwrap_or(0);

            current = node.children[idx];
        }
    }

    /// Add one child per action under `leaf` and return the first child.
    ///
    /// All children are simulated before any is attached, so a failing
    /// step leaves the leaf unexpanded.
    fn expand(&mut self, leaf: NodeId) -> Result<NodeId, SearchError> {
        let sim = &self.tree.get(leaf).sim;
        let num_actions = sim.num_actions();

        let mut staged = Vec::with_capacity(num_actions);
        for action in 0..num_actions {
            let mut child_sim = sim.snapshot()?;
            let transition = child_sim.step(action)?;
            staged.push((action, child_sim, transition.terminal));
        }

        for (action, child_sim, terminal) in staged {
            self.tree.add_child(leaf, action, child_sim, terminal);
        }

        let depth = self.tree.get(leaf).depth + 1;
        self.stats.expansions += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);
        trace!(node = %leaf, children = num_actions, depth, "expanded");

        Ok(self.tree.children(leaf).first().copied().unwrap_or(leaf))
    }

    /// Run the evaluation policy on a node.
    fn evaluate(&mut self, id: NodeId) -> Result<f64, SearchError> {
        let node = self.tree.get(id);
        if node.is_terminal {
            self.stats.terminal_evaluations += 1;
        } else {
            self.stats.rollouts += 1;
        }

        Ok(self.evaluation.evaluate(node, &mut self.rng)?)
    }

    /// Action of the visited root child with the highest mean value.
    fn visited_best_action(&self) -> Option<usize> {
        let visited: Vec<_> = self
            .tree
            .children(self.tree.root())
            .iter()
            .map(|&child| self.tree.get(child))
            .filter(|node| node.stats.is_visited())
            .collect();

        first_argmax(visited.iter().map(|node| node.mean_value()))
            .and_then(|idx| visited[idx].action)
    }

    /// Best root action of the current tree.
    ///
    /// Considers only visited root children; returns the configured
    /// fallback action when there are none.
    #[must_use]
    pub fn best_action(&self) -> usize {
        self.visited_best_action()
            .unwrap_or(self.config.fallback_action)
    }

    /// Get (action, visits, mean value) for each root child.
    pub fn root_action_values(&self) -> Vec<(usize, u32, f64)> {
        self.tree
            .children(self.tree.root())
            .iter()
            .map(|&child| self.tree.get(child))
            .filter_map(|node| node.action.map(|a| (a, node.visits(), node.mean_value())))
            .collect()
    }

    /// Get action probabilities from root visit counts.
    ///
    /// Returns (action, probability) pairs where probabilities sum to ~1.0.
    pub fn action_probabilities(&self) -> Vec<(usize, f64)> {
        let values = self.root_action_values();
        let total: u32 = values.iter().map(|&(_, visits, _)| visits).sum();

        if total == 0 {
            let uniform = 1.0 / values.len().max(1) as f64;
            return values.iter().map(|&(action, _, _)| (action, uniform)).collect();
        }

        values
            .iter()
            .map(|&(action, visits, _)| (action, visits as f64 / total as f64))
            .collect()
    }

    /// Get search statistics of the latest run.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the search tree of the latest run.
    #[must_use]
    pub fn tree(&self) -> &MctsTree<S> {
        &self.tree
    }

    /// Get the configuration.
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }
}

/// Build a planner around `sim`, run it, and return the chosen action.
pub fn plan<S: Simulator>(sim: &S, config: MctsConfig, iterations: u32) -> Result<usize, SearchError> {
    MctsPlanner::new(sim, config)?.run(iterations)
}
