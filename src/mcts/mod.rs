//! Monte Carlo Tree Search planner.
//!
//! ## Overview
//!
//! Builds a UCT search tree over a `Simulator` and returns the empirically
//! best first action. Key features:
//!
//! - **Snapshot per node**: every node owns its own simulator copy, so
//!   branches never affect each other
//! - **Arena tree**: nodes live in a flat vector, parents are indices
//! - **Discounted random rollouts** for leaf evaluation
//! - **Configurable Policies**: selection (UCT) and evaluation (rollout)
//!
//! ## Usage
//!
//! ```rust
//! use rollout_mcts::envs::CartPole;
//! use rollout_mcts::mcts::{MctsConfig, MctsPlanner};
//!
//! let env = CartPole::new(7);
//! let mut planner = MctsPlanner::new(&env, MctsConfig::default()).unwrap();
//!
//! let action = planner.run(200).unwrap();
//! assert!(action < 2);
//! assert_eq!(planner.tree().root_node().visits(), 200);
//! ```
//!
//! ## Custom Policies
//!
//! ```rust,ignore
//! use rollout_mcts::mcts::{MctsPlanner, MctsConfig};
//!
//! let planner = MctsPlanner::new(&env, config)?
//!     .with_evaluation(MyValueEstimate::new());
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use config::MctsConfig;
pub use node::{MctsNode, NodeId, NodeStats};
pub use policy::{first_argmax, EvaluationPolicy, RandomRollout, SelectionPolicy, Uct};
pub use search::{plan, MctsPlanner};
pub use stats::SearchStats;
pub use tree::{MctsTree, TreeStats};
