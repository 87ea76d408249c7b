//! MCTS node structures.
//!
//! Uses arena-based allocation with index references (NodeId). Parent links
//! are plain indices, so upward traversal during backpropagation never needs
//! shared ownership.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Index into the MctsTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// Running statistics of the returns backpropagated through a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStats {
    /// Number of completed iterations that passed through this node.
    pub visits: u32,

    /// Sum of all returns backpropagated through this node.
    pub total_return: f64,

    /// `total_return / visits`, recomputed on every visit (0 while unvisited).
    pub mean_value: f64,
}

impl NodeStats {
    /// Fold one more return into the running average.
    pub fn record(&mut self, value: f64) {
        self.visits += 1;
        self.total_return += value;
        self.mean_value = self.total_return / self.visits as f64;
    }

    /// Has this node been evaluated at least once?
    #[inline]
    #[must_use]
    pub fn is_visited(&self) -> bool {
        self.visits > 0
    }
}

/// A node in the MCTS tree.
///
/// Owns a private snapshot of the simulator as it stands at this node.
#[derive(Debug)]
pub struct MctsNode<S> {
    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Action that produced this node from its parent (None for root).
    pub action: Option<usize>,

    /// Depth in tree (root = 0).
    pub depth: u32,

    /// Visit statistics.
    pub stats: NodeStats,

    /// The simulator reported termination on reaching this node.
    pub is_terminal: bool,

    /// Children in action-index order. Empty until expanded, then one per action.
    pub children: SmallVec<[NodeId; 4]>,

    /// Simulator state at this node.
    pub sim: S,
}

impl<S> MctsNode<S> {
    /// Create a new child node.
    pub fn new(parent: NodeId, action: usize, depth: u32, sim: S, is_terminal: bool) -> Self {
        Self {
            parent,
            action: Some(action),
            depth,
            stats: NodeStats::default(),
            is_terminal,
            children: SmallVec::new(),
            sim,
        }
    }

    /// Create a root node.
    pub fn root(sim: S) -> Self {
        Self {
            parent: NodeId::NONE,
            action: None,
            depth: 0,
            stats: NodeStats::default(),
            is_terminal: false,
            children: SmallVec::new(),
            sim,
        }
    }

    /// Total visits to this node.
    #[inline]
    #[must_use]
    pub fn visits(&self) -> u32 {
        self.stats.visits
    }

    /// Mean backpropagated return.
    #[inline]
    #[must_use]
    pub fn mean_value(&self) -> f64 {
        self.stats.mean_value
    }

    /// Is this a leaf of the current tree?
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Is this the root?
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
