//! Arena-based MCTS tree.
//!
//! Uses a flat `Vec<MctsNode<S>>` with index-based references. Nodes are
//! only ever appended during a search; the whole arena is dropped at once
//! when the tree is rebuilt or the planner goes away.

use super::node::{MctsNode, NodeId};

/// Arena-based MCTS tree.
///
/// Nodes are stored in a flat vector and referenced by `NodeId` indices.
/// This avoids reference counting overhead and parent/child ownership cycles.
#[derive(Debug)]
pub struct MctsTree<S> {
    /// All nodes in the tree.
    nodes: Vec<MctsNode<S>>,

    /// The root node ID (always 0).
    root: NodeId,
}

impl<S> MctsTree<S> {
    /// Create a new tree whose root holds `sim`.
    pub fn new(sim: S) -> Self {
        Self::with_capacity(sim, 1024)
    }

    /// Create a tree with custom initial capacity.
    pub fn with_capacity(sim: S, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(MctsNode::root(sim));
        Self {
            nodes,
            root: NodeId::new(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MctsNode<S> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode<S> {
        &mut self.nodes[id.0 as usize]
    }

    /// Append a child under `parent`, returning its ID.
    ///
    /// Children keep insertion order, which is action-index order when the
    /// caller expands actions `0..n` in sequence.
    pub fn add_child(&mut self, parent: NodeId, action: usize, sim: S, is_terminal: bool) -> NodeId {
        let depth = self.get(parent).depth + 1;
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(MctsNode::new(parent, action, depth, sim, is_terminal));
        self.get_mut(parent).children.push(id);
        id
    }

    /// Add `value` to every node from `from` up to and including the root.
    ///
    /// Every ancestor receives the same undiscounted value.
    pub fn backpropagate(&mut self, from: NodeId, value: f64) {
        let mut current = from;
        while !current.is_none() {
            let node = self.get_mut(current);
            node.stats.record(value);
            current = node.parent;
        }
    }

    /// Children of a node, in action-index order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let max_depth = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        let terminal_count = self.nodes.iter().filter(|n| n.is_terminal).count();
        let expanded_count = self.nodes.iter().filter(|n| !n.is_leaf()).count();

        TreeStats {
            node_count: self.nodes.len(),
            max_depth,
            terminal_count,
            expanded_count,
        }
    }

    /// Get the root node.
    #[must_use]
    pub fn root_node(&self) -> &MctsNode<S> {
        self.get(self.root)
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MctsNode<S>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }
}

/// Statistics about the MCTS tree.
#[derive(Clone, Debug, Default)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Maximum depth reached.
    pub max_depth: u32,

    /// Number of terminal nodes.
    pub terminal_count: usize,

    /// Number of nodes with children.
    pub expanded_count: usize,
}

impl TreeStats {
    /// Average children per expanded node.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        if self.expanded_count == 0 {
            0.0
        } else {
            (self.node_count - 1) as f64 / self.expanded_count as f64
        }
    }
}
