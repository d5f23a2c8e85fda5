//! The node arena of a Hoeffding tree. Nodes live in a vector and refer to
//! their children by index, so a split rewrites one slot in place and
//! appends the new leaves at the end.

use std::mem;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::node::{InternalNode, LeafNode, Node, NodeIndex};
use crate::split_rules::SplitRule;

/// A `DecisionTree` is an arena of nodes rooted at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree<N> {
    /// Node `i` of the tree; node 0 is the root.
    nodes: Vec<Node<N>>,
    /// Depth of node `i`, the root having depth 0.
    depth: Vec<usize>,
}

/// Represents errors related to decision tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// When attempting to split a node that is not a leaf.
    #[error("Cannot split a non-leaf node")]
    NonLeafSplit,
    /// When the node index does not exist.
    #[error("Node index does not exist")]
    InvalidNodeIndex,
    /// When the number of new leaves differs from the rule's branches.
    #[error("Split rule has {expected} branches but {got} leaves were given")]
    BranchCountMismatch {
        /// Branches of the rule.
        expected: usize,
        /// Leaves supplied.
        got: usize,
    },
}

impl<N> DecisionTree<N> {
    /// Creates a tree holding only `root`.
    ///
    /// Index accessing allows one to avoid borrow checker issues related to
    /// classical recursive tree implementations, and an index stays valid for
    /// the lifetime of the tree.
    pub fn new(root: LeafNode<N>) -> Self {
        Self {
            nodes: vec![Node::Leaf(root)],
            depth: vec![0],
        }
    }

    /// Appends a leaf at `depth` and returns its index.
    fn add_node(&mut self, leaf: LeafNode<N>, depth: usize) -> NodeIndex {
        let node_id = self.nodes.len();
        self.nodes.push(Node::Leaf(leaf));
        self.depth.push(depth);
        node_id
    }

    /// Node at `index`.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> Option<&Node<N>> {
        self.nodes.get(index)
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> &[Node<N>] {
        &self.nodes
    }

    /// Leaf at `index`, if that node is still a leaf.
    pub fn leaf(&self, index: NodeIndex) -> Option<&LeafNode<N>> {
        self.nodes.get(index).and_then(Node::as_leaf)
    }

    /// Mutable leaf at `index`, if that node is still a leaf.
    pub fn leaf_mut(&mut self, index: NodeIndex) -> Option<&mut LeafNode<N>> {
        match self.nodes.get_mut(index) {
            Some(Node::Leaf(leaf)) => Some(leaf),
            _ => None,
        }
    }

    /// Checks whether the passed index is a leaf node.
    #[inline]
    pub fn is_leaf(&self, index: NodeIndex) -> bool {
        self.nodes.get(index).map_or(false, Node::is_leaf)
    }

    /// Children of `index`; empty for leaves.
    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        match self.nodes.get(index) {
            Some(Node::Internal(internal)) => internal.children(),
            _ => &[],
        }
    }

    /// Depth of _this_ node in the `DecisionTree`.
    #[inline]
    pub fn node_depth(&self, index: NodeIndex) -> usize {
        self.depth[index]
    }

    /// Splits a leaf node into an internal node.
    ///
    /// The leaf's class counts are kept, frozen, by the internal node; its
    /// observers are dropped. One new leaf is appended per branch of `rule`,
    /// in branch order.
    pub fn split_node(
        &mut self,
        node_index: NodeIndex,
        feature: usize,
        rule: SplitRule,
        leaves: Vec<LeafNode<N>>,
    ) -> Result<SmallVec<[NodeIndex; 2]>, TreeError> {
        if node_index >= self.nodes.len() {
            return Err(TreeError::InvalidNodeIndex);
        }

        if !self.is_leaf(node_index) {
            return Err(TreeError::NonLeafSplit);
        }

        if leaves.len() != rule.num_branches() {
            return Err(TreeError::BranchCountMismatch {
                expected: rule.num_branches(),
                got: leaves.len(),
            });
        }

        let class_counts = match &mut self.nodes[node_index] {
            Node::Leaf(leaf) => mem::take(&mut leaf.class_counts),
            Node::Internal(_) => return Err(TreeError::NonLeafSplit),
        };

        let child_depth = self.depth[node_index] + 1;
        let children: SmallVec<[NodeIndex; 2]> = leaves
            .into_iter()
            .map(|leaf| self.add_node(leaf, child_depth))
            .collect();

        // Update the current node; its observers are dropped here.
        self.nodes[node_index] = Node::Internal(InternalNode {
            feature,
            rule,
            children: children.clone(),
            class_counts,
        });

        Ok(children)
    }

    /// Index of the leaf `sample` is routed to.
    pub fn route(&self, sample: ArrayView1<f64>) -> NodeIndex {
        let mut node = 0;
        loop {
            match &self.nodes[node] {
                Node::Leaf(_) => return node,
                Node::Internal(internal) => node = internal.child_for(sample),
            }
        }
    }

    /// Total number of nodes, leaves included.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves.
    pub fn num_leaves(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Depth of the deepest node.
    pub fn max_depth(&self) -> usize {
        self.depth.iter().copied().max().unwrap_or(0)
    }

    /// Iterator over `(index, leaf)` pairs.
    pub fn leaves(&self) -> impl Iterator<Item = (NodeIndex, &LeafNode<N>)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| node.as_leaf().map(|leaf| (index, leaf)))
    }
}
