//! Leaf and internal nodes of a Hoeffding tree.

use ndarray::{ArrayView1, ArrayView2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::HoeffdingTreeSettings;
use crate::data::FeatureSchema;
use crate::numeric::NumericSplit;
use crate::split_rules::{FeatureObserver, SplitRule};

/// Stable index of a node in the tree arena.
pub type NodeIndex = usize;

/// A node is a leaf that accumulates statistics, or an internal node that
/// has committed a split. A leaf becomes internal at most once and never
/// reverts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node<N> {
    /// Still accumulating.
    Leaf(LeafNode<N>),
    /// Split committed.
    Internal(InternalNode),
}

impl<N> Node<N> {
    /// Returns true for leaves.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// The leaf, if this node is one.
    pub fn as_leaf(&self) -> Option<&LeafNode<N>> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Internal(_) => None,
        }
    }

    /// The internal node, if this node is one.
    pub fn as_internal(&self) -> Option<&InternalNode> {
        match self {
            Node::Leaf(_) => None,
            Node::Internal(internal) => Some(internal),
        }
    }

    /// Class counts observed by this node while it was a leaf.
    pub fn class_counts(&self) -> &[usize] {
        match self {
            Node::Leaf(leaf) => &leaf.class_counts,
            Node::Internal(internal) => &internal.class_counts,
        }
    }
}

/// A leaf: one observer per dimension plus the class counts of every
/// observation routed here since the leaf was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafNode<N> {
    pub(crate) class_counts: Vec<usize>,
    pub(crate) observers: Vec<FeatureObserver<N>>,
    pub(crate) samples_since_check: usize,
}

impl<N: NumericSplit> LeafNode<N> {
    /// Creates an empty leaf with fresh observers for every dimension.
    pub fn new(schema: &FeatureSchema, num_classes: usize, settings: &HoeffdingTreeSettings) -> Self {
        Self {
            class_counts: vec![0; num_classes],
            observers: schema
                .dimensions()
                .iter()
                .map(|&dimension| FeatureObserver::new(dimension, num_classes, settings))
                .collect(),
            samples_since_check: 0,
        }
    }

    /// Adds one observation to the class counts and every observer.
    pub fn observe(&mut self, sample: ArrayView1<f64>, label: usize) {
        self.class_counts[label] += 1;
        self.samples_since_check += 1;
        for (observer, &value) in self.observers.iter_mut().zip(sample.iter()) {
            observer.observe(value, label);
        }
    }

    /// Adds rows `rows` of `data` at once. Each dimension's observer owns
    /// disjoint state, so dimensions are accumulated in parallel.
    pub fn observe_batch(&mut self, data: ArrayView2<f64>, labels: &[usize], rows: &[usize]) {
        for &row in rows {
            self.class_counts[labels[row]] += 1;
        }
        self.samples_since_check += rows.len();

        self.observers
            .par_iter_mut()
            .enumerate()
            .for_each(|(feature, observer)| {
                let column = data.column(feature);
                for &row in rows {
                    observer.observe(column[row], labels[row]);
                }
            });
    }
}

impl<N> LeafNode<N> {
    /// Class counts since creation.
    pub fn class_counts(&self) -> &[usize] {
        &self.class_counts
    }

    /// Observations routed here since creation.
    pub fn samples_seen(&self) -> usize {
        self.class_counts.iter().sum()
    }

    /// Observations since the last evaluation.
    pub fn samples_since_check(&self) -> usize {
        self.samples_since_check
    }

    /// Per-dimension observers.
    pub fn observers(&self) -> &[FeatureObserver<N>] {
        &self.observers
    }
}

/// An internal node routes observations with `rule` applied to `feature`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalNode {
    pub(crate) feature: usize,
    pub(crate) rule: SplitRule,
    pub(crate) children: SmallVec<[NodeIndex; 2]>,
    /// Counts the node held as a leaf when it split.
    pub(crate) class_counts: Vec<usize>,
}

impl InternalNode {
    /// Dimension the split tests.
    #[inline]
    pub fn feature(&self) -> usize {
        self.feature
    }

    /// The committed split rule.
    pub fn rule(&self) -> &SplitRule {
        &self.rule
    }

    /// Children in branch order.
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// Child that `sample` is routed to.
    #[inline]
    pub fn child_for(&self, sample: ArrayView1<f64>) -> NodeIndex {
        self.children[self.rule.branch(sample[self.feature])]
    }
}
