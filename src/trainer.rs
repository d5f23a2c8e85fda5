//! Training of a single Hoeffding tree.
//!
//! `HoeffdingTree` is generic over the fitness function and the numeric
//! split strategy, so every combination is monomorphized and the per
//! observation path has no dynamic dispatch.
//!
//! Streaming training routes each observation to a leaf, updates the leaf
//! and, every `check_interval` observations, evaluates it with the
//! Hoeffding test. Batch training sees the whole partition of a leaf at
//! once and splits recursively with an explicit work stack.

use std::collections::BTreeMap;

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::HoeffdingTreeSettings;
use crate::criterion::FitnessFunction;
use crate::data::FeatureSchema;
use crate::error::{ConfigError, Result};
use crate::hoeffding::{HoeffdingTest, SplitDecision};
use crate::logger::{LogSink, TrainingLogger, Verbosity};
use crate::node::{LeafNode, Node, NodeIndex};
use crate::numeric::NumericSplit;
use crate::split_rules::SplitCandidate;
use crate::tree::{DecisionTree, TreeError};

/// Best split found at a leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitEvaluation {
    /// Dimension of the best candidate.
    pub feature: usize,
    /// The best candidate over all dimensions.
    pub best: SplitCandidate,
    /// Best quality among the other dimensions, at least 0.
    pub second_best: f64,
}

/// Finds the best candidate over every dimension of `leaf`.
///
/// Dimensions are scanned in order and a later one only takes the lead when
/// strictly better, so ties go to the lowest dimension. Returns `None` when
/// no dimension has a structural split.
pub fn evaluate_splits<F, N>(leaf: &LeafNode<N>, criterion: &F) -> Option<SplitEvaluation>
where
    F: FitnessFunction,
    N: NumericSplit,
{
    let mut best: Option<(usize, SplitCandidate)> = None;
    let mut second_best = 0.0f64;

    for (feature, observer) in leaf.observers().iter().enumerate() {
        let Some(candidate) = observer.best_split(criterion) else {
            continue;
        };
        let leads = best
            .as_ref()
            .map_or(true, |(_, leader)| candidate.quality > leader.quality);
        if leads {
            if let Some((_, previous)) = best.replace((feature, candidate)) {
                second_best = second_best.max(previous.quality);
            }
        } else {
            second_best = second_best.max(candidate.quality);
        }
    }

    best.map(|(feature, best)| SplitEvaluation {
        feature,
        best,
        second_best,
    })
}

/// A Hoeffding tree together with everything needed to keep training it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoeffdingTree<F, N> {
    settings: HoeffdingTreeSettings,
    schema: FeatureSchema,
    num_classes: usize,
    criterion: F,
    tree: DecisionTree<N>,
    samples_seen: usize,
    #[serde(skip)]
    log_sink: LogSink,
}

impl<F: FitnessFunction, N: NumericSplit> HoeffdingTree<F, N> {
    /// Creates an untrained tree made of a single empty leaf.
    pub fn new(
        schema: FeatureSchema,
        num_classes: usize,
        settings: HoeffdingTreeSettings,
    ) -> Result<Self> {
        settings.validate()?;
        if num_classes == 0 {
            return Err(ConfigError::NoClasses.into());
        }

        let root = LeafNode::new(&schema, num_classes, &settings);
        Ok(Self {
            settings,
            schema,
            num_classes,
            criterion: F::default(),
            tree: DecisionTree::new(root),
            samples_seen: 0,
            log_sink: LogSink::Stderr,
        })
    }

    /// Redirects training messages; a deserialized tree logs to stderr.
    pub fn set_log_sink(&mut self, sink: LogSink) {
        self.log_sink = sink;
    }

    fn logger(&self) -> TrainingLogger {
        TrainingLogger::with_sink(self.settings.verbosity, self.log_sink.clone())
    }

    /// Runs one pass over `data`, streaming or batch.
    ///
    /// The whole batch is validated first; on error the tree is unchanged.
    pub fn train(
        &mut self,
        data: ArrayView2<f64>,
        labels: &[usize],
        batch_mode: bool,
    ) -> Result<()> {
        self.schema
            .validate_training(data, labels, self.num_classes)?;

        if batch_mode {
            self.train_batch(data, labels)?;
        } else {
            self.train_stream(data, labels)?;
        }

        self.logger().log_pass(
            if batch_mode { "batch" } else { "streaming" },
            data.nrows(),
            self.num_nodes(),
            self.num_leaves(),
        );
        Ok(())
    }

    /// Runs every pass requested by the settings.
    ///
    /// The first pass follows `settings.batch_mode`; the remaining ones
    /// stream. Batch mode always performs exactly one pass.
    pub fn fit(&mut self, data: ArrayView2<f64>, labels: &[usize]) -> Result<()> {
        if self.settings.batch_mode && self.settings.passes > 1 {
            self.logger().warn(&format!(
                "batch mode performs a single pass; ignoring passes = {}",
                self.settings.passes
            ));
        }

        self.train(data, labels, self.settings.batch_mode)?;
        for _ in 1..self.settings.effective_passes() {
            self.train(data, labels, false)?;
        }
        Ok(())
    }

    /// Ingests a single observation.
    pub fn train_one(&mut self, sample: ArrayView1<f64>, label: usize) -> Result<()> {
        self.schema
            .validate_observation(self.samples_seen, sample, label, self.num_classes)?;
        self.ingest(sample, label)
    }

    fn train_stream(&mut self, data: ArrayView2<f64>, labels: &[usize]) -> Result<()> {
        for (sample, &label) in data.rows().into_iter().zip(labels) {
            self.ingest(sample, label)?;
        }
        Ok(())
    }

    /// Routes, updates, then evaluates the leaf when its interval is due.
    fn ingest(&mut self, sample: ArrayView1<f64>, label: usize) -> Result<()> {
        let interval = self.settings.effective_check_interval();
        let index = self.tree.route(sample);
        let leaf = self
            .tree
            .leaf_mut(index)
            .ok_or(TreeError::InvalidNodeIndex)?;

        leaf.observe(sample, label);
        self.samples_seen += 1;

        if leaf.samples_since_check >= interval {
            leaf.samples_since_check = 0;
            self.split_check(index)?;
        }
        Ok(())
    }

    /// Evaluates a leaf with the Hoeffding test and commits the split when
    /// the test passes. Returns the new children if the leaf split.
    fn split_check(&mut self, index: NodeIndex) -> Result<Option<SmallVec<[NodeIndex; 2]>>> {
        let logger = self.logger();
        let leaf = self.tree.leaf(index).ok_or(TreeError::InvalidNodeIndex)?;
        let n = leaf.samples_seen();
        if n < self.settings.min_samples {
            return Ok(None);
        }

        let Some(evaluation) = evaluate_splits(leaf, &self.criterion) else {
            if logger.enabled(Verbosity::Debug) {
                logger.debug(&format!("node {index}: no structural split after {n} observations"));
            }
            return Ok(None);
        };

        let range = self.criterion.range(self.num_classes);
        let test = HoeffdingTest::from_settings(&self.settings);
        match test.decide(evaluation.best.quality, evaluation.second_best, n, range) {
            SplitDecision::Split { forced } => {
                if forced && logger.enabled(Verbosity::Info) {
                    logger.info(&format!(
                        "node {index} reached max_samples = {}; forcing split",
                        self.settings.max_samples
                    ));
                }
                self.commit(index, evaluation, n).map(Some)
            }
            SplitDecision::Defer => {
                if logger.enabled(Verbosity::Debug) {
                    logger.debug(&format!(
                        "node {index}: n = {n}, best = {:.4}, second = {:.4}, epsilon = {:.4}; deferred",
                        evaluation.best.quality,
                        evaluation.second_best,
                        test.epsilon(range, n)
                    ));
                }
                Ok(None)
            }
        }
    }

    /// Turns leaf `index` into an internal node with one empty child per
    /// branch of the evaluated rule.
    fn commit(
        &mut self,
        index: NodeIndex,
        evaluation: SplitEvaluation,
        n: usize,
    ) -> Result<SmallVec<[NodeIndex; 2]>> {
        let SplitEvaluation { feature, best, .. } = evaluation;
        let leaves = (0..best.rule.num_branches())
            .map(|_| LeafNode::new(&self.schema, self.num_classes, &self.settings))
            .collect();
        let children = self.tree.split_node(index, feature, best.rule, leaves)?;

        let logger = self.logger();
        if logger.enabled(Verbosity::Info) {
            logger.info(&format!(
                "split node {index} on dimension {feature} after {n} observations \
                 (quality {:.4}, {} children)",
                best.quality,
                children.len()
            ));
        }
        Ok(children)
    }

    /// One materialize-and-split pass.
    ///
    /// Rows are grouped by the leaf they currently reach. Each group is fed
    /// to its leaf, which is then evaluated with the same Hoeffding test as
    /// in streaming mode; the only difference is that the leaf has seen its
    /// whole partition before deciding. After a split the rows are
    /// partitioned among the new children, which are processed the same way.
    ///
    /// A leaf that was empty before receiving its rows and whose split sends
    /// all of them to one child would recurse forever, so such a child only
    /// observes its rows and is not evaluated again in this pass.
    fn train_batch(&mut self, data: ArrayView2<f64>, labels: &[usize]) -> Result<()> {
        let mut groups: BTreeMap<NodeIndex, Vec<usize>> = BTreeMap::new();
        for (row, sample) in data.rows().into_iter().enumerate() {
            groups.entry(self.tree.route(sample)).or_default().push(row);
        }
        self.samples_seen += data.nrows();

        let mut stack: Vec<(NodeIndex, Vec<usize>, bool)> = groups
            .into_iter()
            .rev()
            .map(|(index, rows)| (index, rows, true))
            .collect();
        while let Some((index, rows, splittable)) = stack.pop() {
            let leaf = self
                .tree
                .leaf_mut(index)
                .ok_or(TreeError::InvalidNodeIndex)?;
            let fresh = leaf.samples_seen() == 0;
            leaf.observe_batch(data, labels, &rows);
            leaf.samples_since_check = 0;
            if !splittable {
                continue;
            }

            let Some(children) = self.split_check(index)? else {
                continue;
            };

            let internal = self
                .tree
                .node(index)
                .and_then(Node::as_internal)
                .ok_or(TreeError::NonLeafSplit)?;
            let column = data.column(internal.feature());
            let mut parts = vec![Vec::new(); children.len()];
            for &row in &rows {
                parts[internal.rule().branch(column[row])].push(row);
            }

            stack.extend(
                children
                    .into_iter()
                    .zip(parts)
                    .filter(|(_, part)| !part.is_empty())
                    .map(|(child, part)| {
                        let splittable = !fresh || part.len() < rows.len();
                        (child, part, splittable)
                    })
                    .rev(),
            );
        }
        Ok(())
    }

    /// The node arena.
    pub fn tree(&self) -> &DecisionTree<N> {
        &self.tree
    }

    /// Hyperparameters the tree was built with.
    pub fn settings(&self) -> &HoeffdingTreeSettings {
        &self.settings
    }

    /// Schema of the observations.
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Number of classes.
    #[inline]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Fitness function ranking the candidates.
    pub fn criterion(&self) -> &F {
        &self.criterion
    }

    /// Observations ingested so far, counting every pass.
    #[inline]
    pub fn samples_seen(&self) -> usize {
        self.samples_seen
    }

    /// Total number of nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.tree.num_nodes()
    }

    /// Number of leaves.
    pub fn num_leaves(&self) -> usize {
        self.tree.num_leaves()
    }

    /// Depth of the deepest leaf; 0 for a single leaf.
    pub fn depth(&self) -> usize {
        self.tree.max_depth()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::criterion::GiniImpurity;
    use crate::numeric::BinaryNumericSplit;
    use crate::split_rules::SplitRule;

    #[test]
    fn equal_dimensions_keep_the_first() {
        let settings = HoeffdingTreeSettings::default();
        let mut leaf: LeafNode<BinaryNumericSplit> =
            LeafNode::new(&FeatureSchema::numeric(2), 2, &settings);
        for i in 0..20 {
            let (value, label) = if i % 2 == 0 { (-1.0, 0) } else { (1.0, 1) };
            leaf.observe(array![value, value].view(), label);
        }

        let evaluation = evaluate_splits(&leaf, &GiniImpurity).unwrap();
        assert_eq!(evaluation.feature, 0);
        assert_eq!(evaluation.best.rule, SplitRule::Threshold(0.0));
        assert_eq!(evaluation.second_best, evaluation.best.quality);
        assert!(evaluation.best.quality > 0.0);
    }

    #[test]
    fn no_structural_split_yields_none() {
        let settings = HoeffdingTreeSettings::default();
        let mut leaf: LeafNode<BinaryNumericSplit> =
            LeafNode::new(&FeatureSchema::numeric(1), 2, &settings);
        leaf.observe(array![3.0].view(), 0);
        leaf.observe(array![3.0].view(), 1);
        assert_eq!(evaluate_splits(&leaf, &GiniImpurity), None);
    }
}
