//! `HoeffdingTreeModel` is the entry point of the crate. It picks one of
//! four monomorphized engines from the settings and forwards every call to
//! it, so callers never name the generic parameters.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::config::{CriterionKind, HoeffdingTreeSettings, NumericSplitKind};
use crate::criterion::{GiniImpurity, InformationGain};
use crate::data::FeatureSchema;
use crate::error::Result;
use crate::logger::LogSink;
use crate::numeric::{BinaryNumericSplit, BinnedNumericSplit};
use crate::trainer::HoeffdingTree;

/// Criterion and numeric strategy of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    /// Gini impurity, exact binary thresholds.
    GiniBinary,
    /// Gini impurity, Domingos bins.
    GiniDomingos,
    /// Information gain, exact binary thresholds.
    InfoGainBinary,
    /// Information gain, Domingos bins.
    InfoGainDomingos,
}

impl ModelKind {
    /// Kind selected by `settings`.
    pub fn from_settings(settings: &HoeffdingTreeSettings) -> Self {
        match (settings.criterion(), settings.numeric_split_strategy) {
            (CriterionKind::Gini, NumericSplitKind::Binary) => ModelKind::GiniBinary,
            (CriterionKind::Gini, NumericSplitKind::Domingos) => ModelKind::GiniDomingos,
            (CriterionKind::InfoGain, NumericSplitKind::Binary) => ModelKind::InfoGainBinary,
            (CriterionKind::InfoGain, NumericSplitKind::Domingos) => ModelKind::InfoGainDomingos,
        }
    }

    /// Fitness function of this kind.
    pub fn criterion(&self) -> CriterionKind {
        match self {
            ModelKind::GiniBinary | ModelKind::GiniDomingos => CriterionKind::Gini,
            ModelKind::InfoGainBinary | ModelKind::InfoGainDomingos => CriterionKind::InfoGain,
        }
    }

    /// Numeric split strategy of this kind.
    pub fn numeric_split(&self) -> NumericSplitKind {
        match self {
            ModelKind::GiniBinary | ModelKind::InfoGainBinary => NumericSplitKind::Binary,
            ModelKind::GiniDomingos | ModelKind::InfoGainDomingos => NumericSplitKind::Domingos,
        }
    }
}

/// A Hoeffding tree classifier with its criterion and numeric strategy
/// fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HoeffdingTreeModel {
    /// Gini impurity, exact binary thresholds.
    GiniBinary(HoeffdingTree<GiniImpurity, BinaryNumericSplit>),
    /// Gini impurity, Domingos bins.
    GiniDomingos(HoeffdingTree<GiniImpurity, BinnedNumericSplit>),
    /// Information gain, exact binary thresholds.
    InfoGainBinary(HoeffdingTree<InformationGain, BinaryNumericSplit>),
    /// Information gain, Domingos bins.
    InfoGainDomingos(HoeffdingTree<InformationGain, BinnedNumericSplit>),
}

/// Calls the same expression on whichever engine the model holds.
macro_rules! dispatch {
    ($model:expr, $tree:ident => $body:expr) => {
        match $model {
            HoeffdingTreeModel::GiniBinary($tree) => $body,
            HoeffdingTreeModel::GiniDomingos($tree) => $body,
            HoeffdingTreeModel::InfoGainBinary($tree) => $body,
            HoeffdingTreeModel::InfoGainDomingos($tree) => $body,
        }
    };
}

impl HoeffdingTreeModel {
    /// Creates an untrained model: a single empty leaf.
    pub fn new(
        schema: FeatureSchema,
        num_classes: usize,
        settings: HoeffdingTreeSettings,
    ) -> Result<Self> {
        Ok(match ModelKind::from_settings(&settings) {
            ModelKind::GiniBinary => {
                HoeffdingTreeModel::GiniBinary(HoeffdingTree::new(schema, num_classes, settings)?)
            }
            ModelKind::GiniDomingos => {
                HoeffdingTreeModel::GiniDomingos(HoeffdingTree::new(schema, num_classes, settings)?)
            }
            ModelKind::InfoGainBinary => HoeffdingTreeModel::InfoGainBinary(HoeffdingTree::new(
                schema,
                num_classes,
                settings,
            )?),
            ModelKind::InfoGainDomingos => HoeffdingTreeModel::InfoGainDomingos(
                HoeffdingTree::new(schema, num_classes, settings)?,
            ),
        })
    }

    /// Creates a model and runs the first training pass over `data`, batch
    /// or streaming according to `settings.batch_mode`.
    pub fn build_model(
        data: ArrayView2<f64>,
        schema: FeatureSchema,
        labels: &[usize],
        num_classes: usize,
        settings: HoeffdingTreeSettings,
    ) -> Result<Self> {
        schema.check_width(data.ncols())?;
        let batch_mode = settings.batch_mode;
        let mut model = Self::new(schema, num_classes, settings)?;
        model.train(data, labels, batch_mode)?;
        Ok(model)
    }

    /// Creates a model and runs every pass requested by `settings`.
    pub fn fit(
        data: ArrayView2<f64>,
        schema: FeatureSchema,
        labels: &[usize],
        num_classes: usize,
        settings: HoeffdingTreeSettings,
    ) -> Result<Self> {
        schema.check_width(data.ncols())?;
        let mut model = Self::new(schema, num_classes, settings)?;
        dispatch!(&mut model, tree => tree.fit(data, labels))?;
        Ok(model)
    }

    /// Runs one more training pass over `data`.
    pub fn train(&mut self, data: ArrayView2<f64>, labels: &[usize], batch_mode: bool) -> Result<()> {
        dispatch!(self, tree => tree.train(data, labels, batch_mode))
    }

    /// Redirects training messages to `sink`.
    pub fn set_log_sink(&mut self, sink: LogSink) {
        dispatch!(self, tree => tree.set_log_sink(sink))
    }

    /// Ingests a single observation in streaming mode.
    pub fn train_one(&mut self, sample: ArrayView1<f64>, label: usize) -> Result<()> {
        dispatch!(self, tree => tree.train_one(sample, label))
    }

    /// Predicted class of every row of `data`.
    pub fn classify(&self, data: ArrayView2<f64>) -> Result<Vec<usize>> {
        dispatch!(self, tree => tree.classify(data))
    }

    /// Predicted classes and an `n_observations × num_classes` probability
    /// matrix.
    pub fn classify_with_probabilities(
        &self,
        data: ArrayView2<f64>,
    ) -> Result<(Vec<usize>, Array2<f64>)> {
        dispatch!(self, tree => tree.classify_with_probabilities(data))
    }

    /// Predicted class and probabilities of one observation.
    pub fn classify_one(&self, sample: ArrayView1<f64>) -> Result<(usize, Array1<f64>)> {
        dispatch!(self, tree => tree.classify_one(sample))
    }

    /// Criterion and numeric strategy of the model.
    pub fn kind(&self) -> ModelKind {
        match self {
            HoeffdingTreeModel::GiniBinary(_) => ModelKind::GiniBinary,
            HoeffdingTreeModel::GiniDomingos(_) => ModelKind::GiniDomingos,
            HoeffdingTreeModel::InfoGainBinary(_) => ModelKind::InfoGainBinary,
            HoeffdingTreeModel::InfoGainDomingos(_) => ModelKind::InfoGainDomingos,
        }
    }

    /// Total number of nodes, leaves included.
    pub fn num_nodes(&self) -> usize {
        dispatch!(self, tree => tree.num_nodes())
    }

    /// Number of leaves.
    pub fn num_leaves(&self) -> usize {
        dispatch!(self, tree => tree.num_leaves())
    }

    /// Depth of the deepest leaf.
    pub fn depth(&self) -> usize {
        dispatch!(self, tree => tree.depth())
    }

    /// Observations ingested so far, counting every pass.
    pub fn samples_seen(&self) -> usize {
        dispatch!(self, tree => tree.samples_seen())
    }

    /// Hyperparameters the model was built with.
    pub fn settings(&self) -> &HoeffdingTreeSettings {
        dispatch!(self, tree => tree.settings())
    }

    /// Schema of the observations.
    pub fn schema(&self) -> &FeatureSchema {
        dispatch!(self, tree => tree.schema())
    }

    /// Number of classes.
    pub fn num_classes(&self) -> usize {
        dispatch!(self, tree => tree.num_classes())
    }
}
