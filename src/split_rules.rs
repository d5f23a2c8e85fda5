//! Split observers and the split rules they propose.
//!
//! Every leaf keeps one observer per input dimension. An observer
//! accumulates the `(value, label)` pairs routed to its leaf and, on request,
//! proposes the best split of that dimension together with its quality.
//!
//! Includes:
//! - `SplitObserver`: Trait defining the interface for split observers.
//! - `CategoricalSplit`: One class count row per category code.
//! - `SplitRule`: The rule an internal node applies to route observations.
//! - `FeatureObserver`: Enum holding the observer of one dimension.
//!
//! Numeric observers live in [`crate::numeric`].

use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::config::HoeffdingTreeSettings;
use crate::criterion::FitnessFunction;
use crate::data::Dimension;
use crate::math::category_code;
use crate::numeric::NumericSplit;

/// Split observer interface for summarizing one dimension at a leaf.
pub trait SplitObserver {
    /// The data type associated with the observed dimension.
    type Value;

    /// Adds one observation to the summary.
    fn observe(&mut self, value: Self::Value, label: usize);

    /// Proposes the best split of this dimension, or `None` when no split
    /// would send observations to at least two branches.
    fn best_split<F: FitnessFunction>(&self, criterion: &F) -> Option<SplitCandidate>;

    /// Number of scalar cells held by the summary.
    fn summary_size(&self) -> usize;
}

/// A proposed split of one dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitCandidate {
    /// Score of the split under the criterion; never negative.
    pub quality: f64,
    /// Routing rule the split would install.
    pub rule: SplitRule,
}

/// Rule an internal node uses to pick a child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SplitRule {
    /// `value <= threshold` goes to branch 0, everything else to branch 1.
    Threshold(f64),
    /// One branch per category seen when the split was committed.
    Categories {
        /// Branch of each category code, `None` for codes never seen.
        branch_of: Vec<Option<usize>>,
        /// Branch for codes without one of their own.
        fallback: usize,
    },
}

impl SplitRule {
    /// Number of children an internal node with this rule owns.
    pub fn num_branches(&self) -> usize {
        match self {
            SplitRule::Threshold(_) => 2,
            SplitRule::Categories { branch_of, .. } => branch_of.iter().flatten().count(),
        }
    }

    /// Branch taken by `value`.
    ///
    /// Unseen, out-of-range and non-integral category codes go to the
    /// fallback branch.
    #[inline]
    pub fn branch(&self, value: f64) -> usize {
        match self {
            SplitRule::Threshold(threshold) => {
                if value <= *threshold {
                    0
                } else {
                    1
                }
            }
            SplitRule::Categories {
                branch_of,
                fallback,
            } => category_code(value, branch_of.len())
                .and_then(|code| branch_of[code])
                .unwrap_or(*fallback),
        }
    }
}

/// Class counts of a categorical dimension, one row per category code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalSplit {
    counts: Array2<usize>,
}

impl CategoricalSplit {
    /// Creates an empty `cardinality × num_classes` table.
    pub fn new(cardinality: usize, num_classes: usize) -> Self {
        Self {
            counts: Array2::zeros((cardinality, num_classes)),
        }
    }

    /// Number of category codes.
    #[inline]
    pub fn cardinality(&self) -> usize {
        self.counts.nrows()
    }

    /// The category × class count table.
    pub fn counts(&self) -> ArrayView2<usize> {
        self.counts.view()
    }
}

impl SplitObserver for CategoricalSplit {
    type Value = usize;

    fn observe(&mut self, code: usize, label: usize) {
        self.counts[[code, label]] += 1;
    }

    fn best_split<F: FitnessFunction>(&self, criterion: &F) -> Option<SplitCandidate> {
        let totals = self.counts.sum_axis(Axis(1));
        let seen: Vec<usize> = (0..self.cardinality()).filter(|&c| totals[c] > 0).collect();
        if seen.len() < 2 {
            return None;
        }

        let table = self.counts.select(Axis(0), &seen);
        let quality = criterion.evaluate(table.view());

        let mut branch_of = vec![None; self.cardinality()];
        let mut fallback = 0;
        for (branch, &code) in seen.iter().enumerate() {
            branch_of[code] = Some(branch);
            if totals[code] > totals[seen[fallback]] {
                fallback = branch;
            }
        }

        Some(SplitCandidate {
            quality,
            rule: SplitRule::Categories {
                branch_of,
                fallback,
            },
        })
    }

    fn summary_size(&self) -> usize {
        self.counts.len()
    }
}

/// Holds the observer of one dimension as enum variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureObserver<N> {
    /// Numeric dimension summarized by the model's numeric strategy.
    Numeric(N),
    /// Categorical dimension.
    Categorical(CategoricalSplit),
}

impl<N: NumericSplit> FeatureObserver<N> {
    /// Creates an empty observer for `dimension`.
    pub fn new(dimension: Dimension, num_classes: usize, settings: &HoeffdingTreeSettings) -> Self {
        match dimension {
            Dimension::Numeric => FeatureObserver::Numeric(N::new(num_classes, settings)),
            Dimension::Categorical { cardinality } => {
                FeatureObserver::Categorical(CategoricalSplit::new(cardinality, num_classes))
            }
        }
    }

    /// Adds one observation; category codes are validated before training.
    #[inline]
    pub fn observe(&mut self, value: f64, label: usize) {
        match self {
            FeatureObserver::Numeric(numeric) => numeric.observe(value, label),
            FeatureObserver::Categorical(categorical) => {
                if let Some(code) = category_code(value, categorical.cardinality()) {
                    categorical.observe(code, label);
                }
            }
        }
    }

    /// Calls the corresponding `best_split` for each variant.
    pub fn best_split<F: FitnessFunction>(&self, criterion: &F) -> Option<SplitCandidate> {
        match self {
            FeatureObserver::Numeric(numeric) => numeric.best_split(criterion),
            FeatureObserver::Categorical(categorical) => categorical.best_split(criterion),
        }
    }

    /// Number of scalar cells held by the observer.
    pub fn summary_size(&self) -> usize {
        match self {
            FeatureObserver::Numeric(numeric) => numeric.summary_size(),
            FeatureObserver::Categorical(categorical) => categorical.summary_size(),
        }
    }
}
