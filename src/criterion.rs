//! Fitness functions used to score candidate splits.
//!
//! A candidate split is described by a count table with one row per branch
//! and one column per class. The score is the impurity of the unsplit node
//! minus the branch-weighted impurity of the children, so higher is better
//! and the "no split" candidate (a single branch) scores exactly zero.
//!
//! Two fitness functions are provided:
//! - `GiniImpurity`: reduction of Gini impurity, range `1 - 1/k`.
//! - `InformationGain`: reduction of entropy in bits, range `log2(k)`.

use std::fmt::Debug;

use ndarray::{ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Scores a candidate split from its branch × class count table.
pub trait FitnessFunction: Debug + Clone + Default + PartialEq + Send + Sync {
    /// Impurity of a single count vector.
    fn impurity(&self, counts: &[usize], total: usize) -> f64;

    /// Largest possible score for `num_classes` classes; the `R` of the
    /// Hoeffding bound.
    fn range(&self, num_classes: usize) -> f64;

    /// Impurity reduction of the split described by `counts`.
    ///
    /// Empty branches contribute nothing; an empty table scores zero.
    fn evaluate(&self, counts: ArrayView2<usize>) -> f64 {
        let class_totals: Vec<usize> = counts.sum_axis(Axis(0)).to_vec();
        let total: usize = class_totals.iter().sum();
        if total == 0 {
            return 0.0;
        }

        let mut gain = self.impurity(&class_totals, total);
        let mut branch = Vec::with_capacity(counts.ncols());
        for row in counts.rows() {
            branch.clear();
            branch.extend(row.iter().copied());
            let branch_total: usize = branch.iter().sum();
            if branch_total > 0 {
                gain -= (branch_total as f64 / total as f64) * self.impurity(&branch, branch_total);
            }
        }

        gain.max(0.0)
    }
}

/// Gini impurity `Σ f (1 - f)` over class frequencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiniImpurity;

impl FitnessFunction for GiniImpurity {
    fn impurity(&self, counts: &[usize], total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        counts
            .iter()
            .map(|&c| {
                let f = c as f64 / total as f64;
                f * (1.0 - f)
            })
            .sum()
    }

    fn range(&self, num_classes: usize) -> f64 {
        if num_classes == 0 {
            return 0.0;
        }
        1.0 - 1.0 / num_classes as f64
    }
}

/// Shannon entropy `-Σ f log2 f` over class frequencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformationGain;

impl FitnessFunction for InformationGain {
    fn impurity(&self, counts: &[usize], total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        counts
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let f = c as f64 / total as f64;
                -f * f.log2()
            })
            .sum()
    }

    fn range(&self, num_classes: usize) -> f64 {
        if num_classes <= 1 {
            return 0.0;
        }
        (num_classes as f64).log2()
    }
}
