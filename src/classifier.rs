//! Classification with a trained Hoeffding tree.
//!
//! Observations are routed exactly as during training but no statistic is
//! touched, so classification only needs `&self` and runs in parallel over
//! the rows of the input.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rayon::prelude::*;

use crate::criterion::FitnessFunction;
use crate::error::Result;
use crate::math::{argmax, normalize};
use crate::numeric::NumericSplit;
use crate::trainer::HoeffdingTree;

impl<F: FitnessFunction, N: NumericSplit> HoeffdingTree<F, N> {
    /// Predicted class and class distribution of the leaf `sample` reaches,
    /// without checking the width of `sample`.
    fn predict(&self, sample: ArrayView1<f64>) -> (usize, Array1<f64>) {
        let leaf = self.tree().route(sample);
        let counts = self
            .tree()
            .node(leaf)
            .map_or(&[][..], |node| node.class_counts());
        (argmax(counts), normalize(counts))
    }

    /// Classifies one observation.
    ///
    /// The class is the first most frequent one at the reached leaf, 0 for
    /// an empty leaf; the probabilities are the leaf's normalized class
    /// counts, all zeros for an empty leaf.
    pub fn classify_one(&self, sample: ArrayView1<f64>) -> Result<(usize, Array1<f64>)> {
        self.schema().check_width(sample.len())?;
        Ok(self.predict(sample))
    }

    /// Predicted class of every row of `data`.
    pub fn classify(&self, data: ArrayView2<f64>) -> Result<Vec<usize>> {
        self.schema().check_width(data.ncols())?;
        Ok((0..data.nrows())
            .into_par_iter()
            .map(|i| self.predict(data.row(i)).0)
            .collect())
    }

    /// Predicted class of every row of `data` and an
    /// `n_observations × num_classes` matrix of class probabilities.
    pub fn classify_with_probabilities(
        &self,
        data: ArrayView2<f64>,
    ) -> Result<(Vec<usize>, Array2<f64>)> {
        self.schema().check_width(data.ncols())?;
        let rows: Vec<(usize, Array1<f64>)> = (0..data.nrows())
            .into_par_iter()
            .map(|i| self.predict(data.row(i)))
            .collect();

        let mut probabilities = Array2::zeros((data.nrows(), self.num_classes()));
        let mut predictions = Vec::with_capacity(rows.len());
        for (i, (class, distribution)) in rows.into_iter().enumerate() {
            predictions.push(class);
            probabilities.row_mut(i).assign(&distribution);
        }
        Ok((predictions, probabilities))
    }
}
