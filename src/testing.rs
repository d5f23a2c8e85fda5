//! Seeded synthetic data sets for tests and benchmarks.
//!
//! Every generator takes a seed and returns the same matrix and labels for
//! the same arguments.

use ndarray::{Array2, Axis};
use rand::prelude::*;
use rand_distr::StandardNormal;

/// Two classes separated along dimension 0.
///
/// Class 0 is centered at `-mean` and class 1 at `+mean` with unit standard
/// deviation; the other `noise_dims` dimensions are standard normal noise.
/// Labels are drawn with equal probability.
pub fn two_gaussians(n: usize, mean: f64, noise_dims: usize, seed: u64) -> (Array2<f64>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Array2::zeros((n, 1 + noise_dims));
    let mut labels = Vec::with_capacity(n);

    for mut row in data.rows_mut() {
        let label = usize::from(rng.gen_bool(0.5));
        let center = if label == 0 { -mean } else { mean };
        let z: f64 = rng.sample(StandardNormal);
        row[0] = center + z;
        for value in row.iter_mut().skip(1) {
            *value = rng.sample(StandardNormal);
        }
        labels.push(label);
    }

    (data, labels)
}

/// `num_classes` spherical blobs in `dims` dimensions.
///
/// Class `c` is centered at `c * spacing` in every dimension with unit
/// standard deviation.
pub fn gaussian_blobs(
    n: usize,
    num_classes: usize,
    dims: usize,
    spacing: f64,
    seed: u64,
) -> (Array2<f64>, Vec<usize>) {
    assert!(num_classes > 0);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Array2::zeros((n, dims));
    let mut labels = Vec::with_capacity(n);

    for mut row in data.rows_mut() {
        let label = rng.gen_range(0..num_classes);
        for value in row.iter_mut() {
            let z: f64 = rng.sample(StandardNormal);
            *value = label as f64 * spacing + z;
        }
        labels.push(label);
    }

    (data, labels)
}

/// A categorical dimension that decides the class plus a noise dimension.
///
/// Dimension 0 holds codes in `0..cardinality` and the label is
/// `code % 2`; dimension 1 is standard normal noise.
pub fn categorical_parity(n: usize, cardinality: usize, seed: u64) -> (Array2<f64>, Vec<usize>) {
    assert!(cardinality > 0);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Array2::zeros((n, 2));
    let mut labels = Vec::with_capacity(n);

    for mut row in data.rows_mut() {
        let code = rng.gen_range(0..cardinality);
        row[0] = code as f64;
        row[1] = rng.sample(StandardNormal);
        labels.push(code % 2);
    }

    (data, labels)
}

/// Uniform features in `[0, 1)` with labels drawn independently of them.
///
/// No dimension carries any information about the class.
pub fn label_noise(n: usize, dims: usize, num_classes: usize, seed: u64) -> (Array2<f64>, Vec<usize>) {
    assert!(num_classes > 0);
    let mut rng = StdRng::seed_from_u64(seed);
    let data = Array2::from_shape_simple_fn((n, dims), || rng.gen::<f64>());
    let labels = (0..n).map(|_| rng.gen_range(0..num_classes)).collect();
    (data, labels)
}

/// Deterministic train/test split indices.
///
/// Returns `(train_idx, test_idx)`.
pub fn split_indices(rows: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    assert!((0.0..1.0).contains(&test_fraction));
    let mut idx: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    idx.shuffle(&mut rng);

    let test_len = ((rows as f64) * test_fraction).round() as usize;
    let (test, train) = idx.split_at(test_len.min(rows));
    (train.to_vec(), test.to_vec())
}

/// Rows `idx` of `data` with their labels.
pub fn select(data: &Array2<f64>, labels: &[usize], idx: &[usize]) -> (Array2<f64>, Vec<usize>) {
    (
        data.select(Axis(0), idx),
        idx.iter().map(|&i| labels[i]).collect(),
    )
}

/// Fraction of predictions equal to the labels; 0 for empty input.
pub fn accuracy(predictions: &[usize], labels: &[usize]) -> f64 {
    assert_eq!(predictions.len(), labels.len());
    if labels.is_empty() {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .zip(labels)
        .filter(|(p, l)| p == l)
        .count();
    correct as f64 / labels.len() as f64
}
