//! Numeric split strategies.
//!
//! - `BinaryNumericSplit`: keeps the class counts of every distinct value
//!   in sorted order and finds the exact best binary threshold.
//! - `BinnedNumericSplit`: buffers an initial quota of observations, then
//!   fixes equal-width bins and only keeps per-bin class counts
//!   (Domingos & Hulten).

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Debug;

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::config::HoeffdingTreeSettings;
use crate::criterion::FitnessFunction;
use crate::split_rules::{SplitCandidate, SplitObserver, SplitRule};

/// A numeric split strategy the tree can instantiate per leaf and dimension.
pub trait NumericSplit:
    SplitObserver<Value = f64> + Debug + Clone + PartialEq + Send + Sync
{
    /// Creates an empty summary.
    fn new(num_classes: usize, settings: &HoeffdingTreeSettings) -> Self;
}

/// An observed feature value, totally ordered so it can key a `BTreeMap`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservedValue(pub f64);

impl PartialEq for ObservedValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ObservedValue {}

impl PartialOrd for ObservedValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ObservedValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Threshold strictly between `lower` and `upper` when representable,
/// otherwise `lower`; `value <= threshold` then separates the two.
#[inline]
fn midpoint(lower: f64, upper: f64) -> f64 {
    let mid = lower + (upper - lower) / 2.0;
    if mid >= lower && mid < upper {
        mid
    } else {
        lower
    }
}

/// True when both count vectors hold a single, identical class.
fn same_pure_class(a: &[usize], b: &[usize]) -> bool {
    let class_of = |counts: &[usize]| {
        let mut present = counts.iter().enumerate().filter(|&(_, &c)| c > 0);
        match (present.next(), present.next()) {
            (Some((class, _)), None) => Some(class),
            _ => None,
        }
    };
    match (class_of(a), class_of(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Exact binary threshold search over the distinct values seen by a leaf.
///
/// Observations with equal values share one count vector, so memory grows
/// with the number of distinct values, and an insertion is `O(log d)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryNumericSplit {
    num_classes: usize,
    #[serde(with = "value_map")]
    sorted: BTreeMap<ObservedValue, Vec<usize>>,
    class_counts: Vec<usize>,
}

impl BinaryNumericSplit {
    /// Creates an empty summary for `num_classes` classes.
    pub fn with_classes(num_classes: usize) -> Self {
        Self {
            num_classes,
            sorted: BTreeMap::new(),
            class_counts: vec![0; num_classes],
        }
    }

    /// Number of distinct values observed.
    pub fn distinct_values(&self) -> usize {
        self.sorted.len()
    }
}

impl NumericSplit for BinaryNumericSplit {
    fn new(num_classes: usize, _settings: &HoeffdingTreeSettings) -> Self {
        Self::with_classes(num_classes)
    }
}

impl SplitObserver for BinaryNumericSplit {
    type Value = f64;

    fn observe(&mut self, value: f64, label: usize) {
        let num_classes = self.num_classes;
        self.sorted
            .entry(ObservedValue(value))
            .or_insert_with(|| vec![0; num_classes])[label] += 1;
        self.class_counts[label] += 1;
    }

    fn best_split<F: FitnessFunction>(&self, criterion: &F) -> Option<SplitCandidate> {
        if self.sorted.len() < 2 {
            return None;
        }

        // Row 0 is the left branch, row 1 the right branch.
        let mut table = Array2::<usize>::zeros((2, self.num_classes));
        for (class, &count) in self.class_counts.iter().enumerate() {
            table[[1, class]] = count;
        }

        let mut best: Option<(f64, f64)> = None;
        let mut values = self.sorted.iter().peekable();
        while let Some((value, counts)) = values.next() {
            for (class, &count) in counts.iter().enumerate() {
                table[[0, class]] += count;
                table[[1, class]] -= count;
            }
            let Some((next, next_counts)) = values.peek() else {
                break;
            };
            // A cut between two values of the same single class is never
            // better than a cut at a class boundary (Fayyad & Irani).
            if best.is_some() && same_pure_class(counts, next_counts) {
                continue;
            }

            let quality = criterion.evaluate(table.view());
            if best.map_or(true, |(q, _)| quality > q) {
                best = Some((quality, midpoint(value.0, next.0)));
            }
        }

        best.map(|(quality, threshold)| SplitCandidate {
            quality,
            rule: SplitRule::Threshold(threshold),
        })
    }

    fn summary_size(&self) -> usize {
        self.sorted.len() * self.num_classes
    }
}

/// Equal-width histogram over a range fixed after an initial quota.
///
/// Until `observations_before_binning` pairs have been seen they are kept
/// verbatim. The buffer then defines `[min, max]`, which is cut into `bins`
/// intervals; the buffer is replayed into the histogram and dropped. Bin `i`
/// covers `(split_points[i - 1], split_points[i]]`, with the outer bins open
/// towards infinity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinnedNumericSplit {
    num_classes: usize,
    bins: usize,
    observations_before_binning: usize,
    buffer: Vec<(f64, usize)>,
    binned: bool,
    split_points: Vec<f64>,
    counts: Array2<usize>,
}

impl BinnedNumericSplit {
    /// Creates an empty summary.
    pub fn with_bins(num_classes: usize, bins: usize, observations_before_binning: usize) -> Self {
        Self {
            num_classes,
            bins,
            observations_before_binning,
            buffer: Vec::with_capacity(observations_before_binning),
            binned: false,
            split_points: Vec::new(),
            counts: Array2::zeros((0, num_classes)),
        }
    }

    /// True once the bin boundaries are fixed.
    #[inline]
    pub fn is_binned(&self) -> bool {
        self.binned
    }

    /// Bin boundaries; empty before binning.
    pub fn split_points(&self) -> &[f64] {
        &self.split_points
    }

    #[inline]
    fn bin_of(&self, value: f64) -> usize {
        self.split_points.partition_point(|&p| p < value)
    }

    fn fix_bins(&mut self) {
        let buffer = std::mem::take(&mut self.buffer);
        let (min, max) = buffer
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(v, _)| {
                (lo.min(v), hi.max(v))
            });
        let width = (max - min) / self.bins as f64;

        self.split_points = (1..self.bins).map(|i| min + width * i as f64).collect();
        self.counts = Array2::zeros((self.bins, self.num_classes));
        self.binned = true;

        for (value, label) in buffer {
            let bin = self.bin_of(value);
            self.counts[[bin, label]] += 1;
        }
    }
}

impl NumericSplit for BinnedNumericSplit {
    fn new(num_classes: usize, settings: &HoeffdingTreeSettings) -> Self {
        Self::with_bins(
            num_classes,
            settings.bins,
            settings.observations_before_binning,
        )
    }
}

impl SplitObserver for BinnedNumericSplit {
    type Value = f64;

    fn observe(&mut self, value: f64, label: usize) {
        if self.binned {
            let bin = self.bin_of(value);
            self.counts[[bin, label]] += 1;
            return;
        }

        self.buffer.push((value, label));
        if self.buffer.len() >= self.observations_before_binning {
            self.fix_bins();
        }
    }

    fn best_split<F: FitnessFunction>(&self, criterion: &F) -> Option<SplitCandidate> {
        if !self.binned {
            return None;
        }

        let mut table = Array2::<usize>::zeros((2, self.num_classes));
        table.row_mut(1).assign(&self.counts.sum_axis(Axis(0)));

        let mut best: Option<(f64, f64)> = None;
        for (bin, &threshold) in self.split_points.iter().enumerate() {
            for class in 0..self.num_classes {
                let count = self.counts[[bin, class]];
                table[[0, class]] += count;
                table[[1, class]] -= count;
            }
            let left: usize = table.row(0).sum();
            let right: usize = table.row(1).sum();
            if left == 0 || right == 0 {
                continue;
            }

            let quality = criterion.evaluate(table.view());
            if best.map_or(true, |(q, _)| quality > q) {
                best = Some((quality, threshold));
            }
        }

        best.map(|(quality, threshold)| SplitCandidate {
            quality,
            rule: SplitRule::Threshold(threshold),
        })
    }

    fn summary_size(&self) -> usize {
        self.buffer.len() * 2 + self.split_points.len() + self.counts.len()
    }
}

/// Serializes the sorted value map as a sequence of pairs, since most
/// formats only accept string keys.
mod value_map {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use super::ObservedValue;

    pub fn serialize<S>(map: &BTreeMap<ObservedValue, Vec<usize>>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_seq(map.iter())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<BTreeMap<ObservedValue, Vec<usize>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pairs: Vec<(ObservedValue, Vec<usize>)> = Vec::deserialize(d)?;
        Ok(pairs.into_iter().collect())
    }
}
