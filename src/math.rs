//! Small numeric helpers shared by the split observers and the classifier.

use ndarray::Array1;

/// Category code of `value` if it is an integer in `[0, cardinality)`.
#[inline]
pub fn category_code(value: f64, cardinality: usize) -> Option<usize> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < cardinality as f64 {
        Some(value as usize)
    } else {
        None
    }
}

/// Index of the first maximum of `counts`; 0 for an empty or all-zero slice.
pub fn argmax(counts: &[usize]) -> usize {
    let mut best = 0;
    for (i, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = i;
        }
    }
    best
}

/// Normalizes `counts` into a probability vector.
///
/// An all-zero slice yields all zeros instead of NaN.
pub fn normalize(counts: &[usize]) -> Array1<f64> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return Array1::zeros(counts.len());
    }
    let total = total as f64;
    counts.iter().map(|&c| c as f64 / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_codes() {
        assert_eq!(category_code(0.0, 3), Some(0));
        assert_eq!(category_code(2.0, 3), Some(2));
        assert_eq!(category_code(3.0, 3), None);
        assert_eq!(category_code(-1.0, 3), None);
        assert_eq!(category_code(1.5, 3), None);
        assert_eq!(category_code(f64::NAN, 3), None);
    }

    #[test]
    fn argmax_prefers_first_maximum() {
        assert_eq!(argmax(&[1, 4, 4, 2]), 1);
        assert_eq!(argmax(&[0, 0, 0]), 0);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn normalize_handles_empty_counts() {
        assert_eq!(normalize(&[0, 0]).to_vec(), vec![0.0, 0.0]);
        assert_eq!(normalize(&[1, 3]).to_vec(), vec![0.25, 0.75]);
    }
}
