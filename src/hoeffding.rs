//! The Hoeffding bound and the split decision built on it.
//!
//! After `n` independent observations of a variable with range `R`, the true
//! mean is within `ε = sqrt(R² ln(1/δ) / (2n))` of the observed mean with
//! probability `1 - δ`. A leaf splits once the best candidate beats the
//! runner-up by more than `ε`.

use crate::config::HoeffdingTreeSettings;

/// Hoeffding bound `sqrt(R² ln(1/δ) / (2n))`; infinite when `n == 0`.
pub fn hoeffding_bound(range: f64, delta: f64, n: usize) -> f64 {
    if n == 0 {
        return f64::INFINITY;
    }
    (range * range * (1.0 / delta).ln() / (2.0 * n as f64)).sqrt()
}

/// Outcome of evaluating a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitDecision {
    /// Commit the best candidate. `forced` is set when the leaf reached
    /// `max_samples` without the bound being met.
    Split { forced: bool },
    /// Keep accumulating.
    Defer,
}

/// Split test parameters taken from the settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoeffdingTest {
    delta: f64,
    min_samples: usize,
    max_samples: usize,
}

impl HoeffdingTest {
    /// Creates a test from explicit parameters.
    pub fn new(delta: f64, min_samples: usize, max_samples: usize) -> Self {
        Self {
            delta,
            min_samples,
            max_samples,
        }
    }

    /// Creates a test from validated settings.
    pub fn from_settings(settings: &HoeffdingTreeSettings) -> Self {
        Self::new(settings.delta(), settings.min_samples, settings.max_samples)
    }

    /// The `ε` of a leaf holding `n` observations.
    #[inline]
    pub fn epsilon(&self, range: f64, n: usize) -> f64 {
        hoeffding_bound(range, self.delta, n)
    }

    /// Decides whether a leaf holding `n` observations splits, given the
    /// best candidate quality and the best quality among the other features.
    pub fn decide(&self, best: f64, second_best: f64, n: usize, range: f64) -> SplitDecision {
        if n < self.min_samples {
            return SplitDecision::Defer;
        }
        if best - second_best > self.epsilon(range, n) {
            return SplitDecision::Split { forced: false };
        }
        if n >= self.max_samples {
            return SplitDecision::Split { forced: true };
        }
        SplitDecision::Defer
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn bound_matches_closed_form() {
        // R = 1, δ = 0.05, n = 100
        let expected = ((1.0f64 / 0.05).ln() / 200.0).sqrt();
        assert_abs_diff_eq!(hoeffding_bound(1.0, 0.05, 100), expected, epsilon = 1e-12);
        assert!(hoeffding_bound(1.0, 0.05, 0).is_infinite());
    }

    #[test]
    fn bound_shrinks_with_more_samples() {
        let small = hoeffding_bound(0.5, 0.01, 50);
        let large = hoeffding_bound(0.5, 0.01, 5000);
        assert!(large < small);
    }
}
