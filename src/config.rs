//! Hyperparameters of a Hoeffding tree, consolidated in one value that is
//! threaded through model construction.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::logger::Verbosity;

/// Strategy used to summarize numeric dimensions at each leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericSplitKind {
    /// Exact binary threshold over every distinct value seen by the leaf.
    #[default]
    Binary,
    /// Equal-width bins fixed after an initial quota of observations.
    Domingos,
}

impl FromStr for NumericSplitKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binary" => Ok(NumericSplitKind::Binary),
            "domingos" => Ok(NumericSplitKind::Domingos),
            _ => Err(ConfigError::UnknownSplitStrategy(s.to_string())),
        }
    }
}

/// Fitness function used to rank candidate splits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriterionKind {
    /// Reduction of Gini impurity.
    #[default]
    Gini,
    /// Reduction of entropy, in bits.
    InfoGain,
}

/// `HoeffdingTreeSettings` are the parameters used to build and train a
/// [`HoeffdingTreeModel`](crate::model::HoeffdingTreeModel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoeffdingTreeSettings {
    /// Confidence required before a split; `delta = 1 - confidence`.
    pub confidence: f64,
    /// Leaf size at which a split is committed without statistical confidence.
    pub max_samples: usize,
    /// Leaf size below which a leaf is never split.
    pub min_samples: usize,
    /// Number of observations between two evaluations of a leaf.
    pub check_interval: usize,
    /// Numeric split strategy.
    pub numeric_split_strategy: NumericSplitKind,
    /// Number of bins of the Domingos strategy.
    pub bins: usize,
    /// Observations buffered before the Domingos strategy fixes its bins.
    pub observations_before_binning: usize,
    /// Use information gain instead of Gini impurity.
    pub info_gain: bool,
    /// Materialize the whole data set before deciding splits.
    pub batch_mode: bool,
    /// Passes over the training data; always one in batch mode.
    pub passes: usize,
    /// Logging level.
    pub verbosity: Verbosity,
}

impl Default for HoeffdingTreeSettings {
    fn default() -> Self {
        Self {
            confidence: 0.95,
            max_samples: 5000,
            min_samples: 100,
            check_interval: 100,
            numeric_split_strategy: NumericSplitKind::Binary,
            bins: 10,
            observations_before_binning: 100,
            info_gain: false,
            batch_mode: false,
            passes: 1,
            verbosity: Verbosity::default(),
        }
    }
}

impl HoeffdingTreeSettings {
    /// Creates a new `HoeffdingTreeSettings` with the Hoeffding bound
    /// parameters set and every other option at its default.
    pub fn new(confidence: f64, max_samples: usize, min_samples: usize) -> Self {
        Self {
            confidence,
            max_samples,
            min_samples,
            ..Self::default()
        }
    }

    /// Checks every option; called before a model is constructed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(ConfigError::InvalidConfidence(self.confidence));
        }
        if self.bins < 2 {
            return Err(ConfigError::TooFewBins(self.bins));
        }
        if self.check_interval == 0 {
            return Err(ConfigError::ZeroCheckInterval);
        }
        if self.passes == 0 {
            return Err(ConfigError::ZeroPasses);
        }
        Ok(())
    }

    /// Probability of committing a wrong split.
    #[inline]
    pub fn delta(&self) -> f64 {
        1.0 - self.confidence
    }

    /// Criterion selected by the `info_gain` flag.
    pub fn criterion(&self) -> CriterionKind {
        if self.info_gain {
            CriterionKind::InfoGain
        } else {
            CriterionKind::Gini
        }
    }

    /// Observations between two evaluations of a leaf.
    ///
    /// Never more than `min_samples`, so a leaf is looked at at least once
    /// per `min_samples` observations.
    pub fn effective_check_interval(&self) -> usize {
        self.check_interval.min(self.min_samples).max(1)
    }

    /// Passes actually performed by a full fit.
    pub fn effective_passes(&self) -> usize {
        if self.batch_mode {
            1
        } else {
            self.passes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = HoeffdingTreeSettings::default();
        assert_eq!(settings.confidence, 0.95);
        assert_eq!(settings.max_samples, 5000);
        assert_eq!(settings.min_samples, 100);
        assert_eq!(settings.bins, 10);
        assert_eq!(settings.observations_before_binning, 100);
        assert_eq!(settings.numeric_split_strategy, NumericSplitKind::Binary);
        assert_eq!(settings.passes, 1);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn split_strategy_names() {
        assert_eq!("binary".parse::<NumericSplitKind>(), Ok(NumericSplitKind::Binary));
        assert_eq!(
            "Domingos".parse::<NumericSplitKind>(),
            Ok(NumericSplitKind::Domingos)
        );
        assert_eq!(
            "gaussian".parse::<NumericSplitKind>(),
            Err(ConfigError::UnknownSplitStrategy("gaussian".to_string()))
        );
    }

    #[test]
    fn invalid_options_are_rejected() {
        for confidence in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let settings = HoeffdingTreeSettings::new(confidence, 5000, 100);
            assert!(matches!(
                settings.validate(),
                Err(ConfigError::InvalidConfidence(_))
            ));
        }

        let settings = HoeffdingTreeSettings {
            bins: 1,
            ..HoeffdingTreeSettings::default()
        };
        assert_eq!(settings.validate(), Err(ConfigError::TooFewBins(1)));

        let settings = HoeffdingTreeSettings {
            passes: 0,
            ..HoeffdingTreeSettings::default()
        };
        assert_eq!(settings.validate(), Err(ConfigError::ZeroPasses));
    }

    #[test]
    fn check_interval_never_exceeds_min_samples() {
        let settings = HoeffdingTreeSettings::new(0.99, 5000, 50);
        assert_eq!(settings.effective_check_interval(), 50);

        let settings = HoeffdingTreeSettings::new(0.99, 5000, 0);
        assert_eq!(settings.effective_check_interval(), 1);
    }

    #[test]
    fn batch_mode_forces_a_single_pass() {
        let settings = HoeffdingTreeSettings {
            batch_mode: true,
            passes: 4,
            ..HoeffdingTreeSettings::default()
        };
        assert_eq!(settings.effective_passes(), 1);
    }
}
