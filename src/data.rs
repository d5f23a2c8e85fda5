//! Description of the input dimensions and validation of the matrices and
//! labels handed to the engine.
//!
//! Matrices are `n_observations × n_dimensions`; row `i` is one observation.
//! Categorical values are non-negative integer codes stored as `f64`.

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, DataError, Result};
use crate::math::category_code;

/// Type of a single input dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    /// Real-valued dimension.
    Numeric,
    /// Finite set of codes `0..cardinality`.
    Categorical {
        /// Number of distinct codes.
        cardinality: usize,
    },
}

impl Dimension {
    /// Returns true for categorical dimensions.
    #[inline]
    pub fn is_categorical(&self) -> bool {
        matches!(self, Dimension::Categorical { .. })
    }
}

/// Per-dimension metadata of the observations, fixed for a model's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    dimensions: Vec<Dimension>,
}

impl FeatureSchema {
    /// Creates a schema; categorical dimensions must declare at least one
    /// category.
    pub fn new(dimensions: Vec<Dimension>) -> std::result::Result<Self, ConfigError> {
        if let Some(dimension) = dimensions
            .iter()
            .position(|d| matches!(d, Dimension::Categorical { cardinality: 0 }))
        {
            return Err(ConfigError::EmptyCategorical { dimension });
        }
        Ok(Self { dimensions })
    }

    /// Schema of `n` numeric dimensions.
    pub fn numeric(n: usize) -> Self {
        Self {
            dimensions: vec![Dimension::Numeric; n],
        }
    }

    /// Number of dimensions.
    #[inline]
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    /// Returns true if the schema has no dimensions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Type of dimension `i`.
    #[inline]
    pub fn dimension(&self, i: usize) -> Option<Dimension> {
        self.dimensions.get(i).copied()
    }

    /// All dimensions in order.
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Checks that observations have exactly one value per dimension.
    pub fn check_width(&self, width: usize) -> std::result::Result<(), ConfigError> {
        if width != self.len() {
            return Err(ConfigError::DimensionMismatch {
                expected: self.len(),
                got: width,
            });
        }
        Ok(())
    }

    /// Checks one training observation. `index` is only used for reporting.
    pub fn validate_observation(
        &self,
        index: usize,
        sample: ArrayView1<f64>,
        label: usize,
        num_classes: usize,
    ) -> Result<()> {
        self.check_width(sample.len())?;
        if label >= num_classes {
            return Err(DataError::LabelOutOfRange {
                index,
                label,
                num_classes,
            }
            .into());
        }

        for (dimension, (&value, kind)) in sample.iter().zip(&self.dimensions).enumerate() {
            match *kind {
                Dimension::Numeric if !value.is_finite() => {
                    return Err(DataError::NonFinite {
                        index,
                        dimension,
                        value,
                    }
                    .into());
                }
                Dimension::Categorical { cardinality } => {
                    if category_code(value, cardinality).is_none() {
                        return Err(DataError::InvalidCategory {
                            index,
                            dimension,
                            value,
                            cardinality,
                        }
                        .into());
                    }
                }
                Dimension::Numeric => {}
            }
        }

        Ok(())
    }

    /// Checks a whole training batch before anything is mutated.
    pub fn validate_training(
        &self,
        data: ArrayView2<f64>,
        labels: &[usize],
        num_classes: usize,
    ) -> Result<()> {
        self.check_width(data.ncols())?;
        if data.nrows() != labels.len() {
            return Err(DataError::LabelCountMismatch {
                observations: data.nrows(),
                labels: labels.len(),
            }
            .into());
        }

        for (index, (sample, &label)) in data.rows().into_iter().zip(labels).enumerate() {
            self.validate_observation(index, sample, label, num_classes)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::error::HoeffdingError;

    fn mixed_schema() -> FeatureSchema {
        FeatureSchema::new(vec![
            Dimension::Numeric,
            Dimension::Categorical { cardinality: 3 },
        ])
        .unwrap()
    }

    #[test]
    fn empty_categorical_is_rejected() {
        let err = FeatureSchema::new(vec![
            Dimension::Numeric,
            Dimension::Categorical { cardinality: 0 },
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::EmptyCategorical { dimension: 1 });
    }

    #[test]
    fn valid_batch_passes() {
        let data = array![[0.5, 0.0], [-1.0, 2.0], [3.0, 1.0]];
        assert!(mixed_schema()
            .validate_training(data.view(), &[0, 1, 1], 2)
            .is_ok());
    }

    #[test]
    fn reports_offending_observation() {
        let schema = mixed_schema();

        let data = array![[0.5, 0.0], [1.0, 3.0]];
        let err = schema.validate_training(data.view(), &[0, 1], 2).unwrap_err();
        assert_eq!(
            err,
            HoeffdingError::Data(DataError::InvalidCategory {
                index: 1,
                dimension: 1,
                value: 3.0,
                cardinality: 3,
            })
        );

        let data = array![[0.5, 1.5]];
        assert!(schema.validate_training(data.view(), &[0], 2).is_err());

        let data = array![[f64::NAN, 1.0]];
        assert!(matches!(
            schema.validate_training(data.view(), &[0], 2),
            Err(HoeffdingError::Data(DataError::NonFinite { .. }))
        ));

        let data = array![[0.5, 1.0]];
        assert!(matches!(
            schema.validate_training(data.view(), &[2], 2),
            Err(HoeffdingError::Data(DataError::LabelOutOfRange { label: 2, .. }))
        ));
    }

    #[test]
    fn width_and_label_count_mismatch() {
        let schema = mixed_schema();
        let data = array![[0.5, 0.0, 1.0]];
        assert_eq!(
            schema.validate_training(data.view(), &[0], 2),
            Err(HoeffdingError::Config(ConfigError::DimensionMismatch {
                expected: 2,
                got: 3
            }))
        );

        let data = array![[0.5, 0.0]];
        assert!(matches!(
            schema.validate_training(data.view(), &[0, 1], 2),
            Err(HoeffdingError::Data(DataError::LabelCountMismatch { .. }))
        ));
    }
}
