//! Error types raised by the Hoeffding tree engine.
//!
//! Configuration problems are detected before any observation is consumed.
//! Data problems carry the index of the offending observation. Tree errors
//! are structural misuse of the node arena.

use thiserror::Error;

use crate::tree::TreeError;

/// Invalid hyperparameters or a schema that does not fit the data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The numeric split strategy name is not known.
    #[error("unrecognized numeric split strategy: {0} (expected 'binary' or 'domingos')")]
    UnknownSplitStrategy(String),

    /// Confidence outside the open interval (0, 1).
    #[error("confidence must lie strictly between 0 and 1, got {0}")]
    InvalidConfidence(f64),

    /// The binned strategy needs at least two bins.
    #[error("bins must be at least 2, got {0}")]
    TooFewBins(usize),

    /// Leaves would never be evaluated.
    #[error("check interval must be positive")]
    ZeroCheckInterval,

    /// Training requires at least one pass.
    #[error("number of passes must be positive")]
    ZeroPasses,

    /// A classifier needs at least one class.
    #[error("number of classes must be positive")]
    NoClasses,

    /// A categorical dimension without categories.
    #[error("categorical dimension {dimension} declares zero categories")]
    EmptyCategorical {
        /// Offending dimension.
        dimension: usize,
    },

    /// Observation width differs from the schema.
    #[error("schema describes {expected} dimensions but observations have {got}")]
    DimensionMismatch {
        /// Width declared by the schema.
        expected: usize,
        /// Width of the data.
        got: usize,
    },
}

/// An observation that cannot be ingested without corrupting count tables.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// Labels and observations are not parallel.
    #[error("{observations} observations but {labels} labels")]
    LabelCountMismatch {
        /// Rows in the data.
        observations: usize,
        /// Labels supplied.
        labels: usize,
    },

    /// Label outside `[0, num_classes)`.
    #[error("label {label} of observation {index} is not below the number of classes ({num_classes})")]
    LabelOutOfRange {
        /// Observation index.
        index: usize,
        /// The label given.
        label: usize,
        /// Number of classes of the model.
        num_classes: usize,
    },

    /// Categorical value that is not a valid code.
    #[error(
        "value {value} of observation {index} in categorical dimension {dimension} \
         is not a category code below {cardinality}"
    )]
    InvalidCategory {
        /// Observation index.
        index: usize,
        /// Categorical dimension.
        dimension: usize,
        /// The value given.
        value: f64,
        /// Declared number of categories.
        cardinality: usize,
    },

    /// NaN or infinite numeric training value.
    #[error("value {value} of observation {index} in numeric dimension {dimension} is not finite")]
    NonFinite {
        /// Observation index.
        index: usize,
        /// Numeric dimension.
        dimension: usize,
        /// The NaN or infinite value.
        value: f64,
    },
}

/// Top-level error of the crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HoeffdingError {
    /// See [`ConfigError`].
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// See [`DataError`].
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// See [`TreeError`].
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HoeffdingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_fields() {
        let err: HoeffdingError = ConfigError::DimensionMismatch {
            expected: 3,
            got: 5,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "configuration error: schema describes 3 dimensions but observations have 5"
        );

        let err = DataError::InvalidCategory {
            index: 4,
            dimension: 1,
            value: 2.5,
            cardinality: 3,
        };
        assert_eq!(
            err.to_string(),
            "value 2.5 of observation 4 in categorical dimension 1 is not a category code below 3"
        );

        let err: HoeffdingError = TreeError::BranchCountMismatch {
            expected: 2,
            got: 1,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "tree error: Split rule has 2 branches but 1 leaves were given"
        );
    }
}
