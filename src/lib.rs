//   Copyright 2024 The PyMC Developers
//
//   Licensed under the Apache License, Version 2.0 (the "License");
//   you may not use this file except in compliance with the License.
//   You may obtain a copy of the License at
//
//       http://www.apache.org/licenses/LICENSE-2.0
//
//   Unless required by applicable law or agreed to in writing, software
//   distributed under the License is distributed on an "AS IS" BASIS,
//   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//   See the License for the specific language governing permissions and
//   limitations under the License.
#![warn(missing_docs)]

//! hoeffding_tree provides a streaming decision tree classifier, the
//! Hoeffding tree (also known as the Very Fast Decision Tree). The tree is
//! grown incrementally from a stream of labeled observations: every leaf
//! keeps sufficient statistics of the observations that reach it and is
//! split once the Hoeffding bound guarantees, with a chosen confidence,
//! that the best split found so far is the one an infinite stream would
//! select [Domingos & Hulten, 2000].
//!
//! Split quality is measured with Gini impurity or information gain, and
//! numeric dimensions are summarized either exactly (binary thresholds over
//! every distinct value) or with equal-width bins. Categorical dimensions
//! split into one branch per observed category.
//!
//! ```
//! use hoeffding_tree::{FeatureSchema, HoeffdingTreeModel, HoeffdingTreeSettings};
//! use hoeffding_tree::testing::two_gaussians;
//!
//! let (data, labels) = two_gaussians(500, 3.0, 1, 7);
//! let settings = HoeffdingTreeSettings::new(0.99, 5000, 50);
//! let model = HoeffdingTreeModel::build_model(
//!     data.view(),
//!     FeatureSchema::numeric(2),
//!     &labels,
//!     2,
//!     settings,
//! )
//! .unwrap();
//! let predictions = model.classify(data.view()).unwrap();
//! assert_eq!(predictions.len(), 500);
//! ```

pub mod classifier;
pub mod config;
pub mod criterion;
pub mod data;
pub mod error;
pub mod hoeffding;
pub mod logger;
pub mod math;
pub mod model;
pub mod node;
pub mod numeric;
pub mod split_rules;
pub mod testing;
pub mod trainer;
pub mod tree;

#[cfg(feature = "python")]
mod python;

pub use config::{CriterionKind, HoeffdingTreeSettings, NumericSplitKind};
pub use criterion::{FitnessFunction, GiniImpurity, InformationGain};
pub use data::{Dimension, FeatureSchema};
pub use error::{ConfigError, DataError, HoeffdingError, Result};
pub use logger::{LogSink, Verbosity};
pub use model::{HoeffdingTreeModel, ModelKind};
pub use numeric::{BinaryNumericSplit, BinnedNumericSplit, NumericSplit};
pub use trainer::HoeffdingTree;
pub use tree::{DecisionTree, TreeError};
