//! Python bindings, enabled with the `python` feature.
#![allow(non_snake_case)]

use numpy::{PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::{HoeffdingTreeSettings, NumericSplitKind};
use crate::data::{Dimension, FeatureSchema};
use crate::error::HoeffdingError;
use crate::logger::Verbosity;
use crate::model::HoeffdingTreeModel;

impl From<HoeffdingError> for PyErr {
    fn from(err: HoeffdingError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// `ModelWrapper` wraps around `HoeffdingTreeModel` to hold a trained tree.
///
/// This class is `unsendable`, i.e., it cannot be sent across threads safely.
#[pyclass(unsendable)]
struct ModelWrapper {
    model: HoeffdingTreeModel,
}

/// Schema from a list where 0 is numeric and `k > 0` categorical with `k`
/// categories.
fn schema_from_list(schema: Vec<usize>) -> Result<FeatureSchema, HoeffdingError> {
    let dimensions = schema
        .into_iter()
        .map(|k| match k {
            0 => Dimension::Numeric,
            cardinality => Dimension::Categorical { cardinality },
        })
        .collect();
    Ok(FeatureSchema::new(dimensions)?)
}

fn labels_from_array(y: &PyReadonlyArray1<i64>) -> PyResult<Vec<usize>> {
    y.as_array()
        .iter()
        .map(|&label| {
            usize::try_from(label)
                .map_err(|_| PyValueError::new_err(format!("negative label: {label}")))
        })
        .collect()
}

#[pyfunction]
#[pyo3(signature = (
    X, y, schema, num_classes, confidence = 0.95, max_samples = 5000, min_samples = 100,
    check_interval = 100, numeric_split_strategy = "binary", bins = 10,
    observations_before_binning = 100, info_gain = false, batch_mode = false, passes = 1,
    verbose = false
))]
#[allow(clippy::too_many_arguments)]
fn build_model(
    X: PyReadonlyArray2<f64>,
    y: PyReadonlyArray1<i64>,
    schema: Vec<usize>,
    num_classes: usize,
    confidence: f64,
    max_samples: usize,
    min_samples: usize,
    check_interval: usize,
    numeric_split_strategy: &str,
    bins: usize,
    observations_before_binning: usize,
    info_gain: bool,
    batch_mode: bool,
    passes: usize,
    verbose: bool,
) -> PyResult<ModelWrapper> {
    let settings = HoeffdingTreeSettings {
        confidence,
        max_samples,
        min_samples,
        check_interval,
        numeric_split_strategy: numeric_split_strategy
            .parse::<NumericSplitKind>()
            .map_err(HoeffdingError::from)?,
        bins,
        observations_before_binning,
        info_gain,
        batch_mode,
        passes,
        verbosity: if verbose {
            Verbosity::Info
        } else {
            Verbosity::Warning
        },
    };
    let labels = labels_from_array(&y)?;
    let schema = schema_from_list(schema)?;
    let model = HoeffdingTreeModel::fit(X.as_array(), schema, &labels, num_classes, settings)?;

    Ok(ModelWrapper { model })
}

#[pyfunction]
#[pyo3(signature = (wrapper, X, y, batch_mode = false))]
fn train(
    wrapper: &mut ModelWrapper,
    X: PyReadonlyArray2<f64>,
    y: PyReadonlyArray1<i64>,
    batch_mode: bool,
) -> PyResult<()> {
    let labels = labels_from_array(&y)?;
    wrapper.model.train(X.as_array(), &labels, batch_mode)?;
    Ok(())
}

#[pyfunction]
fn classify<'py>(
    py: Python<'py>,
    wrapper: &ModelWrapper,
    X: PyReadonlyArray2<f64>,
) -> PyResult<(Bound<'py, PyArray1<usize>>, Bound<'py, PyArray2<f64>>)> {
    let (predictions, probabilities) = wrapper.model.classify_with_probabilities(X.as_array())?;

    let py_predictions = PyArray1::from_vec_bound(py, predictions);
    let py_probabilities = PyArray2::from_owned_array_bound(py, probabilities);

    Ok((py_predictions, py_probabilities))
}

#[pyfunction]
fn num_nodes(wrapper: &ModelWrapper) -> usize {
    wrapper.model.num_nodes()
}

#[pymodule]
fn hoeffding_tree(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ModelWrapper>()?;
    m.add_function(wrap_pyfunction!(build_model, m)?)?;
    m.add_function(wrap_pyfunction!(train, m)?)?;
    m.add_function(wrap_pyfunction!(classify, m)?)?;
    m.add_function(wrap_pyfunction!(num_nodes, m)?)?;

    Ok(())
}
