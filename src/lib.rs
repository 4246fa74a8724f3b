//! rq_spline: monotonic rational-quadratic spline transforms with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the spline transforms to Python via the `_rq_spline` extension module. When
//! the `python-bindings` feature is enabled, this module defines the
//! Python-facing functions of that module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`spline` and `numerical_stability`) as
//!   the public crate surface.
//! - Define `#[pyfunction]` wrappers for the bounded and piecewise transforms
//!   and the `#[pymodule]` initializer for the `_rq_spline` extension.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, argument conversion, and error mapping.
//! - Python keyword defaults match the Rust defaults in
//!   [`spline::core::options`].
//!
//! Conventions
//! -----------
//! - Python callers pass and receive `float64` numpy arrays of any rank.
//!   Rust callers choose `f32` or `f64` per call.
//! - Errors from core Rust code are propagated as [`spline::SplineError`]
//!   internally and converted to `PyErr` values at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on [`spline`] (or `spline::prelude`) and
//!   can ignore the PyO3 items guarded by the `python-bindings` feature.
//! - Normalizing-flow layers written in Python import `_rq_spline` and call
//!   `piecewise_rational_quadratic_transform` per coupling layer.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules and
//!   by the integration suite under `tests/`.

pub mod numerical_stability;
pub mod spline;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::PyArrayDyn;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    spline::{
        DEFAULT_MIN_BIN_HEIGHT, DEFAULT_MIN_BIN_WIDTH, DEFAULT_MIN_DERIVATIVE, DEFAULT_TAIL_BOUND,
        Direction, SplineBounds, SplineConfig, SplineOptions, Tails, transforms,
    },
    utils::{extract_f64_array_dyn, output_to_numpy},
};

#[cfg(feature = "python-bindings")]
type PySplineOutput<'py> = (Bound<'py, PyArrayDyn<f64>>, Bound<'py, PyArrayDyn<f64>>);

/// piecewise_rational_quadratic_transform: Python entry point.
///
/// Purpose
/// -------
/// Evaluate the spline on numpy arrays with the tail policy selected by name.
///
/// Parameters
/// ----------
/// - `inputs`: array-like of shape `B`.
/// - `unnormalized_widths`, `unnormalized_heights`: array-like of shape `B × K`.
/// - `unnormalized_derivatives`: array-like of shape `B × (K - 1)`, or
///   `B × (K + 1)` when `tails is None`.
/// - `inverse`: evaluate the inverse map when `True`.
/// - `tails`: `None` (bounded on `[0, 1]`) or `"linear"`.
/// - `tail_bound`, `min_bin_width`, `min_bin_height`, `min_derivative`:
///   configuration scalars; see [`SplineOptions`] and [`Tails`].
///
/// Returns
/// -------
/// `(outputs, logabsdet)`, two `float64` arrays of shape `B`.
///
/// Errors
/// ------
/// - `ValueError` for configuration and domain errors.
/// - `NotImplementedError` for an unknown tail mode.
/// - `RuntimeError` if a numerical invariant breaks.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "piecewise_rational_quadratic_transform",
    signature = (
        inputs,
        unnormalized_widths,
        unnormalized_heights,
        unnormalized_derivatives,
        inverse = false,
        tails = None,
        tail_bound = DEFAULT_TAIL_BOUND,
        min_bin_width = DEFAULT_MIN_BIN_WIDTH,
        min_bin_height = DEFAULT_MIN_BIN_HEIGHT,
        min_derivative = DEFAULT_MIN_DERIVATIVE,
    ),
    text_signature = "(inputs, unnormalized_widths, unnormalized_heights, \
                      unnormalized_derivatives, /, inverse=False, tails=None, \
                      tail_bound=1.0, min_bin_width=1e-3, min_bin_height=1e-3, \
                      min_derivative=1e-3)"
)]
#[allow(clippy::too_many_arguments)]
pub fn py_piecewise_rational_quadratic_transform<'py>(
    py: Python<'py>, inputs: &Bound<'py, PyAny>, unnormalized_widths: &Bound<'py, PyAny>,
    unnormalized_heights: &Bound<'py, PyAny>, unnormalized_derivatives: &Bound<'py, PyAny>,
    inverse: bool, tails: Option<&str>, tail_bound: f64, min_bin_width: f64,
    min_bin_height: f64, min_derivative: f64,
) -> PyResult<PySplineOutput<'py>> {
    let options = SplineOptions::new(min_bin_width, min_bin_height, min_derivative)?;
    let config = SplineConfig::new(options, Tails::from_mode(tails, tail_bound)?);

    let inputs = extract_f64_array_dyn(py, inputs)?;
    let widths = extract_f64_array_dyn(py, unnormalized_widths)?;
    let heights = extract_f64_array_dyn(py, unnormalized_heights)?;
    let derivatives = extract_f64_array_dyn(py, unnormalized_derivatives)?;

    let output = transforms::piecewise_rational_quadratic_transform(
        inputs.as_array(),
        widths.as_array(),
        heights.as_array(),
        derivatives.as_array(),
        Direction::from_inverse(inverse),
        &config,
    )?;
    Ok(output_to_numpy(py, output))
}

/// rational_quadratic_spline: Python entry point for explicit bounds.
///
/// Same as `piecewise_rational_quadratic_transform` without tails, but on the
/// rectangle `[left, right] × [bottom, top]`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "rational_quadratic_spline",
    signature = (
        inputs,
        unnormalized_widths,
        unnormalized_heights,
        unnormalized_derivatives,
        inverse = false,
        left = 0.0,
        right = 1.0,
        bottom = 0.0,
        top = 1.0,
        min_bin_width = DEFAULT_MIN_BIN_WIDTH,
        min_bin_height = DEFAULT_MIN_BIN_HEIGHT,
        min_derivative = DEFAULT_MIN_DERIVATIVE,
    ),
    text_signature = "(inputs, unnormalized_widths, unnormalized_heights, \
                      unnormalized_derivatives, /, inverse=False, left=0.0, right=1.0, \
                      bottom=0.0, top=1.0, min_bin_width=1e-3, min_bin_height=1e-3, \
                      min_derivative=1e-3)"
)]
#[allow(clippy::too_many_arguments)]
pub fn py_rational_quadratic_spline<'py>(
    py: Python<'py>, inputs: &Bound<'py, PyAny>, unnormalized_widths: &Bound<'py, PyAny>,
    unnormalized_heights: &Bound<'py, PyAny>, unnormalized_derivatives: &Bound<'py, PyAny>,
    inverse: bool, left: f64, right: f64, bottom: f64, top: f64, min_bin_width: f64,
    min_bin_height: f64, min_derivative: f64,
) -> PyResult<PySplineOutput<'py>> {
    let options = SplineOptions::new(min_bin_width, min_bin_height, min_derivative)?;
    let bounds = SplineBounds::new(left, right, bottom, top)?;

    let inputs = extract_f64_array_dyn(py, inputs)?;
    let widths = extract_f64_array_dyn(py, unnormalized_widths)?;
    let heights = extract_f64_array_dyn(py, unnormalized_heights)?;
    let derivatives = extract_f64_array_dyn(py, unnormalized_derivatives)?;

    let output = transforms::rational_quadratic_spline(
        inputs.as_array(),
        widths.as_array(),
        heights.as_array(),
        derivatives.as_array(),
        Direction::from_inverse(inverse),
        &bounds,
        &options,
    )?;
    Ok(output_to_numpy(py, output))
}

/// _rq_spline: PyO3 module initializer for the Python extension.
///
/// Registers the two spline functions and the default configuration
/// constants. Invoked by Python on import; never called by user code.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rq_spline<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_piecewise_rational_quadratic_transform, m)?)?;
    m.add_function(wrap_pyfunction!(py_rational_quadratic_spline, m)?)?;
    m.add("DEFAULT_MIN_BIN_WIDTH", DEFAULT_MIN_BIN_WIDTH)?;
    m.add("DEFAULT_MIN_BIN_HEIGHT", DEFAULT_MIN_BIN_HEIGHT)?;
    m.add("DEFAULT_MIN_DERIVATIVE", DEFAULT_MIN_DERIVATIVE)?;
    m.add("DEFAULT_TAIL_BOUND", DEFAULT_TAIL_BOUND)?;
    Ok(())
}
