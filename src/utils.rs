//! Python conversion helpers for the `_rq_spline` extension module.
//!
//! Everything here is compiled only with the `python-bindings` feature.
#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec / ArrayD → PyArray
    PyArrayDyn,
    PyReadonlyArrayDyn,
};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::spline::transforms::SplineOutput;

/// Borrow a float64 array of any rank from a Python object.
///
/// Accepts, in order: a `numpy.ndarray` of `float64`, anything with a
/// `to_numpy()` method returning one (e.g. `pandas` objects), and finally
/// anything `numpy.asarray(obj, dtype="float64")` accepts (nested lists,
/// integer arrays, scalars).
#[cfg(feature = "python-bindings")]
pub fn extract_f64_array_dyn<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArrayDyn<'py, f64>> {
    if let Ok(arr_ro) = raw.extract::<PyReadonlyArrayDyn<f64>>() {
        return Ok(arr_ro);
    }

    if let Ok(obj) = raw.call_method("to_numpy", (false,), None) {
        if let Ok(arr_ro) = obj.extract::<PyReadonlyArrayDyn<f64>>() {
            return Ok(arr_ro);
        }
    }

    let converted = py.import("numpy")?.call_method1("asarray", (raw, "float64"))?;
    converted.extract::<PyReadonlyArrayDyn<f64>>().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a numpy.ndarray, pandas object, or nested sequence of float64",
        )
    })
}

/// Hand a spline result to Python as an `(outputs, logabsdet)` tuple of
/// numpy arrays shaped like the inputs.
#[cfg(feature = "python-bindings")]
pub fn output_to_numpy<'py>(
    py: Python<'py>, output: SplineOutput<f64>,
) -> (Bound<'py, PyArrayDyn<f64>>, Bound<'py, PyArrayDyn<f64>>) {
    let SplineOutput { outputs, logabsdet } = output;
    (outputs.into_pyarray(py), logabsdet.into_pyarray(py))
}
