//! Errors for rational-quadratic spline transforms (configuration, shape,
//! domain, tail-mode, and numerical invariant failures).
//!
//! This module defines the spline error type, [`SplineError`], the result alias
//! [`SplineResult`], and the coarse [`ErrorKind`] classification callers use to
//! tell "bad input" apart from "bad parameters". The error implements
//! `Display`/`Error` and converts to `PyErr` when the `python-bindings`
//! feature is enabled.
//!
//! ## Conventions
//! - **Indices are 0-based, flat, row-major** over the batch shape of the
//!   input tensor (match Rust/NumPy iteration order).
//! - Every failure aborts the whole call; the reported index is the first
//!   offending element in row-major order.
//! - Configuration problems are detected before any per-element work.
#[cfg(feature = "python-bindings")]
use pyo3::{
    PyErr,
    exceptions::{PyNotImplementedError, PyRuntimeError, PyValueError},
};

/// Crate-wide result alias for spline operations that may produce
/// [`SplineError`].
pub type SplineResult<T> = Result<T, SplineError>;

/// Coarse classification of [`SplineError`] variants.
///
/// - `Configuration`: the call's options, bounds, or tensor shapes are
///   unusable regardless of the input values.
/// - `Domain`: an input value lies outside the bounded interval.
/// - `UnsupportedTails`: a runtime tail-mode string is not recognized.
/// - `InvariantViolation`: the supplied parameters produced an internally
///   inconsistent spline (e.g. a negative discriminant).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Domain,
    UnsupportedTails,
    InvariantViolation,
}

/// Unified error type for spline evaluation.
///
/// Payload scalars are widened to `f64` so the error type is independent of
/// the element precision chosen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum SplineError {
    // ---- Configuration ----
    /// `min_bin_width` is non-finite, non-positive, or `min_bin_width * num_bins > 1`.
    InvalidMinBinWidth { min_bin_width: f64, num_bins: usize },

    /// `min_bin_height` is non-finite, non-positive, or `min_bin_height * num_bins > 1`.
    InvalidMinBinHeight { min_bin_height: f64, num_bins: usize },

    /// `min_derivative` must be finite and > 0 (and < 1 with linear tails).
    InvalidMinDerivative { value: f64, reason: &'static str },

    /// Tail bound must be finite and > 0.
    InvalidTailBound { value: f64 },

    /// Interval bounds must be finite with low < high.
    InvalidBounds { axis: &'static str, low: f64, high: f64 },

    /// Width/height tensors have an empty trailing bins dimension.
    EmptyBins,

    /// A parameter tensor's shape disagrees with the input batch shape.
    ShapeMismatch { tensor: &'static str, expected: Vec<usize>, actual: Vec<usize> },

    /// Trailing derivative dimension is neither `num_bins - 1` nor `num_bins + 1`,
    /// or the layout is not allowed for the tail mode.
    InvalidDerivativeLayout { num_bins: usize, actual: usize, reason: &'static str },

    // ---- Domain ----
    /// Input value lies outside the bounded interval (NaN included).
    InputOutOfDomain { index: usize, value: f64, low: f64, high: f64 },

    // ---- Tail mode ----
    /// Tail mode string other than `"linear"`.
    UnsupportedTails { mode: String },

    // ---- Numerical invariants ----
    /// The inverse quadratic had a negative discriminant.
    NegativeDiscriminant { index: usize, value: f64 },

    /// Bin lookup failed for an input that passed the domain check.
    BinNotFound { index: usize, value: f64 },
}

impl SplineError {
    /// Classify this error into its [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            SplineError::InvalidMinBinWidth { .. }
            | SplineError::InvalidMinBinHeight { .. }
            | SplineError::InvalidMinDerivative { .. }
            | SplineError::InvalidTailBound { .. }
            | SplineError::InvalidBounds { .. }
            | SplineError::EmptyBins
            | SplineError::ShapeMismatch { .. }
            | SplineError::InvalidDerivativeLayout { .. } => ErrorKind::Configuration,
            SplineError::InputOutOfDomain { .. } => ErrorKind::Domain,
            SplineError::UnsupportedTails { .. } => ErrorKind::UnsupportedTails,
            SplineError::NegativeDiscriminant { .. } | SplineError::BinNotFound { .. } => {
                ErrorKind::InvariantViolation
            }
        }
    }
}

impl std::error::Error for SplineError {}

impl std::fmt::Display for SplineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            SplineError::InvalidMinBinWidth { min_bin_width, num_bins } => {
                write!(
                    f,
                    "Minimal bin width too large for the number of bins: {min_bin_width} * {num_bins} must be <= 1 (and the width finite and > 0)"
                )
            }
            SplineError::InvalidMinBinHeight { min_bin_height, num_bins } => {
                write!(
                    f,
                    "Minimal bin height too large for the number of bins: {min_bin_height} * {num_bins} must be <= 1 (and the height finite and > 0)"
                )
            }
            SplineError::InvalidMinDerivative { value, reason } => {
                write!(f, "min_derivative must be finite and > 0; got: {value}. {reason}")
            }
            SplineError::InvalidTailBound { value } => {
                write!(f, "Tail bound must be finite and > 0; got: {value}")
            }
            SplineError::InvalidBounds { axis, low, high } => {
                write!(f, "Spline {axis} interval must be finite with low < high; got [{low}, {high}]")
            }
            SplineError::EmptyBins => {
                write!(f, "Spline needs at least one bin; the trailing dimension is empty.")
            }
            SplineError::ShapeMismatch { tensor, expected, actual } => {
                write!(f, "Shape mismatch for {tensor}: expected {expected:?}, got {actual:?}")
            }
            SplineError::InvalidDerivativeLayout { num_bins, actual, reason } => {
                write!(
                    f,
                    "Derivative tensor has {actual} trailing entries for {num_bins} bins. {reason}"
                )
            }
            // ---- Domain ----
            SplineError::InputOutOfDomain { index, value, low, high } => {
                write!(
                    f,
                    "Input to a transform is not within its domain: element {index} is {value}, expected [{low}, {high}]"
                )
            }
            // ---- Tail mode ----
            SplineError::UnsupportedTails { mode } => {
                write!(f, "{mode} tails are not implemented.")
            }
            // ---- Numerical invariants ----
            SplineError::NegativeDiscriminant { index, value } => {
                write!(
                    f,
                    "Inverse quadratic has a negative discriminant at element {index}: {value}"
                )
            }
            SplineError::BinNotFound { index, value } => {
                write!(f, "No spline bin contains element {index} with value {value}")
            }
        }
    }
}

/// Convert a [`SplineError`] into a Python exception with the error message.
///
/// Configuration and domain errors become `ValueError`, unsupported tails
/// become `NotImplementedError`, and invariant violations `RuntimeError`.
#[cfg(feature = "python-bindings")]
impl std::convert::From<SplineError> for PyErr {
    fn from(err: SplineError) -> PyErr {
        match err.kind() {
            ErrorKind::Configuration | ErrorKind::Domain => PyValueError::new_err(err.to_string()),
            ErrorKind::UnsupportedTails => PyNotImplementedError::new_err(err.to_string()),
            ErrorKind::InvariantViolation => PyRuntimeError::new_err(err.to_string()),
        }
    }
}
