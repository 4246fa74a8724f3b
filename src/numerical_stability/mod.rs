//! numerical_stability: element types and overflow-safe scalar transforms.
//!
//! Purpose
//! -------
//! Collect the numerically stable building blocks shared by the spline core:
//! the [`SplineFloat`] element trait (so every routine works in `f32` and
//! `f64`) and the guarded softplus / softmax transforms that map unconstrained
//! parameters into strictly positive or normalized values.
//!
//! Key behaviors
//! -------------
//! - Provide stable scalar transforms (`safe_softplus`, its inverse) that
//!   never overflow for large inputs.
//! - Provide a max-shifted softmax (`safe_softmax`) over 1-D `ndarray` views.
//! - Define the search epsilon used by bin lookup per element type.
//!
//! Conventions
//! -----------
//! - This module never logs, performs I/O, or touches global state; it is
//!   pure numerical helpers suitable for tight per-element loops.
//! - Inputs are assumed finite; validation happens in the spline layer.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover agreement with naive formulas on
//!   safe grids, tail behavior, the unit-slope padding constant, and softmax
//!   mass conservation.

pub mod float;
pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::float::SplineFloat;
pub use self::transformations::{
    SOFTPLUS_CUTOFF, safe_softmax, safe_softplus, safe_softplus_inv,
};
