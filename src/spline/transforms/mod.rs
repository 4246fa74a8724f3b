//! transforms: batched spline entry points.
//!
//! Purpose
//! -------
//! Compose the per-row building blocks in [`crate::spline::core`] into
//! batched transforms over `ndarray` tensors of any rank.
//!
//! Key behaviors
//! -------------
//! - [`rational_quadratic_spline`]: bounded spline on explicit
//!   [`SplineBounds`](crate::spline::core::SplineBounds).
//! - [`unconstrained_rational_quadratic_spline`]: identity tails outside
//!   `[-tail_bound, tail_bound]`.
//! - [`piecewise_rational_quadratic_transform`]: dispatch on
//!   [`Tails`](crate::spline::core::Tails).
//! - Every entry point has an `_observed` twin that reports progress to a
//!   [`SplineObserver`](crate::spline::observer::SplineObserver).
//!
//! Invariants & assumptions
//! ------------------------
//! - Outputs and log-Jacobians are shaped exactly like the inputs.
//! - A call either succeeds for every element or returns the error of the
//!   first failing element in row-major order; partial results are never
//!   returned.

pub mod bounded;
pub mod piecewise;
pub mod unconstrained;

pub use self::bounded::{SplineOutput, rational_quadratic_spline, rational_quadratic_spline_observed};
pub use self::piecewise::{
    piecewise_rational_quadratic_transform, piecewise_rational_quadratic_transform_observed,
};
pub use self::unconstrained::{
    unconstrained_rational_quadratic_spline, unconstrained_rational_quadratic_spline_observed,
};
