//! spline: monotone rational-quadratic spline transforms.
//!
//! Purpose
//! -------
//! Provide an invertible, elementwise, monotonically increasing map built
//! from `K` rational-quadratic segments, parameterized by unconstrained
//! width, height, and derivative logits, with exact inverses and
//! log-absolute-Jacobians for change-of-variables densities.
//!
//! Key behaviors
//! -------------
//! - Normalize logits into floored bin widths/heights and positive knot
//!   derivatives, build pinned knot sequences, locate bins, and evaluate the
//!   closed-form segment forward or inverse ([`core`]).
//! - Evaluate whole batches on a bounded rectangle or with identity tails
//!   beyond `±tail_bound` ([`transforms`]).
//! - Report structured errors ([`errors`]) and optional progress events
//!   ([`observer`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Every bin has width `>= min_bin_width · (right - left)`, height
//!   `>= min_bin_height · (top - bottom)`, and knot derivatives
//!   `>= min_derivative`, so the map is strictly increasing.
//! - Forward followed by inverse recovers the inputs to floating-point
//!   tolerance, and the two log-Jacobians cancel.
//! - With linear tails the map is continuous with a continuous first
//!   derivative at `±tail_bound`.
//!
//! Conventions
//! -----------
//! - Element precision is chosen per call (`f32` or `f64`) through
//!   [`SplineFloat`](crate::numerical_stability::SplineFloat).
//! - Batch tensors share a leading batch shape `B`; bins and derivatives sit
//!   in the trailing axis.
//!
//! Downstream usage
//! ----------------
//! - Normalizing-flow layers call
//!   [`piecewise_rational_quadratic_transform`] with a [`SplineConfig`] built
//!   once per layer.
//! - Python callers go through the `_rq_spline` extension module.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each stage; `tests/integration_spline_pipeline.rs`
//!   covers randomized round trips, tail behavior, and precision agreement.

pub mod core;
pub mod errors;
pub mod observer;
pub mod transforms;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    DEFAULT_MIN_BIN_HEIGHT, DEFAULT_MIN_BIN_WIDTH, DEFAULT_MIN_DERIVATIVE, DEFAULT_TAIL_BOUND,
    DerivativeLayout, Direction, SplineBounds, SplineConfig, SplineOptions, SplineShape, Tails,
};

pub use self::errors::{ErrorKind, SplineError, SplineResult};

pub use self::observer::{NoopObserver, SplineEvent, SplineObserver};

#[cfg(feature = "obs_slog")]
pub use self::observer::SlogObserver;

pub use self::transforms::{
    SplineOutput, piecewise_rational_quadratic_transform,
    piecewise_rational_quadratic_transform_observed, rational_quadratic_spline,
    rational_quadratic_spline_observed, unconstrained_rational_quadratic_spline,
    unconstrained_rational_quadratic_spline_observed,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rq_spline::spline::prelude::*;
//
// to import the everyday spline surface in a single line.

pub mod prelude {
    pub use super::{
        Direction, SplineBounds, SplineConfig, SplineError, SplineOptions, SplineOutput,
        SplineResult, Tails, piecewise_rational_quadratic_transform, rational_quadratic_spline,
        unconstrained_rational_quadratic_spline,
    };
}
