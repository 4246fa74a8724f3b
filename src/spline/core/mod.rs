//! core: per-row building blocks of the rational-quadratic spline.
//!
//! Purpose
//! -------
//! Collect the pieces a spline evaluation is assembled from: call
//! configuration, interval bounds, shape validation, parameter normalization,
//! knot construction, bin lookup, and the closed-form per-bin evaluator. The
//! batched entry points in [`crate::spline::transforms`] compose these per
//! row; nothing here knows about batches beyond shape validation.
//!
//! Key behaviors
//! -------------
//! - Configuration types ([`SplineOptions`], [`Tails`], [`Direction`],
//!   [`SplineConfig`], [`SplineBounds`]) validate eagerly, so a constructed
//!   value is always usable.
//! - [`SplineShape`] checks the four tensor shapes of a call against each
//!   other and decides the [`DerivativeLayout`].
//! - [`normalize`] turns logits into floored bin fractions and positive knot
//!   derivatives; [`KnotSequence`] turns fractions into pinned knots.
//! - [`search_sorted`] locates bins; [`BinParams`] evaluates one bin forward
//!   or inverse together with its log-Jacobian.
//!
//! Invariants & assumptions
//! ------------------------
//! - Knot sequences start and end exactly at the interval bounds.
//! - Normalized widths, heights, and derivatives are strictly positive, which
//!   makes every bin strictly increasing.
//! - Per-row routines assume their inputs are already range-checked; domain
//!   errors are produced by the transforms layer.
//!
//! Conventions
//! -----------
//! - Configuration scalars are stored as `f64` and converted to the element
//!   type `F: SplineFloat` once per call.
//! - This module performs no logging or I/O; progress is reported by the
//!   transforms layer through [`crate::spline::observer`].
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its own invariants; end-to-end
//!   behavior is covered by the transforms tests and the integration suite.

pub mod bounds;
pub mod knots;
pub mod normalize;
pub mod options;
pub mod rq;
pub mod search;
pub mod shape;

pub use self::bounds::SplineBounds;
pub use self::knots::KnotSequence;
pub use self::normalize::{
    knot_derivatives, normalize_bins, pad_derivatives, unit_slope_constant, validate_bin_floors,
    validate_unit_slope_floor,
};
pub use self::options::{
    DEFAULT_MIN_BIN_HEIGHT, DEFAULT_MIN_BIN_WIDTH, DEFAULT_MIN_DERIVATIVE, DEFAULT_TAIL_BOUND,
    Direction, SplineConfig, SplineOptions, Tails,
};
pub use self::rq::{BinParams, NegativeDiscriminant};
pub use self::search::search_sorted;
pub use self::shape::{DerivativeLayout, SplineShape};
