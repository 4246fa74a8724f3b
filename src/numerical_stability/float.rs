//! Floating-point element types accepted by the spline core.
//!
//! The spline routines are written once over [`SplineFloat`] and instantiated
//! for `f32` and `f64`. Callers pick the precision for a whole call; every
//! tensor in that call shares it.
use ndarray::NdFloat;

/// Scalar type usable by the rational-quadratic spline.
///
/// Extends [`NdFloat`] (so `ndarray` arithmetic and the usual float
/// methods are available) with an infallible conversion from the `f64`
/// literals and configuration values used throughout the crate.
pub trait SplineFloat: NdFloat {
    /// Epsilon added to the final knot before bin lookup so that a value
    /// equal to the upper bound lands in the last bin.
    const SEARCH_EPS: Self;

    /// Convert an `f64` literal or configuration scalar into `Self`.
    ///
    /// Narrowing to `f32` rounds to nearest, matching `as` semantics.
    fn from_f64(value: f64) -> Self;

    /// Widen to `f64` for error payloads and observer events.
    fn widen(self) -> f64;
}

impl SplineFloat for f64 {
    const SEARCH_EPS: f64 = 1e-6;

    #[inline]
    fn from_f64(value: f64) -> f64 {
        value
    }

    #[inline]
    fn widen(self) -> f64 {
        self
    }
}

impl SplineFloat for f32 {
    const SEARCH_EPS: f32 = 1e-6;

    #[inline]
    fn from_f64(value: f64) -> f32 {
        value as f32
    }

    #[inline]
    fn widen(self) -> f64 {
        f64::from(self)
    }
}
