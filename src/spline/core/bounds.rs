//! Interval bounds for the bounded rational-quadratic spline.
//!
//! The spline maps `[left, right]` on the width (input) axis onto
//! `[bottom, top]` on the height (output) axis. With linear tails both axes
//! are the square `[-tail_bound, tail_bound]`.
use crate::spline::{
    core::options::Direction,
    errors::{SplineError, SplineResult},
};

/// Bounded domain (`left..right`) and range (`bottom..top`) of the spline.
///
/// Invariant: all four values finite, `left < right`, `bottom < top`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineBounds {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl SplineBounds {
    /// Construct validated bounds.
    ///
    /// # Errors
    /// - [`SplineError::InvalidBounds`] if either axis is non-finite or empty.
    pub fn new(left: f64, right: f64, bottom: f64, top: f64) -> SplineResult<Self> {
        let bounds = SplineBounds { left, right, bottom, top };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Re-check the invariant; used on entry to the bounded transform.
    ///
    /// # Errors
    /// - [`SplineError::InvalidBounds`] if either axis is non-finite or empty.
    pub fn validate(&self) -> SplineResult<()> {
        validate_axis("width", self.left, self.right)?;
        validate_axis("height", self.bottom, self.top)
    }

    /// Square bounds `[-bound, bound]` on both axes, as used by linear tails.
    ///
    /// # Errors
    /// - [`SplineError::InvalidTailBound`] if `bound` is not finite and `> 0`.
    pub fn square(bound: f64) -> SplineResult<Self> {
        if !(bound.is_finite() && bound > 0.0) {
            return Err(SplineError::InvalidTailBound { value: bound });
        }
        Ok(SplineBounds { left: -bound, right: bound, bottom: -bound, top: bound })
    }

    /// The interval inputs must lie in for the given direction: the width axis
    /// going forward, the height axis going backward.
    pub fn domain(&self, direction: Direction) -> (f64, f64) {
        match direction {
            Direction::Forward => (self.left, self.right),
            Direction::Inverse => (self.bottom, self.top),
        }
    }
}

impl Default for SplineBounds {
    /// Unit square `[0, 1] × [0, 1]`.
    fn default() -> Self {
        SplineBounds { left: 0.0, right: 1.0, bottom: 0.0, top: 1.0 }
    }
}

fn validate_axis(axis: &'static str, low: f64, high: f64) -> SplineResult<()> {
    if !(low.is_finite() && high.is_finite() && low < high) {
        return Err(SplineError::InvalidBounds { axis, low, high });
    }
    Ok(())
}
