//! Bin lookup on a monotone knot sequence.
//!
//! The bin index of `value` is the number of knots `<= value`, minus one,
//! with [`SplineFloat::SEARCH_EPS`] added to the final knot so that a value
//! equal to the upper bound is counted into the last bin instead of past it.
//! The final knot itself is never counted, so the upper bound stays in the
//! last bin even when the epsilon is below the knot's precision (large
//! bounds in `f32`).
use crate::numerical_stability::SplineFloat;
use ndarray::ArrayView1;

/// Locate the bin containing `value`.
///
/// Returns `Some(k)` with `knots[k] <= value < knots[k + 1]` (the last knot
/// widened by the search epsilon), or `None` when `value` lies below the
/// first knot, at or beyond the widened last knot, or is NaN. Callers are
/// expected to have range-checked `value` first.
pub fn search_sorted<F: SplineFloat>(knots: ArrayView1<'_, F>, value: F) -> Option<usize> {
    let last = knots.len().checked_sub(1)?;
    let top = knots[last];
    if !(value <= top || value < top + F::SEARCH_EPS) {
        return None;
    }
    let count = knots.iter().take(last).filter(|&&knot| value >= knot).count();
    count.checked_sub(1)
}
