//! Numerical stability utilities.
//!
//! Provides safe implementations of the nonlinear transforms used to turn
//! unconstrained spline parameters into valid ones. The functions here follow
//! guarded strategies similar to those in major ML libraries (e.g. PyTorch),
//! using explicit cutoffs (`x > 20.0`) and max-shifting to keep arithmetic in a
//! well-conditioned regime for both `f32` and `f64`.
//!
//! # Provided items
//! - [`SOFTPLUS_CUTOFF`]: threshold above which softplus is the identity.
//! - [`safe_softplus(x)`]: stable version of `ln(1 + exp(x))`,
//!   mapping ℝ → (0, ∞) without overflow.
//! - [`safe_softplus_inv(x)`]: inverse of softplus, mapping
//!   (0, ∞) → ℝ without catastrophic cancellation.
//! - [`safe_softmax(logits)`]: max-shifted softmax over a 1-D view.
use crate::numerical_stability::float::SplineFloat;
use ndarray::{Array1, ArrayView1};

/// Cutoff beyond which `softplus(x)` and its inverse are treated as the
/// identity.
pub const SOFTPLUS_CUTOFF: f64 = 20.0;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// Computes softplus without overflow for large positive `x` and
/// with good precision for large negative `x`. This implementation
/// uses a simple piecewise guard:
///
/// - For sufficiently large `x`, `softplus(x) ≈ x + ln1p(exp(-x)) ≈ x`.
/// - Otherwise, it falls back to `ln1p(exp(x))`.
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `softplus(x)`, strictly positive for every finite `x` that does not
///   underflow `exp`.
pub fn safe_softplus<F: SplineFloat>(x: F) -> F {
    if x > F::from_f64(SOFTPLUS_CUTOFF) { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: solves for `t` in
/// `softplus(t) = x`, returning `t = ln(exp(x) - 1)`.
///
/// Direct evaluation of `ln(exp(x) - 1)` can overflow or lose precision.
/// This implementation mirrors the guarded strategy of `safe_softplus`:
///
/// - For sufficiently large `x`, `ln(exp(x) - 1) ≈ x`.
/// - Otherwise, it uses `ln(expm1(x))`.
///
/// # Parameters
/// - `x`: a positive real (the softplus output), must be finite and `> 0`.
///
/// # Returns
/// - `t` such that `softplus(t) = x`. Non-positive `x` yields NaN or `-∞`.
pub fn safe_softplus_inv<F: SplineFloat>(x: F) -> F {
    if x > F::from_f64(SOFTPLUS_CUTOFF) { x } else { x.exp_m1().ln() }
}

/// Max-shifted softmax over a 1-D view of logits.
///
/// Subtracts the maximum logit before exponentiating so that no term
/// overflows, then divides by the sum. Every output lies in `(0, 1]` and the
/// outputs sum to one up to rounding.
///
/// # Parameters
/// - `logits`: unconstrained scores; must be finite for a meaningful result.
///
/// # Returns
/// - An owned array of the same length as `logits`. An empty input yields an
///   empty output.
pub fn safe_softmax<F: SplineFloat>(logits: ArrayView1<'_, F>) -> Array1<F> {
    let max = logits.iter().copied().fold(F::neg_infinity(), F::max);
    let mut weights = logits.mapv(|z| (z - max).exp());
    let total = weights.sum();
    weights.mapv_inplace(|w| w / total);
    weights
}
