//! Rational-quadratic evaluation inside a single bin.
//!
//! Purpose
//! -------
//! Evaluate the monotone rational-quadratic segment of one bin in closed form,
//! solve its inverse, and compute the log-absolute-derivative used for
//! change-of-variables densities.
//!
//! Key behaviors
//! -------------
//! - [`BinParams::gather`] collects the per-bin quantities at a located bin
//!   index: lower knots on both axes, bin width and height, slope
//!   `δ = height / width`, and the knot derivatives `d0`, `d1`.
//! - [`BinParams::forward`] maps `x` through the segment using the fractional
//!   position `θ = (x - x_k) / width`.
//! - [`BinParams::inverse`] solves `a·θ² + b·θ + c = 0` with the stable root
//!   `θ = 2c / (-b - √(b² - 4ac))`; the other root belongs to a non-monotone
//!   branch and is never used.
//! - [`BinParams::log_abs_det`] evaluates
//!   `ln(δ²(d1 θ² + 2δ θ(1-θ) + d0 (1-θ)²)) - 2 ln(δ + (d0 + d1 - 2δ) θ(1-θ))`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `width > 0`, `height > 0`, `d0 > 0`, `d1 > 0`; these hold for any
//!   parameters produced by the normalizer and knot builder.
//! - Inputs are already located inside the bin; no range checks happen here.
//! - Outputs are clamped to the bin's knots on the output axis, so a value
//!   at an interval endpoint never rounds past it.
//! - A negative discriminant beyond the rounding error of `b²` and `4ac`
//!   means the parameters are inconsistent and is reported. Anything within
//!   that error is read as zero.
use crate::{numerical_stability::SplineFloat, spline::core::knots::KnotSequence};
use ndarray::ArrayView1;

/// Negative discriminant found while inverting a bin; carries its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegativeDiscriminant<F> {
    pub value: F,
}

/// Quantities of one spline bin needed by the closed-form formulas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinParams<F> {
    pub cum_width: F,
    pub cum_width_upper: F,
    pub width: F,
    pub cum_height: F,
    pub cum_height_upper: F,
    pub height: F,
    pub delta: F,
    pub d0: F,
    pub d1: F,
}

impl<F: SplineFloat> BinParams<F> {
    /// Gather the parameters of bin `k`.
    ///
    /// `derivatives` holds the `K + 1` knot derivatives; `d0` and `d1` are the
    /// entries at the bin's lower and upper knot.
    ///
    /// # Panics
    /// Panics if `k >= K` or `derivatives.len() < K + 1`; bin indices come
    /// from the bin locator, which never returns an out-of-range index.
    pub fn gather(
        widths: &KnotSequence<F>, heights: &KnotSequence<F>, derivatives: ArrayView1<'_, F>,
        k: usize,
    ) -> Self {
        let width = widths.size(k);
        let height = heights.size(k);
        BinParams {
            cum_width: widths.lower(k),
            cum_width_upper: widths.upper(k),
            width,
            cum_height: heights.lower(k),
            cum_height_upper: heights.upper(k),
            height,
            delta: height / width,
            d0: derivatives[k],
            d1: derivatives[k + 1],
        }
    }

    /// `d0 + d1 - 2δ`, the curvature term shared by every formula.
    #[inline]
    fn curvature(&self) -> F {
        self.d0 + self.d1 - (self.delta + self.delta)
    }

    /// Forward map of `x` (on the width axis) through this bin.
    ///
    /// Returns `(y, logabsdet)`.
    pub fn forward(&self, x: F) -> (F, F) {
        let theta = (x - self.cum_width) / self.width;
        let theta_one_minus_theta = theta * (F::one() - theta);
        let numerator =
            self.height * (self.delta * theta * theta + self.d0 * theta_one_minus_theta);
        let denominator = self.delta + self.curvature() * theta_one_minus_theta;
        let y = (self.cum_height + numerator / denominator)
            .max(self.cum_height)
            .min(self.cum_height_upper);
        (y, self.log_abs_det(theta))
    }

    /// Inverse map of `y` (on the height axis) through this bin.
    ///
    /// Returns `(x, logabsdet)` where `logabsdet` is the negated forward
    /// log-Jacobian at `x`.
    ///
    /// # Errors
    /// - [`NegativeDiscriminant`] if `b² - 4ac` is negative by more than
    ///   `16 ε (b² + |4ac|)`.
    pub fn inverse(&self, y: F) -> Result<(F, F), NegativeDiscriminant<F>> {
        let four = F::from_f64(4.0);
        let offset = y - self.cum_height;
        let curvature = self.curvature();

        let a = offset * curvature + self.height * (self.delta - self.d0);
        let b = self.height * self.d0 - offset * curvature;
        let c = -self.delta * offset;

        let b_squared = b * b;
        let four_ac = four * a * c;
        let discriminant = b_squared - four_ac;
        // At θ = 1 the exact discriminant is (height · d1)², which can sit below
        // the rounding error of its two terms when d1 is small against δ.
        let rounding = F::from_f64(16.0) * F::epsilon() * (b_squared + four_ac.abs());
        if !(discriminant >= -rounding) {
            return Err(NegativeDiscriminant { value: discriminant });
        }

        let theta = (c + c) / (-b - discriminant.max(F::zero()).sqrt());
        let x = (theta * self.width + self.cum_width)
            .max(self.cum_width)
            .min(self.cum_width_upper);
        Ok((x, -self.log_abs_det(theta)))
    }

    /// Forward log-absolute-derivative at fractional position `theta`.
    pub fn log_abs_det(&self, theta: F) -> F {
        let two = F::from_f64(2.0);
        let one_minus_theta = F::one() - theta;
        let theta_one_minus_theta = theta * one_minus_theta;
        let denominator = self.delta + self.curvature() * theta_one_minus_theta;
        let derivative_numerator = self.delta.powi(2)
            * (self.d1 * theta.powi(2)
                + two * self.delta * theta_one_minus_theta
                + self.d0 * one_minus_theta.powi(2));
        derivative_numerator.ln() - two * denominator.ln()
    }
}
