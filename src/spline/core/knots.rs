//! Knot construction: cumulative bin boundaries pinned to the interval.
//!
//! Purpose
//! -------
//! Convert normalized bin fractions (summing to one) into the monotone knot
//! sequence of one axis and recover the per-bin sizes from that sequence.
//!
//! Key behaviors
//! -------------
//! - Exclusive prefix sum of the fractions, affinely mapped onto
//!   `[low, high]`.
//! - The first and last knots are set to `low` and `high` exactly, so tails
//!   join the bounded spline without a gap and bin lookup at the upper bound
//!   is well-defined.
//! - Bin sizes are consecutive differences of the pinned knots, not the
//!   normalizer output, so sizes and knots are mutually consistent.
//!
//! Invariants & assumptions
//! ------------------------
//! - `knots.len() == sizes.len() + 1 == num_bins + 1`.
//! - `knots[0] == low` and `knots[num_bins] == high` bitwise.
//! - Knots are non-decreasing when fractions are non-negative.
use crate::numerical_stability::SplineFloat;
use ndarray::{Array1, ArrayView1, s};

/// Knot sequence and bin sizes along one axis of the spline.
#[derive(Debug, Clone, PartialEq)]
pub struct KnotSequence<F> {
    knots: Array1<F>,
    sizes: Array1<F>,
}

impl<F: SplineFloat> KnotSequence<F> {
    /// Build knots on `[low, high]` from bin fractions summing to one.
    ///
    /// Parameters
    /// ----------
    /// - `fractions`: `ArrayView1<F>`
    ///   Normalized bin sizes (length `K`, entries `> 0`, sum `≈ 1`).
    /// - `low`, `high`: `F`
    ///   Interval endpoints with `low < high`.
    ///
    /// Returns
    /// -------
    /// `KnotSequence<F>` with `K + 1` knots pinned to `low`/`high` and `K`
    /// bin sizes taken as knot differences.
    pub fn from_fractions(fractions: ArrayView1<'_, F>, low: F, high: F) -> Self {
        let num_bins = fractions.len();
        let span = high - low;
        let mut partial = F::zero();
        let knots: Array1<F> = std::iter::once(low)
            .chain(fractions.iter().enumerate().map(|(i, &fraction)| {
                partial += fraction;
                if i + 1 == num_bins { high } else { low + span * partial }
            }))
            .collect();
        let sizes = &knots.slice(s![1..]) - &knots.slice(s![..-1]);
        KnotSequence { knots, sizes }
    }

    /// Number of bins (`knots().len() - 1`).
    pub fn num_bins(&self) -> usize {
        self.sizes.len()
    }

    /// All `K + 1` knots.
    pub fn knots(&self) -> ArrayView1<'_, F> {
        self.knots.view()
    }

    /// All `K` bin sizes.
    pub fn sizes(&self) -> ArrayView1<'_, F> {
        self.sizes.view()
    }

    /// Lower knot of bin `k`.
    #[inline]
    pub fn lower(&self, k: usize) -> F {
        self.knots[k]
    }

    /// Upper knot of bin `k`.
    #[inline]
    pub fn upper(&self, k: usize) -> F {
        self.knots[k + 1]
    }

    /// Size of bin `k`.
    #[inline]
    pub fn size(&self, k: usize) -> F {
        self.sizes[k]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - bitwise endpoint pinning, including fractions whose sum drifts,
    // - monotonicity and size/knot consistency,
    // - the single-bin case.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Endpoints must equal the bounds exactly even when the fractions do not
    // sum to one in floating point.
    //
    // Given
    // -----
    // - Ten fractions of 0.1 (whose f64 sum is 0.9999999999999999) on [-5, 5].
    //
    // Expect
    // ------
    // - knots[0] == -5.0 and knots[10] == 5.0 bitwise.
    fn endpoints_are_pinned_exactly() {
        let fractions = Array1::from_elem(10, 0.1_f64);
        let seq = KnotSequence::from_fractions(fractions.view(), -5.0, 5.0);
        assert_eq!(seq.knots()[0].to_bits(), (-5.0_f64).to_bits());
        assert_eq!(seq.knots()[10].to_bits(), 5.0_f64.to_bits());
        assert_eq!(seq.num_bins(), 10);
    }

    #[test]
    // Purpose
    // -------
    // Sizes are the differences of the pinned knots and knots are increasing.
    fn sizes_are_knot_differences() {
        let fractions = array![0.1_f64, 0.2, 0.3, 0.4];
        let seq = KnotSequence::from_fractions(fractions.view(), 0.0, 2.0);
        let knots = seq.knots();
        for k in 0..seq.num_bins() {
            assert!(knots[k + 1] > knots[k]);
            assert_eq!(seq.size(k), knots[k + 1] - knots[k]);
            assert_eq!(seq.lower(k), knots[k]);
        }
        assert_relative_eq!(knots[2], 0.6, epsilon = 1e-15);
        assert_relative_eq!(seq.sizes().sum(), 2.0, epsilon = 1e-15);
    }

    #[test]
    fn single_bin_spans_the_interval() {
        let seq = KnotSequence::from_fractions(array![1.0_f32].view(), 0.0, 1.0);
        assert_eq!(seq.knots().to_vec(), vec![0.0, 1.0]);
        assert_eq!(seq.sizes().to_vec(), vec![1.0]);
    }
}
