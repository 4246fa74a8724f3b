//! Tensor shapes for batched spline calls.
//!
//! A call carries an input tensor of batch shape `B` (any rank, including
//! rank 0), width and height logits of shape `B × K`, and derivative logits of
//! shape `B × D`, where `K` is the number of bins and `D` selects a
//! [`DerivativeLayout`].
use crate::spline::{
    core::options::Tails,
    errors::{SplineError, SplineResult},
};

/// How many knot derivatives the caller supplied per row.
///
/// - `Full`: `K + 1` logits, one per knot including both boundaries.
/// - `Interior`: `K - 1` logits for the interior knots; both boundary entries
///   are padded with the unit-slope constant before the softplus transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivativeLayout {
    Full,
    Interior,
}

/// Validated shape of a batched spline call.
///
/// Invariants
/// ----------
/// - `num_bins >= 1`.
/// - Every parameter tensor shares the batch prefix `batch`.
/// - `layout` is `Interior` whenever linear tails are requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplineShape {
    pub batch: Vec<usize>,
    pub num_bins: usize,
    pub layout: DerivativeLayout,
}

impl SplineShape {
    /// Validate the four tensor shapes of a call against each other.
    ///
    /// # Arguments
    /// - `inputs`: batch shape `B`.
    /// - `widths`, `heights`: expected `B × K`.
    /// - `derivatives`: expected `B × (K - 1)` or, without tails, `B × (K + 1)`.
    /// - `tails`: tail mode of the call; linear tails only accept `K - 1`.
    ///
    /// # Errors
    /// - [`SplineError::ShapeMismatch`] if a batch prefix or the bins dimension
    ///   disagrees.
    /// - [`SplineError::EmptyBins`] if `K == 0`.
    /// - [`SplineError::InvalidDerivativeLayout`] for any other derivative count.
    pub fn new(
        inputs: &[usize], widths: &[usize], heights: &[usize], derivatives: &[usize],
        tails: &Tails,
    ) -> SplineResult<Self> {
        let num_bins = trailing_dim("unnormalized_widths", inputs, widths)?;
        if num_bins == 0 {
            return Err(SplineError::EmptyBins);
        }
        if heights != widths {
            return Err(SplineError::ShapeMismatch {
                tensor: "unnormalized_heights",
                expected: widths.to_vec(),
                actual: heights.to_vec(),
            });
        }
        let num_derivatives = trailing_dim("unnormalized_derivatives", inputs, derivatives)?;

        let layout = if num_derivatives + 1 == num_bins {
            DerivativeLayout::Interior
        } else if num_derivatives == num_bins + 1 {
            match tails {
                Tails::None => DerivativeLayout::Full,
                Tails::Linear { .. } => {
                    return Err(SplineError::InvalidDerivativeLayout {
                        num_bins,
                        actual: num_derivatives,
                        reason: "Linear tails pin both boundary derivatives; supply num_bins - 1 entries.",
                    });
                }
            }
        } else {
            return Err(SplineError::InvalidDerivativeLayout {
                num_bins,
                actual: num_derivatives,
                reason: "Expected num_bins - 1 interior entries or num_bins + 1 knot entries.",
            });
        };

        Ok(SplineShape { batch: inputs.to_vec(), num_bins, layout })
    }

    /// Number of spline rows, i.e. the product of the batch dimensions.
    pub fn rows(&self) -> usize {
        self.batch.iter().product()
    }
}

/// Check `params == inputs × [n]` and return `n`.
fn trailing_dim(tensor: &'static str, inputs: &[usize], params: &[usize]) -> SplineResult<usize> {
    match params.split_last() {
        Some((&last, prefix)) if prefix == inputs => Ok(last),
        _ => {
            let mut expected = inputs.to_vec();
            expected.push(params.last().copied().unwrap_or(0));
            Err(SplineError::ShapeMismatch { tensor, expected, actual: params.to_vec() })
        }
    }
}
