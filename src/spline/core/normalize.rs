//! Parameter normalization: raw logits to valid spline parameters.
//!
//! Purpose
//! -------
//! Turn unconstrained per-bin width/height logits and per-knot derivative
//! logits into strictly positive, correctly scaled spline parameters. This is
//! the first stage of every spline evaluation; its outputs feed the knot
//! builder.
//!
//! Key behaviors
//! -------------
//! - Validate the bin floors against the number of bins once per call
//!   ([`validate_bin_floors`]).
//! - Map width/height logits through a max-shifted softmax and rescale so
//!   every fraction is at least the configured floor and the row still sums
//!   to one ([`normalize_bins`]).
//! - Build the full knot-derivative vector, padding missing boundary entries
//!   with the unit-slope constant ([`pad_derivatives`],
//!   [`unit_slope_constant`]), then apply `min_derivative + softplus(·)`
//!   ([`knot_derivatives`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - `min_bin_width * num_bins <= 1` and `min_bin_height * num_bins <= 1`
//!   after [`validate_bin_floors`] succeeds.
//! - Normalized fractions are `>= floor` and sum to one up to rounding; exact
//!   endpoint pinning is the knot builder's job, not this module's.
//! - Knot derivatives are `>= min_derivative > 0` for finite logits.
//!
//! Conventions
//! -----------
//! - All functions are pure: they take views and return freshly allocated
//!   arrays; nothing is modified in place.
use crate::{
    numerical_stability::{SplineFloat, safe_softmax, safe_softplus, safe_softplus_inv},
    spline::{
        core::{options::SplineOptions, shape::DerivativeLayout},
        errors::{SplineError, SplineResult},
    },
};
use ndarray::{Array1, ArrayView1, s};

/// Validate the width/height floors against the number of bins.
///
/// # Errors
/// - [`SplineError::InvalidMinBinWidth`] if `min_bin_width * num_bins > 1`.
/// - [`SplineError::InvalidMinBinHeight`] if `min_bin_height * num_bins > 1`.
pub fn validate_bin_floors(opts: &SplineOptions, num_bins: usize) -> SplineResult<()> {
    if opts.min_bin_width * num_bins as f64 > 1.0 {
        return Err(SplineError::InvalidMinBinWidth { min_bin_width: opts.min_bin_width, num_bins });
    }
    if opts.min_bin_height * num_bins as f64 > 1.0 {
        return Err(SplineError::InvalidMinBinHeight {
            min_bin_height: opts.min_bin_height,
            num_bins,
        });
    }
    Ok(())
}

/// Validate that `min_derivative` leaves room for a unit boundary slope.
///
/// Padding boundary derivatives requires `1 - min_derivative > 0`, otherwise
/// the padding constant `ln(e^{1 - min_derivative} - 1)` is undefined.
///
/// # Errors
/// - [`SplineError::InvalidMinDerivative`] if `min_derivative >= 1`.
pub fn validate_unit_slope_floor(opts: &SplineOptions) -> SplineResult<()> {
    if opts.min_derivative >= 1.0 {
        return Err(SplineError::InvalidMinDerivative {
            value: opts.min_derivative,
            reason: "Padded boundary derivatives require min_derivative < 1.",
        });
    }
    Ok(())
}

/// Softmax the logits of one row and rescale them onto the floor.
///
/// Computes `floor + (1 - floor * K) * softmax(raw)`, so every entry is at
/// least `floor` and the entries sum to one.
pub fn normalize_bins<F: SplineFloat>(raw: ArrayView1<'_, F>, floor: F) -> Array1<F> {
    let num_bins = F::from_f64(raw.len() as f64);
    let scale = F::one() - floor * num_bins;
    safe_softmax(raw).mapv(|p| floor + scale * p)
}

/// Logit that maps to a knot derivative of exactly one.
///
/// Solves `min_derivative + softplus(c) = 1`, i.e.
/// `c = ln(e^{1 - min_derivative} - 1)`.
pub fn unit_slope_constant<F: SplineFloat>(min_derivative: F) -> F {
    safe_softplus_inv(F::one() - min_derivative)
}

/// Build the `K + 1` knot-derivative logits for one row.
///
/// With [`DerivativeLayout::Interior`] the row is wrapped with `pad` on both
/// ends; with [`DerivativeLayout::Full`] it is copied as is.
pub fn pad_derivatives<F: SplineFloat>(
    raw: ArrayView1<'_, F>, layout: DerivativeLayout, pad: F,
) -> Array1<F> {
    match layout {
        DerivativeLayout::Full => raw.to_owned(),
        DerivativeLayout::Interior => {
            let mut padded = Array1::from_elem(raw.len() + 2, pad);
            padded.slice_mut(s![1..-1]).assign(&raw);
            padded
        }
    }
}

/// Map knot-derivative logits to strictly positive derivatives:
/// `min_derivative + softplus(raw)`.
pub fn knot_derivatives<F: SplineFloat>(raw: ArrayView1<'_, F>, min_derivative: F) -> Array1<F> {
    raw.mapv(|z| min_derivative + safe_softplus(z))
}
