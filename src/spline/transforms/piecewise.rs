//! Tail-mode dispatch for the piecewise rational-quadratic transform.
use crate::{
    numerical_stability::SplineFloat,
    spline::{
        core::{
            bounds::SplineBounds,
            options::{Direction, SplineConfig, Tails},
        },
        errors::SplineResult,
        observer::{NoopObserver, SplineObserver},
        transforms::{
            bounded::{SplineOutput, rational_quadratic_spline_observed},
            unconstrained::unconstrained_rational_quadratic_spline_observed,
        },
    },
};
use ndarray::ArrayViewD;

/// Piecewise rational-quadratic transform with no observer attached.
///
/// See [`piecewise_rational_quadratic_transform_observed`].
pub fn piecewise_rational_quadratic_transform<F: SplineFloat>(
    inputs: ArrayViewD<'_, F>, unnormalized_widths: ArrayViewD<'_, F>,
    unnormalized_heights: ArrayViewD<'_, F>, unnormalized_derivatives: ArrayViewD<'_, F>,
    direction: Direction, config: &SplineConfig,
) -> SplineResult<SplineOutput<F>> {
    piecewise_rational_quadratic_transform_observed(
        inputs,
        unnormalized_widths,
        unnormalized_heights,
        unnormalized_derivatives,
        direction,
        config,
        &NoopObserver,
    )
}

/// Evaluate the spline with the tail policy in `config`.
///
/// - [`Tails::None`]: the bounded spline on the unit square `[0, 1]²`.
/// - [`Tails::Linear`]: the bounded spline on `[-B, B]²` with identity
///   outside it.
///
/// Tail-mode names are parsed by [`Tails::from_mode`], which is where an
/// unsupported mode is reported.
pub fn piecewise_rational_quadratic_transform_observed<F: SplineFloat>(
    inputs: ArrayViewD<'_, F>, unnormalized_widths: ArrayViewD<'_, F>,
    unnormalized_heights: ArrayViewD<'_, F>, unnormalized_derivatives: ArrayViewD<'_, F>,
    direction: Direction, config: &SplineConfig, observer: &dyn SplineObserver,
) -> SplineResult<SplineOutput<F>> {
    match config.tails {
        Tails::None => rational_quadratic_spline_observed(
            inputs,
            unnormalized_widths,
            unnormalized_heights,
            unnormalized_derivatives,
            direction,
            &SplineBounds::default(),
            &config.options,
            observer,
        ),
        Tails::Linear { tail_bound } => unconstrained_rational_quadratic_spline_observed(
            inputs,
            unnormalized_widths,
            unnormalized_heights,
            unnormalized_derivatives,
            direction,
            tail_bound,
            &config.options,
            observer,
        ),
    }
}
