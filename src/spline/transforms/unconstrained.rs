//! Linear-tail extension of the bounded spline to the whole real line.
//!
//! Inside `[-tail_bound, tail_bound]` elements go through the bounded spline
//! on the square `[-tail_bound, tail_bound]²` with both boundary derivatives
//! pinned to one; outside it they pass through unchanged with a zero
//! log-Jacobian. The result is continuous with a continuous first derivative
//! at `±tail_bound`.
//!
//! Elements exactly at `±tail_bound` are evaluated by the spline. NaN inputs
//! are not inside the interval and therefore pass through as NaN.
use crate::{
    numerical_stability::SplineFloat,
    spline::{
        core::{
            bounds::SplineBounds,
            options::{Direction, SplineOptions, Tails},
            shape::SplineShape,
        },
        errors::SplineResult,
        observer::{NoopObserver, SplineEvent, SplineObserver},
        transforms::bounded::{
            RowBatch, RowEvaluator, SplineOutput, evaluate_rows, into_batch, validate_options,
        },
    },
};
use ndarray::{Array1, ArrayViewD};

/// Linear-tail spline with no observer attached.
///
/// See [`unconstrained_rational_quadratic_spline_observed`].
pub fn unconstrained_rational_quadratic_spline<F: SplineFloat>(
    inputs: ArrayViewD<'_, F>, unnormalized_widths: ArrayViewD<'_, F>,
    unnormalized_heights: ArrayViewD<'_, F>, unnormalized_derivatives: ArrayViewD<'_, F>,
    direction: Direction, tail_bound: f64, opts: &SplineOptions,
) -> SplineResult<SplineOutput<F>> {
    unconstrained_rational_quadratic_spline_observed(
        inputs,
        unnormalized_widths,
        unnormalized_heights,
        unnormalized_derivatives,
        direction,
        tail_bound,
        opts,
        &NoopObserver,
    )
}

/// Rational-quadratic spline with identity tails beyond `±tail_bound`.
///
/// Parameters
/// ----------
/// - `unnormalized_derivatives`: `ArrayViewD<F>`
///   Interior knot-derivative logits of shape `B × (K - 1)`; the boundary
///   derivatives are fixed to one.
/// - `tail_bound`: `f64`
///   Half-width of the bounded square, finite and `> 0`.
///
/// The remaining parameters follow
/// [`rational_quadratic_spline_observed`](super::bounded::rational_quadratic_spline_observed).
///
/// Errors
/// ------
/// - [`SplineError::InvalidTailBound`] for a bad `tail_bound`.
/// - [`SplineError::InvalidDerivativeLayout`] for `K + 1` derivative logits.
/// - [`SplineError::InvalidMinDerivative`] if `min_derivative >= 1`.
/// - Numerical invariant errors from the bounded spline.
#[allow(clippy::too_many_arguments)]
pub fn unconstrained_rational_quadratic_spline_observed<F: SplineFloat>(
    inputs: ArrayViewD<'_, F>, unnormalized_widths: ArrayViewD<'_, F>,
    unnormalized_heights: ArrayViewD<'_, F>, unnormalized_derivatives: ArrayViewD<'_, F>,
    direction: Direction, tail_bound: f64, opts: &SplineOptions,
    observer: &dyn SplineObserver,
) -> SplineResult<SplineOutput<F>> {
    let tails = Tails::linear(tail_bound)?;
    let bounds = SplineBounds::square(tail_bound)?;
    let shape = SplineShape::new(
        inputs.shape(),
        unnormalized_widths.shape(),
        unnormalized_heights.shape(),
        unnormalized_derivatives.shape(),
        &tails,
    )?;
    validate_options(opts, &shape)?;
    observer.observe(&SplineEvent::CallStarted {
        direction,
        rows: shape.rows(),
        num_bins: shape.num_bins,
    });

    let batch = RowBatch::new(
        &shape,
        &inputs,
        &unnormalized_widths,
        &unnormalized_heights,
        &unnormalized_derivatives,
    )?;

    let bound = F::from_f64(tail_bound);
    let inside: Array1<bool> = batch.inputs.mapv(|x| -bound <= x && x <= bound);
    let num_inside = inside.iter().filter(|&&flag| flag).count();
    observer.observe(&SplineEvent::TailsPartitioned {
        inside: num_inside,
        outside: shape.rows() - num_inside,
    });

    let evaluator = RowEvaluator::new(direction, &bounds, opts, shape.layout);
    let (outputs, logabsdet) = evaluate_rows(&batch, inside.view(), &evaluator, observer)?;

    observer.observe(&SplineEvent::CallFinished { rows: shape.rows() });
    Ok(SplineOutput {
        outputs: into_batch(outputs, &shape)?,
        logabsdet: into_batch(logabsdet, &shape)?,
    })
}
