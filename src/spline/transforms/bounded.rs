//! Bounded rational-quadratic spline over a batch of inputs.
//!
//! Purpose
//! -------
//! Evaluate the monotone rational-quadratic spline on a finite rectangle
//! `[left, right] × [bottom, top]` for every element of a batched input, in
//! either direction, returning outputs together with per-element
//! log-absolute-Jacobians.
//!
//! Key behaviors
//! -------------
//! - Shapes, floors, and (for interior derivative layouts) the unit-slope
//!   floor are validated before any element is touched.
//! - Every input must lie in the domain of the chosen direction (the width
//!   axis going forward, the height axis going backward); the first element
//!   outside it (NaN included) fails the whole call.
//! - Evaluation runs in three phases over all rows: parameter normalization
//!   and knot construction, bin lookup, closed-form evaluation. The observer
//!   hears about each phase once.
//! - With the `parallel` feature each phase runs on the rayon pool; results
//!   and the reported error are identical to the sequential path.
//!
//! Invariants & assumptions
//! ------------------------
//! - Output tensors have exactly the input's shape.
//! - Errors carry the flat row-major index of the first failing element.
//! - Inverse log-Jacobians are the negated forward log-Jacobians at the
//!   recovered preimage.
//!
//! Conventions
//! -----------
//! - Parameter tensors are read through row-major `(rows, ·)` views; a copy
//!   is made only when the caller's layout is not already contiguous in that
//!   order.
//! - The same row pipeline backs the linear-tail transform, which masks out
//!   elements beyond its tail bound.
use crate::{
    numerical_stability::SplineFloat,
    spline::{
        core::{
            bounds::SplineBounds,
            knots::KnotSequence,
            normalize::{
                knot_derivatives, normalize_bins, pad_derivatives, unit_slope_constant,
                validate_bin_floors, validate_unit_slope_floor,
            },
            options::{Direction, SplineOptions, Tails},
            rq::BinParams,
            search::search_sorted,
            shape::{DerivativeLayout, SplineShape},
        },
        errors::{SplineError, SplineResult},
        observer::{NoopObserver, SplineEvent, SplineObserver},
    },
};
use ndarray::{
    Array1, ArrayD, ArrayView1, ArrayViewD, CowArray, Dimension, IntoDimension, Ix1, Ix2, IxDyn,
    Zip,
};

/// Apply a `Zip` closure on the rayon pool when `parallel` is enabled and
/// sequentially otherwise.
macro_rules! map_collect {
    ($zip:expr, $f:expr) => {{
        #[cfg(feature = "parallel")]
        let collected = $zip.par_map_collect($f);
        #[cfg(not(feature = "parallel"))]
        let collected = $zip.map_collect($f);
        collected
    }};
}

/// Outputs and log-absolute-Jacobians of a spline call, both shaped like the
/// inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct SplineOutput<F> {
    pub outputs: ArrayD<F>,
    pub logabsdet: ArrayD<F>,
}

/// Bounded rational-quadratic spline with no observer attached.
///
/// See [`rational_quadratic_spline_observed`].
pub fn rational_quadratic_spline<F: SplineFloat>(
    inputs: ArrayViewD<'_, F>, unnormalized_widths: ArrayViewD<'_, F>,
    unnormalized_heights: ArrayViewD<'_, F>, unnormalized_derivatives: ArrayViewD<'_, F>,
    direction: Direction, bounds: &SplineBounds, opts: &SplineOptions,
) -> SplineResult<SplineOutput<F>> {
    rational_quadratic_spline_observed(
        inputs,
        unnormalized_widths,
        unnormalized_heights,
        unnormalized_derivatives,
        direction,
        bounds,
        opts,
        &NoopObserver,
    )
}

/// Bounded rational-quadratic spline.
///
/// Parameters
/// ----------
/// - `inputs`: `ArrayViewD<F>`
///   Batch of values of shape `B`, inside `bounds.domain(direction)`.
/// - `unnormalized_widths`, `unnormalized_heights`: `ArrayViewD<F>`
///   Bin logits of shape `B × K`.
/// - `unnormalized_derivatives`: `ArrayViewD<F>`
///   Knot-derivative logits of shape `B × (K + 1)`, or `B × (K - 1)` to pin
///   both boundary derivatives to one.
/// - `direction`: [`Direction`]
/// - `bounds`: [`SplineBounds`]
/// - `opts`: [`SplineOptions`]
/// - `observer`: receives one [`SplineEvent`] per phase.
///
/// Returns
/// -------
/// [`SplineOutput`] with outputs and log-absolute-Jacobians of shape `B`.
///
/// Errors
/// ------
/// - Configuration errors for inconsistent shapes, floors, or bounds.
/// - [`SplineError::InputOutOfDomain`] for the first input outside the domain.
/// - [`SplineError::NegativeDiscriminant`] / [`SplineError::BinNotFound`] if
///   a numerical invariant breaks.
#[allow(clippy::too_many_arguments)]
pub fn rational_quadratic_spline_observed<F: SplineFloat>(
    inputs: ArrayViewD<'_, F>, unnormalized_widths: ArrayViewD<'_, F>,
    unnormalized_heights: ArrayViewD<'_, F>, unnormalized_derivatives: ArrayViewD<'_, F>,
    direction: Direction, bounds: &SplineBounds, opts: &SplineOptions,
    observer: &dyn SplineObserver,
) -> SplineResult<SplineOutput<F>> {
    let shape = SplineShape::new(
        inputs.shape(),
        unnormalized_widths.shape(),
        unnormalized_heights.shape(),
        unnormalized_derivatives.shape(),
        &Tails::None,
    )?;
    validate_options(opts, &shape)?;
    bounds.validate()?;
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

    let (low, high) = bounds.domain(direction);
    let (low_f, high_f) = (F::from_f64(low), F::from_f64(high));
    if let Some((index, &value)) =
        batch.inputs.iter().enumerate().find(|&(_, &x)| !(low_f <= x && x <= high_f))
    {
        return Err(SplineError::InputOutOfDomain { index, value: value.widen(), low, high });
    }

    let evaluator = RowEvaluator::new(direction, bounds, opts, shape.layout);
    let inside = Array1::from_elem(shape.rows(), true);
    let (outputs, logabsdet) = evaluate_rows(&batch, inside.view(), &evaluator, observer)?;

    observer.observe(&SplineEvent::CallFinished { rows: shape.rows() });
    Ok(SplineOutput {
        outputs: into_batch(outputs, &shape)?,
        logabsdet: into_batch(logabsdet, &shape)?,
    })
}

/// Check the parameter floors on their own and against the validated shape.
pub(crate) fn validate_options(opts: &SplineOptions, shape: &SplineShape) -> SplineResult<()> {
    opts.validate()?;
    validate_bin_floors(opts, shape.num_bins)?;
    if shape.layout == DerivativeLayout::Interior {
        validate_unit_slope_floor(opts)?;
    }
    Ok(())
}

/// Row-major `(rows, ·)` views of the four tensors of a call.
pub(crate) struct RowBatch<'a, F> {
    pub(crate) inputs: CowArray<'a, F, Ix1>,
    pub(crate) widths: CowArray<'a, F, Ix2>,
    pub(crate) heights: CowArray<'a, F, Ix2>,
    pub(crate) derivatives: CowArray<'a, F, Ix2>,
}

impl<'a, F: SplineFloat> RowBatch<'a, F> {
    pub(crate) fn new(
        shape: &SplineShape, inputs: &'a ArrayViewD<'_, F>, widths: &'a ArrayViewD<'_, F>,
        heights: &'a ArrayViewD<'_, F>, derivatives: &'a ArrayViewD<'_, F>,
    ) -> SplineResult<Self> {
        let rows = shape.rows();
        let num_derivatives = derivatives.shape().last().copied().unwrap_or(0);
        Ok(RowBatch {
            inputs: as_rows("inputs", inputs, rows)?,
            widths: as_rows("unnormalized_widths", widths, (rows, shape.num_bins))?,
            heights: as_rows("unnormalized_heights", heights, (rows, shape.num_bins))?,
            derivatives: as_rows("unnormalized_derivatives", derivatives, (rows, num_derivatives))?,
        })
    }
}

fn as_rows<'a, F, E>(
    tensor: &'static str, view: &'a ArrayViewD<'_, F>, target: E,
) -> SplineResult<CowArray<'a, F, E::Dim>>
where
    F: SplineFloat,
    E: IntoDimension,
{
    let target = target.into_dimension();
    view.to_shape(target.clone()).map_err(|_| SplineError::ShapeMismatch {
        tensor,
        expected: target.slice().to_vec(),
        actual: view.shape().to_vec(),
    })
}

/// Reshape a flat per-row result back to the batch shape.
pub(crate) fn into_batch<F: SplineFloat>(flat: Array1<F>, shape: &SplineShape) -> SplineResult<ArrayD<F>> {
    let len = flat.len();
    flat.into_shape_with_order(IxDyn(&shape.batch)).map_err(|_| SplineError::ShapeMismatch {
        tensor: "outputs",
        expected: shape.batch.clone(),
        actual: vec![len],
    })
}

/// Normalized knots and knot derivatives of one row.
#[derive(Debug, Clone)]
pub(crate) struct PreparedRow<F> {
    widths: KnotSequence<F>,
    heights: KnotSequence<F>,
    derivatives: Array1<F>,
}

/// Per-call constants of the row pipeline, converted to the element type.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RowEvaluator<F> {
    direction: Direction,
    left: F,
    right: F,
    bottom: F,
    top: F,
    min_bin_width: F,
    min_bin_height: F,
    min_derivative: F,
    layout: DerivativeLayout,
    pad: F,
}

impl<F: SplineFloat> RowEvaluator<F> {
    pub(crate) fn new(
        direction: Direction, bounds: &SplineBounds, opts: &SplineOptions,
        layout: DerivativeLayout,
    ) -> Self {
        let min_derivative = F::from_f64(opts.min_derivative);
        RowEvaluator {
            direction,
            left: F::from_f64(bounds.left),
            right: F::from_f64(bounds.right),
            bottom: F::from_f64(bounds.bottom),
            top: F::from_f64(bounds.top),
            min_bin_width: F::from_f64(opts.min_bin_width),
            min_bin_height: F::from_f64(opts.min_bin_height),
            min_derivative,
            layout,
            pad: unit_slope_constant(min_derivative),
        }
    }

    fn prepare(
        &self, widths: ArrayView1<'_, F>, heights: ArrayView1<'_, F>,
        derivatives: ArrayView1<'_, F>,
    ) -> PreparedRow<F> {
        let widths = normalize_bins(widths, self.min_bin_width);
        let heights = normalize_bins(heights, self.min_bin_height);
        let padded = pad_derivatives(derivatives, self.layout, self.pad);
        PreparedRow {
            widths: KnotSequence::from_fractions(widths.view(), self.left, self.right),
            heights: KnotSequence::from_fractions(heights.view(), self.bottom, self.top),
            derivatives: knot_derivatives(padded.view(), self.min_derivative),
        }
    }

    fn locate(&self, index: usize, x: F, row: &PreparedRow<F>) -> SplineResult<usize> {
        let knots = match self.direction {
            Direction::Forward => row.widths.knots(),
            Direction::Inverse => row.heights.knots(),
        };
        search_sorted(knots, x).ok_or(SplineError::BinNotFound { index, value: x.widen() })
    }

    fn evaluate(&self, index: usize, x: F, row: &PreparedRow<F>, bin: usize) -> SplineResult<(F, F)> {
        let params = BinParams::gather(&row.widths, &row.heights, row.derivatives.view(), bin);
        match self.direction {
            Direction::Forward => Ok(params.forward(x)),
            Direction::Inverse => params.inverse(x).map_err(|err| {
                SplineError::NegativeDiscriminant { index, value: err.value.widen() }
            }),
        }
    }
}

/// Run the row pipeline on every element flagged in `inside`.
///
/// Elements not flagged pass through unchanged with a zero log-Jacobian.
/// Returns flat `(outputs, logabsdet)` in row-major order.
pub(crate) fn evaluate_rows<F: SplineFloat>(
    batch: &RowBatch<'_, F>, inside: ArrayView1<'_, bool>, evaluator: &RowEvaluator<F>,
    observer: &dyn SplineObserver,
) -> SplineResult<(Array1<F>, Array1<F>)> {
    let live = inside.iter().filter(|&&flag| flag).count();

    let prepared: Array1<Option<PreparedRow<F>>> = map_collect!(
        Zip::from(&inside)
            .and(batch.widths.rows())
            .and(batch.heights.rows())
            .and(batch.derivatives.rows()),
        |&flag, widths, heights, derivatives| {
            flag.then(|| evaluator.prepare(widths, heights, derivatives))
        }
    );
    if evaluator.layout == DerivativeLayout::Interior {
        observer.observe(&SplineEvent::DerivativesPadded {
            pad_constant: evaluator.pad.widen(),
            rows: live,
        });
    }
    observer.observe(&SplineEvent::KnotsBuilt {
        rows: live,
        num_bins: batch.widths.ncols(),
    });

    let bins: Array1<SplineResult<Option<usize>>> = map_collect!(
        Zip::indexed(&batch.inputs).and(&prepared),
        |index, &x, row: &Option<PreparedRow<F>>| match row {
            Some(row) => evaluator.locate(index, x, row).map(Some),
            None => Ok(None),
        }
    );
    let bins: Array1<Option<usize>> = bins.into_iter().collect::<SplineResult<_>>()?;
    observer.observe(&SplineEvent::BinsLocated { direction: evaluator.direction, rows: live });

    let values: Array1<SplineResult<(F, F)>> = map_collect!(
        Zip::indexed(&batch.inputs).and(&prepared).and(&bins),
        |index, &x, row: &Option<PreparedRow<F>>, &bin: &Option<usize>| match (row, bin) {
            (Some(row), Some(bin)) => evaluator.evaluate(index, x, row, bin),
            _ => Ok((x, F::zero())),
        }
    );
    let values: Vec<(F, F)> = values.into_iter().collect::<SplineResult<_>>()?;
    let (outputs, logabsdet): (Vec<F>, Vec<F>) = values.into_iter().unzip();
    Ok((Array1::from(outputs), Array1::from(logabsdet)))
}
