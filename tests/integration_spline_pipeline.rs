//! Integration tests for the rational-quadratic spline pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end transform: from raw width/height/derivative
//!   logits, through normalization, knot construction, and bin lookup, to
//!   outputs and log-Jacobians for whole batches.
//! - Exercise randomized standard-normal parameters at realistic flow-layer
//!   shapes (`[1, 1, 55]` inputs, 10 bins, `tail_bound = 5`) rather than toy
//!   cases only.
//!
//! Coverage
//! --------
//! - `spline::transforms`:
//!   - Bounded evaluation against hand-computed values on equal bins.
//!   - Forward/inverse round trips and log-Jacobian reciprocity, with and
//!     without tails.
//!   - Exact identity beyond the tail bound and monotonicity across it.
//!   - `f32` / `f64` agreement.
//!   - Round trips that start exactly on the interval endpoints.
//! - `spline::core::options`:
//!   - Runtime tail-mode parsing and configuration errors.
//! - `spline::observer`:
//!   - Events delivered to a user-defined observer.
//!
//! Exclusions
//! ----------
//! - Per-bin formulas, softplus/softmax guards, and knot pinning are covered
//!   by unit tests next to their modules.
//! - Python bindings are exercised from Python.
use approx::assert_relative_eq;
use ndarray::{Array, Array1, ArrayD, IxDyn, array};
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, StandardNormal};
use rq_spline::numerical_stability::SplineFloat;
use rq_spline::spline::{
    Direction, ErrorKind, SplineBounds, SplineConfig, SplineError, SplineEvent, SplineObserver,
    SplineOptions, Tails, piecewise_rational_quadratic_transform,
    piecewise_rational_quadratic_transform_observed, rational_quadratic_spline,
};
use std::sync::Mutex;

const TAIL_BOUND: f64 = 5.0;
const NUM_BINS: usize = 10;

/// Purpose
/// -------
/// Draw a standard-normal tensor of the given shape from a seeded RNG.
fn standard_normal(rng: &mut StdRng, shape: &[usize]) -> ArrayD<f64> {
    Array::from_shape_simple_fn(IxDyn(shape), || StandardNormal.sample(rng))
}

/// Purpose
/// -------
/// Build the randomized parameter set of one coupling layer.
///
/// Returns
/// -------
/// `(inputs, widths, heights, derivatives)` with shapes `[1, 1, 55]`,
/// `[1, 1, 55, 10]`, `[1, 1, 55, 10]`, `[1, 1, 55, 9]`. Inputs are scaled by
/// three so a share of them fall beyond `±TAIL_BOUND`.
fn layer_params(seed: u64) -> (ArrayD<f64>, ArrayD<f64>, ArrayD<f64>, ArrayD<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let inputs = standard_normal(&mut rng, &[1, 1, 55]) * 3.0;
    let widths = standard_normal(&mut rng, &[1, 1, 55, NUM_BINS]);
    let heights = standard_normal(&mut rng, &[1, 1, 55, NUM_BINS]);
    let derivatives = standard_normal(&mut rng, &[1, 1, 55, NUM_BINS - 1]);
    (inputs, widths, heights, derivatives)
}

fn linear_tails() -> SplineConfig {
    SplineConfig::new(SplineOptions::default(), Tails::linear(TAIL_BOUND).unwrap())
}

#[test]
// Purpose
// -------
// Reproduce the worked example: four equal bins on the unit square.
//
// Given
// -----
// - K = 4, zero width/height logits, five zero derivative logits, no tails.
// - Input 0.5 in the forward direction.
//
// Expect
// ------
// - Output 0.5 (the knot between bins 1 and 2) and log|J| = ln(1e-3 + ln 2).
fn worked_example_on_equal_bins() {
    let x = array![0.5_f64].into_dyn();
    let w = Array::<f64, _>::zeros((1, 4)).into_dyn();
    let d = Array::<f64, _>::zeros((1, 5)).into_dyn();

    let out = piecewise_rational_quadratic_transform(
        x.view(),
        w.view(),
        w.view(),
        d.view(),
        Direction::Forward,
        &SplineConfig::default(),
    )
    .unwrap();

    assert_relative_eq!(out.outputs[[0]], 0.5, epsilon = 1e-12);
    assert_relative_eq!(
        out.logabsdet[[0]],
        (1e-3 + std::f64::consts::LN_2).ln(),
        epsilon = 1e-12
    );
}

#[test]
// Purpose
// -------
// Inverse then forward recovers the inputs across the whole randomized
// layer, including elements in the tails, and the log-Jacobians cancel.
//
// Given
// -----
// - Three seeds of standard-normal layer parameters with linear tails.
//
// Expect
// ------
// - |forward(inverse(y)) - y| < 1e-8 and |ladj_inv + ladj_fwd| < 1e-7.
fn inverse_then_forward_round_trips_with_tails() {
    for seed in [7_u64, 42, 2024] {
        let (y, w, h, d) = layer_params(seed);
        let config = linear_tails();

        let inv = piecewise_rational_quadratic_transform(
            y.view(),
            w.view(),
            h.view(),
            d.view(),
            Direction::Inverse,
            &config,
        )
        .unwrap();
        let fwd = piecewise_rational_quadratic_transform(
            inv.outputs.view(),
            w.view(),
            h.view(),
            d.view(),
            Direction::Forward,
            &config,
        )
        .unwrap();

        assert_eq!(inv.outputs.shape(), &[1, 1, 55]);
        assert_eq!(inv.logabsdet.shape(), &[1, 1, 55]);
        for ((&y0, &y1), (&l_inv, &l_fwd)) in y
            .iter()
            .zip(fwd.outputs.iter())
            .zip(inv.logabsdet.iter().zip(fwd.logabsdet.iter()))
        {
            assert_relative_eq!(y1, y0, epsilon = 1e-8);
            assert_relative_eq!(l_inv + l_fwd, 0.0, epsilon = 1e-7);
        }
    }
}

/// Purpose
/// -------
/// Push both interval endpoints through the bounded spline over many rows of
/// wide (σ = 3) logits and check that nothing leaves the interval.
///
/// Expect
/// ------
/// - `forward(left)` and `forward(right)` lie in `[bottom, top]`.
/// - Inverting those outputs succeeds, stays in `[left, right]`, and returns
///   to the endpoint within `tol`.
/// - `inverse(bottom)` and `inverse(top)` succeed and lie in `[left, right]`.
fn assert_endpoints_round_trip<F: SplineFloat>(rows: usize, seed: u64, tol: f64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut logits =
        |cols: usize| standard_normal(&mut rng, &[rows, cols]).mapv(|z| F::from_f64(3.0 * z));
    let w = logits(NUM_BINS);
    let h = logits(NUM_BINS);
    let d = logits(NUM_BINS + 1);
    let bounds = SplineBounds::new(-0.3, 1.7, -0.3, 1.7).unwrap();
    let opts = SplineOptions::default();
    let (low, high) = (F::from_f64(-0.3), F::from_f64(1.7));
    let in_range = |v: &ArrayD<F>| v.iter().all(|&t| low <= t && t <= high);

    for edge in [low, high] {
        let at_edge = Array1::from_elem(rows, edge).into_dyn();
        let run = |x: &ArrayD<F>, direction: Direction| {
            rational_quadratic_spline(
                x.view(),
                w.view(),
                h.view(),
                d.view(),
                direction,
                &bounds,
                &opts,
            )
            .unwrap()
        };

        let fwd = run(&at_edge, Direction::Forward);
        assert!(in_range(&fwd.outputs));
        let back = run(&fwd.outputs, Direction::Inverse);
        assert!(in_range(&back.outputs));
        let worst = back.outputs.iter().map(|&x| (x - edge).abs().widen()).fold(0.0, f64::max);
        assert!(worst < tol, "endpoint {} drifted by {worst}", edge.widen());

        let inv = run(&at_edge, Direction::Inverse);
        assert!(in_range(&inv.outputs));
    }
}

#[test]
// Purpose
// -------
// Endpoint inputs must map into the closed output interval, so that the
// inverse accepts them, in both precisions.
//
// Given
// -----
// - Bounds [-0.3, 1.7]², 10 bins, full derivative layout, N(0, 3) logits.
// - 20 000 rows in f64 and 5 000 rows in f32.
fn endpoints_round_trip_in_both_precisions() {
    assert_endpoints_round_trip::<f64>(20_000, 21, 1e-5);
    assert_endpoints_round_trip::<f32>(5_000, 22, 1e-2);
}

#[test]
// Purpose
// -------
// Forward then inverse on the bounded spline with explicit, asymmetric
// bounds and the full derivative layout.
fn bounded_round_trip_with_full_layout() {
    let mut rng = StdRng::seed_from_u64(11);
    let bounds = SplineBounds::new(-1.0, 3.0, 10.0, 12.5).unwrap();
    let unit: ArrayD<f64> = Array::from_shape_simple_fn(IxDyn(&[4, 16]), || {
        let z: f64 = StandardNormal.sample(&mut rng);
        1.0 / (1.0 + (-z).exp())
    });
    let x = unit.mapv(|u| -1.0 + 4.0 * u);
    let w = standard_normal(&mut rng, &[4, 16, 6]);
    let h = standard_normal(&mut rng, &[4, 16, 6]);
    let d = standard_normal(&mut rng, &[4, 16, 7]);
    let opts = SplineOptions::default();

    let fwd = rational_quadratic_spline(
        x.view(),
        w.view(),
        h.view(),
        d.view(),
        Direction::Forward,
        &bounds,
        &opts,
    )
    .unwrap();
    assert!(fwd.outputs.iter().all(|&y| (10.0..=12.5).contains(&y)));

    let inv = rational_quadratic_spline(
        fwd.outputs.view(),
        w.view(),
        h.view(),
        d.view(),
        Direction::Inverse,
        &bounds,
        &opts,
    )
    .unwrap();
    for ((&x0, &x1), (&l_fwd, &l_inv)) in x
        .iter()
        .zip(inv.outputs.iter())
        .zip(fwd.logabsdet.iter().zip(inv.logabsdet.iter()))
    {
        assert_relative_eq!(x1, x0, epsilon = 1e-8);
        assert_relative_eq!(l_fwd + l_inv, 0.0, epsilon = 1e-7);
    }
}

#[test]
// Purpose
// -------
// Elements beyond the tail bound are returned unchanged with zero
// log-Jacobian, in both directions.
fn tails_are_exact_identity() {
    let (mut x, w, h, d) = layer_params(3);
    x[[0, 0, 0]] = 7.5;
    x[[0, 0, 1]] = -6.0;
    let config = linear_tails();

    for direction in [Direction::Forward, Direction::Inverse] {
        let out = piecewise_rational_quadratic_transform(
            x.view(),
            w.view(),
            h.view(),
            d.view(),
            direction,
            &config,
        )
        .unwrap();
        let mut outside = 0;
        for ((&x0, &y), &lad) in x.iter().zip(out.outputs.iter()).zip(out.logabsdet.iter()) {
            if x0.abs() > TAIL_BOUND {
                outside += 1;
                assert_eq!(y, x0);
                assert_eq!(lad, 0.0);
            } else {
                assert!(y.abs() <= TAIL_BOUND + 1e-12);
            }
        }
        assert!(outside >= 2);
    }
}

#[test]
// Purpose
// -------
// One parameter row applied to a dense grid over [-8, 8] yields a strictly
// increasing, continuous map whose slope is one at the tail bounds.
//
// Given
// -----
// - The first row of a randomized layer broadcast across 1601 inputs.
//
// Expect
// ------
// - Outputs strictly increasing, finite log-Jacobians, and exp(log|J|)
//   close to one just inside ±TAIL_BOUND.
fn single_row_is_monotone_across_the_join() {
    let (_, w, h, d) = layer_params(99);
    let n = 1601;
    let grid = Array1::linspace(-8.0, 8.0, n).into_dyn();
    let broadcast = |p: &ArrayD<f64>| {
        let len = p.shape()[p.ndim() - 1];
        let row: Vec<f64> = p.iter().take(len).copied().collect();
        Array::from_shape_fn((n, len), |(_, k)| row[k]).into_dyn()
    };
    let (w, h, d) = (broadcast(&w), broadcast(&h), broadcast(&d));

    let out = piecewise_rational_quadratic_transform(
        grid.view(),
        w.view(),
        h.view(),
        d.view(),
        Direction::Forward,
        &linear_tails(),
    )
    .unwrap();

    let ys: Vec<f64> = out.outputs.iter().copied().collect();
    assert!(ys.windows(2).all(|pair| pair[1] > pair[0]));
    assert!(out.logabsdet.iter().all(|lad| lad.is_finite()));

    // Grid points at ±5 are indices 300 and 1300.
    assert_relative_eq!(ys[300], -TAIL_BOUND, epsilon = 1e-12);
    assert_relative_eq!(ys[1300], TAIL_BOUND, epsilon = 1e-12);
    assert_relative_eq!(out.logabsdet[[300]], 0.0, epsilon = 1e-9);
    assert_relative_eq!(out.logabsdet[[1300]], 0.0, epsilon = 1e-9);
}

#[test]
// Purpose
// -------
// Single and double precision agree to single-precision tolerance.
fn f32_and_f64_agree() {
    let (x, w, h, d) = layer_params(5);
    let config = linear_tails();
    let out64 = piecewise_rational_quadratic_transform(
        x.view(),
        w.view(),
        h.view(),
        d.view(),
        Direction::Forward,
        &config,
    )
    .unwrap();

    let cast = |a: &ArrayD<f64>| a.mapv(|v| v as f32);
    let (x32, w32, h32, d32) = (cast(&x), cast(&w), cast(&h), cast(&d));
    let out32 = piecewise_rational_quadratic_transform(
        x32.view(),
        w32.view(),
        h32.view(),
        d32.view(),
        Direction::Forward,
        &config,
    )
    .unwrap();

    for (&y64, &y32) in out64.outputs.iter().zip(out32.outputs.iter()) {
        assert_relative_eq!(y64, f64::from(y32), epsilon = 1e-4);
    }
    for (&l64, &l32) in out64.logabsdet.iter().zip(out32.logabsdet.iter()) {
        assert_relative_eq!(l64, f64::from(l32), epsilon = 1e-3);
    }
}

#[test]
// Purpose
// -------
// Configuration, domain, and tail-mode failures surface as distinct error
// kinds with their payloads.
fn errors_are_classified() {
    let err = Tails::from_mode(Some("circular"), TAIL_BOUND).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedTails);
    assert_eq!(err.to_string(), "circular tails are not implemented.");

    let x = array![0.5_f64].into_dyn();
    let w = Array::<f64, _>::zeros((1, 10)).into_dyn();
    let d = Array::<f64, _>::zeros((1, 11)).into_dyn();
    let config = SplineConfig::new(SplineOptions::new(0.2, 1e-3, 1e-3).unwrap(), Tails::None);
    let err = piecewise_rational_quadratic_transform(
        x.view(),
        w.view(),
        w.view(),
        d.view(),
        Direction::Forward,
        &config,
    )
    .unwrap_err();
    assert_eq!(err, SplineError::InvalidMinBinWidth { min_bin_width: 0.2, num_bins: 10 });
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let x = array![0.25_f64, 1.5].into_dyn();
    let w = Array::<f64, _>::zeros((2, 4)).into_dyn();
    let d = Array::<f64, _>::zeros((2, 5)).into_dyn();
    let err = piecewise_rational_quadratic_transform(
        x.view(),
        w.view(),
        w.view(),
        d.view(),
        Direction::Forward,
        &SplineConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err, SplineError::InputOutOfDomain { index: 1, value: 1.5, low: 0.0, high: 1.0 });
    assert_eq!(err.kind(), ErrorKind::Domain);
}

/// Observer that keeps every event it receives.
#[derive(Default)]
struct Collect(Mutex<Vec<SplineEvent>>);

impl SplineObserver for Collect {
    fn observe(&self, event: &SplineEvent) {
        self.0.lock().unwrap().push(*event);
    }
}

#[test]
// Purpose
// -------
// A user-defined observer receives the call lifecycle with tail counts that
// match the inputs.
fn observer_receives_lifecycle() {
    let (x, w, h, d) = layer_params(42);
    let outside = x.iter().filter(|v| v.abs() > TAIL_BOUND).count();
    let observer = Collect::default();

    piecewise_rational_quadratic_transform_observed(
        x.view(),
        w.view(),
        h.view(),
        d.view(),
        Direction::Inverse,
        &linear_tails(),
        &observer,
    )
    .unwrap();

    let events = observer.0.into_inner().unwrap();
    assert_eq!(
        events.first(),
        Some(&SplineEvent::CallStarted { direction: Direction::Inverse, rows: 55, num_bins: 10 })
    );
    assert!(events.contains(&SplineEvent::TailsPartitioned { inside: 55 - outside, outside }));
    assert!(events.contains(&SplineEvent::BinsLocated {
        direction: Direction::Inverse,
        rows: 55 - outside,
    }));
    assert_eq!(events.last(), Some(&SplineEvent::CallFinished { rows: 55 }));
}
