//! Spline options: immutable per-call configuration for spline transforms.
//!
//! Purpose
//! -------
//! Collect the tunable minimums and the tail policy of a rational-quadratic
//! spline call into one explicit, validated value. Call sites pass a single
//! [`SplineConfig`] rather than a loose set of keyword-style scalars.
//!
//! Key behaviors
//! -------------
//! - Represent the parameter floors via [`SplineOptions`]
//!   (`min_bin_width`, `min_bin_height`, `min_derivative`).
//! - Represent the tail policy as the closed enum [`Tails`]
//!   (`None` | `Linear { tail_bound }`), with a string parser for runtime
//!   front-ends that rejects unknown modes.
//! - Represent the evaluation direction via [`Direction`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Every floor is finite and strictly positive once constructed through
//!   [`SplineOptions::new`].
//! - `Tails::Linear { tail_bound }` always carries a finite, positive bound
//!   when built through [`Tails::linear`] or [`Tails::from_mode`].
//! - Checks that depend on the number of bins (`min_bin_width * K <= 1`) are
//!   not performed here; they run once per call in the normalizer.
//!
//! Conventions
//! -----------
//! - Configuration scalars are stored as `f64` and converted into the call's
//!   element type when the call starts.
//! - Defaults: `{min_bin_width: 1e-3, min_bin_height: 1e-3,
//!   min_derivative: 1e-3, tails: None}`; linear tails default to a bound of
//!   `1.0`.
//!
//! Testing notes
//! -------------
//! - Unit tests verify documented defaults, validation failures for each
//!   field, and tail-mode parsing.
use crate::spline::errors::{SplineError, SplineResult};

/// Default floor for normalized bin widths.
pub const DEFAULT_MIN_BIN_WIDTH: f64 = 1e-3;

/// Default floor for normalized bin heights.
pub const DEFAULT_MIN_BIN_HEIGHT: f64 = 1e-3;

/// Default floor for knot derivatives.
pub const DEFAULT_MIN_DERIVATIVE: f64 = 1e-3;

/// Default half-width of the bounded region when linear tails are enabled.
pub const DEFAULT_TAIL_BOUND: f64 = 1.0;

/// SplineOptions: floors applied when normalizing raw spline parameters.
///
/// Purpose
/// -------
/// Bound the normalized bin widths, bin heights, and knot derivatives away
/// from zero so the spline stays strictly monotonic and its Jacobian finite.
///
/// Fields
/// ------
/// - `min_bin_width`: `f64`
///   Lower bound on every normalized bin width (fraction of the interval).
/// - `min_bin_height`: `f64`
///   Lower bound on every normalized bin height.
/// - `min_derivative`: `f64`
///   Lower bound added to every softplus-transformed knot derivative.
///
/// Invariants
/// ----------
/// - All three fields are finite and `> 0`.
///
/// Notes
/// -----
/// - Fields are public for inspection. Values built as struct literals are
///   re-checked by [`SplineOptions::validate`] on every transform call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineOptions {
    pub min_bin_width: f64,
    pub min_bin_height: f64,
    pub min_derivative: f64,
}

impl SplineOptions {
    /// Construct validated spline floors.
    ///
    /// Parameters
    /// ----------
    /// - `min_bin_width`: `f64`
    ///   Floor for normalized widths; finite and `> 0`.
    /// - `min_bin_height`: `f64`
    ///   Floor for normalized heights; finite and `> 0`.
    /// - `min_derivative`: `f64`
    ///   Floor for knot derivatives; finite and `> 0`.
    ///
    /// Returns
    /// -------
    /// `SplineResult<SplineOptions>`
    ///   - `Ok(SplineOptions)` when every floor is finite and positive.
    ///
    /// Errors
    /// ------
    /// - `SplineError::InvalidMinBinWidth` / `InvalidMinBinHeight`
    ///   Returned for a non-finite or non-positive floor (`num_bins` is
    ///   reported as 0 since no bins are known yet).
    /// - `SplineError::InvalidMinDerivative`
    ///   Returned for a non-finite or non-positive derivative floor.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rq_spline::spline::core::options::SplineOptions;
    /// let opts = SplineOptions::new(1e-3, 1e-3, 1e-3).unwrap();
    /// assert_eq!(opts, SplineOptions::default());
    /// assert!(SplineOptions::new(0.0, 1e-3, 1e-3).is_err());
    /// ```
    pub fn new(
        min_bin_width: f64, min_bin_height: f64, min_derivative: f64,
    ) -> SplineResult<Self> {
        let opts = SplineOptions { min_bin_width, min_bin_height, min_derivative };
        opts.validate()?;
        Ok(opts)
    }

    /// Check that every floor is finite and `> 0`.
    ///
    /// The transforms call this on entry, so options assembled as a struct
    /// literal are held to the same invariants as those from [`SplineOptions::new`].
    ///
    /// # Errors
    /// Same as [`SplineOptions::new`].
    pub fn validate(&self) -> SplineResult<()> {
        let SplineOptions { min_bin_width, min_bin_height, min_derivative } = *self;
        if !(min_bin_width.is_finite() && min_bin_width > 0.0) {
            return Err(SplineError::InvalidMinBinWidth { min_bin_width, num_bins: 0 });
        }
        if !(min_bin_height.is_finite() && min_bin_height > 0.0) {
            return Err(SplineError::InvalidMinBinHeight { min_bin_height, num_bins: 0 });
        }
        if !(min_derivative.is_finite() && min_derivative > 0.0) {
            return Err(SplineError::InvalidMinDerivative {
                value: min_derivative,
                reason: "Knot derivatives must stay strictly positive.",
            });
        }
        Ok(())
    }
}

impl Default for SplineOptions {
    fn default() -> Self {
        SplineOptions {
            min_bin_width: DEFAULT_MIN_BIN_WIDTH,
            min_bin_height: DEFAULT_MIN_BIN_HEIGHT,
            min_derivative: DEFAULT_MIN_DERIVATIVE,
        }
    }
}

/// Tails: behavior of the transform outside the bounded interval.
///
/// Variants
/// --------
/// - `None`
///   No tails: every input must lie inside the bounded interval, otherwise
///   the call fails with a domain error.
/// - `Linear { tail_bound }`
///   Identity outside `[-tail_bound, tail_bound]` with zero log-Jacobian; the
///   bounded spline's boundary derivatives are pinned to 1 so the slope is
///   continuous across the join.
///
/// Notes
/// -----
/// - Downstream code pattern-matches exhaustively so a new tail mode is a
///   compile-time change.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Tails {
    #[default]
    None,
    Linear { tail_bound: f64 },
}

impl Tails {
    /// Build validated linear tails.
    ///
    /// # Errors
    /// - [`SplineError::InvalidTailBound`] if `tail_bound` is not finite or not `> 0`.
    pub fn linear(tail_bound: f64) -> SplineResult<Self> {
        if !(tail_bound.is_finite() && tail_bound > 0.0) {
            return Err(SplineError::InvalidTailBound { value: tail_bound });
        }
        Ok(Tails::Linear { tail_bound })
    }

    /// Parse a runtime tail-mode name.
    ///
    /// `None` means no tails; `Some("linear")` builds [`Tails::Linear`] with
    /// `tail_bound`. Any other name fails.
    ///
    /// # Errors
    /// - [`SplineError::UnsupportedTails`] for an unknown mode name.
    /// - [`SplineError::InvalidTailBound`] for an invalid bound with `"linear"`.
    pub fn from_mode(mode: Option<&str>, tail_bound: f64) -> SplineResult<Self> {
        match mode {
            None => Ok(Tails::None),
            Some("linear") => Tails::linear(tail_bound),
            Some(other) => Err(SplineError::UnsupportedTails { mode: other.to_string() }),
        }
    }
}

/// Direction of evaluation.
///
/// `Forward` maps the width axis onto the height axis; `Inverse` solves the
/// rational quadratic for the preimage and negates the log-Jacobian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Inverse,
}

impl Direction {
    /// Map the boolean `inverse` flag used by array front-ends.
    pub fn from_inverse(inverse: bool) -> Self {
        if inverse { Direction::Inverse } else { Direction::Forward }
    }
}

/// SplineConfig: complete per-call configuration.
///
/// Purpose
/// -------
/// Bundle the parameter floors and the tail policy consumed by
/// [`piecewise_rational_quadratic_transform`](crate::spline::transforms::piecewise_rational_quadratic_transform).
///
/// Fields
/// ------
/// - `options`: [`SplineOptions`]
/// - `tails`: [`Tails`]
///
/// Notes
/// -----
/// - The value is immutable for the duration of a call and is never cached
///   between calls.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SplineConfig {
    pub options: SplineOptions,
    pub tails: Tails,
}

impl SplineConfig {
    pub fn new(options: SplineOptions, tails: Tails) -> SplineConfig {
        SplineConfig { options, tails }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - documented defaults of `SplineOptions`, `Tails`, and `SplineConfig`,
    // - validation of each floor and the tail bound,
    // - runtime tail-mode parsing.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that the defaults match the documented configuration.
    //
    // Expect
    // ------
    // - 1e-3 floors, no tails, forward direction.
    fn defaults_match_documented_values() {
        let config = SplineConfig::default();
        assert_eq!(config.options.min_bin_width, 1e-3);
        assert_eq!(config.options.min_bin_height, 1e-3);
        assert_eq!(config.options.min_derivative, 1e-3);
        assert_eq!(config.tails, Tails::None);
        assert_eq!(Direction::default(), Direction::Forward);
    }

    #[test]
    // Purpose
    // -------
    // Each floor must be rejected when non-finite or non-positive.
    fn options_new_rejects_invalid_floors() {
        assert!(matches!(
            SplineOptions::new(-1e-3, 1e-3, 1e-3),
            Err(SplineError::InvalidMinBinWidth { .. })
        ));
        assert!(matches!(
            SplineOptions::new(1e-3, f64::NAN, 1e-3),
            Err(SplineError::InvalidMinBinHeight { .. })
        ));
        assert!(matches!(
            SplineOptions::new(1e-3, 1e-3, 0.0),
            Err(SplineError::InvalidMinDerivative { .. })
        ));
        assert!(SplineOptions::new(0.05, 0.02, 1e-4).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // `validate` applies the same checks to options built as struct literals.
    fn validate_checks_struct_literals() {
        let literal = SplineOptions { min_derivative: f64::INFINITY, ..SplineOptions::default() };
        assert!(matches!(literal.validate(), Err(SplineError::InvalidMinDerivative { .. })));
        assert_eq!(SplineOptions::default().validate(), Ok(()));
    }

    #[test]
    // Purpose
    // -------
    // Verify tail-mode parsing for known, unknown, and missing modes.
    //
    // Given
    // -----
    // - `None`, `"linear"`, and an unknown name.
    //
    // Expect
    // ------
    // - `Tails::None`, `Tails::Linear { 5.0 }`, and `UnsupportedTails`.
    fn from_mode_parses_known_modes_only() {
        assert_eq!(Tails::from_mode(None, 5.0).unwrap(), Tails::None);
        assert_eq!(Tails::from_mode(Some("linear"), 5.0).unwrap(), Tails::Linear {
            tail_bound: 5.0
        });
        match Tails::from_mode(Some("quadratic"), 5.0) {
            Err(SplineError::UnsupportedTails { mode }) => assert_eq!(mode, "quadratic"),
            other => panic!("expected UnsupportedTails, got {other:?}"),
        }
    }

    #[test]
    fn linear_tails_reject_non_positive_bound() {
        assert!(matches!(Tails::linear(0.0), Err(SplineError::InvalidTailBound { .. })));
        assert!(matches!(Tails::linear(f64::INFINITY), Err(SplineError::InvalidTailBound { .. })));
        assert!(matches!(
            Tails::from_mode(Some("linear"), -1.0),
            Err(SplineError::InvalidTailBound { .. })
        ));
    }

    #[test]
    fn direction_from_inverse_flag() {
        assert_eq!(Direction::from_inverse(true), Direction::Inverse);
        assert_eq!(Direction::from_inverse(false), Direction::Forward);
    }
}
