//! Tracing hooks for spline calls.
//!
//! Purpose
//! -------
//! Let callers introspect a spline call at its natural checkpoints (after
//! derivative padding, after knot construction, after bin lookup, after tail
//! partitioning) without the numerical core performing any I/O itself.
//!
//! Key behaviors
//! -------------
//! - [`SplineObserver`] receives one [`SplineEvent`] per checkpoint per call;
//!   events carry call-level summaries, never per-element data.
//! - [`NoopObserver`] is used by the plain entry points.
//! - With the `obs_slog` feature, [`SlogObserver`] forwards events to a
//!   `slog::Logger`; [`SlogObserver::term_noblock`] builds a non-blocking
//!   terminal logger.
//!
//! Conventions
//! -----------
//! - Observers are `Send + Sync` so they can be shared with parallel
//!   evaluation; they must not panic.
use crate::spline::core::options::Direction;

/// Call-level checkpoint emitted during a spline evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplineEvent {
    /// Shapes and configuration validated.
    CallStarted { direction: Direction, rows: usize, num_bins: usize },
    /// Linear tails split the batch into bounded and identity elements.
    TailsPartitioned { inside: usize, outside: usize },
    /// Boundary derivative logits were padded with the unit-slope constant.
    DerivativesPadded { pad_constant: f64, rows: usize },
    /// Width and height knot sequences were built for every bounded row.
    KnotsBuilt { rows: usize, num_bins: usize },
    /// Every bounded row was assigned a bin on the searched axis.
    BinsLocated { direction: Direction, rows: usize },
    /// Outputs and log-Jacobians are complete.
    CallFinished { rows: usize },
}

/// Receiver of [`SplineEvent`]s.
pub trait SplineObserver: Send + Sync {
    fn observe(&self, event: &SplineEvent);
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SplineObserver for NoopObserver {
    #[inline]
    fn observe(&self, _event: &SplineEvent) {}
}

/// Observer that logs events through `slog`.
#[cfg(feature = "obs_slog")]
#[derive(Clone)]
pub struct SlogObserver {
    logger: slog::Logger,
}

#[cfg(feature = "obs_slog")]
impl SlogObserver {
    /// Wrap an existing logger.
    pub fn new(logger: slog::Logger) -> Self {
        SlogObserver { logger }
    }

    /// Terminal logger behind an async drain that drops records on overflow,
    /// so a slow terminal never stalls evaluation.
    pub fn term_noblock() -> Self {
        use slog::Drain;

        let decorator = slog_term::TermDecorator::new().build();
        let drain = slog_term::FullFormat::new(decorator).build().fuse();
        let drain = slog_async::Async::new(drain)
            .overflow_strategy(slog_async::OverflowStrategy::Drop)
            .build()
            .fuse();
        SlogObserver { logger: slog::Logger::root(drain, slog::o!()) }
    }
}

#[cfg(feature = "obs_slog")]
impl SplineObserver for SlogObserver {
    fn observe(&self, event: &SplineEvent) {
        match *event {
            SplineEvent::CallStarted { direction, rows, num_bins } => {
                slog::info!(self.logger, "spline call started";
                    "direction" => format!("{direction:?}"), "rows" => rows, "num_bins" => num_bins);
            }
            SplineEvent::TailsPartitioned { inside, outside } => {
                slog::debug!(self.logger, "tails partitioned";
                    "inside" => inside, "outside" => outside);
            }
            SplineEvent::DerivativesPadded { pad_constant, rows } => {
                slog::debug!(self.logger, "boundary derivatives padded";
                    "pad_constant" => pad_constant, "rows" => rows);
            }
            SplineEvent::KnotsBuilt { rows, num_bins } => {
                slog::debug!(self.logger, "knots built"; "rows" => rows, "num_bins" => num_bins);
            }
            SplineEvent::BinsLocated { direction, rows } => {
                slog::debug!(self.logger, "bins located";
                    "direction" => format!("{direction:?}"), "rows" => rows);
            }
            SplineEvent::CallFinished { rows } => {
                slog::info!(self.logger, "spline call finished"; "rows" => rows);
            }
        }
    }
}
