//! The relaxation loop and its stopping rules.

use super::cancel::CancelToken;
use super::options::LloydOptions;
use super::step::relax_step;
use crate::error::Result;
use crate::triangulation::Triangulation;
use num_traits::Float;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Why the optimizer stopped. Every variant is a successful outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The largest move of the last pass fell below the convergence ratio,
    /// or nothing moved at all when no ratio was set.
    Converged,
    /// The iteration cap was reached.
    IterationLimitReached,
    /// The time limit elapsed.
    TimedOut,
    /// The cancel token was set.
    Cancelled,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Termination::Converged => "converged",
            Termination::IterationLimitReached => "iteration limit reached",
            Termination::TimedOut => "timed out",
            Termination::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

/// Summary of an optimization run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationReport<F> {
    /// Why the run stopped.
    pub termination: Termination,
    /// Number of completed passes.
    pub passes: usize,
    /// Wall-clock time spent.
    pub elapsed: Duration,
    /// Largest displacement ratio of the last pass, `None` if no pass ran.
    pub max_ratio: Option<F>,
}

/// Runs Lloyd relaxation on `tri` until a stopping rule fires.
///
/// Before each pass the limits are checked in a fixed order: time limit,
/// iteration cap, then cancellation. After each pass the run converges when
/// the pass's largest ratio is below `convergence_ratio`, or, without a
/// ratio, when nothing moved.
///
/// # Errors
///
/// - [`crate::RelaxError::InvalidParameter`] if `options` fail validation;
///   the triangulation is untouched.
/// - Any non-recoverable error from a pass, such as
///   [`crate::RelaxError::ConstrainedVertex`].
///
/// # Example
///
/// ```
/// use relaxum::{optimize, LloydOptions, Point2, Termination, Triangulation};
///
/// let points = [
///     Point2::new(0.0_f64, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(0.0, 1.0),
///     Point2::new(0.3, 0.6),
/// ];
/// let (mut tri, ids) = Triangulation::from_points(&points)?;
/// for i in 0..4 {
///     tri.insert_constraint(ids[i], ids[(i + 1) % 4])?;
/// }
/// tri.mark_domain(&[])?;
///
/// let options = LloydOptions::default()
///     .with_max_iterations(500)
///     .with_convergence_ratio(1e-9);
/// let report = optimize(&mut tri, &options, None)?;
///
/// assert_eq!(report.termination, Termination::Converged);
/// let p = tri.point(ids[4]);
/// assert!((p.x - 0.5).abs() < 1e-6 && (p.y - 0.5).abs() < 1e-6);
/// # Ok::<(), relaxum::RelaxError>(())
/// ```
pub fn optimize<F: Float>(
    tri: &mut Triangulation<F>,
    options: &LloydOptions<F>,
    cancel: Option<&CancelToken>,
) -> Result<OptimizationReport<F>> {
    options.validate()?;

    let start = Instant::now();
    let mut passes = 0;
    let mut max_ratio = None;

    let termination = loop {
        if options.time_limit.is_some_and(|limit| start.elapsed() >= limit) {
            break Termination::TimedOut;
        }
        if options.max_iterations.is_some_and(|cap| passes >= cap) {
            break Termination::IterationLimitReached;
        }
        if cancel.is_some_and(CancelToken::is_cancelled) {
            break Termination::Cancelled;
        }

        let step = relax_step(tri, options.freeze_bound)?;
        passes += 1;
        max_ratio = Some(step.max_ratio);

        debug!(
            pass = passes,
            max_ratio = step.max_ratio.to_f64().unwrap_or(f64::NAN),
            moved = step.moved,
            frozen = step.frozen,
            skipped = step.skipped,
            degenerate = step.degenerate,
            rejected = step.rejected,
            "relaxation pass"
        );

        if options.is_converged(step.max_ratio) {
            break Termination::Converged;
        }
    };

    let elapsed = start.elapsed();
    info!(
        %termination,
        passes,
        elapsed_ms = elapsed.as_millis() as u64,
        "lloyd relaxation finished"
    );

    Ok(OptimizationReport {
        termination,
        passes,
        elapsed,
        max_ratio,
    })
}

/// Validated options bundled with an optional cancel token.
///
/// # Example
///
/// ```
/// use relaxum::{CancelToken, LloydOptimizer, LloydOptions, Point2, Termination, Triangulation};
///
/// let points = [Point2::new(0.0_f64, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)];
/// let (mut tri, _) = Triangulation::from_points(&points)?;
///
/// let token = CancelToken::new();
/// let optimizer = LloydOptimizer::new(LloydOptions::default())?.with_cancel_token(token.clone());
/// token.cancel();
///
/// let report = optimizer.run(&mut tri)?;
/// assert_eq!(report.termination, Termination::Cancelled);
/// assert_eq!(report.passes, 0);
/// # Ok::<(), relaxum::RelaxError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LloydOptimizer<F> {
    options: LloydOptions<F>,
    cancel: Option<CancelToken>,
}

impl<F: Float> LloydOptimizer<F> {
    /// Creates an optimizer, rejecting invalid options up front.
    pub fn new(options: LloydOptions<F>) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            cancel: None,
        })
    }

    /// Attach a cancel token polled between passes.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The options this optimizer runs with.
    pub fn options(&self) -> &LloydOptions<F> {
        &self.options
    }

    /// Runs [`optimize`] on `tri`.
    pub fn run(&self, tri: &mut Triangulation<F>) -> Result<OptimizationReport<F>> {
        optimize(tri, &self.options, self.cancel.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelaxError;
    use crate::primitives::Point2;
    use crate::triangulation::VertexId;
    use approx::assert_abs_diff_eq;

    fn square(interior: &[Point2<f64>]) -> (Triangulation<f64>, Vec<VertexId>) {
        let mut points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        points.extend_from_slice(interior);
        let (mut tri, ids) = Triangulation::from_points(&points).unwrap();
        for i in 0..4 {
            tri.insert_constraint(ids[i], ids[(i + 1) % 4]).unwrap();
        }
        tri.mark_domain(&[]).unwrap();
        (tri, ids)
    }

    #[test]
    fn test_converges_to_center() {
        let (mut tri, ids) = square(&[Point2::new(0.3, 0.6)]);
        let options = LloydOptions::default()
            .with_max_iterations(1000)
            .with_convergence_ratio(1e-8);

        let report = optimize(&mut tri, &options, None).unwrap();
        assert_eq!(report.termination, Termination::Converged);
        assert!(report.passes > 1);
        assert!(report.max_ratio.unwrap() < 1e-8);

        let p = tri.point(ids[4]);
        assert_abs_diff_eq!(p.x, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_coarse_ratio_stops_near_center() {
        // The ratio bounds the last move, not the distance left to travel.
        // Each pass shrinks that distance by a constant factor, so the gap is
        // a small multiple of ratio times the shortest edge.
        let ratio = 1e-3;
        let (mut tri, ids) = square(&[Point2::new(0.3, 0.6)]);
        let options = LloydOptions::default()
            .with_max_iterations(1000)
            .with_convergence_ratio(ratio);

        let report = optimize(&mut tri, &options, None).unwrap();
        assert_eq!(report.termination, Termination::Converged);
        assert!(report.passes < 1000);
        assert!(report.max_ratio.unwrap() < ratio);

        let shortest = tri.shortest_incident_edge(ids[4]).unwrap();
        let gap = tri.point(ids[4]).distance(Point2::new(0.5, 0.5));
        assert!(gap <= 3.0 * ratio * shortest, "gap {gap}, shortest {shortest}");
    }

    #[test]
    fn test_zero_iterations_runs_no_pass() {
        let (mut tri, ids) = square(&[Point2::new(0.3, 0.6)]);
        let options = LloydOptions::default().with_max_iterations(0);

        let report = optimize(&mut tri, &options, None).unwrap();
        assert_eq!(report.termination, Termination::IterationLimitReached);
        assert_eq!(report.passes, 0);
        assert_eq!(report.max_ratio, None);
        assert_eq!(tri.point(ids[4]), Point2::new(0.3, 0.6));
    }

    #[test]
    fn test_iteration_cap() {
        let (mut tri, _) = square(&[Point2::new(0.3, 0.6)]);
        let options = LloydOptions::default().with_max_iterations(3);

        let report = optimize(&mut tri, &options, None).unwrap();
        assert_eq!(report.termination, Termination::IterationLimitReached);
        assert_eq!(report.passes, 3);
    }

    #[test]
    fn test_zero_time_limit_times_out_first() {
        let (mut tri, _) = square(&[Point2::new(0.3, 0.6)]);
        let options = LloydOptions::default()
            .with_time_limit(Duration::ZERO)
            .with_max_iterations(0);

        let report = optimize(&mut tri, &options, None).unwrap();
        assert_eq!(report.termination, Termination::TimedOut);
        assert_eq!(report.passes, 0);
    }

    #[test]
    fn test_cancel_before_start() {
        let (mut tri, ids) = square(&[Point2::new(0.3, 0.6)]);
        let token = CancelToken::new();
        token.cancel();

        let report = optimize(&mut tri, &LloydOptions::default(), Some(&token)).unwrap();
        assert_eq!(report.termination, Termination::Cancelled);
        assert_eq!(report.passes, 0);
        assert_eq!(tri.point(ids[4]), Point2::new(0.3, 0.6));
    }

    #[test]
    fn test_iteration_cap_checked_before_cancel() {
        let (mut tri, _) = square(&[]);
        let token = CancelToken::new();
        token.cancel();
        let options = LloydOptions::default().with_max_iterations(0);

        let report = optimize(&mut tri, &options, Some(&token)).unwrap();
        assert_eq!(report.termination, Termination::IterationLimitReached);
    }

    #[test]
    fn test_fixed_point_without_ratio() {
        // No movable vertex: the first pass moves nothing.
        let (mut tri, _) = square(&[]);
        let report = optimize(&mut tri, &LloydOptions::default(), None).unwrap();
        assert_eq!(report.termination, Termination::Converged);
        assert_eq!(report.passes, 1);
        assert_eq!(report.max_ratio, Some(0.0));
    }

    #[test]
    fn test_invalid_options_leave_mesh_untouched() {
        let (mut tri, ids) = square(&[Point2::new(0.3, 0.6)]);
        let options = LloydOptions::default().with_convergence_ratio(2.0);

        let err = optimize(&mut tri, &options, None).unwrap_err();
        assert!(matches!(err, RelaxError::InvalidParameter { .. }));
        assert_eq!(tri.point(ids[4]), Point2::new(0.3, 0.6));
        assert!(LloydOptimizer::new(options).is_err());
    }

    #[test]
    fn test_extra_step_after_convergence_is_small() {
        let interior = [
            Point2::new(0.2, 0.3),
            Point2::new(0.7, 0.8),
            Point2::new(0.6, 0.2),
            Point2::new(0.35, 0.7),
        ];
        let (mut tri, ids) = square(&interior);
        let ratio = 1e-3;
        let options = LloydOptions::default()
            .with_max_iterations(2000)
            .with_convergence_ratio(ratio);

        let report = optimize(&mut tri, &options, None).unwrap();
        assert_eq!(report.termination, Termination::Converged);

        let before: Vec<(Point2<f64>, f64)> = ids[4..]
            .iter()
            .map(|&v| (tri.point(v), tri.shortest_incident_edge(v).unwrap()))
            .collect();
        let step = relax_step(&mut tri, 0.0).unwrap();
        assert!(step.max_ratio < ratio);
        for (&v, &(p, shortest)) in ids[4..].iter().zip(&before) {
            assert!(tri.point(v).distance(p) <= ratio * shortest);
        }
    }

    #[test]
    fn test_frozen_run_converges_without_moving() {
        let (mut tri, ids) = square(&[Point2::new(0.3, 0.6), Point2::new(0.7, 0.4)]);
        let before: Vec<Point2<f64>> = ids.iter().map(|&v| tri.point(v)).collect();
        let options = LloydOptions::default()
            .with_freeze_bound(1.0)
            .with_max_iterations(10);

        let report = optimize(&mut tri, &options, None).unwrap();
        assert_eq!(report.termination, Termination::Converged);
        assert_eq!(report.passes, 1);
        let after: Vec<Point2<f64>> = ids.iter().map(|&v| tri.point(v)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_optimizer_runs_with_options() {
        let (mut tri, _) = square(&[Point2::new(0.3, 0.6)]);
        let options = LloydOptions::default().with_max_iterations(2);
        let optimizer = LloydOptimizer::new(options).unwrap();
        assert_eq!(optimizer.options().max_iterations, Some(2));

        let report = optimizer.run(&mut tri).unwrap();
        assert_eq!(report.passes, 2);
        assert!(tri.validate().is_ok());
    }
}
