//! Stopping and freezing parameters.

use crate::error::{RelaxError, Result};
use num_traits::Float;
use std::time::Duration;

/// Options for Lloyd relaxation.
///
/// Every limit is optional. With no iteration cap, no time limit and no
/// convergence ratio the optimizer stops only at an exact fixed point (a pass
/// in which nothing moves) or on cancellation, which may never happen.
///
/// # Example
///
/// ```
/// use relaxum::LloydOptions;
/// use std::time::Duration;
///
/// let options = LloydOptions::default()
///     .with_max_iterations(100)
///     .with_time_limit(Duration::from_secs(5))
///     .with_convergence_ratio(0.001_f64)
///     .with_freeze_bound(0.0001);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LloydOptions<F> {
    /// Stop after this many passes. `Some(0)` permits no pass at all.
    pub max_iterations: Option<usize>,

    /// Stop once this much wall-clock time has elapsed.
    pub time_limit: Option<Duration>,

    /// Converged when the largest move of a pass, relative to the moving
    /// vertex's shortest edge, falls below this value. Must be in (0, 1].
    pub convergence_ratio: Option<F>,

    /// Moves smaller than this fraction of the vertex's shortest edge are
    /// skipped. Must be in [0, 1].
    pub freeze_bound: F,
}

impl<F: Float> Default for LloydOptions<F> {
    fn default() -> Self {
        Self {
            max_iterations: None,
            time_limit: None,
            convergence_ratio: None,
            freeze_bound: F::zero(),
        }
    }
}

impl<F: Float> LloydOptions<F> {
    /// Builds options from the convention where `0` disables a limit.
    ///
    /// `time_limit_secs` values that are zero, negative, NaN or too large for
    /// a [`Duration`] also disable the time limit.
    pub fn from_zero_disabled(
        max_iterations: usize,
        time_limit_secs: f64,
        convergence_ratio: F,
        freeze_bound: F,
    ) -> Self {
        let time_limit = if time_limit_secs > 0.0 {
            Duration::try_from_secs_f64(time_limit_secs).ok()
        } else {
            None
        };

        Self {
            max_iterations: (max_iterations > 0).then_some(max_iterations),
            time_limit,
            convergence_ratio: (convergence_ratio != F::zero()).then_some(convergence_ratio),
            freeze_bound,
        }
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Set the wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Set the convergence ratio.
    pub fn with_convergence_ratio(mut self, ratio: F) -> Self {
        self.convergence_ratio = Some(ratio);
        self
    }

    /// Set the freeze bound.
    pub fn with_freeze_bound(mut self, bound: F) -> Self {
        self.freeze_bound = bound;
        self
    }

    /// True when a pass whose largest displacement ratio is `max_ratio` ends
    /// the run: below the convergence ratio, or exactly zero without one.
    pub fn is_converged(&self, max_ratio: F) -> bool {
        match self.convergence_ratio {
            Some(ratio) => max_ratio < ratio,
            None => max_ratio == F::zero(),
        }
    }

    /// Checks that the ratios are finite and in range.
    ///
    /// # Errors
    ///
    /// [`RelaxError::InvalidParameter`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if let Some(ratio) = self.convergence_ratio {
            if !ratio.is_finite() || ratio <= F::zero() || ratio > F::one() {
                return Err(RelaxError::invalid_param(
                    "convergence_ratio",
                    ratio.to_f64().unwrap_or(f64::NAN),
                    "must be in (0, 1]",
                ));
            }
        }

        let bound = self.freeze_bound;
        if !bound.is_finite() || bound < F::zero() || bound > F::one() {
            return Err(RelaxError::invalid_param(
                "freeze_bound",
                bound.to_f64().unwrap_or(f64::NAN),
                "must be in [0, 1]",
            ));
        }

        Ok(())
    }
}
