//! Per-run performance metrics for the integrator.
//!
//! [`RunMetrics`] captures solver effort and wall-clock time for a single
//! [`Integrator::run`](crate::Integrator::run) call.

/// Solver and timing metrics collected during a single run.
///
/// The integrator fills these in as the run progresses; the value returned
/// from `run()` and [`last_metrics`](crate::Integrator::last_metrics) is the
/// final tally.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunMetrics {
    /// Output points reached (number of `after_iteration` rounds).
    pub output_steps: u64,
    /// Solver steps whose error estimate was within tolerance.
    pub accepted_steps: u64,
    /// Solver steps thrown away and retried with a smaller step.
    pub rejected_steps: u64,
    /// Right-hand side evaluations, six per attempted step.
    pub rhs_evaluations: u64,
    /// Smallest accepted step chosen by error control, or 0.0 if there was
    /// none. A final sub-step shortened to land on an output time is not
    /// counted.
    pub min_step: f64,
    /// Wall-clock time for the entire run, in microseconds.
    pub total_us: u64,
}

impl RunMetrics {
    /// Record one accepted step of size `h`; `clipped` marks a step cut
    /// short at an output time.
    pub(crate) fn record_accept(&mut self, h: f64, clipped: bool) {
        self.accepted_steps += 1;
        if clipped {
            return;
        }
        if self.min_step == 0.0 || h < self.min_step {
            self.min_step = h;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = RunMetrics::default();
        assert_eq!(m.output_steps, 0);
        assert_eq!(m.accepted_steps, 0);
        assert_eq!(m.rejected_steps, 0);
        assert_eq!(m.rhs_evaluations, 0);
        assert_eq!(m.min_step, 0.0);
        assert_eq!(m.total_us, 0);
    }

    #[test]
    fn min_step_tracks_smallest_accept() {
        let mut m = RunMetrics::default();
        m.record_accept(0.5, false);
        m.record_accept(0.1, false);
        m.record_accept(0.3, false);
        assert_eq!(m.accepted_steps, 3);
        assert_eq!(m.min_step, 0.1);
    }

    #[test]
    fn clipped_steps_count_but_leave_min_step() {
        let mut m = RunMetrics::default();
        m.record_accept(1.0e-9, true);
        assert_eq!(m.accepted_steps, 1);
        assert_eq!(m.min_step, 0.0);
        m.record_accept(0.2, false);
        m.record_accept(1.0e-12, true);
        assert_eq!(m.accepted_steps, 3);
        assert_eq!(m.min_step, 0.2);
    }
}
