//! The [`Integrator`]: drives a network through a run and calls observers.
//!
//! A run validates its inputs, fires perturbator then tracer `before_run`
//! hooks, advances the state to every output point `start + k·dt` with the
//! adaptive stepper, writes the state back and notifies tracers after each
//! point, then fires tracer then perturbator `after_run` hooks.

use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use jjnet_core::{HookError, Network, Perturbator, Tracer};
use tracing::{debug, trace, warn};

use crate::config::{validate_run, ConfigError, IntegratorConfig};
use crate::coupling::CouplingTable;
use crate::metrics::RunMetrics;
use crate::solver::{OdeSystem, Rkf45, SolverStatus};
use crate::system::{extract_state, store_state, NetworkSystem};

/// Shared handle to a tracer.
pub type SharedTracer = Arc<Mutex<dyn Tracer>>;

/// Shared handle to a perturbator.
pub type SharedPerturbator = Arc<Mutex<dyn Perturbator>>;

/// Relative tolerance on the last output point, as a fraction of `dt`.
const END_SLACK: f64 = 1.0e-9;

// ── Errors ─────────────────────────────────────────────────────────

/// A solver failure during a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntegrationError {
    /// Solver time at which the failure occurred.
    pub time: f64,
    /// What went wrong.
    pub status: SolverStatus,
}

impl fmt::Display for IntegrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "integration failed at t={} with status {}: {}",
            self.time,
            self.status.code(),
            self.status
        )
    }
}

impl Error for IntegrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.status)
    }
}

/// Errors returned by [`Integrator::run`].
#[derive(Debug)]
pub enum RunError {
    /// A precondition failed; no hook ran and the network is untouched.
    InvalidConfiguration(ConfigError),
    /// The solver failed; the network holds the last completed output step.
    Integration(IntegrationError),
    /// An observer hook returned an error.
    Hook {
        /// Name of the failing observer.
        name: String,
        /// The hook's error.
        source: HookError,
    },
    /// An observer's mutex was poisoned by a panic elsewhere.
    ObserverPoisoned {
        /// Name of the observer.
        name: String,
    },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration(e) => write!(f, "invalid configuration: {e}"),
            Self::Integration(e) => write!(f, "{e}"),
            Self::Hook { name, source } => write!(f, "hook '{name}' failed: {source}"),
            Self::ObserverPoisoned { name } => write!(f, "observer '{name}' lock poisoned"),
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfiguration(e) => Some(e),
            Self::Integration(e) => Some(e),
            Self::Hook { source, .. } => Some(source),
            Self::ObserverPoisoned { .. } => None,
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfiguration(e)
    }
}

impl From<IntegrationError> for RunError {
    fn from(e: IntegrationError) -> Self {
        Self::Integration(e)
    }
}

// ── Integrator ─────────────────────────────────────────────────────

/// Runs a [`Network`] forward in time and reports to its observers.
///
/// Cloning copies the configuration only; the clone has no observers.
#[derive(Default)]
pub struct Integrator {
    config: IntegratorConfig,
    tracers: Vec<SharedTracer>,
    perturbators: Vec<SharedPerturbator>,
    last_metrics: RunMetrics,
}

impl Clone for Integrator {
    fn clone(&self) -> Self {
        Self::new(self.config.clone())
    }
}

impl fmt::Debug for Integrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Integrator")
            .field("config", &self.config)
            .field("tracers", &self.tracers.len())
            .field("perturbators", &self.perturbators.len())
            .field("last_metrics", &self.last_metrics)
            .finish()
    }
}

impl Integrator {
    /// An integrator with the given solver settings and no observers.
    pub fn new(config: IntegratorConfig) -> Self {
        Self {
            config,
            tracers: Vec::new(),
            perturbators: Vec::new(),
            last_metrics: RunMetrics::default(),
        }
    }

    /// Solver settings.
    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    /// Mutable solver settings, checked at the start of the next run.
    pub fn config_mut(&mut self) -> &mut IntegratorConfig {
        &mut self.config
    }

    /// Metrics of the most recent run that got past its preconditions,
    /// including one that failed part-way (default before the first run).
    pub fn last_metrics(&self) -> &RunMetrics {
        &self.last_metrics
    }

    /// Append a tracer. Tracers are called in insertion order.
    pub fn add_tracer(&mut self, tracer: SharedTracer) {
        self.tracers.push(tracer);
    }

    /// Remove every tracer.
    pub fn purge_tracers(&mut self) {
        self.tracers.clear();
    }

    /// Number of registered tracers.
    pub fn tracer_count(&self) -> usize {
        self.tracers.len()
    }

    /// Append a perturbator. Perturbators are called in insertion order.
    pub fn add_perturbator(&mut self, perturbator: SharedPerturbator) {
        self.perturbators.push(perturbator);
    }

    /// Remove every perturbator.
    pub fn purge_perturbators(&mut self) {
        self.perturbators.clear();
    }

    /// Number of registered perturbators.
    pub fn perturbator_count(&self) -> usize {
        self.perturbators.len()
    }

    /// Integrate `network` from `start_time` to `end_time`, producing an
    /// output point every `dt`.
    ///
    /// # Errors
    ///
    /// - [`RunError::InvalidConfiguration`] before anything runs if the
    ///   configuration or inputs are invalid.
    /// - [`RunError::Hook`] / [`RunError::ObserverPoisoned`] if an observer
    ///   fails; later hooks are skipped.
    /// - [`RunError::Integration`] if the solver fails; `after_run` hooks
    ///   are skipped and the network keeps the last completed output step.
    pub fn run(
        &mut self,
        network: &mut Network,
        start_time: f64,
        end_time: f64,
        dt: f64,
    ) -> Result<RunMetrics, RunError> {
        self.config.validate()?;
        validate_run(network, start_time, end_time, dt)?;
        if self.config.strict_coupling {
            CouplingTable::build(network, true)?;
        }

        let started = Instant::now();
        let mut metrics = RunMetrics::default();
        debug!(
            contacts = network.contact_count(),
            circuits = network.circuit_count(),
            start_time,
            end_time,
            dt,
            "run started"
        );

        let outcome = self.drive(network, start_time, end_time, dt, &mut metrics);
        metrics.total_us = started.elapsed().as_micros() as u64;
        self.last_metrics = metrics.clone();
        outcome?;

        debug!(
            output_steps = metrics.output_steps,
            accepted = metrics.accepted_steps,
            rejected = metrics.rejected_steps,
            rhs = metrics.rhs_evaluations,
            total_us = metrics.total_us,
            "run finished"
        );
        Ok(metrics)
    }

    /// Hooks and output steps of one validated run. Counters accumulate in
    /// `metrics` up to the point of failure.
    fn drive(
        &self,
        network: &mut Network,
        start_time: f64,
        end_time: f64,
        dt: f64,
        metrics: &mut RunMetrics,
    ) -> Result<(), RunError> {
        for p in &self.perturbators {
            let mut guard = lock_perturbator(p)?;
            guard
                .before_run(network, start_time, end_time, dt)
                .map_err(|source| hook_error(guard.name(), source))?;
        }
        for tr in &self.tracers {
            let mut guard = lock_tracer(tr)?;
            guard
                .before_run(network, start_time, end_time, dt)
                .map_err(|source| hook_error(guard.name(), source))?;
        }

        let mut system = NetworkSystem::new(network, self.config.strict_coupling)?;
        debug!(
            coupled = system.coupling().coupled_contacts(),
            overflow = system.coupling().overflow_count(),
            "coupling table built"
        );
        let mut y = extract_state(network);
        let mut solver = Rkf45::new(system.dimension(), self.config.delta, self.config.relative);
        let mut t = start_time;
        let limit = end_time + dt * END_SLACK;

        let mut k: u64 = 1;
        loop {
            let target = start_time + k as f64 * dt;
            if target > limit {
                break;
            }
            let mut h = self.config.step;
            if let Err(status) =
                solver.evolve(&mut system, &mut t, target, &mut h, &mut y, metrics)
            {
                warn!(time = t, code = status.code(), %status, "integration aborted");
                return Err(IntegrationError { time: t, status }.into());
            }

            store_state(network, &y);
            metrics.output_steps += 1;
            trace!(time = target, output = k, "output step");
            for tr in &self.tracers {
                let mut guard = lock_tracer(tr)?;
                guard
                    .after_iteration(network, target)
                    .map_err(|source| hook_error(guard.name(), source))?;
            }
            k += 1;
        }

        for tr in &self.tracers {
            let mut guard = lock_tracer(tr)?;
            guard
                .after_run(network)
                .map_err(|source| hook_error(guard.name(), source))?;
        }
        for p in &self.perturbators {
            let mut guard = lock_perturbator(p)?;
            guard
                .after_run(network)
                .map_err(|source| hook_error(guard.name(), source))?;
        }
        Ok(())
    }
}

fn hook_error(name: &str, source: HookError) -> RunError {
    RunError::Hook {
        name: name.to_string(),
        source,
    }
}

// The poisoned guard is still readable, so the error can carry the name.
fn lock_tracer(t: &SharedTracer) -> Result<MutexGuard<'_, dyn Tracer + 'static>, RunError> {
    t.lock().map_err(|e| RunError::ObserverPoisoned {
        name: e.into_inner().name().to_string(),
    })
}

fn lock_perturbator(
    p: &SharedPerturbator,
) -> Result<MutexGuard<'_, dyn Perturbator + 'static>, RunError> {
    p.lock().map_err(|e| RunError::ObserverPoisoned {
        name: e.into_inner().name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jjnet_core::Contact;

    #[test]
    fn clone_copies_config_only() {
        let mut a = Integrator::new(IntegratorConfig {
            step: 1e-3,
            ..Default::default()
        });
        a.add_tracer(Arc::new(Mutex::new(NoopTracer)));
        let b = a.clone();
        assert_eq!(b.config().step, 1e-3);
        assert_eq!(b.tracer_count(), 0);
        assert_eq!(a.tracer_count(), 1);
    }

    #[test]
    fn purge_empties_lists() {
        let mut i = Integrator::default();
        i.add_tracer(Arc::new(Mutex::new(NoopTracer)));
        i.purge_tracers();
        assert_eq!(i.tracer_count(), 0);
        assert_eq!(i.perturbator_count(), 0);
    }

    #[test]
    fn invalid_config_is_reported_before_run() {
        let mut i = Integrator::default();
        i.config_mut().delta = 0.0;
        let mut net = Network::new();
        net.add_contact(Contact::default());
        let err = i.run(&mut net, 0.0, 1.0, 0.1).unwrap_err();
        assert!(matches!(
            err,
            RunError::InvalidConfiguration(ConfigError::InvalidTolerance { .. })
        ));
    }

    #[test]
    fn error_display_chains() {
        let e: RunError = IntegrationError {
            time: 0.5,
            status: SolverStatus::NonFinite,
        }
        .into();
        assert!(e.to_string().contains("status 2"));
        assert!(e.source().is_some());
    }

    struct NoopTracer;

    impl Tracer for NoopTracer {
        fn name(&self) -> &str {
            "noop"
        }

        fn before_run(&mut self, _: &Network, _: f64, _: f64, _: f64) -> Result<(), HookError> {
            Ok(())
        }

        fn after_iteration(&mut self, _: &Network, _: f64) -> Result<(), HookError> {
            Ok(())
        }

        fn after_run(&mut self, _: &Network) -> Result<(), HookError> {
            Ok(())
        }
    }
}
