//! Adaptive integrator for jjnet contact networks.
//!
//! [`Integrator::run`] advances a [`Network`](jjnet_core::Network) over a
//! time span with an embedded RKF45 stepper, writing the state back and
//! notifying tracers at every output point. Perturbators and tracers are
//! shared handles so callers can inspect them between runs.
//!
//! The stepper is generic over [`OdeSystem`], so it can drive any
//! right-hand side, not only the network equations in [`system`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod coupling;
pub mod integrator;
pub mod metrics;
pub mod solver;
pub mod system;

pub use config::{ConfigError, IntegratorConfig};
pub use coupling::{CircuitCoupling, CouplingTable};
pub use integrator::{
    IntegrationError, Integrator, RunError, SharedPerturbator, SharedTracer,
};
pub use metrics::RunMetrics;
pub use solver::{OdeSystem, Rkf45, SolverStatus};
pub use system::NetworkSystem;
