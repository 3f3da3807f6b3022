//! jjnet: a simulator for networks of Josephson junctions.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all jjnet sub-crates. For most users, adding `jjnet` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use jjnet::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! // A 4×4 grid: 24 contacts, 9 cells.
//! let mut network = Network::new();
//! Grid2d::new(Grid2dParams::new(4, 4)).populate(&mut network).unwrap();
//!
//! // Bias the horizontal contacts to an average of 0.5.
//! let bias = StaticParams::new(0.5, Box::new(UniformRng::new(0.0, 0.2))).with_tag_expr("x");
//!
//! let mut integrator = Integrator::new(IntegratorConfig::default());
//! integrator.add_perturbator(Arc::new(Mutex::new(StaticPerturbator::new(bias))));
//! integrator.add_tracer(Arc::new(Mutex::new(NullTracer)));
//!
//! let metrics = integrator.run(&mut network, 0.0, 0.5, 0.1).unwrap();
//! assert_eq!(metrics.output_steps, 5);
//! assert_eq!(network.build_circuit_indices("cell").unwrap().len(), 9);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `jjnet-core` | Network model, tag expressions, errors, strategy traits |
//! | [`engine`] | `jjnet-engine` | Integrator, RKF45 stepper, run metrics |
//! | [`strategies`] | `jjnet-strategies` | Random sources, grid populator, perturbators |
//! | [`trace`] | `jjnet-trace` | File tracers, trace sinks, statistics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Network model, tag queries, and strategy traits (`jjnet-core`).
///
/// Contains [`types::Contact`], [`types::Circuit`], [`types::Network`], the
/// tag expression language ([`types::TagExpr`]) and the traits implemented
/// by populators, perturbators, tracers and random sources.
pub use jjnet_core as types;

/// The integrator (`jjnet-engine`).
///
/// [`engine::Integrator`] runs a network; [`engine::Rkf45`] is the
/// underlying stepper, usable on any [`engine::OdeSystem`].
pub use jjnet_engine as engine;

/// Reference strategies (`jjnet-strategies`).
///
/// Includes [`strategies::Grid2d`], [`strategies::StaticPerturbator`] and
/// the uniform random sources.
pub use jjnet_strategies as strategies;

/// File tracers (`jjnet-trace`).
///
/// Averages, per-element traces and phase differences written through
/// [`trace::TraceSink`].
pub use jjnet_trace as trace;

/// Common imports for typical jjnet usage.
///
/// ```rust
/// use jjnet::prelude::*;
/// ```
pub mod prelude {
    // Network model and traits
    pub use jjnet_core::{
        Circuit, Contact, ContactRef, Network, Perturbator, Populator, RandomSource, TagExpr,
        Tagged, Tracer,
    };

    // Errors
    pub use jjnet_core::{HookError, NetworkError, ParseError};
    pub use jjnet_engine::{ConfigError, IntegrationError, RunError};

    // Engine
    pub use jjnet_engine::{Integrator, IntegratorConfig, RunMetrics};

    // Strategies
    pub use jjnet_strategies::{
        ConstRng, Grid2d, Grid2dParams, NullPerturbator, StaticParams, StaticPerturbator,
        UniformRangeRng, UniformRng,
    };

    // Tracers
    pub use jjnet_trace::{
        AverageFlux, AverageParams, AverageVoltage, FluxTracer, IndexParams, NullTracer,
        PhaseDiffParams, PhaseDifference, PhaseTracer, SamplingParams, VoltageTracer,
    };
}
