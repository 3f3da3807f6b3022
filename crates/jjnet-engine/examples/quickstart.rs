//! jjnet Quickstart: a complete, minimal simulation from scratch.
//!
//! Demonstrates:
//!   1. Populating a jittered 2-D grid of contacts and cells
//!   2. Applying a static random bias to the horizontal contacts
//!   3. Attaching tracers and integrating
//!   4. Reading run metrics and network state afterwards
//!
//! Run with:
//!   cargo run --example quickstart

use std::error::Error;
use std::sync::{Arc, Mutex};

use jjnet_core::{Network, Populator, Tagged};
use jjnet_engine::{Integrator, IntegratorConfig};
use jjnet_strategies::{ConstRng, Grid2d, Grid2dParams, StaticParams, StaticPerturbator, UniformRng};
use jjnet_trace::{AverageFlux, AverageParams, AverageVoltage};

// ─── Grid parameters ────────────────────────────────────────────

const COLUMNS: usize = 6;
const ROWS: usize = 6;
const JITTER: f64 = 0.1;

// ─── Run parameters ─────────────────────────────────────────────

const START: f64 = 0.0;
const END: f64 = 20.0;
const DT: f64 = 0.1;
const BIAS: f64 = 0.8;

fn main() -> Result<(), Box<dyn Error>> {
    // ─── Topology ───────────────────────────────────────────────

    let mut params = Grid2dParams::new(COLUMNS, ROWS);
    params.x_rng = Box::new(UniformRng::new(0.0, JITTER));
    params.y_rng = Box::new(UniformRng::new(0.0, JITTER).with_seed(1));
    params.v_rng = Box::new(ConstRng::new(40.0));

    let mut network = Network::new();
    Grid2d::new(params).populate(&mut network)?;
    println!(
        "grid {COLUMNS}x{ROWS}: {} contacts, {} cells",
        network.contact_count(),
        network.circuit_count()
    );

    // ─── Observers ──────────────────────────────────────────────

    let bias = StaticParams::new(BIAS, Box::new(UniformRng::new(0.0, 0.4))).with_tag_expr("x");
    let mut voltage = AverageParams::new("avg-voltage");
    voltage.with_std = true;
    voltage.sampling.interval = 1.0;

    let mut integrator = Integrator::new(IntegratorConfig {
        step: 1e-3,
        ..Default::default()
    });
    integrator.add_perturbator(Arc::new(Mutex::new(StaticPerturbator::new(bias))));
    integrator.add_tracer(Arc::new(Mutex::new(AverageVoltage::new(voltage))));
    integrator.add_tracer(Arc::new(Mutex::new(AverageFlux::default())));

    // ─── Integrate ──────────────────────────────────────────────

    let metrics = integrator.run(&mut network, START, END, DT)?;
    println!(
        "{} output steps, {} accepted / {} rejected solver steps, {} us",
        metrics.output_steps, metrics.accepted_steps, metrics.rejected_steps, metrics.total_us
    );

    // ─── Inspect ────────────────────────────────────────────────

    for i in network.build_contact_indices("x & row=0")? {
        let c = network.contact(i)?;
        println!(
            "contact {i} (col {}): z={:.3} phase={:.3} voltage={:.3}",
            c.prop("col").unwrap_or("?"),
            c.z,
            c.phase,
            c.voltage
        );
    }
    Ok(())
}
