//! Physical behavior of integrated networks.

use std::sync::{Arc, Mutex};

use jjnet_core::{Contact, Network};
use jjnet_engine::system::extract_state;
use jjnet_engine::{Integrator, IntegratorConfig, NetworkSystem, OdeSystem};
use jjnet_test_utils::fixtures::{coupled_pair, shared_contact};
use jjnet_test_utils::{event_log, RecordingPerturbator, RecordingTracer};

#[test]
fn subcritical_bias_settles_at_static_phase() {
    let mut net = Network::new();
    let mut c = Contact::default();
    c.z = 1.0;
    net.add_contact(c);

    let mut integrator = Integrator::new(IntegratorConfig {
        step: 1e-3,
        ..Default::default()
    });
    integrator.run(&mut net, 0.0, 30.0, 1.0).unwrap();

    // 2π·z = v·sin φ at rest.
    let expected = (std::f64::consts::TAU / 40.0).asin();
    let c = net.contact(0).unwrap();
    assert!((c.phase - expected).abs() < 1e-3, "phase {}", c.phase);
    assert!(c.voltage.abs() < 1e-3, "voltage {}", c.voltage);
}

#[test]
fn supercritical_bias_keeps_running() {
    let log = event_log();
    let tracer = Arc::new(Mutex::new(RecordingTracer::new("t", log.clone())));
    let mut integrator = Integrator::default();
    integrator.add_tracer(tracer.clone());
    integrator.add_perturbator(Arc::new(Mutex::new(
        RecordingPerturbator::new("bias", log).with_bias(10.0),
    )));

    let mut net = Network::new();
    net.add_contact(Contact::default());
    integrator.run(&mut net, 0.0, 5.0, 0.5).unwrap();

    // 2π·10 exceeds v = 40, so the phase keeps advancing.
    let t = tracer.lock().unwrap();
    let phases: Vec<f64> = t.samples.iter().map(|(_, s)| s[0].0).collect();
    assert!(phases.windows(2).all(|w| w[1] > w[0]));
    assert!(net.contact(0).unwrap().phase > 50.0);
}

#[test]
fn contact_in_three_circuits_gets_every_contribution() {
    let mut net = shared_contact(3);
    for i in 1..=3 {
        net.contact_mut(i).unwrap().phase = 1.0;
    }
    let mut sys = NetworkSystem::new(&net, false).unwrap();
    assert_eq!(sys.coupling().overflow_count(), 1);
    let y = extract_state(&net);
    let mut dydt = vec![0.0; sys.dimension()];
    sys.derivatives(0.0, &y, &mut dydt);

    // flux_i = 1·0 − 1·1 = −1 and gains 1, 2, 3.
    assert!((dydt[1] + 6.0).abs() < 1e-12);
}

#[test]
fn symmetric_pair_stays_symmetric() {
    let mut net = coupled_pair();
    for c in net.contacts_mut() {
        c.z = 0.5;
    }
    Integrator::default().run(&mut net, 0.0, 2.0, 0.5).unwrap();

    // Equal phases give zero loop flux, so both contacts evolve alike.
    let a = net.contact(0).unwrap();
    let b = net.contact(1).unwrap();
    assert!((a.phase - b.phase).abs() < 1e-9);
    assert!((a.voltage - b.voltage).abs() < 1e-9);
}

#[test]
fn cloned_integrators_run_independently() {
    let mut base = Integrator::new(IntegratorConfig {
        step: 1e-4,
        ..Default::default()
    });
    let mut copy = base.clone();

    let mut a = coupled_pair();
    a.contact_mut(0).unwrap().z = 2.0;
    let mut b = a.clone();

    base.run(&mut a, 0.0, 1.0, 0.25).unwrap();
    copy.run(&mut b, 0.0, 1.0, 0.25).unwrap();
    assert_eq!(a, b);
    assert_eq!(base.last_metrics().accepted_steps, copy.last_metrics().accepted_steps);
}
