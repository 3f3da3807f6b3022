//! Tracers attached to an integrator over real runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use jjnet_core::{Circuit, Contact, ContactRef, Network};
use jjnet_engine::Integrator;
use jjnet_test_utils::fixtures::coupled_pair;
use jjnet_test_utils::{event_log, events, Event, RecordingTracer};
use jjnet_trace::{
    AverageFlux, AverageParams, FluxTracer, IndexParams, PhaseDiffParams, PhaseDifference,
    SamplingParams,
};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("jjnet-trace-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Two biased contacts sharing one loop.
fn ring() -> Network {
    let mut net = Network::new();
    for z in [0.5, 1.5] {
        let mut c = Contact::default();
        c.z = z;
        net.add_contact(c);
    }
    let mut loop_ = Circuit::new(1.0);
    loop_.add_contact_ref(ContactRef::new(0, 1.0, 1.0));
    loop_.add_contact_ref(ContactRef::new(1, -1.0, -1.0));
    net.add_circuit(loop_).unwrap();
    net
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn interval_thins_output_rows() {
    let dir = scratch("interval");
    let path = dir.join("avg-flux");
    let mut params = AverageParams::new(path.to_string_lossy());
    params.sampling = SamplingParams {
        interval: 0.5,
        ..Default::default()
    };

    let mut integrator = Integrator::default();
    integrator.add_tracer(Arc::new(Mutex::new(AverageFlux::new(params))));
    let mut net = ring();
    integrator.run(&mut net, 0.0, 1.0, 0.25).unwrap();

    // Due at 0.25 and 0.75 only.
    let text = lines(&path);
    assert_eq!(text[0], "# time\t<flux>");
    assert_eq!(text.len(), 3);
}

#[test]
fn consecutive_runs_append_below_one_header() {
    let dir = scratch("append");
    let path = dir.join("pd");
    let params = PhaseDiffParams {
        file_name: path.to_string_lossy().into_owned(),
        ..Default::default()
    };

    let mut integrator = Integrator::default();
    integrator.add_tracer(Arc::new(Mutex::new(PhaseDifference::new(params))));
    let mut net = ring();
    integrator.run(&mut net, 0.0, 0.3, 0.1).unwrap();
    integrator.run(&mut net, 0.3, 0.6, 0.1).unwrap();

    let text = lines(&path);
    assert_eq!(text.iter().filter(|l| l.starts_with('#')).count(), 1);
    assert_eq!(text[0], "# time\tph0-ph0\tph0-ph1\tph1-ph0\tph1-ph1");
    assert_eq!(text.len(), 7);
    for row in &text[1..] {
        let cols: Vec<&str> = row.split('\t').collect();
        assert_eq!(cols.len(), 5);
        assert_eq!(cols[1].parse::<f64>().unwrap(), 0.0);
        assert_eq!(cols[4].parse::<f64>().unwrap(), 0.0);
    }
}

#[test]
fn flux_files_follow_the_pattern() {
    let dir = scratch("flux");
    let params = IndexParams::new(dir.join("loop-%d.dat").to_string_lossy());

    let mut integrator = Integrator::default();
    integrator.add_tracer(Arc::new(Mutex::new(FluxTracer::new(params))));
    let mut net = ring();
    integrator.run(&mut net, 0.0, 0.5, 0.1).unwrap();

    let text = lines(&dir.join("loop-0.dat"));
    assert_eq!(text[0], "# time\tflux[0]");
    assert_eq!(text.len(), 6);

    // The differently biased contacts drift apart, so the flux moves off zero.
    let last: f64 = text[5].split('\t').nth(1).unwrap().parse().unwrap();
    assert!(last != 0.0);
    assert!((last - net.flux(0).unwrap()).abs() <= 1e-5 * last.abs().max(1.0));
}

#[test]
fn rows_match_what_a_sibling_tracer_saw() {
    let dir = scratch("sibling");
    let path = dir.join("pd");
    let params = PhaseDiffParams {
        file_name: path.to_string_lossy().into_owned(),
        ..Default::default()
    };

    let log = event_log();
    let recorder = Arc::new(Mutex::new(RecordingTracer::new("rec", log.clone())));
    let mut integrator = Integrator::default();
    integrator.add_tracer(Arc::new(Mutex::new(PhaseDifference::new(params))));
    integrator.add_tracer(recorder.clone());
    let mut net = ring();
    integrator.run(&mut net, 0.0, 0.4, 0.1).unwrap();

    let rec = recorder.lock().unwrap();
    let text = lines(&path);
    assert_eq!(text.len(), rec.samples.len() + 1);
    for (row, (time, state)) in text[1..].iter().zip(&rec.samples) {
        let cols: Vec<f64> = row.split('\t').map(|c| c.parse().unwrap()).collect();
        assert!((cols[0] - time).abs() < 1e-9);
        let want = state[0].0 - state[1].0;
        assert!((cols[2] - want).abs() <= 1e-5 * want.abs().max(1e-12));
    }
    assert_eq!(
        events(&log).last(),
        Some(&Event::TracerAfterRun("rec".into()))
    );
}

#[test]
fn unbiased_pair_writes_flat_flux() {
    let dir = scratch("flat");
    let params = IndexParams::new(dir.join("loop-%d.dat").to_string_lossy());

    let mut integrator = Integrator::default();
    integrator.add_tracer(Arc::new(Mutex::new(FluxTracer::new(params))));
    let mut net = coupled_pair();
    integrator.run(&mut net, 0.0, 0.3, 0.1).unwrap();

    let text = lines(&dir.join("loop-0.dat"));
    assert_eq!(text.len(), 4);
    for row in &text[1..] {
        let flux: f64 = row.split('\t').nth(1).unwrap().parse().unwrap();
        assert_eq!(flux, 0.0);
    }
}
