//! Test utilities and mock observers for jjnet development.
//!
//! Provides recording implementations of the observer traits
//! ([`Tracer`], [`Perturbator`]) that append to a shared [`EventLog`], plus
//! network fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::{Arc, Mutex};

use jjnet_core::{HookError, Network, Perturbator, Tracer};

/// One observer callback, in the order the integrator made it.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    PerturbatorBeforeRun(String),
    TracerBeforeRun(String),
    AfterIteration(String, f64),
    TracerAfterRun(String),
    PerturbatorAfterRun(String),
}

/// Shared, ordered record of observer callbacks.
pub type EventLog = Arc<Mutex<Vec<Event>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Snapshot of the log contents.
pub fn events(log: &EventLog) -> Vec<Event> {
    log.lock().map(|l| l.clone()).unwrap_or_default()
}

fn push(log: &EventLog, event: Event) {
    if let Ok(mut l) = log.lock() {
        l.push(event);
    }
}

/// Records every callback and the contact phases seen at each iteration.
pub struct RecordingTracer {
    pub name: String,
    log: EventLog,
    /// `(time, [(phase, voltage)])` per `after_iteration`.
    pub samples: Vec<(f64, Vec<(f64, f64)>)>,
}

impl RecordingTracer {
    pub fn new(name: impl Into<String>, log: EventLog) -> Self {
        Self {
            name: name.into(),
            log,
            samples: Vec::new(),
        }
    }

    /// Times passed to `after_iteration`, in order.
    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|(t, _)| *t).collect()
    }
}

impl Tracer for RecordingTracer {
    fn name(&self) -> &str {
        &self.name
    }

    fn before_run(&mut self, _: &Network, _: f64, _: f64, _: f64) -> Result<(), HookError> {
        push(&self.log, Event::TracerBeforeRun(self.name.clone()));
        Ok(())
    }

    fn after_iteration(&mut self, network: &Network, time: f64) -> Result<(), HookError> {
        push(&self.log, Event::AfterIteration(self.name.clone(), time));
        let state = network
            .contacts()
            .iter()
            .map(|c| (c.phase, c.voltage))
            .collect();
        self.samples.push((time, state));
        Ok(())
    }

    fn after_run(&mut self, _: &Network) -> Result<(), HookError> {
        push(&self.log, Event::TracerAfterRun(self.name.clone()));
        Ok(())
    }
}

/// Records callbacks and optionally sets `z` on every contact before a run.
pub struct RecordingPerturbator {
    pub name: String,
    log: EventLog,
    pub bias: Option<f64>,
}

impl RecordingPerturbator {
    pub fn new(name: impl Into<String>, log: EventLog) -> Self {
        Self {
            name: name.into(),
            log,
            bias: None,
        }
    }

    pub fn with_bias(mut self, z: f64) -> Self {
        self.bias = Some(z);
        self
    }
}

impl Perturbator for RecordingPerturbator {
    fn name(&self) -> &str {
        &self.name
    }

    fn before_run(&mut self, network: &mut Network, _: f64, _: f64, _: f64) -> Result<(), HookError> {
        push(&self.log, Event::PerturbatorBeforeRun(self.name.clone()));
        if let Some(z) = self.bias {
            for c in network.contacts_mut() {
                c.z = z;
            }
        }
        Ok(())
    }

    fn after_run(&mut self, _: &mut Network) -> Result<(), HookError> {
        push(&self.log, Event::PerturbatorAfterRun(self.name.clone()));
        Ok(())
    }
}

/// Fails deterministically after a configurable number of iterations.
pub struct FailingTracer {
    pub name: String,
    pub succeed_count: usize,
    calls: usize,
}

impl FailingTracer {
    /// A tracer whose `after_iteration` succeeds `succeed_count` times.
    pub fn new(name: impl Into<String>, succeed_count: usize) -> Self {
        Self {
            name: name.into(),
            succeed_count,
            calls: 0,
        }
    }

    /// How many times `after_iteration` has been called.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl Tracer for FailingTracer {
    fn name(&self) -> &str {
        &self.name
    }

    fn before_run(&mut self, _: &Network, _: f64, _: f64, _: f64) -> Result<(), HookError> {
        self.calls = 0;
        Ok(())
    }

    fn after_iteration(&mut self, _: &Network, _: f64) -> Result<(), HookError> {
        let n = self.calls;
        self.calls += 1;
        if n >= self.succeed_count {
            return Err(HookError::Failed {
                reason: format!(
                    "deliberate failure after {} successful calls",
                    self.succeed_count
                ),
            });
        }
        Ok(())
    }

    fn after_run(&mut self, _: &Network) -> Result<(), HookError> {
        Ok(())
    }
}
