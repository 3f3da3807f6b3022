//! Strategy traits for the pluggable parts of a simulation.
//!
//! One trait per family: [`Populator`] builds topology, [`Perturbator`]
//! sets contact bias around a run, [`Tracer`] observes a run, and
//! [`RandomSource`] feeds scalar random values to the other three.
//!
//! All traits are object safe; the integrator stores observers as
//! `Arc<Mutex<dyn Tracer>>` / `Arc<Mutex<dyn Perturbator>>` so callers keep
//! their handles between runs.

use crate::error::HookError;
use crate::network::Network;

/// Fills a network with contacts and circuits.
pub trait Populator: Send {
    /// Human-readable name for error reporting.
    fn name(&self) -> &str;

    /// Append this populator's contacts and circuits to `network`.
    fn populate(&mut self, network: &mut Network) -> Result<(), HookError>;
}

/// Injects bias into contacts before and after a run.
///
/// Every hook defaults to a no-op.
pub trait Perturbator: Send {
    /// Human-readable name for error reporting.
    fn name(&self) -> &str;

    /// Called once before integration starts, ahead of all tracers.
    fn before_run(
        &mut self,
        _network: &mut Network,
        _start_time: f64,
        _end_time: f64,
        _dt: f64,
    ) -> Result<(), HookError> {
        Ok(())
    }

    /// Called once after integration completes, after all tracers.
    fn after_run(&mut self, _network: &mut Network) -> Result<(), HookError> {
        Ok(())
    }

    /// Update the bias of contact `index` for `time`.
    ///
    /// Reserved for time-varying bias; the integrator does not call it.
    fn set_z(&mut self, _network: &mut Network, _index: usize, _time: f64) -> Result<(), HookError> {
        Ok(())
    }
}

/// Read-only observer of a run.
pub trait Tracer: Send {
    /// Human-readable name for error reporting.
    fn name(&self) -> &str;

    /// Called once before integration starts, after all perturbators.
    fn before_run(
        &mut self,
        network: &Network,
        start_time: f64,
        end_time: f64,
        dt: f64,
    ) -> Result<(), HookError>;

    /// Called after each output step with the network at `time`.
    fn after_iteration(&mut self, network: &Network, time: f64) -> Result<(), HookError>;

    /// Called once after the last output step.
    fn after_run(&mut self, network: &Network) -> Result<(), HookError>;
}

/// A scalar random number source.
pub trait RandomSource: Send {
    /// Draw the next value.
    fn generate(&mut self) -> f64;

    /// Reset the generator state from `seed`.
    fn seed(&mut self, seed: u64);

    /// Boxed copy, including the current generator state.
    fn clone_box(&self) -> Box<dyn RandomSource>;
}

impl Clone for Box<dyn RandomSource> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl std::fmt::Debug for dyn RandomSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RandomSource")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::Contact;

    struct Counter(f64);

    impl RandomSource for Counter {
        fn generate(&mut self) -> f64 {
            self.0 += 1.0;
            self.0
        }

        fn seed(&mut self, seed: u64) {
            self.0 = seed as f64;
        }

        fn clone_box(&self) -> Box<dyn RandomSource> {
            Box::new(Counter(self.0))
        }
    }

    struct Noop;

    impl Perturbator for Noop {
        fn name(&self) -> &str {
            "noop"
        }
    }

    #[test]
    fn boxed_source_clone_keeps_state() {
        let mut a: Box<dyn RandomSource> = Box::new(Counter(0.0));
        a.generate();
        let mut b = a.clone();
        assert_eq!(a.generate(), 2.0);
        assert_eq!(b.generate(), 2.0);
        b.seed(10);
        assert_eq!(b.generate(), 11.0);
        assert_eq!(a.generate(), 3.0);
    }

    #[test]
    fn perturbator_hooks_default_to_noop() {
        let mut net = Network::new();
        net.add_contact(Contact::default());
        let before = net.clone();
        let mut p = Noop;
        p.before_run(&mut net, 0.0, 1.0, 0.1).unwrap();
        p.set_z(&mut net, 0, 0.5).unwrap();
        p.after_run(&mut net).unwrap();
        assert_eq!(net, before);
    }
}
