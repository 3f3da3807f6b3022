//! A tracer that records nothing.

use jjnet_core::{HookError, Network, Tracer};

/// Accepts every hook and does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTracer;

impl Tracer for NullTracer {
    fn name(&self) -> &str {
        "null"
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
