//! Tracers writing one file per selected element.
//!
//! [`IndexTracer`] is generic over the recorded [`Quantity`]; the public
//! aliases [`VoltageTracer`], [`PhaseTracer`] and [`FluxTracer`] cover the
//! three quantities a network exposes.

use std::marker::PhantomData;

use jjnet_core::{HookError, Network, NetworkError, Tracer};

use crate::sampling::{Sampler, SamplingParams};
use crate::sink::{expand_pattern, time_precision, RowFormat, TraceSink};

/// A scalar read per element.
pub trait Quantity {
    /// Tracer name and header label.
    const LABEL: &'static str;
    /// Default file name pattern.
    const PATTERN: &'static str;

    /// Elements matching `expr`; empty selects all.
    fn select(network: &Network, expr: &str) -> Result<Vec<usize>, NetworkError>;

    /// Current value for element `index`.
    fn value(network: &Network, index: usize) -> Result<f64, NetworkError>;
}

/// Contact voltage.
#[derive(Clone, Copy, Debug)]
pub struct Voltage;

impl Quantity for Voltage {
    const LABEL: &'static str = "voltage";
    const PATTERN: &'static str = "voltage.%u";

    fn select(network: &Network, expr: &str) -> Result<Vec<usize>, NetworkError> {
        network.build_contact_indices(expr)
    }

    fn value(network: &Network, index: usize) -> Result<f64, NetworkError> {
        Ok(network.contact(index)?.voltage)
    }
}

/// Contact phase.
#[derive(Clone, Copy, Debug)]
pub struct Phase;

impl Quantity for Phase {
    const LABEL: &'static str = "phase";
    const PATTERN: &'static str = "phase.%u";

    fn select(network: &Network, expr: &str) -> Result<Vec<usize>, NetworkError> {
        network.build_contact_indices(expr)
    }

    fn value(network: &Network, index: usize) -> Result<f64, NetworkError> {
        Ok(network.contact(index)?.phase)
    }
}

/// Circuit flux.
#[derive(Clone, Copy, Debug)]
pub struct Flux;

impl Quantity for Flux {
    const LABEL: &'static str = "flux";
    const PATTERN: &'static str = "flux.%u";

    fn select(network: &Network, expr: &str) -> Result<Vec<usize>, NetworkError> {
        network.build_circuit_indices(expr)
    }

    fn value(network: &Network, index: usize) -> Result<f64, NetworkError> {
        network.flux(index)
    }
}

/// Parameters of an [`IndexTracer`].
#[derive(Clone, Debug, PartialEq)]
pub struct IndexParams {
    /// File name pattern; the first `%u` or `%d` becomes the element index.
    pub pattern: String,
    /// Element selection; empty selects everything.
    pub tag_expr: String,
    /// Sampling schedule.
    pub sampling: SamplingParams,
}

impl IndexParams {
    /// Parameters with the given pattern, all elements, default sampling.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            tag_expr: String::new(),
            sampling: SamplingParams::default(),
        }
    }
}

/// Writes `Q` of each selected element to its own file.
#[derive(Debug)]
pub struct IndexTracer<Q> {
    params: IndexParams,
    sampler: Sampler,
    entries: Vec<(usize, TraceSink)>,
    _quantity: PhantomData<Q>,
}

/// Per-contact voltage files (`voltage.%u`).
pub type VoltageTracer = IndexTracer<Voltage>;
/// Per-contact phase files (`phase.%u`).
pub type PhaseTracer = IndexTracer<Phase>;
/// Per-circuit flux files (`flux.%u`).
pub type FluxTracer = IndexTracer<Flux>;

impl<Q: Quantity> IndexTracer<Q> {
    /// A tracer with the given parameters.
    pub fn new(params: IndexParams) -> Self {
        Self {
            sampler: Sampler::new(params.sampling),
            params,
            entries: Vec::new(),
            _quantity: PhantomData,
        }
    }

    /// The tracer's parameters.
    pub fn params(&self) -> &IndexParams {
        &self.params
    }

    /// Element indices with an open file during a run.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|(i, _)| *i)
    }

    fn close_all(&mut self) -> Result<(), HookError> {
        for (_, sink) in self.entries.drain(..) {
            sink.close()?;
        }
        Ok(())
    }
}

impl<Q: Quantity> Default for IndexTracer<Q> {
    fn default() -> Self {
        Self::new(IndexParams::new(Q::PATTERN))
    }
}

impl<Q: Quantity + Send> Tracer for IndexTracer<Q> {
    fn name(&self) -> &str {
        Q::LABEL
    }

    fn before_run(
        &mut self,
        network: &Network,
        start_time: f64,
        _end_time: f64,
        dt: f64,
    ) -> Result<(), HookError> {
        self.close_all()?;
        let format = RowFormat {
            time_precision: time_precision(dt),
            precision: self.params.sampling.precision,
        };
        for index in Q::select(network, &self.params.tag_expr)? {
            let path = expand_pattern(&self.params.pattern, index);
            let header = format!("# time\t{}[{index}]", Q::LABEL);
            self.entries.push((index, TraceSink::open(path, &header, format)?));
        }
        self.sampler.reset(start_time);
        Ok(())
    }

    fn after_iteration(&mut self, network: &Network, time: f64) -> Result<(), HookError> {
        if self.entries.is_empty() || !self.sampler.due(time) {
            return Ok(());
        }
        for (index, sink) in &mut self.entries {
            sink.write_row(time, &[Q::value(network, *index)?])?;
        }
        Ok(())
    }

    fn after_run(&mut self, _network: &Network) -> Result<(), HookError> {
        self.close_all()
    }
}
