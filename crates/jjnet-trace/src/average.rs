//! Tracers writing the mean over a selection of elements.

use jjnet_core::{HookError, Network, Tracer};

use crate::sampling::{Sampler, SamplingParams};
use crate::sink::{time_precision, RowFormat, TraceSink};
use crate::statistics::Statistics;

/// Default file of [`AverageVoltage`].
pub const AVG_VOLTAGE_FILE: &str = "avg-voltage";
/// Default file of [`AverageFlux`].
pub const AVG_FLUX_FILE: &str = "avg-flux";

/// Parameters shared by the averaging tracers.
#[derive(Clone, Debug, PartialEq)]
pub struct AverageParams {
    /// Output file. An empty name disables the tracer.
    pub file_name: String,
    /// Element selection; empty selects everything.
    pub tag_expr: String,
    /// Also write the standard deviation column.
    pub with_std: bool,
    /// Sampling schedule.
    pub sampling: SamplingParams,
}

impl AverageParams {
    /// Parameters writing to `file_name`, all elements, mean only.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            tag_expr: String::new(),
            with_std: false,
            sampling: SamplingParams::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Quantity {
    Voltage,
    Flux,
}

impl Quantity {
    fn label(self) -> &'static str {
        match self {
            Self::Voltage => "voltage",
            Self::Flux => "flux",
        }
    }
}

#[derive(Debug)]
struct Averager {
    params: AverageParams,
    quantity: Quantity,
    sampler: Sampler,
    indices: Vec<usize>,
    sink: Option<TraceSink>,
}

impl Averager {
    fn new(params: AverageParams, quantity: Quantity) -> Self {
        Self {
            sampler: Sampler::new(params.sampling),
            params,
            quantity,
            indices: Vec::new(),
            sink: None,
        }
    }

    fn header(&self) -> String {
        let label = self.quantity.label();
        if self.params.with_std {
            format!("# time\t<{label}>\tstd({label})")
        } else {
            format!("# time\t<{label}>")
        }
    }

    fn before_run(&mut self, network: &Network, start_time: f64, dt: f64) -> Result<(), HookError> {
        if let Some(old) = self.sink.take() {
            old.close()?;
        }
        self.indices = match self.quantity {
            Quantity::Voltage => network.build_contact_indices(&self.params.tag_expr)?,
            Quantity::Flux => network.build_circuit_indices(&self.params.tag_expr)?,
        };
        if !self.params.file_name.is_empty() {
            let format = RowFormat {
                time_precision: time_precision(dt),
                precision: self.params.sampling.precision,
            };
            self.sink = Some(TraceSink::open(&self.params.file_name, &self.header(), format)?);
        }
        self.sampler.reset(start_time);
        Ok(())
    }

    fn after_iteration(&mut self, network: &Network, time: f64) -> Result<(), HookError> {
        let Some(sink) = self.sink.as_mut() else {
            return Ok(());
        };
        if !self.sampler.due(time) {
            return Ok(());
        }

        let mut stat = Statistics::new();
        for &i in &self.indices {
            let v = match self.quantity {
                Quantity::Voltage => network.contact(i)?.voltage,
                Quantity::Flux => network.flux(i)?,
            };
            stat.accum(v);
        }
        if self.params.with_std {
            sink.write_row(time, &[stat.mean(), stat.std()])
        } else {
            sink.write_row(time, &[stat.mean()])
        }
    }

    fn after_run(&mut self) -> Result<(), HookError> {
        match self.sink.take() {
            Some(sink) => sink.close(),
            None => Ok(()),
        }
    }
}

macro_rules! average_tracer {
    ($(#[$doc:meta])* $name:ident, $quantity:expr, $file:expr, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug)]
        pub struct $name {
            inner: Averager,
        }

        impl $name {
            /// A tracer with the given parameters.
            pub fn new(params: AverageParams) -> Self {
                Self {
                    inner: Averager::new(params, $quantity),
                }
            }

            /// The tracer's parameters.
            pub fn params(&self) -> &AverageParams {
                &self.inner.params
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new(AverageParams::new($file))
            }
        }

        impl Tracer for $name {
            fn name(&self) -> &str {
                $label
            }

            fn before_run(
                &mut self,
                network: &Network,
                start_time: f64,
                _end_time: f64,
                dt: f64,
            ) -> Result<(), HookError> {
                self.inner.before_run(network, start_time, dt)
            }

            fn after_iteration(&mut self, network: &Network, time: f64) -> Result<(), HookError> {
                self.inner.after_iteration(network, time)
            }

            fn after_run(&mut self, _network: &Network) -> Result<(), HookError> {
                self.inner.after_run()
            }
        }
    };
}

average_tracer!(
    /// Mean voltage of the selected contacts (default file `avg-voltage`).
    AverageVoltage,
    Quantity::Voltage,
    AVG_VOLTAGE_FILE,
    "avg-voltage"
);

average_tracer!(
    /// Mean flux of the selected circuits (default file `avg-flux`).
    AverageFlux,
    Quantity::Flux,
    AVG_FLUX_FILE,
    "avg-flux"
);
