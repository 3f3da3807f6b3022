//! File tracers for jjnet simulation runs.
//!
//! Every tracer opens its files in `before_run`, appends one row per
//! sampled output step and closes them in `after_run`. Rows are
//! tab-separated: the time, then values in C-style scientific notation.
//! See [`sink`] for the exact format and [`sampling`] for the schedule.
//!
//! | Tracer | Default file | Columns |
//! |--------|--------------|---------|
//! | [`NullTracer`] | none | none |
//! | [`AverageVoltage`] | `avg-voltage` | mean (and std) of contact voltage |
//! | [`AverageFlux`] | `avg-flux` | mean (and std) of circuit flux |
//! | [`VoltageTracer`] | `voltage.%u` | one contact's voltage |
//! | [`PhaseTracer`] | `phase.%u` | one contact's phase |
//! | [`FluxTracer`] | `flux.%u` | one circuit's flux |
//! | [`PhaseDifference`] | `pd` | phase differences of contact pairs |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod average;
pub mod indexed;
pub mod null;
pub mod phase_diff;
pub mod sampling;
pub mod sink;
pub mod statistics;

pub use average::{AverageFlux, AverageParams, AverageVoltage};
pub use indexed::{FluxTracer, IndexParams, IndexTracer, PhaseTracer, Quantity, VoltageTracer};
pub use null::NullTracer;
pub use phase_diff::{PhaseDiffParams, PhaseDifference};
pub use sampling::{Sampler, SamplingParams};
pub use sink::{RowFormat, TraceSink};
pub use statistics::Statistics;
