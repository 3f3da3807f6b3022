//! Pairwise phase differences between two contact selections.

use jjnet_core::{HookError, Network, Tracer};

use crate::sampling::{Sampler, SamplingParams};
use crate::sink::{time_precision, RowFormat, TraceSink};

/// Default file of [`PhaseDifference`].
pub const PHASE_DIFF_FILE: &str = "pd";

/// Parameters for [`PhaseDifference`].
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseDiffParams {
    /// Output file. An empty name disables the tracer.
    pub file_name: String,
    /// Left-hand selection; empty selects every contact.
    pub first_expr: String,
    /// Right-hand selection; empty selects every contact.
    pub second_expr: String,
    /// Sampling schedule.
    pub sampling: SamplingParams,
}

impl Default for PhaseDiffParams {
    fn default() -> Self {
        Self {
            file_name: PHASE_DIFF_FILE.to_string(),
            first_expr: String::new(),
            second_expr: String::new(),
            sampling: SamplingParams::default(),
        }
    }
}

/// Writes `phase[a] - phase[b]` for every `(a, b)` in the cartesian
/// product of the two selections, one column per pair.
#[derive(Debug)]
pub struct PhaseDifference {
    params: PhaseDiffParams,
    sampler: Sampler,
    pairs: Vec<(usize, usize)>,
    row: Vec<f64>,
    sink: Option<TraceSink>,
}

impl PhaseDifference {
    /// A tracer with the given parameters.
    pub fn new(params: PhaseDiffParams) -> Self {
        Self {
            sampler: Sampler::new(params.sampling),
            params,
            pairs: Vec::new(),
            row: Vec::new(),
            sink: None,
        }
    }

    /// The tracer's parameters.
    pub fn params(&self) -> &PhaseDiffParams {
        &self.params
    }

    /// Column pairs of the current run.
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }
}

impl Default for PhaseDifference {
    fn default() -> Self {
        Self::new(PhaseDiffParams::default())
    }
}

impl Tracer for PhaseDifference {
    fn name(&self) -> &str {
        "phase-difference"
    }

    fn before_run(
        &mut self,
        network: &Network,
        start_time: f64,
        _end_time: f64,
        dt: f64,
    ) -> Result<(), HookError> {
        if let Some(old) = self.sink.take() {
            old.close()?;
        }
        let first = network.build_contact_indices(&self.params.first_expr)?;
        let second = network.build_contact_indices(&self.params.second_expr)?;
        self.pairs = first
            .iter()
            .flat_map(|&a| second.iter().map(move |&b| (a, b)))
            .collect();

        if !self.params.file_name.is_empty() {
            let mut header = String::from("# time");
            for (a, b) in &self.pairs {
                header.push_str(&format!("\tph{a}-ph{b}"));
            }
            let format = RowFormat {
                time_precision: time_precision(dt),
                precision: self.params.sampling.precision,
            };
            self.sink = Some(TraceSink::open(&self.params.file_name, &header, format)?);
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
        self.row.clear();
        for &(a, b) in &self.pairs {
            self.row
                .push(network.contact(a)?.phase - network.contact(b)?.phase);
        }
        sink.write_row(time, &self.row)
    }

    fn after_run(&mut self, _network: &Network) -> Result<(), HookError> {
        match self.sink.take() {
            Some(sink) => sink.close(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jjnet_core::{Contact, Tagged};
    use std::fs;

    #[test]
    fn cartesian_product_columns() {
        let dir = std::env::temp_dir().join(format!("jjnet-pd-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("pd");
        let _ = fs::remove_file(&path);

        let mut net = Network::new();
        for (i, phase) in [1.0, 4.0, 10.0].into_iter().enumerate() {
            let mut c = Contact::default();
            c.phase = phase;
            c.add_tag(if i == 0 { "left" } else { "right" });
            net.add_contact(c);
        }

        let mut t = PhaseDifference::new(PhaseDiffParams {
            file_name: path.to_string_lossy().into_owned(),
            first_expr: "left".into(),
            second_expr: "right".into(),
            sampling: SamplingParams {
                precision: 1,
                ..Default::default()
            },
        });
        t.before_run(&net, 0.0, 1.0, 0.01).unwrap();
        assert_eq!(t.pairs(), &[(0, 1), (0, 2)]);
        t.after_iteration(&net, 0.01).unwrap();
        t.after_run(&net).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "# time\tph0-ph1\tph0-ph2\n0.01\t-3.0e+00\t-9.0e+00\n");
    }

    #[test]
    fn default_file() {
        let t = PhaseDifference::default();
        assert_eq!(t.params().file_name, "pd");
        assert!(t.pairs().is_empty());
    }
}
