//! Sampling schedule shared by the file tracers.

/// When and how precisely a tracer writes samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplingParams {
    /// Minimum time between two samples; 0 samples every output step.
    pub interval: f64,
    /// No sample is written before this time.
    pub start_time: f64,
    /// Mantissa digits of value columns.
    pub precision: usize,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            interval: 0.0,
            start_time: 0.0,
            precision: 6,
        }
    }
}

/// Tracks the next due sample time for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct Sampler {
    params: SamplingParams,
    next_time: f64,
}

impl Sampler {
    /// A sampler that is due immediately.
    pub fn new(params: SamplingParams) -> Self {
        Self {
            params,
            next_time: params.start_time,
        }
    }

    /// The schedule.
    pub fn params(&self) -> &SamplingParams {
        &self.params
    }

    /// Start a new run at `start_time`.
    pub fn reset(&mut self, start_time: f64) {
        self.next_time = start_time;
    }

    /// Whether a sample is due at `time`. A `true` result schedules the
    /// next sample `interval` later.
    pub fn due(&mut self, time: f64) -> bool {
        if self.params.start_time <= time && self.next_time <= time {
            self.next_time = time + self.params.interval;
            true
        } else {
            false
        }
    }
}
