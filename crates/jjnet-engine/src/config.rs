//! Integrator configuration, run preconditions, and their error type.
//!
//! [`IntegratorConfig`] holds the solver settings that persist across runs.
//! [`validate()`](IntegratorConfig::validate) checks them; per-run inputs
//! (network, time span, output step) are checked by [`validate_run`] before
//! any hook fires or any state is touched.

use std::error::Error;
use std::fmt;

use jjnet_core::{Network, NetworkError};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected before a run starts.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The output step is zero, negative, or not finite.
    NonPositiveDt {
        /// The invalid value.
        dt: f64,
    },
    /// `end_time < start_time`, or either bound is not finite.
    InvalidTimeRange {
        /// Requested start.
        start: f64,
        /// Requested end.
        end: f64,
    },
    /// The network has no contacts, so the ODE system would be empty.
    EmptyNetwork,
    /// The initial step hint is zero, negative, or not finite.
    InvalidStep {
        /// The invalid value.
        step: f64,
    },
    /// An error tolerance is out of range.
    InvalidTolerance {
        /// Description of which tolerance is wrong.
        reason: String,
    },
    /// The network topology is inconsistent.
    Network(NetworkError),
    /// Strict coupling is on and a contact belongs to more than two circuits.
    CouplingOverflow {
        /// The offending contact.
        contact: usize,
        /// How many circuits reference it.
        circuits: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveDt { dt } => {
                write!(f, "dt must be finite and positive, got {dt}")
            }
            Self::InvalidTimeRange { start, end } => {
                write!(f, "invalid time range [{start}, {end}]")
            }
            Self::EmptyNetwork => write!(f, "network has no contacts"),
            Self::InvalidStep { step } => {
                write!(f, "step must be finite and positive, got {step}")
            }
            Self::InvalidTolerance { reason } => write!(f, "invalid tolerance: {reason}"),
            Self::Network(e) => write!(f, "network: {e}"),
            Self::CouplingOverflow { contact, circuits } => write!(
                f,
                "contact {contact} belongs to {circuits} circuits (strict coupling allows 2)"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Network(e) => Some(e),
            _ => None,
        }
    }
}

impl From<NetworkError> for ConfigError {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}

// ── IntegratorConfig ───────────────────────────────────────────────

/// Solver settings for an [`Integrator`](crate::Integrator).
#[derive(Clone, Debug, PartialEq)]
pub struct IntegratorConfig {
    /// Trial step used at the start of every output interval. Default: 1e-6.
    pub step: f64,
    /// Absolute error tolerance per state component. Default: 1e-6.
    pub delta: f64,
    /// Relative error tolerance, scaled by `|y_i|`. Default: 0.0.
    pub relative: f64,
    /// Reject contacts coupled to more than two circuits instead of
    /// coupling them to all of them. Default: false.
    pub strict_coupling: bool,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            step: 1.0e-6,
            delta: 1.0e-6,
            relative: 0.0,
            strict_coupling: false,
        }
    }
}

impl IntegratorConfig {
    /// Check the solver settings.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidStep`] or [`ConfigError::InvalidTolerance`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(ConfigError::InvalidStep { step: self.step });
        }
        if !self.delta.is_finite() || self.delta <= 0.0 {
            return Err(ConfigError::InvalidTolerance {
                reason: format!("delta must be finite and positive, got {}", self.delta),
            });
        }
        if !self.relative.is_finite() || self.relative < 0.0 {
            return Err(ConfigError::InvalidTolerance {
                reason: format!(
                    "relative must be finite and non-negative, got {}",
                    self.relative
                ),
            });
        }
        Ok(())
    }
}

/// Check the inputs of a single run.
///
/// # Errors
///
/// Returns the first violated precondition: bad `dt`, bad time range,
/// empty network, or a dangling circuit member.
pub fn validate_run(
    network: &Network,
    start_time: f64,
    end_time: f64,
    dt: f64,
) -> Result<(), ConfigError> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(ConfigError::NonPositiveDt { dt });
    }
    if !start_time.is_finite() || !end_time.is_finite() || end_time < start_time {
        return Err(ConfigError::InvalidTimeRange {
            start: start_time,
            end: end_time,
        });
    }
    if network.contact_count() == 0 {
        return Err(ConfigError::EmptyNetwork);
    }
    network.validate()?;
    Ok(())
}
