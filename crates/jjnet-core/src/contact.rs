//! The [`Contact`] oscillator node.

use crate::tag::{Tagged, Tags};

/// A single Josephson contact: a damped, driven pendulum-like oscillator.
///
/// `beta`, `tau` and `v` are the static parameters of the contact
/// equation, `z` the injected bias set by perturbators, and `phase` /
/// `voltage` the state advanced by the integrator.
///
/// `beta` must be non-zero for integration (the equation divides by it).
#[derive(Clone, Debug, PartialEq)]
pub struct Contact {
    /// Inertia coefficient.
    pub beta: f64,
    /// Damping coefficient.
    pub tau: f64,
    /// Critical current scale.
    pub v: f64,
    /// Externally injected bias.
    pub z: f64,
    /// Phase difference across the contact (φ).
    pub phase: f64,
    /// Voltage across the contact (dφ/dt).
    pub voltage: f64,
    tags: Tags,
}

impl Contact {
    /// A contact with the given parameters, zero bias and zero state.
    pub fn new(beta: f64, tau: f64, v: f64) -> Self {
        Self {
            beta,
            tau,
            v,
            z: 0.0,
            phase: 0.0,
            voltage: 0.0,
            tags: Tags::default(),
        }
    }
}

impl Default for Contact {
    fn default() -> Self {
        Self::new(1.0, 1.0, 40.0)
    }
}

impl Tagged for Contact {
    fn tags(&self) -> &Tags {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut Tags {
        &mut self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Contact::default();
        assert_eq!(c.beta, 1.0);
        assert_eq!(c.tau, 1.0);
        assert_eq!(c.v, 40.0);
        assert_eq!(c.z, 0.0);
        assert_eq!(c.phase, 0.0);
        assert_eq!(c.voltage, 0.0);
        assert!(c.tags().is_empty());
    }

    #[test]
    fn carries_tags() {
        let mut c = Contact::new(2.0, 0.5, 10.0);
        c.add_tag("edge");
        c.set_prop("row", 4);
        assert!(c.matches("edge & row=4").unwrap());
    }
}
