//! The contact network as an [`OdeSystem`].
//!
//! State layout: `y[2i]` is the phase and `y[2i + 1]` the voltage of
//! contact `i`. Per contact:
//!
//! ```text
//! dφ/dt = u
//! du/dt = (2π·z + Σ gain_c·flux_c − tau·u − v·sin φ) / beta
//! ```
//!
//! where `flux_c = square_c · Σ weight_j·φ_j` is recomputed from `y` on
//! every evaluation.

use std::f64::consts::TAU;

use jjnet_core::Network;

use crate::config::ConfigError;
use crate::coupling::CouplingTable;
use crate::solver::OdeSystem;

#[derive(Clone, Copy, Debug)]
struct ContactParams {
    beta: f64,
    tau: f64,
    v: f64,
    z: f64,
}

#[derive(Clone, Debug)]
struct Loop {
    square: f64,
    members: Vec<(usize, f64)>,
}

/// Right-hand side for one run, built from a snapshot of the network.
///
/// Contact parameters and circuit membership are copied at construction,
/// so hooks that edit the network mid-run do not affect the equations.
#[derive(Clone, Debug)]
pub struct NetworkSystem {
    params: Vec<ContactParams>,
    loops: Vec<Loop>,
    coupling: CouplingTable,
    flux: Vec<f64>,
}

impl NetworkSystem {
    /// Snapshot `network` and build its coupling table.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Network`] if a circuit names a missing contact, and
    /// [`ConfigError::CouplingOverflow`] under `strict` coupling.
    pub fn new(network: &Network, strict: bool) -> Result<Self, ConfigError> {
        network.validate()?;
        let coupling = CouplingTable::build(network, strict)?;
        let params = network
            .contacts()
            .iter()
            .map(|c| ContactParams {
                beta: c.beta,
                tau: c.tau,
                v: c.v,
                z: c.z,
            })
            .collect();
        let loops: Vec<Loop> = network
            .circuits()
            .iter()
            .map(|c| Loop {
                square: c.square,
                members: c.contact_refs().iter().map(|r| (r.index, r.weight)).collect(),
            })
            .collect();
        let flux = vec![0.0; loops.len()];
        Ok(Self {
            params,
            loops,
            coupling,
            flux,
        })
    }

    /// The coupling table in use.
    pub fn coupling(&self) -> &CouplingTable {
        &self.coupling
    }
}

impl OdeSystem for NetworkSystem {
    fn dimension(&self) -> usize {
        2 * self.params.len()
    }

    fn derivatives(&mut self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        for (flux, l) in self.flux.iter_mut().zip(&self.loops) {
            let sum: f64 = l.members.iter().map(|&(j, w)| w * y[2 * j]).sum();
            *flux = l.square * sum;
        }

        for (i, p) in self.params.iter().enumerate() {
            let phase = y[2 * i];
            let voltage = y[2 * i + 1];
            let feedback: f64 = self
                .coupling
                .couplings(i)
                .iter()
                .map(|c| c.gain * self.flux[c.circuit])
                .sum();
            dydt[2 * i] = voltage;
            dydt[2 * i + 1] =
                (TAU * p.z + feedback - p.tau * voltage - p.v * phase.sin()) / p.beta;
        }
    }
}

/// Interleaved `[phase, voltage]` state vector of `network`.
pub fn extract_state(network: &Network) -> Vec<f64> {
    network
        .contacts()
        .iter()
        .flat_map(|c| [c.phase, c.voltage])
        .collect()
}

/// Write an interleaved state vector back into `network`.
pub fn store_state(network: &mut Network, y: &[f64]) {
    for (c, s) in network.contacts_mut().iter_mut().zip(y.chunks_exact(2)) {
        c.phase = s[0];
        c.voltage = s[1];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jjnet_core::{Circuit, Contact, ContactRef, NetworkError};

    fn system(net: &Network) -> NetworkSystem {
        NetworkSystem::new(net, false).unwrap()
    }

    #[test]
    fn isolated_contact_at_rest_is_fixed_point() {
        let mut net = Network::new();
        net.add_contact(Contact::default());
        let mut sys = system(&net);
        let mut dydt = [1.0, 1.0];
        sys.derivatives(0.0, &[0.0, 0.0], &mut dydt);
        assert_eq!(dydt, [0.0, 0.0]);
    }

    #[test]
    fn single_contact_terms() {
        let mut net = Network::new();
        let mut c = Contact::new(2.0, 0.5, 4.0);
        c.z = 1.0;
        net.add_contact(c);
        let mut sys = system(&net);
        let phase = std::f64::consts::FRAC_PI_2;
        let mut dydt = [0.0; 2];
        sys.derivatives(0.0, &[phase, 3.0], &mut dydt);
        assert_eq!(dydt[0], 3.0);
        let expected = (TAU - 0.5 * 3.0 - 4.0) / 2.0;
        assert!((dydt[1] - expected).abs() < 1e-12);
    }

    #[test]
    fn flux_uses_solver_state_not_network_phase() {
        let mut net = Network::new();
        let mut a = Contact::new(1.0, 0.0, 0.0);
        a.phase = 100.0;
        net.add_contact(a);
        net.add_contact(Contact::new(1.0, 0.0, 0.0));
        let mut loop_ = Circuit::new(2.0);
        loop_.add_contact_ref(ContactRef::new(0, 3.0, 1.0));
        loop_.add_contact_ref(ContactRef::new(1, -1.0, -1.0));
        net.add_circuit(loop_).unwrap();

        let mut sys = system(&net);
        let mut dydt = [0.0; 4];
        // flux = 2 * (1*0.5 - 1*0.25) = 0.5
        sys.derivatives(0.0, &[0.5, 0.0, 0.25, 0.0], &mut dydt);
        assert!((dydt[1] - 3.0 * 0.5).abs() < 1e-12);
        assert!((dydt[3] + 0.5).abs() < 1e-12);
    }

    #[test]
    fn dangling_member_is_rejected() {
        let mut net = Network::new();
        net.add_contact(Contact::default());
        net.add_circuit(Circuit::new(1.0)).unwrap();
        net.circuit_mut(0)
            .unwrap()
            .add_contact_ref(ContactRef::new(4, 1.0, 1.0));

        assert!(matches!(
            NetworkSystem::new(&net, false),
            Err(ConfigError::Network(NetworkError::DanglingContactRef { contact: 4, .. }))
        ));
    }

    #[test]
    fn state_round_trips_through_network() {
        let mut net = Network::new();
        net.add_contact(Contact::default());
        net.add_contact(Contact::default());
        store_state(&mut net, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(net.contact(1).unwrap().phase, 3.0);
        assert_eq!(net.contact(1).unwrap().voltage, 4.0);
        assert_eq!(extract_state(&net), vec![1.0, 2.0, 3.0, 4.0]);
    }
}
