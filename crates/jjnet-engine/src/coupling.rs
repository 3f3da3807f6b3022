//! Per-contact circuit coupling, built once per run.
//!
//! For every contact the table lists the circuits whose flux feeds back into
//! its equation, together with the gain of the contact's reference in that
//! circuit. A contact referenced twice by one circuit gets two entries.

use jjnet_core::Network;
use smallvec::SmallVec;

use crate::config::ConfigError;

/// One circuit feeding a contact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircuitCoupling {
    /// Circuit index in the network.
    pub circuit: usize,
    /// Gain of the contact's reference in that circuit.
    pub gain: f64,
}

/// Inline capacity matches the planar-grid case of two loops per contact.
pub type CouplingList = SmallVec<[CircuitCoupling; 2]>;

/// Contact index → circuits coupled to it.
#[derive(Clone, Debug, Default)]
pub struct CouplingTable {
    entries: Vec<CouplingList>,
    overflow: usize,
}

impl CouplingTable {
    /// Build the table for `network`.
    ///
    /// # Errors
    ///
    /// With `strict` set, [`ConfigError::CouplingOverflow`] for the first
    /// contact coupled to more than two circuits.
    pub fn build(network: &Network, strict: bool) -> Result<Self, ConfigError> {
        let mut entries = vec![CouplingList::new(); network.contact_count()];
        for (circuit, c) in network.circuits().iter().enumerate() {
            for r in c.contact_refs() {
                // validate() runs before this, so indices are in range.
                if let Some(list) = entries.get_mut(r.index) {
                    list.push(CircuitCoupling {
                        circuit,
                        gain: r.gain,
                    });
                }
            }
        }

        let mut overflow = 0;
        for (contact, list) in entries.iter().enumerate() {
            if list.len() > 2 {
                if strict {
                    return Err(ConfigError::CouplingOverflow {
                        contact,
                        circuits: list.len(),
                    });
                }
                overflow += 1;
            }
        }
        Ok(Self { entries, overflow })
    }

    /// Circuits coupled to `contact`; empty for out-of-range indices.
    pub fn couplings(&self, contact: usize) -> &[CircuitCoupling] {
        self.entries
            .get(contact)
            .map(|l| l.as_slice())
            .unwrap_or(&[])
    }

    /// Number of contacts in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table covers no contacts.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Contacts coupled to at least one circuit.
    pub fn coupled_contacts(&self) -> usize {
        self.entries.iter().filter(|l| !l.is_empty()).count()
    }

    /// Contacts coupled to more than two circuits.
    pub fn overflow_count(&self) -> usize {
        self.overflow
    }
}
