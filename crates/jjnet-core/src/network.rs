//! The [`Network`]: append-only storage for contacts and circuits.
//!
//! Indices handed out by [`add_contact`](Network::add_contact) and
//! [`add_circuit`](Network::add_circuit) stay valid for the network's
//! whole lifetime since elements are never removed. `Clone` is a deep
//! copy, so a cloned network can be integrated independently.

use crate::circuit::Circuit;
use crate::contact::Contact;
use crate::error::NetworkError;
use crate::tag::{TagExpr, Tagged};

/// Contacts and the circuits that couple them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Network {
    contacts: Vec<Contact>,
    circuits: Vec<Circuit>,
}

impl Network {
    /// An empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a contact and return its index.
    pub fn add_contact(&mut self, contact: Contact) -> usize {
        self.contacts.push(contact);
        self.contacts.len() - 1
    }

    /// Append a circuit and return its index.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::DanglingContactRef`] if the circuit names a
    /// contact that has not been added yet. The network is unchanged.
    pub fn add_circuit(&mut self, circuit: Circuit) -> Result<usize, NetworkError> {
        let index = self.circuits.len();
        self.check_refs(index, &circuit)?;
        self.circuits.push(circuit);
        Ok(index)
    }

    /// Number of contacts.
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Number of circuits.
    pub fn circuit_count(&self) -> usize {
        self.circuits.len()
    }

    /// Contact at `index`.
    pub fn contact(&self, index: usize) -> Result<&Contact, NetworkError> {
        let len = self.contacts.len();
        self.contacts
            .get(index)
            .ok_or(NetworkError::ContactOutOfRange { index, len })
    }

    /// Mutable contact at `index`.
    pub fn contact_mut(&mut self, index: usize) -> Result<&mut Contact, NetworkError> {
        let len = self.contacts.len();
        self.contacts
            .get_mut(index)
            .ok_or(NetworkError::ContactOutOfRange { index, len })
    }

    /// Circuit at `index`.
    pub fn circuit(&self, index: usize) -> Result<&Circuit, NetworkError> {
        let len = self.circuits.len();
        self.circuits
            .get(index)
            .ok_or(NetworkError::CircuitOutOfRange { index, len })
    }

    /// Mutable circuit at `index`.
    ///
    /// Member references added through this handle are not checked until
    /// [`validate`](Self::validate) runs.
    pub fn circuit_mut(&mut self, index: usize) -> Result<&mut Circuit, NetworkError> {
        let len = self.circuits.len();
        self.circuits
            .get_mut(index)
            .ok_or(NetworkError::CircuitOutOfRange { index, len })
    }

    /// All contacts in index order.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// All contacts, mutably. The slice length is fixed.
    pub fn contacts_mut(&mut self) -> &mut [Contact] {
        &mut self.contacts
    }

    /// All circuits in index order.
    pub fn circuits(&self) -> &[Circuit] {
        &self.circuits
    }

    /// All circuits, mutably. The slice length is fixed.
    pub fn circuits_mut(&mut self) -> &mut [Circuit] {
        &mut self.circuits
    }

    /// Indices of contacts matching `expr`, ascending. An empty expression
    /// selects every contact.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Parse`] if `expr` is malformed.
    pub fn build_contact_indices(&self, expr: &str) -> Result<Vec<usize>, NetworkError> {
        build_indices(expr, &self.contacts)
    }

    /// Indices of circuits matching `expr`, ascending. An empty expression
    /// selects every circuit.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Parse`] if `expr` is malformed.
    pub fn build_circuit_indices(&self, expr: &str) -> Result<Vec<usize>, NetworkError> {
        build_indices(expr, &self.circuits)
    }

    /// Magnetic flux through circuit `index` given the current phases:
    /// `square * Σ weight_i * phase_i`.
    pub fn flux(&self, index: usize) -> Result<f64, NetworkError> {
        let circuit = self.circuit(index)?;
        let mut sum = 0.0;
        for r in circuit.contact_refs() {
            sum += r.weight * self.contact(r.index)?.phase;
        }
        Ok(circuit.square * sum)
    }

    /// Check that every circuit member names an existing contact.
    ///
    /// # Errors
    ///
    /// Returns the first [`NetworkError::DanglingContactRef`] found.
    pub fn validate(&self) -> Result<(), NetworkError> {
        for (i, circuit) in self.circuits.iter().enumerate() {
            self.check_refs(i, circuit)?;
        }
        Ok(())
    }

    fn check_refs(&self, circuit_index: usize, circuit: &Circuit) -> Result<(), NetworkError> {
        let len = self.contacts.len();
        match circuit.contact_refs().iter().find(|r| r.index >= len) {
            Some(r) => Err(NetworkError::DanglingContactRef {
                circuit: circuit_index,
                contact: r.index,
                len,
            }),
            None => Ok(()),
        }
    }
}

fn build_indices<T: Tagged>(expr: &str, items: &[T]) -> Result<Vec<usize>, NetworkError> {
    if expr.is_empty() {
        return Ok((0..items.len()).collect());
    }
    let compiled = TagExpr::parse(expr)?;
    Ok(items
        .iter()
        .enumerate()
        .filter(|(_, item)| compiled.matches(item.tags()))
        .map(|(i, _)| i)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::ContactRef;
    use crate::error::ParseErrorKind;

    fn three_contacts() -> Network {
        let mut net = Network::new();
        for i in 0..3 {
            let mut c = Contact::default();
            c.set_prop("i", i);
            net.add_contact(c);
        }
        net
    }

    #[test]
    fn add_returns_sequential_indices() {
        let mut net = Network::new();
        assert_eq!(net.add_contact(Contact::default()), 0);
        assert_eq!(net.add_contact(Contact::default()), 1);
        assert_eq!(net.add_circuit(Circuit::new(1.0)).unwrap(), 0);
        assert_eq!(net.contact_count(), 2);
        assert_eq!(net.circuit_count(), 1);
    }

    #[test]
    fn empty_expr_selects_all_in_order() {
        let net = three_contacts();
        assert_eq!(net.build_contact_indices("").unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn tag_filter_selects_subset() {
        let mut net = three_contacts();
        net.contact_mut(1).unwrap().add_tag("probe");
        assert_eq!(net.build_contact_indices("probe").unwrap(), vec![1]);
        assert_eq!(net.build_contact_indices("i=2 | probe").unwrap(), vec![1, 2]);
        assert_eq!(net.build_contact_indices("*").unwrap(), vec![1]);
    }

    #[test]
    fn bad_filter_is_parse_error() {
        let net = three_contacts();
        match net.build_contact_indices("probe &") {
            Err(NetworkError::Parse(e)) => assert_eq!(e.kind, ParseErrorKind::UnexpectedEnd),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn circuit_indices_filter() {
        let mut net = three_contacts();
        let mut a = Circuit::new(1.0);
        a.add_tag("cell");
        net.add_circuit(Circuit::new(1.0)).unwrap();
        net.add_circuit(a).unwrap();
        assert_eq!(net.build_circuit_indices("cell").unwrap(), vec![1]);
        assert_eq!(net.build_circuit_indices("").unwrap(), vec![0, 1]);
    }

    #[test]
    fn flux_is_weighted_phase_sum() {
        let mut net = Network::new();
        net.add_contact(Contact::default());
        net.add_contact(Contact::default());
        net.contact_mut(0).unwrap().phase = 3.0;
        net.contact_mut(1).unwrap().phase = 1.0;

        let mut c = Circuit::new(2.0);
        c.add_contact_ref(ContactRef::new(0, 1.0, 1.0));
        c.add_contact_ref(ContactRef::new(1, 1.0, -1.0));
        let idx = net.add_circuit(c).unwrap();

        assert_eq!(net.flux(idx).unwrap(), 4.0);
    }

    #[test]
    fn out_of_range_access() {
        let mut net = three_contacts();
        assert_eq!(
            net.contact(3).unwrap_err(),
            NetworkError::ContactOutOfRange { index: 3, len: 3 }
        );
        assert_eq!(
            net.circuit_mut(0).unwrap_err(),
            NetworkError::CircuitOutOfRange { index: 0, len: 0 }
        );
        assert!(net.flux(0).is_err());
    }

    #[test]
    fn dangling_ref_rejected_on_add() {
        let mut net = three_contacts();
        let mut c = Circuit::new(1.0);
        c.add_contact_ref(ContactRef::new(7, 1.0, 1.0));
        assert_eq!(
            net.add_circuit(c).unwrap_err(),
            NetworkError::DanglingContactRef {
                circuit: 0,
                contact: 7,
                len: 3
            }
        );
        assert_eq!(net.circuit_count(), 0);
    }

    #[test]
    fn validate_catches_late_edits() {
        let mut net = three_contacts();
        net.add_circuit(Circuit::new(1.0)).unwrap();
        assert!(net.validate().is_ok());
        net.circuit_mut(0)
            .unwrap()
            .add_contact_ref(ContactRef::new(9, 1.0, 1.0));
        assert!(matches!(
            net.validate(),
            Err(NetworkError::DanglingContactRef { contact: 9, .. })
        ));
    }

    #[test]
    fn clone_is_independent() {
        let net = three_contacts();
        let mut copy = net.clone();
        copy.contact_mut(0).unwrap().phase = 5.0;
        copy.contact_mut(0).unwrap().add_tag("moved");
        assert_eq!(net.contact(0).unwrap().phase, 0.0);
        assert!(!net.contact(0).unwrap().has_tag("moved"));
    }
}
