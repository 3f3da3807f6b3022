//! Reusable network fixtures.
//!
//! - [`single_contact`]: one isolated contact at rest.
//! - [`coupled_pair`]: two contacts closed into one loop.
//! - [`shared_contact`]: contact 0 sits in `loops` circuits at once.

use jjnet_core::{Circuit, Contact, ContactRef, Network};

/// One default contact, no circuits.
pub fn single_contact() -> Network {
    let mut net = Network::new();
    net.add_contact(Contact::default());
    net
}

/// Two default contacts joined by a unit-square loop with opposite weights.
pub fn coupled_pair() -> Network {
    let mut net = Network::new();
    let a = net.add_contact(Contact::default());
    let b = net.add_contact(Contact::default());
    let mut c = Circuit::new(1.0);
    c.add_contact_ref(ContactRef::new(a, 1.0, 1.0));
    c.add_contact_ref(ContactRef::new(b, -1.0, -1.0));
    net.add_circuit(c).expect("both contacts exist");
    net
}

/// Contact 0 referenced by `loops` circuits, each closed by its own
/// partner contact. Circuit `i` couples contact 0 with gain `i + 1`.
pub fn shared_contact(loops: usize) -> Network {
    let mut net = Network::new();
    for _ in 0..=loops {
        net.add_contact(Contact::new(1.0, 1.0, 0.0));
    }
    for i in 0..loops {
        let mut c = Circuit::new(1.0);
        c.add_contact_ref(ContactRef::new(0, (i + 1) as f64, 1.0));
        c.add_contact_ref(ContactRef::new(i + 1, 1.0, -1.0));
        net.add_circuit(c).expect("partner contacts are added first");
    }
    net
}
