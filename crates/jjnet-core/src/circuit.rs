//! Flux loops: [`Circuit`] and its weighted [`ContactRef`] members.

use crate::tag::{Tagged, Tags};

/// A weighted reference from a circuit to one of the network's contacts.
///
/// `weight` scales the contact's phase when summing the loop flux;
/// `gain` scales the loop flux when it is fed back into the contact's
/// equation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactRef {
    /// Contact index in the owning network.
    pub index: usize,
    /// Feedback gain applied to the circuit flux.
    pub gain: f64,
    /// Weight of the contact phase in the flux sum.
    pub weight: f64,
}

impl ContactRef {
    /// Reference contact `index` with the given gain and weight.
    pub fn new(index: usize, gain: f64, weight: f64) -> Self {
        Self {
            index,
            gain,
            weight,
        }
    }
}

/// A closed loop of contacts threaded by magnetic flux.
///
/// `square` starts as the loop's geometric area; populators usually
/// overwrite it with a normalized weight once every loop is known.
/// Member references keep insertion order and may repeat.
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    /// Area or normalization factor applied to the flux sum.
    pub square: f64,
    refs: Vec<ContactRef>,
    tags: Tags,
}

impl Circuit {
    /// An empty loop with the given square.
    pub fn new(square: f64) -> Self {
        Self {
            square,
            refs: Vec::new(),
            tags: Tags::default(),
        }
    }

    /// Append a member reference, returning its position in the loop.
    pub fn add_contact_ref(&mut self, r: ContactRef) -> usize {
        self.refs.push(r);
        self.refs.len() - 1
    }

    /// Member references in insertion order.
    pub fn contact_refs(&self) -> &[ContactRef] {
        &self.refs
    }

    /// Number of member references.
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Whether the loop has no members.
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

impl Tagged for Circuit {
    fn tags(&self) -> &Tags {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut Tags {
        &mut self.tags
    }
}
