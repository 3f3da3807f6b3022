//! Network model, tag queries and strategy traits for jjnet simulations.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! data model integrated by `jjnet-engine`: [`Contact`] oscillators,
//! [`Circuit`] flux loops and the [`Network`] that owns them, the tag
//! expression language used to address elements, the error types, and the
//! strategy traits implemented by populators, perturbators, tracers and
//! random sources.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod circuit;
pub mod contact;
pub mod error;
pub mod network;
pub mod tag;
pub mod traits;

pub use circuit::{Circuit, ContactRef};
pub use contact::Contact;
pub use error::{HookError, NetworkError, ParseError, ParseErrorKind};
pub use network::Network;
pub use tag::{TagExpr, Tagged, Tags};
pub use traits::{Perturbator, Populator, RandomSource, Tracer};
