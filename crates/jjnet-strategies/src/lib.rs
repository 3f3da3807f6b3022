//! Reference strategies for jjnet simulations.
//!
//! | Family | Types |
//! |--------|-------|
//! | Random sources | [`ConstRng`], [`UniformRng`], [`UniformRangeRng`] |
//! | Populators | [`Grid2d`] |
//! | Perturbators | [`NullPerturbator`], [`StaticPerturbator`] |
//!
//! Uniform sources are seeded deterministically, so a network built and
//! perturbed with the same parameters is identical across runs.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod grid2d;
pub mod perturbator;
pub mod rng;

pub use grid2d::{Grid2d, Grid2dParams};
pub use perturbator::{NullPerturbator, StaticParams, StaticPerturbator};
pub use rng::{ConstRng, UniformRangeRng, UniformRng, DEFAULT_SEED};
