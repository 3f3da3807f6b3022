//! Benchmark profiles for the jjnet network simulator.
//!
//! Provides pre-built networks for benchmarks and examples:
//!
//! - [`reference_grid`]: 20x20 jittered grid (760 contacts, 361 cells)
//! - [`stress_grid`]: 60x60 jittered grid (~7K contacts) for stress testing
//! - [`grid_network`]: any size, deterministic via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use jjnet_core::{HookError, Network, Populator, Tagged};
use jjnet_strategies::{Grid2d, Grid2dParams, UniformRng};

/// Positional jitter applied to grid nodes.
pub const JITTER: f64 = 0.1;

/// Normalized bias applied to horizontal contacts.
pub const BIAS: f64 = 0.8;

/// Build a jittered `columns` x `rows` grid with horizontal bias on `x`.
///
/// Node jitter is seeded from `seed`, so equal arguments give equal
/// networks.
pub fn grid_network(columns: usize, rows: usize, seed: u64) -> Result<Network, HookError> {
    let mut params = Grid2dParams::new(columns, rows);
    params.x_rng = Box::new(UniformRng::new(0.0, JITTER).with_seed(seed));
    params.y_rng = Box::new(UniformRng::new(0.0, JITTER).with_seed(seed.wrapping_add(1)));

    let mut network = Network::new();
    Grid2d::new(params).populate(&mut network)?;
    for c in network.contacts_mut() {
        if c.has_tag("x") {
            c.z = BIAS;
        }
    }
    Ok(network)
}

/// Reference profile: 20x20 grid.
pub fn reference_grid(seed: u64) -> Result<Network, HookError> {
    grid_network(20, 20, seed)
}

/// Stress profile: 60x60 grid.
pub fn stress_grid(seed: u64) -> Result<Network, HookError> {
    grid_network(60, 60, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_grid_shape() {
        let net = reference_grid(42).unwrap();
        assert_eq!(net.contact_count(), 2 * 20 * 19);
        assert_eq!(net.circuit_count(), 19 * 19);
        for c in net.contacts() {
            let expected = if c.has_tag("x") { BIAS } else { 0.0 };
            assert_eq!(c.z, expected);
        }
    }

    #[test]
    fn same_seed_same_network() {
        assert_eq!(grid_network(5, 4, 7).unwrap(), grid_network(5, 4, 7).unwrap());
    }
}
