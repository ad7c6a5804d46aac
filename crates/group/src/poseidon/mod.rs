//! Poseidon hash over the BN254 scalar field.
//!
//! Native only: the group never builds constraints, it just needs the same
//! 2-to-1 compression a membership circuit would use.

mod config;
mod native;

pub use config::{poseidon_config, FULL_ROUNDS, PARTIAL_ROUNDS};
pub use native::poseidon_hash_two;
