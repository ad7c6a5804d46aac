//! Membership groups for zero-knowledge proofs.
//!
//! A [`Group`] is an ordered list of commitments (BN254 scalars) kept in an
//! incremental binary Merkle tree. This crate provides:
//! - `Group`: add / update / remove members with O(depth) rehashing
//! - `MerkleProof`: sibling paths that replay to the group root
//! - JSON and canonical byte export / import
//! - `PoseidonHasher`: the default node hash, or bring a `MerkleHasher`

pub mod config;
pub mod error;
pub mod export;
pub mod field;
pub mod group;
pub mod hasher;
pub mod poseidon;
pub mod proof;
pub mod tree;

#[cfg(test)]
mod tests;

pub use config::{DepthPolicy, GroupConfig, DEFAULT_DEPTH, MAX_DEPTH};
pub use error::{GroupError, Result};
pub use export::GroupExport;
pub use field::{fr_from_biguint, fr_to_biguint, fr_to_decimal, fr_to_hex, parse_fr};
pub use group::Group;
pub use hasher::{MerkleHasher, PoseidonHasher};
pub use proof::MerkleProof;
