//! The 2-to-1 compression used for tree nodes.

use std::sync::Arc;

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_ff::Zero;

use crate::poseidon::{poseidon_config, poseidon_hash_two};

/// Hash function over field elements.
///
/// Implementations must be pure: the same inputs always give the same output.
/// Roots and proofs are only comparable between groups using the same hasher.
pub trait MerkleHasher: Clone + Send + Sync {
    /// Hash two child nodes: H(left, right)
    fn hash(&self, left: &Fr, right: &Fr) -> Fr;

    /// Leaf value of an empty or removed slot.
    fn zero(&self) -> Fr {
        Fr::zero()
    }
}

/// Poseidon over BN254 with the crate's default parameters.
#[derive(Clone)]
pub struct PoseidonHasher {
    config: Arc<PoseidonConfig<Fr>>,
}

impl PoseidonHasher {
    pub fn new() -> Self {
        Self::with_config(poseidon_config())
    }

    pub fn with_config(config: PoseidonConfig<Fr>) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for PoseidonHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PoseidonHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoseidonHasher")
            .field("full_rounds", &self.config.full_rounds)
            .field("partial_rounds", &self.config.partial_rounds)
            .finish()
    }
}

impl MerkleHasher for PoseidonHasher {
    fn hash(&self, left: &Fr, right: &Fr) -> Fr {
        poseidon_hash_two(&self.config, left, right)
    }
}

/// Precomputed empty-subtree roots.
///
/// `zeros[0]` is the empty leaf, `zeros[i] = H(zeros[i-1], zeros[i-1])`.
pub(crate) fn compute_zeros<H: MerkleHasher>(hasher: &H, depth: usize) -> Vec<Fr> {
    let mut zeros = Vec::with_capacity(depth + 1);
    zeros.push(hasher.zero());
    extend_zeros(hasher, &mut zeros, depth);
    zeros
}

/// Extend `zeros` so that it covers levels `0..=depth`.
pub(crate) fn extend_zeros<H: MerkleHasher>(hasher: &H, zeros: &mut Vec<Fr>, depth: usize) {
    while zeros.len() <= depth {
        let prev = zeros[zeros.len() - 1];
        zeros.push(hasher.hash(&prev, &prev));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_chain() {
        let hasher = PoseidonHasher::new();
        let zeros = compute_zeros(&hasher, 4);

        assert_eq!(zeros.len(), 5);
        assert!(zeros[0].is_zero());
        for level in 1..zeros.len() {
            assert_eq!(zeros[level], hasher.hash(&zeros[level - 1], &zeros[level - 1]));
        }
    }

    #[test]
    fn test_extend_zeros_matches_fresh() {
        let hasher = PoseidonHasher::new();
        let mut zeros = compute_zeros(&hasher, 2);
        extend_zeros(&hasher, &mut zeros, 6);

        assert_eq!(zeros, compute_zeros(&hasher, 6));
    }

    #[test]
    fn test_hashers_share_parameters() {
        let a = PoseidonHasher::new();
        let b = PoseidonHasher::default();
        let x = Fr::from(3u64);
        let y = Fr::from(4u64);

        assert_eq!(a.hash(&x, &y), b.hash(&x, &y));
    }
}
