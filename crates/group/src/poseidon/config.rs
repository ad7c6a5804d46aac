//! Poseidon configuration for BN254.

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_ff::{Field, PrimeField};

/// Number of full rounds (beginning + end)
pub const FULL_ROUNDS: usize = 8;

/// Number of partial rounds
pub const PARTIAL_ROUNDS: usize = 57;

/// S-box exponent
const ALPHA: u64 = 5;

/// Elements absorbed per permutation
const RATE: usize = 2;

const CAPACITY: usize = 1;

/// Seed for the round constant chain.
const DOMAIN_TAG: &[u8] = b"membership-group/poseidon/v1";

/// Build the Poseidon configuration used for tree nodes.
///
/// Parameters:
/// - Rate: 2 (one left child and one right child per permutation)
/// - Capacity: 1
/// - Full rounds: 8 (4 at start, 4 at end)
/// - Partial rounds: 57
/// - Alpha: 5 (x^5 S-box)
pub fn poseidon_config() -> PoseidonConfig<Fr> {
    let width = RATE + CAPACITY;

    PoseidonConfig::new(
        FULL_ROUNDS,
        PARTIAL_ROUNDS,
        ALPHA,
        cauchy_mds(width),
        round_constants(width),
        RATE,
        CAPACITY,
    )
}

/// Round constants (ARK) from a squaring chain seeded by [`DOMAIN_TAG`].
fn round_constants(width: usize) -> Vec<Vec<Fr>> {
    let num_rounds = FULL_ROUNDS + PARTIAL_ROUNDS;
    let mut state = Fr::from_le_bytes_mod_order(DOMAIN_TAG);

    (0..num_rounds)
        .map(|_| {
            (0..width)
                .map(|_| {
                    state = state.square() + Fr::from(7u64);
                    state
                })
                .collect()
        })
        .collect()
}

/// Cauchy matrix `m[i][j] = 1 / (x_i + y_j)` with `x_i = i`, `y_j = width + j`.
///
/// All `x_i + y_j` are distinct and non-zero, so every square submatrix is
/// invertible.
fn cauchy_mds(width: usize) -> Vec<Vec<Fr>> {
    (0..width)
        .map(|i| {
            (0..width)
                .map(|j| {
                    Fr::from((i + width + j) as u64)
                        .inverse()
                        .expect("cauchy denominators are non-zero")
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::One;

    #[test]
    fn test_config_valid() {
        let config = poseidon_config();
        assert_eq!(config.full_rounds, FULL_ROUNDS);
        assert_eq!(config.partial_rounds, PARTIAL_ROUNDS);
        assert_eq!(config.rate, 2);
        assert_eq!(config.capacity, 1);
        assert_eq!(config.mds.len(), 3);
        assert_eq!(config.ark.len(), FULL_ROUNDS + PARTIAL_ROUNDS);
        assert!(config.ark.iter().all(|row| row.len() == 3));
    }

    #[test]
    fn test_config_deterministic() {
        let a = poseidon_config();
        let b = poseidon_config();
        assert_eq!(a.ark, b.ark);
        assert_eq!(a.mds, b.mds);
    }

    #[test]
    fn test_mds_entries_are_inverses() {
        let mds = cauchy_mds(3);
        for (i, row) in mds.iter().enumerate() {
            for (j, entry) in row.iter().enumerate() {
                assert_eq!(*entry * Fr::from((i + 3 + j) as u64), Fr::one());
            }
        }
    }
}
