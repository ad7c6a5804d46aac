//! Native Poseidon hashing.

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::{PoseidonConfig, PoseidonSponge};
use ark_crypto_primitives::sponge::CryptographicSponge;

/// Hash two field elements.
pub fn poseidon_hash_two(config: &PoseidonConfig<Fr>, a: &Fr, b: &Fr) -> Fr {
    let mut sponge = PoseidonSponge::new(config);
    sponge.absorb(a);
    sponge.absorb(b);
    let out: Vec<Fr> = sponge.squeeze_field_elements(1);
    out[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poseidon::poseidon_config;
    use ark_ff::Zero;

    #[test]
    fn test_hash_deterministic() {
        let config = poseidon_config();
        let a = Fr::from(42u64);
        let b = Fr::from(123u64);

        assert_eq!(
            poseidon_hash_two(&config, &a, &b),
            poseidon_hash_two(&config, &a, &b)
        );
    }

    #[test]
    fn test_order_matters() {
        let config = poseidon_config();
        let a = Fr::from(10u64);
        let b = Fr::from(20u64);

        assert_ne!(
            poseidon_hash_two(&config, &a, &b),
            poseidon_hash_two(&config, &b, &a)
        );
    }

    #[test]
    fn test_hash_of_zeros_is_not_zero() {
        let config = poseidon_config();
        let h = poseidon_hash_two(&config, &Fr::zero(), &Fr::zero());
        assert!(!h.is_zero());
    }
}
