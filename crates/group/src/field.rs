//! Conversions between BN254 scalars and the integer forms callers hold.
//!
//! Members arrive as big integers (decimal strings in exports, `0x` hex from
//! some drivers). Values at or above the modulus are rejected rather than
//! reduced, so two distinct inputs can never land on the same leaf.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use num_traits::Num;

use crate::error::{GroupError, Result};

/// The BN254 scalar field modulus.
pub fn modulus() -> BigUint {
    Fr::MODULUS.into()
}

/// Convert a big integer into a field element without reducing it.
pub fn fr_from_biguint(value: &BigUint) -> Result<Fr> {
    if *value >= modulus() {
        return Err(GroupError::InvalidFieldElement(format!(
            "{} is not below the field modulus",
            value
        )));
    }
    Ok(Fr::from(value.clone()))
}

pub fn fr_to_biguint(value: &Fr) -> BigUint {
    value.into_bigint().into()
}

/// Parse a decimal or `0x`-prefixed hex string.
pub fn parse_fr(s: &str) -> Result<Fr> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => BigUint::from_str_radix(hex, 16),
        None => BigUint::from_str_radix(s, 10),
    };
    let value = parsed
        .map_err(|e| GroupError::InvalidFieldElement(format!("{:?}: {}", s, e)))?;
    fr_from_biguint(&value)
}

/// Decimal representation, `"0"` for zero.
pub fn fr_to_decimal(value: &Fr) -> String {
    fr_to_biguint(value).to_str_radix(10)
}

/// Big-endian hex of the canonical 32-byte encoding.
pub fn fr_to_hex(value: &Fr) -> String {
    format!("0x{}", hex::encode(value.into_bigint().to_bytes_be()))
}

/// Serde adapter storing a field element as a decimal string.
pub mod decimal {
    use ark_bn254::Fr;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Fr, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::fr_to_decimal(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Fr, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_fr(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for a list of decimal field elements.
pub mod decimal_vec {
    use ark_bn254::Fr;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[Fr], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&super::fr_to_decimal(value))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Fr>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|s| super::parse_fr(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::Zero;
    use num_traits::One;

    #[test]
    fn test_decimal_round_trip() {
        let s = format!("1{}", "0".repeat(29));
        let value = parse_fr(&s).unwrap();
        assert_eq!(fr_to_decimal(&value), s);
    }

    #[test]
    fn test_zero_prints_as_zero() {
        assert_eq!(fr_to_decimal(&Fr::zero()), "0");
    }

    #[test]
    fn test_hex_and_decimal_agree() {
        assert_eq!(parse_fr("0xff").unwrap(), parse_fr("255").unwrap());
        assert_eq!(fr_to_hex(&Fr::from(255u64)), format!("0x{}ff", "00".repeat(31)));
    }

    #[test]
    fn test_modulus_rejected() {
        let m = modulus();
        assert!(matches!(
            fr_from_biguint(&m),
            Err(GroupError::InvalidFieldElement(_))
        ));

        let largest = fr_from_biguint(&(m - BigUint::one())).unwrap();
        assert_eq!(largest, -Fr::from(1u64));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(parse_fr("12a").is_err());
        assert!(parse_fr("").is_err());
        assert!(parse_fr("-5").is_err());
    }
}
