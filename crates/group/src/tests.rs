//! End-to-end group scenarios.

use ark_bn254::Fr;
use ark_ff::Zero;
use ark_std::rand::rngs::StdRng;
use ark_std::rand::{Rng, SeedableRng};

use crate::tree::compute_root;
use crate::{parse_fr, Group, GroupConfig, GroupError, MerkleHasher, PoseidonHasher};

fn member(prefix: char, zeros: usize) -> Fr {
    parse_fr(&format!("{}{}", prefix, "0".repeat(zeros))).unwrap()
}

/// Simple non-cryptographic hasher, to show the group is hasher-agnostic.
#[derive(Clone, Debug)]
struct AffineHasher;

impl MerkleHasher for AffineHasher {
    fn hash(&self, left: &Fr, right: &Fr) -> Fr {
        *left * Fr::from(3u64) + *right * Fr::from(5u64) + Fr::from(7u64)
    }
}

#[test]
fn test_membership_lifecycle() {
    let a = member('1', 29);
    let b = member('2', 29);
    let c = member('3', 29);
    let d = member('5', 29);

    let mut group = Group::new();
    group.add_members([a, b, c]).unwrap();
    let r1 = group.root();

    assert_eq!(group.index_of(&b), Some(1));
    let proof = group.generate_merkle_proof(1).unwrap();
    assert_eq!(proof.root(), r1);
    assert!(proof.verify(group.hasher()));

    group.remove_member(0).unwrap();
    let r2 = group.root();
    assert_ne!(r2, r1);
    let removed = group.generate_merkle_proof(0).unwrap();
    assert!(removed.leaf().is_zero());
    assert!(group.verify_proof(&removed));

    group.update_member(1, d).unwrap();
    let r3 = group.root();
    assert_ne!(r3, r2);

    let imported = Group::import(&group.export().unwrap()).unwrap();
    assert_eq!(imported.root(), r3);
    assert_eq!(imported.size(), 3);
    assert_eq!(imported.members(), &[Fr::zero(), d, c]);
}

#[test]
fn test_seeded_equals_added() {
    let members = [member('1', 29), member('2', 29), member('3', 29)];

    let seeded = Group::with_members(members).unwrap();
    let mut added = Group::new();
    for m in members {
        added.add_member(m).unwrap();
    }

    assert_eq!(seeded.root(), added.root());
    assert_eq!(seeded.depth(), 2);
}

#[test]
fn test_sequential_operations() {
    let mut group = Group::new();
    group
        .add_members([member('1', 29), member('2', 29), member('3', 29)])
        .unwrap();
    group.add_member(member('4', 29)).unwrap();
    group.update_member(1, member('5', 29)).unwrap();
    group.remove_member(2).unwrap();

    assert_eq!(group.size(), 4);
    assert_eq!(group.depth(), 2);
    assert_eq!(
        group.members(),
        &[member('1', 29), member('5', 29), Fr::zero(), member('4', 29)]
    );
    assert_eq!(group.root(), compute_root(group.hasher(), group.members(), 2));
}

#[test]
fn test_custom_hasher() {
    let mut group =
        Group::with_config_and_members(AffineHasher, GroupConfig::auto(1), (1..=3u64).map(Fr::from))
            .unwrap();
    group.remove_member(0).unwrap();

    assert_eq!(group.root(), compute_root(&AffineHasher, group.members(), group.depth()));
    let proof = group.generate_merkle_proof(2).unwrap();
    assert!(group.verify_proof(&proof));
    assert!(!proof.verify(&PoseidonHasher::new()));

    let imported = Group::import_with(AffineHasher, &group.export().unwrap()).unwrap();
    assert_eq!(imported.root(), group.root());
}

/// Random operation sequences keep the root consistent with the leaves and
/// every slot provable.
#[test]
fn test_random_operations_stay_consistent() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut group = Group::new();
    let mut shadow: Vec<Fr> = Vec::new();

    for _ in 0..200 {
        match rng.gen_range(0..4) {
            0 => {
                let value = Fr::from(rng.gen_range(1..50u64));
                let index = group.add_member(value).unwrap();
                assert_eq!(index, shadow.len());
                shadow.push(value);
            }
            1 => {
                let batch: Vec<Fr> = (0..rng.gen_range(0..5))
                    .map(|_| Fr::from(rng.gen_range(1..50u64)))
                    .collect();
                let range = group.add_members(batch.clone()).unwrap();
                assert_eq!(range, shadow.len()..shadow.len() + batch.len());
                shadow.extend(batch);
            }
            2 if !shadow.is_empty() => {
                let index = rng.gen_range(0..shadow.len());
                let result = group.remove_member(index);
                if shadow[index].is_zero() {
                    assert!(matches!(result, Err(GroupError::IndexOutOfRange { .. })));
                } else {
                    result.unwrap();
                    shadow[index] = Fr::zero();
                }
            }
            3 if !shadow.is_empty() => {
                let index = rng.gen_range(0..shadow.len());
                let value = Fr::from(rng.gen_range(1..50u64));
                let result = group.update_member(index, value);
                if shadow[index].is_zero() {
                    assert!(matches!(result, Err(GroupError::IndexOutOfRange { .. })));
                } else {
                    result.unwrap();
                    shadow[index] = value;
                }
            }
            _ => {}
        }

        assert_eq!(group.members(), shadow.as_slice());
        assert_eq!(
            group.root(),
            compute_root(group.hasher(), &shadow, group.depth())
        );
    }

    for (index, value) in shadow.iter().enumerate() {
        let proof = group.generate_merkle_proof(index).unwrap();
        assert_eq!(proof.leaf(), *value);
        assert!(group.verify_proof(&proof));

        if !value.is_zero() {
            let first = shadow.iter().position(|v| v == value);
            assert_eq!(group.index_of(value), first);
        }
    }
}
