//! Merkle proof of group membership.

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};

use crate::field::{decimal, decimal_vec};
use crate::hasher::MerkleHasher;

/// A Merkle proof for one group slot.
///
/// Contains the sibling hashes from leaf to root and direction indices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    #[serde(with = "decimal")]
    leaf: Fr,

    index: usize,

    /// Sibling hashes from leaf level (0) to root level (depth-1)
    #[serde(with = "decimal_vec")]
    siblings: Vec<Fr>,

    /// Direction at each level: true = current node is right child
    path_indices: Vec<bool>,

    #[serde(with = "decimal")]
    root: Fr,
}

impl MerkleProof {
    pub(crate) fn new(
        leaf: Fr,
        index: usize,
        siblings: Vec<Fr>,
        path_indices: Vec<bool>,
        root: Fr,
    ) -> Self {
        debug_assert_eq!(siblings.len(), path_indices.len());
        Self {
            leaf,
            index,
            siblings,
            path_indices,
            root,
        }
    }

    pub fn leaf(&self) -> Fr {
        self.leaf
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn siblings(&self) -> &[Fr] {
        &self.siblings
    }

    pub fn path_indices(&self) -> &[bool] {
        &self.path_indices
    }

    pub fn root(&self) -> Fr {
        self.root
    }

    /// Number of levels covered by the proof.
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Compute the root hash from the leaf and the sibling path.
    pub fn compute_root<H: MerkleHasher>(&self, hasher: &H) -> Fr {
        let mut current = self.leaf;

        for (sibling, &is_right) in self.siblings.iter().zip(self.path_indices.iter()) {
            current = if is_right {
                // Current is right child: H(sibling, current)
                hasher.hash(sibling, &current)
            } else {
                // Current is left child: H(current, sibling)
                hasher.hash(&current, sibling)
            };
        }

        current
    }

    /// Check the proof is well formed and replays to its root.
    ///
    /// The path bits must spell out `index`, so a proof cannot be relabelled
    /// to claim a different slot.
    pub fn verify<H: MerkleHasher>(&self, hasher: &H) -> bool {
        if self.siblings.len() != self.path_indices.len() {
            return false;
        }
        if !self.index_matches_path() {
            return false;
        }
        self.compute_root(hasher) == self.root
    }

    fn index_matches_path(&self) -> bool {
        let depth = self.path_indices.len();
        if depth < usize::BITS as usize && self.index >> depth != 0 {
            return false;
        }
        self.path_indices
            .iter()
            .enumerate()
            .all(|(level, &is_right)| ((self.index >> level) & 1 == 1) == is_right)
    }
}
