//! Array-backed incremental Merkle tree.
//!
//! Leaves are appended left to right. Only nodes covering at least one
//! appended leaf are stored; everything to their right is an empty subtree
//! whose value comes from the precomputed zero chain. Point updates rehash a
//! single path, batch appends rehash the coalesced dirty range once per level.

use ark_bn254::Fr;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::hasher::{compute_zeros, extend_zeros, MerkleHasher};

/// Smallest depth `>= current` whose capacity holds `size` leaves.
///
/// Growth is monotone: the result is never below `current`.
pub fn required_depth(current: usize, size: usize) -> usize {
    let mut depth = current;
    while depth < usize::BITS as usize && (1usize << depth) < size {
        depth += 1;
    }
    depth
}

/// Number of leaves a tree of `depth` holds.
pub fn capacity_at(depth: usize) -> u64 {
    if depth >= u64::BITS as usize {
        u64::MAX
    } else {
        1u64 << depth
    }
}

/// Root of `leaves` padded with empty slots to `2^depth`, hashed level by level.
///
/// Reference implementation used to cross-check the incremental tree.
pub fn compute_root<H: MerkleHasher>(hasher: &H, leaves: &[Fr], depth: usize) -> Fr {
    let zeros = compute_zeros(hasher, depth);
    let mut level: Vec<Fr> = leaves.to_vec();

    for zero in zeros.iter().take(depth) {
        if level.is_empty() {
            break;
        }
        level = level
            .chunks(2)
            .map(|pair| hasher.hash(&pair[0], pair.get(1).unwrap_or(zero)))
            .collect();
    }

    level.first().copied().unwrap_or(zeros[depth])
}

#[derive(Clone, Debug)]
pub struct MerkleTree<H: MerkleHasher> {
    hasher: H,

    /// Number of levels from leaf to root
    depth: usize,

    /// Stored nodes per level. Level 0 = leaves, level `depth` = root.
    /// `levels[l].len() == ceil(leaves / 2^l)`.
    levels: Vec<Vec<Fr>>,

    /// zeros[l] = root of an empty subtree of height l
    zeros: Vec<Fr>,
}

impl<H: MerkleHasher> MerkleTree<H> {
    /// Create a new empty tree with the given depth.
    pub fn new(hasher: H, depth: usize) -> Self {
        let zeros = compute_zeros(&hasher, depth);

        Self {
            hasher,
            depth,
            levels: vec![Vec::new(); depth + 1],
            zeros,
        }
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.levels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels[0].is_empty()
    }

    pub fn capacity(&self) -> u64 {
        capacity_at(self.depth)
    }

    pub fn leaves(&self) -> &[Fr] {
        &self.levels[0]
    }

    pub fn leaf(&self, index: usize) -> Option<Fr> {
        self.levels[0].get(index).copied()
    }

    /// The empty-slot leaf value.
    pub fn zero_leaf(&self) -> Fr {
        self.zeros[0]
    }

    pub fn root(&self) -> Fr {
        self.node(self.depth, 0)
    }

    /// Get a node value, falling back to the empty subtree value.
    fn node(&self, level: usize, index: usize) -> Fr {
        self.levels[level]
            .get(index)
            .copied()
            .unwrap_or(self.zeros[level])
    }

    /// H(left child, right child) of node `parent` at `level + 1`.
    fn hash_children(&self, level: usize, parent: usize) -> Fr {
        let left = self.node(level, parent << 1);
        let right = self.node(level, (parent << 1) | 1);
        self.hasher.hash(&left, &right)
    }

    /// Add levels on top of the current root until the tree has `new_depth`.
    ///
    /// The old root becomes the leftmost node of its level; every new ancestor
    /// is H(left, empty subtree).
    pub fn grow(&mut self, new_depth: usize) {
        if new_depth <= self.depth {
            return;
        }
        extend_zeros(&self.hasher, &mut self.zeros, new_depth);

        for level in self.depth..new_depth {
            let parent = if self.levels[level].is_empty() {
                Vec::new()
            } else {
                vec![self.hash_children(level, 0)]
            };
            self.levels.push(parent);
        }
        self.depth = new_depth;
    }

    /// Append a leaf. Caller guarantees `len() < capacity()`.
    pub fn push(&mut self, leaf: Fr) -> usize {
        let index = self.len();
        self.levels[0].push(leaf);
        self.recompute_path(index);
        index
    }

    /// Replace the leaf at `index`. Caller guarantees `index < len()`.
    pub fn set(&mut self, index: usize, leaf: Fr) {
        self.levels[0][index] = leaf;
        self.recompute_path(index);
    }

    /// Append many leaves and rehash each touched node once.
    ///
    /// Produces the same nodes as pushing one leaf at a time.
    pub fn extend(&mut self, leaves: &[Fr]) {
        if leaves.is_empty() {
            return;
        }
        let start = self.len();
        self.levels[0].extend_from_slice(leaves);

        // Dirty range [lo, hi] at the current level
        let mut lo = start;
        let mut hi = self.len() - 1;
        for level in 0..self.depth {
            let first = lo >> 1;
            let last = hi >> 1;
            let hashes = self.hash_range(level, first, last);

            let row = &mut self.levels[level + 1];
            row.truncate(first);
            row.extend(hashes);

            lo = first;
            hi = last;
        }
    }

    #[cfg(feature = "parallel")]
    fn hash_range(&self, level: usize, first: usize, last: usize) -> Vec<Fr> {
        (first..=last)
            .into_par_iter()
            .map(|parent| self.hash_children(level, parent))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn hash_range(&self, level: usize, first: usize, last: usize) -> Vec<Fr> {
        (first..=last)
            .map(|parent| self.hash_children(level, parent))
            .collect()
    }

    /// Recompute hashes from a leaf up to the root.
    fn recompute_path(&mut self, index: usize) -> Fr {
        let mut current_index = index;

        for level in 0..self.depth {
            let parent_index = current_index >> 1;
            let parent_hash = self.hash_children(level, parent_index);

            let row = &mut self.levels[level + 1];
            if parent_index == row.len() {
                row.push(parent_hash);
            } else {
                row[parent_index] = parent_hash;
            }
            current_index = parent_index;
        }

        self.root()
    }

    /// Sibling values leaf-to-root and the side of each path node.
    ///
    /// `true` means the path node is a right child. Caller guarantees
    /// `index < len()`.
    pub fn path(&self, index: usize) -> (Vec<Fr>, Vec<bool>) {
        let mut siblings = Vec::with_capacity(self.depth);
        let mut indices = Vec::with_capacity(self.depth);

        let mut current_index = index;
        for level in 0..self.depth {
            siblings.push(self.node(level, current_index ^ 1));
            indices.push(current_index & 1 == 1);
            current_index >>= 1;
        }

        (siblings, indices)
    }
}
