//! The membership group: an ordered set of commitments behind a Merkle root.

use std::collections::{BTreeSet, HashMap};
use std::ops::Range;

use ark_bn254::Fr;
use tracing::{debug, trace};

use crate::config::{GroupConfig, MAX_DEPTH};
use crate::error::{GroupError, Result};
use crate::hasher::{MerkleHasher, PoseidonHasher};
use crate::proof::MerkleProof;
use crate::tree::{capacity_at, required_depth, MerkleTree};

/// Incremental Merkle tree over member commitments.
///
/// Slots are assigned in insertion order and never reused. Removing a member
/// zeroes its leaf but keeps the slot, so later indices stay stable and
/// `size()` only ever grows. Zero is reserved for removed slots; adding or
/// updating to zero is rejected.
#[derive(Clone, Debug)]
pub struct Group<H: MerkleHasher = PoseidonHasher> {
    tree: MerkleTree<H>,
    config: GroupConfig,

    /// Member value -> occupied slots holding it
    positions: HashMap<Fr, BTreeSet<usize>>,
}

impl Group<PoseidonHasher> {
    /// Create an empty auto-growing group with the default Poseidon hasher.
    pub fn new() -> Self {
        Self::build(PoseidonHasher::new(), GroupConfig::default())
    }

    /// Create an auto-growing group holding `members` in order.
    pub fn with_members<I>(members: I) -> Result<Self>
    where
        I: IntoIterator<Item = Fr>,
    {
        let mut group = Self::new();
        group.add_members(members)?;
        Ok(group)
    }
}

impl Default for Group<PoseidonHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: MerkleHasher> Group<H> {
    /// Create an empty group with an explicit hasher and depth policy.
    pub fn with_config(hasher: H, config: GroupConfig) -> Result<Self> {
        let initial = config.initial_depth();
        let limit = config.depth_limit().min(MAX_DEPTH);
        if initial > limit {
            return Err(GroupError::InvalidDepth {
                depth: initial,
                max: limit,
            });
        }
        Ok(Self::build(hasher, config))
    }

    pub fn with_config_and_members<I>(hasher: H, config: GroupConfig, members: I) -> Result<Self>
    where
        I: IntoIterator<Item = Fr>,
    {
        let mut group = Self::with_config(hasher, config)?;
        group.add_members(members)?;
        Ok(group)
    }

    fn build(hasher: H, config: GroupConfig) -> Self {
        Self {
            tree: MerkleTree::new(hasher, config.initial_depth()),
            config,
            positions: HashMap::new(),
        }
    }

    /// Rebuild a group from raw slots, removed ones included.
    ///
    /// `depth` must already hold every slot.
    pub(crate) fn from_slots(
        hasher: H,
        config: GroupConfig,
        depth: usize,
        slots: &[Fr],
    ) -> Self {
        let mut tree = MerkleTree::new(hasher, depth);
        tree.extend(slots);

        let mut group = Self {
            tree,
            config,
            positions: HashMap::new(),
        };
        let zero = group.tree.zero_leaf();
        for (index, value) in slots.iter().enumerate() {
            if *value != zero {
                group.positions.entry(*value).or_default().insert(index);
            }
        }
        group
    }

    pub fn root(&self) -> Fr {
        self.tree.root()
    }

    pub fn depth(&self) -> usize {
        self.tree.depth()
    }

    /// Number of slots ever assigned, removed ones included.
    pub fn size(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Number of members the tree holds at its current depth.
    pub fn capacity(&self) -> u64 {
        self.tree.capacity()
    }

    /// All slots in index order; removed slots read as zero.
    pub fn members(&self) -> &[Fr] {
        self.tree.leaves()
    }

    pub fn member(&self, index: usize) -> Option<Fr> {
        self.tree.leaf(index)
    }

    /// Whether `index` is an assigned slot whose member was removed.
    pub fn is_removed(&self, index: usize) -> bool {
        self.tree
            .leaf(index)
            .is_some_and(|leaf| leaf == self.tree.zero_leaf())
    }

    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    pub fn hasher(&self) -> &H {
        self.tree.hasher()
    }

    /// Index of the first occupied slot holding `value`.
    pub fn index_of(&self, value: &Fr) -> Option<usize> {
        self.positions
            .get(value)
            .and_then(|slots| slots.first().copied())
    }

    /// Append a member and return its index.
    pub fn add_member(&mut self, member: Fr) -> Result<usize> {
        self.check_member(&member)?;
        let depth = self.depth_for(self.size() + 1)?;
        self.grow(depth);

        let index = self.tree.push(member);
        self.positions.entry(member).or_default().insert(index);
        trace!(index, "added member");
        Ok(index)
    }

    /// Append members in order and return the range of assigned indices.
    ///
    /// Same result as calling [`Group::add_member`] for each value, but the
    /// tree is grown once and each touched node is hashed once. Nothing is
    /// added if any value is rejected.
    pub fn add_members<I>(&mut self, members: I) -> Result<Range<usize>>
    where
        I: IntoIterator<Item = Fr>,
    {
        let members: Vec<Fr> = members.into_iter().collect();
        for member in &members {
            self.check_member(member)?;
        }
        let start = self.size();
        let end = start + members.len();
        if members.is_empty() {
            return Ok(start..end);
        }

        let depth = self.depth_for(end)?;
        self.grow(depth);

        self.tree.extend(&members);
        for (index, member) in (start..end).zip(members) {
            self.positions.entry(member).or_default().insert(index);
        }
        debug!(start, end, depth = self.depth(), "added members");
        Ok(start..end)
    }

    /// Replace the member at `index`.
    pub fn update_member(&mut self, index: usize, member: Fr) -> Result<()> {
        let old = self.occupied(index)?;
        self.check_member(&member)?;

        self.forget(old, index);
        self.tree.set(index, member);
        self.positions.entry(member).or_default().insert(index);
        trace!(index, "updated member");
        Ok(())
    }

    /// Remove the member at `index`, leaving a zero leaf in its slot.
    pub fn remove_member(&mut self, index: usize) -> Result<()> {
        let old = self.occupied(index)?;

        self.forget(old, index);
        let zero = self.tree.zero_leaf();
        self.tree.set(index, zero);
        trace!(index, "removed member");
        Ok(())
    }

    /// Merkle proof for the slot at `index`.
    ///
    /// Removed slots still have a proof; its leaf is zero.
    pub fn generate_merkle_proof(&self, index: usize) -> Result<MerkleProof> {
        let leaf = self.tree.leaf(index).ok_or(GroupError::IndexOutOfRange {
            index,
            size: self.size(),
        })?;
        let (siblings, path_indices) = self.tree.path(index);

        Ok(MerkleProof::new(
            leaf,
            index,
            siblings,
            path_indices,
            self.root(),
        ))
    }

    /// Check a proof against this group's hasher and current root.
    pub fn verify_proof(&self, proof: &MerkleProof) -> bool {
        proof.root() == self.root() && proof.verify(self.hasher())
    }

    fn check_member(&self, member: &Fr) -> Result<()> {
        if *member == self.tree.zero_leaf() {
            return Err(GroupError::ZeroMember);
        }
        Ok(())
    }

    /// Value at `index` if the slot exists and has not been removed.
    fn occupied(&self, index: usize) -> Result<Fr> {
        match self.tree.leaf(index) {
            Some(leaf) if leaf != self.tree.zero_leaf() => Ok(leaf),
            _ => Err(GroupError::IndexOutOfRange {
                index,
                size: self.size(),
            }),
        }
    }

    /// Depth needed to hold `size` slots under this group's policy.
    fn depth_for(&self, size: usize) -> Result<usize> {
        let current = self.depth();
        let depth = required_depth(current, size);
        let limit = if self.config.is_fixed() {
            current
        } else {
            self.config.depth_limit()
        };

        if depth > limit {
            return Err(GroupError::CapacityExceeded {
                depth: limit,
                capacity: capacity_at(limit),
            });
        }
        Ok(depth)
    }

    fn grow(&mut self, depth: usize) {
        if depth > self.depth() {
            debug!(from = self.depth(), to = depth, "growing group tree");
            self.tree.grow(depth);
        }
    }

    fn forget(&mut self, value: Fr, index: usize) {
        if let Some(slots) = self.positions.get_mut(&value) {
            slots.remove(&index);
            if slots.is_empty() {
                self.positions.remove(&value);
            }
        }
    }
}
