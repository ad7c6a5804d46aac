//! Export and import of group state.
//!
//! Two encodings carry the same content (depth, depth policy, growth limit,
//! every slot and the root):
//! - JSON with decimal field elements, for drivers and test vectors
//! - canonical compressed arkworks bytes, for compact storage
//!
//! The root is stored redundantly. Import rebuilds the tree from the slots
//! and rejects the document if the rebuilt root differs.

use ark_bn254::Fr;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{GroupConfig, MAX_DEPTH};
use crate::error::{GroupError, Result};
use crate::field::{decimal, decimal_vec, fr_to_decimal};
use crate::group::Group;
use crate::hasher::{MerkleHasher, PoseidonHasher};
use crate::tree::capacity_at;

/// Serialized form of a group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupExport {
    pub depth: usize,
    #[serde(default)]
    pub fixed_depth: bool,
    /// Growth limit of an auto group
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(with = "decimal")]
    pub root: Fr,
    /// Every slot in index order, removed ones as "0"
    #[serde(with = "decimal_vec")]
    pub members: Vec<Fr>,
}

fn default_max_depth() -> usize {
    MAX_DEPTH
}

impl<H: MerkleHasher> Group<H> {
    pub fn to_export(&self) -> GroupExport {
        GroupExport {
            depth: self.depth(),
            fixed_depth: self.config().is_fixed(),
            max_depth: self.config().max_depth,
            root: self.root(),
            members: self.members().to_vec(),
        }
    }

    /// Serialize the group to JSON.
    pub fn export(&self) -> Result<String> {
        serde_json::to_string(&self.to_export())
            .map_err(|e| GroupError::Serialization(e.to_string()))
    }

    /// Serialize the group to canonical compressed bytes.
    ///
    /// Layout: depth (u32), fixed flag (bool), max depth (u32), slots
    /// (Vec<Fr>), root (Fr).
    pub fn export_bytes(&self) -> Result<Vec<u8>> {
        let depth = u32::try_from(self.depth())
            .map_err(|e| GroupError::Serialization(e.to_string()))?;
        let max_depth = u32::try_from(self.config().max_depth)
            .map_err(|e| GroupError::Serialization(e.to_string()))?;

        let mut bytes = Vec::new();
        let ser = |e: ark_serialize::SerializationError| GroupError::Serialization(e.to_string());
        depth.serialize_compressed(&mut bytes).map_err(ser)?;
        self.config()
            .is_fixed()
            .serialize_compressed(&mut bytes)
            .map_err(ser)?;
        max_depth.serialize_compressed(&mut bytes).map_err(ser)?;
        self.members()
            .to_vec()
            .serialize_compressed(&mut bytes)
            .map_err(ser)?;
        self.root().serialize_compressed(&mut bytes).map_err(ser)?;
        Ok(bytes)
    }

    /// Rebuild a group from an export document, checking it for consistency.
    pub fn from_export(hasher: H, export: GroupExport) -> Result<Self> {
        let GroupExport {
            depth,
            fixed_depth,
            max_depth,
            root,
            members,
        } = export;

        if depth > MAX_DEPTH {
            return Err(GroupError::ImportFormat(format!(
                "depth {} exceeds maximum {}",
                depth, MAX_DEPTH
            )));
        }
        if members.len() as u64 > capacity_at(depth) {
            return Err(GroupError::ImportFormat(format!(
                "{} members do not fit in a tree of depth {}",
                members.len(),
                depth
            )));
        }

        if !fixed_depth && depth > max_depth.min(MAX_DEPTH) {
            return Err(GroupError::ImportFormat(format!(
                "depth {} exceeds the group's max depth {}",
                depth, max_depth
            )));
        }

        let mut config = if fixed_depth {
            GroupConfig::fixed(depth)
        } else {
            GroupConfig::auto(depth)
        };
        config.max_depth = max_depth;
        let group = Group::from_slots(hasher, config, depth, &members);

        if group.root() != root {
            warn!(
                expected = %fr_to_decimal(&root),
                actual = %fr_to_decimal(&group.root()),
                "imported group root mismatch"
            );
            return Err(GroupError::ImportFormat(
                "root does not match members".to_string(),
            ));
        }
        debug!(depth, size = group.size(), "imported group");
        Ok(group)
    }

    /// Import a JSON export using `hasher`.
    pub fn import_with(hasher: H, json: &str) -> Result<Self> {
        let export: GroupExport =
            serde_json::from_str(json).map_err(|e| GroupError::ImportFormat(e.to_string()))?;
        Self::from_export(hasher, export)
    }

    /// Import a byte export using `hasher`.
    pub fn import_bytes_with(hasher: H, bytes: &[u8]) -> Result<Self> {
        let de = |e: ark_serialize::SerializationError| GroupError::ImportFormat(e.to_string());
        let mut reader = bytes;

        let depth = u32::deserialize_compressed(&mut reader).map_err(de)?;
        let fixed_depth = bool::deserialize_compressed(&mut reader).map_err(de)?;
        let max_depth = u32::deserialize_compressed(&mut reader).map_err(de)?;
        let members = Vec::<Fr>::deserialize_compressed(&mut reader).map_err(de)?;
        let root = Fr::deserialize_compressed(&mut reader).map_err(de)?;
        if !reader.is_empty() {
            return Err(GroupError::ImportFormat(format!(
                "{} trailing bytes",
                reader.len()
            )));
        }

        Self::from_export(
            hasher,
            GroupExport {
                depth: depth as usize,
                fixed_depth,
                max_depth: max_depth as usize,
                root,
                members,
            },
        )
    }
}

impl Group<PoseidonHasher> {
    /// Import a JSON export with the default Poseidon hasher.
    pub fn import(json: &str) -> Result<Self> {
        Self::import_with(PoseidonHasher::new(), json)
    }

    /// Import a byte export with the default Poseidon hasher.
    pub fn import_bytes(bytes: &[u8]) -> Result<Self> {
        Self::import_bytes_with(PoseidonHasher::new(), bytes)
    }
}
