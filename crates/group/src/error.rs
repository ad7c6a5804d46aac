//! Errors returned by group operations.

use thiserror::Error;

/// Errors that can occur while mutating, proving or importing a group
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    #[error("Index {index} is not an occupied slot (group size {size})")]
    IndexOutOfRange { index: usize, size: usize },
    #[error("Invalid group export: {0}")]
    ImportFormat(String),
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error("Group capacity exceeded: depth {depth} holds at most {capacity} members")]
    CapacityExceeded { depth: usize, capacity: u64 },
    #[error("Invalid depth {depth}: must be at most {max}")]
    InvalidDepth { depth: usize, max: usize },
    #[error("Member value cannot be zero")]
    ZeroMember,
    #[error("Invalid field element: {0}")]
    InvalidFieldElement(String),
}

pub type Result<T, E = GroupError> = std::result::Result<T, E>;
