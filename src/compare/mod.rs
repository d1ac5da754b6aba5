//! Structural comparison of members and interface-gap detection.
//!
//! Everything here is a pure function of the models and the resolver passed in: no state,
//! no I/O, no mutation.

mod gaps;
mod signature;

use thiserror::Error;

pub use gaps::{
    comparison_members, comparison_members_at, missing_interface_members,
    missing_interface_members_at, source_missing_interface_members, ContainerGaps, HashedMember,
    SourceGaps,
};
pub use signature::{signature_hash, signature_hash_bound, ComparisonMode};

/// Errors from comparison entry points that take a lookup path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error("no container at lookup path '{0}'")]
    ContainerNotFound(String),
}
