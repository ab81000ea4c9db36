//! Object identifiers
//!
//! An [`ObjectId`] names a node of the host heap graph. Identity is the node
//! itself: two objects with equal contents still have distinct identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of a heap object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Create an identifier from the host's raw object handle.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw handle.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

impl From<u64> for ObjectId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<ObjectId> for u64 {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}
