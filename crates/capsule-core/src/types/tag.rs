//! Scratch tags attached to heap objects during move verification
//!
//! `Move` and `IllegalMove` are owned by the verifier for the duration of a
//! single call. On entry to any verification no object carries either value.

use crate::errors::{CapsuleError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag value held in the side table for one object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    /// Untagged. Every fresh object reads as `None`.
    #[default]
    None,
    /// Reachable from the root of an in-flight move.
    Move,
    /// Part of the moved subgraph and still reachable from the sender.
    IllegalMove,
}

impl Tag {
    /// Host encoding of [`Tag::None`].
    pub const RAW_NONE: i64 = 0;
    /// Host encoding of [`Tag::Move`].
    pub const RAW_MOVE: i64 = 1;
    /// Host encoding of [`Tag::IllegalMove`].
    pub const RAW_ILLEGAL_MOVE: i64 = 2;

    /// Encode as the host's 64-bit tag value.
    pub const fn as_raw(self) -> i64 {
        match self {
            Tag::None => Self::RAW_NONE,
            Tag::Move => Self::RAW_MOVE,
            Tag::IllegalMove => Self::RAW_ILLEGAL_MOVE,
        }
    }

    /// Decode a host tag value. Unknown values are rejected.
    pub fn from_raw(raw: i64) -> Result<Self> {
        match raw {
            Self::RAW_NONE => Ok(Tag::None),
            Self::RAW_MOVE => Ok(Tag::Move),
            Self::RAW_ILLEGAL_MOVE => Ok(Tag::IllegalMove),
            other => Err(CapsuleError::invalid(format!("unknown tag value {other}"))),
        }
    }

    /// Returns `true` for the verifier-owned values `Move` and `IllegalMove`.
    pub const fn is_scratch(self) -> bool {
        !matches!(self, Tag::None)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::None => write!(f, "none"),
            Tag::Move => write!(f, "move"),
            Tag::IllegalMove => write!(f, "illegal_move"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_encoding_matches_host_constants() {
        assert_eq!(Tag::None.as_raw(), 0);
        assert_eq!(Tag::Move.as_raw(), 1);
        assert_eq!(Tag::IllegalMove.as_raw(), 2);
        assert_eq!(Tag::from_raw(2), Ok(Tag::IllegalMove));
    }

    #[test]
    fn unknown_raw_value_is_rejected() {
        assert!(matches!(Tag::from_raw(42), Err(CapsuleError::Invalid { .. })));
        assert!(Tag::from_raw(-1).is_err());
    }

    #[test]
    fn default_is_untagged() {
        assert_eq!(Tag::default(), Tag::None);
        assert!(!Tag::None.is_scratch());
        assert!(Tag::Move.is_scratch());
        assert!(Tag::IllegalMove.is_scratch());
    }
}
