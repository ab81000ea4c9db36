//! Unified error type for capsule ownership verification
//!
//! Every fallible operation in the workspace returns [`CapsuleError`]. An
//! illegal move is the only variant a caller is expected to recover from;
//! a traversal failure means neither success nor a specific violation can
//! be claimed.

use crate::types::ObjectId;
use serde::{Deserialize, Serialize};

/// Unified error type for all capsule operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum CapsuleError {
    /// Invalid input or configuration value
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Referenced object or resource does not exist
    #[error("Not found: {message}")]
    NotFound {
        /// Error message describing what was not found
        message: String,
    },

    /// The heap reachability enumeration could not complete
    #[error("Heap traversal failed at {object}: {reason}")]
    TraversalFailed {
        /// Object whose references could not be enumerated
        object: ObjectId,
        /// Host-reported cause
        reason: String,
    },

    /// The sender retains a reachable path into the moved subgraph
    #[error("{message} ({} offending object(s))", .offenders.len())]
    IllegalMove {
        /// Objects reachable from both the moved root and the sender
        offenders: Vec<ObjectId>,
        /// Caller-facing violation message
        message: String,
    },

    /// The host environment lacks a capability the verifier requires
    #[error("Missing host capability: {capability}")]
    MissingCapability {
        /// Name of the absent capability
        capability: String,
    },

    /// The host environment rejected a request
    #[error("Host error: {message}")]
    Host {
        /// Error message reported by the host
        message: String,
    },

    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration problem
        message: String,
    },

    /// Internal invariant violated
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl CapsuleError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a traversal failure for the given object
    pub fn traversal_failed(object: ObjectId, reason: impl Into<String>) -> Self {
        Self::TraversalFailed {
            object,
            reason: reason.into(),
        }
    }

    /// Create an illegal move error
    pub fn illegal_move(offenders: Vec<ObjectId>, message: impl Into<String>) -> Self {
        Self::IllegalMove {
            offenders,
            message: message.into(),
        }
    }

    /// Create a missing capability error
    pub fn missing_capability(capability: impl Into<String>) -> Self {
        Self::MissingCapability {
            capability: capability.into(),
        }
    }

    /// Create a host error
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` for a detected ownership violation.
    pub fn is_illegal_move(&self) -> bool {
        matches!(self, Self::IllegalMove { .. })
    }

    /// Returns `true` when the heap could not be fully enumerated.
    pub fn is_traversal_failure(&self) -> bool {
        matches!(self, Self::TraversalFailed { .. })
    }
}

/// Standard Result type for capsule operations
pub type Result<T> = std::result::Result<T, CapsuleError>;

impl From<std::io::Error> for CapsuleError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            _ => Self::config(err.to_string()),
        }
    }
}

impl From<toml::de::Error> for CapsuleError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}
