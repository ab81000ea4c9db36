//! Move requests and their outcomes

use capsule_core::{CapsuleError, ObjectId, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A claimed transfer of the subgraph rooted at `root` from `sender` to `receiver`.
///
/// Any reference may be absent, mirroring null handles from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Capsule giving up ownership.
    pub sender: Option<ObjectId>,
    /// Capsule taking ownership. Carried for reporting only.
    pub receiver: Option<ObjectId>,
    /// Entry point of the transferred subgraph.
    pub root: Option<ObjectId>,
}

impl MoveRequest {
    /// Create a request with every reference present.
    pub fn new(sender: ObjectId, receiver: ObjectId, root: ObjectId) -> Self {
        Self {
            sender: Some(sender),
            receiver: Some(receiver),
            root: Some(root),
        }
    }

    /// Create a request from possibly absent references.
    pub fn from_parts(
        sender: Option<ObjectId>,
        receiver: Option<ObjectId>,
        root: Option<ObjectId>,
    ) -> Self {
        Self {
            sender,
            receiver,
            root,
        }
    }
}

/// Why a request was skipped without effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The request had no sender.
    AbsentSender,
    /// The request had no root.
    AbsentRoot,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AbsentSender => write!(f, "absent sender"),
            SkipReason::AbsentRoot => write!(f, "absent root"),
        }
    }
}

/// Evidence of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReceipt {
    /// The accepted request.
    pub request: MoveRequest,
    /// Objects in the moved subgraph.
    pub objects_moved: usize,
    /// Objects reachable from the sender that were scanned.
    pub objects_scanned: usize,
}

/// Details of a rejected move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IllegalMoveReport {
    /// The rejected request.
    pub request: MoveRequest,
    /// Objects reachable from both the root and the sender, sorted by id.
    /// Empty when offender collection is disabled.
    pub offenders: Vec<ObjectId>,
    /// Number of offending objects, always counted.
    pub offender_count: usize,
    /// Caller-facing violation message.
    pub message: String,
}

impl IllegalMoveReport {
    /// Serialize the report for diagnostics output.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CapsuleError::internal(format!("failed to encode report: {e}")))
    }
}

/// Result of verifying one move request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The sender retains no path into the moved subgraph; tags were cleared.
    Moved(MoveReceipt),
    /// The sender still reaches part of the moved subgraph.
    IllegalMove(IllegalMoveReport),
    /// The request was malformed and ignored.
    Skipped(SkipReason),
}

impl MoveOutcome {
    /// Returns `true` for an accepted move.
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved(_))
    }

    /// Returns `true` for a rejected move.
    pub fn is_illegal(&self) -> bool {
        matches!(self, Self::IllegalMove(_))
    }

    /// Returns `true` for an ignored request.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// Surface an illegal move as [`CapsuleError::IllegalMove`]; other outcomes pass through.
    pub fn into_result(self) -> Result<Self> {
        match self {
            Self::IllegalMove(report) => Err(CapsuleError::illegal_move(
                report.offenders,
                report.message,
            )),
            other => Ok(other),
        }
    }
}
