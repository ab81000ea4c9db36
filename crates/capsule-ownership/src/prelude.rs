//! Capsule ownership prelude.
//!
//! Curated re-exports for verifier callers.

pub use crate::agent::OwnershipAgent;
pub use crate::diagnostics::{release_forensics, snapshot, ForensicSnapshot};
pub use crate::verifier::{
    verify_move, IllegalMoveReport, MoveOutcome, MoveReceipt, MoveRequest, MoveVerifier,
    SkipReason, VerifyPhase,
};
pub use capsule_core::{
    CapsuleError, HeapEffects, ObjectId, Result, Tag, TagEffects, VerifierConfig,
};
