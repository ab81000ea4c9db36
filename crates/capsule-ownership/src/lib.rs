//! # Capsule Ownership - runtime ownership move verification
//!
//! Checks that after a capsule hands the object graph rooted at `root` to
//! another capsule, the sender keeps no reachable path into that graph.
//!
//! - [`tagger`]: marks every object reachable from a root with a tag
//! - [`searcher`]: finds tagged objects reachable from the sender
//! - [`verifier`]: the `Start -> Tagging -> Searching -> Cleaning | Failing -> Done` protocol
//! - [`diagnostics`]: inspection and release of forensic tags
//! - [`agent`]: lifecycle inside a host runtime
//!
//! The verifier takes no locks; see [`verifier`] for the exclusivity
//! precondition callers must uphold.

#![forbid(unsafe_code)]

pub mod agent;
pub mod diagnostics;
pub mod prelude;
pub mod searcher;
pub mod tagger;
pub mod traversal;
pub mod verifier;

pub use agent::OwnershipAgent;
pub use searcher::{Searcher, ViolationRecord};
pub use traversal::{follow_references, TraversalStats};
pub use verifier::{
    verify_move, IllegalMoveReport, MoveOutcome, MoveReceipt, MoveRequest, MoveVerifier,
    SkipReason, VerifyPhase,
};
