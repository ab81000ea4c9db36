//! Capsule Core - heap graph vocabulary and host interfaces
//!
//! Foundation for runtime ownership-move verification between capsules:
//!
//! - [`ObjectId`], [`Tag`], [`Reference`]: the heap graph as seen by the verifier
//! - [`HeapEffects`]: the host interface (tag side table plus reference enumeration)
//! - [`SideTable`]: default identity-keyed tag store
//! - [`HostEnvironment`]: capability negotiation with the hosting runtime
//! - [`VerifierConfig`]: layered configuration (defaults, TOML, `CAPSULE_*` env)
//! - [`CapsuleError`]: the unified error type
//!
//! The algorithm itself lives in `capsule-ownership`.

#![forbid(unsafe_code)]

pub mod config;
pub mod effects;
pub mod errors;
pub mod types;

pub use config::{AbsentReferencePolicy, ForensicPolicy, VerifierConfig};
pub use effects::{
    HeapEffects, HeapGraphEffects, HostCapabilities, HostEnvironment, HostEvent, SideTable,
    TagEffects,
};
pub use errors::{CapsuleError, Result};
pub use types::{HeapVisit, ObjectId, Reference, ReferenceKind, Tag};
