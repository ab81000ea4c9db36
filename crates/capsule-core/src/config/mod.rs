//! Verifier configuration
//!
//! Configuration is layered: defaults, then an optional TOML file, then
//! `CAPSULE_*` environment variables, then validation.

pub mod verifier;

pub use verifier::{AbsentReferencePolicy, ForensicPolicy, VerifierConfig, DEFAULT_VIOLATION_MESSAGE};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "CAPSULE_";
