//! Move verifier configuration

use super::ENV_PREFIX;
use crate::errors::{CapsuleError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Message reported for a rejected move.
pub const DEFAULT_VIOLATION_MESSAGE: &str = "Detected an illegal ownership move.";

/// What to do with a move request whose sender or root is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsentReferencePolicy {
    /// Return a `Skipped` outcome without touching any tag.
    #[default]
    Skip,
    /// Reject the request as invalid input.
    Reject,
}

impl FromStr for AbsentReferencePolicy {
    type Err = CapsuleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "reject" => Ok(Self::Reject),
            other => Err(CapsuleError::invalid(format!(
                "unknown absent reference policy '{other}'"
            ))),
        }
    }
}

/// Which scratch tags survive a rejected move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForensicPolicy {
    /// Offenders stay `IllegalMove`, the rest of the moved subgraph stays `Move`.
    #[default]
    RetainAll,
    /// Offenders stay `IllegalMove`, every other `Move` tag is reset to `None`.
    OffendersOnly,
}

impl FromStr for ForensicPolicy {
    type Err = CapsuleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain_all" | "retain-all" => Ok(Self::RetainAll),
            "offenders_only" | "offenders-only" => Ok(Self::OffendersOnly),
            other => Err(CapsuleError::invalid(format!(
                "unknown forensic policy '{other}'"
            ))),
        }
    }
}

/// Runtime configuration for the move verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Handling of requests with an absent sender or root.
    pub absent_reference: AbsentReferencePolicy,
    /// Scratch tags left behind after a rejected move.
    pub forensics: ForensicPolicy,
    /// Whether the searcher records every offending object id.
    pub collect_offenders: bool,
    /// Message attached to a reported violation.
    pub violation_message: String,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            absent_reference: AbsentReferencePolicy::default(),
            forensics: ForensicPolicy::default(),
            collect_offenders: true,
            violation_message: DEFAULT_VIOLATION_MESSAGE.to_string(),
        }
    }
}

impl VerifierConfig {
    /// Parse a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CapsuleError::config(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), ?config, "loaded verifier configuration");
        Ok(config)
    }

    /// Apply `CAPSULE_*` overrides from the process environment.
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `CAPSULE_*` overrides from an explicit variable list.
    ///
    /// Unrelated variables are ignored; an unknown `CAPSULE_*` key is an error.
    pub fn merge_with_vars<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            if let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) {
                let name = name.to_ascii_lowercase();
                debug!(key = %name, "applying environment override");
                self.set_from_string(&name, value.as_ref())?;
            }
        }
        self.validate()
    }

    /// Set one configuration value by key.
    pub fn set_from_string(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "absent_reference" => self.absent_reference = value.parse()?,
            "forensics" => self.forensics = value.parse()?,
            "collect_offenders" => {
                self.collect_offenders = value.trim().parse().map_err(|_| {
                    CapsuleError::invalid(format!("collect_offenders expects a bool, got '{value}'"))
                })?;
            }
            "violation_message" => self.violation_message = value.to_string(),
            other => {
                return Err(CapsuleError::invalid(format!(
                    "unknown configuration key '{other}'"
                )))
            }
        }
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.violation_message.trim().is_empty() {
            return Err(CapsuleError::invalid("violation_message must not be empty"));
        }
        Ok(())
    }
}
