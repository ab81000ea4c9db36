//! Host environment effects
//!
//! Capability negotiation and event enablement with the runtime that hosts
//! the verifier. Only the agent lifecycle uses these; the verification
//! algorithm itself needs nothing beyond [`HeapEffects`].

use super::heap::HeapEffects;
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Capabilities a host may grant to the agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCapabilities {
    /// Host can attach tags to arbitrary objects.
    pub can_tag_objects: bool,
    /// Host can enumerate references reachable from an object.
    pub can_follow_references: bool,
    /// Host can emit method entry events.
    pub can_generate_method_entry_events: bool,
    /// Host can emit object allocation events.
    pub can_generate_object_alloc_events: bool,
}

impl HostCapabilities {
    /// The capability set the ownership agent cannot run without.
    pub const fn required() -> Self {
        Self {
            can_tag_objects: true,
            can_follow_references: true,
            can_generate_method_entry_events: true,
            can_generate_object_alloc_events: false,
        }
    }

    /// Every capability granted.
    pub const fn all() -> Self {
        Self {
            can_tag_objects: true,
            can_follow_references: true,
            can_generate_method_entry_events: true,
            can_generate_object_alloc_events: true,
        }
    }

    /// Name of the first capability in `required` that `self` lacks.
    pub fn first_missing(&self, required: &Self) -> Option<&'static str> {
        [
            (required.can_tag_objects, self.can_tag_objects, "can_tag_objects"),
            (
                required.can_follow_references,
                self.can_follow_references,
                "can_follow_references",
            ),
            (
                required.can_generate_method_entry_events,
                self.can_generate_method_entry_events,
                "can_generate_method_entry_events",
            ),
            (
                required.can_generate_object_alloc_events,
                self.can_generate_object_alloc_events,
                "can_generate_object_alloc_events",
            ),
        ]
        .into_iter()
        .find(|(wanted, granted, _)| *wanted && !*granted)
        .map(|(_, _, name)| name)
    }
}

/// Host events the agent subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostEvent {
    /// An object was allocated by the runtime.
    VmObjectAlloc,
    /// A method was entered.
    MethodEntry,
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostEvent::VmObjectAlloc => write!(f, "vm_object_alloc"),
            HostEvent::MethodEntry => write!(f, "method_entry"),
        }
    }
}

/// Runtime environment hosting the ownership agent.
pub trait HostEnvironment: HeapEffects {
    /// Capabilities this host could grant.
    fn potential_capabilities(&self) -> Result<HostCapabilities>;

    /// Acquire `capabilities` for the agent.
    fn add_capabilities(&mut self, capabilities: HostCapabilities) -> Result<()>;

    /// Turn on notification of `event`.
    fn enable_event(&mut self, event: HostEvent) -> Result<()>;

    /// Release the environment. Called once, on load failure or unload.
    fn dispose(&mut self) -> Result<()>;
}
