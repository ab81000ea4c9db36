//! Host effect trait definitions
//!
//! Pure trait definitions for what the verifier needs from its host: a tag
//! side table and a heap graph it can enumerate. Handlers supplied by the
//! host (or by `capsule-testkit`) define **how**.
//!
//! None of these traits take locks. Callers guarantee that no other thread
//! mutates the enumerated subgraphs or writes scratch tags while a
//! verification is in progress.

pub mod heap;
pub mod host;
pub mod side_table;

pub use heap::{HeapEffects, HeapGraphEffects, TagEffects};
pub use host::{HostCapabilities, HostEnvironment, HostEvent};
pub use side_table::SideTable;
