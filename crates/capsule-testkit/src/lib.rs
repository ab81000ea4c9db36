//! Capsule Testkit - shared test infrastructure
//!
//! - [`GraphHeap`]: petgraph-backed heap with a tag side table
//! - [`InstrumentedHeap`]: wrapper counting enumerations and injecting host faults
//! - [`MockHost`]: scriptable [`capsule_core::HostEnvironment`]
//! - [`strategies`]: proptest strategies for random heap graphs

pub mod heap;
pub mod host;
pub mod instrumented;
pub mod strategies;

pub use heap::GraphHeap;
pub use host::MockHost;
pub use instrumented::InstrumentedHeap;

/// Install a fmt subscriber honouring `RUST_LOG`. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
