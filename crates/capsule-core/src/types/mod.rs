//! Heap graph vocabulary shared by every capsule crate

pub mod identifiers;
pub mod reference;
pub mod tag;

pub use identifiers::ObjectId;
pub use reference::{HeapVisit, Reference, ReferenceKind};
pub use tag::Tag;
