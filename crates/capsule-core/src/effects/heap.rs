//! Heap graph and tag effects

use crate::errors::Result;
use crate::types::{ObjectId, Reference, Tag};

/// Out-of-band tag storage keyed by object identity.
///
/// Tags are never stored in the objects themselves. An object with no entry
/// reads as [`Tag::None`].
pub trait TagEffects {
    /// Read the tag attached to `object`.
    fn tag_of(&self, object: ObjectId) -> Tag;

    /// Attach `tag` to `object`, replacing any previous tag.
    fn set_tag(&mut self, object: ObjectId, tag: Tag);

    /// Enumerate every object whose tag is one of `tags`, sorted by id.
    fn objects_with_tags(&self, tags: &[Tag]) -> Vec<(ObjectId, Tag)>;

    /// Drop every tag.
    fn clear_tags(&mut self);
}

/// Read access to the host heap graph.
pub trait HeapGraphEffects {
    /// Returns `true` if `object` is a live node of the heap.
    fn contains(&self, object: ObjectId) -> bool;

    /// Outgoing references of `object`.
    ///
    /// An error means the host could not enumerate the object; the caller
    /// must treat the whole traversal as failed.
    fn references(&self, object: ObjectId) -> Result<Vec<Reference>>;
}

/// Composite heap interface required by the ownership verifier.
pub trait HeapEffects: HeapGraphEffects + TagEffects {}

impl<T> HeapEffects for T where T: HeapGraphEffects + TagEffects {}
