//! Forensic inspection of scratch tags
//!
//! A rejected move leaves `IllegalMove` (and, under the default policy,
//! `Move`) tags in the side table. Nothing clears them implicitly; callers
//! inspect them with [`snapshot`] and release them with [`release_forensics`].

use crate::traversal::follow_references;
use capsule_core::{HeapEffects, ObjectId, Result, Tag, TagEffects};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Scratch tags currently present in the heap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForensicSnapshot {
    /// Objects caught by a searcher, sorted by id.
    pub illegal: Vec<ObjectId>,
    /// Objects still marked as part of an unfinished move, sorted by id.
    pub in_flight: Vec<ObjectId>,
}

impl ForensicSnapshot {
    /// Returns `true` if no object carries a scratch tag.
    pub fn is_clean(&self) -> bool {
        self.illegal.is_empty() && self.in_flight.is_empty()
    }
}

/// Enumerate every object carrying `Move` or `IllegalMove`.
pub fn snapshot<H>(heap: &H) -> ForensicSnapshot
where
    H: TagEffects + ?Sized,
{
    let mut snapshot = ForensicSnapshot::default();
    for (object, tag) in heap.objects_with_tags(&[Tag::Move, Tag::IllegalMove]) {
        match tag {
            Tag::IllegalMove => snapshot.illegal.push(object),
            Tag::Move => snapshot.in_flight.push(object),
            Tag::None => {}
        }
    }
    snapshot
}

/// Reset every scratch tag reachable from `root` to `None`.
///
/// Returns the number of objects released. Objects outside the subgraph
/// keep their tags.
pub fn release_forensics<H>(heap: &mut H, root: ObjectId) -> Result<usize>
where
    H: HeapEffects + ?Sized,
{
    let stats = follow_references(heap, root, |_, slot| {
        if slot.is_scratch() {
            *slot = Tag::None;
        }
    })?;
    info!(%root, released = stats.tags_written, "released forensic tags");
    Ok(stats.tags_written)
}
