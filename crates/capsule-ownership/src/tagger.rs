//! Tagger: total re-tag of a reachable subgraph

use crate::traversal::{follow_references, TraversalStats};
use capsule_core::{HeapEffects, ObjectId, Result, Tag};
use tracing::debug;

/// Set the tag of every object reachable from `root`, the root included, to `value`.
///
/// Any previous tag is overwritten. An absent root is a no-op. Running this
/// twice with the same value leaves the same assignment as running it once.
pub fn mark_reachable<H>(heap: &mut H, root: Option<ObjectId>, value: Tag) -> Result<TraversalStats>
where
    H: HeapEffects + ?Sized,
{
    let Some(root) = root else {
        return Ok(TraversalStats::default());
    };
    let stats = follow_references(heap, root, |_, slot| *slot = value)?;
    debug!(%root, %value, visited = stats.objects_visited, "tagged reachable subgraph");
    Ok(stats)
}

/// Rewrite `from` to `to` on every object reachable from `root`; other tags are kept.
pub fn replace_reachable<H>(
    heap: &mut H,
    root: Option<ObjectId>,
    from: Tag,
    to: Tag,
) -> Result<TraversalStats>
where
    H: HeapEffects + ?Sized,
{
    let Some(root) = root else {
        return Ok(TraversalStats::default());
    };
    let stats = follow_references(heap, root, |_, slot| {
        if *slot == from {
            *slot = to;
        }
    })?;
    debug!(%root, %from, %to, rewritten = stats.tags_written, "replaced reachable tags");
    Ok(stats)
}
