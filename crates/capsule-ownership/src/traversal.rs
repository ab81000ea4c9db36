//! Worklist traversal of the heap graph
//!
//! Every object reachable from the root, the root included, is handed to the
//! visitor exactly once together with a mutable slot holding its tag. The
//! slot is written back to the tag store only when the visitor changed it.
//! References of an object are enumerated after its visit, so objects
//! discovered through it see the referrer's updated tag.

use capsule_core::{CapsuleError, HeapEffects, HeapVisit, ObjectId, Result, Tag};
use std::collections::{HashSet, VecDeque};
use tracing::trace;

/// Counters collected by one traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Distinct objects handed to the visitor.
    pub objects_visited: usize,
    /// References examined, including those leading to already visited objects.
    pub edges_examined: usize,
    /// Tag slots the visitor changed.
    pub tags_written: usize,
    /// Greatest discovery depth reached.
    pub max_depth: usize,
}

/// Visit every object reachable from `root`.
///
/// Fails with [`CapsuleError::TraversalFailed`] if the root is not live, if
/// the host cannot enumerate an object, or if a reference points at an
/// object the heap does not contain. Tags already written stay written.
pub fn follow_references<H, F>(heap: &mut H, root: ObjectId, mut visitor: F) -> Result<TraversalStats>
where
    H: HeapEffects + ?Sized,
    F: FnMut(&HeapVisit, &mut Tag),
{
    if !heap.contains(root) {
        return Err(CapsuleError::traversal_failed(root, "root is not a live object"));
    }

    let mut stats = TraversalStats::default();
    let mut visited: HashSet<ObjectId> = HashSet::new();
    let mut worklist: VecDeque<HeapVisit> = VecDeque::new();
    visited.insert(root);
    worklist.push_back(HeapVisit::root(root));

    while let Some(visit) = worklist.pop_front() {
        let before = heap.tag_of(visit.object);
        let mut slot = before;
        visitor(&visit, &mut slot);
        if slot != before {
            heap.set_tag(visit.object, slot);
            stats.tags_written += 1;
        }
        stats.objects_visited += 1;
        stats.max_depth = stats.max_depth.max(visit.depth);
        trace!(
            object = %visit.object,
            depth = visit.depth,
            kind = ?visit.kind,
            tag = %slot,
            "visited object"
        );

        let references = heap.references(visit.object).map_err(|err| match err {
            CapsuleError::TraversalFailed { .. } => err,
            other => CapsuleError::traversal_failed(visit.object, other.to_string()),
        })?;

        for reference in references {
            stats.edges_examined += 1;
            if !heap.contains(reference.referent) {
                return Err(CapsuleError::traversal_failed(
                    reference.referent,
                    format!("dangling {} reference from {}", reference.kind, visit.object),
                ));
            }
            if visited.insert(reference.referent) {
                worklist.push_back(HeapVisit {
                    object: reference.referent,
                    referrer: Some(visit.object),
                    referrer_tag: Some(slot),
                    kind: Some(reference.kind),
                    depth: visit.depth + 1,
                });
            }
        }
    }

    Ok(stats)
}
