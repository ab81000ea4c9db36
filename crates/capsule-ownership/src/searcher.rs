//! Searcher: find sentinel-tagged objects reachable from a second root
//!
//! Matches are rewritten to [`Tag::IllegalMove`] so they stay observable in
//! the tag store after the scan returns. The scan never stops early; every
//! reachable object is examined and every match is marked.

use crate::traversal::{follow_references, TraversalStats};
use capsule_core::{HeapEffects, ObjectId, Result, Tag};
use std::collections::BTreeSet;
use tracing::debug;

/// Outcome of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationRecord {
    /// At least one reachable object carried the sentinel.
    pub found: bool,
    /// Matching objects, when offender collection is enabled.
    pub offenders: BTreeSet<ObjectId>,
    /// Number of matches, counted even when offenders are not collected.
    pub matches: usize,
    /// Traversal counters.
    pub stats: TraversalStats,
}

impl ViolationRecord {
    /// Returns `true` if the scan caught at least one object.
    pub fn is_violation(&self) -> bool {
        self.found
    }
}

/// Scans a reachable subgraph for a sentinel tag.
#[derive(Debug, Clone, Copy)]
pub struct Searcher {
    collect_offenders: bool,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Searcher {
    /// Create a searcher; `collect_offenders` controls whether matching ids are recorded.
    pub fn new(collect_offenders: bool) -> Self {
        Self { collect_offenders }
    }

    /// Walk everything reachable from `root` and catch objects tagged `sentinel`.
    ///
    /// An absent root yields an empty record.
    pub fn scan_for_tag<H>(
        &self,
        heap: &mut H,
        root: Option<ObjectId>,
        sentinel: Tag,
    ) -> Result<ViolationRecord>
    where
        H: HeapEffects + ?Sized,
    {
        let mut record = ViolationRecord::default();
        let Some(root) = root else {
            return Ok(record);
        };

        let collect = self.collect_offenders;
        let offenders = &mut record.offenders;
        let matches = &mut record.matches;
        record.stats = follow_references(heap, root, |visit, slot| {
            if *slot == sentinel {
                *slot = Tag::IllegalMove;
                *matches += 1;
                if collect {
                    offenders.insert(visit.object);
                }
            }
        })?;
        record.found = record.matches > 0;

        debug!(
            %root,
            %sentinel,
            visited = record.stats.objects_visited,
            matches = record.matches,
            "scanned for sentinel"
        );
        Ok(record)
    }
}
