//! Heap wrapper that records enumerations and injects host faults

use capsule_core::{CapsuleError, HeapGraphEffects, ObjectId, Reference, Result, Tag, TagEffects};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

/// Wraps another heap, counting how often each object's references are
/// enumerated and failing enumeration for selected objects.
#[derive(Debug)]
pub struct InstrumentedHeap<H> {
    inner: H,
    failing: BTreeSet<ObjectId>,
    enumerations: RefCell<BTreeMap<ObjectId, usize>>,
    tag_writes: usize,
}

impl<H> InstrumentedHeap<H> {
    /// Wrap `inner` with no injected faults.
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            failing: BTreeSet::new(),
            enumerations: RefCell::new(BTreeMap::new()),
            tag_writes: 0,
        }
    }

    /// Make enumeration of `object` fail with a host fault.
    pub fn fail_at(mut self, object: ObjectId) -> Self {
        self.failing.insert(object);
        self
    }

    /// Stop injecting a fault for `object`.
    pub fn heal(&mut self, object: ObjectId) {
        self.failing.remove(&object);
    }

    /// How many times `object` was enumerated since the last reset.
    pub fn enumerations_of(&self, object: ObjectId) -> usize {
        self.enumerations.borrow().get(&object).copied().unwrap_or(0)
    }

    /// Largest per-object enumeration count since the last reset.
    pub fn max_enumerations(&self) -> usize {
        self.enumerations.borrow().values().copied().max().unwrap_or(0)
    }

    /// Number of distinct objects enumerated since the last reset.
    pub fn enumerated_objects(&self) -> usize {
        self.enumerations.borrow().len()
    }

    /// Number of tag writes since the last reset.
    pub fn tag_writes(&self) -> usize {
        self.tag_writes
    }

    /// Forget all recorded counts.
    pub fn reset_counts(&mut self) {
        self.enumerations.borrow_mut().clear();
        self.tag_writes = 0;
    }

    /// The wrapped heap.
    pub fn inner(&self) -> &H {
        &self.inner
    }

    /// Mutable access to the wrapped heap.
    pub fn inner_mut(&mut self) -> &mut H {
        &mut self.inner
    }
}

impl<H: HeapGraphEffects> HeapGraphEffects for InstrumentedHeap<H> {
    fn contains(&self, object: ObjectId) -> bool {
        self.inner.contains(object)
    }

    fn references(&self, object: ObjectId) -> Result<Vec<Reference>> {
        *self.enumerations.borrow_mut().entry(object).or_insert(0) += 1;
        if self.failing.contains(&object) {
            return Err(CapsuleError::traversal_failed(
                object,
                "injected host enumeration fault",
            ));
        }
        self.inner.references(object)
    }
}

impl<H: TagEffects> TagEffects for InstrumentedHeap<H> {
    fn tag_of(&self, object: ObjectId) -> Tag {
        self.inner.tag_of(object)
    }

    fn set_tag(&mut self, object: ObjectId, tag: Tag) {
        self.tag_writes += 1;
        self.inner.set_tag(object, tag);
    }

    fn objects_with_tags(&self, tags: &[Tag]) -> Vec<(ObjectId, Tag)> {
        self.inner.objects_with_tags(tags)
    }

    fn clear_tags(&mut self) {
        self.inner.clear_tags();
    }
}
