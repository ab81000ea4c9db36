//! Scriptable host environment for agent lifecycle tests

use crate::GraphHeap;
use capsule_core::{
    CapsuleError, HeapGraphEffects, HostCapabilities, HostEnvironment, HostEvent, ObjectId,
    Reference, Result, Tag, TagEffects,
};
use std::cell::Cell;
use std::rc::Rc;

/// Host environment backed by a [`GraphHeap`] that records every
/// lifecycle call made against it.
#[derive(Debug)]
pub struct MockHost {
    heap: GraphHeap,
    potential: HostCapabilities,
    added: Option<HostCapabilities>,
    enabled: Vec<HostEvent>,
    rejected_events: Vec<HostEvent>,
    disposals: Rc<Cell<usize>>,
}

impl MockHost {
    /// Host offering every capability.
    pub fn new(heap: GraphHeap) -> Self {
        Self::with_capabilities(heap, HostCapabilities::all())
    }

    /// Host offering exactly `potential`.
    pub fn with_capabilities(heap: GraphHeap, potential: HostCapabilities) -> Self {
        Self {
            heap,
            potential,
            added: None,
            enabled: Vec::new(),
            rejected_events: Vec::new(),
            disposals: Rc::new(Cell::new(0)),
        }
    }

    /// Make `enable_event` fail for `event`.
    pub fn reject_event(mut self, event: HostEvent) -> Self {
        self.rejected_events.push(event);
        self
    }

    /// Capabilities the agent acquired, if any.
    pub fn added_capabilities(&self) -> Option<HostCapabilities> {
        self.added
    }

    /// Events enabled so far, in order.
    pub fn enabled_events(&self) -> &[HostEvent] {
        &self.enabled
    }

    /// How many times the environment was disposed.
    pub fn dispose_count(&self) -> usize {
        self.disposals.get()
    }

    /// Shared disposal counter that stays readable after the host is
    /// consumed, e.g. by a failed agent load.
    pub fn dispose_probe(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.disposals)
    }

    /// The backing heap.
    pub fn heap(&self) -> &GraphHeap {
        &self.heap
    }

    /// Mutable access to the backing heap.
    pub fn heap_mut(&mut self) -> &mut GraphHeap {
        &mut self.heap
    }
}

impl HeapGraphEffects for MockHost {
    fn contains(&self, object: ObjectId) -> bool {
        self.heap.contains(object)
    }

    fn references(&self, object: ObjectId) -> Result<Vec<Reference>> {
        self.heap.references(object)
    }
}

impl TagEffects for MockHost {
    fn tag_of(&self, object: ObjectId) -> Tag {
        self.heap.tag_of(object)
    }

    fn set_tag(&mut self, object: ObjectId, tag: Tag) {
        self.heap.set_tag(object, tag);
    }

    fn objects_with_tags(&self, tags: &[Tag]) -> Vec<(ObjectId, Tag)> {
        self.heap.objects_with_tags(tags)
    }

    fn clear_tags(&mut self) {
        self.heap.clear_tags();
    }
}

impl HostEnvironment for MockHost {
    fn potential_capabilities(&self) -> Result<HostCapabilities> {
        Ok(self.potential)
    }

    fn add_capabilities(&mut self, capabilities: HostCapabilities) -> Result<()> {
        if let Some(name) = self.potential.first_missing(&capabilities) {
            return Err(CapsuleError::host(format!("capability {name} not available")));
        }
        self.added = Some(capabilities);
        Ok(())
    }

    fn enable_event(&mut self, event: HostEvent) -> Result<()> {
        if self.rejected_events.contains(&event) {
            return Err(CapsuleError::host(format!("cannot enable {event}")));
        }
        tracing::debug!(%event, "mock host enabled event");
        self.enabled.push(event);
        Ok(())
    }

    fn dispose(&mut self) -> Result<()> {
        self.disposals.set(self.disposals.get() + 1);
        tracing::debug!(count = self.disposals.get(), "mock host disposed");
        Ok(())
    }
}
