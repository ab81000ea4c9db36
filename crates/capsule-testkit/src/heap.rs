//! Petgraph-backed heap for tests and benchmarks

use capsule_core::{
    CapsuleError, HeapGraphEffects, ObjectId, Reference, ReferenceKind, Result, SideTable, Tag,
    TagEffects,
};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{Bfs, EdgeRef};
use std::collections::{BTreeSet, HashMap};

/// In-memory heap graph plus an identity-keyed tag side table.
///
/// Object ids are allocated monotonically and never reused, even after
/// [`GraphHeap::free`].
#[derive(Debug, Default)]
pub struct GraphHeap {
    graph: StableDiGraph<ObjectId, ReferenceKind>,
    nodes: HashMap<ObjectId, NodeIndex>,
    tags: SideTable,
    next_id: u64,
}

impl GraphHeap {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a heap with `objects` nodes and field edges given as index pairs.
    ///
    /// Returns the heap and the ids in index order. Pairs naming an index out
    /// of range are ignored.
    pub fn from_edges(objects: usize, edges: &[(usize, usize)]) -> (Self, Vec<ObjectId>) {
        let mut heap = Self::new();
        let ids = heap.alloc_many(objects);
        for &(from, to) in edges {
            if let (Some(&from), Some(&to)) = (ids.get(from), ids.get(to)) {
                heap.insert_edge(from, to, ReferenceKind::Field);
            }
        }
        (heap, ids)
    }

    /// Allocate a fresh, untagged object.
    pub fn alloc(&mut self) -> ObjectId {
        self.next_id += 1;
        let id = ObjectId::new(self.next_id);
        let index = self.graph.add_node(id);
        self.nodes.insert(id, index);
        id
    }

    /// Allocate `count` fresh objects.
    pub fn alloc_many(&mut self, count: usize) -> Vec<ObjectId> {
        (0..count).map(|_| self.alloc()).collect()
    }

    /// Add a field reference `from -> to`.
    pub fn link(&mut self, from: ObjectId, to: ObjectId) -> Result<()> {
        self.link_kind(from, to, ReferenceKind::Field)
    }

    /// Add a reference `from -> to` of the given kind.
    pub fn link_kind(&mut self, from: ObjectId, to: ObjectId, kind: ReferenceKind) -> Result<()> {
        self.index(from)?;
        self.index(to)?;
        self.insert_edge(from, to, kind);
        Ok(())
    }

    /// Remove one reference `from -> to`. Returns `false` if there was none.
    pub fn unlink(&mut self, from: ObjectId, to: ObjectId) -> bool {
        let (Some(&a), Some(&b)) = (self.nodes.get(&from), self.nodes.get(&to)) else {
            return false;
        };
        match self.graph.find_edge(a, b) {
            Some(edge) => self.graph.remove_edge(edge).is_some(),
            None => false,
        }
    }

    /// Remove an object, its references and its tag.
    pub fn free(&mut self, object: ObjectId) -> Result<()> {
        let index = self.index(object)?;
        self.graph.remove_node(index);
        self.nodes.remove(&object);
        self.tags.set_tag(object, Tag::None);
        Ok(())
    }

    /// Number of live objects.
    pub fn object_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of references.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Live object ids in allocation order.
    pub fn objects(&self) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Objects reachable from `root`, root included, computed independently
    /// of the verifier with petgraph's breadth-first search.
    pub fn reachable_from(&self, root: ObjectId) -> BTreeSet<ObjectId> {
        let Some(&start) = self.nodes.get(&root) else {
            return BTreeSet::new();
        };
        let mut bfs = Bfs::new(&self.graph, start);
        let mut reached = BTreeSet::new();
        while let Some(index) = bfs.next(&self.graph) {
            reached.insert(self.graph[index]);
        }
        reached
    }

    /// Read-only access to the tag side table.
    pub fn tags(&self) -> &SideTable {
        &self.tags
    }

    fn index(&self, object: ObjectId) -> Result<NodeIndex> {
        self.nodes
            .get(&object)
            .copied()
            .ok_or_else(|| CapsuleError::not_found(format!("{object} is not a live object")))
    }

    fn insert_edge(&mut self, from: ObjectId, to: ObjectId, kind: ReferenceKind) {
        if let (Some(&a), Some(&b)) = (self.nodes.get(&from), self.nodes.get(&to)) {
            self.graph.add_edge(a, b, kind);
        }
    }
}

impl HeapGraphEffects for GraphHeap {
    fn contains(&self, object: ObjectId) -> bool {
        self.nodes.contains_key(&object)
    }

    fn references(&self, object: ObjectId) -> Result<Vec<Reference>> {
        let index = self
            .nodes
            .get(&object)
            .copied()
            .ok_or_else(|| CapsuleError::traversal_failed(object, "object is not live"))?;
        Ok(self
            .graph
            .edges(index)
            .map(|edge| Reference::new(*edge.weight(), self.graph[edge.target()]))
            .collect())
    }
}

impl TagEffects for GraphHeap {
    fn tag_of(&self, object: ObjectId) -> Tag {
        self.tags.tag_of(object)
    }

    fn set_tag(&mut self, object: ObjectId, tag: Tag) {
        self.tags.set_tag(object, tag);
    }

    fn objects_with_tags(&self, tags: &[Tag]) -> Vec<(ObjectId, Tag)> {
        self.tags.objects_with_tags(tags)
    }

    fn clear_tags(&mut self) {
        self.tags.clear_tags();
    }
}
