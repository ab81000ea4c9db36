//! Proptest strategies for heap graphs and move scenarios

use crate::GraphHeap;
use capsule_core::ObjectId;
use proptest::prelude::*;

/// Shape of a heap graph: object count plus field edges as index pairs.
#[derive(Debug, Clone)]
pub struct GraphSpec {
    /// Number of objects.
    pub objects: usize,
    /// Directed edges between object indices. Self-loops and duplicates allowed.
    pub edges: Vec<(usize, usize)>,
}

impl GraphSpec {
    /// Materialize the graph.
    pub fn build(&self) -> (GraphHeap, Vec<ObjectId>) {
        GraphHeap::from_edges(self.objects, &self.edges)
    }
}

/// A move request over a generated graph, expressed as object indices.
#[derive(Debug, Clone)]
pub struct MoveScenario {
    /// Heap shape.
    pub graph: GraphSpec,
    /// Index of the root of the moved subgraph.
    pub root: usize,
    /// Index of the sender capsule object.
    pub sender: usize,
}

/// Arbitrary graph with between 1 and `max_objects` objects, cycles included.
pub fn arb_graph(max_objects: usize) -> impl Strategy<Value = GraphSpec> {
    (1..=max_objects.max(1)).prop_flat_map(|objects| {
        prop::collection::vec((0..objects, 0..objects), 0..=objects * 2)
            .prop_map(move |edges| GraphSpec { objects, edges })
    })
}

/// Arbitrary graph with an arbitrary root and sender; their reachable sets
/// may or may not overlap.
pub fn arb_move_scenario(max_objects: usize) -> impl Strategy<Value = MoveScenario> {
    arb_graph(max_objects).prop_flat_map(|graph| {
        let n = graph.objects;
        (Just(graph), 0..n, 0..n).prop_map(|(graph, root, sender)| MoveScenario {
            graph,
            root,
            sender,
        })
    })
}

/// Two graphs with no edge between them; the root lives in the first and
/// the sender in the second, so the move is always legal.
pub fn arb_disjoint_scenario(max_objects: usize) -> impl Strategy<Value = MoveScenario> {
    (arb_graph(max_objects), arb_graph(max_objects)).prop_map(|(moved, sender)| {
        let offset = moved.objects;
        let mut edges = moved.edges;
        edges.extend(sender.edges.iter().map(|&(a, b)| (a + offset, b + offset)));
        MoveScenario {
            graph: GraphSpec {
                objects: moved.objects + sender.objects,
                edges,
            },
            root: 0,
            sender: offset,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_edges_stay_in_range(graph in arb_graph(12)) {
            prop_assert!(graph.edges.iter().all(|&(a, b)| a < graph.objects && b < graph.objects));
            let (heap, ids) = graph.build();
            prop_assert_eq!(heap.object_count(), ids.len());
            prop_assert_eq!(heap.edge_count(), graph.edges.len());
        }

        #[test]
        fn disjoint_scenarios_share_nothing(scenario in arb_disjoint_scenario(8)) {
            let (heap, ids) = scenario.graph.build();
            let moved = heap.reachable_from(ids[scenario.root]);
            let held = heap.reachable_from(ids[scenario.sender]);
            prop_assert!(moved.is_disjoint(&held));
        }
    }
}
