//! End-to-end move verification scenarios

use assert_matches::assert_matches;
use capsule_core::{CapsuleError, HeapGraphEffects, ObjectId, Reference, Tag, TagEffects};
use capsule_ownership::diagnostics::{release_forensics, snapshot};
use capsule_ownership::{verify_move, MoveOutcome, MoveRequest, MoveVerifier, SkipReason};
use capsule_testkit::{init_test_tracing, GraphHeap, InstrumentedHeap};

fn verify(heap: &mut GraphHeap, sender: ObjectId, root: ObjectId) -> MoveOutcome {
    verify_move(heap, Some(sender), None, Some(root))
        .unwrap_or_else(|e| panic!("verification failed: {e}"))
}

#[test]
fn shared_child_is_rejected_and_left_tagged() {
    init_test_tracing();
    let mut heap = GraphHeap::new();
    let [r, a, b, s] = [heap.alloc(), heap.alloc(), heap.alloc(), heap.alloc()];
    for (from, to) in [(r, a), (r, b), (s, a)] {
        heap.link(from, to).unwrap_or_else(|err| panic!("link failed: {err}"));
    }

    let outcome = verify(&mut heap, s, r);

    assert_matches!(&outcome, MoveOutcome::IllegalMove(report) if report.offenders == vec![a]);
    assert_eq!(heap.tag_of(a), Tag::IllegalMove);
    assert_eq!(heap.tag_of(b), Tag::Move);
    assert_eq!(heap.tag_of(r), Tag::Move);
    assert_eq!(heap.tag_of(s), Tag::None);
}

#[test]
fn disjoint_children_move_cleanly() {
    init_test_tracing();
    let mut heap = GraphHeap::new();
    let [r, c, d, s, e] = [
        heap.alloc(),
        heap.alloc(),
        heap.alloc(),
        heap.alloc(),
        heap.alloc(),
    ];
    for (from, to) in [(r, c), (r, d), (s, e)] {
        heap.link(from, to).unwrap_or_else(|err| panic!("link failed: {err}"));
    }

    let outcome = verify(&mut heap, s, r);

    assert_matches!(&outcome, MoveOutcome::Moved(receipt) => {
        assert_eq!(receipt.objects_moved, 3);
        assert_eq!(receipt.objects_scanned, 2);
    });
    for object in [r, c, d, s, e] {
        assert_eq!(heap.tag_of(object), Tag::None);
    }
}

#[test]
fn absent_root_touches_nothing() {
    let (heap, ids) = GraphHeap::from_edges(3, &[(0, 1), (1, 2)]);
    let mut heap = InstrumentedHeap::new(heap);

    let outcome = verify_move(&mut heap, Some(ids[0]), None, None)
        .unwrap_or_else(|e| panic!("verification failed: {e}"));

    assert_eq!(outcome, MoveOutcome::Skipped(SkipReason::AbsentRoot));
    assert_eq!(heap.tag_writes(), 0);
    assert!(snapshot(&heap).is_clean());
}

#[test]
fn sender_inside_moved_graph_is_illegal() {
    // The sender keeps itself reachable from the moved root.
    let (mut heap, ids) = GraphHeap::from_edges(2, &[(0, 1)]);
    let outcome = verify(&mut heap, ids[1], ids[0]);
    assert_matches!(outcome, MoveOutcome::IllegalMove(report) if report.offenders == vec![ids[1]]);
}

#[test]
fn sender_reaching_root_through_cycle_is_illegal() {
    // root <-> x, sender -> x
    let (mut heap, ids) = GraphHeap::from_edges(3, &[(0, 1), (1, 0), (2, 1)]);
    let outcome = verify(&mut heap, ids[2], ids[0]);
    assert_matches!(outcome, MoveOutcome::IllegalMove(report) => {
        assert_eq!(report.offenders, vec![ids[0], ids[1]]);
        assert_eq!(report.offender_count, 2);
    });
}

#[test]
fn receiver_does_not_influence_the_check() {
    let (mut heap, ids) = GraphHeap::from_edges(3, &[(0, 1), (2, 1)]);
    // Receiver (ids[2]) reaches the moved child; only the sender matters.
    let outcome = verify_move(&mut heap, Some(ids[1]), Some(ids[2]), Some(ids[0]))
        .unwrap_or_else(|e| panic!("verification failed: {e}"));
    assert!(outcome.is_illegal());

    let (mut heap, ids) = GraphHeap::from_edges(4, &[(0, 1), (2, 1)]);
    let outcome = verify_move(&mut heap, Some(ids[3]), Some(ids[2]), Some(ids[0]))
        .unwrap_or_else(|e| panic!("verification failed: {e}"));
    assert!(outcome.is_moved());
}

#[test]
fn repeated_legal_move_behaves_identically() {
    let (mut heap, ids) = GraphHeap::from_edges(5, &[(0, 1), (1, 2), (2, 0), (3, 4)]);
    let mut verifier = MoveVerifier::default();
    let request = MoveRequest::from_parts(Some(ids[3]), None, Some(ids[0]));

    let first = verifier
        .verify(&mut heap, request)
        .unwrap_or_else(|e| panic!("verification failed: {e}"));
    let second = verifier
        .verify(&mut heap, request)
        .unwrap_or_else(|e| panic!("verification failed: {e}"));

    assert!(first.is_moved());
    assert_eq!(first, second);
    assert!(heap.tags().is_empty());
}

#[test]
fn released_graph_can_move_after_alias_is_dropped() {
    let (mut heap, ids) = GraphHeap::from_edges(3, &[(0, 1), (2, 1)]);
    assert!(verify(&mut heap, ids[2], ids[0]).is_illegal());

    heap.unlink(ids[2], ids[1]);
    let released = release_forensics(&mut heap, ids[0])
        .unwrap_or_else(|e| panic!("release failed: {e}"));
    assert_eq!(released, 2);
    assert!(snapshot(&heap).is_clean());

    assert!(verify(&mut heap, ids[2], ids[0]).is_moved());
}

#[test]
fn host_fault_while_tagging_aborts_the_move() {
    let (heap, ids) = GraphHeap::from_edges(3, &[(0, 1), (1, 2)]);
    let mut heap = InstrumentedHeap::new(heap).fail_at(ids[1]);
    let sender = ids[2];

    let err = verify_move(&mut heap, Some(sender), None, Some(ids[0])).unwrap_err();

    assert_matches!(err, CapsuleError::TraversalFailed { object, .. } if object == ids[1]);
    // No cleanup is attempted after a fault.
    assert_eq!(heap.tag_of(ids[0]), Tag::Move);
}

/// Heap whose enumeration of one object reports a reference to a dead object.
struct DanglingHeap {
    heap: GraphHeap,
    broken: ObjectId,
}

impl HeapGraphEffects for DanglingHeap {
    fn contains(&self, object: ObjectId) -> bool {
        self.heap.contains(object)
    }

    fn references(&self, object: ObjectId) -> capsule_core::Result<Vec<Reference>> {
        let mut references = self.heap.references(object)?;
        if object == self.broken {
            references.push(Reference::field(ObjectId::new(u64::MAX)));
        }
        Ok(references)
    }
}

impl TagEffects for DanglingHeap {
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

#[test]
fn dangling_reference_is_a_traversal_failure() {
    let (heap, ids) = GraphHeap::from_edges(3, &[(0, 1)]);
    let mut heap = DanglingHeap {
        heap,
        broken: ids[1],
    };

    let err = verify_move(&mut heap, Some(ids[2]), None, Some(ids[0])).unwrap_err();

    assert_matches!(
        err,
        CapsuleError::TraversalFailed { object, .. } if object == ObjectId::new(u64::MAX)
    );
}

#[test]
fn report_serializes_for_diagnostics() {
    let (mut heap, ids) = GraphHeap::from_edges(3, &[(0, 1), (2, 1)]);
    let MoveOutcome::IllegalMove(report) = verify(&mut heap, ids[2], ids[0]) else {
        panic!("expected an illegal move");
    };
    let json = report
        .to_json()
        .unwrap_or_else(|e| panic!("encoding failed: {e}"));
    assert!(json.contains("Detected an illegal ownership move."));
    assert!(json.contains("\"offender_count\": 1"));
}
