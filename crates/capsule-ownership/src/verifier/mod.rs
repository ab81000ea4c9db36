//! Move verifier
//!
//! Orchestrates one ownership-move check: tag the moved subgraph `Move`,
//! scan the sender's reachable graph for `Move`, then either clear the tags
//! (legal move) or leave the caught objects tagged `IllegalMove` as
//! forensic evidence (illegal move).
//!
//! # Concurrency precondition
//!
//! From the start of tagging to the end of searching, no other thread may
//! mutate the references of the root or sender subgraphs, and nobody else
//! may write `Move` or `IllegalMove` tags. The hosting runtime guarantees
//! this through capsule state encapsulation; the verifier takes no locks.
//! If the precondition is broken the result may be a false positive or a
//! false negative. Overlapping concurrent verifications are unsupported.

mod phase;
mod request;

pub use phase::VerifyPhase;
pub use request::{IllegalMoveReport, MoveOutcome, MoveReceipt, MoveRequest, SkipReason};

use crate::searcher::Searcher;
use crate::tagger::{mark_reachable, replace_reachable};
use capsule_core::{
    AbsentReferencePolicy, CapsuleError, ForensicPolicy, HeapEffects, ObjectId, Result, Tag,
    VerifierConfig,
};
use tracing::{debug, error, instrument, warn};

/// Runs the tag / search / clean protocol for move requests.
#[derive(Debug, Clone)]
pub struct MoveVerifier {
    config: VerifierConfig,
    searcher: Searcher,
    phase: VerifyPhase,
}

impl Default for MoveVerifier {
    fn default() -> Self {
        Self::new(VerifierConfig::default())
    }
}

impl MoveVerifier {
    /// Create a verifier with the given configuration.
    pub fn new(config: VerifierConfig) -> Self {
        Self {
            searcher: Searcher::new(config.collect_offenders),
            config,
            phase: VerifyPhase::Start,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Phase reached by the most recent call.
    pub fn last_phase(&self) -> VerifyPhase {
        self.phase
    }

    /// Verify that moving `request.root` away from `request.sender` leaves no residual alias.
    ///
    /// Returns `Err` only for a traversal failure or, under
    /// [`AbsentReferencePolicy::Reject`], a malformed request. A detected
    /// violation is a successful verification with an
    /// [`MoveOutcome::IllegalMove`] outcome.
    #[instrument(level = "debug", skip(self, heap))]
    pub fn verify<H>(&mut self, heap: &mut H, request: MoveRequest) -> Result<MoveOutcome>
    where
        H: HeapEffects + ?Sized,
    {
        self.phase = VerifyPhase::Start;

        let (sender, root) = match (request.sender, request.root) {
            (Some(sender), Some(root)) => (sender, root),
            (sender, _) => {
                let reason = if sender.is_none() {
                    SkipReason::AbsentSender
                } else {
                    SkipReason::AbsentRoot
                };
                self.advance(VerifyPhase::Done);
                return match self.config.absent_reference {
                    AbsentReferencePolicy::Skip => {
                        debug!(%reason, "skipping move request");
                        Ok(MoveOutcome::Skipped(reason))
                    }
                    AbsentReferencePolicy::Reject => Err(CapsuleError::invalid(format!(
                        "move request rejected: {reason}"
                    ))),
                };
            }
        };

        self.advance(VerifyPhase::Tagging);
        let tagged = mark_reachable(heap, Some(root), Tag::Move)
            .map_err(|e| Self::abort(VerifyPhase::Tagging, e))?;

        self.advance(VerifyPhase::Searching);
        let record = self
            .searcher
            .scan_for_tag(heap, Some(sender), Tag::Move)
            .map_err(|e| Self::abort(VerifyPhase::Searching, e))?;

        if record.is_violation() {
            self.advance(VerifyPhase::Failing);
            if self.config.forensics == ForensicPolicy::OffendersOnly {
                replace_reachable(heap, Some(root), Tag::Move, Tag::None)
                    .map_err(|e| Self::abort(VerifyPhase::Failing, e))?;
            }
            warn!(
                %root,
                %sender,
                offenders = record.matches,
                "detected illegal ownership move"
            );
            self.advance(VerifyPhase::Done);
            return Ok(MoveOutcome::IllegalMove(IllegalMoveReport {
                request,
                offenders: record.offenders.into_iter().collect(),
                offender_count: record.matches,
                message: self.config.violation_message.clone(),
            }));
        }

        self.advance(VerifyPhase::Cleaning);
        mark_reachable(heap, Some(root), Tag::None)
            .map_err(|e| Self::abort(VerifyPhase::Cleaning, e))?;
        self.advance(VerifyPhase::Done);

        Ok(MoveOutcome::Moved(MoveReceipt {
            request,
            objects_moved: tagged.objects_visited,
            objects_scanned: record.stats.objects_visited,
        }))
    }

    fn advance(&mut self, next: VerifyPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal phase transition {} -> {}",
            self.phase,
            next
        );
        debug!(from = %self.phase, to = %next, "verifier phase");
        self.phase = next;
    }

    fn abort(phase: VerifyPhase, err: CapsuleError) -> CapsuleError {
        error!(%phase, error = %err, "move verification aborted");
        err
    }
}

/// Verify a move with the default configuration.
pub fn verify_move<H>(
    heap: &mut H,
    sender: Option<ObjectId>,
    receiver: Option<ObjectId>,
    root: Option<ObjectId>,
) -> Result<MoveOutcome>
where
    H: HeapEffects + ?Sized,
{
    MoveVerifier::default().verify(heap, MoveRequest::from_parts(sender, receiver, root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use capsule_core::TagEffects;
    use capsule_testkit::{GraphHeap, InstrumentedHeap};

    /// Root R -> {A, B}; sender S -> A.
    fn shared_child() -> (GraphHeap, [ObjectId; 4]) {
        let (heap, ids) = GraphHeap::from_edges(4, &[(0, 1), (0, 2), (3, 1)]);
        (heap, [ids[0], ids[1], ids[2], ids[3]])
    }

    #[test]
    fn legal_move_reaches_done_through_cleaning() {
        let (mut heap, ids) = GraphHeap::from_edges(3, &[(0, 1)]);
        let mut verifier = MoveVerifier::default();

        let outcome = verifier
            .verify(&mut heap, MoveRequest::new(ids[2], ids[2], ids[0]))
            .unwrap_or_else(|e| panic!("verify failed: {e}"));

        assert!(outcome.is_moved());
        assert_eq!(verifier.last_phase(), VerifyPhase::Done);
        assert!(heap.tags().is_empty());
    }

    #[test]
    fn shared_child_is_illegal() {
        let (mut heap, [r, a, b, s]) = shared_child();
        let outcome = verify_move(&mut heap, Some(s), None, Some(r))
            .unwrap_or_else(|e| panic!("verify failed: {e}"));

        let MoveOutcome::IllegalMove(report) = outcome else {
            panic!("expected an illegal move outcome");
        };
        assert_eq!(report.offenders, vec![a]);
        assert_eq!(report.message, "Detected an illegal ownership move.");
        assert_eq!(heap.tag_of(a), Tag::IllegalMove);
        assert_eq!(heap.tag_of(b), Tag::Move);
        assert_eq!(heap.tag_of(r), Tag::Move);
    }

    #[test]
    fn offenders_only_policy_clears_other_move_tags() {
        let (mut heap, [r, a, b, s]) = shared_child();
        let mut verifier = MoveVerifier::new(VerifierConfig {
            forensics: ForensicPolicy::OffendersOnly,
            ..VerifierConfig::default()
        });

        let outcome = verifier
            .verify(&mut heap, MoveRequest::from_parts(Some(s), None, Some(r)))
            .unwrap_or_else(|e| panic!("verify failed: {e}"));

        assert!(outcome.is_illegal());
        assert_eq!(heap.tag_of(a), Tag::IllegalMove);
        assert_eq!(heap.tag_of(b), Tag::None);
        assert_eq!(heap.tag_of(r), Tag::None);
    }

    #[test]
    fn absent_root_is_skipped_without_touching_tags() {
        let (heap, ids) = GraphHeap::from_edges(2, &[(0, 1)]);
        let mut heap = InstrumentedHeap::new(heap);
        let mut verifier = MoveVerifier::default();

        let outcome = verifier
            .verify(&mut heap, MoveRequest::from_parts(Some(ids[0]), None, None))
            .unwrap_or_else(|e| panic!("verify failed: {e}"));

        assert_eq!(outcome, MoveOutcome::Skipped(SkipReason::AbsentRoot));
        assert_eq!(verifier.last_phase(), VerifyPhase::Done);
        assert_eq!(heap.tag_writes(), 0);
        assert_eq!(heap.enumerated_objects(), 0);
    }

    #[test]
    fn absent_sender_is_reported_first() {
        let mut heap = GraphHeap::new();
        let outcome = verify_move(&mut heap, None, None, None)
            .unwrap_or_else(|e| panic!("verify failed: {e}"));
        assert_eq!(outcome, MoveOutcome::Skipped(SkipReason::AbsentSender));
    }

    #[test]
    fn reject_policy_turns_absent_reference_into_error() {
        let (mut heap, ids) = GraphHeap::from_edges(1, &[]);
        let mut verifier = MoveVerifier::new(VerifierConfig {
            absent_reference: AbsentReferencePolicy::Reject,
            ..VerifierConfig::default()
        });
        let err = verifier
            .verify(&mut heap, MoveRequest::from_parts(None, None, Some(ids[0])))
            .unwrap_err();
        assert!(matches!(err, CapsuleError::Invalid { .. }));
    }

    #[test]
    fn traversal_failure_during_search_leaves_state_as_is() {
        let (heap, ids) = GraphHeap::from_edges(4, &[(0, 1), (3, 2)]);
        let mut heap = InstrumentedHeap::new(heap).fail_at(ids[2]);
        let mut verifier = MoveVerifier::default();

        let err = verifier
            .verify(&mut heap, MoveRequest::from_parts(Some(ids[3]), None, Some(ids[0])))
            .unwrap_err();

        assert!(err.is_traversal_failure());
        assert_eq!(verifier.last_phase(), VerifyPhase::Searching);
        assert_eq!(heap.tag_of(ids[0]), Tag::Move);
        assert_eq!(heap.tag_of(ids[1]), Tag::Move);
    }

    #[test]
    fn illegal_move_surfaces_through_into_result() {
        let (mut heap, [r, a, _, s]) = shared_child();
        let err = verify_move(&mut heap, Some(s), None, Some(r))
            .and_then(MoveOutcome::into_result)
            .unwrap_err();
        assert_eq!(
            err,
            CapsuleError::illegal_move(vec![a], "Detected an illegal ownership move.")
        );
    }
}
