//! Verification phases

use std::fmt;

/// Phase of a single `verify` call.
///
/// `Start -> Tagging -> Searching -> {Cleaning | Failing} -> Done`, with a
/// direct `Start -> Done` for skipped requests. A traversal failure leaves
/// the verifier in the phase that failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VerifyPhase {
    /// Request validation.
    #[default]
    Start,
    /// Marking the moved subgraph `Move`.
    Tagging,
    /// Scanning the sender's reachable graph for `Move`.
    Searching,
    /// Resetting the moved subgraph to `None` after a legal move.
    Cleaning,
    /// Recording a rejected move.
    Failing,
    /// Finished.
    Done,
}

impl VerifyPhase {
    /// Returns `true` if `next` is a legal successor of `self`.
    pub fn can_advance_to(self, next: VerifyPhase) -> bool {
        use VerifyPhase::*;
        matches!(
            (self, next),
            (Start, Tagging)
                | (Start, Done)
                | (Tagging, Searching)
                | (Searching, Cleaning)
                | (Searching, Failing)
                | (Cleaning, Done)
                | (Failing, Done)
        )
    }
}

impl fmt::Display for VerifyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VerifyPhase::Start => "start",
            VerifyPhase::Tagging => "tagging",
            VerifyPhase::Searching => "searching",
            VerifyPhase::Cleaning => "cleaning",
            VerifyPhase::Failing => "failing",
            VerifyPhase::Done => "done",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_documented_transitions_are_legal() {
        use VerifyPhase::*;
        assert!(Start.can_advance_to(Tagging));
        assert!(Start.can_advance_to(Done));
        assert!(Searching.can_advance_to(Failing));
        assert!(!Tagging.can_advance_to(Cleaning));
        assert!(!Failing.can_advance_to(Cleaning));
        assert!(!Done.can_advance_to(Start));
    }
}
