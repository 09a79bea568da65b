//! Allowed status moves for quotes and projects.
//!
//! Quotes only move forward: pending -> submitted -> accepted | rejected, with
//! resubmission allowed while the quote is still open. Projects go from
//! seeking_quotes to in_progress (acceptance) or cancelled, and from
//! in_progress to completed.

use crate::models::projects::ProjectStatus;
use crate::models::quotes::QuoteStatus;

impl QuoteStatus {
    pub fn can_transition_to(self, next: QuoteStatus) -> bool {
        use QuoteStatus::*;
        matches!(
            (self, next),
            (Pending, Submitted)
                | (Submitted, Submitted)
                | (Submitted, Accepted)
                | (Pending, Rejected)
                | (Submitted, Rejected)
        )
    }

    /// Still waiting on either party.
    pub fn is_open(self) -> bool {
        matches!(self, QuoteStatus::Pending | QuoteStatus::Submitted)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Submitted => "submitted",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
        }
    }
}

impl ProjectStatus {
    pub fn can_transition_to(self, next: ProjectStatus) -> bool {
        use ProjectStatus::*;
        matches!(
            (self, next),
            (SeekingQuotes, InProgress) | (SeekingQuotes, Cancelled) | (InProgress, Completed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::SeekingQuotes => "seeking quotes",
            ProjectStatus::InProgress => "in progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn quotes_never_move_backwards() {
        for status in QuoteStatus::iter() {
            assert!(!status.can_transition_to(QuoteStatus::Pending));
        }
        for terminal in [QuoteStatus::Accepted, QuoteStatus::Rejected] {
            for next in QuoteStatus::iter() {
                assert!(!terminal.can_transition_to(next), "{terminal:?} -> {next:?}");
            }
        }
    }

    #[test]
    fn only_submitted_quotes_can_be_accepted() {
        assert!(QuoteStatus::Submitted.can_transition_to(QuoteStatus::Accepted));
        assert!(!QuoteStatus::Pending.can_transition_to(QuoteStatus::Accepted));
        assert!(QuoteStatus::Pending.can_transition_to(QuoteStatus::Submitted));
        assert!(QuoteStatus::Submitted.can_transition_to(QuoteStatus::Submitted));
    }

    #[test]
    fn project_lifecycle() {
        use ProjectStatus::*;
        assert!(SeekingQuotes.can_transition_to(InProgress));
        assert!(SeekingQuotes.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Completed));
        assert!(!InProgress.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(InProgress));
        assert!(!Cancelled.can_transition_to(SeekingQuotes));
    }
}
