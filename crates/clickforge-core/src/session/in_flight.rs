//! Single-slot handle for the one remote call allowed at a time.

use serde::{Deserialize, Serialize};
use strum::Display;

use super::status::{SessionStatus, WorkflowStep};

/// The kind of remote call a ticket was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum RequestKind {
    Analysis,
    ImageGeneration,
    Refinement,
}

impl RequestKind {
    /// Status shown while a request of this kind is outstanding.
    pub fn status(&self) -> SessionStatus {
        match self {
            RequestKind::Analysis => SessionStatus::AnalyzingMarket,
            RequestKind::ImageGeneration => SessionStatus::GeneratingImage,
            RequestKind::Refinement => SessionStatus::Refining,
        }
    }

    /// Step the session moves to when a request of this kind succeeds.
    pub fn destination(&self) -> Option<WorkflowStep> {
        match self {
            RequestKind::Analysis => Some(WorkflowStep::Strategy),
            RequestKind::ImageGeneration | RequestKind::Refinement => None,
        }
    }
}

/// Proof that a response belongs to the request currently occupying the slot.
///
/// Tickets can only be minted by [`InFlightSlot::issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    id: u64,
    kind: RequestKind,
}

impl RequestTicket {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Holds at most one outstanding request.
///
/// Invalidating the slot makes every previously issued ticket stale; a stale
/// ticket can never be settled, so its response is dropped.
#[derive(Debug, Clone, Default)]
pub struct InFlightSlot {
    next_id: u64,
    current: Option<RequestTicket>,
}

impl InFlightSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Occupies the slot with a new ticket, replacing any previous one.
    pub fn issue(&mut self, kind: RequestKind) -> RequestTicket {
        self.next_id += 1;
        let ticket = RequestTicket {
            id: self.next_id,
            kind,
        };
        self.current = Some(ticket);
        ticket
    }

    pub fn current(&self) -> Option<RequestTicket> {
        self.current
    }

    pub fn is_occupied(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.current.as_ref() == Some(ticket)
    }

    /// Frees the slot if `ticket` still owns it.
    ///
    /// Returns `false` for stale tickets, leaving the slot untouched.
    pub fn settle(&mut self, ticket: &RequestTicket) -> bool {
        if self.is_current(ticket) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Drops the outstanding ticket, if any, and returns it.
    pub fn invalidate(&mut self) -> Option<RequestTicket> {
        self.current.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_current_ticket() {
        let mut slot = InFlightSlot::new();
        let ticket = slot.issue(RequestKind::Analysis);
        assert!(slot.is_occupied());
        assert!(slot.settle(&ticket));
        assert!(!slot.is_occupied());
        // settling twice is a no-op
        assert!(!slot.settle(&ticket));
    }

    #[test]
    fn test_invalidated_ticket_cannot_settle() {
        let mut slot = InFlightSlot::new();
        let ticket = slot.issue(RequestKind::Refinement);
        assert_eq!(slot.invalidate(), Some(ticket));
        assert!(!slot.settle(&ticket));
    }

    #[test]
    fn test_reissue_makes_old_ticket_stale() {
        let mut slot = InFlightSlot::new();
        let first = slot.issue(RequestKind::ImageGeneration);
        slot.invalidate();
        let second = slot.issue(RequestKind::ImageGeneration);
        assert_ne!(first, second);
        assert!(!slot.is_current(&first));
        assert!(slot.settle(&second));
    }

    #[test]
    fn test_kind_status() {
        assert_eq!(RequestKind::Analysis.status(), SessionStatus::AnalyzingMarket);
        assert_eq!(RequestKind::Refinement.status(), SessionStatus::Refining);
    }

    #[test]
    fn test_only_analysis_has_a_destination() {
        assert_eq!(RequestKind::Analysis.destination(), Some(WorkflowStep::Strategy));
        assert_eq!(RequestKind::ImageGeneration.destination(), None);
        assert_eq!(RequestKind::Refinement.destination(), None);
    }
}
