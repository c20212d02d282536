//! Ticket status state machine
//!
//! The machine is closer to a status label than a workflow pipeline: from
//! any non-completed state every state is directly reachable. The one lock
//! is `Completed`: once a ticket is completed the only offered target is
//! `Completed` itself, so it cannot be un-completed through the edit path.
//!
//! The legal target set is computed *before* any choice is offered.
//! [`StatusChoice`] has no public constructor, so an illegal transition is
//! unrepresentable outside this crate rather than rejected at submit time.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Requested,
    Assigned,
    Pending,
    Completed,
    ClientProblem,
    Delivered,
    Cancelled,
    Hidden,
    HiddenPendingApproval,
}

impl TicketStatus {
    /// Every status, in display order
    pub const ALL: [Self; 9] = [
        Self::Requested,
        Self::Assigned,
        Self::Pending,
        Self::Completed,
        Self::ClientProblem,
        Self::Delivered,
        Self::Cancelled,
        Self::Hidden,
        Self::HiddenPendingApproval,
    ];

    /// Status assigned to a freshly created ticket
    pub const fn initial() -> Self {
        Self::Requested
    }

    /// Whether the completed lock applies to this status
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// An opaque token for one legal status transition.
///
/// Instances only come out of [`offered_transitions`]; holding one proves
/// the transition was in the offered set when it was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChoice {
    target: TicketStatus,
}

impl StatusChoice {
    /// The status this choice transitions to
    pub const fn target(self) -> TicketStatus {
        self.target
    }
}

/// Compute the set of statuses a ticket in `current` may be moved to.
///
/// From `Completed` the set is exactly `{Completed}`; from anywhere else it
/// is the full status list.
pub fn offered_transitions(current: TicketStatus) -> Vec<StatusChoice> {
    if current.is_completed() {
        vec![StatusChoice { target: TicketStatus::Completed }]
    } else {
        TicketStatus::ALL.iter().map(|&target| StatusChoice { target }).collect()
    }
}
