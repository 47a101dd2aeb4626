//! Review session state types

use crate::scheduler::Card;

/// Where the controller sits in the review protocol.
///
/// Exactly one value is active; audio plays iff the session is in
/// `AwaitingGrade`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// A question is on screen; the next line is the recall attempt.
    AwaitingAttempt,
    /// The answer has been revealed; only a grade gets out of here.
    AwaitingGrade,
    /// The current card is settled; commands and chat are accepted.
    #[default]
    Idle,
}

/// Read-only context for transitions: the controller's clone of the card
/// under review, set when the scheduler advances.
#[derive(Debug, Default)]
pub struct SessionContext {
    pub card: Option<Card>,
}
