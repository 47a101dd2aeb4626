//! Events fed through the transition function

use crate::scheduler::Card;

/// One stimulus for the state machine: a console line, or the outcome of an
/// effect the runner executed against a collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// One input line, terminator stripped
    Line(String),
    /// One-shot feedback on a recall attempt arrived
    Feedback { text: String },
    /// Multi-turn chat completion arrived
    ChatReply { text: String },
    /// The scheduler moved to a new card
    CardReady { card: Card },
    /// The scheduler accepted the submitted ease code
    GradeAccepted { raw: String },
    /// The scheduler rejected the submitted ease code
    GradeRejected { ease: i64 },
}
