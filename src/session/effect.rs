//! Side effects requested by transitions
//!
//! Transitions stay pure; the runner executes these against the console,
//! the scheduler, and the completion service. Effects that consult a
//! collaborator produce a follow-up event.

/// An instruction from the state machine to the runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Print one line on the transcript
    Say(String),
    /// Re-seed the conversation to its single system turn
    ResetConversation,
    /// Append a user turn to the conversation
    AppendUser(String),
    /// Append an assistant turn to the conversation
    AppendAssistant(String),
    /// One-shot feedback request for a recall attempt
    RequestFeedback { attempt: String },
    /// Completion over the full rendered conversation
    RequestChatReply,
    /// Submit an ease code for the current card; `raw` is the line as typed
    SubmitGrade { ease: i64, raw: String },
    /// Ask the scheduler for the next due card
    AdvanceCard,
    /// Start the current card's audio cues, non-blocking
    StartAudio,
    /// Stop audio; synchronized
    StopAudio,
    /// End the session cleanly
    Quit,
}
