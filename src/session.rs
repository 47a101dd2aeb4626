//! Review session core
//!
//! The interaction protocol around one deck review: a pure state machine
//! (state, event, effect, transition) and the runner that drives it against
//! the scheduler, the completion service, and the terminal.

mod action;
mod conversation;
mod effect;
mod event;
mod runner;
mod state;
mod transition;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod testing;

pub use action::Action;
pub use conversation::Conversation;
pub use effect::Effect;
pub use event::Event;
pub use runner::{Console, ReviewSession, StdConsole};
pub use state::{SessionContext, SessionState};
pub use transition::{transition, TransitionError, TransitionResult};

use crate::llm::LlmError;
use crate::scheduler::SchedulerError;
use thiserror::Error;

/// Why a review session ended other than by an explicit abort
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("scheduler: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("completion: {0}")]
    Completion(#[from] LlmError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("console: {0}")]
    Io(#[from] std::io::Error),
}

impl SessionError {
    /// Natural end of the deck: surfaced like an error, exits like a success.
    pub fn is_deck_completion(&self) -> bool {
        matches!(
            self,
            SessionError::Scheduler(SchedulerError::DeckExhausted)
        )
    }
}
