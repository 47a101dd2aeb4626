//! Card scheduler abstraction
//!
//! Deck traversal, grading, and review scheduling belong to an external
//! automaton (an Anki instance reached over AnkiConnect). The review session
//! consumes it only through this contract.

mod ankiconnect;

pub use ankiconnect::AnkiConnectScheduler;

use crate::media::MediaError;
use async_trait::async_trait;
use thiserror::Error;

/// One flashcard as presented by the scheduler.
///
/// `buttons` holds the ease codes the scheduler accepts for this card;
/// `next_reviews` is positionally aligned with it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Card {
    pub question: String,
    pub answer: String,
    pub buttons: Vec<i64>,
    pub next_reviews: Vec<String>,
    pub audio_files: Vec<String>,
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("scheduler request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("scheduler API error: {0}")]
    Api(String),

    #[error("deck review finished")]
    DeckExhausted,

    #[error("grade {0} not offered by the current card")]
    GradeRejected(i64),

    #[error("no card is active")]
    NoActiveCard,

    #[error(transparent)]
    Media(#[from] MediaError),
}

impl SchedulerError {
    /// Domain rejection of an ease code, retried by the grading loop.
    /// Everything else is a collaborator failure and fatal to the session.
    pub fn is_grade_rejection(&self) -> bool {
        matches!(self, SchedulerError::GradeRejected(_))
    }
}

/// Contract consumed by the review session
#[async_trait]
pub trait CardScheduler: Send {
    /// Open a review session on the named deck.
    async fn start_session(&mut self, deck: &str) -> Result<(), SchedulerError>;

    /// Release the review session. Idempotent.
    async fn stop_session(&mut self) -> Result<(), SchedulerError>;

    /// The card under review, if any.
    fn current_card(&self) -> Option<Card>;

    /// Whether the current card still awaits the reviewer's recall attempt.
    fn needs_attempt(&self) -> bool;

    /// Grade the current card. Rejects ease codes the card does not offer.
    async fn submit_grade(&mut self, ease: i64) -> Result<(), SchedulerError>;

    /// Move to the next due card. `DeckExhausted` when the deck is done.
    async fn advance(&mut self) -> Result<Card, SchedulerError>;

    /// Start playing the current card's audio cues without blocking.
    async fn play_card_audio(&mut self) -> Result<(), SchedulerError>;

    /// Stop card audio; silent once this returns.
    fn stop_card_audio(&mut self);
}
