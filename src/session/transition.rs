//! Pure state transition function
//!
//! Given the same state, context, and event this always produces the same
//! result, with no I/O. The grading retry loop is not nested iteration: the
//! `AwaitingGrade` arms simply return to themselves until a grade sticks.

use super::action::Action;
use super::effect::Effect;
use super::event::Event;
use super::state::{SessionContext, SessionState};
use crate::scheduler::Card;
use thiserror::Error;

/// Diagnostic shown whenever the grading loop cannot use the input.
pub const GRADE_PROMPT: &str = "Please select the number.";

/// The four-level grading scale, positionally aligned with a card's buttons.
const EASE_LABELS: [&str; 4] = ["Again", "Hard", "Good", "Easy"];

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition. All of these are contract
/// violations rather than ordinary user input, and none is retried.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("unknown action: {0}")]
    UnknownAction(&'static str),

    #[error("no card is active")]
    NoActiveCard,

    #[error("invalid transition: {0}")]
    InvalidTransition(String),
}

pub fn transition(
    state: SessionState,
    ctx: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // The whole line is the recall attempt; it is never grammar-parsed
        // and never lands in the conversation.
        (SessionState::AwaitingAttempt, Event::Line(attempt)) => {
            Ok(TransitionResult::new(SessionState::AwaitingAttempt)
                .with_effect(Effect::RequestFeedback { attempt }))
        }

        // Feedback arrived: reveal the answer in one composite assistant
        // turn and open grading with the audio cues running.
        (SessionState::AwaitingAttempt, Event::Feedback { text }) => {
            let card = ctx.card.as_ref().ok_or(TransitionError::NoActiveCard)?;
            let reveal = compose_reveal(&text, card);
            Ok(TransitionResult::new(SessionState::AwaitingGrade)
                .with_effect(Effect::Say(reveal.clone()))
                .with_effect(Effect::AppendAssistant(reveal))
                .with_effect(Effect::StartAudio))
        }

        // Grading loop: only a grade moves things along.
        (SessionState::AwaitingGrade, Event::Line(line)) => match Action::parse(&line) {
            Action::Grade(ease) => Ok(TransitionResult::new(SessionState::AwaitingGrade)
                .with_effect(Effect::SubmitGrade { ease, raw: line })),
            _ => Ok(TransitionResult::new(SessionState::AwaitingGrade)
                .with_effect(Effect::Say(GRADE_PROMPT.into()))),
        },

        (SessionState::AwaitingGrade, Event::GradeAccepted { raw }) => {
            Ok(TransitionResult::new(SessionState::Idle)
                .with_effect(Effect::AppendUser(raw))
                .with_effect(Effect::StopAudio))
        }

        (SessionState::AwaitingGrade, Event::GradeRejected { .. }) => {
            Ok(TransitionResult::new(SessionState::AwaitingGrade)
                .with_effect(Effect::Say(GRADE_PROMPT.into())))
        }

        // Idle command dispatch.
        (SessionState::Idle, Event::Line(line)) => match Action::parse(&line) {
            Action::Abort => Ok(TransitionResult::new(SessionState::Idle)
                .with_effect(Effect::Say("action: abort".into()))
                .with_effect(Effect::Quit)),

            Action::Next => Ok(TransitionResult::new(SessionState::Idle)
                .with_effect(Effect::Say("action: next".into()))
                .with_effect(Effect::ResetConversation)
                .with_effect(Effect::AdvanceCard)),

            // Fast path: re-issue a grade without the attempt/feedback flow.
            Action::Grade(ease) => Ok(TransitionResult::new(SessionState::Idle)
                .with_effect(Effect::Say(format!("action: answer {ease}")))
                .with_effect(Effect::SubmitGrade { ease, raw: line })),

            Action::Chat(text) => Ok(TransitionResult::new(SessionState::Idle)
                .with_effect(Effect::AppendUser(text))
                .with_effect(Effect::RequestChatReply)),

            // Reserved commands have no dispatch; reaching here is a defect,
            // not user input, and is never retried.
            reserved => Err(TransitionError::UnknownAction(reserved.code())),
        },

        (SessionState::Idle, Event::CardReady { card }) => {
            Ok(TransitionResult::new(SessionState::AwaitingAttempt)
                .with_effect(Effect::Say(format!("{:?}", card.audio_files)))
                .with_effect(Effect::Say(format!("Question: {}", card.question))))
        }

        (SessionState::Idle, Event::ChatReply { text }) => {
            Ok(TransitionResult::new(SessionState::Idle)
                .with_effect(Effect::AppendAssistant(text.clone()))
                .with_effect(Effect::Say(format!("[assistant] {text}"))))
        }

        // Fast-path grade settled; the conversation is not touched.
        (SessionState::Idle, Event::GradeAccepted { .. }) => {
            Ok(TransitionResult::new(SessionState::Idle))
        }

        (SessionState::Idle, Event::GradeRejected { ease }) => {
            Ok(TransitionResult::new(SessionState::Idle).with_effect(Effect::Say(format!(
                "grade {ease} was not accepted for this card"
            ))))
        }

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "no transition from {state:?} with {event:?}"
        ))),
    }
}

/// The single assistant turn revealing a card: feedback, correct answer,
/// and the grading options with their next-review labels.
fn compose_reveal(feedback: &str, card: &Card) -> String {
    let mut reveal = format!("[assistant] {feedback}\n");
    reveal.push_str(&format!("Answer:\n{}\n\n", card.answer));
    reveal.push_str("Select:\n");
    for ((button, label), next) in card
        .buttons
        .iter()
        .zip(EASE_LABELS)
        .zip(&card.next_reviews)
    {
        reveal.push_str(&format!("[{button}] {label} ({next})\n"));
    }
    reveal
}
