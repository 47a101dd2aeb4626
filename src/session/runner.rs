//! Review session runner
//!
//! The impure shell around the pure transition function: it reads lines,
//! executes effects against the collaborators, feeds outcome events back
//! through the machine, and guarantees the scheduler session is released
//! exactly once on every exit path.

use super::conversation::Conversation;
use super::effect::Effect;
use super::event::Event;
use super::state::{SessionContext, SessionState};
use super::transition::{transition, TransitionError};
use super::SessionError;
use crate::llm::{ChatMessage, CompletionService};
use crate::scheduler::{Card, CardScheduler};
use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};

const USAGE: &str = "Enter anything to converse with the chatbot. \
    Enter 'n' to move to the next card, and 'a' to quit.";

/// Terminal seam: prompt-and-read plus transcript output
#[async_trait]
pub trait Console: Send {
    /// Next input line without its terminator; `None` on end of input.
    async fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Print one line on the transcript.
    fn say(&mut self, text: &str);
}

/// Interactive console over stdin/stdout
pub struct StdConsole {
    input: BufReader<Stdin>,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            input: BufReader::new(tokio::io::stdin()),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Console for StdConsole {
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        use std::io::Write;
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    fn say(&mut self, text: &str) {
        println!("{text}");
    }
}

/// Whether the dispatch loop keeps going after a step
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// What executing one effect produced
enum Step {
    Continue,
    Follow(Event),
    Quit,
}

/// The review session controller
pub struct ReviewSession<S, C, T> {
    scheduler: S,
    completion: C,
    console: T,
    conversation: Conversation,
    state: SessionState,
    ctx: SessionContext,
    language: String,
}

impl<S, C, T> ReviewSession<S, C, T>
where
    S: CardScheduler,
    C: CompletionService,
    T: Console,
{
    pub fn new(scheduler: S, completion: C, console: T, language: impl Into<String>) -> Self {
        let language = language.into();
        Self {
            scheduler,
            completion,
            console,
            conversation: Conversation::new(language.as_str()),
            state: SessionState::Idle,
            ctx: SessionContext::default(),
            language,
        }
    }

    /// Run the review protocol on the named deck until the reviewer aborts,
    /// the deck runs out, or a collaborator fails.
    pub async fn execute(&mut self, deck: &str) -> Result<(), SessionError> {
        self.conversation.reset();
        self.console.say(USAGE);

        // A start failure is fatal and leaves nothing to release.
        self.scheduler.start_session(deck).await?;

        let outcome = self.dispatch_loop().await;

        // Scoped release on every exit path: audio first so playback never
        // outlives the loop, then the session, exactly once. A release
        // failure is reported but never masks the outcome.
        self.scheduler.stop_card_audio();
        if let Err(e) = self.scheduler.stop_session().await {
            tracing::warn!(error = %e, "failed to release review session");
        }

        outcome
    }

    async fn dispatch_loop(&mut self) -> Result<(), SessionError> {
        loop {
            let Some(line) = self.console.read_line().await? else {
                tracing::debug!("input closed, treating as abort");
                return Ok(());
            };
            if self.step(Event::Line(line)).await? == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// Feed one event through the pure transition and execute its effects,
    /// chasing follow-up events until the chain drains.
    async fn step(&mut self, event: Event) -> Result<Flow, SessionError> {
        let mut pending = vec![event];
        while let Some(event) = pending.pop() {
            let result = transition(self.state, &self.ctx, event)?;
            self.state = result.new_state;
            for effect in result.effects {
                match self.perform(effect).await? {
                    Step::Continue => {}
                    Step::Follow(event) => pending.push(event),
                    Step::Quit => return Ok(Flow::Quit),
                }
            }
        }
        Ok(Flow::Continue)
    }

    async fn perform(&mut self, effect: Effect) -> Result<Step, SessionError> {
        match effect {
            Effect::Say(text) => {
                self.console.say(&text);
                Ok(Step::Continue)
            }

            Effect::ResetConversation => {
                self.conversation.reset();
                Ok(Step::Continue)
            }

            Effect::AppendUser(text) => {
                self.conversation.push(ChatMessage::user(text));
                Ok(Step::Continue)
            }

            Effect::AppendAssistant(text) => {
                self.conversation.push(ChatMessage::assistant(text));
                Ok(Step::Continue)
            }

            Effect::RequestFeedback { attempt } => {
                let card = self
                    .scheduler
                    .current_card()
                    .ok_or(TransitionError::NoActiveCard)?;
                let prompt = [
                    ChatMessage::system(feedback_instruction(&self.language, &card)),
                    ChatMessage::user(attempt),
                ];
                let text = self.completion.complete(&prompt).await?;
                Ok(Step::Follow(Event::Feedback { text }))
            }

            Effect::RequestChatReply => {
                let text = self
                    .completion
                    .complete(self.conversation.messages())
                    .await?;
                Ok(Step::Follow(Event::ChatReply { text }))
            }

            Effect::SubmitGrade { ease, raw } => match self.scheduler.submit_grade(ease).await {
                Ok(()) => Ok(Step::Follow(Event::GradeAccepted { raw })),
                Err(e) if e.is_grade_rejection() => {
                    tracing::warn!(ease, "scheduler rejected grade");
                    Ok(Step::Follow(Event::GradeRejected { ease }))
                }
                Err(e) => Err(e.into()),
            },

            Effect::AdvanceCard => {
                // Deck exhaustion propagates from here and ends the session.
                let card = self.scheduler.advance().await?;
                debug_assert!(self.scheduler.needs_attempt());
                self.ctx.card = Some(card.clone());
                Ok(Step::Follow(Event::CardReady { card }))
            }

            Effect::StartAudio => {
                self.scheduler.play_card_audio().await?;
                Ok(Step::Continue)
            }

            Effect::StopAudio => {
                self.scheduler.stop_card_audio();
                Ok(Step::Continue)
            }

            Effect::Quit => Ok(Step::Quit),
        }
    }

    #[cfg(test)]
    pub(crate) fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[cfg(test)]
    pub(crate) fn console(&self) -> &T {
        &self.console
    }

    #[cfg(test)]
    pub(crate) fn conversation(&self) -> &Conversation {
        &self.conversation
    }
}

/// System prompt for the one-shot attempt feedback. The attempt itself goes
/// in as the user turn.
fn feedback_instruction(language: &str, card: &Card) -> String {
    format!(
        "You are presenting a question to the user and will receive the user's answer to \
         that question. Please provide an evaluative comment on the user's response based \
         on your knowledge and the given correct answer. The question and the correct \
         answer are as follows. Just explain the correct answer when the user's input is \
         empty, as it means that the user doesn't have any idea. Speak in {language}.\
         \n\nQuestion:\n\n{}\n\nAnswer:\n\n{}",
        card.question, card.answer
    )
}
