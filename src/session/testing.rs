//! Scripted fakes for session tests

use super::runner::Console;
use crate::llm::{ChatMessage, CompletionService, LlmError};
use crate::scheduler::{Card, CardScheduler, SchedulerError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

/// Console fed from a fixed script; records everything said.
pub struct ScriptedConsole {
    input: VecDeque<String>,
    output: Vec<String>,
}

impl ScriptedConsole {
    pub fn new(script: &[&str]) -> Self {
        Self {
            input: script.iter().map(|s| (*s).to_string()).collect(),
            output: Vec::new(),
        }
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.input.pop_front())
    }

    fn say(&mut self, text: &str) {
        self.output.push(text.to_string());
    }
}

/// In-memory scheduler with an operation log.
///
/// Grades are validated against the current card's buttons, mirroring the
/// real implementation's boundary check.
#[derive(Default)]
pub struct FakeScheduler {
    cards: VecDeque<Card>,
    current: Option<Card>,
    needs_attempt: bool,
    audio: bool,
    ops: Vec<String>,
    fail_start: bool,
    fail_grades: bool,
    stop_sessions: usize,
}

impl FakeScheduler {
    pub fn with_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Make `start_session` fail.
    pub fn fail_start(&mut self) {
        self.fail_start = true;
    }

    /// Make `submit_grade` fail with a transport error instead of a
    /// domain rejection.
    pub fn fail_grades(&mut self) {
        self.fail_grades = true;
    }

    pub fn ops(&self) -> Vec<String> {
        self.ops.clone()
    }

    pub fn stop_sessions(&self) -> usize {
        self.stop_sessions
    }

    pub fn audio_playing(&self) -> bool {
        self.audio
    }
}

#[async_trait]
impl CardScheduler for FakeScheduler {
    async fn start_session(&mut self, deck: &str) -> Result<(), SchedulerError> {
        if self.fail_start {
            return Err(SchedulerError::Api("no such deck".into()));
        }
        self.ops.push(format!("start:{deck}"));
        Ok(())
    }

    async fn stop_session(&mut self) -> Result<(), SchedulerError> {
        self.stop_sessions += 1;
        self.audio = false;
        self.ops.push("stop_session".into());
        Ok(())
    }

    fn current_card(&self) -> Option<Card> {
        self.current.clone()
    }

    fn needs_attempt(&self) -> bool {
        self.needs_attempt
    }

    async fn submit_grade(&mut self, ease: i64) -> Result<(), SchedulerError> {
        if self.fail_grades {
            return Err(SchedulerError::Api("grade endpoint down".into()));
        }
        let card = self.current.as_ref().ok_or(SchedulerError::NoActiveCard)?;
        if !card.buttons.contains(&ease) {
            self.ops.push(format!("reject:{ease}"));
            return Err(SchedulerError::GradeRejected(ease));
        }
        self.ops.push(format!("grade:{ease}"));
        self.needs_attempt = false;
        Ok(())
    }

    async fn advance(&mut self) -> Result<Card, SchedulerError> {
        let card = self.cards.pop_front().ok_or(SchedulerError::DeckExhausted)?;
        self.ops.push("advance".into());
        self.current = Some(card.clone());
        self.needs_attempt = true;
        Ok(card)
    }

    async fn play_card_audio(&mut self) -> Result<(), SchedulerError> {
        self.ops.push("play".into());
        self.audio = true;
        Ok(())
    }

    fn stop_card_audio(&mut self) {
        self.ops.push("stop_audio".into());
        self.audio = false;
    }
}

/// Completion service returning queued replies; records every request.
pub struct FakeCompletion {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeCompletion {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn queue(&self, reply: Result<String, LlmError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for FakeCompletion {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::unknown("no scripted reply queued")))
    }

    fn model_id(&self) -> &str {
        "scripted"
    }
}
