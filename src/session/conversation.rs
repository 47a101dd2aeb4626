//! Per-card conversation history

use crate::llm::ChatMessage;

const TUTOR_INSTRUCTION: &str = "You assist the user in memorizing with the use of flashcards. \
    You have access to the flashcard database, so you can generate questions from it, evaluate \
    the user's answers, and engage in conversations that help reinforce the user's memory based \
    on the answers and your knowledge.";

/// Ordered message history for the card under review.
///
/// The first turn is always the system instruction; a new card starts from a
/// fresh `reset`. Growth within a card is unbounded.
#[derive(Debug)]
pub struct Conversation {
    language: String,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(language: impl Into<String>) -> Self {
        let mut conversation = Self {
            language: language.into(),
            messages: Vec::new(),
        };
        conversation.reset();
        conversation
    }

    /// Drop everything back to the single system turn.
    pub fn reset(&mut self) {
        self.messages = vec![ChatMessage::system(format!(
            "{TUTOR_INSTRUCTION} Speak in {}.",
            self.language
        ))];
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatRole;

    #[test]
    fn starts_with_exactly_one_system_turn() {
        let conversation = Conversation::new("English");
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].role, ChatRole::System);
        assert!(conversation.messages()[0].content.contains("Speak in English."));
    }

    #[test]
    fn reset_discards_accumulated_turns() {
        let mut conversation = Conversation::new("French");
        conversation.push(ChatMessage::user("bonjour"));
        conversation.push(ChatMessage::assistant("salut"));
        conversation.reset();

        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].role, ChatRole::System);
    }
}
