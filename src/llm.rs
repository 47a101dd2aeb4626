//! Completion service abstraction
//!
//! A single seam over the chat-completions backend: ordered messages in,
//! reply text out. Errors are classified but never retried here; callers
//! treat them as fatal.

mod error;
mod openai;
mod types;

pub use error::{LlmError, LlmErrorKind};
pub use openai::OpenAiService;
pub use types::{ChatMessage, ChatRole};

use async_trait::async_trait;

/// Common interface for completion backends
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Request one completion over the given conversation.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}
