//! Language-model access
//!
//! `LlmService` is the only caller of a [`CompletionBackend`]: it turns an
//! assembled [`Prompt`] into a two-turn exchange and trims the answer.

pub mod client;

use std::sync::Arc;

pub use client::AzureOpenAiClient;
pub use client::ChatMessage;
pub use client::CompletionBackend;
pub use client::Role;
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::rag::Prompt;

/// Completion client shared by the pipeline
#[derive(Clone)]
pub struct LlmService {
    backend: Arc<dyn CompletionBackend>,
}

impl LlmService {
    /// Build an Azure OpenAI backed service
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self::with_backend(Arc::new(AzureOpenAiClient::new(
            &config.azure_openai,
        )?)))
    }

    #[must_use]
    pub fn with_backend(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Messages sent for a prompt: system instructions, then the raw question
    #[must_use]
    pub fn messages(prompt: &Prompt) -> [ChatMessage; 2] {
        [
            ChatMessage::system(prompt.system_instructions()),
            ChatMessage::user(prompt.user_query()),
        ]
    }

    /// Generate the answer for a prompt. Failures are returned as-is, without retry.
    pub async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let messages = Self::messages(prompt);
        let answer = self.backend.complete(&messages).await?;
        debug!("Completion received ({} chars)", answer.len());
        Ok(answer.trim().to_string())
    }
}
