//! Chat completion clients

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::AzureOpenAiConfig;
use crate::errors::FinRagError;
use crate::errors::Result;

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Text generation capability; returns the first candidate's raw text
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Azure OpenAI chat completions for one deployment
pub struct AzureOpenAiClient {
    completions_url: Url,
    api_key: String,
    client: Client,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl AzureOpenAiClient {
    /// Create a client for the configured deployment
    ///
    /// # Errors
    /// - Malformed endpoint URL
    /// - HTTP client build errors
    pub fn new(config: &AzureOpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            completions_url: completions_url(
                &config.endpoint,
                &config.deployment,
                &config.api_version,
            )?,
            api_key: config.api_key.clone(),
            client,
        })
    }

    pub fn completions_url(&self) -> &Url {
        &self.completions_url
    }
}

#[async_trait]
impl CompletionBackend for AzureOpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        debug!("POST {} ({} messages)", self.completions_url.path(), messages.len());

        let response = self
            .client
            .post(self.completions_url.clone())
            .header("api-key", &self.api_key)
            .json(&ChatCompletionRequest { messages })
            .send()
            .await
            .map_err(|e| FinRagError::CompletionFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FinRagError::CompletionFailure(format!(
                "chat completion returned {status}: {body}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FinRagError::CompletionFailure(e.to_string()))?;
        parse_completion(&body)
    }
}

/// `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version={version}`
pub fn completions_url(endpoint: &str, deployment: &str, api_version: &str) -> Result<Url> {
    let mut url = Url::parse(endpoint)?;
    url.path_segments_mut()
        .map_err(|()| FinRagError::ConfigError(format!("{endpoint} cannot be a base URL")))?
        .pop_if_empty()
        .extend(["openai", "deployments", deployment, "chat", "completions"]);
    url.query_pairs_mut().clear().append_pair("api-version", api_version);
    Ok(url)
}

/// First choice's message content
pub fn parse_completion(body: &str) -> Result<String> {
    let response: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
        FinRagError::CompletionFailure(format!("unexpected completion response: {e}"))
    })?;

    response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| FinRagError::CompletionFailure("response contained no choices".to_string()))?
        .message
        .content
        .ok_or_else(|| FinRagError::CompletionFailure("first choice has no content".to_string()))
}
