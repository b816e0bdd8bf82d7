use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinRagError {
    /// A required connection parameter is absent at startup
    #[error("Missing required configuration value: {0}")]
    ConfigurationMissing(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The search backend rejected the request or returned an unusable body
    #[error("Retrieval failed: {0}")]
    RetrievalFailure(String),

    /// The language-model backend rejected the request or returned no completion
    #[error("Completion failed: {0}")]
    CompletionFailure(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FinRagError {
    /// Whether the failure came from one of the two external backends
    #[must_use]
    pub const fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            Self::RetrievalFailure(_) | Self::CompletionFailure(_) | Self::Http(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FinRagError>;
