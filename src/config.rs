use std::collections::HashMap;
use std::path::Path;

use config::Config;
use config::Environment;
use config::File;
use config::FileFormat;
use serde::Deserialize;
use serde::Serialize;

use crate::rag::ContextLayout;
use crate::rag::TemplateVariant;
use crate::FinRagError;

const REDACTED: &str = "********";

/// Configuration file looked up when none is named explicitly
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Environment variable names from earlier deployments,
/// mapped onto configuration keys. These take precedence over everything else.
pub const LEGACY_ENV_VARS: &[(&str, &str)] = &[
    ("local_es_url", "elasticsearch.url"),
    ("local_es_user", "elasticsearch.user"),
    ("local_es_pwd", "elasticsearch.password"),
    ("local_es_index", "elasticsearch.index"),
    ("AZURE_OPENAI_ENDPOINT", "azure_openai.endpoint"),
    ("AZURE_OPENAI_API_KEY", "azure_openai.api_key"),
    ("OPENAI_API_VERSION", "azure_openai.api_version"),
    ("AZURE_OPENAI_DEPLOYMENT_NAME", "azure_openai.deployment"),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticsearchConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    pub index: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureOpenAiConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub deployment: String,
}

/// Knobs that distinguish the historical page variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of fused hits returned by the search backend
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    /// Candidates each retriever contributes before fusion (backend default when unset)
    #[serde(default)]
    pub rank_window: Option<usize>,
    #[serde(default)]
    pub include_published_date: bool,
    #[serde(default)]
    pub template: TemplateVariant,
    #[serde(default)]
    pub context_layout: ContextLayout,
}

fn default_result_limit() -> usize {
    10
}

impl PipelineConfig {
    /// Single-column page: 10 hits, backend rank window, no dates
    #[must_use]
    pub fn compact() -> Self {
        Self {
            result_limit: 10,
            rank_window: None,
            include_published_date: false,
            template: TemplateVariant::TopFive,
            context_layout: ContextLayout::Plain,
        }
    }

    /// Two-column page: 20 hits, window of 20, publication dates in markdown context
    #[must_use]
    pub fn two_column() -> Self {
        Self {
            result_limit: 20,
            rank_window: Some(20),
            include_published_date: true,
            template: TemplateVariant::TopFiveDated,
            context_layout: ContextLayout::Markdown,
        }
    }

    /// Check the limit/window relationship
    pub fn validate(&self) -> crate::Result<()> {
        if self.result_limit == 0 {
            return Err(FinRagError::ConfigError(
                "pipeline.result_limit must be greater than 0".to_string(),
            ));
        }
        if let Some(window) = self.rank_window {
            if window < self.result_limit {
                return Err(FinRagError::ConfigError(format!(
                    "pipeline.rank_window ({window}) must be >= pipeline.result_limit ({})",
                    self.result_limit
                )));
            }
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::compact()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub elasticsearch: ElasticsearchConfig,
    #[serde(default)]
    pub azure_openai: AzureOpenAiConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from `config.toml` (if present) and the process environment
    pub fn load() -> crate::Result<Self> {
        Self::load_from(Some(Path::new(DEFAULT_CONFIG_PATH)), &std::env::vars().collect())
    }

    /// Layer a TOML file, `FINRAG_<SECTION>__<KEY>` variables and the legacy
    /// variable names, in increasing order of precedence.
    ///
    /// Only `config.toml` may be absent; any other path must exist.
    pub fn load_from(file: Option<&Path>, env: &HashMap<String, String>) -> crate::Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = file {
            let required = path != Path::new(DEFAULT_CONFIG_PATH);
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(required));
        }

        builder = builder.add_source(
            Environment::with_prefix("FINRAG")
                .prefix_separator("_")
                .separator("__")
                .source(Some(env.clone())),
        );

        for (var, key) in LEGACY_ENV_VARS {
            builder = builder.set_override_option(*key, env.get(*var).cloned())?;
        }

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Reject configurations that cannot reach both backends
    pub fn validate(&self) -> crate::Result<()> {
        let required = [
            ("elasticsearch.url", &self.elasticsearch.url),
            ("elasticsearch.user", &self.elasticsearch.user),
            ("elasticsearch.password", &self.elasticsearch.password),
            ("elasticsearch.index", &self.elasticsearch.index),
            ("azure_openai.endpoint", &self.azure_openai.endpoint),
            ("azure_openai.api_key", &self.azure_openai.api_key),
            ("azure_openai.api_version", &self.azure_openai.api_version),
            ("azure_openai.deployment", &self.azure_openai.deployment),
        ];

        if let Some((key, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(FinRagError::ConfigurationMissing((*key).to_string()));
        }

        self.pipeline.validate()
    }

    /// Copy with credentials masked, for display
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.elasticsearch.password.is_empty() {
            copy.elasticsearch.password = REDACTED.to_string();
        }
        if !copy.azure_openai.api_key.is_empty() {
            copy.azure_openai.api_key = REDACTED.to_string();
        }
        copy
    }
}
