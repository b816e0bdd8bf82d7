//! CLI command handlers

use tracing::info;

use crate::api::serve_api;
use crate::cli::commands::PipelineArgs;
use crate::cli::output::format_sources;
use crate::cli::output::print_info;
use crate::cli::output::print_section;
use crate::cli::output::print_warning;
use crate::config::AppConfig;
use crate::rag::RagService;
use crate::rag::SearchQuery;
use crate::FinRagError;
use crate::Result;

/// Configuration with per-run pipeline overrides applied and checked
fn with_pipeline(config: &AppConfig, args: &PipelineArgs) -> Result<AppConfig> {
    let mut config = config.clone();
    config.pipeline = args.apply(&config.pipeline);
    config.validate()?;
    Ok(config)
}

/// Handle a single question end to end
pub async fn handle_ask(
    config: &AppConfig,
    question: &str,
    args: &PipelineArgs,
    show_context: bool,
    show_query: bool,
) -> Result<()> {
    let config = with_pipeline(config, args)?;
    let service = RagService::new(&config)?;

    print_info(&format!("Question : {question}"));
    let response = service.ask(question).await?;

    if response.documents.is_empty() {
        print_warning("Aucun article trouvé ; la synthèse n'a pas de contexte.");
    }

    print_section("✨ Synthèse", &response.answer);

    if show_context {
        print_section("📄 Documents sources", &response.context);
    } else {
        println!("\n📚 Sources ({} articles):", response.documents.len());
        println!("{}", format_sources(&response.documents));
    }

    if show_query {
        print_section(
            "🔍 Requête Elasticsearch",
            &serde_json::to_string_pretty(&response.request)?,
        );
    }

    Ok(())
}

/// Print the search request JSON
pub fn handle_query(config: &AppConfig, question: &str, args: &PipelineArgs) -> Result<()> {
    let pipeline = args.apply(&config.pipeline);
    pipeline.validate()?;

    let request = SearchQuery::from_pipeline(question, &pipeline).to_request();
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

/// Start the JSON API
pub async fn handle_serve(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
    cors: bool,
    args: &PipelineArgs,
) -> Result<()> {
    let config = with_pipeline(config, args)?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info!(
        "Serving with result_limit={} template={:?}",
        config.pipeline.result_limit, config.pipeline.template
    );
    serve_api(&config, &host, port, cors).await
}

/// Print effective configuration with secrets masked
pub fn handle_config(config: &AppConfig) -> Result<()> {
    let text = toml::to_string_pretty(&config.redacted())
        .map_err(|e| FinRagError::ConfigError(e.to_string()))?;
    println!("{text}");

    if let Err(e) = config.validate() {
        print_warning(&e.to_string());
    }
    Ok(())
}
