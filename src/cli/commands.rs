//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;

use crate::config::PipelineConfig;
use crate::config::DEFAULT_CONFIG_PATH;
use crate::rag::ContextLayout;
use crate::rag::TemplateVariant;

#[derive(Parser)]
#[command(name = "finrag")]
#[command(about = "Financial news summaries grounded in Elasticsearch hybrid search")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: configured level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file (the default may be absent; environment variables also apply)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Retrieve articles and generate a summary for a question
    Ask {
        /// Question about financial news
        question: String,
        #[command(flatten)]
        pipeline: PipelineArgs,
        /// Also print the context given to the model
        #[arg(long)]
        show_context: bool,
        /// Also print the search request JSON
        #[arg(long)]
        show_query: bool,
    },
    /// Print the search request for a question without calling any backend
    Query {
        /// Question about financial news
        question: String,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Serve the pipeline as a JSON API
    Serve {
        /// Bind address (default: from configuration)
        #[arg(long)]
        host: Option<String>,
        /// Port (default: from configuration)
        #[arg(short, long)]
        port: Option<u16>,
        /// Allow cross-origin requests
        #[arg(long)]
        cors: bool,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Show current configuration (credentials redacted)
    Config,
}

/// Per-run overrides of the configured pipeline
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Start from the two-column preset (20 hits, dated markdown context)
    #[arg(long)]
    pub two_column: bool,
    /// Number of fused hits to retrieve
    #[arg(short, long)]
    pub limit: Option<usize>,
    /// Candidates per retriever before fusion
    #[arg(long)]
    pub rank_window: Option<usize>,
    /// Instruction template
    #[arg(long, value_enum)]
    pub template: Option<TemplateVariant>,
    /// Context block layout
    #[arg(long, value_enum)]
    pub layout: Option<ContextLayout>,
    /// Include publication dates in the context
    #[arg(long)]
    pub published_date: bool,
}

impl PipelineArgs {
    /// Apply overrides on top of the configured pipeline
    #[must_use]
    pub fn apply(&self, base: &PipelineConfig) -> PipelineConfig {
        let mut pipeline = if self.two_column {
            PipelineConfig::two_column()
        } else {
            base.clone()
        };

        if let Some(limit) = self.limit {
            pipeline.result_limit = limit;
        }
        if self.rank_window.is_some() {
            pipeline.rank_window = self.rank_window;
        }
        if let Some(template) = self.template {
            pipeline.template = template;
        }
        if let Some(layout) = self.layout {
            pipeline.context_layout = layout;
        }
        if self.published_date {
            pipeline.include_published_date = true;
        }
        pipeline
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_overrides() {
        let cli = Cli::parse_from([
            "finrag",
            "ask",
            "Quoi de neuf sur le CAC 40 ?",
            "--limit",
            "5",
            "--template",
            "all-relevant",
            "--show-query",
        ]);
        match cli.command {
            Commands::Ask {
                question,
                pipeline,
                show_query,
                show_context,
            } => {
                assert_eq!(question, "Quoi de neuf sur le CAC 40 ?");
                assert!(show_query);
                assert!(!show_context);
                let applied = pipeline.apply(&PipelineConfig::default());
                assert_eq!(applied.result_limit, 5);
                assert_eq!(applied.template, TemplateVariant::AllRelevant);
                assert_eq!(applied.rank_window, None);
            }
            _ => panic!("expected ask command"),
        }
    }

    #[test]
    fn test_two_column_preset_then_overrides() {
        let args = PipelineArgs {
            two_column: true,
            limit: Some(30),
            rank_window: Some(50),
            ..PipelineArgs::default()
        };
        let applied = args.apply(&PipelineConfig::default());
        assert_eq!(applied.result_limit, 30);
        assert_eq!(applied.rank_window, Some(50));
        assert_eq!(applied.template, TemplateVariant::TopFiveDated);
        assert_eq!(applied.context_layout, ContextLayout::Markdown);
    }

    #[test]
    fn test_no_overrides_keeps_base() {
        let base = PipelineConfig::two_column();
        assert_eq!(PipelineArgs::default().apply(&base), base);
    }
}
