use clap::Parser;
use finrag::cli::handle_ask;
use finrag::cli::handle_config;
use finrag::cli::handle_query;
use finrag::cli::handle_serve;
use finrag::cli::Cli;
use finrag::cli::Commands;
use finrag::config::AppConfig;
use finrag::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration before anything accepts input
    let config = AppConfig::load_from(Some(cli.config.as_path()), &std::env::vars().collect())?;

    // Initialize logging
    if cli.verbose {
        finrag::logging::init_logging_with_level("debug")?;
    } else {
        finrag::logging::init_logging_with_config(&config)?;
    }
    info!("Configuration loaded successfully");

    // Execute the requested command
    match cli.command {
        Commands::Ask {
            question,
            pipeline,
            show_context,
            show_query,
        } => handle_ask(&config, &question, &pipeline, show_context, show_query).await,
        Commands::Query { question, pipeline } => handle_query(&config, &question, &pipeline),
        Commands::Serve {
            host,
            port,
            cors,
            pipeline,
        } => handle_serve(&config, host, port, cors, &pipeline).await,
        Commands::Config => handle_config(&config),
    }
}
