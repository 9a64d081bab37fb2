//! Serpico CLI
//!
//! Main entry point for the serpico command-line tool.
//! Answers police operations questions over a local document store.

mod commands;

use clap::{Parser, Subcommand};
use commands::{ChatCommand, DocsCommand, PromptsCommand, ScreenCommand};
use serpico_core::{
    config::AppConfig,
    logging::{self, LogFormat},
    AppError, AppResult,
};
use std::path::PathBuf;

/// Serpico - retrieval-augmented assistant for Olathe PD operations
#[derive(Parser, Debug)]
#[command(name = "serpico")]
#[command(about = "Retrieval-augmented assistant for police operations", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "SERPICO_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "SERPICO_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Log line format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Generation provider (gemini, ollama)
    #[arg(short, long, global = true, env = "SERPICO_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "SERPICO_MODEL")]
    model: Option<String>,

    /// Document storage directory
    #[arg(long, global = true, env = "SERPICO_DATA_PATH")]
    data_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a question answered from the document store
    Chat(ChatCommand),

    /// Check whether a prompt would be admitted
    Screen(ScreenCommand),

    /// Manage stored documents
    Docs(DocsCommand),

    /// Inspect prompt templates
    Prompts(PromptsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Explicit workspace and config file decide which file is read
    let config = AppConfig::load_from(cli.workspace.clone(), cli.config.clone())?;

    // Apply CLI overrides
    let mut config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.provider,
        cli.model,
        cli.data_path,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    if let Some(format) = cli.log_format.as_deref() {
        config.log_format = LogFormat::parse(format)
            .ok_or_else(|| AppError::Config(format!("Unknown log format: {}", format)))?;
    }

    // Initialize logging with final configuration
    logging::init_logging(
        config.log_level.as_deref(),
        config.no_color,
        config.log_format,
    )?;

    tracing::info!("Serpico CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);
    tracing::debug!("Data directory: {:?}", config.data_dir());

    config.validate()?;

    let command_name = match &cli.command {
        Commands::Chat(_) => "chat",
        Commands::Screen(_) => "screen",
        Commands::Docs(_) => "docs",
        Commands::Prompts(_) => "prompts",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Screen(cmd) => cmd.execute(),
        Commands::Docs(cmd) => cmd.execute(&config),
        Commands::Prompts(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
