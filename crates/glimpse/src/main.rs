//! Glimpse - HTTP relay that describes uploaded images with a multimodal LLM.
//!
//! Clients POST a multipart form with an `image` file and an optional
//! `prompt`; Glimpse forwards both to a chat-completions API and answers
//! with `{"description": "..."}`.
//!
//! # Usage
//!
//! ```bash
//! # Start the relay (the API key is required)
//! HUGGINGFACE_API_KEY=hf_... glimpse serve --port 8080
//!
//! # Describe an image
//! curl -F image=@cat.png -F prompt="What is this?" localhost:8080/process-image
//!
//! # View configuration
//! glimpse config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;
mod server;

/// Glimpse - describe images through a multimodal LLM.
#[derive(Parser, Debug)]
#[command(name = "glimpse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file path (defaults to the platform config directory)
    #[arg(short, long, global = true, env = "GLIMPSE_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP relay
    Serve(cli::serve::ServeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI overrides.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match cli::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default logging settings. Check your config file with `glimpse config path`."
            );
            glimpse_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Glimpse v{}", glimpse_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, cli.config.as_deref()).await,
        Commands::Config(args) => cli::config::execute(args, cli.config.as_deref()).await,
    }
}
