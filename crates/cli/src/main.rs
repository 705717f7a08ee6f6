//! sysward — AI system administration assistant in your terminal.

mod commands;
mod questions;
mod session;
mod suggest;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sysward_config::AppConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sysward", version, about = "AI system administration assistant")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the interactive chat session (default)
    Chat,
    /// Ask a single question and exit
    Ask {
        /// The question to ask
        question: String,
        /// Agent pattern to use (react, plan_execute, multi_agent, conversational, self_ask)
        #[arg(short, long)]
        pattern: Option<String>,
    },
    /// Show session and host status
    Status,
    /// Collect a telemetry snapshot and index it
    Collect,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => commands::chat::run(config).await,
        Command::Ask { question, pattern } => commands::ask::run(config, &question, pattern).await,
        Command::Status => commands::status::run(config).await,
        Command::Collect => commands::collect::run(config).await,
    }
}
