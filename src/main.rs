mod agent;
mod chat;
mod cli;
mod commands;
mod config;
mod credentials;
mod error;
mod extract;
mod process;
mod util;
mod webui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::chat::ChatService;
use crate::cli::{Cli, Commands};
use crate::commands::{handle_config, run_ask, run_doctor, run_extract};
use crate::config::load_config_or_default;
use crate::webui::run_web;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve { host, port } => {
            let cfg = load_config_or_default()?;
            let host = host.unwrap_or_else(|| cfg.host.clone());
            let port = port.unwrap_or(cfg.port);
            run_web(ChatService::new(cfg), &host, port).await?;
        }
        Commands::Ask { prompt } => {
            let cfg = load_config_or_default()?;
            run_ask(cfg, &prompt).await?;
        }
        Commands::Extract { file } => run_extract(file.as_deref())?,
        Commands::Config { command } => handle_config(command)?,
        Commands::Doctor => run_doctor().await?,
    }

    Ok(())
}

/// Logs go to stderr so `extract` and `ask` keep stdout for the reply.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "agentcore_chat=debug"
    } else {
        "agentcore_chat=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
