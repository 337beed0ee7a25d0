use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "agentcore-chat",
    version,
    about = "Web chat front-end for an agentcore agent"
)]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the chat page and the /chat API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Send one prompt to the agent and print the reply
    Ask {
        prompt: String,
    },
    /// Extract the reply from saved agent output (reads stdin without FILE)
    Extract {
        file: Option<PathBuf>,
    },
    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Check that the credential and agent commands are usable
    Doctor,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write the default config
    Init,
    /// Show current config
    Show,
    /// Set config fields
    Set {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Agent name passed as --agent
        #[arg(long)]
        agent: Option<String>,
        #[arg(long)]
        agent_program: Option<String>,
        /// Comma-separated arguments placed before --agent
        #[arg(long)]
        agent_args: Option<String>,
        #[arg(long)]
        agent_timeout_secs: Option<u64>,
        /// AWS region for the agent process; empty clears it
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        credential_program: Option<String>,
        /// Comma-separated credential command arguments
        #[arg(long)]
        credential_args: Option<String>,
        #[arg(long)]
        credential_timeout_secs: Option<u64>,
    },
}
