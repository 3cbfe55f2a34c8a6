//! CLI module for Aria
//!
//! `aria serve` runs the HTTP gateway (default when no subcommand is
//! given); `aria console` runs the interactive terminal console against
//! the gateway client directly.

mod console;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::server::{self, ServerConfig};

/// Aria - voice/chat console gateway for the Gemini API
#[derive(Debug, Parser)]
#[command(name = "aria", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP gateway server
    Serve {
        /// Listen host (overrides ARIA_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Listen port (overrides ARIA_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run the interactive terminal console
    Console,
}

/// Dispatch the parsed CLI.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => server::run(ServerConfig::from_env()?).await,
        Some(Command::Serve { host, port }) => {
            let mut config = ServerConfig::from_env()?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            server::run(config).await
        }
        Some(Command::Console) => console::run().await,
    }
}
