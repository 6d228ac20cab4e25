//! CLI commands.

mod config;
mod mint;
mod resource;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::output::OutputFormat;

/// ordo - Mint collision-resistant order and resource identifiers.
#[derive(Debug, Parser)]
#[command(name = "ordo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (text or json).
    #[arg(long, global = true, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Mint identifiers with a strategy.
    Mint(mint::MintCommand),

    /// Derive or decode `{kind}-{code}` resource identifiers.
    Resource(resource::ResourceCommand),

    /// Show the effective configuration.
    Config,

    /// Show CLI version.
    Version,
}

impl Cli {
    /// Run the CLI command.
    pub fn run(self, config: Config) -> Result<()> {
        let ctx = CommandContext {
            config,
            format: OutputFormat::from_flag(&self.format),
        };

        match self.command {
            Commands::Mint(cmd) => cmd.run(ctx),
            Commands::Resource(cmd) => cmd.run(ctx),
            Commands::Config => config::show(ctx),
            Commands::Version => {
                println!("ordo {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub format: OutputFormat,
}
