//! CLI for DBX, the Dropbox share-link media extractor.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dbx_core::config;
use std::path::PathBuf;

use commands::{run_check, run_extract, run_formats};

/// Top-level CLI for DBX.
#[derive(Debug, Parser)]
#[command(name = "dbx")]
#[command(about = "DBX: extract video formats from Dropbox share links", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Share link plus everything needed to get past its password wall.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Dropbox share URL (`/s/`, `/sh/`, `/scl/fi/` or `/e/scl/fi/`).
    pub url: String,

    /// Password of a protected share link.
    #[arg(long, value_name = "PASSWORD")]
    pub video_password: Option<String>,

    /// Netscape cookies.txt to load (overrides `cookies_file` in config).
    #[arg(long, value_name = "FILE")]
    pub cookies: Option<PathBuf>,

    /// HAR capture whose cookies are added on top.
    #[arg(long, value_name = "FILE")]
    pub har: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Extract a share link and print the result as JSON.
    Extract {
        #[command(flatten)]
        source: SourceArgs,

        /// Print JSON on a single line.
        #[arg(long)]
        compact: bool,
    },

    /// Extract a share link and list its formats.
    Formats {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Show the id and title of a share link without fetching it.
    Check {
        /// Dropbox share URL.
        url: String,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        if let CliCommand::Check { url } = &cli.command {
            return run_check(url);
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Extract { source, compact } => run_extract(&cfg, &source, compact)?,
            CliCommand::Formats { source } => run_formats(&cfg, &source)?,
            CliCommand::Check { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
