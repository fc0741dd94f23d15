//! CLI for docfetch.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use docfetch_core::config;
use std::path::{Path, PathBuf};

use commands::{run_checksum, run_fetch, run_inspect, run_serve};

/// Top-level CLI for docfetch.
#[derive(Debug, Parser)]
#[command(name = "docfetch")]
#[command(about = "docfetch: retrieve stored documents by URL, whatever type they were uploaded as", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run the HTTP download endpoint.
    Serve {
        /// Address to bind (overrides config and DOCFETCH_BIND).
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Resolve a document URL and save the document to disk.
    Fetch {
        /// Stored document URL.
        url: String,

        /// Directory to write into (default: current directory).
        #[arg(long, short = 'o', value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Show the extracted identifier and probe order for a URL, without calling the provider.
    Inspect {
        /// Stored document URL.
        url: String,
    },

    /// Compute SHA-256 of a file (e.g. after fetch).
    Checksum {
        /// Path to the file.
        path: String,
    },
}

impl CliCommand {
    pub fn is_foreground_server(&self) -> bool {
        matches!(self, CliCommand::Serve { .. })
    }

    pub async fn run(self) -> Result<()> {
        let cfg = config::load()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match self {
            CliCommand::Serve { bind } => run_serve(&cfg, bind.as_deref()).await?,
            CliCommand::Fetch { url, output_dir } => {
                let output_dir = match output_dir {
                    Some(dir) => dir,
                    None => std::env::current_dir()?,
                };
                run_fetch(&cfg, &url, &output_dir).await?;
            }
            CliCommand::Inspect { url } => run_inspect(&cfg, &url)?,
            CliCommand::Checksum { path } => run_checksum(Path::new(&path))?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
