//! CLI for the retarget URL rewriting engine.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use retarget_core::config::{self, RetargetConfig};
use std::path::{Path, PathBuf};

use commands::{run_extract, run_normalize, run_replay, run_rewrite};

/// Top-level CLI for retarget.
#[derive(Debug, Parser)]
#[command(name = "retarget")]
#[command(about = "retarget: rewrite and discover URLs in intercepted web content", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/retarget/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Rewrite embedded URLs in a file so they point at a new origin.
    Rewrite {
        /// File holding the decoded response body.
        path: PathBuf,
        /// Content-Type of the body (only script types are rewritten by default).
        #[arg(long, default_value = "application/javascript")]
        content_type: String,
        /// Target scheme, e.g. http.
        #[arg(long, default_value = "http")]
        scheme: String,
        /// Target authority, e.g. 192.168.0.16:3007.
        #[arg(long, value_name = "HOST:PORT")]
        host_port: String,
        /// Write the result here instead of stdout.
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print network endpoints referenced by a JavaScript (or HTML) file.
    Extract {
        /// Path to the script.
        path: PathBuf,
        /// URL the script was served from; relative candidates resolve against it.
        #[arg(long)]
        base_url: String,
        /// Extra allowed host (repeatable). Defaults to the configured target domains.
        #[arg(long = "allow", value_name = "HOST")]
        allow: Vec<String>,
        /// Treat the file as HTML and scan its inline <script> elements.
        #[arg(long)]
        html: bool,
    },

    /// Replay the responses in a HAR file through the response hook.
    Replay {
        /// Path to the HAR file.
        path: PathBuf,
        /// Write discovered URLs as JSON to this file.
        #[arg(long, value_name = "JSON")]
        export: Option<PathBuf>,
    },

    /// Print the normalized form of each URL.
    Normalize {
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

fn load_config(path: Option<&Path>) -> Result<RetargetConfig> {
    match path {
        Some(p) => config::load_from(p),
        None => config::load_or_init(),
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Normalize { urls } => run_normalize(&urls),
            command => {
                let cfg = load_config(cli.config.as_deref())?;
                tracing::debug!("loaded config: {:?}", cfg);
                command.run(&cfg)
            }
        }
    }

    fn run(self, cfg: &RetargetConfig) -> Result<()> {
        match self {
            CliCommand::Rewrite {
                path,
                content_type,
                scheme,
                host_port,
                output,
            } => run_rewrite(cfg, &path, &content_type, &scheme, &host_port, output.as_deref()),
            CliCommand::Extract {
                path,
                base_url,
                allow,
                html,
            } => run_extract(cfg, &path, &base_url, &allow, html),
            CliCommand::Replay { path, export } => run_replay(cfg, &path, export.as_deref()),
            CliCommand::Normalize { urls } => run_normalize(&urls),
        }
    }
}

#[cfg(test)]
mod tests;
