//! CLI for the fetchguard validator.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fetchguard_core::config;

use commands::{run_check, run_probe, run_rules, CheckOptions};

/// Exit status when every URL passed.
pub const EXIT_SAFE: i32 = 0;
/// Exit status when at least one URL was blocked.
pub const EXIT_BLOCKED: i32 = 2;

/// Top-level CLI for fetchguard.
#[derive(Debug, Parser)]
#[command(name = "fetchguard")]
#[command(about = "Check URLs against SSRF rules before fetching them", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Validate one or more URLs.
    Check {
        /// URLs to validate.
        #[arg(required = true)]
        urls: Vec<String>,
        /// Skip DNS resolution (literal checks only).
        #[arg(long)]
        offline: bool,
        /// Print each verdict as a JSON object.
        #[arg(long)]
        json: bool,
        /// DNS timeout in milliseconds (overrides config).
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,
    },

    /// Probe a URL's metadata, revalidating every redirect hop.
    Probe {
        /// URL to probe.
        url: String,
    },

    /// Print the compiled-in classification rules.
    Rules,
}

impl Cli {
    /// Parse arguments, run the command, and return the process exit status.
    pub async fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Check {
                urls,
                offline,
                json,
                timeout_ms,
            } => {
                if let Some(ms) = timeout_ms {
                    cfg.resolve_timeout_ms = ms;
                    cfg.check()?;
                }
                run_check(&cfg, &urls, CheckOptions { offline, json }).await
            }
            CliCommand::Probe { url } => run_probe(&cfg, &url).await,
            CliCommand::Rules => {
                run_rules();
                Ok(EXIT_SAFE)
            }
        }
    }
}
