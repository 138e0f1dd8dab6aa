// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use commands::SubmitOptions;

fn main() -> Result<()> {
    // Logs go to stderr so `--dry-run` output stays clean JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Submit {
            lockfiles,
            location,
            api_url,
            job_url,
            dry_run,
        } => commands::cmd_submit(SubmitOptions {
            lockfiles,
            basedir: location.basedir,
            api_url,
            job_url,
            dry_run,
        }),
        Commands::Manifest { lockfile, location } => {
            commands::cmd_manifest(&lockfile, location.basedir)
        }
    }
}
