// src/cli.rs
//! CLI definitions for depsnap
//!
//! This module contains the command-line interface definitions using clap.
//! The command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use depsnap::DEFAULT_LOCKFILE;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "depsnap")]
#[command(author, version)]
#[command(about = "Submit Cargo lockfile dependency snapshots to the GitHub dependency graph", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve lockfiles and submit a dependency snapshot
    Submit {
        /// Lockfile paths relative to the base directory
        #[arg(default_value = DEFAULT_LOCKFILE)]
        lockfiles: Vec<String>,

        #[command(flatten)]
        location: LocationArgs,

        /// API base URL (default: $GITHUB_API_URL or https://api.github.com)
        #[arg(long)]
        api_url: Option<String>,

        /// Link to the CI run, reported as the job's html_url
        #[arg(long)]
        job_url: Option<String>,

        /// Print the snapshot payload instead of submitting it
        #[arg(long)]
        dry_run: bool,
    },

    /// Resolve a single lockfile and print its manifest
    Manifest {
        /// Lockfile path relative to the base directory
        #[arg(default_value = DEFAULT_LOCKFILE)]
        lockfile: String,

        #[command(flatten)]
        location: LocationArgs,
    },
}

#[derive(Args)]
pub struct LocationArgs {
    /// Project directory containing the lockfiles
    /// (default: $GITHUB_PR_DIR, $GITHUB_WORKSPACE, or the current directory)
    #[arg(short, long)]
    pub basedir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_submit_defaults() {
        let cli = Cli::try_parse_from(["depsnap", "submit"]).unwrap();
        match cli.command {
            Commands::Submit {
                lockfiles,
                location,
                dry_run,
                ..
            } => {
                assert_eq!(lockfiles, vec![DEFAULT_LOCKFILE.to_string()]);
                assert!(location.basedir.is_none());
                assert!(!dry_run);
            }
            Commands::Manifest { .. } => panic!("expected submit"),
        }
    }

    #[test]
    fn test_submit_multiple_lockfiles() {
        let cli = Cli::try_parse_from([
            "depsnap",
            "submit",
            "Cargo.lock",
            "tools/Cargo.lock",
            "--basedir",
            "/src",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Commands::Submit {
                lockfiles,
                location,
                dry_run,
                ..
            } => {
                assert_eq!(lockfiles, vec!["Cargo.lock", "tools/Cargo.lock"]);
                assert_eq!(location.basedir, Some(PathBuf::from("/src")));
                assert!(dry_run);
            }
            Commands::Manifest { .. } => panic!("expected submit"),
        }
    }
}
