// src/commands.rs
//! Command handlers for the depsnap CLI

use anyhow::{Context, Result};
use depsnap::config::resolve_basedir;
use depsnap::{
    assemble_snapshot, load_manifest, submit_snapshot, ConfigOverrides, Detector, HttpTransport,
    SubmissionConfig,
};
use std::path::PathBuf;
use tracing::info;

/// Options for `depsnap submit`
pub struct SubmitOptions {
    pub lockfiles: Vec<String>,
    pub basedir: Option<PathBuf>,
    pub api_url: Option<String>,
    pub job_url: Option<String>,
    pub dry_run: bool,
}

/// Resolve the configured lockfiles and submit (or print) the snapshot
pub fn cmd_submit(options: SubmitOptions) -> Result<()> {
    let overrides = ConfigOverrides {
        basedir: options.basedir,
        lockfiles: options.lockfiles,
        api_url: options.api_url,
        job_url: options.job_url,
    };
    let config = SubmissionConfig::from_env(overrides).context("Invalid CI configuration")?;

    let snapshot = assemble_snapshot(&config, Detector::default())
        .context("Failed to build dependency snapshot")?;

    if options.dry_run {
        info!("Dry run, not submitting");
        println!("{}", snapshot.to_json_pretty()?);
        return Ok(());
    }

    let token = config.token()?;
    let endpoint = config.snapshot_endpoint()?;
    let transport = HttpTransport::new()?;

    submit_snapshot(&transport, &endpoint, token, &snapshot)
        .with_context(|| format!("Failed to submit snapshot to {endpoint}"))?;

    println!(
        "Submitted {} packages from {} manifest(s) for {}",
        snapshot.package_count(),
        snapshot.manifests().len(),
        config.repository
    );
    Ok(())
}

/// Resolve one lockfile and print its manifest
pub fn cmd_manifest(lockfile: &str, basedir: Option<PathBuf>) -> Result<()> {
    let basedir = resolve_basedir(|key| std::env::var(key).ok(), basedir);
    let manifest = load_manifest(&basedir, lockfile)
        .with_context(|| format!("Failed to resolve {}", basedir.join(lockfile).display()))?;

    println!("{}", serde_json::to_string_pretty(&manifest)?);
    Ok(())
}
