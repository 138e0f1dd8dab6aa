// src/config.rs

//! Submission configuration
//!
//! All values that come from the CI environment are read exactly once by the
//! entry point and carried in a [`SubmissionConfig`]. Library code never reads
//! the process environment itself; tests build configs from a plain map.

use crate::error::{Error, Result};
use crate::snapshot::Job;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};
use url::Url;

/// Lockfile processed when none is named on the command line
pub const DEFAULT_LOCKFILE: &str = "Cargo.Bazel.toml.lock";

/// Public GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Environment variable names
pub mod vars {
    pub const TOKEN: &str = "GITHUB_TOKEN";
    pub const RUN_ID: &str = "GITHUB_RUN_ID";
    pub const WORKFLOW: &str = "GITHUB_WORKFLOW";
    pub const JOB: &str = "GITHUB_JOB";
    pub const PR_SHA: &str = "GITHUB_PR_SHA";
    pub const SHA: &str = "GITHUB_SHA";
    pub const REF: &str = "GITHUB_REF";
    pub const REPOSITORY: &str = "GITHUB_REPOSITORY";
    pub const PR_DIR: &str = "GITHUB_PR_DIR";
    pub const WORKSPACE: &str = "GITHUB_WORKSPACE";
    pub const API_URL: &str = "GITHUB_API_URL";
}

/// A lockfile to process: the project directory and the path inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockfileSource {
    pub basedir: PathBuf,
    /// Logical path, also used as the manifest name
    pub path: String,
}

impl LockfileSource {
    pub fn new(basedir: impl Into<PathBuf>, path: impl Into<String>) -> Self {
        Self {
            basedir: basedir.into(),
            path: path.into(),
        }
    }
}

/// Values the command line may supply ahead of the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub basedir: Option<PathBuf>,
    pub lockfiles: Vec<String>,
    pub api_url: Option<String>,
    pub job_url: Option<String>,
}

/// Everything needed to build and submit one snapshot
#[derive(Clone)]
pub struct SubmissionConfig {
    token: Option<String>,
    pub run_id: String,
    pub correlator: String,
    pub job_url: Option<String>,
    pub sha: String,
    pub git_ref: String,
    pub repository: String,
    pub api_url: Url,
    pub lockfiles: Vec<LockfileSource>,
}

impl SubmissionConfig {
    /// Build a config from an environment lookup and command-line overrides
    ///
    /// `lookup` returns the value of a variable; empty values count as unset.
    pub fn from_lookup<F>(lookup: F, overrides: ConfigOverrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| Error::ConfigError(format!("{key} is not set")))
        };

        let token = get(vars::TOKEN);
        if token.is_none() {
            warn!("{} is not set, dependencies can not be submitted", vars::TOKEN);
        }

        let run_id = require(vars::RUN_ID)?;
        let correlator = format!("{} / {}", require(vars::WORKFLOW)?, require(vars::JOB)?);

        let sha = match get(vars::PR_SHA) {
            Some(sha) => sha,
            None => require(vars::SHA)?,
        };
        let git_ref = require(vars::REF)?;

        let repository = require(vars::REPOSITORY)?;
        validate_repository(&repository)?;

        let api_url = parse_api_url(
            overrides
                .api_url
                .or_else(|| get(vars::API_URL))
                .as_deref()
                .unwrap_or(DEFAULT_API_URL),
        )?;

        let job_url = match overrides.job_url {
            Some(url) => {
                validate_job_url(&url)?;
                Some(url)
            }
            None => None,
        };

        let basedir = resolve_basedir(&lookup, overrides.basedir);

        let lockfiles = if overrides.lockfiles.is_empty() {
            vec![LockfileSource::new(&basedir, DEFAULT_LOCKFILE)]
        } else {
            overrides
                .lockfiles
                .iter()
                .map(|path| LockfileSource::new(&basedir, path.as_str()))
                .collect()
        };

        debug!(
            "Configured submission for {} at {} ({}), {} lockfile(s) under {}",
            repository,
            sha,
            git_ref,
            lockfiles.len(),
            basedir.display()
        );

        Ok(Self {
            token,
            run_id,
            correlator,
            job_url,
            sha,
            git_ref,
            repository,
            api_url,
            lockfiles,
        })
    }

    /// Build a config from the process environment
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// The bearer token, required only when actually submitting
    pub fn token(&self) -> Result<&str> {
        self.token.as_deref().ok_or_else(|| {
            Error::ConfigError(format!(
                "Dependency submission not possible because {} is not set",
                vars::TOKEN
            ))
        })
    }

    /// The job this run reports as
    pub fn job(&self) -> Job {
        let job = Job::new(&self.run_id, &self.correlator);
        match &self.job_url {
            Some(url) => job.with_html_url(url),
            None => job,
        }
    }

    /// `{api}/repos/{owner}/{repo}/dependency-graph/snapshots`
    pub fn snapshot_endpoint(&self) -> Result<Url> {
        self.api_url
            .join(&format!("repos/{}/dependency-graph/snapshots", self.repository))
            .map_err(|e| Error::ConfigError(format!("Invalid snapshot endpoint: {e}")))
    }
}

/// Project directory: explicit value, then the PR checkout, then the workspace
pub fn resolve_basedir<F>(lookup: F, basedir: Option<PathBuf>) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    basedir
        .or_else(|| get(vars::PR_DIR).map(PathBuf::from))
        .or_else(|| get(vars::WORKSPACE).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl fmt::Debug for SubmissionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("run_id", &self.run_id)
            .field("correlator", &self.correlator)
            .field("job_url", &self.job_url)
            .field("sha", &self.sha)
            .field("git_ref", &self.git_ref)
            .field("repository", &self.repository)
            .field("api_url", &self.api_url.as_str())
            .field("lockfiles", &self.lockfiles)
            .finish()
    }
}

fn validate_repository(repository: &str) -> Result<()> {
    match repository.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok(())
        }
        _ => Err(Error::ConfigError(format!(
            "{} must be 'owner/repo', got '{repository}'",
            vars::REPOSITORY
        ))),
    }
}

fn parse_api_url(raw: &str) -> Result<Url> {
    // Url::join drops the last path segment unless it ends with '/'
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };

    let url = Url::parse(&normalized)
        .map_err(|e| Error::ConfigError(format!("Invalid API URL '{raw}': {e}")))?;
    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(Error::ConfigError(format!("API URL must be http(s), got '{raw}'")));
    }
    Ok(url)
}

fn validate_job_url(raw: &str) -> Result<()> {
    Url::parse(raw)
        .map(|_| ())
        .map_err(|e| Error::ConfigError(format!("Invalid job URL '{raw}': {e}")))
}
