// src/snapshot.rs

//! Dependency snapshot assembly
//!
//! A [`Snapshot`] is the full submission payload for one commit: the
//! manifests plus provenance (job, detector, commit, ref, scan time).
//! No resolution happens here; this module only packs and serializes.

use crate::config::SubmissionConfig;
use crate::error::{Error, Result};
use crate::manifest::{Manifest, load_manifests};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::collections::HashSet;
use tracing::info;

/// Snapshot schema version understood by the platform
pub const SNAPSHOT_VERSION: u32 = 0;

/// Wire format of the `scanned` timestamp
pub const SCANNED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// The CI job that produced a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub id: String,
    /// Groups submissions of the same logical job across runs
    pub correlator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
}

impl Job {
    pub fn new(id: impl Into<String>, correlator: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            correlator: correlator.into(),
            html_url: None,
        }
    }

    pub fn with_html_url(mut self, html_url: impl Into<String>) -> Self {
        self.html_url = Some(html_url.into());
        self
    }
}

/// The tool that produced a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detector {
    pub name: String,
    pub version: String,
    pub url: String,
}

impl Detector {
    pub fn new(name: impl Into<String>, version: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            url: url.into(),
        }
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_REPOSITORY"),
        )
    }
}

/// A dependency snapshot request
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    version: u32,
    job: Job,
    sha: String,
    #[serde(rename = "ref")]
    git_ref: String,
    detector: Detector,
    /// Serialized as an object keyed by manifest name, in insertion order
    #[serde(serialize_with = "serialize_manifests")]
    manifests: Vec<Manifest>,
    #[serde(serialize_with = "serialize_scanned")]
    scanned: DateTime<Utc>,
}

impl Snapshot {
    /// Assemble a snapshot, capturing the scan time now
    pub fn new(
        job: Job,
        sha: impl Into<String>,
        git_ref: impl Into<String>,
        detector: Detector,
        manifests: Vec<Manifest>,
    ) -> Result<Self> {
        Self::with_scanned(job, sha, git_ref, detector, manifests, Utc::now())
    }

    /// Assemble a snapshot with an explicit scan time
    pub fn with_scanned(
        job: Job,
        sha: impl Into<String>,
        git_ref: impl Into<String>,
        detector: Detector,
        manifests: Vec<Manifest>,
        scanned: DateTime<Utc>,
    ) -> Result<Self> {
        let mut names = HashSet::new();
        for manifest in &manifests {
            if !names.insert(manifest.name.as_str()) {
                return Err(Error::DuplicateManifest(manifest.name.clone()));
            }
        }

        Ok(Self {
            version: SNAPSHOT_VERSION,
            job,
            sha: sha.into(),
            git_ref: git_ref.into(),
            detector,
            manifests,
            scanned,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn sha(&self) -> &str {
        &self.sha
    }

    pub fn git_ref(&self) -> &str {
        &self.git_ref
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    pub fn manifests(&self) -> &[Manifest] {
        &self.manifests
    }

    /// Scan time in wire format
    pub fn scanned(&self) -> String {
        self.scanned.format(SCANNED_FORMAT).to_string()
    }

    /// Total resolved packages across all manifests
    pub fn package_count(&self) -> usize {
        self.manifests.iter().map(Manifest::len).sum()
    }

    /// Serialize to the wire JSON body
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::ParseError(format!("Failed to serialize snapshot: {e}")))
    }

    /// Serialize to indented JSON for display
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::ParseError(format!("Failed to serialize snapshot: {e}")))
    }
}

/// Resolve every configured lockfile and assemble the snapshot for this run
pub fn assemble_snapshot(config: &SubmissionConfig, detector: Detector) -> Result<Snapshot> {
    let manifests = load_manifests(&config.lockfiles)?;
    let snapshot = Snapshot::new(
        config.job(),
        config.sha.as_str(),
        config.git_ref.as_str(),
        detector,
        manifests,
    )?;

    info!(
        "Assembled snapshot for {} ({} manifest(s), {} packages)",
        snapshot.sha(),
        snapshot.manifests().len(),
        snapshot.package_count()
    );
    Ok(snapshot)
}

fn serialize_manifests<S>(
    manifests: &[Manifest],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(manifests.len()))?;
    for manifest in manifests {
        map.serialize_entry(&manifest.name, manifest)?;
    }
    map.end()
}

fn serialize_scanned<S>(
    scanned: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&scanned.format(SCANNED_FORMAT))
}
