// src/lib.rs

//! depsnap - Cargo lockfile dependency snapshots for the GitHub dependency graph
//!
//! Converts Cargo-style lockfiles into the dependency snapshot payload of the
//! GitHub dependency submission API and submits it from a CI job.
//!
//! # Architecture
//!
//! - Lockfile: `[[package]]` records read with `toml`
//! - Resolver: two-pass identity table mapping dependency references to packages
//! - Manifest: one resolved dependency graph per lockfile, keyed by package URL
//! - Snapshot: manifests plus job, detector and commit provenance
//! - Transport: a single authenticated POST, only `201 Created` succeeds

pub mod config;
mod error;
pub mod lockfile;
pub mod manifest;
pub mod resolver;
pub mod snapshot;
pub mod transport;

pub use config::{ConfigOverrides, LockfileSource, SubmissionConfig, DEFAULT_LOCKFILE};
pub use error::{Error, Result};
pub use lockfile::{Lockfile, PackageRecord};
pub use manifest::{build_manifest, load_manifest, load_manifests, Manifest, ResolvedDependency};
pub use resolver::{package_url, DependencyKeySet, IdentityTable};
pub use snapshot::{assemble_snapshot, Detector, Job, Snapshot, SNAPSHOT_VERSION};
pub use transport::{submit_snapshot, HttpTransport, SnapshotTransport};
