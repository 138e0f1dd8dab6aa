// src/manifest.rs

//! Manifest construction
//!
//! A [`Manifest`] is the platform's unit of dependency information: one per
//! lockfile, with one [`ResolvedDependency`] per package listing the package
//! URLs of its direct dependencies.

use crate::config::LockfileSource;
use crate::error::{Error, Result};
use crate::lockfile::{Lockfile, PackageRecord};
use crate::resolver::IdentityTable;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// A package and the package URLs of its direct dependencies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependency {
    pub package_url: String,
    /// Direct dependencies in lockfile order, duplicates preserved
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl ResolvedDependency {
    pub fn new(package_url: impl Into<String>, dependencies: Vec<String>) -> Self {
        Self {
            package_url: package_url.into(),
            dependencies,
        }
    }
}

/// Resolved dependency information for one lockfile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub name: String,
    pub file: ManifestFile,
    /// Serialized as an object keyed by package URL
    #[serde(serialize_with = "serialize_resolved")]
    pub resolved: Vec<ResolvedDependency>,
}

/// Where the manifest came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestFile {
    pub source_location: String,
}

impl Manifest {
    /// Create an empty manifest whose name and source location are both `path`
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: path.clone(),
            file: ManifestFile {
                source_location: path,
            },
            resolved: Vec::new(),
        }
    }

    /// Add a resolved entry
    ///
    /// The wire format keys entries by package URL, so an entry with a URL
    /// already present replaces the earlier one in place.
    pub fn push(&mut self, entry: ResolvedDependency) {
        match self
            .resolved
            .iter_mut()
            .find(|r| r.package_url == entry.package_url)
        {
            Some(existing) => {
                debug!("Duplicate package {} in {}", entry.package_url, self.name);
                *existing = entry;
            }
            None => self.resolved.push(entry),
        }
    }

    /// Look up the entry for a package URL
    pub fn get(&self, package_url: &str) -> Option<&ResolvedDependency> {
        self.resolved.iter().find(|r| r.package_url == package_url)
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

fn serialize_resolved<S>(
    resolved: &[ResolvedDependency],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(resolved.len()))?;
    for entry in resolved {
        map.serialize_entry(&entry.package_url, entry)?;
    }
    map.end()
}

/// Resolve a package list into a manifest labelled `path`
pub fn build_manifest(path: impl Into<String>, packages: &[PackageRecord]) -> Result<Manifest> {
    let table = IdentityTable::build(packages)?;
    let mut manifest = Manifest::new(path);

    for package in packages {
        let dependencies = package
            .dependencies
            .iter()
            .map(|reference| table.resolve(package, reference))
            .collect::<Result<Vec<_>>>()?;

        manifest.push(ResolvedDependency::new(package.package_url(), dependencies));
    }

    Ok(manifest)
}

/// Read `basedir/path` and resolve it into a manifest labelled `path`
///
/// `path` is the logical location relative to the project directory, which
/// keeps manifest names stable across checkouts.
pub fn load_manifest(basedir: &Path, path: &str) -> Result<Manifest> {
    let full_path = basedir.join(path);
    info!("Resolving lockfile {}", full_path.display());

    let lockfile = Lockfile::load(&full_path)?;
    let manifest = build_manifest(path, &lockfile.packages)?;

    info!("Resolved {} packages from {}", manifest.len(), path);
    Ok(manifest)
}

/// Resolve every configured lockfile, in order
pub fn load_manifests(sources: &[LockfileSource]) -> Result<Vec<Manifest>> {
    if sources.is_empty() {
        return Err(Error::ConfigError("No lockfiles provided".to_string()));
    }

    sources
        .iter()
        .map(|source| load_manifest(&source.basedir, &source.path))
        .collect()
}
