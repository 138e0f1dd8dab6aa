// src/resolver.rs

//! Package identity resolution
//!
//! A lockfile's `dependencies` lists refer to other packages either by bare
//! name (`"syn"`) or, when the lockfile holds several versions of the same
//! crate, by `"name version"` (`"syn 1.0.109"`). The [`IdentityTable`] maps
//! every such reference string to exactly one [`PackageRecord`].
//!
//! The table is built in two strictly sequential passes:
//!
//! 1. Collect every reference string used anywhere into a [`DependencyKeySet`].
//! 2. Walk the packages in source order and key each one by the form the
//!    other packages actually use for it.
//!
//! Whether a package is keyed by bare name depends on how *other* packages
//! refer to it, so the key set must be complete before the first entry is
//! recorded.

use crate::error::{Error, Result};
use crate::lockfile::PackageRecord;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Package URL type used for every identity
pub const PURL_TYPE: &str = "cargo";

/// Canonical package URL: `pkg:cargo/{name}@{version}`
pub fn package_url(name: &str, version: &str) -> String {
    format!("pkg:{PURL_TYPE}/{name}@{version}")
}

impl PackageRecord {
    /// Canonical package URL of this record
    pub fn package_url(&self) -> String {
        package_url(&self.name, &self.version)
    }
}

/// Every dependency-reference string that appears in any package
#[derive(Debug, Default)]
pub struct DependencyKeySet<'a> {
    keys: HashSet<&'a str>,
}

impl<'a> DependencyKeySet<'a> {
    pub fn collect(packages: &'a [PackageRecord]) -> Self {
        let keys = packages
            .iter()
            .flat_map(|p| p.dependencies.iter().map(String::as_str))
            .collect();
        Self { keys }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Frozen mapping from reference string to package
#[derive(Debug)]
pub struct IdentityTable<'a> {
    entries: HashMap<String, &'a PackageRecord>,
}

impl<'a> IdentityTable<'a> {
    /// Build the table for one package list
    ///
    /// Fails with [`Error::AmbiguousIdentity`] if two packages would need the
    /// same key, since picking either one would silently misattribute edges.
    pub fn build(packages: &'a [PackageRecord]) -> Result<Self> {
        let keys = DependencyKeySet::collect(packages);
        let mut builder = TableBuilder::default();

        for package in packages {
            let versioned = package.versioned_key();

            if keys.contains(&package.name) {
                builder.claim(package.name.clone(), package)?;
            } else if keys.contains(&versioned) {
                builder.claim(versioned, package)?;
            } else if builder.is_taken(&package.name) {
                // Unreferenced, and a same-named sibling already holds the bare name.
                builder.claim(versioned, package)?;
            } else {
                builder.claim(package.name.clone(), package)?;
            }
        }

        debug!(
            "Identity table: {} entries from {} packages ({} reference keys)",
            builder.entries.len(),
            packages.len(),
            keys.len()
        );

        Ok(Self {
            entries: builder.entries,
        })
    }

    /// Look up the package a reference string denotes
    pub fn get(&self, reference: &str) -> Option<&'a PackageRecord> {
        self.entries.get(reference).copied()
    }

    /// Resolve a dependency reference of `owner` to its package URL
    pub fn resolve(&self, owner: &PackageRecord, reference: &str) -> Result<String> {
        self.get(reference)
            .map(PackageRecord::package_url)
            .ok_or_else(|| Error::UnresolvedDependency {
                package: owner.package_url(),
                reference: reference.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Default)]
struct TableBuilder<'a> {
    entries: HashMap<String, &'a PackageRecord>,
}

impl<'a> TableBuilder<'a> {
    fn is_taken(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn claim(&mut self, key: String, package: &'a PackageRecord) -> Result<()> {
        match self.entries.entry(key) {
            Entry::Occupied(slot) => Err(Error::AmbiguousIdentity {
                key: slot.key().clone(),
                existing: slot.get().package_url(),
                incoming: package.package_url(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(package);
                Ok(())
            }
        }
    }
}
