// src/lockfile.rs

//! Lockfile reader
//!
//! Reads Cargo-style lockfiles (`Cargo.lock`, `Cargo.Bazel.toml.lock`). Only the
//! `[[package]]` table array is consumed; every other field is ignored.
//!
//! ```toml
//! version = 3
//!
//! [[package]]
//! name = "serde"
//! version = "1.0.200"
//! dependencies = [
//!     "serde_derive",
//!     "syn 2.0.60",
//! ]
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A single `[[package]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    /// Dependency references, either `"name"` or `"name version"`
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl PackageRecord {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            dependencies: Vec::new(),
        }
    }

    /// Builder-style helper to attach dependency references
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// The `"name version"` form used to disambiguate same-named packages
    pub fn versioned_key(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}

/// The parsed package list of one lockfile
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Lockfile {
    #[serde(default, rename = "package")]
    pub packages: Vec<PackageRecord>,
}

impl Lockfile {
    /// Parse lockfile text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid lockfile: {e}")))
    }

    /// Read and parse a lockfile from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::IoError(format!("Failed to read lockfile {}: {e}", path.display()))
        })?;

        let lockfile = Self::parse(&content).map_err(|e| match e {
            Error::ParseError(msg) => Error::ParseError(format!("{}: {msg}", path.display())),
            other => other,
        })?;

        debug!(
            "Loaded {} packages from {}",
            lockfile.packages.len(),
            path.display()
        );
        Ok(lockfile)
    }
}
