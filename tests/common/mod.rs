// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use depsnap::config::vars;
use depsnap::{ConfigOverrides, Result, SnapshotTransport, SubmissionConfig};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;
use url::Url;

/// A Cargo.Bazel.toml.lock with two versions of `syn`.
pub const BAZEL_LOCKFILE: &str = r#"
version = 3

[[package]]
name = "direct_cargo_bazel_deps"
version = "0.0.1"
dependencies = [
 "anyhow",
 "serde",
 "serde_derive",
 "legacy_macro",
]

[[package]]
name = "anyhow"
version = "1.0.86"
source = "registry+https://github.com/rust-lang/crates.io-index"
checksum = "b3d1d046238990b9cf5bcde22a3fb3584ee5cf65fb2765f454ed428c7a0063da"

[[package]]
name = "legacy_macro"
version = "0.3.0"
dependencies = [
 "proc-macro2",
 "syn 1.0.109",
]

[[package]]
name = "proc-macro2"
version = "1.0.82"
dependencies = [
 "unicode-ident",
]

[[package]]
name = "quote"
version = "1.0.36"
dependencies = [
 "proc-macro2",
]

[[package]]
name = "serde"
version = "1.0.200"
dependencies = [
 "serde_derive",
]

[[package]]
name = "serde_derive"
version = "1.0.200"
dependencies = [
 "proc-macro2",
 "quote",
 "syn 2.0.60",
]

[[package]]
name = "syn"
version = "1.0.109"
dependencies = [
 "proc-macro2",
 "quote",
 "unicode-ident",
]

[[package]]
name = "syn"
version = "2.0.60"
dependencies = [
 "proc-macro2",
 "quote",
 "unicode-ident",
]

[[package]]
name = "unicode-ident"
version = "1.0.12"
"#;

/// Write `files` (relative path, contents) into a fresh temporary directory.
///
/// Returns the TempDir - keep it alive to prevent cleanup.
pub fn write_project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }
    dir
}

/// The environment a GitHub Actions job would provide, rooted at `workspace`.
pub fn ci_env(workspace: &Path) -> HashMap<String, String> {
    HashMap::from([
        (vars::TOKEN.to_string(), "ghs_test_token".to_string()),
        (vars::RUN_ID.to_string(), "7001".to_string()),
        (vars::WORKFLOW.to_string(), "CI".to_string()),
        (vars::JOB.to_string(), "dependencies".to_string()),
        (vars::SHA.to_string(), "0123456789abcdef".to_string()),
        (vars::REF.to_string(), "refs/heads/main".to_string()),
        (vars::REPOSITORY.to_string(), "octo/widgets".to_string()),
        (vars::WORKSPACE.to_string(), workspace.display().to_string()),
    ])
}

pub fn config_from(env: &HashMap<String, String>, lockfiles: &[&str]) -> Result<SubmissionConfig> {
    let overrides = ConfigOverrides {
        lockfiles: lockfiles.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    };
    SubmissionConfig::from_lookup(|key| env.get(key).cloned(), overrides)
}

/// A recorded POST
#[derive(Debug, Clone)]
pub struct Request {
    pub url: String,
    pub token: String,
    pub body: String,
}

/// Transport that records requests and replies with a fixed status.
pub struct RecordingTransport {
    status: u16,
    pub requests: RefCell<Vec<Request>>,
}

impl RecordingTransport {
    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn last_body(&self) -> serde_json::Value {
        let requests = self.requests.borrow();
        let request = requests.last().expect("no request recorded");
        serde_json::from_str(&request.body).unwrap()
    }
}

impl SnapshotTransport for RecordingTransport {
    fn post(&self, url: &Url, token: &str, body: &str) -> std::result::Result<u16, String> {
        self.requests.borrow_mut().push(Request {
            url: url.to_string(),
            token: token.to_string(),
            body: body.to_string(),
        });
        Ok(self.status)
    }
}
