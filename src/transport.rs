// src/transport.rs

//! Snapshot submission
//!
//! One authenticated POST per run. Only `201 Created` counts as success;
//! every other status, and any failure to reach the server, is a
//! [`Error::SubmissionError`]. There are no retries: the unit of
//! submission is the whole snapshot.

use crate::error::{Error, Result};
use crate::snapshot::Snapshot;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, error, info};
use url::Url;

/// Status returned when a snapshot is accepted
pub const STATUS_CREATED: u16 = 201;

/// REST API version the payload shape corresponds to
pub const API_VERSION: &str = "2022-11-28";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Sends a serialized snapshot and reports the HTTP status
///
/// Implementations return `Err(detail)` only when no response was received.
pub trait SnapshotTransport {
    fn post(&self, url: &Url, token: &str, body: &str) -> std::result::Result<u16, String>;
}

/// HTTPS transport backed by a blocking reqwest client
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the default network timeouts
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl SnapshotTransport for HttpTransport {
    fn post(&self, url: &Url, token: &str, body: &str) -> std::result::Result<u16, String> {
        let response = self
            .client
            .post(url.clone())
            .bearer_auth(token)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .map_err(|e| format!("Failed to reach {url}: {e}"))?;

        let status = response.status();
        if status.as_u16() != STATUS_CREATED {
            // The platform explains rejections in the body
            if let Ok(text) = response.text() {
                debug!("Response body: {}", text);
            }
        }
        Ok(status.as_u16())
    }
}

/// Submit a snapshot through `transport`
pub fn submit_snapshot(
    transport: &dyn SnapshotTransport,
    endpoint: &Url,
    token: &str,
    snapshot: &Snapshot,
) -> Result<()> {
    let body = snapshot.to_json()?;

    debug!("Submitting request to {}", endpoint);
    debug!("With body: {}", body);

    match transport.post(endpoint, token, &body) {
        Ok(STATUS_CREATED) => {
            info!(
                "Submitted {} manifest(s) with {} packages for {}",
                snapshot.manifests().len(),
                snapshot.package_count(),
                snapshot.sha()
            );
            Ok(())
        }
        Ok(status) => {
            error!("Dependency submission rejected with status {}, body: {}", status, body);
            Err(Error::SubmissionError {
                status: Some(status),
                detail: format!("status code {status}"),
                body,
            })
        }
        Err(detail) => {
            error!("Dependency submission failed: {}, body: {}", detail, body);
            Err(Error::SubmissionError {
                status: None,
                detail,
                body,
            })
        }
    }
}
