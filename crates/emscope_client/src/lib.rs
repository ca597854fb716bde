//! OEM REST client.
//!
//! Thin typed wrapper over the Enterprise Manager REST API: catalog listing
//! with page-token pagination and per-target property fetch. Raw wire rows
//! are normalized into protocol [`Target`] records here so every caller gets
//! the same shape regardless of which field spelling the server used.

pub mod pool;
pub mod wire;

pub use pool::ClientPool;

use async_trait::async_trait;
use emscope_mapping::PropertySource;
use emscope_protocol::{Target, TargetProperties};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Page size for catalog listing.
const TARGETS_PAGE_LIMIT: usize = 2000;
/// Per-request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Client operation result type.
pub type Result<T> = std::result::Result<T, ClientError>;

/// OEM client errors.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport or decode failure (includes HTTP error statuses)
    #[error("OEM request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Pagination link that does not parse as a URL
    #[error("Invalid pagination link: {0}")]
    PaginationLink(#[from] url::ParseError),
}

/// One configured Enterprise Manager endpoint, as stored in
/// `endpoints.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OemEndpoint {
    /// Unique endpoint name used in API calls and cache keys
    pub name: String,
    /// Site label for grouping in exported config
    #[serde(default)]
    pub site: Option<String>,
    /// Base URL of the EM console, with or without the `/em/api` suffix
    pub endpoint: String,
    pub user: String,
    pub password: String,
    #[serde(default)]
    pub verify_ssl: bool,
}

/// HTTP client bound to one OEM endpoint.
pub struct OemClient {
    base: String,
    user: String,
    password: String,
    http: reqwest::Client,
}

impl OemClient {
    /// Build a client for an endpoint definition.
    pub fn connect(endpoint: &OemEndpoint) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .danger_accept_invalid_certs(!endpoint.verify_ssl)
            .build()?;

        Ok(Self {
            base: api_base(&endpoint.endpoint),
            user: endpoint.user.clone(),
            password: endpoint.password.clone(),
            http,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base, path.trim_start_matches('/'));
        let response = self
            .http
            .get(&url)
            .query(params)
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Fetch one page of the flat target catalog.
    pub async fn targets_page(&self, page_token: Option<&str>, limit: usize) -> Result<wire::TargetsPage> {
        let limit = limit.to_string();
        let mut params: Vec<(&str, &str)> = vec![("limit", limit.as_str())];
        if let Some(token) = page_token {
            params.push(("page", token));
        }
        self.get_json("targets", &params).await
    }

    /// Fetch the full flat catalog, following pagination links until the
    /// server stops supplying a next-page token.
    pub async fn all_targets(&self) -> Result<Vec<Target>> {
        let mut targets = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .targets_page(page_token.as_deref(), TARGETS_PAGE_LIMIT)
                .await?;
            targets.extend(page.items.iter().map(wire::RawTarget::normalize));

            page_token = match page.next_page_token()? {
                Some(token) => Some(token),
                None => break,
            };
        }

        debug!(count = targets.len(), "catalog fetched");
        Ok(targets)
    }

    /// Fetch runtime properties for a single target.
    pub async fn properties(&self, target_id: &str) -> Result<TargetProperties> {
        self.get_json(&format!("targets/{}/properties", target_id), &[])
            .await
    }
}

#[async_trait]
impl PropertySource for OemClient {
    async fn target_properties(&self, target_id: &str) -> anyhow::Result<TargetProperties> {
        Ok(self.properties(target_id).await?)
    }
}

/// Normalize a configured endpoint URL to its `…/em/api` REST base.
fn api_base(endpoint: &str) -> String {
    let base = endpoint.trim_end_matches('/');
    if base.ends_with("/em/api") {
        base.to_string()
    } else if base.ends_with("/em") {
        format!("{}/api", base)
    } else {
        format!("{}/em/api", base)
    }
}
