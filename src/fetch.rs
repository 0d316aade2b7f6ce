//! # Forge Metadata Requests
//!
//! Issues the fixed set of HTTP requests the collector needs: repository
//! metadata, latest release, a contributor sample, and the documentation
//! mirror page. Every request yields a [`FetchResult`] of the same shape:
//!
//! - a real response (any status, 4xx/5xx included) keeps its status, headers
//!   and body;
//! - a transport failure (DNS, refused connection, timeout) becomes
//!   `status == 0` with empty headers and body.
//!
//! Nothing here decides whether a response is "good". Interpretation happens
//! when the snapshot is assembled.

use crate::error::{Error, Result};
use crate::reference::RepositoryIdentity;
use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, ACCEPT, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Status, headers and body of one request. `status == 0` means no response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResult {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl FetchResult {
    /// The transport-failure value.
    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The requests made for every repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Repository,
    LatestRelease,
    Contributors,
    DocsMirror,
}

impl Endpoint {
    pub const ALL: [Endpoint; 4] = [
        Endpoint::Repository,
        Endpoint::LatestRelease,
        Endpoint::Contributors,
        Endpoint::DocsMirror,
    ];

    /// File stem used for the raw evidence of this endpoint.
    pub fn stem(self) -> &'static str {
        match self {
            Endpoint::Repository => "repo",
            Endpoint::LatestRelease => "release",
            Endpoint::Contributors => "contributors",
            Endpoint::DocsMirror => "deepwiki",
        }
    }

    /// File name for the response body.
    pub fn body_file(self) -> String {
        match self {
            Endpoint::DocsMirror => format!("{}.html", self.stem()),
            _ => format!("{}.json", self.stem()),
        }
    }

    /// Only forge API calls carry the bearer token.
    pub fn is_authenticated(self) -> bool {
        !matches!(self, Endpoint::DocsMirror)
    }
}

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Forge API root, e.g. `https://api.github.com`.
    pub api_base: String,
    /// Documentation mirror root, e.g. `https://deepwiki.com`.
    pub mirror_base: String,
    pub token: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
    pub contributors_page_size: u32,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            api_base: crate::defaults::DEFAULT_API_BASE.to_string(),
            mirror_base: crate::defaults::DEFAULT_MIRROR_BASE.to_string(),
            token: None,
            timeout: Duration::from_secs(crate::defaults::DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: crate::defaults::user_agent(),
            contributors_page_size: 100,
        }
    }
}

/// One [`FetchResult`] per [`Endpoint`].
#[derive(Debug, Clone, Default)]
pub struct MetadataBundle {
    pub repository: FetchResult,
    pub release: FetchResult,
    pub contributors: FetchResult,
    pub mirror: FetchResult,
}

impl MetadataBundle {
    pub fn get(&self, endpoint: Endpoint) -> &FetchResult {
        match endpoint {
            Endpoint::Repository => &self.repository,
            Endpoint::LatestRelease => &self.release,
            Endpoint::Contributors => &self.contributors,
            Endpoint::DocsMirror => &self.mirror,
        }
    }

    fn slot(&mut self, endpoint: Endpoint) -> &mut FetchResult {
        match endpoint {
            Endpoint::Repository => &mut self.repository,
            Endpoint::LatestRelease => &mut self.release,
            Endpoint::Contributors => &mut self.contributors,
            Endpoint::DocsMirror => &mut self.mirror,
        }
    }
}

pub struct MetadataFetcher {
    client: Client,
    config: FetcherConfig,
}

impl MetadataFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::FetchFailed {
                url: config.api_base.clone(),
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client, config })
    }

    pub fn endpoint_url(&self, endpoint: Endpoint, identity: &RepositoryIdentity) -> String {
        let api = self.config.api_base.trim_end_matches('/');
        let owner = identity.owner();
        let name = identity.name();
        match endpoint {
            Endpoint::Repository => format!("{}/repos/{}/{}", api, owner, name),
            Endpoint::LatestRelease => format!("{}/repos/{}/{}/releases/latest", api, owner, name),
            Endpoint::Contributors => format!(
                "{}/repos/{}/{}/contributors?per_page={}&anon=true",
                api, owner, name, self.config.contributors_page_size
            ),
            Endpoint::DocsMirror => format!(
                "{}/{}/{}",
                self.config.mirror_base.trim_end_matches('/'),
                owner,
                name
            ),
        }
    }

    /// Request every endpoint once, sequentially.
    pub fn fetch_all(&self, identity: &RepositoryIdentity) -> MetadataBundle {
        let mut bundle = MetadataBundle::default();
        for endpoint in Endpoint::ALL {
            *bundle.slot(endpoint) = self.fetch(endpoint, identity);
        }
        bundle
    }

    pub fn fetch(&self, endpoint: Endpoint, identity: &RepositoryIdentity) -> FetchResult {
        let url = self.endpoint_url(endpoint, identity);
        match self.try_fetch(&url, endpoint.is_authenticated()) {
            Ok(result) => {
                debug!("GET {} -> {}", url, result.status);
                result
            }
            Err(e) => {
                warn!("{}", e);
                FetchResult::unreachable()
            }
        }
    }

    fn try_fetch(&self, url: &str, authenticated: bool) -> Result<FetchResult> {
        let mut request = self
            .client
            .get(url)
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, "application/vnd.github+json");

        if authenticated {
            if let Some(token) = self.config.token.as_deref().filter(|t| !t.is_empty()) {
                request = request.bearer_auth(token);
            }
        }

        let response = request.send().map_err(|e| Error::FetchFailed {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let headers = flatten_headers(response.headers());
        let body = match response.text() {
            Ok(body) => body,
            Err(e) => {
                warn!("failed to read body of {} ({}): {}", url, status, e);
                String::new()
            }
        };

        Ok(FetchResult {
            status,
            headers,
            body,
        })
    }
}

fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        flat.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    flat
}
