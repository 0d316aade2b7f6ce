//! # Repository References
//!
//! Parses user-supplied repository strings into a [`RepositoryIdentity`].
//!
//! Two input forms are accepted for the configured [`Forge`]:
//!
//! - SSH shorthand: `git@<host>:<owner>/<name>[.git]`
//! - HTTPS URLs: `https://[www.]<host>/<owner>/<name>[.git][/anything...]`
//!
//! Only the first two path segments of a URL are used. Query strings,
//! fragments, credentials and trailing path segments (`/tree/main`, ...) are
//! dropped, so every accepted form of the same repository yields the same
//! canonical URL `https://<host>/<owner>/<name>`.
//!
//! Parsing is pure. Nothing here touches the filesystem or the network, so a
//! bad reference is rejected before any clone or request is attempted.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// The code forge whose repositories can be collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forge {
    /// Bare host name, e.g. `github.com`.
    pub host: String,
}

impl Forge {
    /// Creates a forge for `host`, normalized to lowercase without a `www.` prefix.
    pub fn new(host: &str) -> Self {
        let host = host.trim().to_ascii_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
        Self { host }
    }

    /// The default forge, GitHub.
    pub fn github() -> Self {
        Self::new("github.com")
    }

    fn accepts_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host);
        host == self.host
    }
}

impl Default for Forge {
    fn default() -> Self {
        Self::github()
    }
}

/// Normalized owner/name/URL triple for a remote repository.
///
/// Two identities are equal when owner and name match case-insensitively.
#[derive(Debug, Clone)]
pub struct RepositoryIdentity {
    owner: String,
    name: String,
    canonical_url: String,
}

impl RepositoryIdentity {
    fn new(forge: &Forge, owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
            canonical_url: format!("https://{}/{}/{}", forge.host, owner, name),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `https://<host>/<owner>/<name>`, never carrying a query or fragment.
    pub fn canonical_url(&self) -> &str {
        &self.canonical_url
    }

    /// `owner/name`
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl PartialEq for RepositoryIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.owner.eq_ignore_ascii_case(&other.owner) && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for RepositoryIdentity {}

impl fmt::Display for RepositoryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Parse a repository reference for `forge`.
///
/// # Errors
///
/// Returns [`Error::InvalidReference`] when the host is not the forge, the
/// URL has fewer than two path segments, or owner/name is empty after
/// stripping a `.git` suffix.
pub fn parse_reference(raw: &str, forge: &Forge) -> Result<RepositoryIdentity> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::invalid_reference(raw, "empty reference"));
    }

    if let Some(identity) = parse_ssh_shorthand(raw, forge)? {
        return Ok(identity);
    }

    let url = Url::parse(raw)
        .map_err(|e| Error::invalid_reference(raw, format!("not a URL or SSH shorthand: {}", e)))?;

    if !matches!(url.scheme(), "https" | "http") {
        return Err(Error::invalid_reference(
            raw,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    let host = url.host_str().unwrap_or_default();
    if !forge.accepts_host(host) {
        return Err(Error::invalid_reference(
            raw,
            format!("unsupported host '{}' ({} required)", host, forge.host),
        ));
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    if segments.len() < 2 {
        return Err(Error::invalid_reference(raw, "cannot parse owner/name from path"));
    }

    identity_from_parts(raw, forge, segments[0], segments[1])
}

fn parse_ssh_shorthand(raw: &str, forge: &Forge) -> Result<Option<RepositoryIdentity>> {
    let pattern = format!(
        r"^git@(?i:{}):(?P<owner>[^/]+)/(?P<name>[^/?#]+?)(?:\.git)?$",
        regex::escape(&forge.host)
    );
    let re = Regex::new(&pattern)?;

    match re.captures(raw) {
        Some(caps) => identity_from_parts(raw, forge, &caps["owner"], &caps["name"]).map(Some),
        None => Ok(None),
    }
}

fn identity_from_parts(
    raw: &str,
    forge: &Forge,
    owner: &str,
    name: &str,
) -> Result<RepositoryIdentity> {
    let owner = owner.trim();
    let name = name.trim();
    let name = name.strip_suffix(".git").unwrap_or(name);

    if owner.is_empty() || name.is_empty() {
        return Err(Error::invalid_reference(raw, "empty owner or repository name"));
    }
    if [owner, name].iter().any(|part| *part == "." || *part == "..") {
        return Err(Error::invalid_reference(raw, "owner or repository name is a relative path"));
    }

    Ok(RepositoryIdentity::new(forge, owner, name))
}

/// Whether a configured remote URL points at `identity` on `forge`.
///
/// Case-insensitive: the remote must mention the forge host and contain
/// `owner/name` as a substring.
pub fn remote_matches(remote: &str, identity: &RepositoryIdentity, forge: &Forge) -> bool {
    let remote = remote.to_ascii_lowercase();
    let slug = identity.slug().to_ascii_lowercase();
    remote.contains(&forge.host) && remote.contains(&slug)
}
