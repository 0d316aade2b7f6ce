//! # Evidence Snapshot
//!
//! The terminal record of a run. [`assemble`] combines what the earlier
//! stages produced into an [`EvidenceSnapshot`] without performing any I/O of
//! its own: API bodies are read from the already-fetched [`MetadataBundle`],
//! git facts from [`CommitActivity`], structure from the survey.
//!
//! Every statistic always has a value. Missing or mistyped numbers become the
//! `"n/a"` sentinel, missing strings become `"n/a"`, and commit counts fall
//! back to `"0"`. The record therefore has the same shape whether the run was
//! fully online or entirely degraded.

use crate::activity::CommitActivity;
use crate::code_stats::CodeStatsSource;
use crate::fetch::MetadataBundle;
use crate::reference::RepositoryIdentity;
use log::warn;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// Sentinel for any value that could not be determined.
pub const NOT_AVAILABLE: &str = "n/a";

/// An integer statistic, serialized as a JSON number or `"n/a"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Count(i64),
    Unavailable,
}

impl Metric {
    /// Integer values only. Floats, strings and absent fields are unavailable.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => n.as_i64().map(Metric::Count).unwrap_or(Metric::Unavailable),
            _ => Metric::Unavailable,
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Metric::Count(n) => serializer.serialize_i64(*n),
            Metric::Unavailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Count(n) => write!(f, "{}", n),
            Metric::Unavailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// Reachability of the documentation mirror page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorStatus {
    Available,
    RedirectOrPartial,
    MissingOrBlocked,
}

impl MirrorStatus {
    /// 200 is available, 3xx is a redirect, anything else (0 included) is missing.
    pub fn classify(status: u16) -> Self {
        match status {
            200 => MirrorStatus::Available,
            300..=399 => MirrorStatus::RedirectOrPartial,
            _ => MirrorStatus::MissingOrBlocked,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MirrorStatus::Available => "available",
            MirrorStatus::RedirectOrPartial => "redirect_or_partial",
            MirrorStatus::MissingOrBlocked => "missing_or_blocked",
        }
    }
}

impl fmt::Display for MirrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub stars: Metric,
    pub forks: Metric,
    pub watchers: Metric,
    pub open_issues: Metric,
    pub license: String,
    pub default_branch: String,
    pub last_push: String,
    pub latest_release_tag: String,
    pub latest_release_date: String,
    pub contributors_sample_count: Metric,
    pub commits_30d: String,
    pub commits_90d: String,
    pub last_commit_hash: String,
    pub last_commit_date: String,
    pub last_commit_author: String,
    pub tracked_files: String,
    pub code_stats_source: String,
    #[serde(rename = "deepwikiStatus")]
    pub docs_mirror_status: MirrorStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceSnapshot {
    pub repo: String,
    pub repo_url: String,
    pub local_repo_path: PathBuf,
    pub output_path: PathBuf,
    pub generated_at_utc: String,
    pub head_commit: String,
    pub description: String,
    pub stats: Stats,
    pub key_files: Vec<String>,
    pub tree: Vec<String>,
    /// Degraded steps, one line each.
    pub warnings: Vec<String>,
}

/// Everything [`assemble`] reads.
pub struct SnapshotInputs<'a> {
    pub identity: &'a RepositoryIdentity,
    pub workspace: PathBuf,
    pub output_path: PathBuf,
    pub generated_at_utc: String,
    pub head_commit: String,
    pub metadata: &'a MetadataBundle,
    pub activity: &'a CommitActivity,
    pub code_stats_source: CodeStatsSource,
    pub tree: Vec<String>,
    pub key_files: Vec<String>,
    pub warnings: Vec<String>,
}

/// Parse a response body as JSON, treating empty or malformed bodies as `null`.
pub fn parse_body(label: &str, body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            warn!("{} response is not valid JSON: {}", label, e);
            Value::Null
        }
    }
}

fn text_at(value: &Value, pointer: &str) -> String {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

pub fn assemble(inputs: SnapshotInputs<'_>) -> EvidenceSnapshot {
    let repo = parse_body("repository", &inputs.metadata.repository.body);
    let release = parse_body("release", &inputs.metadata.release.body);
    let contributors = parse_body("contributors", &inputs.metadata.contributors.body);

    let contributors_sample_count = match &contributors {
        Value::Array(items) => Metric::Count(items.len() as i64),
        _ => Metric::Unavailable,
    };

    let activity = inputs.activity;
    let stats = Stats {
        stars: Metric::from_json(repo.get("stargazers_count")),
        forks: Metric::from_json(repo.get("forks_count")),
        watchers: Metric::from_json(repo.get("subscribers_count")),
        open_issues: Metric::from_json(repo.get("open_issues_count")),
        license: text_at(&repo, "/license/spdx_id"),
        default_branch: text_at(&repo, "/default_branch"),
        last_push: text_at(&repo, "/pushed_at"),
        latest_release_tag: text_at(&release, "/tag_name"),
        latest_release_date: text_at(&release, "/published_at"),
        contributors_sample_count,
        commits_30d: activity.commits_30d.clone(),
        commits_90d: activity.commits_90d.clone(),
        last_commit_hash: activity.last_commit_hash.clone(),
        last_commit_date: activity.last_commit_date.clone(),
        last_commit_author: activity.last_commit_author.clone(),
        tracked_files: activity.tracked_files.clone(),
        code_stats_source: inputs.code_stats_source.as_str().to_string(),
        docs_mirror_status: MirrorStatus::classify(inputs.metadata.mirror.status),
    };

    EvidenceSnapshot {
        repo: inputs.identity.slug(),
        repo_url: inputs.identity.canonical_url().to_string(),
        local_repo_path: inputs.workspace,
        output_path: inputs.output_path,
        generated_at_utc: inputs.generated_at_utc,
        head_commit: inputs.head_commit,
        description: text_at(&repo, "/description"),
        stats,
        key_files: inputs.key_files,
        tree: inputs.tree,
        warnings: inputs.warnings,
    }
}
