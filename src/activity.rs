//! Commit activity read from the local working copy.

use crate::process::{CommandOutcome, CommandRunner, Invocation};
use crate::snapshot::NOT_AVAILABLE;
use std::path::Path;

/// Git-derived facts. Counts fall back to `"0"`, everything else to `"n/a"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitActivity {
    pub commits_30d: String,
    pub commits_90d: String,
    pub last_commit_hash: String,
    pub last_commit_date: String,
    pub last_commit_author: String,
    pub tracked_files: String,
}

impl Default for CommitActivity {
    fn default() -> Self {
        Self {
            commits_30d: "0".to_string(),
            commits_90d: "0".to_string(),
            last_commit_hash: NOT_AVAILABLE.to_string(),
            last_commit_date: NOT_AVAILABLE.to_string(),
            last_commit_author: NOT_AVAILABLE.to_string(),
            tracked_files: NOT_AVAILABLE.to_string(),
        }
    }
}

pub fn collect(repo_dir: &Path, runner: &dyn CommandRunner) -> CommitActivity {
    let git = |args: &[&str]| runner.run(&Invocation::git(args.iter().copied()).in_dir(repo_dir));

    let tracked_files = match git(&["ls-files"]) {
        CommandOutcome::Succeeded(out) => out.lines().filter(|l| !l.is_empty()).count().to_string(),
        CommandOutcome::Failed(_) => NOT_AVAILABLE.to_string(),
    };

    CommitActivity {
        commits_30d: git(&["rev-list", "--count", "--since=30 days ago", "HEAD"]).value_or("0"),
        commits_90d: git(&["rev-list", "--count", "--since=90 days ago", "HEAD"]).value_or("0"),
        last_commit_hash: git(&["rev-parse", "--short", "HEAD"]).value_or(NOT_AVAILABLE),
        last_commit_date: git(&["log", "-1", "--format=%cI"]).value_or(NOT_AVAILABLE),
        last_commit_author: git(&["log", "-1", "--format=%an"]).value_or(NOT_AVAILABLE),
        tracked_files,
    }
}
