//! Draft narrative report (`context.md`).
//!
//! The report restates the snapshot in prose and leaves explicit
//! placeholders for the analysis a collector cannot do on its own.

use crate::artifacts::{CONTEXT_FILE, FACTS_FILE, KEY_FILES_FILE, RAW_DIR, TREE_FILE};
use crate::snapshot::EvidenceSnapshot;
use std::fmt::Write;

const PLACEHOLDER: &str = "_To be completed._";

/// Render the draft report for `snapshot`. `code_stats_file` names the raw
/// dump written by the code-size provider.
pub fn render(snapshot: &EvidenceSnapshot, code_stats_file: &str) -> String {
    let s = &snapshot.stats;
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "# {} evidence report\n", snapshot.repo);
    let _ = writeln!(
        out,
        "Main context file for deeper analysis of `{}`. It combines the quick summary, \
         an architecture outline and pointers into the collected evidence.\n",
        snapshot.repo
    );

    let _ = writeln!(out, "## 1. Repository\n");
    let _ = writeln!(out, "- Name: {}", snapshot.repo);
    let _ = writeln!(out, "- URL: {}", snapshot.repo_url);
    let _ = writeln!(out, "- Local path: {}", snapshot.local_repo_path.display());
    let _ = writeln!(out, "- Output directory: {}", snapshot.output_path.display());
    let _ = writeln!(out, "- Generated (UTC): {}", snapshot.generated_at_utc);
    let _ = writeln!(out, "- HEAD: {}\n", snapshot.head_commit);

    let _ = writeln!(out, "## 2. Quick summary\n");
    let _ = writeln!(out, "- Stars: {}", s.stars);
    let _ = writeln!(out, "- Forks: {}", s.forks);
    let _ = writeln!(out, "- Watchers: {}", s.watchers);
    let _ = writeln!(out, "- Open issues: {}", s.open_issues);
    let _ = writeln!(out, "- License: {}", s.license);
    let _ = writeln!(out, "- Default branch: {}", s.default_branch);
    let _ = writeln!(out, "- Last push: {}", s.last_push);
    let _ = writeln!(
        out,
        "- Latest release: {} ({})",
        s.latest_release_tag, s.latest_release_date
    );
    let _ = writeln!(out, "- Contributors (API sample): {}", s.contributors_sample_count);
    let _ = writeln!(out, "- Commits, last 30 days: {}", s.commits_30d);
    let _ = writeln!(out, "- Commits, last 90 days: {}", s.commits_90d);
    let _ = writeln!(
        out,
        "- Latest commit: {} by {} at {}",
        s.last_commit_hash, s.last_commit_author, s.last_commit_date
    );
    let _ = writeln!(out, "- Tracked files: {}", s.tracked_files);
    let _ = writeln!(out, "- Code statistics source: {}", s.code_stats_source);
    let _ = writeln!(out, "- Documentation mirror: {}\n", s.docs_mirror_status);

    let _ = writeln!(out, "## 3. Architecture outline\n");
    let _ = writeln!(out, "### High-level observations\n");
    let _ = writeln!(out, "- Description: {}", snapshot.description);
    let _ = writeln!(out, "- {}\n", PLACEHOLDER);

    let _ = writeln!(out, "### Structure\n");
    let _ = writeln!(
        out,
        "Start from `{}/{}`, the top levels of the tree and the main view of the project boundaries.\n",
        RAW_DIR, TREE_FILE
    );
    if snapshot.key_files.is_empty() {
        let _ = writeln!(out, "No conventional key files were detected.\n");
    } else {
        let _ = writeln!(out, "Key files:\n");
        for file in &snapshot.key_files {
            let _ = writeln!(out, "- `{}`", file);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "### Runtime and entry points\n");
    let _ = writeln!(out, "- Manifest scripts and entry fields (`package.json`, `Cargo.toml`, `pyproject.toml`)");
    let _ = writeln!(out, "- `cmd/`, `bin/`, `src/main*`, `app*`, `server*`, `cli*`");
    let _ = writeln!(out, "- Build and run paths in compose files, Makefiles and CI workflows");
    let _ = writeln!(out, "- {}\n", PLACEHOLDER);

    let _ = writeln!(out, "### Extension points\n");
    let _ = writeln!(out, "- Plugin, provider, channel and adapter style directories and their registration code");
    let _ = writeln!(out, "- {}\n", PLACEHOLDER);

    let _ = writeln!(out, "## 4. Evidence\n");
    let _ = writeln!(out, "- Structured facts: `{}`", FACTS_FILE);
    let _ = writeln!(out, "- Raw responses and scans: `{}/`", RAW_DIR);
    let _ = writeln!(out, "- Tree sample: `{}/{}`", RAW_DIR, TREE_FILE);
    let _ = writeln!(out, "- Key files: `{}/{}`", RAW_DIR, KEY_FILES_FILE);
    let _ = writeln!(out, "- Code statistics: `{}/{}`", RAW_DIR, code_stats_file);
    let _ = writeln!(
        out,
        "- Documentation mirror: `{}/deepwiki.html` and `{}/deepwiki.http.json`",
        RAW_DIR, RAW_DIR
    );
    if !snapshot.warnings.is_empty() {
        let _ = writeln!(out, "\nCollected with warnings:\n");
        for warning in &snapshot.warnings {
            let _ = writeln!(out, "- {}", warning.lines().next().unwrap_or_default());
        }
    }

    let _ = writeln!(out, "\n## 5. Suggested next questions\n");
    let _ = writeln!(out, "- Using `{}`, explain the runtime request lifecycle in 6-10 steps.", CONTEXT_FILE);
    let _ = writeln!(out, "- Identify the five most important subsystems and their boundaries.");
    let _ = writeln!(out, "- List likely extension points and where a new feature would plug in.");

    out
}
