//! # Collect Command Implementation
//!
//! This module implements the `collect` subcommand, which runs the full
//! pipeline for one repository and writes a timestamped run directory.
//!
//! ## Functionality
//!
//! - **Sync**: Clone the repository, or fetch an existing workspace, and
//!   check out the requested ref.
//! - **Evidence**: Fetch forge metadata and the documentation mirror page,
//!   survey the working tree, and gather code statistics and commit activity.
//! - **Output**: Write `facts.json`, `context.md` and the `raw/` directory.
//!
//! Degraded steps are logged as warnings and recorded in the snapshot; only an
//! invalid reference or a failed initial clone stops the command. On success it
//! prints `RUN_DIR`, `CONTEXT_FILE`, `FACTS_FILE`, `SANITIZED_REPO_URL`,
//! `LOCAL_REPO_PATH` and `HEAD_COMMIT` as `KEY=value` lines.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

use gitinfo::collector::Collector;
use gitinfo::config;
use gitinfo::process::SystemRunner;

use super::RepoArgs;

/// Collect evidence about a repository
#[derive(Args, Debug)]
pub struct CollectArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Root directory for run outputs.
    ///
    /// Defaults to `~/workspace/sources/gitinfo-outputs`.
    #[arg(long, value_name = "DIR", env = "GITINFO_OUTPUT_ROOT")]
    pub output_root: Option<PathBuf>,

    /// Deepest path level listed in the tree sample
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Maximum entries in the tree sample
    #[arg(long, value_name = "N")]
    pub max_items: Option<usize>,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Execute the `collect` command.
pub fn execute(args: CollectArgs) -> Result<()> {
    let mut collector_config = args.repo.load_config()?;
    if let Some(root) = &args.output_root {
        collector_config.output_root = config::expand_home(root);
    }
    if let Some(depth) = args.max_depth {
        collector_config.limits.max_depth = depth;
    }
    if let Some(items) = args.max_items {
        collector_config.limits.max_items = items;
    }
    if let Some(secs) = args.timeout {
        collector_config.http_timeout = Duration::from_secs(secs);
    }

    let runner = SystemRunner;
    let outcome = Collector::new(&collector_config, &runner).collect(&args.repo.repo)?;

    println!("RUN_DIR={}", outcome.layout.run_dir.display());
    println!("CONTEXT_FILE={}", outcome.context_file().display());
    println!("FACTS_FILE={}", outcome.facts_file().display());
    println!("SANITIZED_REPO_URL={}", outcome.identity.canonical_url());
    println!("LOCAL_REPO_PATH={}", outcome.snapshot.local_repo_path.display());
    println!("HEAD_COMMIT={}", outcome.snapshot.head_commit);
    Ok(())
}
