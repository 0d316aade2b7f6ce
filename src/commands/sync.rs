//! # Sync Command Implementation
//!
//! This module implements the `sync` subcommand: resolve the reference, locate
//! the workspace, then clone or fetch it and land on the requested ref. No
//! metadata is fetched and no run directory is written.
//!
//! On success it prints machine-readable lines:
//!
//! ```text
//! LOCAL_REPO_PATH=/home/me/workspace/sources/widgets
//! SANITIZED_REPO_URL=https://github.com/acme/widgets
//! HEAD_COMMIT=abc1234
//! ```

use anyhow::Result;
use clap::Args;

use gitinfo::collector::Collector;
use gitinfo::process::SystemRunner;

use super::RepoArgs;

/// Clone or update a repository without collecting evidence
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub repo: RepoArgs,
}

/// Execute the `sync` command.
pub fn execute(args: SyncArgs) -> Result<()> {
    let config = args.repo.load_config()?;
    let runner = SystemRunner;
    let outcome = Collector::new(&config, &runner).sync(&args.repo.repo)?;

    println!("LOCAL_REPO_PATH={}", outcome.workspace().display());
    println!("SANITIZED_REPO_URL={}", outcome.identity.canonical_url());
    println!("HEAD_COMMIT={}", outcome.report.head_commit());
    Ok(())
}
