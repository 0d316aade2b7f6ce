//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the `gitinfo`
//! command-line tool. Each subcommand is defined in its own file to keep the
//! logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic.
//!
//! Options shared by `collect` and `sync` live in [`RepoArgs`] and are turned
//! into a `CollectorConfig` here, so both commands layer settings the same way.

pub mod collect;
pub mod completions;
pub mod sync;

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use gitinfo::config::{self, CollectorConfig};
use gitinfo::reference::Forge;

/// Repository selection and sync options
#[derive(Args, Debug)]
pub struct RepoArgs {
    /// Repository URL (https://github.com/<owner>/<repo>) or SSH shorthand
    /// (git@github.com:<owner>/<repo>.git)
    #[arg(value_name = "REPO")]
    pub repo: String,

    /// Branch, tag or commit to check out after syncing
    #[arg(long = "ref", value_name = "REF")]
    pub git_ref: Option<String>,

    /// History depth for clone and fetch; 0 or less fetches full history
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub depth: Option<i32>,

    /// Directory holding working copies.
    ///
    /// Defaults to `~/workspace/sources`.
    #[arg(long, value_name = "DIR", env = "GITINFO_SOURCES_ROOT")]
    pub sources_root: Option<PathBuf>,

    /// YAML settings file applied before command-line options
    #[arg(long, value_name = "FILE", env = "GITINFO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Forge host accepted in repository references
    #[arg(long, value_name = "HOST")]
    pub forge_host: Option<String>,

    /// Forge API base URL
    #[arg(long, value_name = "URL", env = "GITINFO_API_BASE")]
    pub api_base: Option<String>,

    /// Documentation mirror base URL
    #[arg(long, value_name = "URL", env = "GITINFO_MIRROR_BASE")]
    pub mirror_base: Option<String>,

    /// Bearer token for forge API requests
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl RepoArgs {
    /// Defaults, then the settings file, then command-line options.
    pub fn load_config(&self) -> Result<CollectorConfig> {
        let mut collector = CollectorConfig::default();

        if let Some(path) = &self.config {
            let settings = config::from_file(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?;
            collector.apply(settings);
        }

        if let Some(root) = &self.sources_root {
            collector.sources_root = config::expand_home(root);
        }
        if let Some(host) = &self.forge_host {
            collector.forge = Forge::new(host);
        }
        if let Some(base) = &self.api_base {
            collector.api_base = base.clone();
        }
        if let Some(base) = &self.mirror_base {
            collector.mirror_base = base.clone();
        }
        if let Some(depth) = self.depth {
            collector.depth = depth;
        }
        collector.token = self.token.clone().filter(|t| !t.trim().is_empty());
        collector.git_ref = self.git_ref.clone().filter(|r| !r.trim().is_empty());

        Ok(collector)
    }
}
