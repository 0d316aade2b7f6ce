//! # Collector Configuration
//!
//! All process-wide settings live in a [`CollectorConfig`] that is built once
//! and passed explicitly to each component. Nothing reads ambient state later.
//!
//! ## Sources
//!
//! Settings are layered, later layers winning:
//!
//! 1.  Built-in defaults (see [`crate::defaults`]).
//! 2.  An optional YAML settings file ([`Settings`]), e.g.
//!
//!     ```yaml
//!     sources_root: ~/code/sources
//!     depth: 0
//!     http_timeout_secs: 10
//!     survey:
//!       max_depth: 3
//!       max_items: 500
//!     ```
//!
//! 3.  Command-line flags and their environment variables, applied by the CLI.
//!
//! Unknown keys in the settings file are rejected so typos are reported
//! instead of silently ignored.

use crate::defaults;
use crate::error::{Error, Result};
use crate::fetch::FetcherConfig;
use crate::reference::Forge;
use crate::survey::SurveyLimits;
use crate::sync::SyncOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Contents of a settings file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub sources_root: Option<PathBuf>,
    pub output_root: Option<PathBuf>,
    pub forge_host: Option<String>,
    pub api_base: Option<String>,
    pub mirror_base: Option<String>,
    pub depth: Option<i32>,
    pub http_timeout_secs: Option<u64>,
    pub survey: Option<SurveyLimits>,
}

/// Parse settings from YAML text.
pub fn parse(yaml: &str) -> Result<Settings> {
    if yaml.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: Some(
            "valid keys are sources_root, output_root, forge_host, api_base, mirror_base, \
             depth, http_timeout_secs and survey"
                .to_string(),
        ),
    })
}

/// Read and parse a settings file.
pub fn from_file(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorConfig {
    pub sources_root: PathBuf,
    pub output_root: PathBuf,
    pub forge: Forge,
    pub api_base: String,
    pub mirror_base: String,
    /// Bearer token for forge API calls.
    pub token: Option<String>,
    pub git_ref: Option<String>,
    pub depth: i32,
    pub http_timeout: Duration,
    pub limits: SurveyLimits,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            sources_root: defaults::default_sources_root(),
            output_root: defaults::default_output_root(),
            forge: Forge::github(),
            api_base: defaults::DEFAULT_API_BASE.to_string(),
            mirror_base: defaults::DEFAULT_MIRROR_BASE.to_string(),
            token: None,
            git_ref: None,
            depth: defaults::DEFAULT_DEPTH,
            http_timeout: Duration::from_secs(defaults::DEFAULT_HTTP_TIMEOUT_SECS),
            limits: SurveyLimits::default(),
        }
    }
}

impl CollectorConfig {
    /// Overlay the values present in `settings`.
    pub fn apply(&mut self, settings: Settings) {
        if let Some(root) = settings.sources_root {
            self.sources_root = expand_home(&root);
        }
        if let Some(root) = settings.output_root {
            self.output_root = expand_home(&root);
        }
        if let Some(host) = settings.forge_host {
            self.forge = Forge::new(&host);
        }
        if let Some(base) = settings.api_base {
            self.api_base = base;
        }
        if let Some(base) = settings.mirror_base {
            self.mirror_base = base;
        }
        if let Some(depth) = settings.depth {
            self.depth = depth;
        }
        if let Some(secs) = settings.http_timeout_secs {
            self.http_timeout = Duration::from_secs(secs);
        }
        if let Some(limits) = settings.survey {
            self.limits = limits;
        }
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            git_ref: self.git_ref.clone(),
            depth: self.depth,
        }
    }

    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            api_base: self.api_base.clone(),
            mirror_base: self.mirror_base.clone(),
            token: self.token.clone(),
            timeout: self.http_timeout,
            ..FetcherConfig::default()
        }
    }
}
