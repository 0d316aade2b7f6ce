//! On-disk layout of a collection run.
//!
//! ```text
//! <output_root>/<name>-<YYYYmmdd-HHMMSS>/
//!   facts.json
//!   context.md
//!   raw/
//!     repo.json          repo.http.json
//!     release.json       release.http.json
//!     contributors.json  contributors.http.json
//!     deepwiki.html      deepwiki.http.json
//!     tree.txt
//!     key-files.txt
//!     scc.txt | cloc.txt | file-count.txt
//! ```

use crate::error::Result;
use crate::fetch::{Endpoint, FetchResult, MetadataBundle};
use crate::reference::RepositoryIdentity;
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

pub const FACTS_FILE: &str = "facts.json";
pub const CONTEXT_FILE: &str = "context.md";
pub const RAW_DIR: &str = "raw";
pub const TREE_FILE: &str = "tree.txt";
pub const KEY_FILES_FILE: &str = "key-files.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    pub run_dir: PathBuf,
    pub raw_dir: PathBuf,
}

/// Status/header envelope stored next to each raw body.
#[derive(Serialize)]
struct HttpEnvelope<'a> {
    status: u16,
    headers: &'a BTreeMap<String, String>,
}

impl RunLayout {
    /// Layout for a run of `identity` started at `started`.
    pub fn new<Tz>(output_root: &Path, identity: &RepositoryIdentity, started: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let run_dir = output_root.join(format!(
            "{}-{}",
            identity.name(),
            started.format("%Y%m%d-%H%M%S")
        ));
        let raw_dir = run_dir.join(RAW_DIR);
        Self { run_dir, raw_dir }
    }

    pub fn create(&self) -> Result<()> {
        fs::create_dir_all(&self.raw_dir)?;
        Ok(())
    }

    pub fn facts_path(&self) -> PathBuf {
        self.run_dir.join(FACTS_FILE)
    }

    pub fn context_path(&self) -> PathBuf {
        self.run_dir.join(CONTEXT_FILE)
    }

    pub fn raw_path(&self, file: &str) -> PathBuf {
        self.raw_dir.join(file)
    }

    /// Body plus `{status, headers}` envelope for one endpoint.
    pub fn write_fetch(&self, endpoint: Endpoint, result: &FetchResult) -> Result<()> {
        write_text(&self.raw_path(&endpoint.body_file()), &result.body)?;
        write_json(
            &self.raw_path(&format!("{}.http.json", endpoint.stem())),
            &HttpEnvelope {
                status: result.status,
                headers: &result.headers,
            },
        )
    }

    pub fn write_metadata(&self, bundle: &MetadataBundle) -> Result<()> {
        for endpoint in Endpoint::ALL {
            self.write_fetch(endpoint, bundle.get(endpoint))?;
        }
        Ok(())
    }
}

pub fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Pretty-printed JSON with a trailing newline.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    write_text(path, &json)
}

/// One entry per line, newline-terminated unless empty.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut content = lines.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    write_text(path, &content)
}
