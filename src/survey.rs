//! # Working Tree Survey
//!
//! Produces the bounded structural evidence for a workspace:
//!
//! - [`walk`]: a breadth-first listing of the tree, limited in depth and size;
//! - [`key_files`]: conventional manifests, entry points and docs;
//! - [`count_files`]: the plain file count used when no code-size tool exists.
//!
//! `.git` directories are skipped at every level. All outputs are sorted so
//! the same tree always yields the same evidence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Root-level files recognized case-insensitively.
const ROOT_FILES: &[&str] = &[
    "README.md",
    "README",
    "README.rst",
    "README.txt",
    "README.adoc",
    "package.json",
    "pnpm-workspace.yaml",
    "tsconfig.json",
    "Cargo.toml",
    "go.mod",
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "requirements.txt",
    "Pipfile",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "settings.gradle",
    "Gemfile",
    "composer.json",
    "mix.exs",
    "Package.swift",
    "CMakeLists.txt",
    "Makefile",
    "justfile",
    "Taskfile.yml",
    "BUILD.bazel",
    "WORKSPACE",
    "Dockerfile",
    "docker-compose.yml",
    "docker-compose.yaml",
    "compose.yml",
    "compose.yaml",
];

/// Root-level directories recorded when present.
const ROOT_DIRS: &[&str] = &[".github/workflows", "docs", "examples", "scripts"];

/// Directories whose immediate source files are listed.
const SOURCE_DIRS: &[&str] = &["src", "cmd", "app", "lib", "pkg", "bin", "server", "cli", "internal"];

const SOURCE_EXTENSIONS: &[&str] = &[
    "rs", "go", "py", "js", "jsx", "ts", "tsx", "mjs", "java", "kt", "scala", "rb", "php", "c",
    "h", "cc", "cpp", "hpp", "cs", "swift", "ex", "exs", "zig",
];

/// Bounds for the survey outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyLimits {
    /// Deepest path-segment count listed by [`walk`].
    pub max_depth: usize,
    /// Maximum entries returned by [`walk`].
    pub max_items: usize,
    /// Key-file detection stops after this many hits.
    pub key_file_hits: usize,
    /// Maximum entries returned by [`key_files`].
    pub key_file_cap: usize,
}

impl Default for SurveyLimits {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_items: 200,
            key_file_hits: 40,
            key_file_cap: 60,
        }
    }
}

fn is_git_dir(entry: &DirEntry) -> bool {
    entry.file_name() == ".git"
}

/// `/`-separated path of `path` relative to `root`.
fn relative(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// List the tree under `root`, breadth-first.
///
/// Entries at depth 1 come first in lexical order, then depth 2, and so on up
/// to `max_depth` path segments. Directories carry a trailing `/`. The result
/// holds at most `max_items` entries; an unreadable root yields an empty list.
pub fn walk(root: &Path, max_depth: usize, max_items: usize) -> Vec<String> {
    if max_depth == 0 || max_items == 0 {
        return Vec::new();
    }

    let mut entries: Vec<(usize, String)> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_git_dir(e))
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let mut rel = relative(root, e.path())?;
            if e.file_type().is_dir() {
                rel.push('/');
            }
            Some((e.depth(), rel))
        })
        .collect();

    entries.sort();
    entries.truncate(max_items);
    entries.into_iter().map(|(_, rel)| rel).collect()
}

/// Detect conventional key files under `root`.
///
/// Checks [`ROOT_FILES`] (case-insensitively) and [`ROOT_DIRS`] at the root,
/// then lists source files directly inside each of [`SOURCE_DIRS`]. Detection
/// stops at `limits.key_file_hits`; the output is sorted, de-duplicated and
/// capped at `limits.key_file_cap`.
pub fn key_files(root: &Path, limits: &SurveyLimits) -> Vec<String> {
    let mut hits: Vec<String> = Vec::new();
    let full = |hits: &Vec<String>| hits.len() >= limits.key_file_hits;

    let root_names: BTreeMap<String, String> = sorted_children(root)
        .into_iter()
        .filter(|(_, is_dir)| !is_dir)
        .map(|(name, _)| (name.to_ascii_lowercase(), name))
        .collect();

    for candidate in ROOT_FILES {
        if full(&hits) {
            break;
        }
        if let Some(actual) = root_names.get(&candidate.to_ascii_lowercase()) {
            hits.push(actual.clone());
        }
    }

    for dir in ROOT_DIRS {
        if full(&hits) {
            break;
        }
        if root.join(dir).is_dir() {
            hits.push(format!("{}/", dir));
        }
    }

    'dirs: for dir in SOURCE_DIRS {
        let path = root.join(dir);
        if !path.is_dir() {
            continue;
        }
        for (name, is_dir) in sorted_children(&path) {
            if full(&hits) {
                break 'dirs;
            }
            if !is_dir && has_source_extension(&name) {
                hits.push(format!("{}/{}", dir, name));
            }
        }
    }

    hits.sort();
    hits.dedup();
    hits.truncate(limits.key_file_cap);
    hits
}

fn has_source_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Names of the immediate children of `dir` in lexical order, with a
/// directory flag. Unreadable directories have no children.
fn sorted_children(dir: &Path) -> Vec<(String, bool)> {
    let mut children: Vec<(String, bool)> = match fs::read_dir(dir) {
        Ok(read) => read
            .filter_map(|e| e.ok())
            .map(|e| {
                let is_dir = e.file_type().map(|t| t.is_dir()).unwrap_or(false);
                (e.file_name().to_string_lossy().into_owned(), is_dir)
            })
            .collect(),
        Err(_) => Vec::new(),
    };
    children.sort();
    children
}

/// Number of regular files under `root`, excluding `.git`.
pub fn count_files(root: &Path) -> u64 {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !is_git_dir(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .count() as u64
}
