//! Shared test utilities for E2E tests.
//!
//! Every test runs fully offline:
//!
//! - Forge URLs (`https://github.com/<owner>/<name>`) are rewritten by git's
//!   `url.<base>.insteadOf` to local repositories under `<temp>/origins/`, so
//!   clone and fetch never leave the machine.
//! - The API and documentation mirror bases point at a closed local port, so
//!   every metadata request fails at the transport level.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     require_git!();
//!     let fixture = TestFixture::new();
//!     fixture.origin("acme", "widgets").commit("README.md", "# widgets", "init");
//!     fixture.command().args(["collect", "https://github.com/acme/widgets"]).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{git_available, key_value, OriginRepo, TestFixture, UNREACHABLE};
    #[allow(unused_imports)]
    pub use crate::require_git;
}

/// A base URL nothing listens on.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

/// Check whether a `git` binary is available.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Return early from a test when `git` is not installed.
#[macro_export]
macro_rules! require_git {
    () => {
        if !$crate::common::git_available() {
            eprintln!("Skipping: git is not installed");
            return;
        }
    };
}

/// Extract `KEY=value` from command output.
pub fn key_value(output: &str, key: &str) -> Option<String> {
    let prefix = format!("{}=", key);
    output
        .lines()
        .find_map(|line| line.strip_prefix(&prefix))
        .map(str::to_string)
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["-c", "user.name=Test Author", "-c", "user.email=author@example.com"])
        .args(["-c", "commit.gpgsign=false", "-c", "tag.gpgsign=false"])
        .args(args)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A local repository standing in for a forge repository.
pub struct OriginRepo {
    path: PathBuf,
}

impl OriginRepo {
    fn init(path: PathBuf) -> Self {
        std::fs::create_dir_all(&path).expect("Failed to create origin directory");
        git(&path, &["init", "-q"]);
        git(&path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        Self { path }
    }

    /// Write `file` and commit it.
    pub fn commit(&self, file: &str, content: &str, message: &str) -> &Self {
        let target = self.path.join(file);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&target, content).expect("Failed to write file");
        git(&self.path, &["add", file]);
        git(&self.path, &["commit", "-q", "-m", message]);
        self
    }

    pub fn tag(&self, name: &str) -> &Self {
        git(&self.path, &["tag", name]);
        self
    }

    /// Full hash of `HEAD`.
    pub fn head(&self) -> String {
        git(&self.path, &["rev-parse", "HEAD"])
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Temporary sources root, output root and origin repositories.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn sources_root(&self) -> PathBuf {
        self.path().join("sources")
    }

    pub fn output_root(&self) -> PathBuf {
        self.path().join("out")
    }

    fn origins_root(&self) -> PathBuf {
        self.path().join("origins")
    }

    /// Create the local repository served for `https://github.com/<owner>/<name>`.
    pub fn origin(&self, owner: &str, name: &str) -> OriginRepo {
        OriginRepo::init(self.origins_root().join(owner).join(name))
    }

    /// Place a working copy at `sources/<dir>` whose `origin` is `remote`.
    #[allow(dead_code)]
    pub fn existing_workspace(&self, dir: &str, remote: &str) -> PathBuf {
        let path = self.sources_root().join(dir);
        std::fs::create_dir_all(&path).expect("Failed to create workspace");
        git(&path, &["init", "-q"]);
        git(&path, &["remote", "add", "origin", remote]);
        self.temp_dir
            .child(format!("sources/{}/NOTES.md", dir))
            .write_str("local notes\n")
            .expect("Failed to write file");
        git(&path, &["add", "NOTES.md"]);
        git(&path, &["commit", "-q", "-m", "local"]);
        path
    }

    /// The `gitinfo` binary wired to this fixture.
    pub fn command(&self) -> assert_cmd::Command {
        let origins = format!("file://{}/", self.origins_root().display());
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("gitinfo");
        cmd.current_dir(self.path())
            .env("GITINFO_SOURCES_ROOT", self.sources_root())
            .env("GITINFO_OUTPUT_ROOT", self.output_root())
            .env("GITINFO_API_BASE", UNREACHABLE)
            .env("GITINFO_MIRROR_BASE", UNREACHABLE)
            .env_remove("GITINFO_CONFIG")
            .env_remove("GITHUB_TOKEN")
            .env_remove("RUST_LOG")
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("GIT_CONFIG_COUNT", "2")
            .env("GIT_CONFIG_KEY_0", format!("url.{}.insteadOf", origins))
            .env("GIT_CONFIG_VALUE_0", "https://github.com/")
            .env("GIT_CONFIG_KEY_1", "protocol.file.allow")
            .env("GIT_CONFIG_VALUE_1", "always");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value() {
        let out = "RUN_DIR=/tmp/x\nHEAD_COMMIT=abc1234\n";
        assert_eq!(key_value(out, "HEAD_COMMIT").as_deref(), Some("abc1234"));
        assert_eq!(key_value(out, "RUN_DIR").as_deref(), Some("/tmp/x"));
        assert!(key_value(out, "FACTS_FILE").is_none());
    }

    #[test]
    fn test_fixture_layout() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
        assert!(fixture.sources_root().starts_with(fixture.path()));
        assert!(fixture.output_root().starts_with(fixture.path()));
    }
}
