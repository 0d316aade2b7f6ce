//! Default values for gitinfo configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Forge API root used for metadata requests.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Documentation mirror root; pages live at `<base>/<owner>/<name>`.
pub const DEFAULT_MIRROR_BASE: &str = "https://deepwiki.com";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;

/// Shallow history depth for clone and fetch.
pub const DEFAULT_DEPTH: i32 = 1;

/// Environment variable holding the optional forge API token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// `User-Agent` sent with every request.
pub fn user_agent() -> String {
    format!("gitinfo/{}", env!("CARGO_PKG_VERSION"))
}

/// Returns the default directory holding working copies: `~/workspace/sources`.
///
/// Falls back to `./workspace/sources` if the home directory cannot be
/// determined. Overridden by `--sources-root` or `GITINFO_SOURCES_ROOT`.
pub fn default_sources_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("workspace")
        .join("sources")
}

/// Returns the default root for run outputs: `<sources root>/gitinfo-outputs`.
pub fn default_output_root() -> PathBuf {
    default_sources_root().join("gitinfo-outputs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources_root_returns_path() {
        let root = default_sources_root();
        assert!(root.ends_with("workspace/sources"));
    }

    #[test]
    fn test_default_output_root_is_under_sources_root() {
        assert!(default_output_root().starts_with(default_sources_root()));
        assert!(default_output_root().ends_with("gitinfo-outputs"));
    }

    #[test]
    fn test_user_agent_carries_version() {
        assert!(user_agent().starts_with("gitinfo/"));
        assert!(user_agent().contains(env!("CARGO_PKG_VERSION")));
    }
}
