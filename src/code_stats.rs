//! Code-size statistics from whichever provider is available.
//!
//! Providers are tried in order: `scc`, then `cloc`, then a plain file count.
//! A tool that is installed but fails falls through to the next provider, so
//! a result is always produced.

use crate::process::{CommandOutcome, CommandRunner, Invocation};
use crate::survey::count_files;
use log::{info, warn};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeStatsSource {
    Scc,
    Cloc,
    FileCount,
}

impl CodeStatsSource {
    pub fn as_str(self) -> &'static str {
        match self {
            CodeStatsSource::Scc => "scc",
            CodeStatsSource::Cloc => "cloc",
            CodeStatsSource::FileCount => "file-count",
        }
    }

    /// Raw evidence file holding the provider output.
    pub fn dump_file(self) -> String {
        format!("{}.txt", self.as_str())
    }
}

impl fmt::Display for CodeStatsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeStats {
    pub source: CodeStatsSource,
    pub output: String,
}

const TOOLS: [(CodeStatsSource, &str); 2] =
    [(CodeStatsSource::Scc, "scc"), (CodeStatsSource::Cloc, "cloc")];

pub fn collect(repo_dir: &Path, runner: &dyn CommandRunner) -> CodeStats {
    for (source, program) in TOOLS {
        if !runner.is_available(program) {
            continue;
        }
        let dir = repo_dir.to_string_lossy().into_owned();
        match runner.run(&Invocation::new(program, [dir])) {
            CommandOutcome::Succeeded(output) => {
                info!("code statistics from {}", program);
                return CodeStats { source, output };
            }
            CommandOutcome::Failed(err) => {
                warn!("{} failed on {}: {}", program, repo_dir.display(), err);
            }
        }
    }

    CodeStats {
        source: CodeStatsSource::FileCount,
        output: count_files(repo_dir).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fake::FakeRunner;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_prefers_scc() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new().on(
            "scc",
            &[temp.path().to_str().unwrap()],
            CommandOutcome::Succeeded("Rust 3 files".into()),
        );
        let stats = collect(temp.path(), &runner);
        assert_eq!(stats.source, CodeStatsSource::Scc);
        assert_eq!(stats.output, "Rust 3 files");
        assert!(runner.calls().iter().all(|c| c.program != "cloc"));
    }

    #[test]
    fn test_falls_back_to_cloc_when_scc_missing() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new()
            .on("scc", &[], CommandOutcome::Failed("No such file or directory".into()))
            .on("cloc", &[], CommandOutcome::Succeeded("cloc report".into()));
        let stats = collect(temp.path(), &runner);
        assert_eq!(stats.source, CodeStatsSource::Cloc);
        assert_eq!(stats.output, "cloc report");
    }

    #[test]
    fn test_falls_back_to_file_count() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join(".git/HEAD"), "ref").unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::write(temp.path().join("b.txt"), "b").unwrap();

        let runner = FakeRunner::new()
            .on("scc", &[], CommandOutcome::Failed("missing".into()))
            .on("cloc", &[], CommandOutcome::Failed("missing".into()));
        let stats = collect(temp.path(), &runner);
        assert_eq!(stats.source, CodeStatsSource::FileCount);
        assert_eq!(stats.output, "2");
        assert_eq!(stats.source.dump_file(), "file-count.txt");
    }
}
