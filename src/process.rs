//! # External Commands
//!
//! Every subprocess the collector starts (git, `scc`, `cloc`) goes through a
//! [`CommandRunner`]. The runner captures both output streams as text and
//! reports the result as a [`CommandOutcome`] instead of an error, so callers
//! always branch on success explicitly.
//!
//! The [`CommandRunner`] trait is the seam used by tests: the sync engine and
//! the workspace locator accept any runner, and unit tests substitute a fake
//! that records invocations and replays canned outcomes.

use crate::error::{Error, Result};
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Result of a best-effort command.
///
/// `Succeeded` holds trimmed stdout. `Failed` holds trimmed stderr, or stdout
/// when stderr was empty, or the spawn error when the program could not start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Succeeded(String),
    Failed(String),
}

impl CommandOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, CommandOutcome::Succeeded(_))
    }

    /// Stdout on success, diagnostic on failure.
    pub fn output(&self) -> &str {
        match self {
            CommandOutcome::Succeeded(out) | CommandOutcome::Failed(out) => out,
        }
    }

    /// Stdout when the command succeeded with non-empty output, else `fallback`.
    pub fn value_or(&self, fallback: &str) -> String {
        match self {
            CommandOutcome::Succeeded(out) if !out.is_empty() => out.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// A program, its arguments and the directory to run it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    /// Shorthand for `git <args>`.
    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("git", args)
    }

    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Executes invocations. Implementations must never panic or return early on
/// a non-zero exit; failures are reported as [`CommandOutcome::Failed`].
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> CommandOutcome;

    /// Raising variant. Reserved for the initial clone, whose failure ends the run.
    fn run_checked(&self, invocation: &Invocation) -> Result<String> {
        match self.run(invocation) {
            CommandOutcome::Succeeded(out) => Ok(out),
            CommandOutcome::Failed(stderr) => Err(Error::CommandFailed {
                command: invocation.to_string(),
                stderr,
            }),
        }
    }

    /// Whether `program` can be started at all, probed with `--version`.
    fn is_available(&self, program: &str) -> bool {
        self.run(&Invocation::new(program, ["--version"])).succeeded()
    }
}

/// Runs commands on the host with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> CommandOutcome {
        debug!("running: {}", invocation);

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(dir) = &invocation.cwd {
            command.current_dir(dir);
        }
        if invocation.program == "git" {
            // Never block on a credential prompt
            command.env("GIT_TERMINAL_PROMPT", "0");
        }

        let output = match command.output() {
            Ok(output) => output,
            Err(e) => return CommandOutcome::Failed(e.to_string()),
        };

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if output.status.success() {
            return CommandOutcome::Succeeded(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.is_empty() {
            CommandOutcome::Failed(stdout)
        } else {
            CommandOutcome::Failed(stderr)
        }
    }
}
