//! # Workspace Synchronization
//!
//! Brings a workspace up to date with the requested repository and ref.
//!
//! ## States
//!
//! Synchronization is a small state machine with one fatal edge:
//!
//! ```text
//! Absent  --clone ok-->  Ready{on_ref}     (clone failure: SyncFailed, run ends)
//! Present --fetch-->     Ready{on_ref: false}  (fetch failure: warning)
//! Ready   --no ref / already on ref-->  Done
//! Ready   --ref-->  CheckoutRef --ok-->  Done (CheckedOut)
//!                   CheckoutRef --fail--> FetchRef --ok--> CheckoutFetched --ok--> Done (FetchedAndCheckedOut)
//!                   any failure in the fallback chain --> Done (Unchanged, warning)
//! ```
//!
//! Whatever path is taken, the report always carries the short `HEAD` hash,
//! or the `"n/a"` sentinel when none can be resolved.
//!
//! ## Shallow transfers
//!
//! A positive depth turns every transfer into a shallow one (`--depth N`).
//! Clones additionally use `--single-branch --no-tags --filter=blob:none`.
//! A depth of zero or below requests full history.

use crate::error::{Error, Result};
use crate::process::{CommandOutcome, CommandRunner, Invocation};
use crate::reference::RepositoryIdentity;
use crate::snapshot::NOT_AVAILABLE;
use crate::workspace::has_git_dir;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// What the caller asked the sync engine to land on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Branch, tag or commit to check out. `None` keeps the remote default.
    pub git_ref: Option<String>,
    /// History depth for clone and fetch. `<= 0` means full history.
    pub depth: i32,
}

/// How the workspace was brought into existence or refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Cloned,
    Fetched,
    /// The fetch failed and the run continues on the existing local state.
    Stale,
}

/// Where the requested ref ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefResolution {
    NotRequested,
    /// The clone itself checked the ref out.
    ClonedOnRef,
    CheckedOut,
    FetchedAndCheckedOut,
    /// Every attempt failed; `HEAD` is wherever it was.
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct SyncReport {
    pub workspace: PathBuf,
    pub action: SyncAction,
    pub ref_resolution: RefResolution,
    pub head: CommandOutcome,
    /// One line per degraded step.
    pub warnings: Vec<String>,
}

impl SyncReport {
    /// Short `HEAD` hash or `"n/a"`.
    pub fn head_commit(&self) -> String {
        self.head.value_or(NOT_AVAILABLE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncState {
    Absent,
    Present,
    Ready { on_ref: bool },
    CheckoutRef,
    FetchRef,
    CheckoutFetched,
    Done,
}

fn depth_args(depth: i32) -> Vec<String> {
    if depth > 0 {
        vec!["--depth".to_string(), depth.to_string()]
    } else {
        Vec::new()
    }
}

/// Arguments for `git clone`.
pub fn clone_args(url: &str, dest: &Path, git_ref: Option<&str>, depth: i32) -> Vec<String> {
    let mut args = vec!["clone".to_string()];
    if depth > 0 {
        args.extend(depth_args(depth));
        args.extend(
            ["--single-branch", "--no-tags", "--filter=blob:none"]
                .iter()
                .map(|s| s.to_string()),
        );
    }
    if let Some(git_ref) = git_ref {
        args.push("--branch".to_string());
        args.push(git_ref.to_string());
    }
    args.push(url.to_string());
    args.push(dest.to_string_lossy().into_owned());
    args
}

/// Arguments for refreshing an existing workspace from `origin`.
pub fn fetch_args(depth: i32) -> Vec<String> {
    let mut args = vec!["fetch".to_string(), "--prune".to_string(), "--no-tags".to_string()];
    args.extend(depth_args(depth));
    args.push("origin".to_string());
    args
}

/// Arguments for fetching a single ref that is not known locally.
pub fn fetch_ref_args(git_ref: &str, depth: i32) -> Vec<String> {
    let mut args = vec!["fetch".to_string(), "--no-tags".to_string()];
    args.extend(depth_args(depth));
    args.push("origin".to_string());
    args.push(git_ref.to_string());
    args
}

pub struct SyncEngine<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> SyncEngine<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Clone or refresh `workspace`, then try to land on the requested ref.
    ///
    /// # Errors
    ///
    /// Only a failed initial clone is an error ([`Error::SyncFailed`]). Fetch
    /// and checkout failures are logged, recorded in
    /// [`SyncReport::warnings`], and the current `HEAD` is used.
    pub fn sync(
        &self,
        workspace: &Path,
        identity: &RepositoryIdentity,
        options: &SyncOptions,
    ) -> Result<SyncReport> {
        let git_ref = options.git_ref.as_deref().filter(|r| !r.trim().is_empty());
        let mut warnings = Vec::new();
        let mut action = SyncAction::Fetched;
        let mut resolution = RefResolution::NotRequested;

        let mut state = if has_git_dir(workspace) {
            SyncState::Present
        } else {
            SyncState::Absent
        };

        while state != SyncState::Done {
            state = match state {
                SyncState::Absent => {
                    action = SyncAction::Cloned;
                    let on_ref = self.clone_workspace(workspace, identity, git_ref, options.depth, &mut warnings)?;
                    SyncState::Ready { on_ref }
                }
                SyncState::Present => {
                    info!("updating {} in {}", identity, workspace.display());
                    let fetch = self.git(workspace, fetch_args(options.depth));
                    if let CommandOutcome::Failed(err) = fetch {
                        action = SyncAction::Stale;
                        degrade(
                            &mut warnings,
                            format!(
                                "fetch failed, continuing with local state of {}: {}",
                                workspace.display(),
                                err
                            ),
                        );
                    }
                    SyncState::Ready { on_ref: false }
                }
                SyncState::Ready { on_ref } => match git_ref {
                    None => SyncState::Done,
                    Some(_) if on_ref => {
                        resolution = RefResolution::ClonedOnRef;
                        SyncState::Done
                    }
                    Some(_) => SyncState::CheckoutRef,
                },
                SyncState::CheckoutRef => {
                    let r = git_ref.unwrap_or_default();
                    if self.git(workspace, ["checkout", r, "--"]).succeeded() {
                        resolution = RefResolution::CheckedOut;
                        SyncState::Done
                    } else {
                        SyncState::FetchRef
                    }
                }
                SyncState::FetchRef => {
                    let r = git_ref.unwrap_or_default();
                    match self.git(workspace, fetch_ref_args(r, options.depth)) {
                        CommandOutcome::Succeeded(_) => SyncState::CheckoutFetched,
                        CommandOutcome::Failed(err) => {
                            resolution = RefResolution::Unchanged;
                            degrade(
                                &mut warnings,
                                format!("ref {} not found, continuing with current HEAD: {}", r, err),
                            );
                            SyncState::Done
                        }
                    }
                }
                SyncState::CheckoutFetched => {
                    let r = git_ref.unwrap_or_default();
                    match self.git(workspace, ["checkout", "FETCH_HEAD"]) {
                        CommandOutcome::Succeeded(_) => {
                            resolution = RefResolution::FetchedAndCheckedOut;
                        }
                        CommandOutcome::Failed(err) => {
                            resolution = RefResolution::Unchanged;
                            degrade(
                                &mut warnings,
                                format!("checkout failed for ref {}, continuing with current HEAD: {}", r, err),
                            );
                        }
                    }
                    SyncState::Done
                }
                SyncState::Done => SyncState::Done,
            };
        }

        let head = self.git(workspace, ["rev-parse", "--short", "HEAD"]);

        Ok(SyncReport {
            workspace: workspace.to_path_buf(),
            action,
            ref_resolution: resolution,
            head,
            warnings,
        })
    }

    /// Returns whether the clone already checked out `git_ref`.
    fn clone_workspace(
        &self,
        workspace: &Path,
        identity: &RepositoryIdentity,
        git_ref: Option<&str>,
        depth: i32,
        warnings: &mut Vec<String>,
    ) -> Result<bool> {
        if let Some(parent) = workspace.parent() {
            fs::create_dir_all(parent)?;
        }

        let url = identity.canonical_url();
        info!("cloning {} into {}", url, workspace.display());

        if let Some(r) = git_ref {
            let with_branch = Invocation::git(clone_args(url, workspace, Some(r), depth));
            match self.runner.run(&with_branch) {
                CommandOutcome::Succeeded(_) => return Ok(true),
                CommandOutcome::Failed(err) => degrade(
                    warnings,
                    format!("clone at ref {} failed, retrying on the default branch: {}", r, err),
                ),
            }
        }

        let plain = Invocation::git(clone_args(url, workspace, None, depth));
        match self.runner.run_checked(&plain) {
            Ok(_) => Ok(false),
            Err(Error::CommandFailed { stderr, .. }) => Err(Error::SyncFailed {
                url: url.to_string(),
                hint: clone_hint(&stderr),
                message: stderr,
            }),
            Err(e) => Err(e),
        }
    }

    fn git<I, S>(&self, workspace: &Path, args: I) -> CommandOutcome
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runner.run(&Invocation::git(args).in_dir(workspace))
    }
}

fn degrade(warnings: &mut Vec<String>, message: String) {
    warn!("{}", message);
    warnings.push(message);
}

fn clone_hint(stderr: &str) -> Option<String> {
    if stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("Could not read from remote repository")
        || stderr.contains("could not read Username")
    {
        Some("make sure the repository exists and your git credentials can read it".to_string())
    } else if stderr.contains("already exists and is not an empty directory") {
        Some("the workspace directory exists but is not a git clone; move it aside".to_string())
    } else {
        None
    }
}
