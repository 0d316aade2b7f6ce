//! Maps a repository identity to its local working copy.

use crate::process::{CommandRunner, Invocation};
use crate::reference::{remote_matches, Forge, RepositoryIdentity};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Whether `dir` holds a git working copy.
pub fn has_git_dir(dir: &Path) -> bool {
    dir.join(".git").exists()
}

/// Reads the `origin` remote recorded in the working copy at `dir`.
///
/// This is the URL as stored in the clone's config, before any
/// `url.<base>.insteadOf` rewriting. Returns `None` when the remote cannot be
/// read. A recorded but empty URL is returned as an empty string.
pub fn origin_url(dir: &Path, runner: &dyn CommandRunner) -> Option<String> {
    let outcome =
        runner.run(&Invocation::git(["config", "--get", "remote.origin.url"]).in_dir(dir));
    if outcome.succeeded() {
        Some(outcome.output().to_string())
    } else {
        None
    }
}

/// Resolve the workspace directory for `identity` under `sources_root`.
///
/// The default is `<sources_root>/<name>`. When a working copy already exists
/// there and its readable `origin` remote points at a different repository,
/// `<sources_root>/<name>-<owner>` is used instead. An empty remote counts as
/// a different repository; an unreadable remote keeps the default path. The alternate path is a pure function of the inputs, so
/// repeated calls agree.
pub fn locate(
    sources_root: &Path,
    identity: &RepositoryIdentity,
    forge: &Forge,
    runner: &dyn CommandRunner,
) -> PathBuf {
    let default_dir = sources_root.join(identity.name());
    if !has_git_dir(&default_dir) {
        return default_dir;
    }

    match origin_url(&default_dir, runner) {
        Some(remote) if !remote_matches(&remote, identity, forge) => {
            let alternate =
                sources_root.join(format!("{}-{}", identity.name(), identity.owner()));
            info!(
                "{} is a clone of {}, using {} for {}",
                default_dir.display(),
                remote,
                alternate.display(),
                identity
            );
            alternate
        }
        Some(_) => default_dir,
        None => {
            debug!(
                "origin of {} is unreadable, keeping default workspace",
                default_dir.display()
            );
            default_dir
        }
    }
}
