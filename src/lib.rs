//! # gitinfo Library
//!
//! This library collects objective evidence about a forge-hosted repository:
//! it materializes a local clone, gathers metadata and structural signals, and
//! writes them as a structured snapshot plus a draft report. It backs the
//! `gitinfo` command-line tool but can be driven directly.
//!
//! ## Quick Example
//!
//! ```
//! use gitinfo::reference::{parse_reference, Forge};
//!
//! let forge = Forge::github();
//! let identity = parse_reference("git@github.com:Acme/Widgets.git", &forge).unwrap();
//! assert_eq!(identity.canonical_url(), "https://github.com/Acme/Widgets");
//!
//! // Scheme, case, trailing ".git" and "www." do not change identity
//! let same = parse_reference("https://www.GitHub.com/acme/widgets.git", &forge).unwrap();
//! assert_eq!(identity, same);
//! ```
//!
//! ## Core Concepts
//!
//! - **References (`reference`)**: Parse a URL or SSH shorthand into a
//!   canonical `RepositoryIdentity`.
//! - **Workspaces (`workspace`, `sync`)**: Map an identity to a directory
//!   under the sources root and clone, fetch or check out the requested ref.
//! - **Processes (`process`)**: Every external command goes through the
//!   `CommandRunner` trait, which reports success or failure as data.
//! - **Evidence (`fetch`, `survey`, `code_stats`, `activity`)**: Best-effort
//!   gatherers that degrade to sentinel values instead of failing the run.
//! - **Output (`snapshot`, `report`, `artifacts`)**: Assemble the fact record
//!   and draft report and lay them out in a timestamped run directory.
//!
//! ## Execution Flow
//!
//! `collector::Collector` runs the steps in order:
//!
//! 1.  **Resolve**: Parse the reference; a bad reference stops the run.
//! 2.  **Sync**: Clone or fetch the workspace and land on the requested ref.
//! 3.  **Fetch**: Request repository, release, contributor and mirror data.
//! 4.  **Survey**: List the tree, detect key files, gather code statistics
//!     and commit activity.
//! 5.  **Write**: Assemble `facts.json`, `context.md` and the `raw/` evidence.

pub mod activity;
pub mod artifacts;
pub mod code_stats;
pub mod collector;
pub mod config;
pub mod defaults;
pub mod error;
pub mod exit_codes;
pub mod fetch;
pub mod process;
pub mod reference;
pub mod report;
pub mod snapshot;
pub mod survey;
pub mod sync;
pub mod workspace;

#[cfg(test)]
mod reference_proptest;
