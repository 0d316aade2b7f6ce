//! # Collection Pipeline
//!
//! [`Collector`] drives one run end to end:
//!
//! 1. Resolve the reference into a [`RepositoryIdentity`] (fatal on failure).
//! 2. Locate the workspace and sync it (fatal only if the initial clone fails).
//! 3. Fetch metadata, survey the tree, gather code statistics and commit
//!    activity. Each of these degrades to sentinel values instead of failing.
//! 4. Assemble the [`EvidenceSnapshot`] and write the run directory.
//!
//! Steps run sequentially and always in this order.

use crate::activity;
use crate::artifacts::{self, RunLayout, KEY_FILES_FILE, TREE_FILE};
use crate::code_stats::{self, CodeStatsSource};
use crate::config::CollectorConfig;
use crate::error::Result;
use crate::fetch::{Endpoint, MetadataBundle, MetadataFetcher};
use crate::process::CommandRunner;
use crate::reference::{parse_reference, RepositoryIdentity};
use crate::report;
use crate::snapshot::{self, EvidenceSnapshot, SnapshotInputs};
use crate::survey;
use crate::sync::{SyncEngine, SyncReport};
use crate::workspace;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{info, warn};
use std::path::PathBuf;

/// Result of the sync-only entry point.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub identity: RepositoryIdentity,
    pub report: SyncReport,
}

impl SyncOutcome {
    pub fn workspace(&self) -> &PathBuf {
        &self.report.workspace
    }
}

/// Result of a full collection run.
#[derive(Debug, Clone)]
pub struct CollectOutcome {
    pub identity: RepositoryIdentity,
    pub layout: RunLayout,
    pub sync: SyncReport,
    pub code_stats_source: CodeStatsSource,
    pub snapshot: EvidenceSnapshot,
}

impl CollectOutcome {
    pub fn facts_file(&self) -> PathBuf {
        self.layout.facts_path()
    }

    pub fn context_file(&self) -> PathBuf {
        self.layout.context_path()
    }
}

pub struct Collector<'a> {
    config: &'a CollectorConfig,
    runner: &'a dyn CommandRunner,
}

impl<'a> Collector<'a> {
    pub fn new(config: &'a CollectorConfig, runner: &'a dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    /// Resolve `reference` and bring its workspace up to date.
    pub fn sync(&self, reference: &str) -> Result<SyncOutcome> {
        let identity = parse_reference(reference, &self.config.forge)?;
        let dir = workspace::locate(
            &self.config.sources_root,
            &identity,
            &self.config.forge,
            self.runner,
        );
        let report =
            SyncEngine::new(self.runner).sync(&dir, &identity, &self.config.sync_options())?;
        Ok(SyncOutcome { identity, report })
    }

    /// Run the full pipeline, stamping the run with the current time.
    pub fn collect(&self, reference: &str) -> Result<CollectOutcome> {
        self.collect_at(reference, Utc::now())
    }

    /// Run the full pipeline with an explicit start time.
    pub fn collect_at(&self, reference: &str, started: DateTime<Utc>) -> Result<CollectOutcome> {
        let SyncOutcome { identity, report } = self.sync(reference)?;
        let repo_dir = report.workspace.clone();
        let mut warnings = report.warnings.clone();

        let layout = RunLayout::new(&self.config.output_root, &identity, &started);
        layout.create()?;
        info!("writing evidence for {} to {}", identity, layout.run_dir.display());

        let metadata = fetch_metadata(MetadataFetcher::new(self.config.fetcher_config()), &identity);
        warnings.extend(unreachable_endpoints(&metadata));
        layout.write_metadata(&metadata)?;

        let limits = &self.config.limits;
        let tree = survey::walk(&repo_dir, limits.max_depth, limits.max_items);
        let key_files = survey::key_files(&repo_dir, limits);
        artifacts::write_lines(&layout.raw_path(TREE_FILE), &tree)?;
        artifacts::write_lines(&layout.raw_path(KEY_FILES_FILE), &key_files)?;

        let code = code_stats::collect(&repo_dir, self.runner);
        let code_stats_file = code.source.dump_file();
        artifacts::write_text(&layout.raw_path(&code_stats_file), &code.output)?;

        let activity = activity::collect(&repo_dir, self.runner);

        let snapshot = snapshot::assemble(SnapshotInputs {
            identity: &identity,
            workspace: repo_dir,
            output_path: layout.run_dir.clone(),
            generated_at_utc: started.to_rfc3339_opts(SecondsFormat::Secs, true),
            head_commit: report.head_commit(),
            metadata: &metadata,
            activity: &activity,
            code_stats_source: code.source,
            tree,
            key_files,
            warnings,
        });

        artifacts::write_json(&layout.facts_path(), &snapshot)?;
        artifacts::write_text(&layout.context_path(), &report::render(&snapshot, &code_stats_file))?;

        Ok(CollectOutcome {
            identity,
            layout,
            sync: report,
            code_stats_source: code.source,
            snapshot,
        })
    }
}

/// One line per endpoint that never produced an HTTP status.
/// Fetch every endpoint, or record all of them as unanswered when no HTTP
/// client could be built.
fn fetch_metadata(fetcher: Result<MetadataFetcher>, identity: &RepositoryIdentity) -> MetadataBundle {
    match fetcher {
        Ok(fetcher) => fetcher.fetch_all(identity),
        Err(err) => {
            warn!("skipping metadata requests for {}: {}", identity, err);
            MetadataBundle::default()
        }
    }
}

fn unreachable_endpoints(metadata: &MetadataBundle) -> Vec<String> {
    Endpoint::ALL
        .into_iter()
        .filter(|endpoint| metadata.get(*endpoint).status == 0)
        .map(|endpoint| format!("{} request failed before a response was received", endpoint.stem()))
        .collect()
}
