//! Upgrade pipeline coordinating the whole run
//!
//! This module provides:
//! - Workflow coordination: read → filter → resolve → diff → select → apply
//! - Fail-fast handling of resolution failures
//! - Dry-run mode support
//!
//! Every stage is a barrier: a stage starts only after the previous one has
//! fully finished, and only the apply stage touches go.mod.

mod diff;

pub use diff::diff_changes;

use crate::domain::{ChangeEntry, ModuleVersion, Outcome, UpdateInfo};
use crate::error::{PipelineError, PromptError};
use crate::executor::{RetryPolicy, TaskError, DEFAULT_CONCURRENCY};
use crate::go_command::Upgrader;
use crate::manifest::{
    is_direct, is_not_locally_replaced, matches_package_filter, read_manifest, CandidateSet, GoMod,
};
use crate::output::{candidates_notice, local_skip_notice, selection_notice};
use crate::progress::Progress;
use crate::prompt::Prompt;
use crate::query::ModuleQuery;
use crate::resolver::{resolve_all, ResolveOptions};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Message shown above the selection prompt
const SELECT_MESSAGE: &str = "Select the modules you want to upgrade";

/// Run-level settings
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum number of concurrent version queries
    pub concurrency: usize,
    /// Retry policy for each version query
    pub retry: RetryPolicy,
    /// Ignore available versions younger than this
    pub min_age: Option<Duration>,
    /// Stop after computing the change set
    pub dry_run: bool,
    /// If non-empty, only these module paths are candidates
    pub only: Vec<String>,
    /// Module paths never treated as candidates
    pub exclude: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            retry: RetryPolicy::default(),
            min_age: None,
            dry_run: false,
            only: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Settings for the resolution stage
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            concurrency: self.concurrency,
            retry: self.retry.clone(),
            min_age: self.min_age,
        }
    }
}

/// The upgrade pipeline and its collaborators
pub struct Pipeline {
    query: Arc<dyn ModuleQuery>,
    upgrader: Arc<dyn Upgrader>,
    prompt: Arc<dyn Prompt>,
    config: PipelineConfig,
    progress: Progress,
}

impl Pipeline {
    /// Create a pipeline with progress display disabled
    pub fn new(
        query: Arc<dyn ModuleQuery>,
        upgrader: Arc<dyn Upgrader>,
        prompt: Arc<dyn Prompt>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            query,
            upgrader,
            prompt,
            config,
            progress: Progress::disabled(),
        }
    }

    /// Replace the progress reporter
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Run every stage against the module rooted at `dir`
    pub async fn run(&mut self, dir: &Path) -> Result<Outcome, PipelineError> {
        let go_mod = read_manifest(dir)?;
        info!(
            module = go_mod.module_path.as_deref().unwrap_or("<unnamed>"),
            requirements = go_mod.requirements.len(),
            "read go.mod"
        );

        let candidates = self.candidates(&go_mod);
        let resolved = self.resolve(dir, &candidates).await?;

        let changes = diff_changes(&go_mod.requirements, &resolved);
        info!(changes = changes.len(), "computed change set");
        if changes.is_empty() {
            return Ok(Outcome::NothingToUpgrade);
        }
        if self.config.dry_run {
            return Ok(Outcome::Planned { changes });
        }

        let selection = self.select(changes).await?;
        if selection.is_empty() {
            return Ok(Outcome::NoSelection);
        }
        self.progress.println(&selection_notice(&selection));

        self.apply(dir, &selection).await?;
        Ok(Outcome::Upgraded { changes: selection })
    }

    /// Build the candidate set and announce it
    fn candidates(&self, go_mod: &GoMod) -> CandidateSet {
        let local = go_mod.local_replacement_paths();
        for requirement in go_mod.direct_requirements() {
            if local.contains(&requirement.path()) {
                self.progress.println(&local_skip_notice(requirement.path()));
            }
        }

        let candidates = CandidateSet::build(
            &go_mod.requirements,
            &[
                is_direct(),
                is_not_locally_replaced(go_mod),
                matches_package_filter(&self.config.only, &self.config.exclude),
            ],
        );

        if !candidates.is_empty() {
            self.progress.println(&candidates_notice(candidates.modules()));
        }
        candidates
    }

    /// Resolve every candidate; any failure aborts the run
    async fn resolve(
        &mut self,
        dir: &Path,
        candidates: &CandidateSet,
    ) -> Result<HashMap<String, UpdateInfo>, PipelineError> {
        if candidates.is_empty() {
            return Ok(HashMap::new());
        }

        self.progress
            .start(candidates.len() as u64, "Finding module information");
        let resolution = resolve_all(
            Arc::clone(&self.query),
            dir,
            candidates,
            &self.config.resolve_options(),
            self.progress.handle(),
        )
        .await;
        self.progress.finish_and_clear();

        resolution
            .into_result()
            .map_err(|failure| match failure.error {
                TaskError::Failed(source) => PipelineError::Resolution {
                    path: failure.key,
                    source,
                    failed: failure.failed,
                },
                TaskError::Panicked => PipelineError::ResolutionAborted { path: failure.key },
            })
    }

    /// Ask the operator which changes to apply, keeping offered order
    ///
    /// The prompt blocks on terminal input, so it runs on the blocking pool.
    async fn select(&self, changes: Vec<ChangeEntry>) -> Result<Vec<ChangeEntry>, PipelineError> {
        let labels: Vec<String> = changes.iter().map(|change| change.label.clone()).collect();
        let prompt = Arc::clone(&self.prompt);
        let offered = labels.clone();
        let chosen: HashSet<String> =
            tokio::task::spawn_blocking(move || prompt.select(SELECT_MESSAGE, &offered))
                .await
                .map_err(|_| PromptError::Aborted)??
                .into_iter()
                .collect();

        if let Some(unknown) = chosen.iter().find(|label| !labels.contains(label)) {
            return Err(PromptError::UnknownOption(unknown.clone()).into());
        }

        Ok(changes
            .into_iter()
            .filter(|change| chosen.contains(&change.label))
            .collect())
    }

    /// Pin the selection with `go get`, then tidy
    async fn apply(&mut self, dir: &Path, selection: &[ChangeEntry]) -> Result<(), PipelineError> {
        let targets: Vec<ModuleVersion> = selection.iter().map(ChangeEntry::target).collect();
        info!(modules = targets.len(), "upgrading modules");

        self.progress.spinner("Installing using `go get`...");
        let upgraded = self.upgrader.upgrade(dir, &targets).await;
        self.progress.finish_and_clear();
        upgraded.map_err(PipelineError::Upgrade)?;

        self.progress.spinner("Running `go mod tidy`...");
        let tidied = self.upgrader.tidy(dir).await;
        self.progress.finish_and_clear();
        tidied.map_err(PipelineError::Tidy)
    }
}
