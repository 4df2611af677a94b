//! Module resolution
//!
//! This module provides:
//! - `resolve_module`: one query for one candidate, converted to `UpdateInfo`
//! - `resolve_all`: retry-wrapped resolution of every candidate on a bounded batch
//! - The `--age` cooldown applied to freshly released versions

use crate::domain::{ModuleVersion, UpdateInfo};
use crate::error::QueryError;
use crate::executor::{retry, Batch, BatchResult, RetryPolicy, DEFAULT_CONCURRENCY};
use crate::manifest::CandidateSet;
use crate::progress::ProgressHandle;
use crate::query::ModuleQuery;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Per-key resolution results, keyed by module path
pub type Resolution = BatchResult<String, UpdateInfo, QueryError>;

/// Settings for a resolution run
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Maximum number of concurrent queries
    pub concurrency: usize,
    /// Retry policy applied to each query
    pub retry: RetryPolicy,
    /// Minimum age of an available version
    pub min_age: Option<Duration>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            retry: RetryPolicy::default(),
            min_age: None,
        }
    }
}

/// Query one module once and describe its newest version
pub async fn resolve_module(
    query: &dyn ModuleQuery,
    dir: &Path,
    module: &ModuleVersion,
) -> Result<UpdateInfo, QueryError> {
    let info = match query.latest(dir, module).await? {
        Some(latest) => UpdateInfo {
            module: module.clone(),
            available: Some(latest.version),
            released_at: latest.released_at,
        },
        None => UpdateInfo::current(module.clone()),
    };
    Ok(info)
}

/// Drop an available version released less than `min_age` before `now`
///
/// Versions without a known release time are kept.
pub fn apply_min_age(info: UpdateInfo, min_age: Option<Duration>, now: DateTime<Utc>) -> UpdateInfo {
    let (Some(min_age), Some(released_at)) = (min_age, info.released_at) else {
        return info;
    };
    let Ok(min_age) = chrono::Duration::from_std(min_age) else {
        return info;
    };

    if now.signed_duration_since(released_at) < min_age {
        debug!(
            module = %info.module.path,
            available = ?info.available,
            %released_at,
            "available version is younger than --age, ignoring"
        );
        return UpdateInfo::current(info.module);
    }
    info
}

/// Resolve every candidate concurrently and wait for all of them
///
/// Each candidate runs as one retry-wrapped task; failures are recorded per
/// module and never cancel the remaining tasks.
pub async fn resolve_all(
    query: Arc<dyn ModuleQuery>,
    dir: &Path,
    candidates: &CandidateSet,
    options: &ResolveOptions,
    progress: ProgressHandle,
) -> Resolution {
    let mut batch = Batch::new(options.concurrency);
    info!(
        modules = candidates.len(),
        concurrency = batch.concurrency(),
        source = query.source_name(),
        "resolving modules"
    );

    for module in candidates.modules() {
        let query = Arc::clone(&query);
        let dir: PathBuf = dir.to_path_buf();
        let module = module.clone();
        let policy = options.retry.clone();
        let min_age = options.min_age;
        let progress = progress.clone();

        let submitted = batch.go(module.path.clone(), move || async move {
            let result = retry(&policy, || resolve_module(query.as_ref(), &dir, &module))
                .await
                .map(|info| apply_min_age(info, min_age, Utc::now()));
            progress.inc();
            result
        });

        if let Err(err) = submitted {
            warn!(error = %err, "skipping duplicate candidate");
        }
    }

    let resolution = batch.wait().await;
    info!(
        resolved = resolution.successes().count(),
        failed = resolution.failures().count(),
        "resolution finished"
    );
    resolution
}
