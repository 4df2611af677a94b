//! Integration tests for modup
//!
//! These tests verify:
//! - go.mod reading and candidate selection on realistic manifests
//! - Concurrent resolution feeding the change set in manifest order
//! - The full pipeline against in-memory collaborators

use async_trait::async_trait;
use modup::domain::{ModuleVersion, Outcome};
use modup::error::{ApplyError, PipelineError, PromptError, QueryError};
use modup::executor::RetryPolicy;
use modup::go_command::Upgrader;
use modup::manifest::{read_manifest, CandidateSet};
use modup::pipeline::{diff_changes, Pipeline, PipelineConfig};
use modup::progress::ProgressHandle;
use modup::prompt::{Prompt, SelectAll};
use modup::query::{LatestVersion, ModuleQuery};
use modup::resolver::{resolve_all, ResolveOptions};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

const SERVICE_GO_MOD: &str = r#"module github.com/acme/service

go 1.22

toolchain go1.22.3

require (
	github.com/gin-gonic/gin v1.9.1
	github.com/acme/shared v0.0.0-00010101000000-000000000000
	golang.org/x/text v0.14.0
	github.com/bytedance/sonic v1.9.1 // indirect
	gopkg.in/yaml.v3 v3.0.1
)

require github.com/stretchr/testify v1.8.4

replace github.com/acme/shared => ../shared

exclude golang.org/x/net v0.1.0
"#;

/// Test fixture directory creation helper
fn create_module(go_mod: &str) -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    fs::write(temp_dir.path().join("go.mod"), go_mod).unwrap();
    temp_dir
}

/// Query source answering from a table, with a per-module delay
struct SlowTableQuery {
    latest: HashMap<String, (Option<String>, Duration)>,
    calls: AtomicUsize,
}

impl SlowTableQuery {
    fn new(entries: &[(&str, Option<&str>, u64)]) -> Arc<Self> {
        Arc::new(Self {
            latest: entries
                .iter()
                .map(|(path, version, delay_ms)| {
                    (
                        path.to_string(),
                        (version.map(str::to_string), Duration::from_millis(*delay_ms)),
                    )
                })
                .collect(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ModuleQuery for SlowTableQuery {
    fn source_name(&self) -> &'static str {
        "table"
    }

    async fn latest(
        &self,
        _dir: &Path,
        module: &ModuleVersion,
    ) -> Result<Option<LatestVersion>, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.latest.get(&module.path) {
            Some((version, delay)) => {
                tokio::time::sleep(*delay).await;
                Ok(version.clone().map(LatestVersion::new))
            }
            None => Err(QueryError::module_not_found(&module.path, "table")),
        }
    }
}

#[derive(Default)]
struct RecordingUpgrader {
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl Upgrader for RecordingUpgrader {
    async fn upgrade(&self, _dir: &Path, targets: &[ModuleVersion]) -> Result<(), ApplyError> {
        let targets: Vec<String> = targets.iter().map(ModuleVersion::to_string).collect();
        self.calls
            .lock()
            .unwrap()
            .push(format!("get {}", targets.join(" ")));
        Ok(())
    }

    async fn tidy(&self, _dir: &Path) -> Result<(), ApplyError> {
        self.calls.lock().unwrap().push("mod tidy".to_string());
        Ok(())
    }
}

struct NothingPrompt;

impl Prompt for NothingPrompt {
    fn select(&self, _message: &str, _options: &[String]) -> Result<Vec<String>, PromptError> {
        Ok(Vec::new())
    }
}

fn fast_config() -> PipelineConfig {
    PipelineConfig {
        retry: RetryPolicy::new(3).with_base_delay(Duration::from_millis(1)),
        ..PipelineConfig::default()
    }
}

mod candidate_selection {
    use super::*;

    /// Direct, remotely resolvable requirements in file order
    #[test]
    fn test_candidates_from_realistic_go_mod() {
        let temp_dir = create_module(SERVICE_GO_MOD);
        let go_mod = read_manifest(temp_dir.path()).unwrap();

        assert_eq!(go_mod.module_path.as_deref(), Some("github.com/acme/service"));
        assert_eq!(go_mod.requirements.len(), 6);

        let candidates = CandidateSet::from_go_mod(&go_mod);
        let paths: Vec<&str> = candidates
            .modules()
            .iter()
            .map(|m| m.path.as_str())
            .collect();
        assert_eq!(
            paths,
            [
                "github.com/gin-gonic/gin",
                "golang.org/x/text",
                "gopkg.in/yaml.v3",
                "github.com/stretchr/testify",
            ]
        );
    }

    /// A missing go.mod is reported before anything is queried
    #[test]
    fn test_missing_go_mod() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(read_manifest(temp_dir.path()).is_err());
    }
}

mod resolution {
    use super::*;

    /// The change set follows manifest order, not completion order
    #[tokio::test]
    async fn test_change_order_independent_of_completion_order() {
        let temp_dir = create_module(SERVICE_GO_MOD);
        let go_mod = read_manifest(temp_dir.path()).unwrap();
        let candidates = CandidateSet::from_go_mod(&go_mod);

        // Earlier modules answer last
        let query = SlowTableQuery::new(&[
            ("github.com/gin-gonic/gin", Some("v1.10.0"), 60),
            ("golang.org/x/text", Some("v0.15.0"), 30),
            ("gopkg.in/yaml.v3", None, 10),
            ("github.com/stretchr/testify", Some("v1.9.0"), 0),
        ]);

        let resolution = resolve_all(
            query.clone(),
            temp_dir.path(),
            &candidates,
            &ResolveOptions::default(),
            ProgressHandle::none(),
        )
        .await;
        assert_eq!(resolution.len(), candidates.len());

        let resolved = resolution.into_result().unwrap();
        let changes = diff_changes(&go_mod.requirements, &resolved);
        let labels: Vec<&str> = changes.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "github.com/gin-gonic/gin (v1.9.1 --> v1.10.0)",
                "golang.org/x/text (v0.14.0 --> v0.15.0)",
                "github.com/stretchr/testify (v1.8.4 --> v1.9.0)",
            ]
        );
        assert_eq!(query.calls.load(Ordering::SeqCst), 4);
    }

    /// A failed module still leaves every other result visible
    #[tokio::test]
    async fn test_partial_success_is_visible() {
        let temp_dir = create_module(SERVICE_GO_MOD);
        let go_mod = read_manifest(temp_dir.path()).unwrap();
        let candidates = CandidateSet::from_go_mod(&go_mod);

        let query = SlowTableQuery::new(&[
            ("github.com/gin-gonic/gin", Some("v1.10.0"), 0),
            ("gopkg.in/yaml.v3", None, 0),
            ("github.com/stretchr/testify", None, 0),
        ]);
        let options = ResolveOptions {
            retry: RetryPolicy::new(2).with_base_delay(Duration::from_millis(1)),
            ..ResolveOptions::default()
        };

        let resolution = resolve_all(
            query,
            temp_dir.path(),
            &candidates,
            &options,
            ProgressHandle::none(),
        )
        .await;

        assert!(!resolution.is_success());
        assert_eq!(resolution.successes().count(), 3);
        let (key, _) = resolution.first_failure().unwrap();
        assert_eq!(key, "golang.org/x/text");
    }
}

mod pipeline_runs {
    use super::*;

    /// Selecting everything upgrades then tidies, once each
    #[tokio::test]
    async fn test_select_all_upgrades_then_tidies() {
        let temp_dir = create_module(SERVICE_GO_MOD);
        let query = SlowTableQuery::new(&[
            ("github.com/gin-gonic/gin", Some("v1.10.0"), 0),
            ("golang.org/x/text", None, 0),
            ("gopkg.in/yaml.v3", None, 0),
            ("github.com/stretchr/testify", Some("v1.9.0"), 0),
        ]);
        let upgrader = Arc::new(RecordingUpgrader::default());

        let mut pipeline = Pipeline::new(query, upgrader.clone(), Arc::new(SelectAll), fast_config());
        let outcome = pipeline.run(temp_dir.path()).await.unwrap();

        assert_eq!(outcome.changes().len(), 2);
        assert_eq!(
            *upgrader.calls.lock().unwrap(),
            vec![
                "get github.com/gin-gonic/gin@v1.10.0 github.com/stretchr/testify@v1.9.0".to_string(),
                "mod tidy".to_string(),
            ]
        );
    }

    /// A resolution failure aborts before the prompt and leaves go.mod untouched
    #[tokio::test]
    async fn test_resolution_failure_is_fatal() {
        let temp_dir = create_module(SERVICE_GO_MOD);
        let query = SlowTableQuery::new(&[("github.com/gin-gonic/gin", Some("v1.10.0"), 0)]);
        let upgrader = Arc::new(RecordingUpgrader::default());

        let mut pipeline = Pipeline::new(query, upgrader.clone(), Arc::new(SelectAll), fast_config());
        let err = pipeline.run(temp_dir.path()).await.unwrap_err();

        assert!(matches!(err, PipelineError::Resolution { failed: 3, .. }));
        assert!(err.to_string().starts_with("resolving golang.org/x/text"));
        assert!(upgrader.calls.lock().unwrap().is_empty());
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("go.mod")).unwrap(),
            SERVICE_GO_MOD
        );
    }

    /// Declining every change is a successful no-op
    #[tokio::test]
    async fn test_no_selection() {
        let temp_dir = create_module(SERVICE_GO_MOD);
        let query = SlowTableQuery::new(&[
            ("github.com/gin-gonic/gin", Some("v1.10.0"), 0),
            ("golang.org/x/text", Some("v0.15.0"), 0),
            ("gopkg.in/yaml.v3", None, 0),
            ("github.com/stretchr/testify", Some("v1.9.0"), 0),
        ]);
        let upgrader = Arc::new(RecordingUpgrader::default());

        let mut pipeline =
            Pipeline::new(query, upgrader.clone(), Arc::new(NothingPrompt), fast_config());
        let outcome = pipeline.run(temp_dir.path()).await.unwrap();

        assert_eq!(outcome, Outcome::NoSelection);
        assert!(upgrader.calls.lock().unwrap().is_empty());
    }
}
