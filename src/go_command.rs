//! go command integration for applying upgrades
//!
//! This module provides:
//! - The `Upgrader` trait used by the apply stage
//! - `GoCommand`, which runs `go get` and `go mod tidy` in the project

use crate::domain::ModuleVersion;
use crate::error::ApplyError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// Trait for mutating go.mod through the go toolchain
#[async_trait]
pub trait Upgrader: Send + Sync {
    /// Pin each target module to its version as a direct requirement
    async fn upgrade(&self, dir: &Path, targets: &[ModuleVersion]) -> Result<(), ApplyError>;

    /// Reconcile the module graph after direct version changes
    async fn tidy(&self, dir: &Path) -> Result<(), ApplyError>;
}

/// Upgrader that executes the real go binary
#[derive(Debug, Clone)]
pub struct GoCommand {
    go_bin: PathBuf,
}

impl GoCommand {
    /// Create a runner using `go` from PATH
    pub fn new() -> Self {
        Self::with_binary("go")
    }

    /// Create a runner using a specific go binary
    pub fn with_binary(go_bin: impl Into<PathBuf>) -> Self {
        Self {
            go_bin: go_bin.into(),
        }
    }

    /// Arguments for `go get` pinning every target
    fn get_args(targets: &[ModuleVersion]) -> Vec<String> {
        std::iter::once("get".to_string())
            .chain(targets.iter().map(ModuleVersion::to_string))
            .collect()
    }

    /// Run a go subcommand and capture output
    async fn run(&self, args: &[String], working_dir: &Path) -> Result<Output, ApplyError> {
        let command = format!("go {}", args.join(" "));
        debug!(command = %command, dir = %working_dir.display(), "running go command");

        let output = Command::new(&self.go_bin)
            .args(args)
            .current_dir(working_dir)
            .output()
            .await
            .map_err(|source| ApplyError::Spawn {
                command: command.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(output)
        } else {
            Err(ApplyError::CommandFailed {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl Default for GoCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Upgrader for GoCommand {
    async fn upgrade(&self, dir: &Path, targets: &[ModuleVersion]) -> Result<(), ApplyError> {
        if targets.is_empty() {
            return Ok(());
        }
        self.run(&Self::get_args(targets), dir).await.map(|_| ())
    }

    async fn tidy(&self, dir: &Path) -> Result<(), ApplyError> {
        let args = ["mod".to_string(), "tidy".to_string()];
        self.run(&args, dir).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_args() {
        let targets = vec![
            ModuleVersion::new("example.com/a", "v1.1.0"),
            ModuleVersion::new("example.com/b", "v2.3.4"),
        ];
        assert_eq!(
            GoCommand::get_args(&targets),
            vec!["get", "example.com/a@v1.1.0", "example.com/b@v2.3.4"]
        );
    }

    #[tokio::test]
    async fn test_upgrade_with_no_targets_is_noop() {
        let runner = GoCommand::with_binary("/nonexistent/bin/go");
        let dir = tempfile::tempdir().unwrap();
        assert!(runner.upgrade(dir.path(), &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let runner = GoCommand::with_binary("/nonexistent/bin/go");
        let dir = tempfile::tempdir().unwrap();

        let err = runner.tidy(dir.path()).await.unwrap_err();
        assert!(matches!(err, ApplyError::Spawn { ref command, .. } if command == "go mod tidy"));

        let targets = vec![ModuleVersion::new("example.com/a", "v1.1.0")];
        let err = runner.upgrade(dir.path(), &targets).await.unwrap_err();
        assert!(err.to_string().contains("go get example.com/a@v1.1.0"));
    }
}
