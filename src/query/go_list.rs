//! `go list` query source
//!
//! Runs `go list -m -u -json <module>` in the project directory. The go
//! command resolves the module through the configured GOPROXY/GOPRIVATE
//! settings and reports an `Update` object only when a newer version exists.

use super::{LatestVersion, ModuleQuery};
use crate::domain::ModuleVersion;
use crate::error::QueryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Module entry printed by `go list -m -json`
#[derive(Debug, Deserialize)]
struct ListedModule {
    #[serde(rename = "Path")]
    path: String,
    #[serde(rename = "Update")]
    update: Option<ListedUpdate>,
    #[serde(rename = "Error")]
    error: Option<ListedError>,
}

#[derive(Debug, Deserialize)]
struct ListedUpdate {
    #[serde(rename = "Version")]
    version: String,
    #[serde(rename = "Time")]
    time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ListedError {
    #[serde(rename = "Err")]
    err: String,
}

/// Query source shelling out to the go command
#[derive(Debug, Clone)]
pub struct GoListQuery {
    go_bin: PathBuf,
}

impl GoListQuery {
    /// Create a query source using `go` from PATH
    pub fn new() -> Self {
        Self::with_binary("go")
    }

    /// Create a query source using a specific go binary
    pub fn with_binary(go_bin: impl Into<PathBuf>) -> Self {
        Self {
            go_bin: go_bin.into(),
        }
    }

    fn command_line(module: &str) -> String {
        format!("go list -m -u -json {}", module)
    }
}

impl Default for GoListQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpret the JSON printed by `go list -m -u -json` for one module
fn parse_list_output(
    module: &str,
    stdout: &[u8],
) -> Result<Option<LatestVersion>, QueryError> {
    let listed: ListedModule = serde_json::from_slice(stdout).map_err(|e| {
        QueryError::invalid_response(module, "go list", format!("failed to parse JSON: {}", e))
    })?;

    if let Some(error) = listed.error {
        return Err(QueryError::CommandFailed {
            command: GoListQuery::command_line(module),
            stderr: error.err,
        });
    }

    if listed.path != module {
        return Err(QueryError::invalid_response(
            module,
            "go list",
            format!("reported module '{}'", listed.path),
        ));
    }

    Ok(listed.update.map(|update| LatestVersion {
        version: update.version,
        released_at: update.time,
    }))
}

#[async_trait]
impl ModuleQuery for GoListQuery {
    fn source_name(&self) -> &'static str {
        "go list"
    }

    async fn latest(
        &self,
        dir: &Path,
        module: &ModuleVersion,
    ) -> Result<Option<LatestVersion>, QueryError> {
        let command = Self::command_line(&module.path);
        let output = Command::new(&self.go_bin)
            .args(["list", "-m", "-u", "-json", module.path.as_str()])
            .current_dir(dir)
            .output()
            .await
            .map_err(|source| QueryError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(QueryError::CommandFailed {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_list_output(&module.path, &output.stdout)
    }
}
