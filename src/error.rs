//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues reading or parsing go.mod (input errors)
//! - QueryError: Issues asking the go command or module proxy for versions
//! - ApplyError: Issues running `go get` / `go mod tidy`
//! - PromptError: Issues reading the operator's selection
//! - PipelineError: Stage-level failure reported to the operator

use std::path::PathBuf;
use thiserror::Error;

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// go.mod parsing error
    #[error("failed to parse go.mod at line {line}: {message}")]
    GoModParseError { line: usize, message: String },
}

/// Errors related to querying available module versions
#[derive(Error, Debug)]
pub enum QueryError {
    /// The query command could not be started
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The query command exited unsuccessfully
    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// Module not known to the source
    #[error("module '{module}' not found in {source_name}")]
    ModuleNotFound { module: String, source_name: String },

    /// Network request failed
    #[error("failed to fetch module '{module}' from {source_name}: {message}")]
    NetworkError {
        module: String,
        source_name: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{module}' from {source_name}")]
    Timeout { module: String, source_name: String },

    /// Invalid response from the query source
    #[error("invalid response from {source_name} for '{module}': {message}")]
    InvalidResponse {
        module: String,
        source_name: String,
        message: String,
    },
}

/// Errors related to applying an upgrade
#[derive(Error, Debug)]
pub enum ApplyError {
    /// The command could not be started
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command exited unsuccessfully
    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
}

/// Errors related to the interactive selection prompt
#[derive(Error, Debug)]
pub enum PromptError {
    /// Terminal IO failed
    #[error("failed to read selection: {0}")]
    Io(#[from] std::io::Error),

    /// The prompt returned a label that was never offered
    #[error("unknown selection '{0}'")]
    UnknownOption(String),

    /// The prompt panicked or was cancelled before answering
    #[error("selection prompt aborted")]
    Aborted,
}

/// Stage-level failure of an upgrade run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// go.mod could not be read or parsed
    #[error("reading go.mod: {0}")]
    Input(#[from] ManifestError),

    /// At least one module could not be resolved after retries
    #[error("resolving {path}: {source} ({failed} module(s) failed)")]
    Resolution {
        path: String,
        #[source]
        source: QueryError,
        failed: usize,
    },

    /// A resolver task ended without producing a result
    #[error("resolving {path}: task aborted before completing")]
    ResolutionAborted { path: String },

    /// The selection prompt failed
    #[error("selecting modules: {0}")]
    Prompt(#[from] PromptError),

    /// `go get` failed; go.mod is unchanged or partially updated
    #[error("upgrading modules: {0}")]
    Upgrade(#[source] ApplyError),

    /// `go mod tidy` failed after the direct versions were already updated
    #[error("tidying go.mod after upgrade (direct versions already updated): {0}")]
    Tidy(#[source] ApplyError),
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new GoModParseError
    pub fn parse_error(line: usize, message: impl Into<String>) -> Self {
        ManifestError::GoModParseError {
            line,
            message: message.into(),
        }
    }
}

impl QueryError {
    /// Creates a new ModuleNotFound error
    pub fn module_not_found(module: impl Into<String>, source_name: impl Into<String>) -> Self {
        QueryError::ModuleNotFound {
            module: module.into(),
            source_name: source_name.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        module: impl Into<String>,
        source_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        QueryError::NetworkError {
            module: module.into(),
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(module: impl Into<String>, source_name: impl Into<String>) -> Self {
        QueryError::Timeout {
            module: module.into(),
            source_name: source_name.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        module: impl Into<String>,
        source_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        QueryError::InvalidResponse {
            module: module.into(),
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error_not_found() {
        let err = ManifestError::not_found("/path/to/go.mod");
        let msg = format!("{}", err);
        assert!(msg.contains("manifest file not found"));
        assert!(msg.contains("go.mod"));
    }

    #[test]
    fn test_manifest_error_parse() {
        let err = ManifestError::parse_error(7, "unterminated require block");
        let msg = format!("{}", err);
        assert!(msg.contains("line 7"));
        assert!(msg.contains("unterminated require block"));
    }

    #[test]
    fn test_query_error_not_found() {
        let err = QueryError::module_not_found("example.com/missing", "Go Proxy");
        let msg = format!("{}", err);
        assert!(msg.contains("module 'example.com/missing' not found"));
        assert!(msg.contains("Go Proxy"));
    }

    #[test]
    fn test_query_error_network() {
        let err = QueryError::network_error("example.com/a", "Go Proxy", "connection refused");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to fetch"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_query_error_timeout() {
        let err = QueryError::timeout("example.com/a", "Go Proxy");
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_query_error_command_failed() {
        let err = QueryError::CommandFailed {
            command: "go list -m -u -json example.com/a".to_string(),
            stderr: "no required module provides package".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("go list"));
        assert!(msg.contains("no required module"));
    }

    #[test]
    fn test_pipeline_error_names_stage() {
        let err = PipelineError::Resolution {
            path: "example.com/c".to_string(),
            source: QueryError::timeout("example.com/c", "Go Proxy"),
            failed: 1,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("resolving example.com/c"));
        assert!(msg.contains("1 module(s) failed"));

        let err = PipelineError::Tidy(ApplyError::CommandFailed {
            command: "go mod tidy".to_string(),
            stderr: "missing go.sum entry".to_string(),
        });
        let msg = err.to_string();
        assert!(msg.starts_with("tidying go.mod"));
        assert!(msg.contains("missing go.sum entry"));

        let err = PipelineError::Upgrade(ApplyError::CommandFailed {
            command: "go get".to_string(),
            stderr: "invalid version".to_string(),
        });
        assert!(err.to_string().starts_with("upgrading modules"));
    }

    #[test]
    fn test_pipeline_error_from_manifest_error() {
        let err: PipelineError = ManifestError::not_found("/missing/go.mod").into();
        let msg = err.to_string();
        assert!(msg.starts_with("reading go.mod"));
        assert!(msg.contains("manifest file not found"));
    }

    #[test]
    fn test_pipeline_error_from_prompt_error() {
        let err: PipelineError = PromptError::UnknownOption("bogus".to_string()).into();
        assert!(err.to_string().contains("unknown selection 'bogus'"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = ManifestError::not_found("/test");
        let debug = format!("{:?}", err);
        assert!(debug.contains("NotFound"));
    }
}
