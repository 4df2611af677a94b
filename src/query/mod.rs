//! Version query sources for Go modules
//!
//! This module provides:
//! - The `ModuleQuery` trait the resolver calls once per attempt
//! - `GoListQuery`, backed by `go list -m -u -json`
//! - `ProxyQuery`, backed by the Go module proxy `@latest` endpoint
//! - Version comparison helpers

mod client;
mod go_list;
mod proxy;
mod version;

pub use client::HttpClient;
pub use go_list::GoListQuery;
pub use proxy::{proxy_url_from_env, ProxyQuery, DEFAULT_PROXY_URL};
pub use version::{compare_versions, is_newer};

use crate::domain::ModuleVersion;
use crate::error::QueryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Newest version reported by a query source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestVersion {
    /// The version string (e.g., "v1.10.0")
    pub version: String,
    /// When the version was published, if known
    pub released_at: Option<DateTime<Utc>>,
}

impl LatestVersion {
    /// Create a LatestVersion without a release time
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            released_at: None,
        }
    }
}

/// Trait for sources of available module versions
#[async_trait]
pub trait ModuleQuery: Send + Sync {
    /// Get the name of the source, used in messages
    fn source_name(&self) -> &'static str;

    /// Newest version newer than the one required, or `None` if already newest
    async fn latest(
        &self,
        dir: &Path,
        module: &ModuleVersion,
    ) -> Result<Option<LatestVersion>, QueryError>;
}
