//! Go Module Proxy query source
//!
//! Fetches the newest module version from the Go Module Proxy.
//! API endpoint:
//! - Latest version: {proxy}/{module}/@latest

use super::{is_newer, HttpClient, LatestVersion, ModuleQuery};
use crate::domain::ModuleVersion;
use crate::error::QueryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

/// Go Module Proxy base URL
pub const DEFAULT_PROXY_URL: &str = "https://proxy.golang.org";

/// Go Module Proxy query source
pub struct ProxyQuery {
    client: HttpClient,
    base_url: String,
}

/// `@latest` response
#[derive(Debug, Deserialize)]
struct LatestResponse {
    /// Version string
    #[serde(rename = "Version")]
    version: String,
    /// Time when the version was created
    #[serde(rename = "Time")]
    time: Option<DateTime<Utc>>,
}

impl ProxyQuery {
    /// Create a proxy query source for the given base URL
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Build the URL for the latest version
    fn build_latest_url(&self, module: &str) -> String {
        format!("{}/{}/@latest", self.base_url, Self::encode_module_path(module))
    }

    /// Encode module path for the Go Proxy URL
    fn encode_module_path(module: &str) -> String {
        // Go Proxy uses case-encoded paths where uppercase letters become !lowercase
        let mut encoded = String::with_capacity(module.len());

        for ch in module.chars() {
            if ch.is_uppercase() {
                encoded.push('!');
                for lower in ch.to_lowercase() {
                    encoded.push(lower);
                }
            } else {
                encoded.push(ch);
            }
        }

        encoded
    }
}

/// Pick the proxy to query from a GOPROXY value
///
/// GOPROXY is a list separated by `,` or `|`; `direct` and `off` are not
/// proxies and are skipped.
pub fn proxy_url_from_env(goproxy: Option<&str>) -> String {
    goproxy
        .into_iter()
        .flat_map(|value| value.split([',', '|']))
        .map(str::trim)
        .find(|entry| !entry.is_empty() && *entry != "direct" && *entry != "off")
        .unwrap_or(DEFAULT_PROXY_URL)
        .to_string()
}

#[async_trait]
impl ModuleQuery for ProxyQuery {
    fn source_name(&self) -> &'static str {
        "Go Proxy"
    }

    async fn latest(
        &self,
        _dir: &Path,
        module: &ModuleVersion,
    ) -> Result<Option<LatestVersion>, QueryError> {
        let url = self.build_latest_url(&module.path);
        let latest: LatestResponse = self
            .client
            .get_json(&url, &module.path, self.source_name())
            .await?;

        if !is_newer(&latest.version, &module.version) {
            return Ok(None);
        }

        Ok(Some(LatestVersion {
            version: latest.version,
            released_at: latest.time,
        }))
    }
}
