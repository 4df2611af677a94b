//! Resolution results, change entries and run outcomes

use super::ModuleVersion;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Result of querying one candidate module for a newer version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateInfo {
    /// The module as currently required
    pub module: ModuleVersion,
    /// Newest available version, absent when there is nothing newer
    pub available: Option<String>,
    /// When the available version was published, if the source reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_at: Option<DateTime<Utc>>,
}

impl UpdateInfo {
    /// Creates an UpdateInfo with a newer version
    pub fn available(module: ModuleVersion, version: impl Into<String>) -> Self {
        Self {
            module,
            available: Some(version.into()),
            released_at: None,
        }
    }

    /// Creates an UpdateInfo for a module that is already current
    pub fn current(module: ModuleVersion) -> Self {
        Self {
            module,
            available: None,
            released_at: None,
        }
    }

    /// Sets the release time of the available version
    pub fn with_released_at(mut self, released_at: DateTime<Utc>) -> Self {
        self.released_at = Some(released_at);
        self
    }
}

/// One offered upgrade: a required module whose available version differs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEntry {
    /// The module at its currently required version
    pub module: ModuleVersion,
    /// The version it would be upgraded to
    pub available: String,
    /// Display label, also used as the selection key
    pub label: String,
    /// When the available version was published, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_at: Option<DateTime<Utc>>,
}

impl ChangeEntry {
    /// Creates a change entry, deriving its label
    pub fn new(module: ModuleVersion, available: impl Into<String>) -> Self {
        let available = available.into();
        let label = format!("{} ({} --> {})", module.path, module.version, available);
        Self {
            module,
            available,
            label,
            released_at: None,
        }
    }

    /// Sets the release time of the available version
    pub fn with_released_at(mut self, released_at: Option<DateTime<Utc>>) -> Self {
        self.released_at = released_at;
        self
    }

    /// Returns the upgrade target as `path@available`
    pub fn target(&self) -> ModuleVersion {
        ModuleVersion::new(&self.module.path, &self.available)
    }
}

impl fmt::Display for ChangeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Successful terminal state of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// Every direct module is already at its newest version
    NothingToUpgrade,
    /// Changes were offered but none was chosen
    NoSelection,
    /// Changes were found but not applied (dry-run)
    Planned {
        /// The changes that would be offered
        changes: Vec<ChangeEntry>,
    },
    /// The chosen changes were applied and the module graph tidied
    Upgraded {
        /// The applied changes
        changes: Vec<ChangeEntry>,
    },
}

impl Outcome {
    /// Returns true if the manifest was mutated
    pub fn is_mutation(&self) -> bool {
        matches!(self, Outcome::Upgraded { .. })
    }

    /// Returns the changes carried by this outcome
    pub fn changes(&self) -> &[ChangeEntry] {
        match self {
            Outcome::Planned { changes } | Outcome::Upgraded { changes } => changes,
            Outcome::NothingToUpgrade | Outcome::NoSelection => &[],
        }
    }
}
