//! Module identity and go.mod requirement structures

use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A Go module pinned at a version
///
/// Two values are equal when their module paths are equal; the version is
/// carried along but does not take part in identity.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleVersion {
    /// Module path (e.g., "github.com/gin-gonic/gin")
    pub path: String,
    /// Version string as written in go.mod (e.g., "v1.9.1")
    pub version: String,
}

impl ModuleVersion {
    /// Creates a new module version
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }
}

impl PartialEq for ModuleVersion {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for ModuleVersion {}

impl Hash for ModuleVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.path, self.version)
    }
}

/// A single `require` entry of go.mod
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    /// The required module
    pub module: ModuleVersion,
    /// Whether the entry is marked `// indirect`
    pub indirect: bool,
}

impl Requirement {
    /// Creates a direct requirement
    pub fn direct(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            module: ModuleVersion::new(path, version),
            indirect: false,
        }
    }

    /// Creates an indirect requirement
    pub fn indirect(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            module: ModuleVersion::new(path, version),
            indirect: true,
        }
    }

    /// Returns the module path
    pub fn path(&self) -> &str {
        &self.module.path
    }

    /// Returns the required version
    pub fn version(&self) -> &str {
        &self.module.version
    }
}

/// A single `replace` directive of go.mod
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replacement {
    /// Module path being replaced
    pub old_path: String,
    /// Version being replaced (all versions when absent)
    pub old_version: Option<String>,
    /// Replacement module path or filesystem directory
    pub new_path: String,
    /// Replacement version (absent for directory replacements)
    pub new_version: Option<String>,
}

impl Replacement {
    /// Returns true if the replacement points at a local directory
    pub fn is_local(&self) -> bool {
        is_directory_path(&self.new_path)
    }
}

/// Check whether a replacement target is a filesystem path rather than a module path
///
/// Mirrors the rules of the go command: relative paths must start with `./`
/// or `../` (or the backslash forms), absolute paths start with `/` or a
/// Windows drive letter.
pub fn is_directory_path(path: &str) -> bool {
    if path == "." || path == ".." {
        return true;
    }
    if ["./", "../", ".\\", "..\\", "/"]
        .iter()
        .any(|prefix| path.starts_with(prefix))
    {
        return true;
    }

    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
