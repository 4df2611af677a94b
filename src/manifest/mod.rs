//! go.mod reading and candidate selection
//!
//! This module provides functionality to:
//! - Read and parse go.mod from a project directory
//! - Derive the set of direct, remotely resolvable modules to query

mod candidates;
mod go_mod;

pub use candidates::{
    is_direct, is_not_locally_replaced, matches_package_filter, CandidateSet, RequirementFilter,
};
pub use go_mod::{GoMod, GoModParser};

use crate::error::ManifestError;
use std::path::Path;

/// File name of the Go module manifest
pub const GO_MOD: &str = "go.mod";

/// Read and parse `go.mod` from a project directory
pub fn read_manifest(dir: &Path) -> Result<GoMod, ManifestError> {
    let path = dir.join(GO_MOD);
    if !path.is_file() {
        return Err(ManifestError::not_found(path));
    }

    let content =
        std::fs::read_to_string(&path).map_err(|e| ManifestError::read_error(&path, e))?;
    GoModParser.parse(&content)
}
