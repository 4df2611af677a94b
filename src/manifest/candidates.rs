//! Candidate selection over go.mod requirements
//!
//! Candidates are the direct requirements that can be queried remotely.
//! Each exclusion rule is a pure predicate over a requirement so the set can
//! be built (and tested) from composable filters.

use super::GoMod;
use crate::domain::{ModuleVersion, Requirement};
use std::collections::HashSet;

/// A predicate deciding whether a requirement stays a candidate
pub type RequirementFilter<'a> = Box<dyn Fn(&Requirement) -> bool + 'a>;

/// Keeps requirements that are not marked `// indirect`
pub fn is_direct<'a>() -> RequirementFilter<'a> {
    Box::new(|requirement: &Requirement| !requirement.indirect)
}

/// Keeps requirements whose path is not redirected to a local directory
pub fn is_not_locally_replaced(go_mod: &GoMod) -> RequirementFilter<'_> {
    let local: HashSet<&str> = go_mod.local_replacement_paths().into_iter().collect();
    Box::new(move |requirement: &Requirement| !local.contains(requirement.path()))
}

/// Keeps requirements accepted by the `--only` / `--exclude` package filters
pub fn matches_package_filter<'a>(
    only: &'a [String],
    exclude: &'a [String],
) -> RequirementFilter<'a> {
    Box::new(move |requirement: &Requirement| {
        let path = requirement.path();
        if !only.is_empty() {
            return only.iter().any(|p| p == path);
        }
        !exclude.iter().any(|p| p == path)
    })
}

/// Ordered, immutable set of modules to query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    modules: Vec<ModuleVersion>,
}

impl CandidateSet {
    /// Build the set from requirements passing every filter, in file order
    ///
    /// A path listed twice in go.mod is kept once (first occurrence).
    pub fn build(requirements: &[Requirement], filters: &[RequirementFilter<'_>]) -> Self {
        let mut seen = HashSet::new();
        let modules = requirements
            .iter()
            .filter(|&requirement| filters.iter().all(|keep| keep(requirement)))
            .filter(|requirement| seen.insert(requirement.path().to_string()))
            .map(|requirement| requirement.module.clone())
            .collect();
        Self { modules }
    }

    /// Build the default set for a go.mod: direct and not locally replaced
    pub fn from_go_mod(go_mod: &GoMod) -> Self {
        Self::build(
            &go_mod.requirements,
            &[is_direct(), is_not_locally_replaced(go_mod)],
        )
    }

    /// Candidate modules in manifest order
    pub fn modules(&self) -> &[ModuleVersion] {
        &self.modules
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if there is nothing to query
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
