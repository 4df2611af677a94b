//! Change set computation
//!
//! Compares each direct requirement against its resolved newest version and
//! produces the ordered list of upgrades to offer.

use crate::domain::{ChangeEntry, Requirement, UpdateInfo};
use std::collections::{HashMap, HashSet};

/// Compute the offered changes, in manifest order
///
/// Indirect requirements and requirements without a resolution entry
/// (locally replaced or filtered out) are skipped. A change is offered when
/// the available version differs from the required one. A path required
/// more than once is judged on its first occurrence only.
pub fn diff_changes(
    requirements: &[Requirement],
    resolved: &HashMap<String, UpdateInfo>,
) -> Vec<ChangeEntry> {
    let mut seen = HashSet::new();
    requirements
        .iter()
        .filter(|requirement| !requirement.indirect)
        .filter(|requirement| seen.insert(requirement.path()))
        .filter_map(|requirement| {
            let info = resolved.get(requirement.path())?;
            let available = info.available.as_deref()?;
            (available != requirement.version()).then(|| {
                ChangeEntry::new(requirement.module.clone(), available)
                    .with_released_at(info.released_at)
            })
        })
        .collect()
}
