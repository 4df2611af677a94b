//! Go module version comparison
//!
//! Go versions are semantic versions with a `v` prefix. Pseudo-versions are
//! prereleases and sort below the release they precede; `+incompatible` is
//! build metadata and does not affect precedence.

use semver::Version;
use std::cmp::Ordering;

/// Compare two module versions by precedence
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse(a), parse(b)) {
        (Some(a), Some(b)) => (a.major, a.minor, a.patch)
            .cmp(&(b.major, b.minor, b.patch))
            .then_with(|| a.pre.cmp(&b.pre)),
        _ => compare_numeric_parts(a, b),
    }
}

/// Returns true if `candidate` has higher precedence than `current`
pub fn is_newer(candidate: &str, current: &str) -> bool {
    compare_versions(candidate, current) == Ordering::Greater
}

fn parse(version: &str) -> Option<Version> {
    Version::parse(version.strip_prefix('v').unwrap_or(version)).ok()
}

/// Fallback for strings semver rejects: compare the numeric components only
fn compare_numeric_parts(a: &str, b: &str) -> Ordering {
    let parse_parts = |s: &str| -> Vec<u64> {
        let s = s.strip_prefix('v').unwrap_or(s);
        s.split(['.', '-', '+'])
            .filter_map(|p| p.parse().ok())
            .collect()
    };

    let parts_a = parse_parts(a);
    let parts_b = parse_parts(b);

    for (pa, pb) in parts_a.iter().zip(parts_b.iter()) {
        match pa.cmp(pb) {
            Ordering::Equal => continue,
            other => return other,
        }
    }

    parts_a.len().cmp(&parts_b.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_basic() {
        assert_eq!(compare_versions("v1.0.0", "v1.0.0"), Ordering::Equal);
        assert_eq!(compare_versions("v1.0.0", "v2.0.0"), Ordering::Less);
        assert_eq!(compare_versions("v2.0.0", "v1.0.0"), Ordering::Greater);
    }

    #[test]
    fn test_compare_multi_digit() {
        assert_eq!(compare_versions("v1.9.0", "v1.10.0"), Ordering::Less);
        assert_eq!(compare_versions("v10.0.0", "v9.0.0"), Ordering::Greater);
    }

    #[test]
    fn test_prerelease_sorts_below_release() {
        assert_eq!(compare_versions("v1.2.0-rc.1", "v1.2.0"), Ordering::Less);
        assert_eq!(compare_versions("v1.2.0-alpha", "v1.2.0-beta"), Ordering::Less);
    }

    #[test]
    fn test_pseudo_version_sorts_below_release() {
        assert!(is_newer(
            "v0.1.0",
            "v0.0.0-20231110203233-9a3e6036ecaa"
        ));
        assert!(!is_newer(
            "v0.0.0-20231110203233-9a3e6036ecaa",
            "v0.1.0"
        ));
    }

    #[test]
    fn test_incompatible_is_ignored_for_precedence() {
        assert_eq!(
            compare_versions("v2.0.0+incompatible", "v2.0.0"),
            Ordering::Equal
        );
        assert!(is_newer("v3.0.0+incompatible", "v2.0.0+incompatible"));
    }

    #[test]
    fn test_fallback_for_non_semver() {
        assert_eq!(compare_versions("v1.2", "v1.10"), Ordering::Less);
        assert_eq!(compare_versions("1.0", "1.0.0"), Ordering::Less);
    }

    #[test]
    fn test_is_newer() {
        assert!(is_newer("v1.1.0", "v1.0.0"));
        assert!(!is_newer("v1.0.0", "v1.0.0"));
        assert!(!is_newer("v0.9.0", "v1.0.0"));
    }
}
