use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use semver::{Prerelease, Version};

/// Go release suffixes such as `rc2` or `beta1` attached directly to the minor or patch
static GO_RELEASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:(rc|beta|alpha)(\d+))?$").unwrap()
});

/// Strip a leading `go` or `v` prefix (`go1.21.3` -> `1.21.3`, `v1.21` -> `1.21`).
pub fn normalize_version(version: &str) -> &str {
    let version = version.trim();
    version
        .strip_prefix("go")
        .or_else(|| version.strip_prefix('v'))
        .unwrap_or(version)
}

/// Parse a toolchain version string into a semver::Version, normalizing partial versions.
///
/// Handles partial versions like "1" or "1.2" by padding with zeros, and Go's
/// pre-release spelling ("1.21rc2") as a pre-release of the padded version.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "go1.21" -> Version(1, 21, 0)
/// - "1.21rc2" -> Version(1, 21, 0-rc.2)
pub fn parse_version(version: &str) -> Option<Version> {
    let normalized = normalize_version(version);
    let caps = GO_RELEASE_RE.captures(normalized)?;

    let number = |i: usize| -> Option<u64> {
        caps.get(i)
            .map(|m| m.as_str().parse().ok())
            .unwrap_or(Some(0))
    };

    let mut parsed = Version::new(number(1)?, number(2)?, number(3)?);
    if let (Some(kind), Some(n)) = (caps.get(4), caps.get(5)) {
        parsed.pre = Prerelease::new(&format!("{}.{}", kind.as_str(), n.as_str())).ok()?;
    }
    Some(parsed)
}

/// Extract the major.minor pair, ignoring patch and pre-release.
pub fn major_minor(version: &str) -> Option<(u64, u64)> {
    parse_version(version).map(|v| (v.major, v.minor))
}

/// Compare two versions on major.minor only, so 1.20.1 and 1.20 are equal.
///
/// Unparseable versions sort below every valid one and equal to each other.
pub fn compare_major_minor(a: &str, b: &str) -> Ordering {
    match (major_minor(a), major_minor(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compare two versions on the full semver ordering, with the same rule for invalid input.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
