//! Supported toolchain range
//!
//! All range checks ignore the patch component: with a maximum of 1.21,
//! 1.21.5 is in range and 1.22.0 is above it.

use std::cmp::Ordering;
use std::fmt;

use crate::version::error::RangeError;
use crate::version::semver::{compare_major_minor, parse_version};

/// Inclusive `[min, max]` window of toolchain versions that may be recommended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedRange {
    min: String,
    max: String,
}

impl SupportedRange {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Result<Self, RangeError> {
        let min = min.into();
        let max = max.into();

        if parse_version(&min).is_none() {
            return Err(RangeError::InvalidBound(min));
        }
        if parse_version(&max).is_none() {
            return Err(RangeError::InvalidBound(max));
        }
        if compare_major_minor(&min, &max) == Ordering::Greater {
            return Err(RangeError::Inverted { min, max });
        }

        Ok(Self { min, max })
    }

    pub fn min(&self) -> &str {
        &self.min
    }

    pub fn max(&self) -> &str {
        &self.max
    }

    /// `version` is lower than the minimum
    pub fn below(&self, version: &str) -> bool {
        compare_major_minor(version, &self.min) == Ordering::Less
    }

    /// `version` is higher than the maximum
    pub fn above(&self, version: &str) -> bool {
        compare_major_minor(version, &self.max) == Ordering::Greater
    }

    pub fn outside(&self, version: &str) -> bool {
        self.below(version) || self.above(version)
    }

    pub fn contains(&self, version: &str) -> bool {
        !self.outside(version)
    }
}

impl fmt::Display for SupportedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn range() -> SupportedRange {
        SupportedRange::new("1.11", "1.21").unwrap()
    }

    #[rstest]
    #[case("1.10", true, false)]
    #[case("1.10.9", true, false)]
    #[case("1.11", false, false)]
    #[case("1.11.0", false, false)]
    #[case("1.18", false, false)]
    #[case("1.21", false, false)]
    #[case("1.21.13", false, false)]
    #[case("1.22", false, true)]
    #[case("1.22rc1", false, true)]
    #[case("2.0", false, true)]
    #[case("0.9", true, false)]
    fn classifies_against_range(
        range: SupportedRange,
        #[case] version: &str,
        #[case] below: bool,
        #[case] above: bool,
    ) {
        assert_eq!(range.below(version), below);
        assert_eq!(range.above(version), above);
        assert_eq!(range.outside(version), below || above);
        assert_eq!(range.contains(version), !(below || above));
    }

    #[rstest]
    #[case("1.0")]
    #[case("1.11")]
    #[case("1.16.4")]
    #[case("1.21.99")]
    #[case("1.30")]
    #[case("3.1")]
    #[case("not-a-version")]
    fn below_and_above_are_mutually_exclusive(range: SupportedRange, #[case] version: &str) {
        assert!(!(range.below(version) && range.above(version)));
    }

    #[test]
    fn malformed_version_is_below_range() {
        let range = SupportedRange::new("1.11", "1.21").unwrap();

        assert!(range.below("garbage"));
        assert!(!range.above("garbage"));
    }

    #[test]
    fn new_rejects_unparseable_bound() {
        assert_eq!(
            SupportedRange::new("one", "1.21"),
            Err(RangeError::InvalidBound("one".to_string()))
        );
    }

    #[test]
    fn new_rejects_inverted_bounds() {
        assert_eq!(
            SupportedRange::new("1.21", "1.11"),
            Err(RangeError::Inverted {
                min: "1.21".to_string(),
                max: "1.11".to_string()
            })
        );
    }

    #[test]
    fn new_accepts_single_version_range() {
        let range = SupportedRange::new("1.21", "1.21.4").unwrap();

        assert!(range.contains("1.21.0"));
        assert!(range.above("1.22"));
        assert!(range.below("1.20"));
    }

    #[rstest]
    fn displays_as_min_dash_max(range: SupportedRange) {
        assert_eq!(range.to_string(), "1.11-1.21");
    }
}
