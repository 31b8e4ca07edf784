//! Decision table for which Go toolchain to install
//!
//! ```text
//! | go.mod >        | None        | Below min   | In range                     | Above max                  |
//! | Installed v     |             |             |                              |                            |
//! |-----------------|-------------|-------------|------------------------------|----------------------------|
//! | None            | Install max | Install min | Install go.mod version       | Install max                |
//! | Below min       | Install max | Install min | Install go.mod version       | Install max                |
//! | In range        | No action   | No action   | Install go.mod if newer      | Install max if newer       |
//! | Above max       | Install max | Install min | Install go.mod version       | No action                  |
//! ```
//!
//! The recommended version is always inside the supported range.

use std::cmp::Ordering;
use std::fmt;

use crate::diagnostics::{DiagnosticCode, DiagnosticsSink};
use crate::version::range::SupportedRange;
use crate::version::semver::compare_major_minor;

/// Versions discovered for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionInfo {
    /// Greatest `go` directive across the workspace's `go.mod` files
    pub manifest_version: Option<String>,
    /// Version of the Go installation found in the environment
    pub environment_version: Option<String>,
}

impl VersionInfo {
    pub fn new(manifest_version: Option<&str>, environment_version: Option<&str>) -> Self {
        Self {
            manifest_version: manifest_version.map(str::to_string),
            environment_version: environment_version.map(str::to_string),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "go.mod version: {}, go.mod directive found: {}, go env version: {}, go installation found: {}",
            self.manifest_version.as_deref().unwrap_or(""),
            self.manifest_version.is_some(),
            self.environment_version.as_deref().unwrap_or(""),
            self.environment_version.is_some(),
        )
    }
}

/// Where a discovered version sits relative to the supported range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement<'a> {
    Absent,
    BelowRange(&'a str),
    InRange(&'a str),
    AboveRange(&'a str),
}

impl<'a> Placement<'a> {
    pub fn classify(version: Option<&'a str>, range: &SupportedRange) -> Self {
        match version {
            None => Self::Absent,
            Some(v) if range.below(v) => Self::BelowRange(v),
            Some(v) if range.above(v) => Self::AboveRange(v),
            Some(v) => Self::InRange(v),
        }
    }
}

/// Outcome of the decision table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub message: String,
    pub version: Option<String>,
    pub code: DiagnosticCode,
}

impl Recommendation {
    /// Version to install, or the empty string when nothing should be installed
    pub fn version_to_install(&self) -> &str {
        self.version.as_deref().unwrap_or("")
    }
}

/// Decide which version to install and emit the matching diagnostic.
pub fn decide(
    info: &VersionInfo,
    range: &SupportedRange,
    sink: &dyn DiagnosticsSink,
) -> Recommendation {
    let recommendation = plan(info, range);
    sink.emit(&recommendation.message, recommendation.code);
    recommendation
}

/// The decision table without side effects.
pub fn plan(info: &VersionInfo, range: &SupportedRange) -> Recommendation {
    use Placement::{AboveRange, Absent, BelowRange, InRange};

    let manifest = Placement::classify(info.manifest_version.as_deref(), range);
    let env = Placement::classify(info.environment_version.as_deref(), range);
    let (min, max) = (range.min(), range.max());

    let install_max = |message: String, code| Recommendation {
        message,
        version: Some(max.to_string()),
        code,
    };
    let install_min = |message: String, code| Recommendation {
        message,
        version: Some(min.to_string()),
        code,
    };
    let install = |message: String, version: &str, code| Recommendation {
        message,
        version: Some(version.to_string()),
        code,
    };
    let no_action = |message: String, code| Recommendation {
        message,
        version: None,
        code,
    };

    match (manifest, env) {
        (Absent, Absent) => install_max(
            format!(
                "No version of Go installed and no `go.mod` file found. Requesting the maximum \
                 supported version of Go ({max})."
            ),
            DiagnosticCode::NoManifestAndNoEnv,
        ),
        (Absent, BelowRange(e)) => install_max(
            no_manifest_env_unsupported(e, range),
            DiagnosticCode::NoManifestAndEnvBelowRange,
        ),
        (Absent, AboveRange(e)) => install_max(
            no_manifest_env_unsupported(e, range),
            DiagnosticCode::NoManifestAndEnvAboveRange,
        ),
        (Absent, InRange(e)) => no_action(
            format!(
                "No `go.mod` file found. Version {e} installed in the environment is supported. \
                 Not requesting any version of Go."
            ),
            DiagnosticCode::NoManifestAndEnvSupported,
        ),

        (AboveRange(m), Absent) => install_max(
            format!(
                "The version of Go found in the `go.mod` file ({m}) is above the supported range \
                 ({range}). No version of Go installed. Requesting the maximum supported version \
                 of Go ({max})."
            ),
            DiagnosticCode::ManifestAboveRangeAndNoEnv,
        ),
        (AboveRange(m), AboveRange(e)) => no_action(
            format!(
                "The version of Go found in the `go.mod` file ({m}) is above the supported range \
                 ({range}). The version of Go installed in the environment ({e}) is above the \
                 supported range ({range}). Not requesting any version of Go."
            ),
            DiagnosticCode::ManifestAboveRangeAndEnvAboveRange,
        ),
        (AboveRange(m), BelowRange(e)) => install_max(
            format!(
                "The version of Go found in the `go.mod` file ({m}) is above the supported range \
                 ({range}). The version of Go installed in the environment ({e}) is below the \
                 supported range ({range}). Requesting the maximum supported version of Go \
                 ({max})."
            ),
            DiagnosticCode::ManifestAboveRangeAndEnvBelowRange,
        ),
        (AboveRange(m), InRange(e)) if compare_major_minor(e, max) == Ordering::Less => {
            install_max(
                format!(
                    "The version of Go found in the `go.mod` file ({m}) is above the supported \
                     range ({range}). The version of Go installed in the environment ({e}) is \
                     below the maximum supported version ({max}). Requesting the maximum \
                     supported version of Go ({max})."
                ),
                DiagnosticCode::ManifestAboveRangeAndEnvBelowMax,
            )
        }
        (AboveRange(m), InRange(e)) => no_action(
            format!(
                "The version of Go found in the `go.mod` file ({m}) is above the supported range \
                 ({range}). The version of Go installed in the environment ({e}) is the maximum \
                 supported version ({max}). Not requesting any version of Go."
            ),
            DiagnosticCode::ManifestAboveRangeAndEnvAtMax,
        ),

        (BelowRange(m), Absent) => install_min(
            format!(
                "The version of Go found in the `go.mod` file ({m}) is below the supported range \
                 ({range}). No version of Go installed. Requesting the minimum supported version \
                 of Go ({min})."
            ),
            DiagnosticCode::ManifestBelowRangeAndNoEnv,
        ),
        (BelowRange(m), BelowRange(e) | AboveRange(e)) => install_min(
            format!(
                "The version of Go found in the `go.mod` file ({m}) is below the supported range \
                 ({range}). The version of Go installed in the environment ({e}) is outside of \
                 the supported range ({range}). Requesting the minimum supported version of Go \
                 ({min})."
            ),
            DiagnosticCode::ManifestBelowRangeAndEnvUnsupported,
        ),
        (BelowRange(m), InRange(e)) => no_action(
            env_high_enough(e, m),
            DiagnosticCode::ManifestBelowRangeAndEnvSupported,
        ),

        (InRange(m), Absent) => install(
            format!(
                "No version of Go installed. Requesting the version of Go found in the `go.mod` \
                 file ({m})."
            ),
            m,
            DiagnosticCode::ManifestSupportedAndNoEnv,
        ),
        (InRange(m), BelowRange(e) | AboveRange(e)) => install(
            format!(
                "The version of Go installed in the environment ({e}) is outside of the \
                 supported range ({range}). Requesting the version of Go from the `go.mod` file \
                 ({m})."
            ),
            m,
            DiagnosticCode::ManifestSupportedAndEnvUnsupported,
        ),
        (InRange(m), InRange(e)) if compare_major_minor(m, e) == Ordering::Greater => install(
            format!(
                "The version of Go installed in the environment ({e}) is lower than the version \
                 found in the `go.mod` file ({m}). Requesting the version of Go from the `go.mod` \
                 file ({m})."
            ),
            m,
            DiagnosticCode::ManifestSupportedAndEnvOlder,
        ),
        (InRange(m), InRange(e)) => no_action(
            env_high_enough(e, m),
            DiagnosticCode::ManifestSupportedAndEnvNewerOrEqual,
        ),
    }
}

fn no_manifest_env_unsupported(env: &str, range: &SupportedRange) -> String {
    format!(
        "No `go.mod` file found. The version of Go installed in the environment ({env}) is \
         outside of the supported range ({range}). Requesting the maximum supported version of \
         Go ({}).",
        range.max()
    )
}

fn env_high_enough(env: &str, manifest: &str) -> String {
    format!(
        "The version of Go installed in the environment ({env}) is supported and is high enough \
         for the version found in the `go.mod` file ({manifest}). Not requesting any version of \
         Go."
    )
}
