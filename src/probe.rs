//! Detection of the Go toolchain installed in the environment

use std::process::Command;

use tracing::debug;

use crate::version::semver::normalize_version;

/// Source of the toolchain version available in the execution environment
pub trait EnvironmentProbe {
    /// Installed version without any `go` prefix, or `None` when not installed
    fn installed_version(&self) -> Option<String>;
}

/// Probe that asks the `go` binary on the path for its version
pub struct GoToolchainProbe {
    binary: String,
}

impl GoToolchainProbe {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for GoToolchainProbe {
    fn default() -> Self {
        Self::new("go")
    }
}

impl EnvironmentProbe for GoToolchainProbe {
    fn installed_version(&self) -> Option<String> {
        let output = Command::new(&self.binary)
            .args(["env", "GOVERSION"])
            .output()
            .inspect_err(|e| debug!("Failed to run {} env GOVERSION: {}", self.binary, e))
            .ok()?;

        if !output.status.success() {
            debug!(
                "{} env GOVERSION exited with {}: {}",
                self.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        parse_goversion(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Probe that always reports the same answer
#[derive(Debug, Clone, Default)]
pub struct FixedProbe(pub Option<String>);

impl EnvironmentProbe for FixedProbe {
    fn installed_version(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Turn `go1.21.3` into `1.21.3`; blank output means no usable installation
fn parse_goversion(stdout: &str) -> Option<String> {
    let line = stdout.lines().next()?.trim();
    // Development builds report e.g. `devel go1.22-abcdef`
    let version = line.split_whitespace().find(|w| w.starts_with("go"))?;
    let version = normalize_version(version);
    let version = version.split(['-', ' ']).next().unwrap_or(version);
    (!version.is_empty()).then(|| version.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("go1.21.3\n", Some("1.21.3"))]
    #[case("go1.18\n", Some("1.18"))]
    #[case("go1.22rc1\n", Some("1.22rc1"))]
    #[case("devel go1.23-abcdef Tue Jan 1 00:00:00 2024\n", Some("1.23"))]
    #[case("", None)]
    #[case("\n", None)]
    #[case("go\n", None)]
    fn parse_goversion_returns_expected(#[case] stdout: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_goversion(stdout).as_deref(), expected);
    }

    #[test]
    fn missing_binary_reports_not_installed() {
        let probe = GoToolchainProbe::new("definitely-not-a-go-binary-on-path");

        assert_eq!(probe.installed_version(), None);
    }

    #[test]
    fn fixed_probe_returns_configured_version() {
        assert_eq!(
            FixedProbe(Some("1.19".to_string())).installed_version(),
            Some("1.19".to_string())
        );
        assert_eq!(FixedProbe(None).installed_version(), None);
    }
}
