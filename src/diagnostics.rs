//! Diagnostic codes and sinks for toolchain decisions
//!
//! Every decision produces exactly one diagnostic. The code identifies which
//! cell of the decision table fired; the message is for operators.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

#[cfg(test)]
use mockall::automock;

const EXTRACTOR_NAME: &str = "go";

#[derive(Debug, Error)]
pub enum DiagnosticsError {
    #[error("Failed to serialize diagnostic: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write diagnostic: {0}")]
    Io(#[from] std::io::Error),
}

/// One code per decision outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    NoManifestAndNoEnv,
    NoManifestAndEnvBelowRange,
    NoManifestAndEnvAboveRange,
    NoManifestAndEnvSupported,
    ManifestAboveRangeAndNoEnv,
    ManifestAboveRangeAndEnvAboveRange,
    ManifestAboveRangeAndEnvBelowRange,
    ManifestAboveRangeAndEnvBelowMax,
    ManifestAboveRangeAndEnvAtMax,
    ManifestBelowRangeAndNoEnv,
    ManifestBelowRangeAndEnvUnsupported,
    ManifestBelowRangeAndEnvSupported,
    ManifestSupportedAndNoEnv,
    ManifestSupportedAndEnvUnsupported,
    ManifestSupportedAndEnvOlder,
    ManifestSupportedAndEnvNewerOrEqual,
}

impl DiagnosticCode {
    pub const ALL: [DiagnosticCode; 16] = [
        Self::NoManifestAndNoEnv,
        Self::NoManifestAndEnvBelowRange,
        Self::NoManifestAndEnvAboveRange,
        Self::NoManifestAndEnvSupported,
        Self::ManifestAboveRangeAndNoEnv,
        Self::ManifestAboveRangeAndEnvAboveRange,
        Self::ManifestAboveRangeAndEnvBelowRange,
        Self::ManifestAboveRangeAndEnvBelowMax,
        Self::ManifestAboveRangeAndEnvAtMax,
        Self::ManifestBelowRangeAndNoEnv,
        Self::ManifestBelowRangeAndEnvUnsupported,
        Self::ManifestBelowRangeAndEnvSupported,
        Self::ManifestSupportedAndNoEnv,
        Self::ManifestSupportedAndEnvUnsupported,
        Self::ManifestSupportedAndEnvOlder,
        Self::ManifestSupportedAndEnvNewerOrEqual,
    ];

    /// Stable identifier used in diagnostic records
    pub fn id(&self) -> &'static str {
        match self {
            Self::NoManifestAndNoEnv => "go/autobuilder/env-no-go-mod-no-go-env",
            Self::NoManifestAndEnvBelowRange => "go/autobuilder/env-no-go-mod-go-env-below-supported",
            Self::NoManifestAndEnvAboveRange => "go/autobuilder/env-no-go-mod-go-env-above-supported",
            Self::NoManifestAndEnvSupported => "go/autobuilder/env-no-go-mod-go-env-supported",
            Self::ManifestAboveRangeAndNoEnv => "go/autobuilder/env-go-mod-too-high-no-go-env",
            Self::ManifestAboveRangeAndEnvAboveRange => {
                "go/autobuilder/env-go-mod-too-high-go-env-too-high"
            }
            Self::ManifestAboveRangeAndEnvBelowRange => {
                "go/autobuilder/env-go-mod-too-high-go-env-too-low"
            }
            Self::ManifestAboveRangeAndEnvBelowMax => {
                "go/autobuilder/env-go-mod-too-high-go-env-below-max"
            }
            Self::ManifestAboveRangeAndEnvAtMax => "go/autobuilder/env-go-mod-too-high-go-env-max",
            Self::ManifestBelowRangeAndNoEnv => "go/autobuilder/env-go-mod-too-low-no-go-env",
            Self::ManifestBelowRangeAndEnvUnsupported => {
                "go/autobuilder/env-go-mod-too-low-go-env-unsupported"
            }
            Self::ManifestBelowRangeAndEnvSupported => {
                "go/autobuilder/env-go-mod-too-low-go-env-supported"
            }
            Self::ManifestSupportedAndNoEnv => "go/autobuilder/env-go-mod-supported-no-go-env",
            Self::ManifestSupportedAndEnvUnsupported => {
                "go/autobuilder/env-go-mod-supported-go-env-unsupported"
            }
            Self::ManifestSupportedAndEnvOlder => {
                "go/autobuilder/env-go-mod-supported-go-env-older"
            }
            Self::ManifestSupportedAndEnvNewerOrEqual => {
                "go/autobuilder/env-go-mod-supported-go-env-newer-or-equal"
            }
        }
    }

    /// Short human-readable title
    pub fn name(&self) -> &'static str {
        match self {
            Self::NoManifestAndNoEnv => "No `go.mod` file found and no Go version in environment",
            Self::NoManifestAndEnvBelowRange => {
                "No `go.mod` file found and Go version in environment is below supported range"
            }
            Self::NoManifestAndEnvAboveRange => {
                "No `go.mod` file found and Go version in environment is above supported range"
            }
            Self::NoManifestAndEnvSupported => {
                "No `go.mod` file found and Go version in environment is supported"
            }
            Self::ManifestAboveRangeAndNoEnv => {
                "Go version in `go.mod` file above supported range and no Go version in environment"
            }
            Self::ManifestAboveRangeAndEnvAboveRange => {
                "Go version in `go.mod` file above supported range and Go version in environment above supported range"
            }
            Self::ManifestAboveRangeAndEnvBelowRange => {
                "Go version in `go.mod` file above supported range and Go version in environment below supported range"
            }
            Self::ManifestAboveRangeAndEnvBelowMax => {
                "Go version in `go.mod` file above supported range and Go version in environment is supported and below the maximum supported version"
            }
            Self::ManifestAboveRangeAndEnvAtMax => {
                "Go version in `go.mod` file above supported range and Go version in environment is the maximum supported version"
            }
            Self::ManifestBelowRangeAndNoEnv => {
                "Go version in `go.mod` file below supported range and no Go version in environment"
            }
            Self::ManifestBelowRangeAndEnvUnsupported => {
                "Go version in `go.mod` file below supported range and Go version in environment unsupported"
            }
            Self::ManifestBelowRangeAndEnvSupported => {
                "Go version in `go.mod` file below supported range and Go version in environment supported"
            }
            Self::ManifestSupportedAndNoEnv => {
                "Go version in `go.mod` file in supported range and no Go version in environment"
            }
            Self::ManifestSupportedAndEnvUnsupported => {
                "Go version in `go.mod` file in supported range and Go version in environment unsupported"
            }
            Self::ManifestSupportedAndEnvOlder => {
                "Go version in `go.mod` file in supported range and higher than Go version in environment"
            }
            Self::ManifestSupportedAndEnvNewerOrEqual => {
                "Go version in `go.mod` file in supported range and lower than or equal to Go version in environment"
            }
        }
    }
}

/// Receiver for decision diagnostics
///
/// Implementations must not fail the caller; IO problems are logged and dropped.
#[cfg_attr(test, automock)]
pub trait DiagnosticsSink {
    fn emit(&self, message: &str, code: DiagnosticCode);
}

/// Sink that writes diagnostics to the tracing log
#[derive(Debug, Default)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn emit(&self, message: &str, code: DiagnosticCode) {
        info!(code = code.id(), "{}", message);
    }
}

/// Sink that forwards every diagnostic to each inner sink in order
#[derive(Default)]
pub struct CompositeSink {
    sinks: Vec<Box<dyn DiagnosticsSink>>,
}

impl CompositeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl DiagnosticsSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

impl DiagnosticsSink for CompositeSink {
    fn emit(&self, message: &str, code: DiagnosticCode) {
        for sink in &self.sinks {
            sink.emit(message, code);
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosticSource<'a> {
    id: &'a str,
    name: &'a str,
    extractor_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosticVisibility {
    status_page: bool,
    cli_summary_table: bool,
    telemetry: bool,
}

/// On-disk diagnostic record
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosticRecord<'a> {
    timestamp: String,
    source: DiagnosticSource<'a>,
    markdown_message: &'a str,
    severity: &'a str,
    visibility: DiagnosticVisibility,
}

/// Sink that writes one JSON file per diagnostic into a directory
#[derive(Debug)]
pub struct FileSink {
    dir: PathBuf,
    counter: AtomicUsize,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            counter: AtomicUsize::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, message: &str, code: DiagnosticCode) -> Result<PathBuf, DiagnosticsError> {
        let now = Utc::now();
        let record = DiagnosticRecord {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            source: DiagnosticSource {
                id: code.id(),
                name: code.name(),
                extractor_name: EXTRACTOR_NAME,
            },
            markdown_message: message,
            severity: "note",
            // Environment decisions are only interesting as telemetry
            visibility: DiagnosticVisibility {
                status_page: false,
                cli_summary_table: false,
                telemetry: true,
            },
        };

        fs::create_dir_all(&self.dir)?;
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let path = self.dir.join(format!(
            "autobuilder-{}-{}.json",
            now.format("%Y%m%d%H%M%S%3f"),
            n
        ));
        fs::write(&path, serde_json::to_vec_pretty(&record)?)?;
        Ok(path)
    }
}

impl DiagnosticsSink for FileSink {
    fn emit(&self, message: &str, code: DiagnosticCode) {
        if let Err(e) = self.write(message, code) {
            warn!(
                "Failed to write diagnostic {} to {}: {}",
                code.id(),
                self.dir.display(),
                e
            );
        }
    }
}
