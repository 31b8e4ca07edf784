//! Gathers versions from the collaborators and runs the decision

use tracing::{info, warn};

use crate::decision::{Recommendation, VersionInfo, decide};
use crate::diagnostics::DiagnosticsSink;
use crate::probe::EnvironmentProbe;
use crate::version::range::SupportedRange;
use crate::workspace::WorkspaceScanner;

pub struct Advisor {
    range: SupportedRange,
}

impl Advisor {
    pub fn new(range: SupportedRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> &SupportedRange {
        &self.range
    }

    /// Collect the workspace and environment versions.
    ///
    /// A failing scan is logged and treated as "no manifest found".
    pub fn gather(
        &self,
        scanner: &dyn WorkspaceScanner,
        probe: &dyn EnvironmentProbe,
    ) -> VersionInfo {
        let manifest_version = scanner
            .required_version()
            .inspect_err(|e| warn!("Failed to scan workspace: {}", e))
            .unwrap_or_default();
        let environment_version = probe.installed_version();

        VersionInfo {
            manifest_version,
            environment_version,
        }
    }

    /// Determine which version of Go should be installed for the workspace.
    pub fn identify_environment(
        &self,
        scanner: &dyn WorkspaceScanner,
        probe: &dyn EnvironmentProbe,
        sink: &dyn DiagnosticsSink,
    ) -> Recommendation {
        let info = self.gather(scanner, probe);
        info!("{}", info);

        let recommendation = decide(&info, &self.range, sink);
        info!("{}", recommendation.message);
        recommendation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticCode, MockDiagnosticsSink};
    use crate::probe::FixedProbe;
    use crate::workspace::ScanError;
    use std::io;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Writer collecting formatted log lines in memory
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    struct StubScanner(Option<&'static str>);

    impl WorkspaceScanner for StubScanner {
        fn required_version(&self) -> Result<Option<String>, ScanError> {
            Ok(self.0.map(str::to_string))
        }
    }

    struct FailingScanner;

    impl WorkspaceScanner for FailingScanner {
        fn required_version(&self) -> Result<Option<String>, ScanError> {
            Err(ScanError::Io {
                path: PathBuf::from("/workspace"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    fn advisor() -> Advisor {
        Advisor::new(SupportedRange::new("1.11", "1.21").unwrap())
    }

    #[test]
    fn identify_environment_combines_collaborators() {
        let mut sink = MockDiagnosticsSink::new();
        sink.expect_emit()
            .withf(|_, code| *code == DiagnosticCode::ManifestSupportedAndEnvOlder)
            .times(1)
            .return_const(());

        let result = advisor().identify_environment(
            &StubScanner(Some("1.18")),
            &FixedProbe(Some("1.15".to_string())),
            &sink,
        );

        assert_eq!(result.version_to_install(), "1.18");
    }

    #[test]
    fn scan_failure_is_treated_as_missing_manifest() {
        let info = advisor().gather(&FailingScanner, &FixedProbe(None));

        assert_eq!(info, VersionInfo::default());
    }

    #[test]
    fn identify_environment_without_anything_requests_max() {
        let mut sink = MockDiagnosticsSink::new();
        sink.expect_emit()
            .withf(|_, code| *code == DiagnosticCode::NoManifestAndNoEnv)
            .times(1)
            .return_const(());

        let result = advisor().identify_environment(&FailingScanner, &FixedProbe(None), &sink);

        assert_eq!(result.version_to_install(), "1.21");
    }

    #[test]
    fn identify_environment_logs_decision_message() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();
        let mut sink = MockDiagnosticsSink::new();
        sink.expect_emit().times(1).return_const(());

        tracing::subscriber::with_default(subscriber, || {
            advisor().identify_environment(&StubScanner(Some("1.18")), &FixedProbe(None), &sink)
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains(
            "No version of Go installed. Requesting the version of Go found in the `go.mod` file (1.18)."
        ));
    }
}
