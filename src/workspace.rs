//! Workspace scanning for the required Go version
//!
//! Finds every `go.mod` (and `go.work`) below a root directory and reports the
//! greatest `go` directive among them.
//!
//! Format examples:
//! - `go 1.21`
//! - `go 1.21.3 // toolchain pinned elsewhere`

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::version::semver::compare_versions;

const MANIFEST_FILES: [&str; 2] = ["go.mod", "go.work"];
// Go tooling ignores `testdata` directories as well
const SKIPPED_DIRS: [&str; 3] = ["vendor", "node_modules", "testdata"];

/// Match: go 1.21[.3][rc1] [// comment]
static GO_DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^go\s+(\d+(?:\.\d+){0,2}(?:(?:rc|beta|alpha)\d+)?)\s*(?://.*)?$").unwrap()
});

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Source of the version declared by the workspace's manifests
pub trait WorkspaceScanner {
    /// Greatest declared version, or `None` when no manifest declares one
    fn required_version(&self) -> Result<Option<String>, ScanError>;
}

/// Scanner over `go.mod` files below a root directory
pub struct GoModScanner {
    root: PathBuf,
}

impl GoModScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Paths of every manifest below the root. Unreadable entries are skipped.
    fn collect_manifests(&self) -> Result<Vec<PathBuf>, ScanError> {
        let mut found = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(false) // Don't follow symlinks to avoid loops
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(ScanError::Io {
                        path: self.root.clone(),
                        source: e.into(),
                    });
                }
                Err(e) => {
                    warn!("Skipping unreadable workspace entry: {}", e);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy();
            if !entry.file_type().is_dir() && MANIFEST_FILES.contains(&name.as_ref()) {
                found.push(entry.into_path());
            }
        }

        Ok(found)
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}

impl WorkspaceScanner for GoModScanner {
    fn required_version(&self) -> Result<Option<String>, ScanError> {
        let mut greatest: Option<String> = None;

        for path in self.collect_manifests()? {
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping unreadable manifest {}: {}", path.display(), e);
                    continue;
                }
            };
            let Some(version) = parse_go_directive(&content) else {
                debug!("No go directive in {}", path.display());
                continue;
            };
            debug!("Found go directive {} in {}", version, path.display());

            let is_greater = greatest
                .as_deref()
                .is_none_or(|g| compare_versions(&version, g) == Ordering::Greater);
            if is_greater {
                greatest = Some(version);
            }
        }

        Ok(greatest)
    }
}

/// Extract the version from the first `go` directive in a `go.mod` or `go.work` file
pub fn parse_go_directive(content: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .find_map(|line| GO_DIRECTIVE_RE.captures(line))
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_file(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[rstest]
    #[case("module example.com/m\n\ngo 1.21\n", Some("1.21"))]
    #[case("module example.com/m\ngo 1.21.3 // pinned\n", Some("1.21.3"))]
    #[case("module example.com/m\n  go   1.18  \n", Some("1.18"))]
    #[case("module example.com/m\ngo 1.22rc1\n", Some("1.22rc1"))]
    #[case("module example.com/m\ntoolchain go1.22.0\n", None)]
    #[case("module example.com/m\n// go 1.20\n", None)]
    #[case("", None)]
    fn parse_go_directive_returns_expected(#[case] content: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_go_directive(content).as_deref(), expected);
    }

    #[test]
    fn required_version_returns_none_without_manifests() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), "main.go", "package main\n");

        let scanner = GoModScanner::new(temp_dir.path());

        assert_eq!(scanner.required_version().unwrap(), None);
    }

    #[test]
    fn required_version_returns_greatest_across_modules() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), "go.mod", "module a\n\ngo 1.16\n");
        write_file(temp_dir.path(), "tools/go.mod", "module b\n\ngo 1.20.2\n");
        write_file(temp_dir.path(), "svc/api/go.mod", "module c\n\ngo 1.19\n");
        write_file(temp_dir.path(), "svc/old/go.mod", "module d\n");

        let scanner = GoModScanner::new(temp_dir.path());

        assert_eq!(scanner.required_version().unwrap().as_deref(), Some("1.20.2"));
    }

    #[test]
    fn required_version_skips_vendor_and_hidden_dirs() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), "go.mod", "module a\n\ngo 1.16\n");
        write_file(temp_dir.path(), "vendor/x/go.mod", "module x\n\ngo 1.30\n");
        write_file(temp_dir.path(), ".cache/y/go.mod", "module y\n\ngo 1.30\n");

        let scanner = GoModScanner::new(temp_dir.path());

        assert_eq!(scanner.required_version().unwrap().as_deref(), Some("1.16"));
    }

    #[test]
    fn required_version_reads_go_work() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), "go.work", "go 1.21\n\nuse ./a\n");
        write_file(temp_dir.path(), "a/go.mod", "module a\n\ngo 1.18\n");

        let scanner = GoModScanner::new(temp_dir.path());

        assert_eq!(scanner.required_version().unwrap().as_deref(), Some("1.21"));
    }

    #[cfg(unix)]
    #[test]
    fn required_version_skips_dangling_manifest_symlink() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), "go.mod", "module a\n\ngo 1.18\n");
        fs::create_dir_all(temp_dir.path().join("sub")).unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("missing/go.mod"),
            temp_dir.path().join("sub/go.mod"),
        )
        .unwrap();

        let scanner = GoModScanner::new(temp_dir.path());

        assert_eq!(scanner.required_version().unwrap().as_deref(), Some("1.18"));
    }

    #[cfg(unix)]
    #[test]
    fn required_version_does_not_follow_directory_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), "go.mod", "module a\n\ngo 1.18\n");
        write_file(temp_dir.path(), "a/go.mod", "module b\n\ngo 1.16\n");
        write_file(temp_dir.path().join("outside").as_path(), "go.mod", "module c\n\ngo 1.30\n");
        std::os::unix::fs::symlink(temp_dir.path(), temp_dir.path().join("a/loop")).unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("outside"),
            temp_dir.path().join("a/linked"),
        )
        .unwrap();

        let scanner = GoModScanner::new(temp_dir.path().join("a"));

        assert_eq!(scanner.required_version().unwrap().as_deref(), Some("1.16"));
    }

    #[test]
    fn required_version_fails_for_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = GoModScanner::new(temp_dir.path().join("missing"));

        assert!(matches!(
            scanner.required_version(),
            Err(ScanError::Io { .. })
        ));
    }
}
