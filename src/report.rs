//! Machine-readable output of the recommendation

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to serialize environment json: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write environment json: {0}")]
    Io(#[from] io::Error),
}

/// Inner object; serializes as `{}` when no version is requested
#[derive(Debug, Default, Serialize)]
struct ToolchainRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
}

/// Write `{ "<toolchain>": { "version": "<version>" } }`, or `{ "<toolchain>": {} }`
/// when `version` is empty.
pub fn write_environment_json<W: Write>(
    writer: &mut W,
    toolchain: &str,
    version: &str,
) -> Result<(), ReportError> {
    let request = ToolchainRequest {
        version: (!version.is_empty()).then_some(version),
    };
    let content = BTreeMap::from([(toolchain, request)]);

    serde_json::to_writer(&mut *writer, &content)?;
    writer.flush()?;
    Ok(())
}

/// Write the recommendation to stdout. Failures are logged, never propagated.
pub fn report(toolchain: &str, version: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if let Err(e) = write_environment_json(&mut handle, toolchain, version) {
        error!("Failed to write environment json to stdout: {}", e);
    }
}
