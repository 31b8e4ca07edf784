//! Decides which Go toolchain version, if any, a build pipeline must install
//! before it can compile a workspace.
//!
//! # Modules
//!
//! - [`version`]: Version parsing and the supported range
//! - [`decision`]: The decision table producing a [`decision::Recommendation`]
//! - [`diagnostics`]: Diagnostic codes and sinks
//! - [`report`]: Environment json output
//! - [`workspace`]: `go.mod` scanning
//! - [`probe`]: Installed toolchain detection
//! - [`advisor`]: Orchestration of the above
//! - [`config`]: Configuration loading
//! - [`logging`]: Tracing setup

pub mod advisor;
pub mod config;
pub mod decision;
pub mod diagnostics;
pub mod logging;
pub mod probe;
pub mod report;
pub mod version;
pub mod workspace;
