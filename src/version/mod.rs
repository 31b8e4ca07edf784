//! Toolchain version handling
//!
//! # Modules
//!
//! - [`semver`]: Parsing and major.minor comparison of toolchain versions
//! - [`range`]: The supported range and below/above/outside checks
//! - [`error`]: Error types for range construction

pub mod error;
pub mod range;
pub mod semver;
