//! binlink - link package executables into a bin directory
//!
//! This crate provides the core library functionality for binlink:
//! reading package manifests, resolving command name collisions and
//! writing launcher shims.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod shim;
pub mod util;

/// Test utilities and doubles for binlink unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides recording shim writers and `node_modules`
/// fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{Command, Manifest, PackageDescriptor, Platform};
pub use crate::ops::{BinLinker, LinkBinsOptions, LinkError};
pub use crate::resolver::{BinConflict, Resolution};
