//! Core data structures for binlink.
//!
//! This module contains the foundational types used throughout binlink:
//! - Package manifests and the readers that load them
//! - Bins and the extractor that lists them
//! - Commands attributed to their packages
//! - Platform capabilities

pub mod bins;
pub mod command;
pub mod manifest;
pub mod platform;

pub use bins::{Bin, BinExtractor, PackageBins};
pub use command::{Command, PackageDescriptor};
pub use manifest::{
    BinField, Manifest, ManifestReader, PackageJsonReader, ProjectManifestReader, MANIFEST_NAME,
};
pub use platform::Platform;
