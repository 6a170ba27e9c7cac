//! Test utilities and doubles for binlink unit tests.
//!
//! Provides recording and failing implementations of [`ShimWriter`] plus
//! fixtures that lay out a real `node_modules` tree in a temporary directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use binlink::test_support::{ModulesFixture, PackageFixture, RecordingShimWriter};
//!
//! #[test]
//! fn test_example() {
//!     let fixture = ModulesFixture::new()
//!         .with_package(PackageFixture::new("tool").with_bin("cli.js"));
//!     let writer = RecordingShimWriter::new();
//!     let linker = BinLinker::new(Platform::unix()).with_shim_writer(writer.clone());
//!     // Link, then inspect writer.calls()...
//! }
//! ```

pub mod fixtures;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};

use crate::shim::{ShimOptions, ShimWriter};

// Re-export fixtures for convenience
pub use fixtures::*;

/// One recorded `write_shim` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShimCall {
    pub target: PathBuf,
    pub shim_path: PathBuf,
    pub opts: ShimOptions,
}

impl ShimCall {
    /// File name of the shim, i.e. the command name.
    pub fn name(&self) -> String {
        self.shim_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Shim writer that records calls instead of writing launchers.
///
/// Clones share their record, so a test can keep one clone while the
/// linker owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingShimWriter {
    calls: Arc<Mutex<Vec<ShimCall>>>,
}

impl RecordingShimWriter {
    /// Create a new recording writer.
    pub fn new() -> Self {
        RecordingShimWriter::default()
    }

    /// All recorded calls, in completion order.
    pub fn calls(&self) -> Vec<ShimCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded command names, sorted.
    pub fn shim_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.calls().iter().map(ShimCall::name).collect();
        names.sort();
        names
    }

    /// Target of the shim recorded for `name`.
    pub fn target_of(&self, name: &str) -> Option<PathBuf> {
        self.calls()
            .into_iter()
            .find(|c| c.name() == name)
            .map(|c| c.target)
    }

    fn record(&self, target: &Path, shim_path: &Path, opts: &ShimOptions) {
        self.calls.lock().unwrap().push(ShimCall {
            target: target.to_path_buf(),
            shim_path: shim_path.to_path_buf(),
            opts: opts.clone(),
        });
    }
}

impl ShimWriter for RecordingShimWriter {
    fn write_shim(&self, target: &Path, shim_path: &Path, opts: &ShimOptions) -> Result<()> {
        self.record(target, shim_path, opts);
        Ok(())
    }
}

/// Shim writer that fails for selected command names and records the rest.
#[derive(Debug, Clone)]
pub struct FailingShimWriter {
    fail_for: HashSet<String>,
    recorded: RecordingShimWriter,
}

impl FailingShimWriter {
    /// Fail every shim whose command name is in `names`.
    pub fn new(names: &[&str]) -> Self {
        FailingShimWriter {
            fail_for: names.iter().map(|n| n.to_string()).collect(),
            recorded: RecordingShimWriter::new(),
        }
    }

    /// The successful calls.
    pub fn recorded(&self) -> &RecordingShimWriter {
        &self.recorded
    }
}

impl ShimWriter for FailingShimWriter {
    fn write_shim(&self, target: &Path, shim_path: &Path, opts: &ShimOptions) -> Result<()> {
        let name = shim_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.fail_for.contains(&name) {
            bail!("simulated shim failure for `{}`", name);
        }
        self.recorded.record(target, shim_path, opts);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_writer_shares_record() {
        let writer = RecordingShimWriter::new();
        let clone = writer.clone();

        clone
            .write_shim(
                Path::new("/nm/a/cli.js"),
                Path::new("/nm/.bin/a"),
                &ShimOptions::default(),
            )
            .unwrap();

        assert_eq!(writer.shim_names(), vec!["a"]);
        assert_eq!(writer.target_of("a"), Some(PathBuf::from("/nm/a/cli.js")));
    }

    #[test]
    fn test_failing_writer() {
        let writer = FailingShimWriter::new(&["bad"]);
        let opts = ShimOptions::default();

        assert!(writer
            .write_shim(Path::new("/t"), Path::new("/bin/bad"), &opts)
            .is_err());
        writer
            .write_shim(Path::new("/t"), Path::new("/bin/good"), &opts)
            .unwrap();

        assert_eq!(writer.recorded().shim_names(), vec!["good"]);
    }
}
