//! Commands and the packages that provide them.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::bins::Bin;
use crate::core::manifest::Manifest;

/// A package to link bins from: its manifest plus where it lives on disk.
#[derive(Debug, Clone)]
pub struct PackageDescriptor {
    /// The package manifest
    pub manifest: Manifest,

    /// Root directory of the package
    pub location: PathBuf,
}

impl PackageDescriptor {
    /// Create a new descriptor.
    pub fn new(manifest: Manifest, location: impl Into<PathBuf>) -> Self {
        PackageDescriptor {
            manifest,
            location: location.into(),
        }
    }

    /// Get the package name, or an empty string for nameless manifests.
    pub fn name(&self) -> &str {
        self.manifest.name.as_deref().unwrap_or_default()
    }

    /// Get the package root directory.
    pub fn location(&self) -> &Path {
        &self.location
    }
}

/// An invokable command exposed by a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Name the command is invoked by
    pub name: String,

    /// Executable the command runs
    pub path: PathBuf,

    /// Name of the package providing the command
    pub pkg_name: String,

    /// True iff `name` equals `pkg_name`
    pub own_name: bool,
}

impl Command {
    /// Attribute a bin to the package that declares it.
    pub fn from_bin(bin: Bin, pkg_name: Option<&str>) -> Self {
        let own_name = pkg_name == Some(bin.name.as_str());
        Command {
            name: bin.name,
            path: bin.path,
            pkg_name: pkg_name.unwrap_or_default().to_string(),
            own_name,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.pkg_name)
    }
}
