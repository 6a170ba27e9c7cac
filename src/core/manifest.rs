//! package.json manifest parsing.
//!
//! Only the fields that matter for bin linking are modelled: the package
//! name and version, the `bin` declaration and `directories.bin`.

use std::io;
use std::path::Path;

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// File name of a package manifest.
pub const MANIFEST_NAME: &str = "package.json";

/// The `bin` field: either a single executable named after the package,
/// or a map from command name to executable. Map entries keep their
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BinField {
    Single(String),
    Map(IndexMap<String, String>),
}

/// The `directories` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directories {
    /// Directory whose files are all exposed as commands
    #[serde(default)]
    pub bin: Option<String>,
}

/// A parsed package manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub bin: Option<BinField>,

    #[serde(default)]
    pub directories: Option<Directories>,
}

impl Manifest {
    /// Create a manifest with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Manifest {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set a single `bin` entry.
    pub fn with_bin(mut self, path: impl Into<String>) -> Self {
        self.bin = Some(BinField::Single(path.into()));
        self
    }

    /// Add a named `bin` entry, converting a single entry into a map if needed.
    pub fn with_named_bin(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        let mut map = match self.bin.take() {
            Some(BinField::Map(map)) => map,
            _ => IndexMap::new(),
        };
        map.insert(name.into(), path.into());
        self.bin = Some(BinField::Map(map));
        self
    }

    /// Set `directories.bin`.
    pub fn with_bin_dir(mut self, dir: impl Into<String>) -> Self {
        self.directories = Some(Directories {
            bin: Some(dir.into()),
        });
        self
    }

    /// Parse a manifest from JSON text.
    pub fn parse(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("invalid package manifest")
    }

    /// Get the `directories.bin` entry if present.
    pub fn bin_dir(&self) -> Option<&str> {
        self.directories.as_ref().and_then(|d| d.bin.as_deref())
    }
}

/// Reads the manifest of a package directory.
///
/// Returns `Ok(None)` when the directory has no manifest at all. Every
/// other failure is an error.
pub trait ManifestReader: Send + Sync {
    fn read_manifest(&self, dir: &Path) -> Result<Option<Manifest>>;
}

/// Strict reader for installed dependencies. A manifest without a `name`
/// is malformed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageJsonReader;

impl ManifestReader for PackageJsonReader {
    fn read_manifest(&self, dir: &Path) -> Result<Option<Manifest>> {
        let path = dir.join(MANIFEST_NAME);
        let Some(contents) = read_if_exists(&path)? else {
            return Ok(None);
        };

        let manifest = Manifest::parse(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if manifest.name.is_none() {
            bail!("manifest has no `name` field: {}", path.display());
        }

        Ok(Some(manifest))
    }
}

/// Relaxed reader for project manifests, which may omit `name` and `version`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectManifestReader;

impl ManifestReader for ProjectManifestReader {
    fn read_manifest(&self, dir: &Path) -> Result<Option<Manifest>> {
        let path = dir.join(MANIFEST_NAME);
        let Some(contents) = read_if_exists(&path)? else {
            return Ok(None);
        };

        Manifest::parse(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))
            .map(Some)
    }
}

fn read_if_exists(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to read file: {}", path.display())),
    }
}
