//! Turning a manifest into the list of executables a package exposes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::core::manifest::{BinField, Manifest};
use crate::util::fs::{is_subdir, normalize_lexically};

/// A command name and the executable it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bin {
    pub name: String,
    pub path: PathBuf,
}

impl Bin {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Bin {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Lists the bins declared by a package.
pub trait BinExtractor: Send + Sync {
    fn extract_bins(&self, manifest: &Manifest, pkg_dir: &Path) -> Result<Vec<Bin>>;
}

/// Default extractor following the npm `bin` / `directories.bin` rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageBins;

impl BinExtractor for PackageBins {
    fn extract_bins(&self, manifest: &Manifest, pkg_dir: &Path) -> Result<Vec<Bin>> {
        let bins = if let Some(bin) = &manifest.bin {
            bins_from_field(bin, manifest.name.as_deref(), pkg_dir)
        } else if let Some(dir) = manifest.bin_dir() {
            let bin_dir = normalize_lexically(&pkg_dir.join(dir));
            if !is_subdir(pkg_dir, &bin_dir) {
                tracing::warn!(
                    "Skipping `directories.bin`: {} is outside of package {}",
                    bin_dir.display(),
                    pkg_dir.display()
                );
                return Ok(Vec::new());
            }
            bins_from_dir(&bin_dir)?
        } else {
            Vec::new()
        };

        Ok(bins
            .into_iter()
            .filter(|bin| {
                let inside = is_subdir(pkg_dir, &bin.path);
                if !inside {
                    tracing::warn!(
                        "Skipping bin `{}`: {} is outside of package {}",
                        bin.name,
                        bin.path.display(),
                        pkg_dir.display()
                    );
                }
                inside
            })
            .collect())
    }
}

fn bins_from_field(bin: &BinField, pkg_name: Option<&str>, pkg_dir: &Path) -> Vec<Bin> {
    match bin {
        BinField::Single(path) => match pkg_name {
            Some(name) => vec![Bin::new(
                unscoped_name(name),
                normalize_lexically(&pkg_dir.join(path)),
            )],
            None => {
                tracing::debug!(
                    "Ignoring single `bin` of nameless package at {}",
                    pkg_dir.display()
                );
                Vec::new()
            }
        },
        BinField::Map(map) => map
            .iter()
            .filter(|(name, _)| is_safe_bin_name(name))
            .map(|(name, path)| Bin::new(name, normalize_lexically(&pkg_dir.join(path))))
            .collect(),
    }
}

fn bins_from_dir(bin_dir: &Path) -> Result<Vec<Bin>> {
    if !bin_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut bins = Vec::new();
    for entry in WalkDir::new(bin_dir).follow_links(false).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("failed to walk bin directory: {}", bin_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        bins.push(Bin::new(name, entry.into_path()));
    }
    Ok(bins)
}

/// Strip the `@scope/` prefix from a package name.
pub fn unscoped_name(name: &str) -> &str {
    if name.starts_with('@') {
        name.split_once('/').map(|(_, n)| n).unwrap_or(name)
    } else {
        name
    }
}

/// A command name must survive URI component encoding unchanged, or be `$`.
pub fn is_safe_bin_name(name: &str) -> bool {
    if name == "$" {
        return true;
    }
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_.!~*'()".contains(c))
}
