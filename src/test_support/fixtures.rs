//! Test fixtures for `node_modules` layouts.
//!
//! Fixtures are written to a real temporary directory so that symlinks,
//! permissions and launcher files behave as they do in production.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::json;
use tempfile::TempDir;

/// Script content written for every bin target.
pub const NODE_SCRIPT: &str = "#!/usr/bin/env node\nconsole.log('hi')\n";

/// Fixture for one installed package.
#[derive(Debug, Clone)]
pub struct PackageFixture {
    /// Directory under `node_modules`, `@scope/name` for scoped packages.
    pub dir: String,
    /// Raw package.json content, `None` for a directory without one.
    pub manifest: Option<String>,
    /// Package name written into the generated manifest.
    pub name: String,
    /// Single `bin` entry.
    pub bin: Option<String>,
    /// Named `bin` entries, in declaration order.
    pub named_bins: IndexMap<String, String>,
    /// Extra files (path relative to the package root -> content).
    pub files: BTreeMap<PathBuf, String>,
}

impl PackageFixture {
    /// A package named `name` installed under the same directory name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        PackageFixture {
            dir: name.clone(),
            manifest: None,
            name,
            bin: None,
            named_bins: IndexMap::new(),
            files: BTreeMap::new(),
        }
    }

    /// A package directory with no package.json at all.
    pub fn without_manifest(dir: impl Into<String>) -> Self {
        PackageFixture::new(dir).with_file("index.js", "module.exports = 1\n")
    }

    /// A package directory with the given package.json text, written verbatim.
    pub fn with_raw_manifest(dir: impl Into<String>, manifest: impl Into<String>) -> Self {
        let mut pkg = PackageFixture::new(dir);
        pkg.manifest = Some(manifest.into());
        pkg
    }

    /// Install under a different directory name.
    pub fn in_dir(mut self, dir: impl Into<String>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Declare `"bin": path` and create the target script.
    pub fn with_bin(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.files.insert(PathBuf::from(&path), NODE_SCRIPT.to_string());
        self.bin = Some(path);
        self
    }

    /// Declare `"bin": { name: path }` and create the target script.
    pub fn with_named_bin(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        self.files.insert(PathBuf::from(&path), NODE_SCRIPT.to_string());
        self.named_bins.insert(name.into(), path);
        self
    }

    /// Add a file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    fn has_manifest(&self) -> bool {
        self.manifest.is_some() || self.bin.is_some() || !self.named_bins.is_empty()
    }

    /// The package.json content to write.
    pub fn manifest_json(&self) -> Option<String> {
        if let Some(raw) = &self.manifest {
            return Some(raw.clone());
        }
        if !self.has_manifest() {
            return None;
        }

        let mut manifest = json!({ "name": self.name, "version": "1.0.0" });
        if let Some(bin) = &self.bin {
            manifest["bin"] = json!(bin);
        } else {
            manifest["bin"] = json!(self.named_bins);
        }
        Some(manifest.to_string())
    }

    /// Write this fixture below `modules`.
    pub fn write_to(&self, modules: &Path) -> std::io::Result<PathBuf> {
        let pkg_dir = modules.join(&self.dir);
        std::fs::create_dir_all(&pkg_dir)?;

        if let Some(manifest) = self.manifest_json() {
            std::fs::write(pkg_dir.join("package.json"), manifest)?;
        }

        for (rel_path, content) in &self.files {
            let full_path = pkg_dir.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
        }

        Ok(pkg_dir)
    }
}

/// A temporary project with a `node_modules` directory.
#[derive(Debug)]
pub struct ModulesFixture {
    root: TempDir,
    modules: PathBuf,
}

impl ModulesFixture {
    /// Create an empty `node_modules` directory in a fresh temp dir.
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        let modules = root.path().join("node_modules");
        std::fs::create_dir_all(&modules).unwrap();
        ModulesFixture { root, modules }
    }

    /// Install a package.
    pub fn with_package(self, pkg: PackageFixture) -> Self {
        pkg.write_to(&self.modules).unwrap();
        self
    }

    /// The project root containing `node_modules`.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// The `node_modules` directory.
    pub fn modules(&self) -> &Path {
        &self.modules
    }

    /// The conventional bin directory, `node_modules/.bin`.
    pub fn bin_dir(&self) -> PathBuf {
        self.modules.join(".bin")
    }

    /// Directory of an installed package.
    pub fn package_dir(&self, dir: &str) -> PathBuf {
        self.modules.join(dir)
    }
}

impl Default for ModulesFixture {
    fn default() -> Self {
        ModulesFixture::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_manifest() {
        let pkg = PackageFixture::new("@scope/tool").with_named_bin("tool", "bin/tool.js");
        let manifest: serde_json::Value =
            serde_json::from_str(&pkg.manifest_json().unwrap()).unwrap();

        assert_eq!(manifest["name"], "@scope/tool");
        assert_eq!(manifest["bin"]["tool"], "bin/tool.js");
    }

    #[test]
    fn test_write_fixture() {
        let fixture = ModulesFixture::new()
            .with_package(PackageFixture::new("tool").with_bin("cli.js"))
            .with_package(PackageFixture::without_manifest("stray"));

        assert!(fixture.package_dir("tool").join("package.json").is_file());
        assert!(fixture.package_dir("tool").join("cli.js").is_file());
        assert!(!fixture.package_dir("stray").join("package.json").exists());
        assert!(fixture.package_dir("stray").join("index.js").is_file());
    }
}
