//! Implementation of bin linking.
//!
//! Linking runs in three stages:
//! - every package's commands are read concurrently and concatenated in
//!   package order
//! - collisions are resolved sequentially, reporting each rejected command
//!   through the `warn` callback
//! - every winning command is linked concurrently, and all failures are
//!   collected before the run reports its result

use std::path::Path;

use rayon::prelude::*;

use crate::core::{
    BinExtractor, Command, Manifest, ManifestReader, PackageBins, PackageDescriptor,
    PackageJsonReader, Platform, ProjectManifestReader,
};
use crate::ops::errors::{join_all, LinkError};
use crate::resolver::{resolve_collisions, Resolution};
use crate::shim::{bin_node_paths, CmdShimWriter, ShimOptions, ShimWriter};
use crate::util::fs::{ensure_dir, is_subdir, make_executable, package_dirs};

/// Callback receiving non-fatal diagnostics.
pub type WarnFn<'a> = &'a dyn Fn(&str);

/// Options for directory-scan linking.
#[derive(Clone, Copy)]
pub struct LinkBinsOptions<'a> {
    /// Read manifests with the relaxed project reader
    pub allow_exotic_manifests: bool,

    /// Receives one message per rejected command
    pub warn: WarnFn<'a>,
}

impl<'a> LinkBinsOptions<'a> {
    /// Create options that report diagnostics to `warn`.
    pub fn new(warn: WarnFn<'a>) -> Self {
        LinkBinsOptions {
            allow_exotic_manifests: false,
            warn,
        }
    }

    /// Accept manifests without a `name`.
    pub fn allow_exotic_manifests(mut self, allow: bool) -> Self {
        self.allow_exotic_manifests = allow;
        self
    }
}

/// Links package bins into a bin directory.
///
/// The manifest readers, bin extractor and shim writer are capabilities that
/// can be replaced, so the linker itself only decides *what* gets linked
/// *where*.
pub struct BinLinker {
    platform: Platform,
    manifest_reader: Box<dyn ManifestReader>,
    exotic_manifest_reader: Box<dyn ManifestReader>,
    extractor: Box<dyn BinExtractor>,
    shim_writer: Box<dyn ShimWriter>,
}

impl BinLinker {
    /// Create a linker with the default capabilities for `platform`.
    pub fn new(platform: Platform) -> Self {
        BinLinker {
            platform,
            manifest_reader: Box::new(PackageJsonReader),
            exotic_manifest_reader: Box::new(ProjectManifestReader),
            extractor: Box::new(PackageBins),
            shim_writer: Box::new(CmdShimWriter::new(platform.cmd_file_supported)),
        }
    }

    /// Replace the reader used for installed packages.
    pub fn with_manifest_reader(mut self, reader: impl ManifestReader + 'static) -> Self {
        self.manifest_reader = Box::new(reader);
        self
    }

    /// Replace the reader used when exotic manifests are allowed.
    pub fn with_exotic_manifest_reader(mut self, reader: impl ManifestReader + 'static) -> Self {
        self.exotic_manifest_reader = Box::new(reader);
        self
    }

    /// Replace the bin extractor.
    pub fn with_bin_extractor(mut self, extractor: impl BinExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    /// Replace the shim writer.
    pub fn with_shim_writer(mut self, writer: impl ShimWriter + 'static) -> Self {
        self.shim_writer = Box::new(writer);
        self
    }

    /// Get the platform the linker was created for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Link the bins of every package installed under `modules_dir`.
    ///
    /// Packages at or above `bin_dir`, and packages inside it, are never
    /// considered. Directories without a manifest contribute nothing.
    pub fn link_bins(
        &self,
        modules_dir: &Path,
        bin_dir: &Path,
        opts: &LinkBinsOptions<'_>,
    ) -> Result<(), LinkError> {
        let commands =
            self.commands_in_modules(modules_dir, bin_dir, opts.allow_exotic_manifests)?;
        self.link_commands(commands, bin_dir, opts.warn)
    }

    /// Link the bins of an explicit list of packages.
    ///
    /// No directory scanning or self-link filtering takes place.
    pub fn link_bins_of_packages(
        &self,
        packages: &[PackageDescriptor],
        bin_dir: &Path,
        warn: WarnFn<'_>,
    ) -> Result<(), LinkError> {
        if packages.is_empty() {
            return Ok(());
        }

        let results: Vec<Result<Vec<Command>, LinkError>> = packages
            .par_iter()
            .map(|pkg| self.manifest_commands(&pkg.manifest, pkg.location()))
            .collect();
        let commands = concat_nonempty(join_all(results)?);

        self.link_commands(commands, bin_dir, warn)
    }

    /// Work out what [`link_bins`](Self::link_bins) would link without
    /// writing anything.
    pub fn plan_bins(
        &self,
        modules_dir: &Path,
        bin_dir: &Path,
        allow_exotic_manifests: bool,
    ) -> Result<Resolution, LinkError> {
        let commands = self.commands_in_modules(modules_dir, bin_dir, allow_exotic_manifests)?;
        Ok(resolve_collisions(commands))
    }

    fn commands_in_modules(
        &self,
        modules_dir: &Path,
        bin_dir: &Path,
        allow_exotic_manifests: bool,
    ) -> Result<Vec<Command>, LinkError> {
        let dirs = package_dirs(modules_dir).map_err(|source| LinkError::Scan {
            dir: modules_dir.to_path_buf(),
            source,
        })?;

        let reader: &dyn ManifestReader = if allow_exotic_manifests {
            self.exotic_manifest_reader.as_ref()
        } else {
            self.manifest_reader.as_ref()
        };

        let dirs: Vec<_> = dirs
            .into_iter()
            .filter(|dir| {
                let own = is_subdir(dir, bin_dir) || is_subdir(bin_dir, dir);
                if own {
                    tracing::debug!("Not linking own bins of {}", dir.display());
                }
                !own
            })
            .collect();

        let results: Vec<Result<Vec<Command>, LinkError>> = dirs
            .par_iter()
            .map(|dir| self.package_commands(reader, dir))
            .collect();

        Ok(concat_nonempty(join_all(results)?))
    }

    fn package_commands(
        &self,
        reader: &dyn ManifestReader,
        dir: &Path,
    ) -> Result<Vec<Command>, LinkError> {
        let manifest = reader
            .read_manifest(dir)
            .map_err(|source| LinkError::Manifest {
                dir: dir.to_path_buf(),
                source,
            })?;

        match manifest {
            Some(manifest) => self.manifest_commands(&manifest, dir),
            None => {
                tracing::debug!("No manifest in {}, skipping", dir.display());
                Ok(Vec::new())
            }
        }
    }

    fn manifest_commands(&self, manifest: &Manifest, dir: &Path) -> Result<Vec<Command>, LinkError> {
        let bins = self
            .extractor
            .extract_bins(manifest, dir)
            .map_err(|source| LinkError::Bins {
                package: manifest.name.clone().unwrap_or_default(),
                dir: dir.to_path_buf(),
                source,
            })?;

        let pkg_name = manifest.name.as_deref();
        Ok(bins
            .into_iter()
            .map(|bin| Command::from_bin(bin, pkg_name))
            .collect())
    }

    fn link_commands(
        &self,
        commands: Vec<Command>,
        bin_dir: &Path,
        warn: WarnFn<'_>,
    ) -> Result<(), LinkError> {
        if commands.is_empty() {
            return Ok(());
        }

        ensure_dir(bin_dir).map_err(|source| LinkError::CreateDir {
            dir: bin_dir.to_path_buf(),
            source,
        })?;

        let resolution = resolve_collisions(commands);
        for conflict in &resolution.conflicts {
            warn(&conflict.message(bin_dir));
        }

        let results: Vec<Result<(), LinkError>> = resolution
            .winners
            .par_iter()
            .map(|cmd| self.link_command(cmd, bin_dir))
            .collect();
        join_all(results)?;

        tracing::info!(
            "Linked {} bin(s) into {}",
            resolution.winners.len(),
            bin_dir.display()
        );
        Ok(())
    }

    fn link_command(&self, cmd: &Command, bin_dir: &Path) -> Result<(), LinkError> {
        let shim_path = bin_dir.join(&cmd.name);

        if self.platform.shebang_supported {
            make_executable(&cmd.path).map_err(|source| LinkError::Permissions {
                name: cmd.name.clone(),
                path: cmd.path.clone(),
                source,
            })?;
        }

        let node_path = bin_node_paths(&cmd.path).map_err(|source| LinkError::Realpath {
            name: cmd.name.clone(),
            path: cmd.path.clone(),
            source,
        })?;

        let opts = ShimOptions {
            create_pwsh_file: self.platform.alternate_shell_supported,
            node_path,
        };
        self.shim_writer
            .write_shim(&cmd.path, &shim_path, &opts)
            .map_err(|source| LinkError::Shim {
                name: cmd.name.clone(),
                shim: shim_path.clone(),
                source,
            })?;

        tracing::debug!("Linked {} -> {}", shim_path.display(), cmd.path.display());
        Ok(())
    }
}

impl Default for BinLinker {
    fn default() -> Self {
        BinLinker::new(Platform::current())
    }
}

/// Flatten per-package command lists, dropping packages without commands.
fn concat_nonempty(per_package: Vec<Vec<Command>>) -> Vec<Command> {
    per_package
        .into_iter()
        .filter(|cmds| !cmds.is_empty())
        .flatten()
        .collect()
}
