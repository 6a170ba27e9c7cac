//! Command implementations

pub mod link;
pub mod plan;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::LinkArgs;
use binlink::util::config::{global_config_path, load_config, project_config_path};
use binlink::util::diagnostic::{self, Diagnostic};
use binlink::Platform;

/// Link settings after merging flags, configuration and platform defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSettings {
    pub modules_dir: PathBuf,
    pub bin_dir: PathBuf,
    pub allow_exotic_manifests: bool,
    pub platform: Platform,
    /// Config files that were ignored
    pub warnings: Vec<Diagnostic>,
}

impl LinkSettings {
    /// Resolve settings for a run started in the current directory.
    pub fn resolve(args: &LinkArgs) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let global = global_config_path();
        let (config, warnings) = load_config(global.as_deref(), &project_config_path(&cwd));

        let modules_dir = absolute(&cwd, &args.modules_dir);
        let bin_dir = match (&args.bin_dir, &config.link.bin_dir) {
            (Some(dir), _) | (None, Some(dir)) => absolute(&cwd, dir),
            (None, None) => modules_dir.join(".bin"),
        };

        Ok(LinkSettings {
            modules_dir,
            bin_dir,
            allow_exotic_manifests: args.allow_exotic_manifests
                || config.allow_exotic_manifests(),
            platform: config.apply_to(Platform::current()),
            warnings,
        })
    }

    /// Print the configuration warnings to stderr.
    pub fn emit_warnings(&self, color: bool) {
        for warning in &self.warnings {
            diagnostic::emit(warning, color);
        }
    }
}

fn absolute(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
