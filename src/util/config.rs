//! Configuration file support for binlink.
//!
//! binlink supports two configuration file locations:
//! - Global: `~/.binlink/config.toml` - User-wide defaults
//! - Project: `.binlink/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Command-line flags
//! take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::Platform;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Name of the configuration directory, both global and per project.
pub const CONFIG_DIR: &str = ".binlink";

/// binlink configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Link settings
    pub link: LinkConfig,

    /// Launcher settings
    pub shim: ShimConfig,
}

/// Link-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LinkConfig {
    /// Accept manifests without a `name`
    pub allow_exotic_manifests: Option<bool>,

    /// Bin directory used when none is given on the command line
    pub bin_dir: Option<PathBuf>,
}

/// Launcher-related configuration. Unset values follow the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShimConfig {
    /// Write a PowerShell launcher next to each shim
    pub pwsh: Option<bool>,

    /// Write a `.cmd` launcher next to each shim
    pub cmd: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't exist.
    ///
    /// A file that exists but cannot be loaded is ignored, and a warning is
    /// pushed onto `warnings`.
    pub fn load_or_default(path: &Path, warnings: &mut Vec<Diagnostic>) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            tracing::debug!("Ignoring config {}: {:#}", path.display(), e);
            warnings.push(
                Diagnostic::warning("ignoring invalid config file")
                    .with_location(path)
                    .with_context(format!("{:#}", e))
                    .with_suggestion(suggestions::FIX_CONFIG),
            );
            Self::default()
        })
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Link settings
        if other.link.allow_exotic_manifests.is_some() {
            self.link.allow_exotic_manifests = other.link.allow_exotic_manifests;
        }
        if other.link.bin_dir.is_some() {
            self.link.bin_dir = other.link.bin_dir;
        }

        // Shim settings
        if other.shim.pwsh.is_some() {
            self.shim.pwsh = other.shim.pwsh;
        }
        if other.shim.cmd.is_some() {
            self.shim.cmd = other.shim.cmd;
        }
    }

    /// Whether exotic manifests are allowed, defaulting to no.
    pub fn allow_exotic_manifests(&self) -> bool {
        self.link.allow_exotic_manifests.unwrap_or(false)
    }

    /// Apply launcher overrides to the detected platform.
    pub fn apply_to(&self, mut platform: Platform) -> Platform {
        if let Some(pwsh) = self.shim.pwsh {
            platform = platform.with_alternate_shell(pwsh);
        }
        if let Some(cmd) = self.shim.cmd {
            platform = platform.with_cmd_file(cmd);
        }
        platform
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.binlink/config.toml)
/// 2. Global config (~/.binlink/config.toml)
/// 3. Defaults
///
/// Also returns a warning for every config file that had to be ignored.
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> (Config, Vec<Diagnostic>) {
    let mut config = Config::default();
    let mut warnings = Vec::new();

    // Load global config first
    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path, &mut warnings));
    }

    // Project config overrides global
    config.merge(Config::load_or_default(project_path, &mut warnings));

    (config, warnings)
}

/// Get the global binlink config directory (~/.binlink).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR))
}

/// Get the global config path (~/.binlink/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.binlink/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join("config.toml")
}
