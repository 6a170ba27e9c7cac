//! Launcher ("shim") creation.
//!
//! A shim is a small launcher placed in the bin directory that runs the real
//! executable inside a package. The [`ShimWriter`] trait is the seam used by
//! the linker, so tests can record or fail shim writes without touching
//! launcher generation.

pub mod cmd_shim;
pub mod node_path;
pub mod shebang;

use std::path::{Path, PathBuf};

use anyhow::Result;

pub use cmd_shim::CmdShimWriter;
pub use node_path::{bin_node_paths, node_module_paths};
pub use shebang::{detect_interpreter, parse_shebang, Shebang};

/// Options for a single shim write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShimOptions {
    /// Also emit a PowerShell launcher
    pub create_pwsh_file: bool,

    /// Module search directories exported to the launched process
    pub node_path: Vec<PathBuf>,
}

/// Creates launchers.
pub trait ShimWriter: Send + Sync {
    /// Create the launcher(s) at `shim_path` running `target`.
    ///
    /// Existing launchers at the same path are overwritten.
    fn write_shim(&self, target: &Path, shim_path: &Path, opts: &ShimOptions) -> Result<()>;
}
