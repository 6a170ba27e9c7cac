//! Module search directories for linked executables.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

const NODE_MODULES: &str = "node_modules";

/// The `node_modules` lookup chain for a file: one `node_modules` entry per
/// ancestor, skipping ancestors that are themselves `node_modules`.
pub fn node_module_paths(from: &Path) -> Vec<PathBuf> {
    from.ancestors()
        .filter(|dir| !dir.as_os_str().is_empty())
        .filter(|dir| dir.file_name().map_or(true, |name| name != NODE_MODULES))
        .map(|dir| dir.join(NODE_MODULES))
        .collect()
}

/// Lookup directories for an executable reached either through its
/// (possibly symlinked) path or through its real path.
///
/// The real path's chain comes first; duplicates keep their first position.
pub fn bin_node_paths(target: &Path) -> io::Result<Vec<PathBuf>> {
    let real = std::fs::canonicalize(target)?;
    Ok(union(
        node_module_paths(&real),
        node_module_paths(target),
    ))
}

fn union(first: Vec<PathBuf>, second: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    first
        .into_iter()
        .chain(second)
        .filter(|p| seen.insert(p.clone()))
        .collect()
}
