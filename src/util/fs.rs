//! Filesystem utilities.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

/// Ensure a directory exists, creating it and its parents if necessary.
///
/// Safe to call concurrently for the same path.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    match fs::create_dir_all(path) {
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        other => other,
    }
}

/// List the installed package directories under a modules directory.
///
/// Hidden entries are skipped. Directories whose name starts with `@` are
/// scopes: their children are listed instead. A missing modules directory
/// yields no packages. The result is sorted by path.
pub fn package_dirs(modules: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();

    let top = match list_dirs(modules) {
        Ok(top) => top,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(dirs),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to read directory: {}", modules.display()))
        }
    };

    for dir in top {
        if is_scope_dir(&dir) {
            let scoped = list_dirs(&dir)
                .with_context(|| format!("failed to read directory: {}", dir.display()))?;
            dirs.extend(scoped);
        } else {
            dirs.push(dir);
        }
    }

    dirs.sort();
    Ok(dirs)
}

fn list_dirs(path: &Path) -> io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        // Follow symlinks: linked packages are directories for our purposes.
        let entry_path = entry.path();
        if entry_path.is_dir() {
            dirs.push(entry_path);
        }
    }
    Ok(dirs)
}

fn is_scope_dir(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('@'))
        .unwrap_or(false)
}

/// Lexically normalize a path: drop `.` components and fold `..` into
/// their parent. Does not touch the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Check if `child` is `parent` itself or lies beneath it.
///
/// Relative paths are resolved against the current directory first, so a
/// relative and an absolute spelling of the same location compare equal.
/// Symlinks are not resolved.
pub fn is_subdir(parent: &Path, child: &Path) -> bool {
    normalize_lexically(&absolute(child)).starts_with(normalize_lexically(&absolute(parent)))
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Remove a file or symlink, treating a missing file as success.
///
/// A symlink is removed itself, never the file it points at.
pub fn remove_file_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Set the file mode to `rwxr-xr-x`.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
