//! Linking error types and diagnostics.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error during bin linking.
///
/// Collisions are not errors: they are reported through the `warn` callback
/// and never reach this type.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("failed to list packages in {}", dir.display())]
    Scan {
        dir: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to read manifest in {}", dir.display())]
    Manifest {
        dir: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to read bins of `{package}`")]
    Bins {
        package: String,
        dir: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to create bin directory {}", dir.display())]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to resolve real path of bin `{name}`: {}", path.display())]
    Realpath {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to make bin `{name}` executable: {}", path.display())]
    Permissions {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write shim for bin `{name}` at {}", shim.display())]
    Shim {
        name: String,
        shim: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("{} operations failed while linking bins", .0.len())]
    Multiple(Vec<LinkError>),
}

impl LinkError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            LinkError::Scan { dir, source } => Diagnostic::error(self.to_string())
                .with_context(format!("{:#}", source))
                .with_location(dir),

            LinkError::Manifest { dir, source } => {
                let mut diag = Diagnostic::error(self.to_string())
                    .with_context(format!("{:#}", source))
                    .with_location(dir.join(crate::core::manifest::MANIFEST_NAME))
                    .with_suggestion(suggestions::FIX_MANIFEST);
                if format!("{:#}", source).contains("no `name` field") {
                    diag = diag.with_suggestion(suggestions::EXOTIC_MANIFESTS);
                }
                diag
            }

            LinkError::Bins { dir, source, .. } => Diagnostic::error(self.to_string())
                .with_context(format!("{:#}", source))
                .with_location(dir),

            LinkError::CreateDir { source, .. } => Diagnostic::error(self.to_string())
                .with_context(source.to_string())
                .with_suggestion(suggestions::BIN_DIR),

            LinkError::Realpath { source, .. } | LinkError::Permissions { source, .. } => {
                let mut diag = Diagnostic::error(self.to_string()).with_context(source.to_string());
                if source.kind() == io::ErrorKind::NotFound {
                    diag = diag.with_suggestion(suggestions::MISSING_TARGET);
                }
                diag
            }

            LinkError::Shim { source, .. } => Diagnostic::error(self.to_string())
                .with_context(format!("{:#}", source))
                .with_suggestion(suggestions::VERBOSE),

            LinkError::Multiple(errors) => {
                let mut diag = Diagnostic::error(self.to_string());
                for error in errors {
                    diag = diag.with_context(error.to_string());
                }
                diag
            }
        }
    }

    /// Every individual failure, with `Multiple` flattened.
    pub fn failures(&self) -> Vec<&LinkError> {
        match self {
            LinkError::Multiple(errors) => errors.iter().flat_map(|e| e.failures()).collect(),
            other => vec![other],
        }
    }
}

/// Wait-for-all join over independent outcomes.
///
/// Returns every success in input order, the single error if exactly one unit
/// failed, or [`LinkError::Multiple`] carrying every failure otherwise.
pub fn join_all<T>(results: Vec<Result<T, LinkError>>) -> Result<Vec<T>, LinkError> {
    let mut values = Vec::with_capacity(results.len());
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(value) => values.push(value),
            Err(e) => errors.push(e),
        }
    }

    match errors.len() {
        0 => Ok(values),
        1 => Err(errors.swap_remove(0)),
        _ => Err(LinkError::Multiple(errors)),
    }
}
