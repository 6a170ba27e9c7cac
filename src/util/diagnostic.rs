//! User-facing diagnostics.
//!
//! Link failures and ignored configuration are reported to the user as a
//! diagnostic: a headline, optional location and context lines, and
//! numbered suggestions.

use std::fmt;
use std::path::PathBuf;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when a manifest cannot be parsed.
    pub const FIX_MANIFEST: &str = "Fix or reinstall the package whose package.json is invalid";

    /// Suggestion when a project-shaped manifest is rejected.
    pub const EXOTIC_MANIFESTS: &str =
        "Pass `--allow-exotic-manifests` to accept manifests without a name";

    /// Suggestion when the bin directory cannot be written.
    pub const BIN_DIR: &str = "Check permissions or choose another location with `--bin-dir`";

    /// Suggestion when a bin target is missing.
    pub const MISSING_TARGET: &str =
        "The package may be incompletely installed; reinstall it and link again";

    /// Suggestion for failures with more detail in debug logs.
    pub const VERBOSE: &str = "Run again with `--verbose` for more details";

    /// Suggestion when a config file is ignored.
    pub const FIX_CONFIG: &str = "Fix the TOML syntax or remove the file";
}

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The run failed
    Error,
    /// The run continued, possibly with different settings than intended
    Warning,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    /// ANSI bold plus color for this severity.
    fn ansi(self) -> &'static str {
        match self {
            Severity::Error => "1;31",
            Severity::Warning => "1;33",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A message for the user with optional context and suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
    /// Lines printed below the headline, in order
    pub context: Vec<String>,
    /// Fixes offered to the user, numbered when printed
    pub suggestions: Vec<String>,
    /// File or directory the diagnostic is about
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic::new(Severity::Warning, message)
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Render for a terminal, with ANSI colors when `color` is set.
    pub fn format(&self, color: bool) -> String {
        let paint = |label: &str, code: &str| {
            if color {
                format!("\x1b[{}m{}\x1b[0m", code, label)
            } else {
                label.to_string()
            }
        };

        let mut output = format!(
            "{}: {}\n",
            paint(self.severity.label(), self.severity.ansi()),
            self.message
        );

        if let Some(path) = &self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }
        for line in &self.context {
            output.push_str(&format!("  = {}\n", line));
        }

        if !self.suggestions.is_empty() {
            output.push_str(&format!("\n{}: consider:\n", paint("help", "1;32")));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
