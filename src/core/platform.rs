//! Platform capabilities that affect how bins are linked.

/// What the host platform supports when launching linked commands.
///
/// Resolved once at startup and passed to the linker explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Scripts with a `#!` line can be executed directly once marked executable
    pub shebang_supported: bool,

    /// A PowerShell launcher should be written next to each shim
    pub alternate_shell_supported: bool,

    /// A `.cmd` launcher should be written next to each shim
    pub cmd_file_supported: bool,
}

impl Platform {
    /// Capabilities of the platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::windows()
        } else {
            Platform::unix()
        }
    }

    pub fn unix() -> Self {
        Platform {
            shebang_supported: true,
            alternate_shell_supported: false,
            cmd_file_supported: false,
        }
    }

    pub fn windows() -> Self {
        Platform {
            shebang_supported: false,
            alternate_shell_supported: true,
            cmd_file_supported: true,
        }
    }

    /// Override whether PowerShell launchers are written.
    pub fn with_alternate_shell(mut self, enabled: bool) -> Self {
        self.alternate_shell_supported = enabled;
        self
    }

    /// Override whether `.cmd` launchers are written.
    pub fn with_cmd_file(mut self, enabled: bool) -> Self {
        self.cmd_file_supported = enabled;
        self
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::current()
    }
}
