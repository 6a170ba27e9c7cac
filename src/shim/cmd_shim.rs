//! Launcher generation in the style of npm's cmd-shim.
//!
//! Every shim gets a POSIX `sh` launcher at the shim path. A `.cmd` launcher
//! and a `.ps1` launcher are added when enabled. All launchers reference the
//! target relative to their own directory, so the bin directory can move
//! together with the packages it points into.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::shim::shebang::{detect_interpreter, Shebang};
use crate::shim::{ShimOptions, ShimWriter};
use crate::util::fs::{ensure_dir, make_executable, remove_file_if_exists};

/// Writes `sh`, `.cmd` and `.ps1` launchers.
#[derive(Debug, Clone)]
pub struct CmdShimWriter {
    create_cmd_file: bool,
    path_delimiter: char,
}

impl CmdShimWriter {
    pub fn new(create_cmd_file: bool) -> Self {
        CmdShimWriter {
            create_cmd_file,
            path_delimiter: if cfg!(windows) { ';' } else { ':' },
        }
    }
}

impl Default for CmdShimWriter {
    fn default() -> Self {
        CmdShimWriter::new(cfg!(windows))
    }
}

impl ShimWriter for CmdShimWriter {
    fn write_shim(&self, target: &Path, shim_path: &Path, opts: &ShimOptions) -> Result<()> {
        let shim_dir = shim_path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("shim path has no parent: {}", shim_path.display()))?;
        ensure_dir(shim_dir)
            .with_context(|| format!("failed to create directory: {}", shim_dir.display()))?;

        let cmd_path = with_suffix(shim_path, "cmd");
        let pwsh_path = with_suffix(shim_path, "ps1");

        // An existing entry may be a symlink into the package; writing through
        // it would clobber the target. Disabled flavours are cleared as well.
        for path in [shim_path, cmd_path.as_path(), pwsh_path.as_path()] {
            remove_file_if_exists(path)
                .with_context(|| format!("failed to remove existing shim: {}", path.display()))?;
        }

        let data = ShimData::new(
            relative_target(shim_dir, target),
            detect_interpreter(target),
            &opts.node_path,
        );

        write_launcher(shim_path, &data.generate_sh(self.path_delimiter))?;
        if self.create_cmd_file {
            write_launcher(&cmd_path, &data.generate_cmd())?;
        }
        if opts.create_pwsh_file {
            write_launcher(&pwsh_path, &data.generate_pwsh(self.path_delimiter))?;
        }

        Ok(())
    }
}

fn write_launcher(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .with_context(|| format!("failed to write file: {}", path.display()))?;
    make_executable(path)
        .with_context(|| format!("failed to make {} executable", path.display()))
}

/// Append an extension without replacing one the command name already has
/// (`tsc.js` becomes `tsc.js.cmd`, not `tsc.cmd`).
fn with_suffix(path: &Path, ext: &str) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

fn relative_target(shim_dir: &Path, target: &Path) -> String {
    let rel = pathdiff::diff_paths(target, shim_dir).unwrap_or_else(|| target.to_path_buf());
    rel.to_string_lossy().replace('\\', "/")
}

/// Everything a launcher needs to know, independent of its flavour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShimData {
    target: String,
    shebang: Option<Shebang>,
    node_path: Vec<String>,
}

impl ShimData {
    pub(crate) fn new(target: String, shebang: Option<Shebang>, node_path: &[PathBuf]) -> Self {
        ShimData {
            target,
            shebang,
            node_path: node_path
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        }
    }

    fn target_win(&self) -> String {
        self.target.replace('/', "\\")
    }

    pub(crate) fn generate_sh(&self, delimiter: char) -> String {
        let mut s = String::with_capacity(512);
        s.push_str(concat!(
            "#!/bin/sh\n",
            "basedir=$(dirname \"$(echo \"$0\" | sed -e 's,\\\\,/,g')\")\n",
            "\n",
            "case `uname` in\n",
            "    *CYGWIN*|*MINGW*|*MSYS*)\n",
            "        if command -v cygpath > /dev/null 2>&1; then\n",
            "            basedir=`cygpath -w \"$basedir\"`\n",
            "        fi\n",
            "    ;;\n",
            "esac\n",
            "\n",
        ));

        if !self.node_path.is_empty() {
            let node_path = self.node_path.join(&delimiter.to_string());
            s.push_str("if [ -z \"$NODE_PATH\" ]; then\n");
            s.push_str(&format!("  export NODE_PATH=\"{}\"\n", node_path));
            s.push_str("else\n");
            s.push_str(&format!(
                "  export NODE_PATH=\"{}{}$NODE_PATH\"\n",
                node_path, delimiter
            ));
            s.push_str("fi\n");
        }

        let target = format!("\"$basedir/{}\"", self.target);
        match &self.shebang {
            None => s.push_str(&format!("exec {} \"$@\"\n", target)),
            Some(Shebang {
                program,
                args,
                vars,
            }) => {
                let prog = program.replace('\\', "/");
                let long_prog = format!("\"$basedir/{}\"", prog);
                s.push_str(&format!("if [ -x {} ]; then\n", long_prog));
                s.push_str(&format!(
                    "  exec {}{} {} {} \"$@\"\n",
                    vars, long_prog, args, target
                ));
                s.push_str("else\n");
                s.push_str(&format!("  exec {}{} {} {} \"$@\"\n", vars, prog, args, target));
                s.push_str("fi\n");
            }
        }
        s
    }

    pub(crate) fn generate_cmd(&self) -> String {
        let mut s = String::with_capacity(512);
        s.push_str(concat!(
            "@ECHO off\r\n",
            "GOTO start\r\n",
            ":find_dp0\r\n",
            "SET dp0=%~dp0\r\n",
            "EXIT /b\r\n",
            ":start\r\n",
            "SETLOCAL\r\n",
            "CALL :find_dp0\r\n",
        ));

        if !self.node_path.is_empty() {
            let node_path = self.node_path.join(";");
            s.push_str("\r\nIF NOT DEFINED NODE_PATH (\r\n");
            s.push_str(&format!("  SET \"NODE_PATH={}\"\r\n", node_path));
            s.push_str(") ELSE (\r\n");
            s.push_str(&format!("  SET \"NODE_PATH={};%NODE_PATH%\"\r\n", node_path));
            s.push_str(")\r\n");
        }

        let target_win = self.target_win();
        match &self.shebang {
            None => s.push_str(&format!("\"%dp0%\\{}\" %*\r\n", target_win)),
            Some(Shebang {
                program,
                args,
                vars,
            }) => {
                let prog = program.replace('\\', "/");
                for var in vars.split_whitespace().filter(|v| v.contains('=')) {
                    s.push_str(&format!("SET {}\r\n", var));
                }
                let long_prog = format!("%dp0%\\{}.exe", prog);
                s.push_str("\r\n");
                s.push_str(&format!("IF EXIST \"{}\" (\r\n", long_prog));
                s.push_str(&format!("  SET \"_prog={}\"\r\n", long_prog));
                s.push_str(") ELSE (\r\n");
                s.push_str(&format!("  SET \"_prog={}\"\r\n", prog));
                s.push_str("  SET PATHEXT=%PATHEXT:;.JS;=;%\r\n");
                s.push_str(")\r\n");
                s.push_str("\r\n");
                s.push_str(&format!(
                    "endLocal & goto #_undefined_# 2>NUL || title %COMSPEC% & \"%_prog%\" {} \"%dp0%\\{}\" %*\r\n",
                    args, target_win
                ));
            }
        }
        s
    }

    pub(crate) fn generate_pwsh(&self, delimiter: char) -> String {
        let mut s = String::with_capacity(1024);
        s.push_str(concat!(
            "#!/usr/bin/env pwsh\n",
            "$basedir=Split-Path $MyInvocation.MyCommand.Definition -Parent\n",
            "\n",
            "$exe=\"\"\n",
            "if ($PSVersionTable.PSVersion -lt \"6.0\" -or $IsWindows) {\n",
            "  $exe=\".exe\"\n",
            "}\n",
        ));

        if !self.node_path.is_empty() {
            let node_path = self.node_path.join(&delimiter.to_string());
            s.push_str("$env_node_path=$env:NODE_PATH\n");
            s.push_str(&format!("$new_node_path=\"{}\"\n", node_path));
            s.push_str("if ([string]::IsNullOrEmpty($env_node_path)) {\n");
            s.push_str("  $env:NODE_PATH=$new_node_path\n");
            s.push_str("} else {\n");
            s.push_str(&format!(
                "  $env:NODE_PATH=\"$new_node_path{}$env_node_path\"\n",
                delimiter
            ));
            s.push_str("}\n");
        }

        let target = format!("\"$basedir/{}\"", self.target);
        match &self.shebang {
            None => {
                push_pwsh_exec(&mut s, &target, "", "");
                s.push_str("exit $LASTEXITCODE\n");
            }
            Some(Shebang { program, args, .. }) => {
                let prog = program.replace('\\', "/");
                let long_prog = format!("\"$basedir/{}$exe\"", prog);
                let short_prog = format!("\"{}$exe\"", prog);
                s.push_str("$ret=0\n");
                s.push_str(&format!("if (Test-Path {}) {{\n", long_prog));
                push_pwsh_exec(&mut s, &long_prog, args, &target);
                s.push_str("  $ret=$LASTEXITCODE\n");
                s.push_str("} else {\n");
                push_pwsh_exec(&mut s, &short_prog, args, &target);
                s.push_str("  $ret=$LASTEXITCODE\n");
                s.push_str("}\n");
                s.push_str("exit $ret\n");
            }
        }
        s
    }
}

fn push_pwsh_exec(s: &mut String, prog: &str, args: &str, target: &str) {
    s.push_str("  if ($MyInvocation.ExpectingInput) {\n");
    s.push_str(&format!("    $input | & {} {} {} $args\n", prog, args, target));
    s.push_str("  } else {\n");
    s.push_str(&format!("    & {} {} {} $args\n", prog, args, target));
    s.push_str("  }\n");
}
