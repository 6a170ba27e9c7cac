//! Interpreter detection for shim targets.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

static SHEBANG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#!\s*(?:/usr/bin/env\s+(?:-S\s+)?((?:[^ \t=]+=[^ \t=]+\s+)*))?([^ \t\r\n]+)(.*)$")
        .unwrap()
});

/// The program a target script should be run with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shebang {
    /// Interpreter, e.g. `node` or `/bin/sh`
    pub program: String,
    /// Extra interpreter arguments
    pub args: String,
    /// `VAR=value` assignments passed through `env -S`
    pub vars: String,
}

impl Shebang {
    fn program(program: &str) -> Self {
        Shebang {
            program: program.to_string(),
            ..Default::default()
        }
    }
}

/// Parse a `#!` line.
pub fn parse_shebang(line: &str) -> Option<Shebang> {
    let line = line.trim();
    if !line.starts_with("#!") {
        return None;
    }
    let captures = SHEBANG.captures(line)?;
    Some(Shebang {
        vars: captures
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
        program: captures.get(2)?.as_str().to_string(),
        args: captures
            .get(3)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
    })
}

/// Work out how to run `target`: from its `#!` line if it has one,
/// otherwise from its extension. `None` means run it directly.
pub fn detect_interpreter(target: &Path) -> Option<Shebang> {
    read_first_line(target)
        .and_then(|line| parse_shebang(&line))
        .or_else(|| interpreter_for_extension(target))
}

fn read_first_line(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line).ok()?;
    Some(line)
}

fn interpreter_for_extension(path: &Path) -> Option<Shebang> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let program = match ext.as_str() {
        "js" | "cjs" | "mjs" => "node",
        "sh" => "sh",
        "cmd" | "bat" => "cmd",
        "ps1" => "pwsh",
        _ => return None,
    };
    Some(Shebang::program(program))
}
