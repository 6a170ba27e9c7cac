//! Collision resolution between commands of different packages.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::core::Command;
use crate::resolver::claims::NameClaims;

/// A command that lost its name to another package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinConflict {
    /// The contested command name
    pub name: String,

    /// Package whose command was rejected
    pub pkg_name: String,

    /// Package that already owns the name
    pub owner: String,
}

impl BinConflict {
    /// The diagnostic reported through the `warn` callback.
    pub fn message(&self, bin_dir: &Path) -> String {
        format!(
            "Cannot link bin \"{}\" of \"{}\" to \"{}\". A package called \"{}\" already has its bin linked.",
            self.name,
            self.pkg_name,
            bin_dir.display(),
            self.owner
        )
    }
}

impl fmt::Display for BinConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` of `{}` is shadowed by `{}`",
            self.name, self.pkg_name, self.owner
        )
    }
}

/// Outcome of collision resolution.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Commands to link, one per distinct name
    pub winners: Vec<Command>,

    /// Rejected commands, in processing order
    pub conflicts: Vec<BinConflict>,
}

impl Resolution {
    /// Find the winning command for a name.
    pub fn winner(&self, name: &str) -> Option<&Command> {
        self.winners.iter().find(|c| c.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }
}

/// Assign every command name to exactly one package.
///
/// Commands named after their own package are processed first and always
/// win; if two packages somehow share an own-name, the later one replaces
/// the earlier. The remaining commands are then claimed first come, first
/// served, and each one that finds its name taken becomes a conflict.
pub fn resolve_collisions(commands: Vec<Command>) -> Resolution {
    let (own, others): (Vec<_>, Vec<_>) = commands.into_iter().partition(|c| c.own_name);

    let mut claims = NameClaims::new();
    let mut winners: Vec<Command> = Vec::with_capacity(own.len() + others.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for cmd in own {
        claims.claim_unconditionally(&cmd.name, &cmd.pkg_name);
        match index.get(&cmd.name) {
            Some(&i) => {
                tracing::debug!(
                    "Own-name bin `{}` claimed again by `{}`",
                    cmd.name,
                    cmd.pkg_name
                );
                winners[i] = cmd;
            }
            None => {
                index.insert(cmd.name.clone(), winners.len());
                winners.push(cmd);
            }
        }
    }

    let mut conflicts = Vec::new();
    for cmd in others {
        match claims.try_claim(&cmd.name, &cmd.pkg_name) {
            Ok(()) => winners.push(cmd),
            Err(owner) => conflicts.push(BinConflict {
                name: cmd.name,
                pkg_name: cmd.pkg_name,
                owner: owner.to_string(),
            }),
        }
    }

    Resolution { winners, conflicts }
}
