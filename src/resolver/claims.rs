//! The table of claimed command names.

use std::collections::HashMap;

/// Maps each claimed command name to the package that owns it.
///
/// Built sequentially during resolution. A non-own-name claim never
/// replaces an existing one.
#[derive(Debug, Clone, Default)]
pub struct NameClaims {
    owners: HashMap<String, String>,
}

impl NameClaims {
    pub fn new() -> Self {
        NameClaims {
            owners: HashMap::new(),
        }
    }

    /// Record a claim, replacing any earlier owner.
    ///
    /// Only used for own-name commands, where the last claim wins.
    pub fn claim_unconditionally(&mut self, name: &str, owner: &str) {
        self.owners.insert(name.to_string(), owner.to_string());
    }

    /// Claim a name if it is free.
    ///
    /// On conflict the current owner is returned and the table is unchanged.
    pub fn try_claim(&mut self, name: &str, owner: &str) -> Result<(), &str> {
        if self.owners.contains_key(name) {
            return Err(self.owners[name].as_str());
        }
        self.owners.insert(name.to_string(), owner.to_string());
        Ok(())
    }

    /// Get the owner of a name.
    pub fn owner(&self, name: &str) -> Option<&str> {
        self.owners.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
