//! Command name resolution.
//!
//! The resolver is pure and deterministic: it runs after every package's
//! commands are known and before anything is written to disk.

pub mod claims;
pub mod resolve;

pub use claims::NameClaims;
pub use resolve::{resolve_collisions, BinConflict, Resolution};
