//! High-level operations.
//!
//! This module contains the bin linking entry points and their errors.

pub mod errors;
pub mod link_bins;

pub use errors::{join_all, LinkError};
pub use link_bins::{BinLinker, LinkBinsOptions, WarnFn};
