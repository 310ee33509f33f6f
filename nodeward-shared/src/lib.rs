//! Nodeward shared types
//!
//! This crate contains the error taxonomy, the ledger address type, and
//! constants used by both the core library (nodeward) and the CLI.

pub mod address;
pub mod constants;
pub mod errors;

pub use address::Address;
pub use errors::{NodewardError, NodewardResult};
