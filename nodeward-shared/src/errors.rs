//! Error taxonomy shared across the workspace.
//!
//! Absence of a resource is never an error in this taxonomy. Loaders return
//! empty values for missing files and managers return `Ok(None)` or a boolean
//! predicate instead. Every variant here is fatal to the operation that
//! produced it.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout nodeward.
pub type NodewardResult<T> = Result<T, NodewardError>;

/// All errors surfaced by the nodeward library.
#[derive(Error, Debug)]
pub enum NodewardError {
    /// A file existed but could not be decoded.
    #[error("could not parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// A required precondition is not met. The message carries the
    /// operator-facing remediation hint.
    #[error("{0}")]
    Precondition(String),

    /// A remote endpoint could not be reached or refused the handshake.
    #[error("connectivity failure: {0}")]
    Connectivity(String),

    /// A remote resource load (contract or ABI definition) failed.
    #[error("remote load failure: {0}")]
    RemoteLoad(String),

    /// Local storage error (datastore, keystore files, password file).
    #[error("storage error: {0}")]
    Storage(String),

    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),

    /// Internal invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NodewardError {
    /// True when the error names an unmet operator-remediable precondition.
    pub fn is_precondition(&self) -> bool {
        matches!(self, NodewardError::Precondition(_))
    }
}

impl From<std::io::Error> for NodewardError {
    fn from(e: std::io::Error) -> Self {
        NodewardError::Storage(e.to_string())
    }
}
