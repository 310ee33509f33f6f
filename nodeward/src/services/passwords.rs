//! File-backed passphrase manager.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use nodeward_shared::{NodewardError, NodewardResult};

/// Minimum accepted passphrase length.
pub const MIN_PASSWORD_LEN: usize = 12;

/// Manages the node passphrase stored in a single file.
///
/// Existence is a cheap predicate, not an error path. Reading assumes the
/// caller has already established existence.
#[derive(Debug)]
pub struct PasswordManager {
    path: PathBuf,
}

impl PasswordManager {
    /// Create a manager for the given passphrase file. Performs no I/O.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the passphrase file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when a passphrase has been provisioned.
    pub fn password_exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the stored passphrase.
    pub fn get_password(&self) -> NodewardResult<String> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            NodewardError::Storage(format!(
                "could not read password file {}: {e}",
                self.path.display()
            ))
        })?;
        Ok(raw.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Provision the passphrase. Refuses to overwrite an existing one.
    pub fn set_password(&self, password: &str) -> NodewardResult<()> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(NodewardError::Config(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.password_exists() {
            return Err(NodewardError::Config(format!(
                "password file {} already exists",
                self.path.display()
            )));
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                NodewardError::Storage(format!(
                    "could not create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        write_private(&self.path, password.as_bytes())?;
        tracing::info!(path = %self.path.display(), "Provisioned node password");
        Ok(())
    }
}

/// Write a file readable only by the owner.
fn write_private(path: &Path, contents: &[u8]) -> NodewardResult<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let result = options.open(path).and_then(|mut file| {
        use std::io::Write;
        file.write_all(contents)
    });
    result.map_err(|e| match e.kind() {
        ErrorKind::AlreadyExists => {
            NodewardError::Config(format!("password file {} already exists", path.display()))
        }
        _ => NodewardError::Storage(format!("could not write {}: {e}", path.display())),
    })
}
