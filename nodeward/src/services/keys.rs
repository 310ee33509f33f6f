//! Validator keystore.

use std::path::PathBuf;
use std::sync::Arc;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use nodeward_shared::{NodewardError, NodewardResult};

use super::passwords::PasswordManager;

const KEY_FILE_SUFFIX: &str = ".key.yml";

/// On-disk validator key record.
#[derive(Debug, Serialize, Deserialize)]
struct KeyRecord {
    pubkey: String,
    digest: String,
}

/// Manages validator keys under the validator keystore directory.
///
/// Unlike the node account there is no existence precondition: an empty
/// keystore is a normal state for a node that has not onboarded validators.
#[derive(Debug)]
pub struct KeyManager {
    keystore_dir: PathBuf,
    passwords: Arc<PasswordManager>,
}

impl KeyManager {
    /// Create a manager over the given keystore directory. Performs no I/O.
    pub fn new(keystore_dir: impl Into<PathBuf>, passwords: Arc<PasswordManager>) -> Self {
        Self {
            keystore_dir: keystore_dir.into(),
            passwords,
        }
    }

    /// Number of validator keys on disk. A missing directory counts as zero.
    pub fn key_count(&self) -> NodewardResult<usize> {
        let entries = match std::fs::read_dir(&self.keystore_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(NodewardError::Storage(format!(
                    "could not read keystore directory {}: {e}",
                    self.keystore_dir.display()
                )));
            }
        };

        let mut count = 0;
        for entry in entries {
            let entry = entry.map_err(|e| {
                NodewardError::Storage(format!(
                    "could not read keystore directory {}: {e}",
                    self.keystore_dir.display()
                ))
            })?;
            if entry.file_name().to_string_lossy().ends_with(KEY_FILE_SUFFIX) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Create a new validator key and return its public key.
    pub fn create_key(&self) -> NodewardResult<String> {
        if !self.passwords.password_exists() {
            return Err(NodewardError::Precondition(
                "node password is not set, run `nodeward init` first".to_string(),
            ));
        }

        let mut rng = rand::rng();
        let mut key_bytes = [0u8; 48];
        rng.fill_bytes(&mut key_bytes);
        let pubkey = hex::encode(key_bytes);

        let password = self.passwords.get_password()?;
        let mut hasher = Sha256::new();
        hasher.update(&key_bytes);
        hasher.update(password.as_bytes());
        let record = KeyRecord {
            pubkey: pubkey.clone(),
            digest: hex::encode(hasher.finalize()),
        };

        std::fs::create_dir_all(&self.keystore_dir).map_err(|e| {
            NodewardError::Storage(format!(
                "could not create keystore directory {}: {e}",
                self.keystore_dir.display()
            ))
        })?;
        let path = self.keystore_dir.join(format!("{pubkey}{KEY_FILE_SUFFIX}"));
        let yaml = serde_yaml::to_string(&record)
            .map_err(|e| NodewardError::Internal(format!("could not encode key record: {e}")))?;
        std::fs::write(&path, yaml).map_err(|e| {
            NodewardError::Storage(format!("could not write {}: {e}", path.display()))
        })?;

        tracing::info!(pubkey = %pubkey, "Created validator key");
        Ok(pubkey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(dir: &TempDir, with_password: bool) -> KeyManager {
        let passwords = Arc::new(PasswordManager::new(dir.path().join("password")));
        if with_password {
            passwords.set_password("correct horse battery").unwrap();
        }
        KeyManager::new(dir.path().join("validator-keys"), passwords)
    }

    #[test]
    fn missing_directory_counts_zero() {
        let dir = TempDir::new().unwrap();
        let keys = manager(&dir, true);
        assert_eq!(keys.key_count().unwrap(), 0);
    }

    #[test]
    fn create_increments_count() {
        let dir = TempDir::new().unwrap();
        let keys = manager(&dir, true);

        let first = keys.create_key().unwrap();
        let second = keys.create_key().unwrap();
        assert_ne!(first, second);
        assert_eq!(keys.key_count().unwrap(), 2);
    }

    #[test]
    fn create_requires_password() {
        let dir = TempDir::new().unwrap();
        let keys = manager(&dir, false);
        assert!(keys.create_key().unwrap_err().is_precondition());
    }

    #[test]
    fn count_ignores_unrelated_files() {
        let dir = TempDir::new().unwrap();
        let keys = manager(&dir, true);
        keys.create_key().unwrap();

        std::fs::write(dir.path().join("validator-keys/README"), "not a key").unwrap();
        assert_eq!(keys.key_count().unwrap(), 1);
    }
}
