//! Node account keystore.

use std::path::PathBuf;
use std::sync::Arc;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use nodeward_shared::{Address, NodewardError, NodewardResult};

use super::passwords::PasswordManager;

const ACCOUNT_FILE: &str = "node-account.yml";

/// On-disk node account record.
///
/// The digest binds the record to the provisioning passphrase so a record
/// copied next to a different password file is detected on read.
#[derive(Debug, Serialize, Deserialize)]
struct AccountRecord {
    address: Address,
    salt: String,
    digest: String,
}

/// Manages the single node account under the keystore directory.
#[derive(Debug)]
pub struct AccountManager {
    keystore_dir: PathBuf,
    passwords: Arc<PasswordManager>,
}

impl AccountManager {
    /// Create a manager over the given keystore directory. Performs no I/O.
    pub fn new(keystore_dir: impl Into<PathBuf>, passwords: Arc<PasswordManager>) -> Self {
        Self {
            keystore_dir: keystore_dir.into(),
            passwords,
        }
    }

    fn record_path(&self) -> PathBuf {
        self.keystore_dir.join(ACCOUNT_FILE)
    }

    /// True when a node account has been created.
    pub fn node_account_exists(&self) -> bool {
        self.record_path().is_file()
    }

    /// The node account address.
    ///
    /// Verifies the record against the current passphrase.
    pub fn node_account(&self) -> NodewardResult<Address> {
        let record = self.read_record()?;
        let password = self.passwords.get_password()?;
        let expected = digest(&record.salt, &password)?;
        if record.digest != expected {
            return Err(NodewardError::Storage(format!(
                "node account record {} does not match the configured password",
                self.record_path().display()
            )));
        }
        Ok(record.address)
    }

    /// Create the node account. Requires a provisioned passphrase and
    /// refuses to overwrite an existing account.
    pub fn create_account(&self) -> NodewardResult<Address> {
        if !self.passwords.password_exists() {
            return Err(NodewardError::Precondition(
                "node password is not set, run `nodeward init` first".to_string(),
            ));
        }
        if self.node_account_exists() {
            return Err(NodewardError::Config(format!(
                "node account already exists at {}",
                self.record_path().display()
            )));
        }

        let mut rng = rand::rng();
        let mut address_bytes = [0u8; 20];
        rng.fill_bytes(&mut address_bytes);
        let mut salt_bytes = [0u8; 16];
        rng.fill_bytes(&mut salt_bytes);

        let address = Address::from_bytes(address_bytes);
        let salt = hex::encode(salt_bytes);
        let password = self.passwords.get_password()?;
        let record = AccountRecord {
            address,
            digest: digest(&salt, &password)?,
            salt,
        };

        std::fs::create_dir_all(&self.keystore_dir).map_err(|e| {
            NodewardError::Storage(format!(
                "could not create keystore directory {}: {e}",
                self.keystore_dir.display()
            ))
        })?;
        let yaml = serde_yaml::to_string(&record)
            .map_err(|e| NodewardError::Internal(format!("could not encode account record: {e}")))?;
        std::fs::write(self.record_path(), yaml).map_err(|e| {
            NodewardError::Storage(format!(
                "could not write {}: {e}",
                self.record_path().display()
            ))
        })?;

        tracing::info!(%address, "Created node account");
        Ok(address)
    }

    fn read_record(&self) -> NodewardResult<AccountRecord> {
        let path = self.record_path();
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            NodewardError::Storage(format!("could not read {}: {e}", path.display()))
        })?;
        serde_yaml::from_str(&raw).map_err(|e| NodewardError::Parse {
            path,
            reason: e.to_string(),
        })
    }
}

fn digest(salt_hex: &str, password: &str) -> NodewardResult<String> {
    let salt = hex::decode(salt_hex)
        .map_err(|e| NodewardError::Storage(format!("corrupt account salt: {e}")))?;
    let mut hasher = Sha256::new();
    hasher.update(&salt);
    hasher.update(password.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
