//! Invocation layer derived from command line flags.

use std::path::PathBuf;

use nodeward_shared::Address;

use super::document::NodeConfig;

/// Flag values captured from one CLI invocation.
///
/// Every field is optional; an absent flag contributes nothing to the
/// invocation layer and the corresponding config field falls through to the
/// file layers. The CLI maps its global flags onto this struct 1:1.
#[derive(Clone, Debug, Default)]
pub struct InvocationOverrides {
    pub storage_address: Option<Address>,
    pub password_path: Option<PathBuf>,
    pub keystore_path: Option<PathBuf>,
    pub validator_keystore_path: Option<PathBuf>,
    pub datastore_path: Option<PathBuf>,
    pub eth1_provider: Option<String>,
    pub eth2_provider: Option<String>,
    pub runtime_endpoint: Option<String>,
}

impl InvocationOverrides {
    /// Render the overrides as a sparse configuration document, the highest
    /// precedence layer of the merge.
    pub fn to_document(&self) -> NodeConfig {
        let mut doc = NodeConfig::default();
        doc.ledger.storage_address = self.storage_address;
        doc.node.password_path = self.password_path.clone();
        doc.node.keystore_path = self.keystore_path.clone();
        doc.node.validator_keystore_path = self.validator_keystore_path.clone();
        doc.node.datastore_path = self.datastore_path.clone();
        doc.chains.eth1.provider = self.eth1_provider.clone();
        doc.chains.eth2.provider = self.eth2_provider.clone();
        doc.runtime.endpoint = self.runtime_endpoint.clone();
        doc
    }
}
