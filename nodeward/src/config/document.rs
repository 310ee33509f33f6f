//! Configuration document tree.
//!
//! Every leaf is optional so a document can represent a sparse layer as well
//! as the fully resolved result. Absence (`None` or an empty list) means
//! "unset, fall through to the lower layer". An explicitly present empty
//! string is a set value and participates in precedence like any other.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use nodeward_shared::Address;
use nodeward_shared::constants::{paths, runtime};

/// A configuration document.
///
/// Serialized as YAML on disk. The same type serves as a single source layer
/// and as the merged result of all layers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeConfig {
    /// On-ledger anchoring (storage contract).
    #[serde(skip_serializing_if = "LedgerSection::is_unset")]
    pub ledger: LedgerSection,

    /// Local node state paths.
    #[serde(skip_serializing_if = "NodeSection::is_unset")]
    pub node: NodeSection,

    /// Execution and consensus chain clients.
    #[serde(skip_serializing_if = "ChainsSection::is_unset")]
    pub chains: ChainsSection,

    /// Container runtime daemon.
    #[serde(skip_serializing_if = "RuntimeSection::is_unset")]
    pub runtime: RuntimeSection,
}

/// Ledger anchoring settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LedgerSection {
    /// Address of the deployed storage contract all lookups go through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_address: Option<Address>,
}

/// Local filesystem paths for node state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeSection {
    /// Passphrase file path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_path: Option<PathBuf>,

    /// Node account keystore directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keystore_path: Option<PathBuf>,

    /// Validator keystore directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator_keystore_path: Option<PathBuf>,

    /// Datastore file path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datastore_path: Option<PathBuf>,
}

/// Both chain client sections.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChainsSection {
    /// Execution layer.
    #[serde(skip_serializing_if = "ChainConfig::is_unset")]
    pub eth1: ChainConfig,

    /// Consensus layer.
    #[serde(skip_serializing_if = "ChainConfig::is_unset")]
    pub eth2: ChainConfig,
}

/// One chain's provider endpoint and client selection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChainConfig {
    /// Endpoint the node talks to for this chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Client software selection.
    #[serde(skip_serializing_if = "ClientSelection::is_unset")]
    pub client: ClientSelection,
}

/// Which client implementation runs this chain and with what parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientSelection {
    /// Catalogue of installable client options.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ClientOption>,

    /// ID of the chosen option.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,

    /// Operator-supplied parameter values, keyed by environment variable.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<UserParam>,
}

/// One installable client in the catalogue.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientOption {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ClientParam>,
}

/// A parameter a client option accepts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientParam {
    pub name: String,
    pub env: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// An operator-supplied value for a client parameter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserParam {
    pub env: String,
    pub value: String,
}

/// Container runtime daemon settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuntimeSection {
    /// HTTP endpoint of the container runtime daemon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

// ============================================================================
// Unset predicates (used by skip_serializing_if, keeps sparse layers sparse)
// ============================================================================

impl LedgerSection {
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }
}

impl NodeSection {
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }
}

impl ChainsSection {
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }
}

impl ChainConfig {
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }
}

impl ClientSelection {
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }
}

impl RuntimeSection {
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }
}

// ============================================================================
// Resolved accessors
// ============================================================================

impl NodeConfig {
    /// True when no layer contributed anything.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Passphrase file path, defaulting under the nodeward home directory.
    pub fn password_path(&self) -> PathBuf {
        self.node
            .password_path
            .clone()
            .unwrap_or_else(|| default_home().join(paths::PASSWORD_FILE))
    }

    /// Node account keystore directory, defaulting under the home directory.
    pub fn keystore_path(&self) -> PathBuf {
        self.node
            .keystore_path
            .clone()
            .unwrap_or_else(|| default_home().join(paths::NODE_KEYSTORE_DIR))
    }

    /// Validator keystore directory, defaulting under the home directory.
    pub fn validator_keystore_path(&self) -> PathBuf {
        self.node
            .validator_keystore_path
            .clone()
            .unwrap_or_else(|| default_home().join(paths::VALIDATOR_KEYSTORE_DIR))
    }

    /// Datastore file path, defaulting under the home directory.
    pub fn datastore_path(&self) -> PathBuf {
        self.node
            .datastore_path
            .clone()
            .unwrap_or_else(|| default_home().join(paths::DATASTORE_FILE))
    }

    /// Container runtime endpoint, defaulting to the local daemon.
    pub fn runtime_endpoint(&self) -> String {
        self.runtime
            .endpoint
            .clone()
            .unwrap_or_else(|| runtime::DEFAULT_ENDPOINT.to_string())
    }
}

impl ClientSelection {
    /// The catalogue entry matching the selected ID, if any.
    pub fn selected_client(&self) -> Option<&ClientOption> {
        let selected = self.selected.as_deref()?;
        self.options.iter().find(|opt| opt.id == selected)
    }
}

/// Default nodeward home directory (`$HOME/.nodeward`).
pub fn default_home() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(paths::HOME_DIR);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_empty() {
        assert!(NodeConfig::default().is_empty());
    }

    #[test]
    fn yaml_roundtrip_preserves_sparseness() {
        let mut doc = NodeConfig::default();
        doc.chains.eth1.provider = Some("http://localhost:8545".into());

        let yaml = serde_yaml::to_string(&doc).unwrap();
        // Unset sections stay off disk
        assert!(!yaml.contains("ledger"));
        assert!(!yaml.contains("runtime"));
        assert!(yaml.contains("eth1"));

        let back: NodeConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn selected_client_lookup() {
        let selection = ClientSelection {
            options: vec![
                ClientOption {
                    id: "geth".into(),
                    name: "Geth".into(),
                    ..Default::default()
                },
                ClientOption {
                    id: "besu".into(),
                    name: "Besu".into(),
                    ..Default::default()
                },
            ],
            selected: Some("besu".into()),
            params: vec![],
        };
        assert_eq!(selection.selected_client().unwrap().name, "Besu");
    }

    #[test]
    fn selected_client_none_when_unselected_or_unknown() {
        let mut selection = ClientSelection {
            options: vec![ClientOption {
                id: "geth".into(),
                name: "Geth".into(),
                ..Default::default()
            }],
            selected: None,
            params: vec![],
        };
        assert!(selection.selected_client().is_none());

        selection.selected = Some("missing".into());
        assert!(selection.selected_client().is_none());
    }

    #[test]
    fn camel_case_field_names_on_disk() {
        let raw = r#"
ledger:
  storageAddress: "0x1111111111111111111111111111111111111111"
node:
  passwordPath: /var/lib/nodeward/password
chains:
  eth1:
    provider: http://localhost:8545
    client:
      selected: geth
      options:
        - id: geth
          name: Geth
          image: ethereum/client-go
"#;
        let doc: NodeConfig = serde_yaml::from_str(raw).unwrap();
        assert!(doc.ledger.storage_address.is_some());
        assert_eq!(
            doc.node.password_path.as_deref(),
            Some(std::path::Path::new("/var/lib/nodeward/password"))
        );
        assert_eq!(
            doc.chains.eth1.client.selected_client().unwrap().image.as_deref(),
            Some("ethereum/client-go")
        );
    }

    #[test]
    fn defaulting_accessors_fall_back_to_home() {
        let doc = NodeConfig::default();
        assert!(doc.password_path().ends_with(paths::PASSWORD_FILE));
        assert!(doc.keystore_path().ends_with(paths::NODE_KEYSTORE_DIR));
        assert_eq!(doc.runtime_endpoint(), runtime::DEFAULT_ENDPOINT);
    }
}
