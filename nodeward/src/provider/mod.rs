//! Service bootstrap orchestration.
//!
//! ## Architecture
//!
//! A bootstrap request is expanded to its capability closure and then driven
//! through 15 ordered stages. Each stage initializes one capability into a
//! build context of `Option` slots; later stages may rely on every
//! capability their rules imply having been filled by an earlier stage.
//!
//! ```text
//!  1. Datastore            8. ContractManager
//!  2. PasswordManager      9. StoragePresence
//!  3. AccountManager      10. remote loads (joiner)
//!  4. KeyManager          11. NodeContractAddress
//!  5. LedgerClient        12. NodeContract
//!  6. LedgerConnected     13. Publisher
//!  7. LedgerSynced        14. BeaconClient
//!                         15. ContainerRuntime
//! ```
//!
//! The first stage error aborts the whole bootstrap. The partially filled
//! context is dropped on the error path, which releases every resource that
//! was already opened; the returned bundle is all-or-nothing.

pub mod joiner;

use std::sync::Arc;

use nodeward_shared::constants::contracts as contract_names;
use nodeward_shared::{Address, NodewardError, NodewardResult};

use crate::capability::{Capability, CapabilityRequest, CapabilitySet};
use crate::config::NodeConfig;
use crate::services::accounts::AccountManager;
use crate::services::beacon::BeaconClient;
use crate::services::contracts::{Contract, ContractManager};
use crate::services::datastore::Datastore;
use crate::services::keys::KeyManager;
use crate::services::ledger::{LedgerClient, SyncStatus};
use crate::services::passwords::PasswordManager;
use crate::services::publisher::Publisher;
use crate::services::runtime_client::ContainerRuntimeClient;

/// The initialized services for one bootstrap.
///
/// Every field mirrors a capability: requested (directly or by implication)
/// means `Some`, otherwise `None`. Dropping the bundle releases everything.
#[derive(Debug, Default)]
pub struct ServiceBundle {
    pub capabilities: CapabilitySet,
    pub datastore: Option<Arc<Datastore>>,
    pub passwords: Option<Arc<PasswordManager>>,
    pub accounts: Option<Arc<AccountManager>>,
    pub keys: Option<Arc<KeyManager>>,
    pub ledger: Option<Arc<LedgerClient>>,
    pub ledger_version: Option<String>,
    pub sync_status: Option<SyncStatus>,
    pub contracts: Option<Arc<ContractManager>>,
    pub node_account: Option<Address>,
    pub node_contract_address: Option<Address>,
    pub node_contract: Option<Contract>,
    pub publisher: Option<Arc<Publisher>>,
    pub beacon: Option<Arc<BeaconClient>>,
    pub container_runtime: Option<Arc<ContainerRuntimeClient>>,
}

/// Entry point for bootstrapping services from a resolved configuration.
pub struct ServiceProvider;

impl ServiceProvider {
    /// Expand the request and run the stage sequence.
    ///
    /// Stages whose capability is not in the closure are skipped. Stage
    /// preconditions surface as [`NodewardError::Precondition`] with the
    /// remediation in the message.
    pub async fn bootstrap(
        request: &CapabilityRequest,
        config: &NodeConfig,
    ) -> NodewardResult<ServiceBundle> {
        let caps = request.expand();
        tracing::info!(capabilities = ?caps, "Bootstrapping services");

        let mut ctx = ServiceBundle {
            capabilities: caps,
            ..Default::default()
        };

        // Stage 1: datastore
        if caps.contains(Capability::Datastore) {
            tracing::debug!(stage = 1, "Opening datastore");
            ctx.datastore = Some(Arc::new(Datastore::open(&config.datastore_path())?));
        }

        // Stage 2: password manager
        if caps.contains(Capability::PasswordManager) {
            tracing::debug!(stage = 2, "Checking node password");
            let passwords = Arc::new(PasswordManager::new(config.password_path()));
            if !passwords.password_exists() {
                return Err(NodewardError::Precondition(
                    "node password is not set, run `nodeward init` first".to_string(),
                ));
            }
            ctx.passwords = Some(passwords);
        }

        // Stage 3: account manager
        if caps.contains(Capability::AccountManager) {
            tracing::debug!(stage = 3, "Checking node account");
            let passwords = required(&ctx.passwords, "password manager")?;
            let accounts = Arc::new(AccountManager::new(
                config.keystore_path(),
                Arc::clone(passwords),
            ));
            if !accounts.node_account_exists() {
                return Err(NodewardError::Precondition(
                    "node account does not exist, run `nodeward init` first".to_string(),
                ));
            }
            ctx.node_account = Some(accounts.node_account()?);
            ctx.accounts = Some(accounts);
        }

        // Stage 4: key manager, no existence precondition
        if caps.contains(Capability::KeyManager) {
            tracing::debug!(stage = 4, "Initializing validator keystore");
            let passwords = required(&ctx.passwords, "password manager")?;
            ctx.keys = Some(Arc::new(KeyManager::new(
                config.validator_keystore_path(),
                Arc::clone(passwords),
            )));
        }

        // Stage 5: dial the ledger
        if caps.contains(Capability::LedgerClient) {
            tracing::debug!(stage = 5, "Dialing ledger");
            let endpoint = config.chains.eth1.provider.clone().ok_or_else(|| {
                NodewardError::Config("eth1 provider endpoint is not configured".to_string())
            })?;
            ctx.ledger = Some(Arc::new(LedgerClient::dial(endpoint)?));
        }

        // Stage 6: wait for the handshake
        if caps.contains(Capability::LedgerConnected) {
            tracing::debug!(stage = 6, "Waiting for ledger connection");
            let ledger = required(&ctx.ledger, "ledger client")?;
            ctx.ledger_version = Some(ledger.wait_connection().await?);
        }

        // Stage 7: wait for sync
        if caps.contains(Capability::LedgerSynced) {
            tracing::debug!(stage = 7, "Waiting for ledger sync");
            let ledger = required(&ctx.ledger, "ledger client")?;
            ctx.sync_status = Some(ledger.wait_synced().await?);
        }

        // Stage 8: contract manager
        if caps.contains(Capability::ContractManager) {
            tracing::debug!(stage = 8, "Initializing contract manager");
            let ledger = required(&ctx.ledger, "ledger client")?;
            let storage_address = config.ledger.storage_address.ok_or_else(|| {
                NodewardError::Config("storage contract address is not configured".to_string())
            })?;
            ctx.contracts = Some(Arc::new(ContractManager::new(
                Arc::clone(ledger),
                storage_address,
            )));
        }

        // Stage 9: storage contract presence
        if caps.contains(Capability::StoragePresence) {
            tracing::debug!(stage = 9, "Waiting for storage contract deployment");
            let contracts = required(&ctx.contracts, "contract manager")?;
            contracts.wait_deployed().await?;
        }

        // Stage 10: remote definition loads
        if caps.contains(Capability::ContractManager) {
            let contracts = required(&ctx.contracts, "contract manager")?;
            let (contract_list, abi_list) = remote_load_lists(request, caps);
            if !contract_list.is_empty() || !abi_list.is_empty() {
                tracing::debug!(
                    stage = 10,
                    contracts = ?contract_list,
                    abis = ?abi_list,
                    "Loading remote definitions"
                );
                joiner::load_remote_definitions(Arc::clone(contracts), contract_list, abi_list)
                    .await?;
            }
        }

        // Stage 11: resolve this node's contract address through the registry
        if caps.contains(Capability::NodeContractAddress) {
            tracing::debug!(stage = 11, "Resolving node contract address");
            let contracts = required(&ctx.contracts, "contract manager")?;
            let account = ctx
                .node_account
                .ok_or_else(|| NodewardError::Internal("node account not resolved".to_string()))?;
            let registry = contracts
                .contract(contract_names::NODE_REGISTRY)
                .ok_or_else(|| {
                    NodewardError::Internal("node registry contract not loaded".to_string())
                })?;

            let raw = registry
                .call("getNodeContract", serde_json::json!([account]))
                .await?;
            let raw = raw.as_str().ok_or_else(|| {
                NodewardError::RemoteLoad(format!(
                    "registry returned a non-address node contract: {raw}"
                ))
            })?;
            let address = Address::parse(raw)?;
            if address.is_zero() {
                return Err(NodewardError::Precondition(
                    "node is not registered with the network, register the node first".to_string(),
                ));
            }
            ctx.node_contract_address = Some(address);
        }

        // Stage 12: bind the node contract
        if caps.contains(Capability::NodeContract) {
            tracing::debug!(stage = 12, "Binding node contract");
            let contracts = required(&ctx.contracts, "contract manager")?;
            let address = ctx.node_contract_address.ok_or_else(|| {
                NodewardError::Internal("node contract address not resolved".to_string())
            })?;
            ctx.node_contract =
                Some(contracts.bind("node", address, contract_names::NODE_CONTRACT_ABI)?);
        }

        // Stage 13: publisher
        if caps.contains(Capability::Publisher) {
            tracing::debug!(stage = 13, "Starting publisher");
            ctx.publisher = Some(Arc::new(Publisher::new()));
        }

        // Stage 14: beacon client
        if caps.contains(Capability::BeaconClient) {
            tracing::debug!(stage = 14, "Initializing beacon client");
            let endpoint = config.chains.eth2.provider.clone().ok_or_else(|| {
                NodewardError::Config("eth2 provider endpoint is not configured".to_string())
            })?;
            let publisher = required(&ctx.publisher, "publisher")?;
            ctx.beacon = Some(Arc::new(BeaconClient::new(endpoint, Arc::clone(publisher))));
        }

        // Stage 15: container runtime
        if caps.contains(Capability::ContainerRuntime) {
            tracing::debug!(stage = 15, "Connecting to container runtime");
            let client = ContainerRuntimeClient::connect(&config.runtime_endpoint()).await?;
            ctx.container_runtime = Some(Arc::new(client));
        }

        tracing::info!("Bootstrap complete");
        Ok(ctx)
    }
}

/// A dependency that earlier stages must have filled.
fn required<'a, T>(slot: &'a Option<T>, what: &str) -> NodewardResult<&'a T> {
    slot.as_ref()
        .ok_or_else(|| NodewardError::Internal(format!("{what} not initialized")))
}

/// The requested load lists plus the definitions the later stages need.
fn remote_load_lists(request: &CapabilityRequest, caps: CapabilitySet) -> (Vec<String>, Vec<String>) {
    let mut contract_list = request.load_contracts.clone();
    let mut abi_list = request.load_abis.clone();

    if caps.contains(Capability::NodeContractAddress)
        && !contract_list.iter().any(|n| n == contract_names::NODE_REGISTRY)
    {
        contract_list.push(contract_names::NODE_REGISTRY.to_string());
    }
    if caps.contains(Capability::NodeContract)
        && !abi_list.iter().any(|n| n == contract_names::NODE_CONTRACT_ABI)
    {
        abi_list.push(contract_names::NODE_CONTRACT_ABI.to_string());
    }

    (contract_list, abi_list)
}
