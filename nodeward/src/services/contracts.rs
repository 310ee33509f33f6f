//! On-ledger contract and ABI manager.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use nodeward_shared::constants::ledger as ledger_consts;
use nodeward_shared::{Address, NodewardError, NodewardResult};

use super::ledger::LedgerClient;

/// A bound contract: a ledger address plus the ABI to call it with.
#[derive(Clone, Debug)]
pub struct Contract {
    pub name: String,
    pub address: Address,
    pub abi: String,
    ledger: Arc<LedgerClient>,
}

impl Contract {
    /// Read-only call against this contract.
    pub async fn call(&self, method: &str, args: Value) -> NodewardResult<Value> {
        self.ledger.call(self.address, method, args).await
    }
}

/// Caches contract definitions and ABIs fetched through the storage contract.
///
/// The maps use interior locks so contract and ABI loads may run from
/// parallel tasks against one shared manager.
#[derive(Debug)]
pub struct ContractManager {
    ledger: Arc<LedgerClient>,
    storage_address: Address,
    contracts: RwLock<HashMap<String, Contract>>,
    abis: RwLock<HashMap<String, String>>,
}

impl ContractManager {
    /// Create a manager anchored at the given storage contract.
    pub fn new(ledger: Arc<LedgerClient>, storage_address: Address) -> Self {
        Self {
            ledger,
            storage_address,
            contracts: RwLock::new(HashMap::new()),
            abis: RwLock::new(HashMap::new()),
        }
    }

    /// Address of the storage contract all lookups go through.
    pub fn storage_address(&self) -> Address {
        self.storage_address
    }

    /// Poll until code is deployed at the storage address.
    pub async fn wait_deployed(&self) -> NodewardResult<()> {
        loop {
            let code = self.ledger.get_code(self.storage_address).await?;
            if !code.is_empty() && code != "0x" {
                tracing::debug!(address = %self.storage_address, "Storage contract is deployed");
                return Ok(());
            }
            tracing::info!(
                address = %self.storage_address,
                "Storage contract not deployed yet, waiting"
            );
            tokio::time::sleep(ledger_consts::DEPLOY_POLL_INTERVAL).await;
        }
    }

    /// Fetch and cache the named contract definitions.
    pub async fn load_contracts(&self, names: &[String]) -> NodewardResult<()> {
        for name in names {
            let definition = self.ledger.get_contract(name).await.map_err(|e| {
                NodewardError::RemoteLoad(format!("could not load contract {name:?}: {e}"))
            })?;
            let contract = Contract {
                name: name.clone(),
                address: definition.address,
                abi: definition.abi,
                ledger: Arc::clone(&self.ledger),
            };
            tracing::debug!(contract = %name, address = %contract.address, "Loaded contract");
            self.contracts.write().insert(name.clone(), contract);
        }
        Ok(())
    }

    /// Fetch and cache the named ABIs.
    pub async fn load_abis(&self, names: &[String]) -> NodewardResult<()> {
        for name in names {
            let abi = self.ledger.get_abi(name).await.map_err(|e| {
                NodewardError::RemoteLoad(format!("could not load ABI {name:?}: {e}"))
            })?;
            tracing::debug!(abi = %name, "Loaded ABI");
            self.abis.write().insert(name.clone(), abi);
        }
        Ok(())
    }

    /// A previously loaded contract.
    pub fn contract(&self, name: &str) -> Option<Contract> {
        self.contracts.read().get(name).cloned()
    }

    /// A previously loaded ABI.
    pub fn abi(&self, name: &str) -> Option<String> {
        self.abis.read().get(name).cloned()
    }

    /// Bind a contract at an explicit address using a loaded ABI.
    pub fn bind(&self, name: &str, address: Address, abi_name: &str) -> NodewardResult<Contract> {
        let abi = self.abi(abi_name).ok_or_else(|| {
            NodewardError::Internal(format!("ABI {abi_name:?} has not been loaded"))
        })?;
        Ok(Contract {
            name: name.to_string(),
            address,
            abi,
            ledger: Arc::clone(&self.ledger),
        })
    }
}
