//! Concurrent remote definition loading.

use std::sync::Arc;

use tokio::task::JoinSet;

use nodeward_shared::{NodewardError, NodewardResult};

use crate::services::contracts::ContractManager;

/// Load contract and ABI definitions in parallel.
///
/// Both loads are spawned and the set is drained to completion before this
/// function returns, so no load task ever outlives the join point. When
/// either load fails, the first failure by completion order is the result
/// and the other task is still awaited.
pub async fn load_remote_definitions(
    contracts: Arc<ContractManager>,
    contract_names: Vec<String>,
    abi_names: Vec<String>,
) -> NodewardResult<()> {
    if contract_names.is_empty() && abi_names.is_empty() {
        return Ok(());
    }

    let mut tasks = JoinSet::new();
    {
        let contracts = Arc::clone(&contracts);
        tasks.spawn(async move { contracts.load_contracts(&contract_names).await });
    }
    {
        let contracts = Arc::clone(&contracts);
        tasks.spawn(async move { contracts.load_abis(&abi_names).await });
    }

    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        let result = match joined {
            Ok(result) => result,
            Err(e) => Err(NodewardError::Internal(format!("load task panicked: {e}"))),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "Remote definition load failed");
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
