//! Ledger RPC client.
//!
//! Speaks JSON-RPC 2.0 over HTTP. Dialing constructs the client without
//! touching the network; `connect` performs the version handshake, and the
//! `wait_*` helpers poll until the remote side is usable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use nodeward_shared::constants::ledger as ledger_consts;
use nodeward_shared::{Address, NodewardError, NodewardResult};

/// Ledger sync progress as reported by the remote node.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub syncing: bool,
    #[serde(default)]
    pub current_block: Option<u64>,
    #[serde(default)]
    pub highest_block: Option<u64>,
}

/// A contract definition fetched from the ledger.
#[derive(Clone, Debug, Deserialize)]
pub struct ContractDefinition {
    pub address: Address,
    pub abi: String,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse<R> {
    result: Option<R>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC client for the ledger node.
#[derive(Debug)]
pub struct LedgerClient {
    endpoint: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl LedgerClient {
    /// Dial the endpoint. Builds the HTTP client but performs no I/O.
    pub fn dial(endpoint: impl Into<String>) -> NodewardResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NodewardError::Internal(format!("could not build HTTP client: {e}")))?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
            next_id: AtomicU64::new(1),
        })
    }

    /// Endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call_rpc<R: DeserializeOwned>(&self, method: &str, params: Value) -> NodewardResult<R> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                NodewardError::Connectivity(format!(
                    "could not reach ledger at {}: {e}",
                    self.endpoint
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NodewardError::Connectivity(format!(
                "ledger at {} returned HTTP {status}",
                self.endpoint
            )));
        }

        let body: RpcResponse<R> = response.json().await.map_err(|e| {
            NodewardError::Connectivity(format!(
                "invalid response from ledger at {}: {e}",
                self.endpoint
            ))
        })?;

        if let Some(err) = body.error {
            return Err(NodewardError::RemoteLoad(format!(
                "{method} failed: {} (code {})",
                err.message, err.code
            )));
        }
        body.result
            .ok_or_else(|| NodewardError::RemoteLoad(format!("{method} returned no result")))
    }

    /// Perform the version handshake.
    ///
    /// Any failure, transport or protocol, is a connectivity failure naming
    /// the endpoint.
    pub async fn connect(&self) -> NodewardResult<String> {
        let version: String = self
            .call_rpc("ledger_clientVersion", json!([]))
            .await
            .map_err(|e| {
                NodewardError::Connectivity(format!(
                    "handshake with ledger at {} failed: {e}",
                    self.endpoint
                ))
            })?;
        tracing::debug!(endpoint = %self.endpoint, %version, "Ledger handshake complete");
        Ok(version)
    }

    /// Poll until the handshake succeeds.
    pub async fn wait_connection(&self) -> NodewardResult<String> {
        loop {
            match self.connect().await {
                Ok(version) => return Ok(version),
                Err(e) => {
                    tracing::warn!(endpoint = %self.endpoint, error = %e, "Ledger not reachable yet, retrying");
                    tokio::time::sleep(ledger_consts::CONNECT_RETRY_INTERVAL).await;
                }
            }
        }
    }

    /// Current sync status.
    pub async fn sync_status(&self) -> NodewardResult<SyncStatus> {
        self.call_rpc("ledger_syncStatus", json!([])).await
    }

    /// Poll the sync status with capped exponential backoff until the remote
    /// node reports a synced chain head.
    pub async fn wait_synced(&self) -> NodewardResult<SyncStatus> {
        let mut delay = ledger_consts::SYNC_POLL_INITIAL;
        loop {
            let status = self.sync_status().await?;
            if !status.syncing {
                tracing::info!(endpoint = %self.endpoint, "Ledger is synced");
                return Ok(status);
            }
            tracing::info!(
                endpoint = %self.endpoint,
                current = ?status.current_block,
                highest = ?status.highest_block,
                "Ledger still syncing"
            );
            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(ledger_consts::SYNC_POLL_MAX);
        }
    }

    /// Deployed bytecode at an address, hex encoded. `"0x"` means none.
    pub async fn get_code(&self, address: Address) -> NodewardResult<String> {
        self.call_rpc("ledger_getCode", json!([address])).await
    }

    /// Fetch a named contract definition.
    pub async fn get_contract(&self, name: &str) -> NodewardResult<ContractDefinition> {
        self.call_rpc("ledger_getContract", json!([name])).await
    }

    /// Fetch a named ABI.
    pub async fn get_abi(&self, name: &str) -> NodewardResult<String> {
        self.call_rpc("ledger_getAbi", json!([name])).await
    }

    /// Read-only contract call.
    pub async fn call(&self, to: Address, method: &str, args: Value) -> NodewardResult<Value> {
        self.call_rpc("ledger_call", json!([to, method, args])).await
    }
}
