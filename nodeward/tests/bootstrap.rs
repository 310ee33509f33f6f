//! End-to-end bootstrap tests against mock ledger and runtime endpoints.

use std::sync::Arc;

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nodeward::constants::runtime as runtime_consts;
use nodeward::services::{AccountManager, PasswordManager};
use nodeward::{
    Address, Capability, CapabilityRequest, CapabilitySet, NodeConfig, ServiceProvider,
};

const STORAGE: &str = "0x1111111111111111111111111111111111111111";
const REGISTRY: &str = "0x2222222222222222222222222222222222222222";
const NODE_CONTRACT: &str = "0x4444444444444444444444444444444444444444";

fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": result,
    }))
}

fn provision(dir: &TempDir) -> Address {
    let passwords = Arc::new(PasswordManager::new(dir.path().join("password")));
    passwords.set_password("correct horse battery").unwrap();
    let accounts = AccountManager::new(dir.path().join("node-keys"), passwords);
    accounts.create_account().unwrap()
}

fn config_for(dir: &TempDir, ledger_uri: &str) -> NodeConfig {
    let mut config = NodeConfig::default();
    config.node.password_path = Some(dir.path().join("password"));
    config.node.keystore_path = Some(dir.path().join("node-keys"));
    config.node.validator_keystore_path = Some(dir.path().join("validator-keys"));
    config.node.datastore_path = Some(dir.path().join("data.db"));
    config.ledger.storage_address = Some(Address::parse(STORAGE).unwrap());
    config.chains.eth1.provider = Some(ledger_uri.to_string());
    config
}

/// Mounts the definition loads stage 10 performs for node contract requests.
async fn mount_definition_loads(server: &MockServer) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "ledger_getContract"})))
        .respond_with(rpc_result(json!({"address": REGISTRY, "abi": "[]"})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "ledger_getAbi"})))
        .respond_with(rpc_result(json!("[]")))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_bootstrap_without_password_is_precondition() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, "http://127.0.0.1:9");

    let request = CapabilityRequest::for_capabilities(&[Capability::PasswordManager]);
    let err = ServiceProvider::bootstrap(&request, &config)
        .await
        .unwrap_err();
    assert!(err.is_precondition());
    assert!(err.to_string().contains("nodeward init"));
}

#[tokio::test]
async fn test_bootstrap_without_account_is_precondition() {
    let dir = TempDir::new().unwrap();
    let passwords = PasswordManager::new(dir.path().join("password"));
    passwords.set_password("correct horse battery").unwrap();
    let config = config_for(&dir, "http://127.0.0.1:9");

    let request = CapabilityRequest::for_capabilities(&[Capability::AccountManager]);
    let err = ServiceProvider::bootstrap(&request, &config)
        .await
        .unwrap_err();
    assert!(err.is_precondition());
    assert!(err.to_string().contains("node account"));
}

#[tokio::test]
async fn test_datastore_only_bootstrap_skips_everything_else() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, "http://127.0.0.1:9");

    let request = CapabilityRequest::for_capabilities(&[Capability::Datastore]);
    let bundle = ServiceProvider::bootstrap(&request, &config).await.unwrap();

    let datastore = bundle.datastore.as_ref().unwrap();
    datastore.put("greeting", "hello").unwrap();
    assert_eq!(datastore.get("greeting").unwrap().as_deref(), Some("hello"));

    assert!(bundle.passwords.is_none());
    assert!(bundle.ledger.is_none());
    assert!(bundle.contracts.is_none());
}

#[tokio::test]
async fn test_missing_eth1_provider_is_config_error() {
    let dir = TempDir::new().unwrap();
    provision(&dir);
    let mut config = config_for(&dir, "unused");
    config.chains.eth1.provider = None;

    let request = CapabilityRequest::for_capabilities(&[Capability::LedgerClient]);
    let err = ServiceProvider::bootstrap(&request, &config)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("eth1 provider"));
}

#[tokio::test]
async fn test_requested_load_lists_populate_the_contract_manager() {
    let server = MockServer::start().await;
    mount_definition_loads(&server).await;

    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &server.uri());

    let request = CapabilityRequest {
        capabilities: CapabilitySet::of(&[Capability::ContractManager]),
        load_contracts: vec!["A".into()],
        load_abis: vec!["B".into()],
    };
    let bundle = ServiceProvider::bootstrap(&request, &config).await.unwrap();

    let contracts = bundle.contracts.as_ref().unwrap();
    assert!(contracts.contract("A").is_some());
    assert!(contracts.abi("B").is_some());
}

#[tokio::test]
async fn test_node_contract_bootstrap() {
    let server = MockServer::start().await;
    mount_definition_loads(&server).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "ledger_call"})))
        .respond_with(rpc_result(json!(NODE_CONTRACT)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let account = provision(&dir);
    let config = config_for(&dir, &server.uri());

    let request = CapabilityRequest::for_capabilities(&[Capability::NodeContract]);
    let bundle = ServiceProvider::bootstrap(&request, &config).await.unwrap();

    assert_eq!(bundle.node_account, Some(account));
    assert_eq!(
        bundle.node_contract_address,
        Some(Address::parse(NODE_CONTRACT).unwrap())
    );
    let contract = bundle.node_contract.as_ref().unwrap();
    assert_eq!(contract.address, Address::parse(NODE_CONTRACT).unwrap());

    // Implied capabilities were initialized, unrequested ones were not
    assert!(bundle.passwords.is_some());
    assert!(bundle.accounts.is_some());
    assert!(bundle.contracts.is_some());
    assert!(bundle.datastore.is_none());
    assert!(bundle.sync_status.is_none());
    assert!(bundle.beacon.is_none());
}

#[tokio::test]
async fn test_unregistered_node_is_precondition() {
    let server = MockServer::start().await;
    mount_definition_loads(&server).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "ledger_call"})))
        .respond_with(rpc_result(json!(
            "0x0000000000000000000000000000000000000000"
        )))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    provision(&dir);
    let config = config_for(&dir, &server.uri());

    let request = CapabilityRequest::for_capabilities(&[Capability::NodeContract]);
    let err = ServiceProvider::bootstrap(&request, &config)
        .await
        .unwrap_err();
    assert!(err.is_precondition());
    assert!(err.to_string().contains("register"));
}

#[tokio::test]
async fn test_full_bootstrap() {
    let ledger = MockServer::start().await;
    mount_definition_loads(&ledger).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "ledger_clientVersion"})))
        .respond_with(rpc_result(json!("nodeward-dev/1.0")))
        .mount(&ledger)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "ledger_syncStatus"})))
        .respond_with(rpc_result(json!({
            "syncing": false,
            "currentBlock": 10,
            "highestBlock": 10,
        })))
        .mount(&ledger)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "ledger_getCode"})))
        .respond_with(rpc_result(json!("0x6001")))
        .mount(&ledger)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "ledger_call"})))
        .respond_with(rpc_result(json!(NODE_CONTRACT)))
        .mount(&ledger)
        .await;

    let daemon = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!(
            "/v{}/version",
            runtime_consts::CONTAINER_API_VERSION
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Version": "24.0.7",
            "ApiVersion": "1.43",
        })))
        .mount(&daemon)
        .await;

    let dir = TempDir::new().unwrap();
    provision(&dir);
    let mut config = config_for(&dir, &ledger.uri());
    config.chains.eth2.provider = Some("http://127.0.0.1:5052".into());
    config.runtime.endpoint = Some(daemon.uri());

    let request = CapabilityRequest::for_capabilities(&[
        Capability::Datastore,
        Capability::KeyManager,
        Capability::LedgerConnected,
        Capability::LedgerSynced,
        Capability::StoragePresence,
        Capability::NodeContract,
        Capability::BeaconClient,
        Capability::ContainerRuntime,
    ]);
    let bundle = ServiceProvider::bootstrap(&request, &config).await.unwrap();

    assert!(bundle.datastore.is_some());
    assert!(bundle.passwords.is_some());
    assert!(bundle.accounts.is_some());
    assert!(bundle.keys.is_some());
    assert!(bundle.ledger.is_some());
    assert_eq!(bundle.ledger_version.as_deref(), Some("nodeward-dev/1.0"));
    assert!(!bundle.sync_status.as_ref().unwrap().syncing);
    assert!(bundle.contracts.is_some());
    assert!(bundle.node_account.is_some());
    assert!(bundle.node_contract.is_some());
    assert!(bundle.publisher.is_some());
    assert!(bundle.beacon.is_some());
    assert_eq!(
        bundle.container_runtime.as_ref().unwrap().version().version,
        "24.0.7"
    );
}
