use std::sync::Arc;

use clap::Args;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use nodeward::services::{
    AccountManager, BeaconClient, ContainerRuntimeClient, KeyManager, LedgerClient,
    PasswordManager, Publisher,
};

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Also probe the configured remote endpoints
    #[arg(long)]
    pub probe: bool,
}

pub async fn execute(args: StatusArgs, global: &crate::cli::GlobalFlags) -> anyhow::Result<()> {
    let config = global.resolve_config()?;

    let passwords = Arc::new(PasswordManager::new(config.password_path()));
    let accounts = AccountManager::new(config.keystore_path(), Arc::clone(&passwords));
    let keys = KeyManager::new(config.validator_keystore_path(), Arc::clone(&passwords));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Component", "Status"]);

    let password_status = if passwords.password_exists() {
        "set".to_string()
    } else {
        "not set".to_string()
    };
    table.add_row(vec!["Password".to_string(), password_status]);

    let account_status = if accounts.node_account_exists() {
        match accounts.node_account() {
            Ok(address) => address.to_string(),
            Err(e) => format!("error: {e}"),
        }
    } else {
        "not created".to_string()
    };
    table.add_row(vec!["Node account".to_string(), account_status]);

    table.add_row(vec![
        "Validator keys".to_string(),
        keys.key_count()?.to_string(),
    ]);

    let eth1 = config.chains.eth1.provider.clone();
    let eth2 = config.chains.eth2.provider.clone();

    if args.probe {
        let ledger_status = match &eth1 {
            Some(endpoint) => match LedgerClient::dial(endpoint.clone()) {
                Ok(ledger) => match ledger.connect().await {
                    Ok(version) => version,
                    Err(e) => format!("unreachable: {e}"),
                },
                Err(e) => format!("error: {e}"),
            },
            None => "not configured".to_string(),
        };
        table.add_row(vec!["Ledger".to_string(), ledger_status]);

        let beacon_status = match &eth2 {
            Some(endpoint) => {
                let beacon = BeaconClient::new(endpoint.clone(), Arc::new(Publisher::new()));
                match beacon.fetch_head().await {
                    Ok(head) => format!("head slot {}", head.slot),
                    Err(e) => format!("unreachable: {e}"),
                }
            }
            None => "not configured".to_string(),
        };
        table.add_row(vec!["Beacon".to_string(), beacon_status]);

        let runtime_status = match ContainerRuntimeClient::connect(&config.runtime_endpoint()).await
        {
            Ok(client) => client.version().version.clone(),
            Err(e) => format!("unreachable: {e}"),
        };
        table.add_row(vec!["Container runtime".to_string(), runtime_status]);
    } else {
        table.add_row(vec![
            "Ledger endpoint".to_string(),
            eth1.unwrap_or_else(|| "not configured".to_string()),
        ]);
        table.add_row(vec![
            "Beacon endpoint".to_string(),
            eth2.unwrap_or_else(|| "not configured".to_string()),
        ]);
        table.add_row(vec![
            "Runtime endpoint".to_string(),
            config.runtime_endpoint(),
        ]);
    }

    println!("{table}");
    Ok(())
}
