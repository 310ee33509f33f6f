//! Command line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use nodeward::Address;
use nodeward::config::{self, InvocationOverrides, NodeConfig, default_home};
use nodeward::constants::paths;

use crate::commands;

#[derive(Parser, Debug)]
#[command(
    name = "nodeward",
    version,
    about = "Manage a staking node",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Provision the node password and account
    Init(commands::init::InitArgs),
    /// Report provisioning and connectivity status
    Status(commands::status::StatusArgs),
    /// Print the resolved configuration
    Config(commands::config::ConfigArgs),
}

/// Flags accepted by every subcommand.
///
/// Each override flag maps 1:1 onto a field of [`InvocationOverrides`], the
/// highest precedence configuration layer. Absent flags contribute nothing
/// and the value falls through to the settings and config files.
#[derive(Args, Debug)]
pub struct GlobalFlags {
    /// Path to the global configuration file
    #[arg(long, global = true, env = "NODEWARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the user settings file
    #[arg(long, global = true, env = "NODEWARD_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Storage contract address
    #[arg(long, global = true)]
    pub storage_address: Option<Address>,

    /// Node password file
    #[arg(long, global = true)]
    pub password_path: Option<PathBuf>,

    /// Node account keystore directory
    #[arg(long, global = true)]
    pub keystore_path: Option<PathBuf>,

    /// Validator keystore directory
    #[arg(long, global = true)]
    pub validator_keystore_path: Option<PathBuf>,

    /// Datastore file
    #[arg(long, global = true)]
    pub datastore_path: Option<PathBuf>,

    /// Execution chain JSON-RPC endpoint
    #[arg(long, global = true)]
    pub eth1_provider: Option<String>,

    /// Consensus chain HTTP endpoint
    #[arg(long, global = true)]
    pub eth2_provider: Option<String>,

    /// Container runtime endpoint
    #[arg(long, global = true)]
    pub runtime_endpoint: Option<String>,
}

impl GlobalFlags {
    /// Resolve the effective configuration for this invocation.
    pub fn resolve_config(&self) -> anyhow::Result<NodeConfig> {
        let global = self
            .config
            .clone()
            .unwrap_or_else(|| default_home().join(paths::GLOBAL_CONFIG_FILE));
        let settings = self
            .settings
            .clone()
            .unwrap_or_else(|| default_home().join(paths::USER_SETTINGS_FILE));

        let overrides = InvocationOverrides {
            storage_address: self.storage_address,
            password_path: self.password_path.clone(),
            keystore_path: self.keystore_path.clone(),
            validator_keystore_path: self.validator_keystore_path.clone(),
            datastore_path: self.datastore_path.clone(),
            eth1_provider: self.eth1_provider.clone(),
            eth2_provider: self.eth2_provider.clone(),
            runtime_endpoint: self.runtime_endpoint.clone(),
        };

        Ok(config::resolve(&global, &settings, &overrides)?)
    }
}
