use std::sync::Arc;

use clap::Args;

use nodeward::services::{AccountManager, KeyManager, PasswordManager};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Node password to provision (minimum 12 characters)
    #[arg(long, env = "NODEWARD_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Also create a validator signing key
    #[arg(long)]
    pub with_validator_key: bool,
}

pub async fn execute(args: InitArgs, global: &crate::cli::GlobalFlags) -> anyhow::Result<()> {
    let config = global.resolve_config()?;

    let passwords = Arc::new(PasswordManager::new(config.password_path()));
    if passwords.password_exists() {
        println!("Node password already set at {}", passwords.path().display());
    } else {
        passwords.set_password(&args.password)?;
        println!("Node password saved to {}", passwords.path().display());
    }

    let accounts = AccountManager::new(config.keystore_path(), Arc::clone(&passwords));
    if accounts.node_account_exists() {
        println!("Node account already exists: {}", accounts.node_account()?);
    } else {
        println!("Node account created: {}", accounts.create_account()?);
    }

    if args.with_validator_key {
        let keys = KeyManager::new(config.validator_keystore_path(), passwords);
        println!("Validator key created: {}", keys.create_key()?);
    }

    Ok(())
}
