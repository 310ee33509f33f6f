use clap::Args;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print the effective paths and endpoints after defaults are applied
    #[arg(long)]
    pub effective: bool,
}

pub async fn execute(args: ConfigArgs, global: &crate::cli::GlobalFlags) -> anyhow::Result<()> {
    let config = global.resolve_config()?;

    if args.effective {
        println!("passwordPath: {}", config.password_path().display());
        println!("keystorePath: {}", config.keystore_path().display());
        println!(
            "validatorKeystorePath: {}",
            config.validator_keystore_path().display()
        );
        println!("datastorePath: {}", config.datastore_path().display());
        println!("runtimeEndpoint: {}", config.runtime_endpoint());
        return Ok(());
    }

    // Sparse output, unset sections are omitted entirely.
    let yaml = serde_yaml::to_string(&config)?;
    print!("{yaml}");
    Ok(())
}
