mod cli;
mod commands;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nodeward::logging::init_logging();

    let cli = cli::Cli::parse();
    match cli.command {
        cli::Command::Init(args) => commands::init::execute(args, &cli.global).await,
        cli::Command::Status(args) => commands::status::execute(args, &cli.global).await,
        cli::Command::Config(args) => commands::config::execute(args, &cli.global).await,
    }
}
