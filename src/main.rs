mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    buildlens::output::print_banner();

    let cli = Cli::parse();
    info!("Starting BuildLens - CI Build Feed");
    cli.execute().await?;

    Ok(())
}
