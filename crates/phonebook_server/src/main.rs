//! Phonebook server entry point.

use clap::Parser;
use phonebook_server::{run_server, CliArgs, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_args(CliArgs::parse())?;
    config.validate()?;

    phonebook_core::init_logging(&config.log_level, config.log_dir.as_deref())
        .map_err(anyhow::Error::msg)?;

    run_server(config).await
}
