//! SCXML state machine compiler

use anyhow::Context;
use clap::Parser;
use scxml_fsm::{Config, VERSION, cli, init_logging};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let config = if let Some(config_path) = &args.config {
        Config::from_file(config_path)
            .with_context(|| format!("loading configuration from {:?}", config_path))?
    } else {
        Config::load().context("loading configuration")?
    };

    init_logging(&config.logging)?;

    tracing::info!("scxml-fsm v{}", VERSION);
    tracing::debug!("Parsed arguments: {:?}", args);
    tracing::debug!("Loaded configuration: {:?}", config);

    cli::execute(args, config)?;

    Ok(())
}
