use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use anicla_dataset_prep::cli::Cli;
use anicla_dataset_prep::config::PrepConfig;
use anicla_dataset_prep::logging::{setup_logging, with_bootstrap_logging};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging settings come from the config, so its own diagnostics go through a stdout-only subscriber
    let bootstrap_level = cli.log_level.as_deref().unwrap_or("info");
    let mut config = with_bootstrap_logging(bootstrap_level, std::io::stdout, || {
        PrepConfig::load(cli.config.as_deref())
    })
    .context("failed to load configuration")?;
    cli.apply_overrides(&mut config);

    setup_logging(&config.logging.level, config.logging.log_dir.as_deref())
        .context("failed to initialise logging")?;

    info!("Starting anicla-dataset-prep v{}", env!("CARGO_PKG_VERSION"));
    cli.run(config)
}
