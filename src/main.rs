//! crate-jmx-exporter - CrateDB JMX metrics exporter
//!
//! This binary serves CrateDB's monitoring MBeans, read through a Jolokia
//! agent, on a Prometheus-compatible metrics endpoint.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate_jmx_exporter::{cli::Cli, config::Config, server};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config)?;
    cli.apply_to(&mut config);
    config.validate()?;

    if cli.validate {
        print!("{}", config.to_redacted_yaml()?);
        return Ok(());
    }

    crate_jmx_exporter::init_logging(&cli.log_level.to_string(), config.server.log_format)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "Starting crate-jmx-exporter"
    );

    server::run(config).await?;

    Ok(())
}
