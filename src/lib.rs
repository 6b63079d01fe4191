//! crate-jmx-exporter library
//!
//! Translates CrateDB's JMX monitoring MBeans, read through a Jolokia agent,
//! into Prometheus metric families and serves them over HTTP.

pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod metrics;
pub mod server;
pub mod transformer;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;

/// Initialize the logging subsystem
///
/// # Arguments
/// * `level` - Log level string (trace, debug, info, warn, error)
/// * `format` - Plain text or JSON lines
///
/// `RUST_LOG`, when set, takes precedence over `level`.
///
/// # Errors
/// Returns an error if the logging system fails to initialize
pub fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
