//! CLI argument parsing for crate-jmx-exporter
//!
//! This module provides the command-line interface using clap derive macros.
//!
//! # Options
//!
//! - `--config` / `-c`: Configuration file path (default: config.yaml, env: CRATE_JMX_CONFIG)
//! - `--listen`: Listen address as `[host:]port` (env: CRATE_JMX_LISTEN)
//! - `--jolokia-url`: Jolokia agent URL (env: CRATE_JMX_JOLOKIA_URL)
//! - `--jolokia-timeout`: HTTP timeout in milliseconds (env: CRATE_JMX_JOLOKIA_TIMEOUT)
//! - `--username`: Jolokia auth username (env: CRATE_JMX_USERNAME)
//! - `--password`: Jolokia auth password (env: CRATE_JMX_PASSWORD)
//! - `--log-level` / `-l`: Log level (trace/debug/info/warn/error, env: CRATE_JMX_LOG_LEVEL)
//! - `--log-format`: Log output format (text/json, env: CRATE_JMX_LOG_FORMAT)
//! - `--validate`: Print the resolved configuration and exit
//!
//! # Precedence
//!
//! Configuration values are resolved in the following order (highest to lowest priority):
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, LogFormat};

/// crate-jmx-exporter - CrateDB JMX metrics exporter
///
/// Reads CrateDB's monitoring MBeans via a Jolokia agent
/// and exports them in Prometheus format.
#[derive(Parser, Debug)]
#[command(name = "crate-jmx-exporter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config.yaml",
        env = "CRATE_JMX_CONFIG"
    )]
    pub config: PathBuf,

    /// Listen address as [host:]port (overrides config file)
    #[arg(long, value_name = "ADDRESS", env = "CRATE_JMX_LISTEN")]
    pub listen: Option<String>,

    /// Jolokia agent URL (overrides config file)
    #[arg(long, value_name = "URL", env = "CRATE_JMX_JOLOKIA_URL")]
    pub jolokia_url: Option<String>,

    /// Jolokia HTTP timeout in milliseconds (overrides config file)
    #[arg(long, value_name = "MS", env = "CRATE_JMX_JOLOKIA_TIMEOUT")]
    pub jolokia_timeout: Option<u64>,

    /// Jolokia authentication username (overrides config file)
    #[arg(long, value_name = "USERNAME", env = "CRATE_JMX_USERNAME")]
    pub username: Option<String>,

    /// Jolokia authentication password (overrides config file)
    #[arg(long, value_name = "PASSWORD", env = "CRATE_JMX_PASSWORD")]
    pub password: Option<String>,

    /// Print the resolved configuration and exit
    #[arg(long)]
    pub validate: bool,

    /// Log level
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        env = "CRATE_JMX_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// Log output format (overrides config file)
    #[arg(long, value_enum, env = "CRATE_JMX_LOG_FORMAT")]
    pub log_format: Option<LogFormatArg>,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(listen) = &self.listen {
            config.server.listen = listen.clone();
        }
        if let Some(url) = &self.jolokia_url {
            config.jolokia.url = url.clone();
        }
        if let Some(timeout) = self.jolokia_timeout {
            config.jolokia.timeout_ms = timeout;
        }
        if let Some(username) = &self.username {
            config.jolokia.username = Some(username.clone());
        }
        if let Some(password) = &self.password {
            config.jolokia.password = Some(password.clone());
        }
        if let Some(format) = self.log_format {
            config.server.log_format = format.into();
        }
    }
}

/// Log level options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level - default
    Info,
    /// Warn level
    Warn,
    /// Error level - least verbose
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
