//! Configuration management for crate-jmx-exporter
//!
//! Handles loading and validating configuration from YAML files.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use thiserror::Error;

use crate::collector::ObjectNamePattern;
use crate::transformer::EngineSettings;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Jolokia endpoint configuration
    #[serde(default)]
    pub jolokia: JolokiaConfig,

    /// Which MBeans are translated and how they are named
    #[serde(default)]
    pub exporter: ExporterConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address as `[host:]port`
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Metrics endpoint path
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,

    /// Readiness endpoint path
    #[serde(default = "default_ready_path")]
    pub ready_path: String,

    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Jolokia endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JolokiaConfig {
    /// Jolokia endpoint URL
    #[serde(default = "default_jolokia_url")]
    pub url: String,

    /// Optional username for basic auth
    pub username: Option<String>,

    /// Optional password for basic auth
    pub password: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

/// Translated MBeans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// MBean domain
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Key property pattern within the domain
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Metric name prefix replacing the domain
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

// Default value functions
fn default_listen() -> String {
    "0.0.0.0:7071".to_string()
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_ready_path() -> String {
    "/ready".to_string()
}

fn default_jolokia_url() -> String {
    "http://localhost:8778/jolokia".to_string()
}

fn default_timeout() -> u64 {
    5000
}

fn default_domain() -> String {
    "io.crate.monitoring".to_string()
}

fn default_pattern() -> String {
    "*".to_string()
}

fn default_namespace() -> String {
    "crate".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            metrics_path: default_metrics_path(),
            ready_path: default_ready_path(),
            log_format: LogFormat::default(),
        }
    }
}

impl Default for JolokiaConfig {
    fn default() -> Self {
        Self {
            url: default_jolokia_url(),
            username: None,
            password: None,
            timeout_ms: default_timeout(),
        }
    }
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            pattern: default_pattern(),
            namespace: default_namespace(),
        }
    }
}

impl ExporterConfig {
    /// Translation engine settings
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            source_domain: self.domain.clone(),
            pattern: self.pattern.clone(),
            namespace: self.namespace.clone(),
        }
    }
}

/// Parse a `[host:]port` listen string
///
/// A bare port binds all interfaces, IPv6 hosts are written in brackets
/// (`[::1]:7071`) and `localhost` means 127.0.0.1.
pub fn parse_listen_address(listen: &str) -> Result<SocketAddr, ConfigError> {
    let invalid = |reason: &str| {
        ConfigError::ValidationError(format!("Invalid listen address '{}': {}", listen, reason))
    };

    let (host, port) = match listen.rsplit_once(':') {
        None => (None, listen),
        Some((host, port)) => (Some(host), port),
    };

    let port: u16 = port.parse().map_err(|_| invalid("port is not a number"))?;
    if port == 0 {
        return Err(invalid("port must be greater than 0"));
    }

    let ip = match host {
        None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        Some("") => return Err(invalid("empty host")),
        Some("localhost") => IpAddr::V4(Ipv4Addr::LOCALHOST),
        Some(host) => {
            let host = match host.strip_prefix('[') {
                Some(bracketed) => bracketed
                    .strip_suffix(']')
                    .ok_or_else(|| invalid("unterminated '['"))?,
                None if host.contains(':') => {
                    return Err(invalid("IPv6 hosts must be written in brackets"))
                }
                None => host,
            };
            host.parse::<IpAddr>()
                .map_err(|_| invalid("host is not an IP address or 'localhost'"))?
        }
    };

    Ok(SocketAddr::new(ip, port))
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    ///
    /// # Note
    /// - If the file doesn't exist, returns `ConfigError::ReadError`
    /// - Use `Config::load_or_default()` if you want fallback to defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file, falling back to defaults if not found
    ///
    /// Use this for optional configuration files (e.g., when running without explicit config)
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        Self::load(path)
    }

    /// Resolved listen address
    pub fn listen_address(&self) -> Result<SocketAddr, ConfigError> {
        parse_listen_address(&self.server.listen)
    }

    /// Serialize as YAML with the Jolokia password masked
    pub fn to_redacted_yaml(&self) -> Result<String, ConfigError> {
        let mut redacted = self.clone();
        if redacted.jolokia.password.is_some() {
            redacted.jolokia.password = Some("********".to_string());
        }
        Ok(serde_yaml::to_string(&redacted)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listen_address()?;

        for (name, path) in [
            ("Metrics path", &self.server.metrics_path),
            ("Ready path", &self.server.ready_path),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::ValidationError(format!(
                    "{} must start with '/'",
                    name
                )));
            }
            if path == "/" || path == "/health" {
                return Err(ConfigError::ValidationError(format!(
                    "{} must not be '/' or '/health'",
                    name
                )));
            }
        }
        if self.server.metrics_path == self.server.ready_path {
            return Err(ConfigError::ValidationError(
                "Metrics path and ready path must differ".to_string(),
            ));
        }

        let url = url::Url::parse(&self.jolokia.url).map_err(|e| {
            ConfigError::ValidationError(format!("Invalid Jolokia URL '{}': {}", self.jolokia.url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "Jolokia URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.jolokia.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Jolokia timeout must be greater than 0".to_string(),
            ));
        }

        if !is_valid_namespace(&self.exporter.namespace) {
            return Err(ConfigError::ValidationError(format!(
                "Namespace '{}' is not a valid metric name prefix",
                self.exporter.namespace
            )));
        }
        ObjectNamePattern::parse(&self.exporter.engine_settings().object_pattern())
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        Ok(())
    }
}

fn is_valid_namespace(namespace: &str) -> bool {
    let mut chars = namespace.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.listen, "0.0.0.0:7071");
        assert_eq!(config.server.metrics_path, "/metrics");
        assert_eq!(config.server.ready_path, "/ready");
        assert_eq!(config.server.log_format, LogFormat::Text);
        assert_eq!(config.exporter.domain, "io.crate.monitoring");
        assert_eq!(config.exporter.namespace, "crate");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
server:
  listen: "127.0.0.1:9100"
  log_format: json
jolokia:
  url: "http://crate:8778/jolokia"
  username: monitor
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.listen, "127.0.0.1:9100");
        assert_eq!(config.server.metrics_path, "/metrics");
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.jolokia.username.as_deref(), Some("monitor"));
        assert_eq!(config.jolokia.timeout_ms, 5000);
        assert_eq!(config.exporter, ExporterConfig::default());
    }

    #[test]
    fn test_parse_listen_address() {
        assert_eq!(
            parse_listen_address("7071").unwrap(),
            "0.0.0.0:7071".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            parse_listen_address("localhost:8080").unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            parse_listen_address("192.168.1.10:7071").unwrap(),
            "192.168.1.10:7071".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            parse_listen_address("[::1]:7071").unwrap(),
            "[::1]:7071".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_parse_listen_address_invalid() {
        for listen in ["", "0", "abc", "host:", ":7071", "::1:7071", "[::1:7071", "example.com:80", "70000"] {
            assert!(
                parse_listen_address(listen).is_err(),
                "'{}' should be rejected",
                listen
            );
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.server.listen = "0".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.metrics_path = "metrics".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.ready_path = "/metrics".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.ready_path = "/health".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.jolokia.url = "ftp://crate/jolokia".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.jolokia.timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.exporter.namespace = "1crate".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.exporter.pattern = "type".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_redacted_yaml() {
        let mut config = Config::default();
        config.jolokia.password = Some("secret".to_string());

        let yaml = config.to_redacted_yaml().unwrap();
        assert!(!yaml.contains("secret"));
        assert!(yaml.contains("********"));
        assert!(yaml.contains("0.0.0.0:7071"));
    }

    #[test]
    fn test_engine_settings() {
        let settings = ExporterConfig::default().engine_settings();
        assert_eq!(settings.object_pattern(), "io.crate.monitoring:*");
        assert_eq!(settings.namespace, "crate");
    }
}
