//! Configuration schema definitions.
//!
//! This module defines the options the preview server runs with.
//! All types deserialize with Serde and every field has a default, so a partial
//! configuration is always complete.

use std::path::PathBuf;

use serde::Deserialize;

/// Root configuration for the preview server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DevServerConfig {
    /// Hostname to listen on.
    pub host: String,

    /// Port to listen on.
    pub port: u16,

    /// Directory whose files are served.
    pub served_dir: PathBuf,

    /// Platform config file holding `[[redirects]]` and `[[headers]]`.
    pub site_config: PathBuf,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9000,
            served_dir: PathBuf::from("public"),
            site_config: PathBuf::from("netlify.toml"),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl DevServerConfig {
    /// Redirect rules file inside the served directory.
    pub fn redirects_file(&self) -> PathBuf {
        self.served_dir.join("_redirects")
    }

    /// Header rule files, lowest precedence first.
    pub fn header_files(&self) -> Vec<PathBuf> {
        vec![PathBuf::from("_headers"), self.served_dir.join("_headers")]
    }

    /// Address shown in the ready banner.
    pub fn public_url(&self) -> String {
        if self.host.contains(':') {
            format!("http://[{}]:{}/", self.host, self.port)
        } else {
            format!("http://{}:{}/", self.host, self.port)
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Prometheus scrape endpoint bind address; disabled when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DevServerConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 9000);
        assert_eq!(config.redirects_file(), PathBuf::from("public/_redirects"));
        assert_eq!(
            config.header_files(),
            vec![PathBuf::from("_headers"), PathBuf::from("public/_headers")]
        );
        assert_eq!(config.public_url(), "http://localhost:9000/");
    }

    #[test]
    fn test_partial_config_filled_with_defaults() {
        let config: DevServerConfig = toml::from_str("port = 8000\n[observability]\nlog_level = \"debug\"").unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.host, "localhost");
        assert_eq!(config.observability.log_level, "debug");
        assert!(config.observability.metrics_address.is_none());
    }
}
