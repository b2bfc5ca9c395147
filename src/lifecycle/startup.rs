//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Load redirect and header rules
//! - Populate the content store
//! - Bind the listener and announce readiness
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, there is no degraded mode
//! - Everything a request reads is built before the listener exists, so no
//!   request can observe a partial rule set or a half-filled store

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::loader::{load_header_rules, load_redirect_rules, load_site_config};
use crate::config::{validate_config, ConfigError, DevServerConfig, ValidationError};
use crate::content::{ContentError, ContentStore};
use crate::observability::metrics;
use crate::routing::SiteRouter;

/// Error type for startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("failed to load redirect rules: {0}")]
    RedirectConfig(#[source] ConfigError),

    #[error("failed to load header rules: {0}")]
    HeaderConfig(#[source] ConfigError),

    #[error("failed to resolve served directory {}: {source}", path.display())]
    ServedDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to scan served directory: {0}")]
    ContentScan(#[source] ContentError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the immutable routing state for `config`.
pub async fn build_site(config: &DevServerConfig) -> Result<SiteRouter, StartupError> {
    validate_config(config).map_err(StartupError::Validation)?;

    let site = load_site_config(&config.site_config).map_err(StartupError::RedirectConfig)?;
    let redirects = load_redirect_rules(&config.redirects_file(), &config.site_config, &site)
        .map_err(StartupError::RedirectConfig)?;
    let headers = load_header_rules(&config.header_files(), &site).map_err(StartupError::HeaderConfig)?;
    tracing::info!(
        redirect_rules = redirects.len(),
        header_rules = headers.len(),
        "Rules loaded"
    );

    let root = std::fs::canonicalize(&config.served_dir).map_err(|source| StartupError::ServedDir {
        path: config.served_dir.clone(),
        source,
    })?;
    let content = ContentStore::populate(&root)
        .await
        .map_err(StartupError::ContentScan)?;
    metrics::record_content_store(content.len(), content.failed_count());
    tracing::info!(
        files = content.len(),
        failed = content.failed_count(),
        "Content loaded into memory"
    );

    Ok(SiteRouter::new(root, redirects, headers, content))
}

/// Bind the configured host and port.
pub async fn bind(config: &DevServerConfig) -> Result<TcpListener, StartupError> {
    TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|source| StartupError::Bind {
            address: format!("{}:{}", config.host, config.port),
            source,
        })
}

/// Human-readable ready banner.
pub fn ready_banner(config: &DevServerConfig, local_addr: SocketAddr) -> String {
    let address = DevServerConfig {
        port: local_addr.port(),
        ..config.clone()
    }
    .public_url();
    format!(
        "----\n\n  Serving\n    directory {}\n    with config {}\n    at address {}\n\n----",
        config.served_dir.display(),
        config.site_config.display(),
        address
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_site_loads_everything() {
        let dir = tempfile::tempdir().unwrap();
        let served = dir.path().join("public");
        std::fs::create_dir(&served).unwrap();
        std::fs::write(served.join("index.html"), "home").unwrap();
        std::fs::write(served.join("_redirects"), "/old /new 302!\n").unwrap();
        std::fs::write(served.join("_headers"), "/*\n  X-Site: yes\n").unwrap();

        let config = DevServerConfig {
            served_dir: served.clone(),
            site_config: dir.path().join("netlify.toml"),
            ..Default::default()
        };
        let site = build_site(&config).await.unwrap();

        assert_eq!(site.redirects().len(), 1);
        assert_eq!(site.headers().len(), 1);
        // index.html, _redirects and _headers are all plain files.
        assert_eq!(site.content().len(), 3);
    }

    #[tokio::test]
    async fn test_malformed_redirects_abort_startup() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("_redirects"), "/no-destination\n").unwrap();

        let config = DevServerConfig {
            served_dir: dir.path().to_path_buf(),
            site_config: dir.path().join("netlify.toml"),
            ..Default::default()
        };
        assert!(matches!(
            build_site(&config).await,
            Err(StartupError::RedirectConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_config_aborts_startup() {
        let config = DevServerConfig {
            served_dir: PathBuf::from("/definitely/not/here"),
            ..Default::default()
        };
        let err = build_site(&config).await.unwrap_err();
        assert!(err.to_string().contains("served directory does not exist"));
    }

    #[test]
    fn test_ready_banner() {
        let config = DevServerConfig::default();
        let banner = ready_banner(&config, "127.0.0.1:9000".parse().unwrap());
        assert!(banner.contains("directory public"));
        assert!(banner.contains("with config netlify.toml"));
        assert!(banner.contains("at address http://localhost:9000/"));
    }
}
