//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the served directory exists and is a directory
//! - Validate addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DevServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before any rule file or content is loaded

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::schema::DevServerConfig;
use crate::routing::router::NOT_FOUND_PAGE;

/// A single semantic problem with the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("host must not be empty")]
    EmptyHost,

    #[error("served directory does not exist: {}", .0.display())]
    MissingServedDir(PathBuf),

    #[error("served path is not a directory: {}", .0.display())]
    ServedDirNotADirectory(PathBuf),

    #[error("invalid metrics address: {0}")]
    InvalidMetricsAddress(String),
}

/// Check `config`, collecting every problem found.
pub fn validate_config(config: &DevServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }

    match std::fs::metadata(&config.served_dir) {
        Ok(metadata) if metadata.is_dir() => {
            let not_found_page = config.served_dir.join(NOT_FOUND_PAGE);
            if !not_found_page.is_file() {
                tracing::warn!(
                    path = %not_found_page.display(),
                    "No 404 page; requests that miss will fail"
                );
            }
        }
        Ok(_) => errors.push(ValidationError::ServedDirNotADirectory(config.served_dir.clone())),
        Err(_) => errors.push(ValidationError::MissingServedDir(config.served_dir.clone())),
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidMetricsAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
