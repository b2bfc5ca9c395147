//! Rule loading from disk.
//!
//! Reads the platform config file, the `_redirects` file and the `_headers`
//! files. A missing file contributes nothing; any other read or parse
//! failure is returned to the caller.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::headers_file::parse_headers;
use crate::config::redirects_file::parse_redirects;
use crate::config::site_toml::SiteConfig;
use crate::routing::headers::{HeaderRule, HeaderRuleIndex};
use crate::routing::redirects::RedirectRuleSet;

/// A malformed line in a rule file.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{}: {source}", path.display())]
    Syntax {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    #[error("{}: {message}", path.display())]
    InvalidRule { path: PathBuf, message: String },
}

/// Load the platform config file; a missing file yields an empty config.
pub fn load_site_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let Some(content) = read_optional(path)? else {
        tracing::debug!(path = %path.display(), "No site config file");
        return Ok(SiteConfig::default());
    };
    toml::from_str(&content).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Load redirect rules: the `_redirects` file first, then the site config's
/// `[[redirects]]` tables.
pub fn load_redirect_rules(
    redirects_file: &Path,
    site_config_path: &Path,
    site: &SiteConfig,
) -> Result<RedirectRuleSet, ConfigError> {
    let mut rules = match read_optional(redirects_file)? {
        Some(content) => parse_redirects(&content).map_err(|source| ConfigError::Syntax {
            path: redirects_file.to_path_buf(),
            source,
        })?,
        None => Vec::new(),
    };

    let configured = site.redirect_rules().map_err(|message| ConfigError::InvalidRule {
        path: site_config_path.to_path_buf(),
        message,
    })?;
    rules.extend(configured);

    Ok(RedirectRuleSet::new(rules))
}

/// Load header rules: the site config's `[[headers]]` tables, then each
/// header file in order. Later sources win for identical patterns.
pub fn load_header_rules(
    header_files: &[PathBuf],
    site: &SiteConfig,
) -> Result<HeaderRuleIndex, ConfigError> {
    let mut index: HeaderRuleIndex = site
        .header_blocks()
        .iter()
        .map(|block| HeaderRule::from_pairs(&block.path, block.values.iter().cloned()))
        .collect();

    for file in header_files {
        let Some(content) = read_optional(file)? else {
            continue;
        };
        let blocks = parse_headers(&content).map_err(|source| ConfigError::Syntax {
            path: file.clone(),
            source,
        })?;
        index.extend(
            blocks
                .into_iter()
                .map(|block| HeaderRule::from_pairs(&block.path, block.values)),
        );
    }

    Ok(index)
}

fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
