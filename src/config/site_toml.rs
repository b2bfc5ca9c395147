//! Platform config file (`netlify.toml`) schema.
//!
//! Only the `[[redirects]]` and `[[headers]]` tables are read; every other
//! table in the file is ignored.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::config::headers_file::HeaderBlock;
use crate::config::redirects_file::{build_rule, DEFAULT_STATUS};
use crate::routing::redirects::RedirectRule;

/// The parts of the platform config the preview server understands.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub redirects: Vec<RedirectEntry>,
    pub headers: Vec<HeaderEntry>,
}

/// A `[[redirects]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct RedirectEntry {
    pub from: String,
    pub to: String,
    #[serde(default = "default_status")]
    pub status: u16,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub query: BTreeMap<String, String>,
}

/// A `[[headers]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct HeaderEntry {
    #[serde(rename = "for")]
    pub path: String,
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

fn default_status() -> u16 {
    DEFAULT_STATUS
}

impl SiteConfig {
    /// Redirect rules in declaration order.
    ///
    /// The error names the position of the offending table.
    pub fn redirect_rules(&self) -> Result<Vec<RedirectRule>, String> {
        self.redirects
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                build_rule(&entry.from, &entry.to, entry.status, entry.force, entry.query.clone())
                    .map_err(|message| format!("redirects[{}]: {}", index, message))
            })
            .collect()
    }

    /// Header blocks in declaration order.
    pub fn header_blocks(&self) -> Vec<HeaderBlock> {
        self.headers
            .iter()
            .map(|entry| HeaderBlock {
                path: entry.path.clone(),
                values: entry
                    .values
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            })
            .collect()
    }
}
