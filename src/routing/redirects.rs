//! Redirect rule set.
//!
//! # Responsibilities
//! - Hold the ordered redirect rules parsed at startup
//! - Match a request against the rules in one of two passes
//! - Build the `Location` value for a matched rule
//!
//! # Design Decisions
//! - Rules are evaluated in declaration order; first match wins per pass
//! - The forceful pass only sees `force = true` rules and runs before any
//!   file lookup; the fallback pass sees every rule and runs after the file
//!   lookup failed
//! - Path matching is literal: the rule path equals the request path, or the
//!   request path with a trailing `/` appended
//! - Extra query parameters on the request never prevent a match

use std::collections::BTreeMap;

use axum::http::StatusCode;

use crate::http::request::RequestTarget;

/// Origins of the legacy domain whose root now permanently redirects to the
/// new site.
const LEGACY_ORIGINS: &[&str] = &[
    "http://www.datawire.io/",
    "https://www.datawire.io/",
    "http://datawire.io/",
    "https://datawire.io/",
];

/// Destination of the legacy-domain migration redirect.
const MIGRATION_DESTINATION: &str = "https://www.getambassador.io/?utm_source=https://www.datawire.io/";

/// A single redirect rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRule {
    /// Origin of an absolute `from`, e.g. `https://example.com/`.
    pub origin: Option<String>,
    /// Path the rule applies to.
    pub path: String,
    /// Query parameters that must be present with these exact values.
    pub query: BTreeMap<String, String>,
    /// Destination, absolute or relative.
    pub to: String,
    /// Status code of the redirect response.
    pub status: StatusCode,
    /// Whether the rule shadows existing files.
    pub force: bool,
}

impl RedirectRule {
    /// Create a rule with no origin and no query constraints.
    pub fn new(path: impl Into<String>, to: impl Into<String>, status: StatusCode, force: bool) -> Self {
        Self {
            origin: None,
            path: path.into(),
            query: BTreeMap::new(),
            to: to.into(),
            status,
            force,
        }
    }

    /// Set the origin of the rule.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Require a query parameter to carry the given value.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Returns true if this rule applies to the request in the given pass.
    pub fn matches(&self, target: &RequestTarget, forceful_only: bool) -> bool {
        if forceful_only && !self.force {
            return false;
        }
        if self.is_legacy_root_migration(target) {
            return false;
        }
        if !self.matches_path(target.pathname()) {
            return false;
        }
        self.matches_query(target)
    }

    /// Location header value for a redirect issued by this rule.
    ///
    /// The request query string is carried over unless `to` has its own.
    pub fn location_for(&self, target: &RequestTarget) -> String {
        if has_query(&self.to) {
            self.to.clone()
        } else {
            format!("{}{}", self.to, target.search())
        }
    }

    // Keeps the new site's root servable locally even though the live rules
    // send the old domain's root to it.
    fn is_legacy_root_migration(&self, target: &RequestTarget) -> bool {
        if !target.is_bare_root() || self.to != MIGRATION_DESTINATION {
            return false;
        }
        self.origin
            .as_deref()
            .map(|origin| LEGACY_ORIGINS.iter().any(|legacy| same_origin(legacy, origin)))
            .unwrap_or(false)
    }

    fn matches_path(&self, pathname: &str) -> bool {
        if self.path == pathname {
            return true;
        }
        self.path.len() == pathname.len() + 1
            && self.path.starts_with(pathname)
            && self.path.ends_with('/')
    }

    fn matches_query(&self, target: &RequestTarget) -> bool {
        self.query
            .iter()
            .all(|(key, value)| target.query_param(key).as_deref() == Some(value.as_str()))
    }
}

/// Ordered, immutable collection of redirect rules.
#[derive(Debug, Clone, Default)]
pub struct RedirectRuleSet {
    rules: Vec<RedirectRule>,
}

impl RedirectRuleSet {
    /// Build a rule set; `rules` must be in declaration order.
    pub fn new(rules: Vec<RedirectRule>) -> Self {
        Self { rules }
    }

    /// Find the first rule matching the request in the given pass.
    pub fn find(&self, target: &RequestTarget, forceful_only: bool) -> Option<&RedirectRule> {
        self.rules.iter().find(|rule| rule.matches(target, forceful_only))
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over the rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &RedirectRule> {
        self.rules.iter()
    }
}

fn has_query(location: &str) -> bool {
    location
        .split('#')
        .next()
        .map(|before_fragment| before_fragment.contains('?'))
        .unwrap_or(false)
}

fn same_origin(a: &str, b: &str) -> bool {
    a.trim_end_matches('/').eq_ignore_ascii_case(b.trim_end_matches('/'))
}
