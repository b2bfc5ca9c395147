//! Request target handling.
//!
//! # Responsibilities
//! - Reject request targets that are not origin-relative
//! - Resolve the target against `/` (dot segments removed)
//! - Expose the pathname, query string and decoded query parameters
//!
//! # Design Decisions
//! - The pathname stays percent-encoded; only filesystem lookup decodes it
//! - A rejected target ends request processing

use thiserror::Error;
use url::Url;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Base every request target is resolved against.
const RESOLVE_BASE: &str = "http://localhost/";

/// The request target could not be treated as a local path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedTarget {
    /// The target names a scheme, e.g. `http://example.com/`.
    #[error("request target carries a scheme: {0}")]
    Scheme(String),
    /// The target names a host, e.g. `//example.com/`.
    #[error("request target carries a host: {0}")]
    Authority(String),
    /// The target did not resolve to a URL at all.
    #[error("request target is not a valid URL: {0}")]
    Invalid(String),
}

/// An origin-relative request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    pathname: String,
    query: Option<String>,
    bare: bool,
}

impl RequestTarget {
    /// Parse a raw request target such as `/docs/?lang=en`.
    pub fn parse(raw: &str) -> Result<Self, MalformedTarget> {
        // `\` counts as `/` when resolving, so `/\host` names a host too.
        let leading: Vec<char> = raw.chars().take(2).collect();
        if leading.len() == 2 && leading.iter().all(|c| matches!(c, '/' | '\\')) {
            return Err(MalformedTarget::Authority(raw.to_string()));
        }
        if Url::parse(raw).is_ok() {
            return Err(MalformedTarget::Scheme(raw.to_string()));
        }

        let base = Url::parse(RESOLVE_BASE).map_err(|e| MalformedTarget::Invalid(e.to_string()))?;
        let resolved = base
            .join(raw)
            .map_err(|_| MalformedTarget::Invalid(raw.to_string()))?;
        if resolved.host_str() != base.host_str() {
            return Err(MalformedTarget::Authority(raw.to_string()));
        }

        let bare = resolved.path() == "/" && resolved.query().is_none() && resolved.fragment().is_none();
        Ok(Self {
            pathname: resolved.path().to_string(),
            query: resolved.query().map(str::to_string),
            bare,
        })
    }

    /// Build a target from an [`axum::http::Uri`] as received by the server.
    pub fn from_uri(uri: &axum::http::Uri) -> Result<Self, MalformedTarget> {
        if let Some(scheme) = uri.scheme_str() {
            return Err(MalformedTarget::Scheme(scheme.to_string()));
        }
        if let Some(authority) = uri.authority() {
            return Err(MalformedTarget::Authority(authority.to_string()));
        }
        match uri.path_and_query() {
            Some(pq) => Self::parse(pq.as_str()),
            None => Self::parse("/"),
        }
    }

    /// Resolved path, still percent-encoded.
    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    /// Raw query string without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// `?` plus the query string, or empty when the target had no query.
    pub fn search(&self) -> String {
        match &self.query {
            Some(q) => format!("?{}", q),
            None => String::new(),
        }
    }

    /// First value of a query parameter, form-decoded.
    pub fn query_param(&self, key: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Returns true for a request of exactly `/`, nothing else attached.
    pub fn is_bare_root(&self) -> bool {
        self.bare
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_relative_targets() {
        let t = RequestTarget::parse("/docs/intro?lang=en&x=1").unwrap();
        assert_eq!(t.pathname(), "/docs/intro");
        assert_eq!(t.query(), Some("lang=en&x=1"));
        assert_eq!(t.search(), "?lang=en&x=1");
        assert_eq!(t.query_param("lang").as_deref(), Some("en"));
        assert_eq!(t.query_param("missing"), None);
        assert!(!t.is_bare_root());

        let root = RequestTarget::parse("/").unwrap();
        assert!(root.is_bare_root());
        assert_eq!(root.search(), "");
    }

    #[test]
    fn test_dot_segments_removed() {
        let t = RequestTarget::parse("/docs/../blog/./post").unwrap();
        assert_eq!(t.pathname(), "/blog/post");

        let t = RequestTarget::parse("/../../etc/passwd").unwrap();
        assert_eq!(t.pathname(), "/etc/passwd");
    }

    #[test]
    fn test_absolute_targets_rejected() {
        assert!(matches!(
            RequestTarget::parse("http://example.com/"),
            Err(MalformedTarget::Scheme(_))
        ));
        assert!(matches!(
            RequestTarget::parse("//example.com/path"),
            Err(MalformedTarget::Authority(_))
        ));
        assert!(matches!(
            RequestTarget::parse("mailto:someone@example.com"),
            Err(MalformedTarget::Scheme(_))
        ));
    }

    #[test]
    fn test_backslash_authority_rejected() {
        for raw in ["/\\evil.com/x", "\\/evil.com/x", "\\\\evil.com/x"] {
            assert!(
                matches!(RequestTarget::parse(raw), Err(MalformedTarget::Authority(_))),
                "{raw} should be rejected"
            );
        }

        let uri: axum::http::Uri = "/\\evil.com/x".parse().unwrap();
        assert!(RequestTarget::from_uri(&uri).is_err());

        // A backslash later in the path is only a separator.
        let t = RequestTarget::parse("/docs\\intro").unwrap();
        assert_eq!(t.pathname(), "/docs/intro");
    }

    #[test]
    fn test_from_uri_rejects_absolute_form() {
        let uri: axum::http::Uri = "http://example.com/docs".parse().unwrap();
        assert!(RequestTarget::from_uri(&uri).is_err());

        let uri: axum::http::Uri = "/docs?a=b".parse().unwrap();
        let t = RequestTarget::from_uri(&uri).unwrap();
        assert_eq!(t.pathname(), "/docs");
        assert_eq!(t.query(), Some("a=b"));
    }
}
