//! Header rule index.
//!
//! Maps path patterns to response headers applied on successful file serves.
//! Built once at startup from every header source in order; a later source's
//! block for an identical pattern replaces the earlier block in place.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::routing::matcher::PathPattern;

/// Headers attached to every path matching one pattern.
#[derive(Debug, Clone)]
pub struct HeaderRule {
    pattern: PathPattern,
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl HeaderRule {
    /// Build a rule from textual header pairs.
    ///
    /// Pairs that are not valid HTTP header names or values are dropped with
    /// a warning.
    pub fn from_pairs<I, K, V>(pattern: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut headers = Vec::new();
        for (name, value) in pairs {
            let (name, value) = (name.as_ref(), value.as_ref());
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => headers.push((name, value)),
                _ => tracing::warn!(
                    pattern = %pattern,
                    header = %name,
                    "Skipping invalid header rule"
                ),
            }
        }
        Self {
            pattern: PathPattern::new(pattern),
            headers,
        }
    }

    /// The pattern this rule applies to.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Headers in declaration order.
    pub fn headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.headers
    }
}

/// Pattern-keyed overlay of response headers.
#[derive(Debug, Clone, Default)]
pub struct HeaderRuleIndex {
    rules: Vec<HeaderRule>,
}

impl HeaderRuleIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule. A rule for an already indexed pattern takes that
    /// pattern's place and replaces its headers.
    pub fn insert(&mut self, rule: HeaderRule) {
        match self.rules.iter_mut().find(|r| r.pattern() == rule.pattern()) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    /// Merged headers for `path`; later rules win on name collisions.
    pub fn headers_for(&self, path: &str) -> HeaderMap {
        let mut merged = HeaderMap::new();
        for rule in self.rules.iter().filter(|r| r.pattern.matches(path)) {
            for (name, value) in &rule.headers {
                merged.insert(name.clone(), value.clone());
            }
        }
        merged
    }

    /// Number of indexed patterns.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no pattern is indexed.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Extend<HeaderRule> for HeaderRuleIndex {
    fn extend<T: IntoIterator<Item = HeaderRule>>(&mut self, iter: T) {
        for rule in iter {
            self.insert(rule);
        }
    }
}

impl FromIterator<HeaderRule> for HeaderRuleIndex {
    fn from_iter<T: IntoIterator<Item = HeaderRule>>(iter: T) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::CACHE_CONTROL;

    #[test]
    fn test_more_specific_later_rule_wins() {
        let index: HeaderRuleIndex = [
            HeaderRule::from_pairs("/blog/*", [("Cache-Control", "public"), ("X-Section", "blog")]),
            HeaderRule::from_pairs("/blog/2020/*", [("Cache-Control", "no-store")]),
        ]
        .into_iter()
        .collect();

        let headers = index.headers_for("/blog/2020/post");
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "no-store");
        assert_eq!(headers.get("x-section").unwrap(), "blog");

        let headers = index.headers_for("/blog/2021/post");
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "public");
    }

    #[test]
    fn test_no_match_is_empty() {
        let index: HeaderRuleIndex =
            [HeaderRule::from_pairs("/blog/*", [("X-Frame-Options", "DENY")])].into_iter().collect();
        assert!(index.headers_for("/docs/").is_empty());
    }

    #[test]
    fn test_same_pattern_replaced_in_place() {
        let mut index = HeaderRuleIndex::new();
        index.insert(HeaderRule::from_pairs("/*", [("X-A", "1"), ("X-B", "1")]));
        index.insert(HeaderRule::from_pairs("/docs/*", [("X-A", "docs")]));
        index.insert(HeaderRule::from_pairs("/*", [("X-A", "2")]));

        assert_eq!(index.len(), 2);
        let headers = index.headers_for("/docs/page");
        // The replaced `/*` block keeps its earlier position.
        assert_eq!(headers.get("x-a").unwrap(), "docs");
        assert!(headers.get("x-b").is_none());
    }

    #[test]
    fn test_invalid_pairs_dropped() {
        let rule = HeaderRule::from_pairs("/*", [("Bad Header", "x"), ("X-Ok", "y")]);
        assert_eq!(rule.headers().len(), 1);
    }
}
