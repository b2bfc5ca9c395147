//! `_redirects` file parsing.
//!
//! One rule per line:
//! ```text
//! <from> [<key>=<value> ...] <to> [<status>[!]] [<Condition>=<value> ...]
//! ```
//! - `#` starts a comment, blank lines are skipped
//! - `from` is a path or an absolute URL (whose origin is recorded)
//! - `to` is the first token after `from` that starts with `/` or is an
//!   absolute URL; tokens before it are required query parameters
//! - status defaults to 301; a trailing `!` forces the rule
//! - trailing condition tokens are accepted and ignored

use std::collections::BTreeMap;

use axum::http::StatusCode;
use url::Url;

use crate::config::loader::SyntaxError;
use crate::routing::redirects::RedirectRule;

/// Status used when a rule names none.
pub const DEFAULT_STATUS: u16 = 301;

/// Parse the contents of a `_redirects` file.
pub fn parse_redirects(text: &str) -> Result<Vec<RedirectRule>, SyntaxError> {
    let mut rules = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let rule = parse_line(line).map_err(|message| SyntaxError {
            line: index + 1,
            message,
        })?;
        rules.extend(rule);
    }
    Ok(rules)
}

fn parse_line(line: &str) -> Result<Option<RedirectRule>, String> {
    let tokens: Vec<&str> = line
        .split_whitespace()
        .take_while(|token| !token.starts_with('#'))
        .collect();
    let Some((from, rest)) = tokens.split_first() else {
        return Ok(None);
    };

    let to_index = rest
        .iter()
        .position(|token| is_destination(token))
        .ok_or_else(|| format!("missing destination for {}", from))?;

    let mut query = BTreeMap::new();
    for token in &rest[..to_index] {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| format!("invalid query parameter: {}", token))?;
        query.insert(key.to_string(), value.to_string());
    }

    let to = rest[to_index];
    let mut status = DEFAULT_STATUS;
    let mut force = false;
    for (position, &token) in rest[to_index + 1..].iter().enumerate() {
        if position == 0 && token.starts_with(|c: char| c.is_ascii_digit()) {
            let digits = token.strip_suffix('!').unwrap_or(token);
            force = digits.len() != token.len();
            status = digits
                .parse()
                .map_err(|_| format!("invalid status: {}", token))?;
        } else if !token.contains('=') {
            return Err(format!("unexpected token: {}", token));
        }
    }

    build_rule(from, to, status, force, query).map(Some)
}

/// Build a rule, splitting an absolute `from` into origin and path.
pub(crate) fn build_rule(
    from: &str,
    to: &str,
    status: u16,
    force: bool,
    query: BTreeMap<String, String>,
) -> Result<RedirectRule, String> {
    let (origin, path) = parse_source(from)?;
    let status = StatusCode::from_u16(status)
        .ok()
        .filter(|s| (100..600).contains(&s.as_u16()))
        .ok_or_else(|| format!("invalid status: {}", status))?;

    Ok(RedirectRule {
        origin,
        path,
        query,
        to: to.to_string(),
        status,
        force,
    })
}

fn parse_source(from: &str) -> Result<(Option<String>, String), String> {
    if from.starts_with('/') {
        return Ok((None, from.to_string()));
    }
    let url = Url::parse(from).map_err(|_| format!("invalid source: {}", from))?;
    let host = url
        .host_str()
        .ok_or_else(|| format!("invalid source: {}", from))?;
    let origin = match url.port() {
        Some(port) => format!("{}://{}:{}/", url.scheme(), host, port),
        None => format!("{}://{}/", url.scheme(), host),
    };
    Ok((Some(origin), url.path().to_string()))
}

fn is_destination(token: &str) -> bool {
    token.starts_with('/') || token.starts_with("http://") || token.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_rules() {
        let rules = parse_redirects(
            "# moved pages\n\
             /old /new\n\
             \n\
             /docs/latest /docs/v2/ 302!   # pin\n",
        )
        .unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0], RedirectRule::new("/old", "/new", StatusCode::MOVED_PERMANENTLY, false));
        assert_eq!(rules[1], RedirectRule::new("/docs/latest", "/docs/v2/", StatusCode::FOUND, true));
    }

    #[test]
    fn test_query_and_conditions() {
        let rules = parse_redirects("/store id=42 lang=en /products/42 301 Country=us").unwrap();
        let expected = RedirectRule::new("/store", "/products/42", StatusCode::MOVED_PERMANENTLY, false)
            .with_query("id", "42")
            .with_query("lang", "en");
        assert_eq!(rules, vec![expected]);
    }

    #[test]
    fn test_absolute_source_records_origin() {
        let rules = parse_redirects(
            "https://datawire.io/ https://www.getambassador.io/?utm_source=https://www.datawire.io/ 301!",
        )
        .unwrap();
        assert_eq!(rules[0].origin.as_deref(), Some("https://datawire.io/"));
        assert_eq!(rules[0].path, "/");
        assert!(rules[0].force);

        let rules = parse_redirects("http://localhost:8888/a /b").unwrap();
        assert_eq!(rules[0].origin.as_deref(), Some("http://localhost:8888/"));
        assert_eq!(rules[0].path, "/a");
    }

    #[test]
    fn test_errors_name_the_line() {
        let err = parse_redirects("/ok /fine\n/broken\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("missing destination"));

        assert!(parse_redirects("/a /b 30x").is_err());
        assert!(parse_redirects("/a /b 1200").is_err());
        assert!(parse_redirects("/a /b 301 junk").is_err());
        assert!(parse_redirects("/a notaquery /b").is_err());
    }
}
