//! Request resolution.
//!
//! # States
//! ```text
//! ValidateURL ──bad──▶ BadRequest
//!     │
//!     ▼
//! ForcefulRedirectCheck ──match──▶ Redirect(rule status)
//!     │
//!     ▼
//! ResolveContent ──ok──▶ File (200 + header overlay)
//!     │ failed
//!     ├─ directory, no trailing `/` ──▶ Redirect(302, path + `/`)
//!     ├─ `.html` and stripped path exists ──▶ Redirect(302, path - `.html`)
//!     ├─ FallbackRedirectCheck ──match──▶ Redirect(rule status)
//!     └─ NotFound (404.html)
//! ```
//!
//! # Design Decisions
//! - Immutable after construction; shared by `Arc` across request tasks
//! - Resolution is separate from response emission so it can be tested
//!   without a socket

use std::path::{Path, PathBuf};

use axum::http::{HeaderMap, StatusCode, Uri};
use bytes::Bytes;
use thiserror::Error;

use crate::content::resolve::{candidate_path, strip_html_extension};
use crate::content::store::{ContentError, ContentStore};
use crate::http::request::{MalformedTarget, RequestTarget};
use crate::routing::headers::HeaderRuleIndex;
use crate::routing::redirects::RedirectRuleSet;

/// Page served with every 404, relative to the served directory.
pub const NOT_FOUND_PAGE: &str = "404.html";

/// Why a redirect was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// A `force = true` rule matched before content lookup.
    Forced,
    /// A directory was requested without its trailing slash.
    DirectorySlash,
    /// `/page.html` was requested and `/page` exists.
    PrettyUrl,
    /// A rule matched after content lookup failed.
    Fallback,
}

impl RedirectKind {
    /// Short label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectKind::Forced => "forced_redirect",
            RedirectKind::DirectorySlash => "directory_redirect",
            RedirectKind::PrettyUrl => "pretty_url_redirect",
            RedirectKind::Fallback => "fallback_redirect",
        }
    }
}

/// Final state reached for a request.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The target was not origin-relative.
    BadRequest(MalformedTarget),
    /// Send the client elsewhere.
    Redirect {
        kind: RedirectKind,
        status: StatusCode,
        location: String,
    },
    /// Serve a file.
    File {
        path: PathBuf,
        content: Bytes,
        headers: HeaderMap,
    },
    /// Nothing to serve; `body` is the site's 404 page.
    NotFound { body: Bytes },
}

impl Resolution {
    /// Short label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Resolution::BadRequest(_) => "bad_request",
            Resolution::Redirect { kind, .. } => kind.as_str(),
            Resolution::File { .. } => "served",
            Resolution::NotFound { .. } => "not_found",
        }
    }
}

/// Request resolution failed with no response defined for it.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("404 page unavailable: {0}")]
    MissingNotFoundPage(#[source] ContentError),
}

/// Resolves requests against one served directory and its rules.
#[derive(Debug)]
pub struct SiteRouter {
    root: PathBuf,
    redirects: RedirectRuleSet,
    headers: HeaderRuleIndex,
    content: ContentStore,
}

impl SiteRouter {
    /// Create a router. `root` must be the absolute path the content store
    /// was populated from.
    pub fn new(
        root: impl Into<PathBuf>,
        redirects: RedirectRuleSet,
        headers: HeaderRuleIndex,
        content: ContentStore,
    ) -> Self {
        Self {
            root: root.into(),
            redirects,
            headers,
            content,
        }
    }

    /// Served directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Redirect rules in effect.
    pub fn redirects(&self) -> &RedirectRuleSet {
        &self.redirects
    }

    /// Header rules in effect.
    pub fn headers(&self) -> &HeaderRuleIndex {
        &self.headers
    }

    /// Warm content snapshot.
    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    /// Resolve a request URI.
    pub async fn route(&self, uri: &Uri) -> Result<Resolution, RouteError> {
        match RequestTarget::from_uri(uri) {
            Ok(target) => self.route_target(&target).await,
            Err(e) => Ok(Resolution::BadRequest(e)),
        }
    }

    /// Resolve an already validated request target.
    pub async fn route_target(&self, target: &RequestTarget) -> Result<Resolution, RouteError> {
        if let Some(rule) = self.redirects.find(target, true) {
            return Ok(Resolution::Redirect {
                kind: RedirectKind::Forced,
                status: rule.status,
                location: rule.location_for(target),
            });
        }

        let pathname = target.pathname();
        let file_path = candidate_path(&self.root, pathname);

        let err = match self.content.get(&file_path).await {
            Ok(content) => {
                return Ok(Resolution::File {
                    headers: self.headers.headers_for(pathname),
                    path: file_path,
                    content,
                });
            }
            Err(e) => e,
        };
        tracing::trace!(path = %file_path.display(), error = %err, "Content lookup failed");

        if matches!(err, ContentError::IsDirectory(_)) && !pathname.ends_with('/') {
            return Ok(Resolution::Redirect {
                kind: RedirectKind::DirectorySlash,
                status: StatusCode::FOUND,
                location: format!("{}/{}", pathname, target.search()),
            });
        }

        if let Some(stripped_pathname) = pathname.strip_suffix(".html") {
            if let Some(stripped) = strip_html_extension(&file_path) {
                if self.content.exists(&stripped).await {
                    return Ok(Resolution::Redirect {
                        kind: RedirectKind::PrettyUrl,
                        status: StatusCode::FOUND,
                        location: format!("{}{}", stripped_pathname, target.search()),
                    });
                }
            }
        }

        if let Some(rule) = self.redirects.find(target, false) {
            return Ok(Resolution::Redirect {
                kind: RedirectKind::Fallback,
                status: rule.status,
                location: rule.location_for(target),
            });
        }

        let body = self
            .content
            .get(&self.root.join(NOT_FOUND_PAGE))
            .await
            .map_err(RouteError::MissingNotFoundPage)?;
        Ok(Resolution::NotFound { body })
    }
}
