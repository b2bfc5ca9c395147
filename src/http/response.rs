//! Response construction.
//!
//! # Responsibilities
//! - Turn a [`Resolution`] into the HTTP response sent to the client
//! - Map unrecoverable routing errors to 500
//!
//! # Design Decisions
//! - Header rules are applied before `Content-Type`, so the inferred type
//!   always wins
//! - Files with no inferable type are HTML unless a header rule says otherwise
//! - Redirect bodies are plain text naming the destination
//! - Non-ASCII bytes in a `Location` are percent-encoded

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use percent_encoding::{utf8_percent_encode, CONTROLS};

use crate::routing::router::{Resolution, RouteError};

impl IntoResponse for Resolution {
    fn into_response(self) -> Response {
        match self {
            Resolution::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad request URL").into_response(),
            Resolution::Redirect { status, location, .. } => redirect(status, &location),
            Resolution::File { path, content, headers } => {
                let mut response = Response::new(Body::from(content));
                response.headers_mut().extend(headers);
                match mime_guess::from_path(&path).first() {
                    Some(mime) => {
                        if let Ok(content_type) = HeaderValue::from_str(mime.as_ref()) {
                            response.headers_mut().insert(header::CONTENT_TYPE, content_type);
                        }
                    }
                    // Extensionless pages behind pretty URLs.
                    None => {
                        if !response.headers().contains_key(header::CONTENT_TYPE) {
                            response
                                .headers_mut()
                                .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
                        }
                    }
                }
                response
            }
            Resolution::NotFound { body } => (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "text/html")],
                body,
            )
                .into_response(),
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

/// A redirect to `location` with a plain-text body.
pub fn redirect(status: StatusCode, location: &str) -> Response {
    let location = utf8_percent_encode(location, CONTROLS).to_string();
    let Ok(location_value) = HeaderValue::from_str(&location) else {
        tracing::error!(location = %location, "Redirect location is not a valid header value");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let body = format!("Redirecting to {}", location);
    let mut response = (status, body).into_response();
    response.headers_mut().insert(header::LOCATION, location_value);
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use bytes::Bytes;
    use std::path::PathBuf;

    #[test]
    fn test_redirect_response() {
        let response = redirect(StatusCode::MOVED_PERMANENTLY, "/new?x=1");
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[header::LOCATION], "/new?x=1");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn test_non_ascii_location_encoded() {
        let response = redirect(StatusCode::FOUND, "/café");
        assert_eq!(response.headers()[header::LOCATION], "/caf%C3%A9");
    }

    #[test]
    fn test_file_content_type_overrides_rule() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

        let response = Resolution::File {
            path: PathBuf::from("/srv/site/style.css"),
            content: Bytes::from_static(b"body{}"),
            headers,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    }

    #[test]
    fn test_extensionless_file_served_as_html() {
        let response = Resolution::File {
            path: PathBuf::from("/srv/site/about"),
            content: Bytes::from_static(b"<h1>about</h1>"),
            headers: HeaderMap::new(),
        }
        .into_response();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let response = Resolution::File {
            path: PathBuf::from("/srv/site/api/status"),
            content: Bytes::from_static(b"{}"),
            headers,
        }
        .into_response();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }
}
