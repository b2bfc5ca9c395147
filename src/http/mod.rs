//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → request.rs (validate target, extract path and query)
//!     → [routing layer resolves the request]
//!     → response.rs (redirect / file / 404 / 400)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MalformedTarget, RequestTarget, X_REQUEST_ID};
pub use server::HttpServer;
