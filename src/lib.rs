//! Local preview server for statically generated sites.
//!
//! Serves a build directory the way the hosting platform would: forced
//! redirects, in-memory content with a disk fallback, pretty-URL and
//! trailing-slash redirects, fallback redirects, a custom `404.html`, and
//! per-path header rules.

pub mod config;
pub mod content;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::DevServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::SiteRouter;
