//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! CLI flags → schema.rs (DevServerConfig, defaults filled)
//!     → validation.rs (semantic checks)
//!
//! netlify.toml      → site_toml.rs ─┐
//! <dir>/_redirects  → redirects_file.rs ─┼→ loader.rs → RedirectRuleSet
//! _headers files    → headers_file.rs ───┘           → HeaderRuleIndex
//! ```
//!
//! # Design Decisions
//! - Config and rules are immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Missing rule files are empty, malformed ones are fatal

pub mod headers_file;
pub mod loader;
pub mod redirects_file;
pub mod schema;
pub mod site_toml;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{DevServerConfig, ObservabilityConfig};
pub use validation::{validate_config, ValidationError};
