//! Served content subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     served directory
//!     → store.rs (walk, read every file concurrently)
//!     → immutable ContentStore snapshot
//!
//! Per request:
//!     pathname → resolve.rs (candidate file path)
//!     → store.rs (warm entry, else cold read from disk)
//! ```

pub mod resolve;
pub mod store;

pub use store::{ContentEntry, ContentError, ContentStore};
