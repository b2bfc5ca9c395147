//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request target
//!     → redirects.rs (forceful pass)
//!     → router.rs (content lookup + fallback chain)
//!     → redirects.rs (fallback pass)
//!     → headers.rs + matcher.rs (header overlay for served files)
//!     → Resolution
//!
//! Rule Compilation (at startup):
//!     parsed redirect rules + header blocks
//!     → RedirectRuleSet (declaration order kept)
//!     → HeaderRuleIndex (patterns compiled)
//!     → Freeze as immutable SiteRouter
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - No regex in hot path (literal and segment matching only)
//! - Deterministic: same input always resolves the same way
//! - First match wins (declaration order)

pub mod headers;
pub mod matcher;
pub mod redirects;
pub mod router;

pub use headers::{HeaderRule, HeaderRuleIndex};
pub use redirects::{RedirectRule, RedirectRuleSet};
pub use router::{RedirectKind, Resolution, RouteError, SiteRouter};
