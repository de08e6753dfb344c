//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming prediction request:
//!     → rate_limit.rs (check per-client limit for the endpoint)
//!     → Pass to handler
//! ```
//!
//! # Design Decisions
//! - Limits are per endpoint: batch calls cost more than single calls
//! - Clients are keyed by remote IP

pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, RateLimiter};
