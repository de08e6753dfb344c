//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Prediction request:
//!     → guard.rs (check breaker, score drift, call predictor)
//!     → circuit_breaker.rs (track consecutive failures, open/close)
//! ```
//!
//! # Design Decisions
//! - Circuit breaker prevents hammering a failing model
//! - No retries; a failure is recorded and surfaced once
//! - Breaker state is owned by the guard, not process-global

pub mod circuit_breaker;
pub mod guard;

pub use circuit_breaker::{BreakerSnapshot, BreakerState, CircuitBreaker};
pub use guard::{GuardError, ResilienceGuard, FAILED_MESSAGE, UNAVAILABLE_MESSAGE};
