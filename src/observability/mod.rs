//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Guarded prediction calls produce:
//!     → drift.rs (distance of input from baseline)
//!     → metrics.rs (MetricEvent → counters, gauges, histograms)
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Drift is observability only; it never changes control flow
//! - The guard talks to a MetricsSink trait, not the recorder directly

pub mod drift;
pub mod logging;
pub mod metrics;

pub use metrics::{MetricEvent, MetricsSink, PrometheusSink};
