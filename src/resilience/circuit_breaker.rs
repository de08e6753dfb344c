//! Circuit breaker for the prediction backend.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: backend assumed down, calls fail fast
//!
//! # State Transitions
//! ```text
//! Closed → Open:   failure_count reaches max_failures
//! Open → Closed:   first check after recovery_timeout has elapsed since the last failure
//! any → Closed:    a call succeeds (failure_count reset to 0)
//! ```
//!
//! # Design Decisions
//! - No half-open state: after the window the next call is the probe
//! - Recovery is lazy, evaluated on check rather than on a timer
//! - One mutex covers every read-modify-write of the state

use serde::Serialize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::BreakerConfig;

/// Breaker state. `Open` exactly when the failure count has reached the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed {
        failures: u32,
        last_failure: Option<Instant>,
    },
    Open {
        failures: u32,
        /// Time of the most recent failure.
        since: Instant,
    },
}

impl BreakerState {
    pub fn failure_count(&self) -> u32 {
        match *self {
            BreakerState::Closed { failures, .. } | BreakerState::Open { failures, .. } => failures,
        }
    }

    pub fn last_failure(&self) -> Option<Instant> {
        match *self {
            BreakerState::Closed { last_failure, .. } => last_failure,
            BreakerState::Open { since, .. } => Some(since),
        }
    }
}

impl Default for BreakerState {
    fn default() -> Self {
        BreakerState::Closed {
            failures: 0,
            last_failure: None,
        }
    }
}

/// Serializable view of the breaker for status reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakerSnapshot {
    pub state: &'static str,
    pub failure_count: u32,
    pub max_failures: u32,
    pub recovery_timeout_secs: u64,
    pub seconds_since_last_failure: Option<f64>,
}

/// Consecutive-failure circuit breaker.
#[derive(Debug)]
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    max_failures: u32,
    recovery_timeout: Duration,
}

impl CircuitBreaker {
    pub fn new(max_failures: u32, recovery_timeout: Duration) -> Self {
        Self {
            state: Mutex::new(BreakerState::default()),
            max_failures,
            recovery_timeout,
        }
    }

    pub fn from_config(config: &BreakerConfig) -> Self {
        Self::new(config.max_failures, config.recovery_timeout())
    }

    pub fn max_failures(&self) -> u32 {
        self.max_failures
    }

    pub fn recovery_timeout(&self) -> Duration {
        self.recovery_timeout
    }

    /// True if calls should be short-circuited.
    pub fn is_open(&self) -> bool {
        self.is_open_at(Instant::now())
    }

    /// [`is_open`](Self::is_open) evaluated at `now`.
    ///
    /// An open breaker whose recovery window has elapsed is reset to closed
    /// with a zero failure count and reports false.
    pub fn is_open_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock().expect("circuit breaker mutex poisoned");
        let current = *state;
        match current {
            BreakerState::Closed { .. } => false,
            BreakerState::Open { since, .. } => {
                if now.saturating_duration_since(since) < self.recovery_timeout {
                    true
                } else {
                    *state = BreakerState::Closed {
                        failures: 0,
                        last_failure: Some(since),
                    };
                    tracing::info!(
                        recovery_timeout_secs = self.recovery_timeout.as_secs(),
                        "Circuit breaker recovery window elapsed, allowing calls"
                    );
                    false
                }
            }
        }
    }

    /// Record a failed call. Returns true if the breaker is open afterwards.
    pub fn record_failure(&self) -> bool {
        self.record_failure_at(Instant::now())
    }

    /// [`record_failure`](Self::record_failure) observed at `now`.
    pub fn record_failure_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock().expect("circuit breaker mutex poisoned");
        let was_open = matches!(*state, BreakerState::Open { .. });
        let failures = state.failure_count().saturating_add(1);

        if failures >= self.max_failures {
            *state = BreakerState::Open {
                failures,
                since: now,
            };
            if !was_open {
                tracing::warn!(failures, "Circuit breaker opened after repeated failures");
            }
            true
        } else {
            *state = BreakerState::Closed {
                failures,
                last_failure: Some(now),
            };
            false
        }
    }

    /// Record a successful call, resetting the failure count.
    pub fn record_success(&self) {
        let mut state = self.state.lock().expect("circuit breaker mutex poisoned");
        if matches!(*state, BreakerState::Open { .. }) {
            tracing::info!("Circuit breaker closed after successful call");
        }
        let last_failure = state.last_failure();
        *state = BreakerState::Closed {
            failures: 0,
            last_failure,
        };
    }

    /// Current state, without evaluating the recovery window.
    pub fn state(&self) -> BreakerState {
        *self.state.lock().expect("circuit breaker mutex poisoned")
    }

    pub fn failure_count(&self) -> u32 {
        self.state().failure_count()
    }

    /// Status view at `now`. Does not mutate the breaker.
    pub fn snapshot_at(&self, now: Instant) -> BreakerSnapshot {
        let state = self.state();
        let open = match state {
            BreakerState::Open { since, .. } => {
                now.saturating_duration_since(since) < self.recovery_timeout
            }
            BreakerState::Closed { .. } => false,
        };

        BreakerSnapshot {
            state: if open { "open" } else { "closed" },
            failure_count: state.failure_count(),
            max_failures: self.max_failures,
            recovery_timeout_secs: self.recovery_timeout.as_secs(),
            seconds_since_last_failure: state
                .last_failure()
                .map(|at| now.saturating_duration_since(at).as_secs_f64()),
        }
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        self.snapshot_at(Instant::now())
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::from_config(&BreakerConfig::default())
    }
}
