//! Per-dependency circuit breaker.
//!
//! One breaker instance guards every outbound call to one upstream service.
//! Closed lets calls through and counts consecutive failures; once the count
//! reaches the threshold the breaker opens and rejects calls without running
//! them. After the recovery timeout a single trial call is admitted
//! (half-open); its outcome decides between closing again and restarting the
//! open window. A failed trial always reopens regardless of the threshold -
//! the threshold only governs the closed-to-open path.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::types::{BreakerSnapshot, BreakerState};

/// Outcome of one guarded invocation. Never persisted.
#[derive(Debug)]
pub enum CallOutcome<T, E> {
    /// The breaker blocked the attempt; the work was never run.
    Rejected,
    /// The work ran and returned an error.
    Failed(E),
    Succeeded(T),
}

pub struct CircuitBreaker {
    name: String,
    failure_threshold: u32,
    recovery_timeout: Duration,
    inner: Mutex<Inner>,
}

struct Inner {
    state: BreakerState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

enum Admission {
    Denied,
    Normal,
    Trial,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, failure_threshold: u32, recovery_timeout: Duration) -> Self {
        Self {
            name: name.into(),
            failure_threshold: failure_threshold.max(1),
            recovery_timeout,
            inner: Mutex::new(Inner {
                state: BreakerState::Closed,
                consecutive_failures: 0,
                opened_at: None,
                trial_in_flight: false,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> BreakerState {
        self.lock().state
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        let inner = self.lock();
        BreakerSnapshot {
            name: self.name.clone(),
            state: inner.state,
            consecutive_failures: inner.consecutive_failures,
        }
    }

    /// Decides whether an attempt may run right now. Open flips to half-open
    /// once the recovery timeout has elapsed, admitting exactly one trial;
    /// further attempts are rejected until that trial reports its outcome.
    pub fn allow(&self) -> bool {
        !matches!(self.admit(), Admission::Denied)
    }

    fn admit(&self) -> Admission {
        let mut inner = self.lock();
        match inner.state {
            BreakerState::Closed => Admission::Normal,
            BreakerState::Open => match inner.opened_at {
                Some(opened_at) if opened_at.elapsed() >= self.recovery_timeout => {
                    inner.state = BreakerState::HalfOpen;
                    inner.trial_in_flight = true;
                    tracing::info!(
                        breaker = %self.name,
                        "recovery timeout elapsed, admitting trial call"
                    );
                    Admission::Trial
                }
                _ => Admission::Denied,
            },
            BreakerState::HalfOpen => {
                if inner.trial_in_flight {
                    Admission::Denied
                } else {
                    inner.trial_in_flight = true;
                    Admission::Trial
                }
            }
        }
    }

    /// Records a successful call. Resets the failure streak and closes the
    /// circuit if the half-open trial just succeeded. Idempotent while closed.
    pub fn on_success(&self) {
        let mut inner = self.lock();
        inner.consecutive_failures = 0;
        inner.trial_in_flight = false;
        if inner.state == BreakerState::HalfOpen {
            inner.state = BreakerState::Closed;
            inner.opened_at = None;
            tracing::info!(breaker = %self.name, "trial call succeeded, circuit closed");
        }
    }

    /// Records a failed call. Opens the circuit when the consecutive-failure
    /// threshold is reached, or unconditionally when a half-open trial fails.
    pub fn on_failure(&self) {
        let mut inner = self.lock();
        inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
        let trial_failed = inner.state == BreakerState::HalfOpen;
        inner.trial_in_flight = false;
        if trial_failed || inner.consecutive_failures >= self.failure_threshold {
            let was_open = inner.state == BreakerState::Open;
            inner.state = BreakerState::Open;
            inner.opened_at = Some(Instant::now());
            if trial_failed {
                tracing::info!(breaker = %self.name, "trial call failed, circuit reopened");
            } else if !was_open {
                tracing::info!(
                    breaker = %self.name,
                    failures = inner.consecutive_failures,
                    "failure threshold reached, circuit opened"
                );
            }
        }
    }

    /// Runs `work` under this breaker. Returns `Rejected` without invoking the
    /// work when the breaker blocks the attempt; otherwise feeds exactly one
    /// outcome back into the breaker. The lock is never held across the await.
    pub async fn execute<T, E, F, Fut>(&self, work: F) -> CallOutcome<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let admission = self.admit();
        if matches!(admission, Admission::Denied) {
            return CallOutcome::Rejected;
        }

        // If a trial caller is cancelled mid-flight the guard releases the
        // trial slot so the breaker cannot wedge in half-open with no trial
        // running.
        let mut trial_slot = TrialSlot {
            breaker: self,
            armed: matches!(admission, Admission::Trial),
        };
        let outcome = match work().await {
            Ok(value) => {
                self.on_success();
                CallOutcome::Succeeded(value)
            }
            Err(err) => {
                self.on_failure();
                CallOutcome::Failed(err)
            }
        };
        trial_slot.armed = false;
        outcome
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct TrialSlot<'a> {
    breaker: &'a CircuitBreaker,
    armed: bool,
}

impl Drop for TrialSlot<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut inner = self.breaker.lock();
            inner.trial_in_flight = false;
        }
    }
}
