use std::fmt::Display;
use std::future::Future;

use crate::resilience::{CallOutcome, CircuitBreaker};

/// The dependency could not be reached: either the breaker rejected the
/// attempt or the call itself failed. Distinct from a legitimate upstream
/// answer such as "credential invalid", which flows through the Ok channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unavailable;

/// Runs `work` through `breaker`, collapsing rejection and failure into one
/// signal the caller can branch on. Performs no retries.
pub async fn call_guarded<T, E, F, Fut>(breaker: &CircuitBreaker, work: F) -> Result<T, Unavailable>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    match breaker.execute(work).await {
        CallOutcome::Succeeded(value) => Ok(value),
        CallOutcome::Rejected => {
            tracing::warn!(breaker = %breaker.name(), "call rejected, circuit open");
            Err(Unavailable)
        }
        CallOutcome::Failed(err) => {
            tracing::warn!(breaker = %breaker.name(), error = %err, "guarded call failed");
            Err(Unavailable)
        }
    }
}
