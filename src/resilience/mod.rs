mod breaker;
mod guard;

pub use breaker::{CallOutcome, CircuitBreaker};
pub use guard::{Unavailable, call_guarded};
