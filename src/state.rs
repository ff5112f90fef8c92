use std::sync::Arc;

use sqlx::SqlitePool;

use crate::resilience::CircuitBreaker;
use crate::upstream::{AuthVerifier, TaskSource};

/// Shared handles: one breaker per upstream dependency, created at startup
/// and living for the process. Injected rather than global so the
/// orchestration is testable with fake upstreams.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth: Arc<dyn AuthVerifier>,
    pub tasks: Arc<dyn TaskSource>,
    pub auth_breaker: Arc<CircuitBreaker>,
    pub tasks_breaker: Arc<CircuitBreaker>,
}
