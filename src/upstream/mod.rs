mod auth;
mod tasks;

pub use auth::{AuthVerifier, HttpAuthVerifier, SessionCheck};
pub use tasks::{HttpTaskSource, TaskSource};

use thiserror::Error;

/// A dependency-health failure: transport trouble, an unexpected status, or a
/// response shape we cannot read. All variants count as breaker failures; a
/// clean upstream "no" (invalid credential) is not represented here.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed upstream response")]
    MalformedResponse,
}
