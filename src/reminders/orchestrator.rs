//! Chains the two guarded upstream calls into one reminder run.
//!
//! The task service is never called without a validated session, and the
//! audit row is only written once the whole chain has succeeded. A degraded
//! dependency short-circuits to an error the handler maps to 503, distinct
//! from the 401 a clean "credential invalid" answer produces.

use crate::reminders::store::append_reminder;
use crate::resilience::call_guarded;
use crate::state::AppState;
use crate::types::{ReminderSummary, Task};
use crate::upstream::SessionCheck;

pub const NO_PENDING_TASKS_MESSAGE: &str = "No tenes tareas pendientes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyError {
    /// The verifier answered and said no. Not a dependency-health signal.
    InvalidCredential,
    AuthUnavailable,
    TasksUnavailable,
}

/// Full orchestration: verify the session, fetch and filter tasks, derive the
/// message, record the audit row, return the summary.
pub async fn send_reminder(state: &AppState, token: &str) -> Result<ReminderSummary, NotifyError> {
    let user_id = authenticate(state, token).await?;
    let pending = fetch_pending(state, token).await?;

    let message = reminder_message(pending.len());

    // Best effort: the summary is already computed and is returned to the
    // client even when the audit write fails.
    if let Err(err) = append_reminder(&state.pool, user_id, &message).await {
        tracing::warn!(user_id, error = ?err, "reminder audit write failed");
    }

    Ok(ReminderSummary {
        user_id,
        pending_count: pending.len() as i64,
        message,
    })
}

/// Read-only variant: same auth and task chain, returns the pending list,
/// writes no audit row.
pub async fn pending_tasks(state: &AppState, token: &str) -> Result<Vec<Task>, NotifyError> {
    authenticate(state, token).await?;
    fetch_pending(state, token).await
}

/// Verifies the credential through the auth breaker and returns the user id.
pub async fn authenticate(state: &AppState, token: &str) -> Result<i64, NotifyError> {
    let check = call_guarded(&state.auth_breaker, || state.auth.verify_session(token))
        .await
        .map_err(|_| NotifyError::AuthUnavailable)?;

    match check {
        SessionCheck::Valid { user_id, .. } => Ok(user_id),
        SessionCheck::Invalid => Err(NotifyError::InvalidCredential),
    }
}

async fn fetch_pending(state: &AppState, token: &str) -> Result<Vec<Task>, NotifyError> {
    let tasks = call_guarded(&state.tasks_breaker, || state.tasks.fetch_tasks(token))
        .await
        .map_err(|_| NotifyError::TasksUnavailable)?;

    Ok(tasks.into_iter().filter(Task::is_pending).collect())
}

fn reminder_message(pending: usize) -> String {
    if pending == 0 {
        NO_PENDING_TASKS_MESSAGE.to_string()
    } else {
        format!("Tenes {pending} tareas pendientes")
    }
}
