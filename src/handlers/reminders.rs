use axum::{Json, extract::State, http::HeaderMap};

use crate::{
    auth::bearer_token,
    error::ApiError,
    reminders::{NotifyError, StoreError, authenticate, list_reminders, pending_tasks, send_reminder},
    state::AppState,
    types::{
        HealthResponse, ListRemindersResponse, PendingTasksResponse, ReminderResponse,
    },
};

pub async fn create_reminder_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ReminderResponse>, ApiError> {
    let token = require_bearer(&headers)?;

    let summary = send_reminder(&state, token)
        .await
        .map_err(map_notify_error)?;

    Ok(Json(ReminderResponse {
        mensaje: summary.message,
    }))
}

pub async fn pending_tasks_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PendingTasksResponse>, ApiError> {
    let token = require_bearer(&headers)?;

    let tareas_pendientes = pending_tasks(&state, token)
        .await
        .map_err(map_notify_error)?;

    Ok(Json(PendingTasksResponse { tareas_pendientes }))
}

pub async fn list_reminders_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ListRemindersResponse>, ApiError> {
    let token = require_bearer(&headers)?;

    let user_id = authenticate(&state, token)
        .await
        .map_err(map_notify_error)?;

    let recordatorios = list_reminders(&state.pool, user_id)
        .await
        .map_err(map_store_error)?;

    Ok(Json(ListRemindersResponse { recordatorios }))
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        breakers: vec![state.auth_breaker.snapshot(), state.tasks_breaker.snapshot()],
    })
}

fn require_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    bearer_token(headers).ok_or_else(|| ApiError::Unauthorized("token requerido".to_string()))
}

fn map_notify_error(err: NotifyError) -> ApiError {
    match err {
        NotifyError::InvalidCredential => ApiError::Unauthorized("token invalido".to_string()),
        NotifyError::AuthUnavailable => ApiError::ServiceUnavailable(
            "servicio de autenticacion no disponible".to_string(),
        ),
        NotifyError::TasksUnavailable => {
            ApiError::ServiceUnavailable("servicio de tareas no disponible".to_string())
        }
    }
}

fn map_store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::Db(db) => ApiError::Db(db),
        StoreError::Parse(message) => ApiError::Internal(message),
    }
}
