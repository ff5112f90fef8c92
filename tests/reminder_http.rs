#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
    routing::{get, post},
};
use http_body_util::BodyExt;
use notifier::{
    handlers::reminders::{
        create_reminder_handler, health_handler, list_reminders_handler, pending_tasks_handler,
    },
    reminders::list_reminders,
    resilience::CircuitBreaker,
    state::AppState,
    types::Task,
    upstream::{AuthVerifier, SessionCheck, TaskSource, UpstreamError},
};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tempfile::NamedTempFile;
use tower::ServiceExt;

struct TestDb {
    pool: SqlitePool,
    _db_file: NamedTempFile,
}

async fn setup_db() -> TestDb {
    let db_file = NamedTempFile::new().expect("create temp sqlite file");
    let options = SqliteConnectOptions::new()
        .filename(db_file.path())
        .create_if_missing(true)
        .busy_timeout(Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("connect sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    TestDb {
        pool,
        _db_file: db_file,
    }
}

enum AuthMode {
    Valid(i64),
    Invalid,
    Fail,
}

struct FakeAuth {
    mode: AuthMode,
    calls: AtomicUsize,
}

#[async_trait]
impl AuthVerifier for FakeAuth {
    async fn verify_session(&self, _token: &str) -> Result<SessionCheck, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            AuthMode::Valid(user_id) => Ok(SessionCheck::Valid {
                user_id,
                username: None,
            }),
            AuthMode::Invalid => Ok(SessionCheck::Invalid),
            AuthMode::Fail => Err(UpstreamError::Status(500)),
        }
    }
}

struct FakeTasks {
    tasks: Vec<Task>,
    fail: bool,
}

#[async_trait]
impl TaskSource for FakeTasks {
    async fn fetch_tasks(&self, _token: &str) -> Result<Vec<Task>, UpstreamError> {
        if self.fail {
            return Err(UpstreamError::Status(500));
        }
        Ok(self.tasks.clone())
    }
}

fn task(id: i64, completada: bool) -> Task {
    Task {
        id,
        tarea: format!("tarea {id}"),
        completada,
        fecha_creacion: "2026-01-01 00:00:00".to_string(),
    }
}

fn test_state(pool: SqlitePool, auth: AuthMode, tasks: Vec<Task>, tasks_fail: bool) -> AppState {
    AppState {
        pool,
        auth: Arc::new(FakeAuth {
            mode: auth,
            calls: AtomicUsize::new(0),
        }),
        tasks: Arc::new(FakeTasks {
            tasks,
            fail: tasks_fail,
        }),
        auth_breaker: Arc::new(CircuitBreaker::new("auth", 3, Duration::from_secs(20))),
        tasks_breaker: Arc::new(CircuitBreaker::new("tasks", 3, Duration::from_secs(20))),
    }
}

fn build_app(state: AppState) -> Router {
    Router::new()
        .route(
            "/recordatorios",
            post(create_reminder_handler).get(list_reminders_handler),
        )
        .route("/tasks/pendientes", get(pending_tasks_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_recordatorios(auth_header: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/recordatorios");
    if let Some(value) = auth_header {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// POST /recordatorios
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn recordatorios_returns_mensaje_with_pending_count() {
    let db = setup_db().await;
    let state = test_state(
        db.pool.clone(),
        AuthMode::Valid(7),
        vec![task(1, false), task(2, false), task(3, true)],
        false,
    );
    let app = build_app(state);

    let response = app
        .oneshot(post_recordatorios(Some("Bearer tok")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["mensaje"], "Tenes 2 tareas pendientes");

    let reminders = list_reminders(&db.pool, 7).await.expect("list reminders");
    assert_eq!(reminders.len(), 1);
}

#[tokio::test]
async fn missing_auth_header_returns_401() {
    let db = setup_db().await;
    let state = test_state(db.pool.clone(), AuthMode::Valid(7), Vec::new(), false);
    let app = build_app(state);

    let response = app.oneshot(post_recordatorios(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "token requerido");
}

#[tokio::test]
async fn basic_auth_scheme_returns_401() {
    let db = setup_db().await;
    let state = test_state(db.pool.clone(), AuthMode::Valid(7), Vec::new(), false);
    let app = build_app(state);

    let response = app
        .oneshot(post_recordatorios(Some("Basic dXNlcjpwYXNz")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_bearer_token_returns_401() {
    let db = setup_db().await;
    let state = test_state(db.pool.clone(), AuthMode::Valid(7), Vec::new(), false);
    let app = build_app(state);

    let response = app
        .oneshot(post_recordatorios(Some("Bearer ")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_token_returns_401() {
    let db = setup_db().await;
    let state = test_state(db.pool.clone(), AuthMode::Invalid, Vec::new(), false);
    let app = build_app(state);

    let response = app
        .oneshot(post_recordatorios(Some("Bearer bad-tok")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "token invalido");
}

#[tokio::test]
async fn auth_down_returns_503() {
    let db = setup_db().await;
    let state = test_state(db.pool.clone(), AuthMode::Fail, Vec::new(), false);
    let app = build_app(state);

    let response = app
        .oneshot(post_recordatorios(Some("Bearer tok")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"], "servicio de autenticacion no disponible");
}

#[tokio::test]
async fn tasks_down_returns_503_and_writes_no_audit() {
    let db = setup_db().await;
    let state = test_state(db.pool.clone(), AuthMode::Valid(7), Vec::new(), true);
    let app = build_app(state);

    let response = app
        .oneshot(post_recordatorios(Some("Bearer tok")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"], "servicio de tareas no disponible");

    let reminders = list_reminders(&db.pool, 7).await.expect("list reminders");
    assert!(reminders.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// GET /tasks/pendientes
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pendientes_returns_filtered_tasks() {
    let db = setup_db().await;
    let state = test_state(
        db.pool.clone(),
        AuthMode::Valid(7),
        vec![task(1, false), task(2, true), task(3, false)],
        false,
    );
    let app = build_app(state);

    let request = Request::builder()
        .uri("/tasks/pendientes")
        .header(AUTHORIZATION, "Bearer tok")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let pendientes = body["tareas_pendientes"].as_array().unwrap();
    assert_eq!(pendientes.len(), 2);
    assert_eq!(pendientes[0]["id"], 1);
    assert_eq!(pendientes[1]["id"], 3);

    // Read-only entry point: no audit row.
    let reminders = list_reminders(&db.pool, 7).await.expect("list reminders");
    assert!(reminders.is_empty());
}

#[tokio::test]
async fn pendientes_requires_credential() {
    let db = setup_db().await;
    let state = test_state(db.pool.clone(), AuthMode::Valid(7), Vec::new(), false);
    let app = build_app(state);

    let request = Request::builder()
        .uri("/tasks/pendientes")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ─────────────────────────────────────────────────────────────────────────────
// GET /recordatorios
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn recordatorios_listing_returns_audit_rows() {
    let db = setup_db().await;
    let state = test_state(
        db.pool.clone(),
        AuthMode::Valid(7),
        vec![task(1, false)],
        false,
    );
    let app = build_app(state);

    let response = app
        .clone()
        .oneshot(post_recordatorios(Some("Bearer tok")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri("/recordatorios")
        .header(AUTHORIZATION, "Bearer tok")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let recordatorios = body["recordatorios"].as_array().unwrap();
    assert_eq!(recordatorios.len(), 1);
    assert_eq!(recordatorios[0]["user_id"], 7);
    assert_eq!(recordatorios[0]["message"], "Tenes 1 tareas pendientes");
}

// ─────────────────────────────────────────────────────────────────────────────
// GET /health
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_breaker_snapshots() {
    let db = setup_db().await;
    let state = test_state(db.pool.clone(), AuthMode::Valid(7), Vec::new(), false);
    let app = build_app(state);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    let breakers = body["breakers"].as_array().unwrap();
    assert_eq!(breakers.len(), 2);
    assert_eq!(breakers[0]["name"], "auth");
    assert_eq!(breakers[0]["state"], "closed");
    assert_eq!(breakers[1]["name"], "tasks");
    assert_eq!(breakers[1]["state"], "closed");
}
