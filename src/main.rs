use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use notifier::{
    config::NotifierConfig,
    handlers::reminders::{
        create_reminder_handler, health_handler, list_reminders_handler, pending_tasks_handler,
    },
    resilience::CircuitBreaker,
    state::AppState,
    upstream::{HttpAuthVerifier, HttpTaskSource},
};
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:notifier.db".to_string());
    let bind_addr =
        std::env::var("NOTIFIER_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5002".to_string());
    let config = NotifierConfig::from_env();

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let recovery_timeout = Duration::from_millis(config.breaker_recovery_timeout_ms);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.upstream_timeout_ms))
        .build()?;

    let state = AppState {
        pool,
        auth: Arc::new(HttpAuthVerifier::new(client.clone(), config.auth_url.clone())),
        tasks: Arc::new(HttpTaskSource::new(client, config.tasks_url.clone())),
        auth_breaker: Arc::new(CircuitBreaker::new(
            "auth",
            config.breaker_failure_threshold,
            recovery_timeout,
        )),
        tasks_breaker: Arc::new(CircuitBreaker::new(
            "tasks",
            config.breaker_failure_threshold,
            recovery_timeout,
        )),
    };

    let app = Router::new()
        .route(
            "/recordatorios",
            post(create_reminder_handler).get(list_reminders_handler),
        )
        .route("/tasks/pendientes", get(pending_tasks_handler))
        .route("/health", get(health_handler))
        .with_state(state);

    let addr: SocketAddr = bind_addr.parse()?;
    tracing::info!(%addr, "notifier listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
