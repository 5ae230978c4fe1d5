// ABOUTME: Server assembly for the todolist service
// ABOUTME: Wires configuration, storage, middleware and the API router into a running server

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    Router,
};
use todolist_api::create_router;
use todolist_storage::SqliteTaskStore;
use todolist_tasks::TaskService;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub mod args;
pub mod config;
pub mod logging;
pub mod middleware;


use config::Config;
use middleware::{
    create_panic_handler, rate_limit_middleware, GlobalRateLimiter, SecurityHeadersLayer,
};

/// Request bodies larger than this are rejected before validation
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Wrap the API router in the middleware stack
pub fn build_app(config: &Config, task_service: Arc<TaskService>) -> anyhow::Result<Router> {
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", config.cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let limiter = GlobalRateLimiter::new(config.rate_limit.clone());

    let app = create_router(task_service)
        .layer(from_fn_with_state(limiter, rate_limit_middleware))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(SecurityHeadersLayer::new().with_hsts(config.enable_hsts))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(create_panic_handler());

    Ok(app)
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let store = SqliteTaskStore::connect(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to open task database")?;
    let task_service = Arc::new(TaskService::new(Arc::new(store)));

    let app = build_app(&config, task_service)?;

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;

    info!("Server listening on http://{}", listener.local_addr()?);
    info!("CORS origin: {}", config.cors_origin);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
