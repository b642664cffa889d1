//! REST API for a portfolio of projects, persisted as one JSON file.
//!
//! # Routes
//!
//! | Method | Path | Purpose |
//! |---|---|---|
//! | GET | `/api/projects` | list every project |
//! | GET | `/api/projects/{id}` | fetch one project |
//! | POST | `/api/projects` | create a project |
//! | PUT | `/api/projects/{id}` | shallow-merge fields into a project |
//! | DELETE | `/api/projects/{id}` | remove a project, no-op if absent |
//! | GET | `/api/stats` | category, tool and achievement counts |
//! | POST | `/api/export` | snapshot the collection to a timestamped file |
//!
//! Successful responses use the envelope in [`routes::ApiResponse`]; failures
//! are converted from [`error::AppError`].
//!
//!
//!
//! # Storage
//!
//! Every request reloads the file, and mutations rewrite it whole. A single
//! async mutex in [`state::AppState`] covers load through save, so concurrent
//! writers cannot lose each other's updates.
//!
//!
//!
//! # Environment
//!
//! - `RUST_PORT`: listening port, default `8000`
//! - `DATA_FILE`: backing file, default `projects_data.json`
//! - `EXPORT_DIR`: export destination, default `.`
//! - `RUST_LOG`: tracing filter, default `info`
//!
//! Run locally.
//! ```sh
//! RUST_LOG=debug cargo run -p portfolio
//! ```
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
        },
    },
    routing::{get, post},
};
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod export;
pub mod project;
pub mod routes;
pub mod state;
pub mod stats;
pub mod store;
pub mod utils;

use config::Config;
use routes::{
    create_project, delete_project, export_handler, fallback_handler, get_project, list_projects,
    stats_handler, update_project,
};
use state::AppState;
use store::JsonFileStore;

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

const ROUTES: [(&str, &str, &str); 7] = [
    ("GET", "/api/projects", "Get all projects"),
    ("GET", "/api/projects/:id", "Get specific project"),
    ("POST", "/api/projects", "Create new project"),
    ("PUT", "/api/projects/:id", "Update project"),
    ("DELETE", "/api/projects/:id", "Delete project"),
    ("GET", "/api/stats", "Get statistics"),
    ("POST", "/api/export", "Export projects to JSON"),
];

pub async fn start_server() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Loading config...");
    let config = Config::load()?;

    let store = JsonFileStore::new(&config.data_file);
    store
        .seed_if_missing()
        .with_context(|| format!("Failed to seed {}", config.data_file.display()))?;

    info!("Starting server...");
    let state = AppState::new(config, Arc::new(store));
    let app = build_router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on http://localhost:{}", state.config.port);

    for (method, path, purpose) in ROUTES {
        info!("{method:<6} {path:<20} - {purpose}");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/api/stats", get(stats_handler))
        .route("/api/export", post(export_handler))
        .fallback(fallback_handler)
        .method_not_allowed_fallback(fallback_handler)
        .layer(cors)
        // CORS headers go on every response, not only those answering an Origin.
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("content-type"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
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
}
