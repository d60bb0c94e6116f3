//! Router construction and server lifecycle.

use super::handlers;
use crate::config::{ServerConfig, SessionConfig};
use crate::db::Database;
use anyhow::Context;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{delete, get, post, put},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub session: SessionConfig,
}

impl AppState {
    pub fn new(db: Arc<Database>, session: SessionConfig) -> Self {
        Self { db, session }
    }
}

/// Build the router with all routes.
///
/// CORS admits exactly `allowed_origin`, with credentials.
pub fn build_router(state: AppState, allowed_origin: &str) -> anyhow::Result<Router> {
    let origin: HeaderValue = allowed_origin
        .parse()
        .with_context(|| format!("invalid allowed origin '{}'", allowed_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Ok(Router::new()
        // Accounts
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/account", delete(handlers::delete_account))
        // Tasks
        .route("/tasks", get(handlers::get_tasks))
        .route("/add_task", post(handlers::add_task))
        .route("/update_task/{task_id}", put(handlers::update_task))
        .route("/delete_task/{task_id}", delete(handlers::delete_task))
        .route("/move_task/{task_id}", put(handlers::move_task))
        .route("/toggle_task/{task_id}", put(handlers::toggle_task))
        // Lists
        .route("/add_list", post(handlers::add_list))
        .route("/update_list/{list_id}", put(handlers::update_list))
        .route("/delete_list/{list_id}", delete(handlers::delete_list))
        .route("/delete_all_lists", delete(handlers::delete_all_lists))
        .route("/toggle_list/{list_id}", put(handlers::toggle_list))
        .route("/api/health", get(handlers::health))
        // Add middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Handle for a running server.
pub struct ServerHandle {
    pub addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Signal graceful shutdown and wait for in-flight requests to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.task.await;
    }
}

/// Bind and start serving in the background.
pub async fn start_server(
    db: Arc<Database>,
    server: &ServerConfig,
    session: SessionConfig,
) -> anyhow::Result<ServerHandle> {
    let app = build_router(AppState::new(db, session), &server.allowed_origin)?;

    let listener = tokio::net::TcpListener::bind((server.host.as_str(), server.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", server.host, server.port))?;
    let addr = listener.local_addr()?;

    info!("API server listening on http://{}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("API server shutting down");
            })
            .await
        {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(ServerHandle {
        addr,
        shutdown_tx,
        task,
    })
}
