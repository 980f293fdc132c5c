use super::api::{create_resolution_plan, health_check, triage_logs, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/triage", post(triage_logs))
        .route("/api/v1/resolution-plan", post(create_resolution_plan))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the triage HTTP server
pub async fn run_server(
    listen_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<(), std::io::Error> {
    let app = create_router(state);

    info!(addr = %listen_addr, "starting triage HTTP server");

    let listener = TcpListener::bind(listen_addr).await?;
    axum::serve(listener, app).await
}
