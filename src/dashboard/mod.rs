//! Dashboard — Axum web server for the published scan results.
//!
//! Serves the `/api/stocks` JSON endpoint, health probes, and a
//! self-contained HTML view. CORS enabled so a separately hosted
//! dashboard page can read the API during development.

pub mod routes;

use axum::{
    http::{header, HeaderValue, Method},
    response::Html,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::store::SnapshotStore;

/// The embedded dashboard HTML (compiled into the binary).
const DASHBOARD_HTML: &str = include_str!("templates/index.html");

/// Start the dashboard web server.
///
/// This spawns a background task — it doesn't block.
pub fn spawn_dashboard(store: SnapshotStore, port: u16) {
    let app = build_router(store);

    tokio::spawn(async move {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
        info!(port, "Dashboard server starting on http://localhost:{port}");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind dashboard port");

        axum::serve(listener, app)
            .await
            .expect("Dashboard server error");
    });
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(store: SnapshotStore) -> Router {
    let cors = CorsLayer::new()
        .allow_origin("*".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/stocks", get(routes::get_stocks))
        .route("/health", get(routes::health))
        .route("/", get(routes::root))
        .route("/dashboard", get(serve_dashboard))
        .layer(cors)
        .with_state(store)
}

/// Serve the embedded HTML dashboard.
async fn serve_dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
