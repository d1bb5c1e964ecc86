//! Dashboard API route handlers.
//!
//! All endpoints are non-blocking reads of the snapshot store — a request
//! never triggers a scan and never waits on an in-flight cycle.

use axum::{extract::State, Json};

use crate::store::SnapshotStore;
use crate::types::ScanSnapshot;

pub type AppState = SnapshotStore;

/// GET /api/stocks — the most recently published snapshot (empty before
/// the first cycle completes, never an error).
pub async fn get_stocks(State(store): State<AppState>) -> Json<ScanSnapshot> {
    Json((*store.read().await).clone())
}

/// GET /health
pub async fn health() -> &'static str {
    "OK"
}

/// GET / — fixed liveness line for platform health probes.
pub async fn root() -> &'static str {
    "SURGE scanner is running and healthy!"
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
