use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub mod payment_webhooks;

/// Build the application router (health + webhook ingress).
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(payment_webhooks::router(state))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let db_status = if state.store.is_some() {
        "connected"
    } else {
        "disconnected"
    };
    Json(json!({ "ok": true, "db": db_status }))
}
