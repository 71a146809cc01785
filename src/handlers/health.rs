use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Mood Logger API is running" }))
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let notifier = if state.notifier.is_configured() {
        "configured"
    } else {
        "unconfigured"
    };

    Json(json!({
        "status": "ok",
        "service": "mood-logger-api",
        "version": env!("CARGO_PKG_VERSION"),
        "notifier": notifier,
    }))
}
