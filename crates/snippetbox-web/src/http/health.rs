use axum::Json;
use serde_json::{json, Value};

/// GET /health — liveness check, returns build metadata.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "git_sha": env!("SNIPPETBOX_GIT_SHA"),
    }))
}
