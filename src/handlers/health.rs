use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Medic Server",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "health": "/healthcheck, /health (public)",
                "users": "/users, /users/login, /users/refresh (public); /users/:id (protected)",
                "hospitals": "/hospitals[/:id] (GET public, writes protected)",
                "doctors": "/doctors/:id, /doctors/hospital/:id (GET public, writes protected)",
                "appointments": "/appointments[/:id], /appointments/user/:id, /appointments/doctor/:id (protected)",
            }
        }
    }))
}

/// GET /healthcheck - liveness banner
pub async fn healthcheck() -> Html<&'static str> {
    Html("<h1>Chidi Medic Server Up and Running<h1>")
}

/// GET /health - readiness, pings the document store
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": { "status": "degraded", "timestamp": now }
                })),
            )
        }
    }
}
