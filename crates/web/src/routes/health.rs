//! Liveness and database probe

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Response {
    let probe = state.db().map_err(|e| e.to_string()).and_then(|db| {
        db.ping()
            .and_then(|_| db.schema_version())
            .map_err(|e| e.to_string())
    });

    match probe {
        Ok(schema_version) => Json(json!({
            "status": "ok",
            "schema_version": schema_version,
            "checked_at": Utc::now(),
        }))
        .into_response(),
        Err(error) => {
            tracing::warn!(%error, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
                .into_response()
        }
    }
}
