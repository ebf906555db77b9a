use axum::Json;
use swatboard_core::now_ms;

use crate::dto::HealthResponse;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        ts: now_ms(),
    })
}

pub async fn banner() -> &'static str {
    "Swatboard: fly-swatting leaderboard"
}
