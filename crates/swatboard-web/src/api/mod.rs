mod health;
mod leaderboard;
mod records;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Routes served under `/api`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health::banner))
        .route("/health", get(health::health))
        .route("/record", post(records::create_record))
        .route("/leaderboard", get(leaderboard::get_leaderboard))
}
