use axum::extract::{Query, State};
use axum::Json;

use crate::dto::{LeaderboardQuery, LeaderboardResponse};
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let tag = query
        .difficulty
        .filter(|d| !d.is_empty())
        .ok_or_else(|| {
            AppError::BadRequest("difficulty is required (easy|medium|hard)".to_string())
        })?;

    let snapshot = state.store.query_tag(&tag)?;
    Ok(Json(snapshot.into()))
}
