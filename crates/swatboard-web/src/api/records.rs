use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use swatboard_core::{RecordRequest, Submission};

use crate::client_ip::ClientIp;
use crate::dto::RecordResponse;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_record(
    ClientIp(client_ip): ClientIp,
    State(state): State<AppState>,
    payload: Result<Json<RecordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RecordResponse>), AppError> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!("Rejected record body from {client_ip}: {e}");
        AppError::Unprocessable("invalid payload".to_string())
    })?;

    let submission = Submission::try_from(&request)?;
    let receipt = state.store.submit(submission, &client_ip)?;

    Ok((StatusCode::CREATED, Json(receipt.into())))
}
