use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{MatchRecord, MatchRecordId, MatchRecordUpdate, NewMatchRecord};

/// All match records, most recent first.
pub async fn list_match_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<MatchRecord>>, ApiError> {
    let mut records = state.store.list_match_records().await?;
    records.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(Json(records))
}

pub async fn create_match_record(
    State(state): State<AppState>,
    payload: Result<Json<NewMatchRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<MatchRecord>), ApiError> {
    let Json(input) = payload?;
    let record = state.store.add_match_record(input.validate()?).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_match_record(
    State(state): State<AppState>,
    Path(id): Path<MatchRecordId>,
    payload: Result<Json<MatchRecordUpdate>, JsonRejection>,
) -> Result<Json<MatchRecord>, ApiError> {
    let Json(update) = payload?;
    let record = state
        .store
        .update_match_record(id, update.validate()?)
        .await?;
    Ok(Json(record))
}

pub async fn delete_match_record(
    State(state): State<AppState>,
    Path(id): Path<MatchRecordId>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_match_record(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
