use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{HeadToHead, Leaders, MonthlyPerformance, PlayerId};
use crate::service;

// ── Monthly ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MonthlyParams {
    pub year: i32,
    pub month: u32,
}

pub async fn monthly(
    State(state): State<AppState>,
    params: Result<Query<MonthlyParams>, QueryRejection>,
) -> Result<Json<Vec<MonthlyPerformance>>, ApiError> {
    let Query(params) = params?;
    if !(1..=12).contains(&params.month) {
        return Err(ApiError::BadRequest(format!(
            "month must be between 1 and 12, got {}",
            params.month
        )));
    }

    let rows = service::monthly_performance(state.store.as_ref(), params.year, params.month)
        .await?;
    Ok(Json(rows))
}

// ── Head to head ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct HeadToHeadParams {
    pub player1: PlayerId,
    pub player2: PlayerId,
}

pub async fn head_to_head(
    State(state): State<AppState>,
    params: Result<Query<HeadToHeadParams>, QueryRejection>,
) -> Result<Json<HeadToHead>, ApiError> {
    let Query(params) = params?;
    let summary =
        service::head_to_head(state.store.as_ref(), params.player1, params.player2).await?;
    Ok(Json(summary))
}

// ── Leaders ─────────────────────────────────────────────────────

pub async fn leaders(State(state): State<AppState>) -> Result<Json<Leaders>, ApiError> {
    let board = service::leaders(state.store.as_ref()).await?;
    Ok(Json(board))
}
