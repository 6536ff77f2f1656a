use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{NewPlayer, Player, PlayerId, PlayerStatistics, PlayerUpdate};
use crate::service;

pub async fn list_players(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlayerStatistics>>, ApiError> {
    let stats = service::list_all_player_statistics(state.store.as_ref()).await?;
    Ok(Json(stats))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<PlayerId>,
) -> Result<Json<PlayerStatistics>, ApiError> {
    let stats = service::get_player_statistics(state.store.as_ref(), id).await?;
    Ok(Json(stats))
}

pub async fn create_player(
    State(state): State<AppState>,
    payload: Result<Json<NewPlayer>, JsonRejection>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let Json(input) = payload?;
    let player = state.store.create_player(input.validate()?).await?;
    Ok((StatusCode::CREATED, Json(player)))
}

pub async fn update_player(
    State(state): State<AppState>,
    Path(id): Path<PlayerId>,
    payload: Result<Json<PlayerUpdate>, JsonRejection>,
) -> Result<Json<Player>, ApiError> {
    let Json(update) = payload?;
    let player = state.store.update_player(id, update.validate()?).await?;
    Ok(Json(player))
}

pub async fn delete_player(
    State(state): State<AppState>,
    Path(id): Path<PlayerId>,
) -> Result<StatusCode, ApiError> {
    let removed = state.store.delete_player(id).await?;
    info!(player_id = id, removed, "Player deleted via API");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::NaiveDate;

    use crate::api::test_support::{app, send};
    use crate::models::{NewMatchRecord, NewPlayer, Overs};
    use crate::storage::{MemoryStore, RecordStore};

    async fn store_with_roster() -> MemoryStore {
        let store = MemoryStore::new();
        store.create_player(NewPlayer::new("A")).await.unwrap();
        store.create_player(NewPlayer::new("B")).await.unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        for (player_id, runs) in [(1, 10), (2, 20), (1, 5)] {
            store
                .add_match_record(NewMatchRecord::new(player_id, date).batting(runs, 0))
                .await
                .unwrap();
        }
        store
            .add_match_record(NewMatchRecord::new(2, date).bowling(Overs::raw("0.5"), 1, 7))
            .await
            .unwrap();
        store
            .add_match_record(NewMatchRecord::new(2, date).bowling(Overs::raw("0.5"), 0, 3))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_list_players_returns_statistics_in_order() {
        let app = app(store_with_roster().await);
        let (status, body) = send(app, "GET", "/api/players", None).await;

        assert_eq!(status, StatusCode::OK);
        let players = body.as_array().unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0]["name"], "A");
        assert_eq!(players[0]["totalRuns"], 15);
        assert_eq!(players[0]["matches"], 2);
        assert_eq!(players[1]["totalRuns"], 20);
        assert_eq!(players[1]["matches"], 3);
        assert_eq!(players[1]["oversBowled"], "1.4");
        assert_eq!(players[1]["bestBowling"], "1/7");
    }

    #[tokio::test]
    async fn test_get_player_not_found() {
        let app = app(store_with_roster().await);
        let (status, body) = send(app, "GET", "/api/players/999", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_player_without_matches() {
        let store = store_with_roster().await;
        store.create_player(NewPlayer::new("C")).await.unwrap();

        let (status, body) = send(app(store), "GET", "/api/players/3", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matches"], 0);
        assert_eq!(body["battingAverage"], 0.0);
        assert_eq!(body["bestBowling"], "N/A");
    }

    #[tokio::test]
    async fn test_create_player() {
        let (status, body) = send(
            app(MemoryStore::new()),
            "POST",
            "/api/players",
            Some(r#"{"name":" Monti ","role":"Wicket-keeper"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);
        assert_eq!(body["name"], "Monti");
        assert_eq!(body["role"], "Wicket-keeper");
    }

    #[tokio::test]
    async fn test_create_player_rejects_blank_name() {
        let (status, body) = send(
            app(MemoryStore::new()),
            "POST",
            "/api/players",
            Some(r#"{"name":"   "}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_create_player_rejects_malformed_json() {
        let (status, _) = send(
            app(MemoryStore::new()),
            "POST",
            "/api/players",
            Some(r#"{"name":"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_player() {
        let (status, body) = send(
            app(store_with_roster().await),
            "PATCH",
            "/api/players/2",
            Some(r#"{"role":"Bowler","imageUrl":"b.png"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "B");
        assert_eq!(body["role"], "Bowler");
        assert_eq!(body["imageUrl"], "b.png");
    }

    #[tokio::test]
    async fn test_update_missing_player() {
        let (status, _) = send(
            app(MemoryStore::new()),
            "PATCH",
            "/api/players/4",
            Some(r#"{"name":"Z"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_player_cascades() {
        let app = app(store_with_roster().await);

        let (status, _) = send(app.clone(), "DELETE", "/api/players/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, records) = send(app.clone(), "GET", "/api/stats", None).await;
        let records = records.as_array().unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r["playerId"] == 2));

        let (status, _) = send(app, "DELETE", "/api/players/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
