//! End-to-end statistics over the JSONL store.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use cricket_ledger::service::{self, ServiceError};
use cricket_ledger::storage::{JsonlStore, RecordStore, StorageConfig};
use cricket_ledger::{MatchRecordUpdate, NewMatchRecord, NewPlayer, Overs, PlayerUpdate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn store_in(dir: &TempDir) -> JsonlStore {
    JsonlStore::new(StorageConfig::new(dir.path().to_path_buf()))
}

#[tokio::test]
async fn season_statistics_survive_reopening_the_store() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let names = vec!["Himanshu".to_string(), "Kuldeep".to_string()];
    assert_eq!(service::seed_roster_if_empty(&store, &names).await.unwrap(), 2);

    store
        .add_match_record(
            NewMatchRecord::new(1, date(2025, 3, 2))
                .batting(50, 40)
                .dismissed_by(2),
        )
        .await
        .unwrap();
    store
        .add_match_record(NewMatchRecord::new(1, date(2025, 3, 9)).batting(30, 20))
        .await
        .unwrap();
    store
        .add_match_record(
            NewMatchRecord::new(2, date(2025, 3, 9)).bowling(Overs::parse("3.4").unwrap(), 3, 20),
        )
        .await
        .unwrap();
    store
        .add_match_record(
            NewMatchRecord::new(2, date(2025, 4, 1)).bowling(Overs::parse("2").unwrap(), 3, 15),
        )
        .await
        .unwrap();

    // A fresh handle reads everything back from disk.
    let reopened = store_in(&dir);
    let stats = service::list_all_player_statistics(&reopened).await.unwrap();
    assert_eq!(stats.len(), 2);

    let himanshu = &stats[0];
    assert_eq!(himanshu.player.name, "Himanshu");
    assert_eq!(himanshu.matches, 2);
    assert_eq!(himanshu.total_runs, 80);
    assert_eq!(himanshu.batting_average, 40.0);
    assert_eq!(himanshu.strike_rate, 133.33);
    assert_eq!(himanshu.fifties, 1);
    assert_eq!(himanshu.best_batting, 50);
    assert_eq!(himanshu.best_bowling.as_str(), "0/0");

    let kuldeep = &stats[1];
    assert_eq!(kuldeep.total_wickets, 6);
    assert_eq!(kuldeep.overs_bowled.as_str(), "5.4");
    assert_eq!(kuldeep.best_bowling.as_str(), "3/15");
    assert_eq!(kuldeep.economy_rate, 6.18);

    let march = service::monthly_performance(&reopened, 2025, 3).await.unwrap();
    assert_eq!(march.len(), 2);
    assert_eq!(march[0].player.name, "Himanshu");
    assert_eq!(march[0].runs, 80);
    assert_eq!(march[1].wickets, 3);

    let h2h = service::head_to_head(&reopened, 1, 2).await.unwrap();
    assert_eq!(h2h.player1_out_by_player2, 1);
    assert_eq!(h2h.player1_runs_when_out_by_player2, 50);
    assert_eq!(h2h.player2_out_by_player1, 0);

    let board = service::leaders(&reopened).await.unwrap();
    assert_eq!(board.total_matches, 4);
    assert_eq!(board.top_run_scorer.unwrap().name, "Himanshu");
    assert_eq!(board.top_wicket_taker.unwrap().value, 6);
}

#[tokio::test]
async fn edits_and_cascading_delete_are_persisted() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let a = store.create_player(NewPlayer::new("A")).await.unwrap();
    let b = store.create_player(NewPlayer::new("B")).await.unwrap();
    let record = store
        .add_match_record(NewMatchRecord::new(a.id, date(2025, 5, 5)).batting(9, 12))
        .await
        .unwrap();
    store
        .add_match_record(
            NewMatchRecord::new(b.id, date(2025, 5, 5))
                .batting(4, 3)
                .dismissed_by(a.id),
        )
        .await
        .unwrap();

    let update = MatchRecordUpdate {
        runs: Some(101),
        ..Default::default()
    };
    store.update_match_record(record.id, update).await.unwrap();

    let renamed = PlayerUpdate {
        name: Some("Ace".to_string()),
        ..Default::default()
    };
    store.update_player(a.id, renamed).await.unwrap();

    let stats = service::get_player_statistics(&store_in(&dir), a.id).await.unwrap();
    assert_eq!(stats.player.name, "Ace");
    assert_eq!(stats.hundreds, 1);

    assert_eq!(store.delete_player(a.id).await.unwrap(), 1);

    let reopened = store_in(&dir);
    assert!(matches!(
        service::get_player_statistics(&reopened, a.id).await,
        Err(ServiceError::PlayerNotFound(_))
    ));
    let remaining = reopened.list_match_records().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].wicket_taken_by, None);
    assert_eq!(reopened.list_players().await.unwrap().len(), 1);
}
