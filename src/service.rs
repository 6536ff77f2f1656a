//! Statistics read paths.
//!
//! Fetches snapshots from a [`RecordStore`] and hands them to the pure
//! engine in [`crate::calculate`]. Results are never cached; each call
//! reflects the store at the time of the call.

use thiserror::Error;
use tracing::{debug, info};

use crate::calculate;
use crate::models::{
    HeadToHead, Leaders, MonthlyPerformance, NewPlayer, PlayerId, PlayerStatistics,
};
use crate::storage::{RecordStore, StorageError};

/// Errors from the statistics read paths.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("Head to head needs two different players, got {0} twice")]
    SamePlayer(PlayerId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Statistics for every player, in player creation order.
pub async fn list_all_player_statistics(
    store: &dyn RecordStore,
) -> Result<Vec<PlayerStatistics>, ServiceError> {
    let (players, records) = tokio::try_join!(store.list_players(), store.list_match_records())?;
    debug!(
        players = players.len(),
        records = records.len(),
        "Computing roster statistics"
    );
    Ok(calculate::compute_all(&players, &records))
}

/// Statistics for one player.
///
/// A player with no records is found, with zeroed statistics; an unknown
/// id is [`ServiceError::PlayerNotFound`].
pub async fn get_player_statistics(
    store: &dyn RecordStore,
    id: PlayerId,
) -> Result<PlayerStatistics, ServiceError> {
    let (player, records) = tokio::try_join!(store.get_player(id), store.match_records_for(id))?;
    let player = player.ok_or(ServiceError::PlayerNotFound(id))?;

    let records: Vec<_> = records.iter().collect();
    Ok(calculate::compute_stats(&player, &records))
}

/// Monthly totals for the given calendar month.
pub async fn monthly_performance(
    store: &dyn RecordStore,
    year: i32,
    month: u32,
) -> Result<Vec<MonthlyPerformance>, ServiceError> {
    let (players, records) = tokio::try_join!(store.list_players(), store.list_match_records())?;
    Ok(calculate::monthly_performance(&players, &records, year, month))
}

/// Dismissal counts between two different existing players.
pub async fn head_to_head(
    store: &dyn RecordStore,
    player1: PlayerId,
    player2: PlayerId,
) -> Result<HeadToHead, ServiceError> {
    if player1 == player2 {
        return Err(ServiceError::SamePlayer(player1));
    }
    let (players, records) = tokio::try_join!(store.list_players(), store.list_match_records())?;
    for id in [player1, player2] {
        if !players.iter().any(|p| p.id == id) {
            return Err(ServiceError::PlayerNotFound(id));
        }
    }
    Ok(calculate::head_to_head(&records, player1, player2))
}

/// Roster-wide leaders.
pub async fn leaders(store: &dyn RecordStore) -> Result<Leaders, ServiceError> {
    let stats = list_all_player_statistics(store).await?;
    Ok(calculate::leaders(&stats))
}

/// Create the starter roster as all-rounders if the store has no players.
/// Returns how many players were created.
pub async fn seed_roster_if_empty(
    store: &dyn RecordStore,
    names: &[String],
) -> Result<usize, ServiceError> {
    if !store.list_players().await?.is_empty() {
        return Ok(0);
    }

    for name in names {
        store.create_player(NewPlayer::new(name.as_str())).await?;
    }
    info!("Seeded {} initial players", names.len());
    Ok(names.len())
}
