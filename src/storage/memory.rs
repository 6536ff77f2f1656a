//! In-memory record store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{RecordStore, RecordTables, StorageError};
use crate::models::{
    MatchRecord, MatchRecordId, MatchRecordUpdate, NewMatchRecord, NewPlayer, Player, PlayerId,
    PlayerUpdate,
};

/// Record store that lives for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<RecordTables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing players and records.
    pub fn with_records(players: Vec<Player>, match_records: Vec<MatchRecord>) -> Self {
        Self {
            tables: RwLock::new(RecordTables::new(players, match_records)),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        Ok(self.tables.read().await.players.clone())
    }

    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, StorageError> {
        Ok(self.tables.read().await.player(id).cloned())
    }

    async fn create_player(&self, player: NewPlayer) -> Result<Player, StorageError> {
        let player = self.tables.write().await.create_player(player);
        info!(player_id = player.id, "Created player {}", player.name);
        Ok(player)
    }

    async fn update_player(
        &self,
        id: PlayerId,
        update: PlayerUpdate,
    ) -> Result<Player, StorageError> {
        self.tables.write().await.update_player(id, update)
    }

    async fn delete_player(&self, id: PlayerId) -> Result<usize, StorageError> {
        let removed = self.tables.write().await.delete_player(id)?;
        info!(player_id = id, removed, "Deleted player and their match records");
        Ok(removed)
    }

    async fn list_match_records(&self) -> Result<Vec<MatchRecord>, StorageError> {
        let records = self.tables.read().await.match_records.clone();
        debug!("Read {} match records from memory", records.len());
        Ok(records)
    }

    async fn add_match_record(&self, record: NewMatchRecord) -> Result<MatchRecord, StorageError> {
        self.tables.write().await.add_match_record(record)
    }

    async fn update_match_record(
        &self,
        id: MatchRecordId,
        update: MatchRecordUpdate,
    ) -> Result<MatchRecord, StorageError> {
        self.tables.write().await.update_match_record(id, update)
    }

    async fn delete_match_record(&self, id: MatchRecordId) -> Result<(), StorageError> {
        self.tables.write().await.delete_match_record(id)
    }
}
