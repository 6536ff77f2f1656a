//! Record store for players and match records.
//!
//! The statistics engine only ever sees snapshots; this module owns the
//! raw entities behind the [`RecordStore`] capability:
//! - `memory`: in-process store (fixtures, `--in-memory` serving)
//! - `jsonl`: JSON Lines files under the data directory
//!
//! Both delegate id assignment, reference checks and cascades to
//! [`RecordTables`].

mod jsonl;
mod memory;
mod tables;

pub use jsonl::*;
pub use memory::*;
pub use tables::*;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    MatchRecord, MatchRecordId, MatchRecordUpdate, NewMatchRecord, NewPlayer, Player, PlayerId,
    PlayerUpdate,
};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("Match record {0} not found")]
    MatchRecordNotFound(MatchRecordId),

    #[error("Match record references unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("Player {0} cannot be dismissed by themselves")]
    SelfDismissal(PlayerId),

    #[error("Unparseable line {line} in {path:?}: {source}")]
    CorruptLine {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn players_path(&self) -> PathBuf {
        self.data_dir.join("players.jsonl")
    }

    pub fn match_records_path(&self) -> PathBuf {
        self.data_dir.join("match_records.jsonl")
    }

    /// High-water marks for issued ids.
    pub fn sequences_path(&self) -> PathBuf {
        self.data_dir.join("sequences.json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Data-access capability for players and their match records.
///
/// Players own their match records: deleting a player removes them.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All players in creation order.
    async fn list_players(&self) -> Result<Vec<Player>, StorageError>;

    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, StorageError>;

    async fn create_player(&self, player: NewPlayer) -> Result<Player, StorageError>;

    async fn update_player(
        &self,
        id: PlayerId,
        update: PlayerUpdate,
    ) -> Result<Player, StorageError>;

    /// Delete a player and every match record they own.
    /// Returns how many match records went with them.
    async fn delete_player(&self, id: PlayerId) -> Result<usize, StorageError>;

    /// All match records in insertion order.
    async fn list_match_records(&self) -> Result<Vec<MatchRecord>, StorageError>;

    async fn match_records_for(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<MatchRecord>, StorageError> {
        let records = self.list_match_records().await?;
        Ok(records
            .into_iter()
            .filter(|r| r.player_id == player_id)
            .collect())
    }

    async fn add_match_record(&self, record: NewMatchRecord) -> Result<MatchRecord, StorageError>;

    async fn update_match_record(
        &self,
        id: MatchRecordId,
        update: MatchRecordUpdate,
    ) -> Result<MatchRecord, StorageError>;

    async fn delete_match_record(&self, id: MatchRecordId) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.players_path(), PathBuf::from("/data/players.jsonl"));
        assert_eq!(
            config.match_records_path(),
            PathBuf::from("/data/match_records.jsonl")
        );
        assert_eq!(
            config.sequences_path(),
            PathBuf::from("/data/sequences.json")
        );
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_storage_error_messages() {
        assert_eq!(
            StorageError::PlayerNotFound(4).to_string(),
            "Player 4 not found"
        );
        assert_eq!(
            StorageError::UnknownPlayer(9).to_string(),
            "Match record references unknown player 9"
        );
        assert_eq!(
            StorageError::SelfDismissal(2).to_string(),
            "Player 2 cannot be dismissed by themselves"
        );
    }
}
