//! JSONL (JSON Lines) storage.
//!
//! One file per entity type under the data directory. Each line is a
//! valid JSON object representing one player or one match record.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{IdSequences, RecordStore, RecordTables, StorageConfig, StorageError};
use crate::models::{
    MatchRecord, MatchRecordId, MatchRecordUpdate, NewMatchRecord, NewPlayer, Player, PlayerId,
    PlayerUpdate,
};

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single entity to the file.
    pub fn append(&self, entity: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(entity)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        debug!("Appended entity to {:?}", self.path);
        Ok(())
    }

    /// Write entities, replacing the entire file.
    ///
    /// Writes to a sibling temp file first and renames it into place.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let tmp_path = self.path.with_extension("jsonl.tmp");
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        fs::rename(&tmp_path, &self.path)?;
        debug!("Wrote {} entities to {:?}", count, self.path);

        Ok(count)
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Check if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all entities from the file. Unparseable lines are skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        self.read(false)
    }

    /// Read all entities, failing on the first unparseable line.
    ///
    /// Callers that rewrite the file use this so a bad line is reported
    /// instead of being dropped by the rewrite.
    pub fn read_all_strict(&self) -> Result<Vec<T>, StorageError> {
        self.read(true)
    }

    fn read(&self, strict: bool) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(source) if strict => {
                    return Err(StorageError::CorruptLine {
                        path: self.path.clone(),
                        line: index + 1,
                        source,
                    });
                }
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        index + 1,
                        self.path,
                        e
                    );
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

/// Record store backed by `players.jsonl` and `match_records.jsonl`,
/// with issued-id high-water marks in `sequences.json`.
///
/// Every mutation reloads both files, applies the change and rewrites
/// what changed, all under one lock. A mutation refuses to run while
/// either file has an unparseable line.
pub struct JsonlStore {
    config: StorageConfig,
    lock: Mutex<()>,
}

impl JsonlStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    fn read_players(&self) -> Result<Vec<Player>, StorageError> {
        JsonlReader::new(self.config.players_path()).read_all()
    }

    fn read_match_records(&self) -> Result<Vec<MatchRecord>, StorageError> {
        JsonlReader::new(self.config.match_records_path()).read_all()
    }

    fn read_sequences(&self) -> Result<IdSequences, StorageError> {
        let path = self.config.sequences_path();
        if !path.exists() {
            return Ok(IdSequences::default());
        }
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    /// Load both tables for a mutation.
    fn load(&self) -> Result<RecordTables, StorageError> {
        let players = JsonlReader::new(self.config.players_path()).read_all_strict()?;
        let match_records = JsonlReader::new(self.config.match_records_path()).read_all_strict()?;
        Ok(RecordTables::new(players, match_records).with_sequences(self.read_sequences()?))
    }

    fn save_sequences(&self, tables: &RecordTables) -> Result<(), StorageError> {
        let path = self.config.sequences_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string(&tables.sequences)?)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn save_players(&self, tables: &RecordTables) -> Result<(), StorageError> {
        JsonlWriter::new(self.config.players_path()).write_all(&tables.players)?;
        Ok(())
    }

    fn save_match_records(&self, tables: &RecordTables) -> Result<(), StorageError> {
        JsonlWriter::new(self.config.match_records_path()).write_all(&tables.match_records)?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonlStore {
    async fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        self.read_players()
    }

    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, StorageError> {
        Ok(self.read_players()?.into_iter().find(|p| p.id == id))
    }

    async fn create_player(&self, player: NewPlayer) -> Result<Player, StorageError> {
        let _guard = self.lock.lock().await;
        let mut tables = self.load()?;
        let player = tables.create_player(player);

        JsonlWriter::new(self.config.players_path()).append(&player)?;
        self.save_sequences(&tables)?;
        info!(player_id = player.id, "Created player {}", player.name);
        Ok(player)
    }

    async fn update_player(
        &self,
        id: PlayerId,
        update: PlayerUpdate,
    ) -> Result<Player, StorageError> {
        let _guard = self.lock.lock().await;
        let mut tables = self.load()?;
        let player = tables.update_player(id, update)?;

        self.save_players(&tables)?;
        info!(player_id = id, "Updated player");
        Ok(player)
    }

    async fn delete_player(&self, id: PlayerId) -> Result<usize, StorageError> {
        let _guard = self.lock.lock().await;
        let mut tables = self.load()?;
        let removed = tables.delete_player(id)?;

        self.save_match_records(&tables)?;
        self.save_players(&tables)?;
        self.save_sequences(&tables)?;
        info!(player_id = id, removed, "Deleted player and their match records");
        Ok(removed)
    }

    async fn list_match_records(&self) -> Result<Vec<MatchRecord>, StorageError> {
        self.read_match_records()
    }

    async fn add_match_record(&self, record: NewMatchRecord) -> Result<MatchRecord, StorageError> {
        let _guard = self.lock.lock().await;
        let mut tables = self.load()?;
        let record = tables.add_match_record(record)?;

        JsonlWriter::new(self.config.match_records_path()).append(&record)?;
        self.save_sequences(&tables)?;
        info!(
            record_id = record.id,
            player_id = record.player_id,
            "Recorded match performance"
        );
        Ok(record)
    }

    async fn update_match_record(
        &self,
        id: MatchRecordId,
        update: MatchRecordUpdate,
    ) -> Result<MatchRecord, StorageError> {
        let _guard = self.lock.lock().await;
        let mut tables = self.load()?;
        let record = tables.update_match_record(id, update)?;

        self.save_match_records(&tables)?;
        info!(record_id = id, "Updated match record");
        Ok(record)
    }

    async fn delete_match_record(&self, id: MatchRecordId) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut tables = self.load()?;
        tables.delete_match_record(id)?;

        self.save_match_records(&tables)?;
        self.save_sequences(&tables)?;
        info!(record_id = id, "Deleted match record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Overs, PlayerRole};
    use chrono::NaiveDate;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestEntity {
        id: String,
        value: u32,
    }

    fn test_store(temp_dir: &TempDir) -> JsonlStore {
        JsonlStore::new(StorageConfig::new(temp_dir.path().to_path_buf()))
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 9).unwrap()
    }

    #[test]
    fn test_jsonl_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.jsonl");

        let entities = vec![
            TestEntity {
                id: "1".to_string(),
                value: 100,
            },
            TestEntity {
                id: "2".to_string(),
                value: 200,
            },
        ];

        let writer: JsonlWriter<TestEntity> = JsonlWriter::new(path.clone());
        assert_eq!(writer.write_all(&entities).unwrap(), 2);

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap(), entities);
    }

    #[test]
    fn test_jsonl_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let reader: JsonlReader<TestEntity> =
            JsonlReader::new(temp_dir.path().join("nonexistent.jsonl"));

        assert!(!reader.exists());
        assert!(reader.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_jsonl_skips_corrupt_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mixed.jsonl");
        fs::write(
            &path,
            "{\"id\":\"1\",\"value\":1}\nnot json\n\n{\"id\":\"2\",\"value\":2}\n",
        )
        .unwrap();

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        let entities = reader.read_all().unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[1].value, 2);
    }

    #[tokio::test]
    async fn test_store_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();

        {
            let store = test_store(&temp_dir);
            let player = store
                .create_player(NewPlayer::new("Ronaldo").with_role(PlayerRole::Batsman))
                .await
                .unwrap();
            store
                .add_match_record(
                    NewMatchRecord::new(player.id, date())
                        .batting(64, 40)
                        .bowling(Overs::raw("2.3"), 1, 19),
                )
                .await
                .unwrap();
        }

        let store = test_store(&temp_dir);
        let players = store.list_players().await.unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].role, PlayerRole::Batsman);

        let records = store.list_match_records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].overs_bowled.as_str(), "2.3");
        assert_eq!(records[0].runs, 64);
    }

    #[tokio::test]
    async fn test_store_delete_player_cascades_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let a = store.create_player(NewPlayer::new("A")).await.unwrap();
        let b = store.create_player(NewPlayer::new("B")).await.unwrap();
        store
            .add_match_record(NewMatchRecord::new(a.id, date()))
            .await
            .unwrap();
        store
            .add_match_record(NewMatchRecord::new(b.id, date()).dismissed_by(a.id))
            .await
            .unwrap();

        assert_eq!(store.delete_player(a.id).await.unwrap(), 1);

        let reopened = test_store(&temp_dir);
        assert_eq!(reopened.get_player(a.id).await.unwrap(), None);
        let records = reopened.list_match_records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].player_id, b.id);
        assert_eq!(records[0].wicket_taken_by, None);
    }

    #[tokio::test]
    async fn test_store_update_and_delete_match_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let p = store.create_player(NewPlayer::new("Dilip")).await.unwrap();
        let record = store
            .add_match_record(NewMatchRecord::new(p.id, date()).batting(5, 9))
            .await
            .unwrap();

        let updated = store
            .update_match_record(
                record.id,
                MatchRecordUpdate {
                    runs: Some(51),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.runs, 51);
        assert_eq!(store.list_match_records().await.unwrap()[0].runs, 51);

        store.delete_match_record(record.id).await.unwrap();
        assert!(store.list_match_records().await.unwrap().is_empty());
        assert!(matches!(
            store.delete_match_record(record.id).await,
            Err(StorageError::MatchRecordNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_store_rejects_unknown_player() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let err = store
            .add_match_record(NewMatchRecord::new(3, date()))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::UnknownPlayer(3)));
        assert!(!temp_dir.path().join("match_records.jsonl").exists());
    }

    #[test]
    fn test_jsonl_strict_read_reports_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mixed.jsonl");
        fs::write(&path, "{\"id\":\"1\",\"value\":1}\nnot json\n").unwrap();

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        assert!(matches!(
            reader.read_all_strict(),
            Err(StorageError::CorruptLine { line: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_store_keeps_corrupt_line_on_mutation() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        store.create_player(NewPlayer::new("A")).await.unwrap();
        store.create_player(NewPlayer::new("B")).await.unwrap();

        let players_path = temp_dir.path().join("players.jsonl");
        let mut contents = fs::read_to_string(&players_path).unwrap();
        contents.push_str("{\"id\":3,\"name\":\"C\",}\n");
        fs::write(&players_path, &contents).unwrap();

        // Reads skip the bad line
        assert_eq!(store.list_players().await.unwrap().len(), 2);

        let rename = PlayerUpdate {
            name: Some("Z".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            store.update_player(1, rename).await,
            Err(StorageError::CorruptLine { line: 3, .. })
        ));
        assert!(matches!(
            store.create_player(NewPlayer::new("D")).await,
            Err(StorageError::CorruptLine { .. })
        ));
        assert_eq!(fs::read_to_string(&players_path).unwrap(), contents);
    }

    #[tokio::test]
    async fn test_store_does_not_reuse_deleted_ids() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        store.create_player(NewPlayer::new("A")).await.unwrap();
        let b = store.create_player(NewPlayer::new("B")).await.unwrap();
        store.delete_player(b.id).await.unwrap();

        let reopened = test_store(&temp_dir);
        let c = reopened.create_player(NewPlayer::new("C")).await.unwrap();
        assert_eq!(c.id, 3);
    }
}
