//! In-process player and match record tables.

use serde::{Deserialize, Serialize};

use super::StorageError;
use crate::models::{
    MatchRecord, MatchRecordId, MatchRecordUpdate, NewMatchRecord, NewPlayer, Player, PlayerId,
    PlayerUpdate,
};

/// Highest ids ever issued. Deleted ids are never handed out again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdSequences {
    #[serde(default)]
    pub player: PlayerId,

    #[serde(default)]
    pub match_record: MatchRecordId,
}

/// Both tables plus the relational rules between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordTables {
    pub players: Vec<Player>,
    pub match_records: Vec<MatchRecord>,
    #[serde(default)]
    pub sequences: IdSequences,
}

impl RecordTables {
    pub fn new(players: Vec<Player>, match_records: Vec<MatchRecord>) -> Self {
        let sequences = IdSequences {
            player: players.iter().map(|p| p.id).max().unwrap_or(0),
            match_record: match_records.iter().map(|r| r.id).max().unwrap_or(0),
        };
        Self {
            players,
            match_records,
            sequences,
        }
    }

    /// Raise the sequences to a previously persisted high-water mark.
    pub fn with_sequences(mut self, persisted: IdSequences) -> Self {
        self.sequences.player = self.sequences.player.max(persisted.player);
        self.sequences.match_record = self.sequences.match_record.max(persisted.match_record);
        self
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn has_player(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    fn next_player_id(&mut self) -> PlayerId {
        self.sequences.player += 1;
        self.sequences.player
    }

    fn next_match_record_id(&mut self) -> MatchRecordId {
        self.sequences.match_record += 1;
        self.sequences.match_record
    }

    /// Both the owner and the dismissing player must exist, and a player
    /// cannot be dismissed by themselves.
    fn check_references(&self, record: &MatchRecord) -> Result<(), StorageError> {
        if !self.has_player(record.player_id) {
            return Err(StorageError::UnknownPlayer(record.player_id));
        }
        if let Some(bowler) = record.wicket_taken_by {
            if bowler == record.player_id {
                return Err(StorageError::SelfDismissal(bowler));
            }
            if !self.has_player(bowler) {
                return Err(StorageError::UnknownPlayer(bowler));
            }
        }
        Ok(())
    }

    pub fn create_player(&mut self, input: NewPlayer) -> Player {
        let player = input.into_player(self.next_player_id());
        self.players.push(player.clone());
        player
    }

    pub fn update_player(
        &mut self,
        id: PlayerId,
        update: PlayerUpdate,
    ) -> Result<Player, StorageError> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StorageError::PlayerNotFound(id))?;
        update.apply(player);
        Ok(player.clone())
    }

    /// Remove a player with their records. Other players' records that
    /// name this player as the dismissing bowler lose that reference.
    pub fn delete_player(&mut self, id: PlayerId) -> Result<usize, StorageError> {
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        if self.players.len() == before {
            return Err(StorageError::PlayerNotFound(id));
        }

        let records_before = self.match_records.len();
        self.match_records.retain(|r| r.player_id != id);
        let removed = records_before - self.match_records.len();

        for record in &mut self.match_records {
            if record.wicket_taken_by == Some(id) {
                record.wicket_taken_by = None;
            }
        }

        Ok(removed)
    }

    pub fn add_match_record(&mut self, input: NewMatchRecord) -> Result<MatchRecord, StorageError> {
        let mut record = input.into_record(0);
        self.check_references(&record)?;
        record.id = self.next_match_record_id();
        self.match_records.push(record.clone());
        Ok(record)
    }

    pub fn update_match_record(
        &mut self,
        id: MatchRecordId,
        update: MatchRecordUpdate,
    ) -> Result<MatchRecord, StorageError> {
        let index = self
            .match_records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StorageError::MatchRecordNotFound(id))?;

        let mut updated = self.match_records[index].clone();
        update.apply(&mut updated);
        self.check_references(&updated)?;

        self.match_records[index] = updated.clone();
        Ok(updated)
    }

    pub fn delete_match_record(&mut self, id: MatchRecordId) -> Result<(), StorageError> {
        let before = self.match_records.len();
        self.match_records.retain(|r| r.id != id);
        if self.match_records.len() == before {
            return Err(StorageError::MatchRecordNotFound(id));
        }
        Ok(())
    }
}
