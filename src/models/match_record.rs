//! Per-match performance model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::player::deserialize_some;
use super::{MatchRecordId, Overs, PlayerId, ValidationError};

/// One player's performance in one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: MatchRecordId,

    /// Owning player
    pub player_id: PlayerId,

    /// Match date
    pub date: NaiveDate,

    #[serde(default)]
    pub runs: u32,

    /// Legacy field, often left at zero
    #[serde(default)]
    pub balls_faced: u32,

    #[serde(default)]
    pub fours: u32,

    #[serde(default)]
    pub sixes: u32,

    #[serde(default)]
    pub wickets: u32,

    /// "overs.balls" notation
    #[serde(default)]
    pub overs_bowled: Overs,

    #[serde(default)]
    pub runs_conceded: u32,

    /// Who dismissed this player; `None` means not out
    #[serde(default)]
    pub wicket_taken_by: Option<PlayerId>,
}

/// Input for recording a performance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMatchRecord {
    pub player_id: PlayerId,
    pub date: NaiveDate,
    #[serde(default)]
    pub runs: u32,
    #[serde(default)]
    pub balls_faced: u32,
    #[serde(default)]
    pub fours: u32,
    #[serde(default)]
    pub sixes: u32,
    #[serde(default)]
    pub wickets: u32,
    #[serde(default)]
    pub overs_bowled: Overs,
    #[serde(default)]
    pub runs_conceded: u32,
    #[serde(default)]
    pub wicket_taken_by: Option<PlayerId>,
}

impl NewMatchRecord {
    /// A blank performance for `player_id` on `date`.
    pub fn new(player_id: PlayerId, date: NaiveDate) -> Self {
        Self {
            player_id,
            date,
            runs: 0,
            balls_faced: 0,
            fours: 0,
            sixes: 0,
            wickets: 0,
            overs_bowled: Overs::zero(),
            runs_conceded: 0,
            wicket_taken_by: None,
        }
    }

    pub fn batting(mut self, runs: u32, balls_faced: u32) -> Self {
        self.runs = runs;
        self.balls_faced = balls_faced;
        self
    }

    pub fn bowling(mut self, overs: Overs, wickets: u32, runs_conceded: u32) -> Self {
        self.overs_bowled = overs;
        self.wickets = wickets;
        self.runs_conceded = runs_conceded;
        self
    }

    pub fn dismissed_by(mut self, bowler: PlayerId) -> Self {
        self.wicket_taken_by = Some(bowler);
        self
    }

    /// Shape checks that don't need the store.
    pub fn validate(self) -> Result<Self, ValidationError> {
        validate_overs(&self.overs_bowled)?;
        Ok(self)
    }

    pub(crate) fn into_record(self, id: MatchRecordId) -> MatchRecord {
        MatchRecord {
            id,
            player_id: self.player_id,
            date: self.date,
            runs: self.runs,
            balls_faced: self.balls_faced,
            fours: self.fours,
            sixes: self.sixes,
            wickets: self.wickets,
            overs_bowled: self.overs_bowled,
            runs_conceded: self.runs_conceded,
            wicket_taken_by: self.wicket_taken_by,
        }
    }
}

/// Partial update for a match record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecordUpdate {
    #[serde(default)]
    pub player_id: Option<PlayerId>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub runs: Option<u32>,
    #[serde(default)]
    pub balls_faced: Option<u32>,
    #[serde(default)]
    pub fours: Option<u32>,
    #[serde(default)]
    pub sixes: Option<u32>,
    #[serde(default)]
    pub wickets: Option<u32>,
    #[serde(default)]
    pub overs_bowled: Option<Overs>,
    #[serde(default)]
    pub runs_conceded: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub wicket_taken_by: Option<Option<PlayerId>>,
}

impl MatchRecordUpdate {
    pub fn validate(self) -> Result<Self, ValidationError> {
        if let Some(ref overs) = self.overs_bowled {
            validate_overs(overs)?;
        }
        Ok(self)
    }

    pub(crate) fn apply(self, record: &mut MatchRecord) {
        if let Some(v) = self.player_id {
            record.player_id = v;
        }
        if let Some(v) = self.date {
            record.date = v;
        }
        if let Some(v) = self.runs {
            record.runs = v;
        }
        if let Some(v) = self.balls_faced {
            record.balls_faced = v;
        }
        if let Some(v) = self.fours {
            record.fours = v;
        }
        if let Some(v) = self.sixes {
            record.sixes = v;
        }
        if let Some(v) = self.wickets {
            record.wickets = v;
        }
        if let Some(v) = self.overs_bowled {
            record.overs_bowled = v;
        }
        if let Some(v) = self.runs_conceded {
            record.runs_conceded = v;
        }
        if let Some(v) = self.wicket_taken_by {
            record.wicket_taken_by = v;
        }
    }
}

fn validate_overs(overs: &Overs) -> Result<(), ValidationError> {
    Overs::parse(overs.as_str())
        .map(|_| ())
        .map_err(ValidationError::Overs)
}
