//! Derived statistics models.
//!
//! Nothing here is persisted; every value is recomputed from the current
//! player and match records on each read.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Overs, Player, PlayerId};

/// Wickets and runs conceded in a single spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowlingFigures {
    pub wickets: u32,
    pub runs_conceded: u32,
}

impl BowlingFigures {
    pub fn new(wickets: u32, runs_conceded: u32) -> Self {
        Self {
            wickets,
            runs_conceded,
        }
    }

    /// More wickets wins; equal wickets go to fewer runs conceded.
    pub fn is_better_than(&self, other: &BowlingFigures) -> bool {
        self.wickets > other.wickets
            || (self.wickets == other.wickets && self.runs_conceded < other.runs_conceded)
    }
}

impl fmt::Display for BowlingFigures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.wickets, self.runs_conceded)
    }
}

/// Text shown when a player has no bowling figures.
pub const NO_BOWLING_FIGURES: &str = "N/A";

/// A player plus career statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatistics {
    #[serde(flatten)]
    pub player: Player,

    /// Every record counts as one match played
    pub matches: u32,

    pub total_runs: u64,

    /// Balls faced while batting
    pub total_balls: u64,

    pub total_wickets: u64,

    pub total_runs_conceded: u64,

    /// Legal balls bowled
    pub total_balls_bowled: u64,

    /// Display form of `total_balls_bowled`, e.g. "1.4"
    pub overs_bowled: Overs,

    /// Runs per match (2 dp)
    pub batting_average: f64,

    /// Runs per 100 balls faced (2 dp)
    pub strike_rate: f64,

    /// Runs conceded per wicket (2 dp)
    pub bowling_average: f64,

    /// Runs conceded per over (2 dp)
    pub economy_rate: f64,

    pub fifties: u32,

    pub hundreds: u32,

    /// Highest single-match score
    pub best_batting: u32,

    /// "W/R", or "N/A"
    pub best_bowling: String,
}

impl PlayerStatistics {
    /// Statistics for a player with no records.
    pub fn empty(player: Player) -> Self {
        Self {
            player,
            matches: 0,
            total_runs: 0,
            total_balls: 0,
            total_wickets: 0,
            total_runs_conceded: 0,
            total_balls_bowled: 0,
            overs_bowled: Overs::from_balls(0),
            batting_average: 0.0,
            strike_rate: 0.0,
            bowling_average: 0.0,
            economy_rate: 0.0,
            fifties: 0,
            hundreds: 0,
            best_batting: 0,
            best_bowling: NO_BOWLING_FIGURES.to_string(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.player.id
    }
}

/// One player's totals within a calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPerformance {
    #[serde(flatten)]
    pub player: Player,
    pub matches: u32,
    pub runs: u64,
    pub wickets: u64,
}

/// Dismissals between two players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHead {
    pub player1: PlayerId,
    pub player2: PlayerId,

    /// Times player 1 was dismissed by player 2
    pub player1_out_by_player2: u32,

    /// Times player 2 was dismissed by player 1
    pub player2_out_by_player1: u32,

    /// Runs player 1 made in the innings player 2 ended
    pub player1_runs_when_out_by_player2: u64,

    /// Runs player 2 made in the innings player 1 ended
    pub player2_runs_when_out_by_player1: u64,
}

/// A player singled out on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leader {
    pub player_id: PlayerId,
    pub name: String,
    pub value: u64,
}

/// Roster-wide headline numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaders {
    /// Sum of every player's match count
    pub total_matches: u32,
    pub top_run_scorer: Option<Leader>,
    pub top_wicket_taker: Option<Leader>,
}
