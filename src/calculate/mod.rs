//! Statistics calculation engine.
//!
//! Pure functions over a snapshot of players and match records:
//! - Career statistics per player (averages, rates, milestones, bests)
//! - Partitioning records by player for the whole roster
//! - Monthly totals, head-to-head dismissals and dashboard leaders
//!
//! Nothing here performs I/O or keeps state between calls.

use std::collections::HashMap;

use chrono::Datelike;

use crate::models::{
    total_balls, BowlingFigures, HeadToHead, Leader, Leaders, MatchRecord, MonthlyPerformance,
    Overs, Player, PlayerId, PlayerStatistics, BALLS_PER_OVER, NO_BOWLING_FIGURES,
};

const FIFTY: u32 = 50;
const HUNDRED: u32 = 100;

/// Round `numerator / denominator` to 2 decimal places, half away from zero.
///
/// Works on the exact integer ratio so boundary values such as 33.335
/// round up instead of falling victim to binary representation.
/// Returns 0 for a zero denominator.
pub fn round_ratio(numerator: u128, denominator: u128) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let num = numerator * 100;
    let hundredths = (2 * num + denominator) / (2 * denominator);
    hundredths as f64 / 100.0
}

/// Sum per-record counters without overflowing the `u32` they are stored in.
fn sum_u64(values: impl Iterator<Item = u32>) -> u64 {
    values.map(u64::from).sum()
}

/// Calculate batting average (runs per match).
pub fn calculate_batting_average(total_runs: u64, matches: u32) -> f64 {
    round_ratio(u128::from(total_runs), u128::from(matches))
}

/// Calculate strike rate (runs per 100 balls faced).
pub fn calculate_strike_rate(total_runs: u64, balls_faced: u64) -> f64 {
    round_ratio(u128::from(total_runs) * 100, u128::from(balls_faced))
}

/// Calculate bowling average (runs conceded per wicket).
pub fn calculate_bowling_average(runs_conceded: u64, wickets: u64) -> f64 {
    round_ratio(u128::from(runs_conceded), u128::from(wickets))
}

/// Calculate economy rate (runs conceded per over) from legal balls.
pub fn calculate_economy_rate(runs_conceded: u64, balls_bowled: u64) -> f64 {
    round_ratio(
        u128::from(runs_conceded) * u128::from(BALLS_PER_OVER),
        u128::from(balls_bowled),
    )
}

/// Select the best bowling figures across records.
///
/// Folds from a floor of no wickets and unbounded runs conceded, so any
/// record beats the floor. `None` only when there are no records.
pub fn best_bowling<'a, I>(records: I) -> Option<BowlingFigures>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    records
        .into_iter()
        .map(|r| BowlingFigures::new(r.wickets, r.runs_conceded))
        .fold(None, |best, candidate| match best {
            Some(best) if !candidate.is_better_than(&best) => Some(best),
            _ => Some(candidate),
        })
}

/// Compute career statistics for one player from that player's records.
pub fn compute_stats(player: &Player, records: &[&MatchRecord]) -> PlayerStatistics {
    let matches = records.len() as u32;

    let total_balls_bowled = total_balls(records.iter().map(|r| &r.overs_bowled));
    let total_runs = sum_u64(records.iter().map(|r| r.runs));
    let total_balls = sum_u64(records.iter().map(|r| r.balls_faced));
    let total_wickets = sum_u64(records.iter().map(|r| r.wickets));
    let total_runs_conceded = sum_u64(records.iter().map(|r| r.runs_conceded));

    let fifties = records
        .iter()
        .filter(|r| (FIFTY..HUNDRED).contains(&r.runs))
        .count() as u32;
    let hundreds = records.iter().filter(|r| r.runs >= HUNDRED).count() as u32;
    let best_batting = records.iter().map(|r| r.runs).max().unwrap_or(0);

    let best_bowling = best_bowling(records.iter().copied())
        .map(|f| f.to_string())
        .unwrap_or_else(|| NO_BOWLING_FIGURES.to_string());

    PlayerStatistics {
        player: player.clone(),
        matches,
        total_runs,
        total_balls,
        total_wickets,
        total_runs_conceded,
        total_balls_bowled,
        overs_bowled: Overs::from_balls(total_balls_bowled),
        batting_average: calculate_batting_average(total_runs, matches),
        strike_rate: calculate_strike_rate(total_runs, total_balls),
        bowling_average: calculate_bowling_average(total_runs_conceded, total_wickets),
        economy_rate: calculate_economy_rate(total_runs_conceded, total_balls_bowled),
        fifties,
        hundreds,
        best_batting,
        best_bowling,
    }
}

/// Group records by owning player, keeping record order within each group.
pub fn partition_by_player(records: &[MatchRecord]) -> HashMap<PlayerId, Vec<&MatchRecord>> {
    let mut by_player: HashMap<PlayerId, Vec<&MatchRecord>> = HashMap::new();
    for record in records {
        by_player.entry(record.player_id).or_default().push(record);
    }
    by_player
}

/// Compute statistics for every player, in player order.
///
/// Records whose owner is not in `players` are ignored.
pub fn compute_all(players: &[Player], records: &[MatchRecord]) -> Vec<PlayerStatistics> {
    let by_player = partition_by_player(records);

    players
        .iter()
        .map(|p| {
            let own = by_player.get(&p.id).map(Vec::as_slice).unwrap_or(&[]);
            compute_stats(p, own)
        })
        .collect()
}

/// Per-player totals for one calendar month, most runs first.
///
/// Players without a match that month are left out; equal run totals keep
/// player order.
pub fn monthly_performance(
    players: &[Player],
    records: &[MatchRecord],
    year: i32,
    month: u32,
) -> Vec<MonthlyPerformance> {
    let in_month: Vec<MatchRecord> = records
        .iter()
        .filter(|r| r.date.year() == year && r.date.month() == month)
        .cloned()
        .collect();
    let by_player = partition_by_player(&in_month);

    let mut rows: Vec<MonthlyPerformance> = players
        .iter()
        .filter_map(|p| {
            let own = by_player.get(&p.id)?;
            Some(MonthlyPerformance {
                player: p.clone(),
                matches: own.len() as u32,
                runs: sum_u64(own.iter().map(|r| r.runs)),
                wickets: sum_u64(own.iter().map(|r| r.wickets)),
            })
        })
        .collect();

    rows.sort_by(|a, b| b.runs.cmp(&a.runs));
    rows
}

/// Count dismissals between two players.
pub fn head_to_head(records: &[MatchRecord], player1: PlayerId, player2: PlayerId) -> HeadToHead {
    let dismissals = |batter: PlayerId, bowler: PlayerId| -> (u32, u64) {
        records
            .iter()
            .filter(|r| r.player_id == batter && r.wicket_taken_by == Some(bowler))
            .fold((0, 0), |(count, runs), r| {
                (count + 1, runs + u64::from(r.runs))
            })
    };

    let (p1_out, p1_runs) = dismissals(player1, player2);
    let (p2_out, p2_runs) = dismissals(player2, player1);

    HeadToHead {
        player1,
        player2,
        player1_out_by_player2: p1_out,
        player2_out_by_player1: p2_out,
        player1_runs_when_out_by_player2: p1_runs,
        player2_runs_when_out_by_player1: p2_runs,
    }
}

/// Dashboard headline numbers. Ties go to the later player.
pub fn leaders(stats: &[PlayerStatistics]) -> Leaders {
    let leader = |s: &PlayerStatistics, value: u64| Leader {
        player_id: s.player.id,
        name: s.player.name.clone(),
        value,
    };

    Leaders {
        total_matches: stats.iter().map(|s| s.matches).sum(),
        top_run_scorer: stats
            .iter()
            .max_by_key(|s| s.total_runs)
            .map(|s| leader(s, s.total_runs)),
        top_wicket_taker: stats
            .iter()
            .max_by_key(|s| s.total_wickets)
            .map(|s| leader(s, s.total_wickets)),
    }
}
