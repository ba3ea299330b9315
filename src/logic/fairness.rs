//! Fairness adjustment: project players with fewer completed matches up to the
//! tournament's maximum match count so totals can be compared.
//!
//! The adjusted figures are transparent estimates for ranking, never recorded results.
//! All four models share the same rules and differ only in the per-match estimate:
//!
//! | model          | estimate per missing match                                   |
//! |----------------|--------------------------------------------------------------|
//! | average        | the player's own average                                     |
//! | opponent-based | average points conceded by the opponents not yet faced       |
//! | partner-based  | average points won by the partners not yet played with       |
//! | combined       | mean of the own-average and partner-based estimates          |

use crate::models::{
    AdjustedStanding, AdjustmentDetails, AdjustmentMethod, BreakdownEntry, GameMatch, Leaderboard,
    PlayerId, Standing,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Round to one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn max_matches_played(standings: &[Standing]) -> u32 {
    standings.iter().map(|s| s.matches_played).max().unwrap_or(0)
}

/// Shared skeleton of every model. `estimate` returns the per-match estimate and the
/// breakdown for a player missing `missing` matches.
fn project<F>(standings: &[Standing], mut estimate: F) -> Vec<AdjustedStanding>
where
    F: FnMut(&Standing, u32) -> (f64, AdjustmentDetails),
{
    let max = max_matches_played(standings);
    if max == 0 {
        return standings.iter().map(AdjustedStanding::zeroed).collect();
    }
    if standings.iter().all(|s| s.matches_played == max) {
        return standings.iter().map(AdjustedStanding::unchanged).collect();
    }

    standings
        .iter()
        .map(|s| {
            if s.matches_played == 0 {
                return AdjustedStanding::zeroed(s);
            }
            if s.matches_played >= max {
                return AdjustedStanding::unchanged(s);
            }
            let missing = max - s.matches_played;
            let (per_match, details) = estimate(s, missing);
            let adjusted_points = f64::from(s.points) + f64::from(missing) * per_match;
            AdjustedStanding {
                standing: s.clone(),
                adjusted_points: round1(adjusted_points),
                adjusted_average: round1(adjusted_points / f64::from(max)),
                details: Some(details),
            }
        })
        .collect()
}

/// Per-player record built from completed matches.
#[derive(Default)]
struct PlayerRecord {
    scored: u32,
    conceded: u32,
    played: u32,
    faced: HashSet<PlayerId>,
    partnered: HashSet<PlayerId>,
}

/// Completed-match history of every player in the standings.
struct MatchHistory {
    records: HashMap<PlayerId, PlayerRecord>,
    /// Stand-in average for players without a completed match.
    neutral: f64,
}

impl MatchHistory {
    fn new(standings: &[Standing], matches: &[GameMatch], points_per_match: u32) -> Self {
        let mut records: HashMap<PlayerId, PlayerRecord> = standings
            .iter()
            .map(|s| (s.player_id, PlayerRecord::default()))
            .collect();

        for m in matches.iter().filter(|m| m.completed) {
            for pid in m.players() {
                let Some(r) = records.get_mut(&pid) else {
                    continue;
                };
                if let Some((scored, conceded)) = m.points_for(pid) {
                    r.scored += scored;
                    r.conceded += conceded;
                    r.played += 1;
                }
                if let Some(opponents) = m.opponents_of(pid) {
                    r.faced.extend(opponents);
                }
                if let Some(partner) = m.partner_of(pid) {
                    r.partnered.insert(partner);
                }
            }
        }

        Self {
            records,
            neutral: f64::from(points_per_match) / 2.0,
        }
    }

    /// Average points conceded per completed match.
    fn avg_points_lost(&self, player: PlayerId) -> f64 {
        match self.records.get(&player) {
            Some(r) if r.played > 0 => f64::from(r.conceded) / f64::from(r.played),
            _ => self.neutral,
        }
    }

    /// Average points won per completed match.
    fn avg_points_won(&self, player: PlayerId) -> f64 {
        match self.records.get(&player) {
            Some(r) if r.played > 0 => f64::from(r.scored) / f64::from(r.played),
            _ => self.neutral,
        }
    }

    fn has_faced(&self, player: PlayerId, other: PlayerId) -> bool {
        self.records.get(&player).is_some_and(|r| r.faced.contains(&other))
    }

    fn has_partnered(&self, player: PlayerId, other: PlayerId) -> bool {
        self.records
            .get(&player)
            .is_some_and(|r| r.partnered.contains(&other))
    }

    /// Mean of `value` over the other players `player` has not `met`; over all other players
    /// once everyone has been met. Returns the mean and its contributors.
    fn estimate_over<M, V>(
        &self,
        standings: &[Standing],
        player: PlayerId,
        met: M,
        value: V,
    ) -> (f64, Vec<BreakdownEntry>)
    where
        M: Fn(&Self, PlayerId, PlayerId) -> bool,
        V: Fn(&Self, PlayerId) -> f64,
    {
        let others: Vec<&Standing> = standings.iter().filter(|s| s.player_id != player).collect();
        let unmet: Vec<&Standing> = others
            .iter()
            .copied()
            .filter(|s| !met(self, player, s.player_id))
            .collect();
        let pool = if unmet.is_empty() { others } else { unmet };
        if pool.is_empty() {
            return (self.neutral, Vec::new());
        }

        let values: Vec<f64> = pool.iter().map(|s| value(self, s.player_id)).collect();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let breakdown = pool
            .iter()
            .zip(&values)
            .map(|(s, &v)| BreakdownEntry {
                player_id: s.player_id,
                name: s.player_name.clone(),
                value: round1(v),
            })
            .collect();
        (mean, breakdown)
    }

    fn opponent_estimate(&self, standings: &[Standing], player: PlayerId) -> (f64, Vec<BreakdownEntry>) {
        self.estimate_over(standings, player, Self::has_faced, Self::avg_points_lost)
    }

    fn partner_estimate(&self, standings: &[Standing], player: PlayerId) -> (f64, Vec<BreakdownEntry>) {
        self.estimate_over(standings, player, Self::has_partnered, Self::avg_points_won)
    }
}

/// Average model: each missing match is worth the player's own average.
pub fn calculate_adjusted_standings(
    standings: &[Standing],
    _matches: &[GameMatch],
    _points_per_match: u32,
) -> Vec<AdjustedStanding> {
    project(standings, |s, missing| {
        (
            s.average,
            AdjustmentDetails::Average {
                missing_matches: missing,
                own_average: round1(s.average),
            },
        )
    })
}

/// Opponent-based model: each missing match is worth what the unfaced opponents
/// typically concede.
pub fn calculate_opponent_based_adjustment(
    standings: &[Standing],
    matches: &[GameMatch],
    points_per_match: u32,
) -> Vec<AdjustedStanding> {
    let history = MatchHistory::new(standings, matches, points_per_match);
    project(standings, |s, missing| {
        let (estimate, breakdown) = history.opponent_estimate(standings, s.player_id);
        (
            estimate,
            AdjustmentDetails::OpponentBased {
                missing_matches: missing,
                avg_opponent_points_lost: round1(estimate),
                estimated_additional_points: round1(f64::from(missing) * estimate),
                opponent_breakdown: breakdown,
            },
        )
    })
}

/// Partner-based model: each missing match is worth what the partners not yet played
/// with typically win.
pub fn calculate_partner_based_adjustment(
    standings: &[Standing],
    matches: &[GameMatch],
    points_per_match: u32,
) -> Vec<AdjustedStanding> {
    let history = MatchHistory::new(standings, matches, points_per_match);
    project(standings, |s, missing| {
        let (estimate, breakdown) = history.partner_estimate(standings, s.player_id);
        (
            estimate,
            AdjustmentDetails::PartnerBased {
                missing_matches: missing,
                avg_partner_points_won: round1(estimate),
                estimated_additional_points: round1(f64::from(missing) * estimate),
                partner_breakdown: breakdown,
            },
        )
    })
}

/// Combined model: mean of the own-average and partner-based estimates.
pub fn calculate_combined_adjustment(
    standings: &[Standing],
    matches: &[GameMatch],
    points_per_match: u32,
) -> Vec<AdjustedStanding> {
    let history = MatchHistory::new(standings, matches, points_per_match);
    project(standings, |s, missing| {
        let (partner, _) = history.partner_estimate(standings, s.player_id);
        let combined = (s.average + partner) / 2.0;
        (
            combined,
            AdjustmentDetails::Combined {
                missing_matches: missing,
                own_average: round1(s.average),
                partner_estimate: round1(partner),
                combined_estimate: round1(combined),
                estimated_additional_points: round1(f64::from(missing) * combined),
            },
        )
    })
}

/// Run the model named by `method`.
pub fn adjust_standings(
    method: AdjustmentMethod,
    standings: &[Standing],
    matches: &[GameMatch],
    points_per_match: u32,
) -> Vec<AdjustedStanding> {
    let model: fn(&[Standing], &[GameMatch], u32) -> Vec<AdjustedStanding> = match method {
        AdjustmentMethod::Average => calculate_adjusted_standings,
        AdjustmentMethod::OpponentBased => calculate_opponent_based_adjustment,
        AdjustmentMethod::PartnerBased => calculate_partner_based_adjustment,
        AdjustmentMethod::Combined => calculate_combined_adjustment,
    };
    model(standings, matches, points_per_match)
}

/// Adjusted points desc, then matches played desc, then adjusted average desc.
pub fn sort_by_adjusted(standings: &[AdjustedStanding]) -> Vec<AdjustedStanding> {
    let mut sorted = standings.to_vec();
    sorted.sort_by(|a, b| {
        b.adjusted_points
            .total_cmp(&a.adjusted_points)
            .then_with(|| b.standing.matches_played.cmp(&a.standing.matches_played))
            .then_with(|| b.adjusted_average.total_cmp(&a.adjusted_average))
    });
    sorted
}

/// Adjusted and ranked leaderboard for `method`.
pub fn adjusted_leaderboard(
    method: AdjustmentMethod,
    standings: &[Standing],
    matches: &[GameMatch],
    points_per_match: u32,
) -> Leaderboard {
    let rows = adjust_standings(method, standings, matches, points_per_match);
    Leaderboard::Adjusted {
        method,
        max_matches: max_matches_played(standings),
        rows: sort_by_adjusted(&rows),
    }
}

/// How evenly matches were spread across players.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FairnessStats {
    /// Standard deviation of matches played.
    pub match_variance: f64,
    /// Everyone played the same number of matches.
    pub is_balanced: bool,
    pub min_matches: u32,
    pub max_matches: u32,
    pub avg_matches: f64,
    /// Names of players below the maximum.
    pub players_with_fewer_matches: Vec<String>,
}

pub fn calculate_fairness_stats(standings: &[Standing]) -> FairnessStats {
    if standings.is_empty() {
        return FairnessStats {
            is_balanced: true,
            ..FairnessStats::default()
        };
    }

    let counts: Vec<f64> = standings.iter().map(|s| f64::from(s.matches_played)).collect();
    let min_matches = standings.iter().map(|s| s.matches_played).min().unwrap_or(0);
    let max_matches = max_matches_played(standings);
    let avg_matches = counts.iter().sum::<f64>() / counts.len() as f64;
    let variance = counts.iter().map(|c| (c - avg_matches).powi(2)).sum::<f64>() / counts.len() as f64;

    FairnessStats {
        match_variance: variance.sqrt(),
        is_balanced: max_matches == min_matches,
        min_matches,
        max_matches,
        avg_matches,
        players_with_fewer_matches: standings
            .iter()
            .filter(|s| s.matches_played < max_matches)
            .map(|s| s.player_name.clone())
            .collect(),
    }
}

/// A player below the maximum match count.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FewerMatchesInfo {
    pub name: String,
    pub matches_played: u32,
    pub max_matches: u32,
    pub difference: u32,
}

/// Players below the maximum, fewest matches first.
pub fn get_players_with_fewer_matches(standings: &[Standing]) -> Vec<FewerMatchesInfo> {
    let max_matches = max_matches_played(standings);
    let mut fewer: Vec<FewerMatchesInfo> = standings
        .iter()
        .filter(|s| s.matches_played < max_matches)
        .map(|s| FewerMatchesInfo {
            name: s.player_name.clone(),
            matches_played: s.matches_played,
            max_matches,
            difference: max_matches - s.matches_played,
        })
        .collect();
    fewer.sort_by_key(|f| f.matches_played);
    fewer
}

pub fn has_fewer_matches(standing: &Standing, all: &[Standing]) -> bool {
    standing.matches_played < max_matches_played(all)
}
