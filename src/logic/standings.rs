//! Leaderboard from recorded scores.

use crate::models::{GameMatch, Player, PlayerId, Standing, Tournament};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

#[derive(Default)]
struct Tally {
    points: u32,
    played: u32,
    total: u32,
    byes: u32,
}

/// One pass over `matches` and the bye lists, ranked by points, then matches played,
/// then average (all descending). Players off the roster are ignored.
pub fn calculate_standings(
    players: &[Player],
    matches: &[GameMatch],
    byes_by_round: &BTreeMap<u32, Vec<PlayerId>>,
) -> Vec<Standing> {
    let mut tallies: HashMap<PlayerId, Tally> = players.iter().map(|p| (p.id, Tally::default())).collect();

    for m in matches {
        for pid in m.players() {
            let Some(t) = tallies.get_mut(&pid) else {
                continue;
            };
            t.total += 1;
            if m.completed {
                t.played += 1;
                if let Some((scored, _)) = m.points_for(pid) {
                    t.points += scored;
                }
            }
        }
    }
    for pid in byes_by_round.values().flatten() {
        if let Some(t) = tallies.get_mut(pid) {
            t.byes += 1;
        }
    }

    let mut standings: Vec<Standing> = players
        .iter()
        .map(|p| {
            let t = tallies.remove(&p.id).unwrap_or_default();
            let average = if t.played > 0 {
                f64::from(t.points) / f64::from(t.played)
            } else {
                0.0
            };
            Standing {
                player_id: p.id,
                player_name: p.name.clone(),
                points: t.points,
                matches_played: t.played,
                matches_total: t.total,
                byes: t.byes,
                average,
            }
        })
        .collect();
    standings.sort_by(compare_standings);
    standings
}

fn compare_standings(a: &Standing, b: &Standing) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.matches_played.cmp(&a.matches_played))
        .then_with(|| b.average.total_cmp(&a.average))
}

/// Current leaderboard of a tournament.
pub fn tournament_standings(tournament: &Tournament) -> Vec<Standing> {
    calculate_standings(&tournament.players, &tournament.matches, &tournament.byes_by_round)
}
