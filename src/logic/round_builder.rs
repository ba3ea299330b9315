//! Greedy construction of a single round from the unused partnerships.

use crate::logic::pairing::{PairingUniverse, Partnership};
use crate::models::PlayerId;
use std::collections::{HashMap, HashSet};

/// One match placed on a court, before it gets an id and a round number.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CourtAssignment {
    pub court: u32,
    pub team1: Partnership,
    pub team2: Partnership,
}

/// Result of building one round.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RoundOutcome {
    pub assignments: Vec<CourtAssignment>,
    /// Players not placed on any court, in roster order.
    pub byes: Vec<PlayerId>,
}

impl RoundOutcome {
    /// Nothing could be placed. Normal end-of-schedule signal, not an error.
    pub fn is_stall(&self) -> bool {
        self.assignments.is_empty()
    }
}

fn load(pair: &Partnership, match_counts: &HashMap<PlayerId, u32>) -> u32 {
    match_counts.get(&pair.0).copied().unwrap_or(0) + match_counts.get(&pair.1).copied().unwrap_or(0)
}

/// Build at most `courts` matches from the unused partnerships of `universe`.
///
/// 1. Sort unused partnerships by the summed match count of their members (stable).
/// 2. Walk them as team 1 candidates, skipping used ones and ones with a player already
///    placed this round.
/// 3. For each, scan the same list for the non-overlapping, unused, unplaced team 2 with
///    the lowest summed match count; the first minimum in scan order wins.
/// 4. Commit: mark both partnerships used, mark the four players placed, take a court.
///
/// No backtracking. Committed partnerships are marked used in `universe`.
pub fn build_round(
    universe: &mut PairingUniverse,
    match_counts: &HashMap<PlayerId, u32>,
    courts: u32,
) -> RoundOutcome {
    let mut candidates = universe.unused();
    candidates.sort_by_key(|p| load(p, match_counts));

    let mut placed: HashSet<PlayerId> = HashSet::new();
    let mut assignments = Vec::new();
    let mut court = 1;

    for team1 in &candidates {
        if court > courts {
            break;
        }
        if placed.contains(&team1.0) || placed.contains(&team1.1) || universe.is_used(team1) {
            continue;
        }

        let mut best: Option<(&Partnership, u32)> = None;
        for team2 in &candidates {
            if team1.overlaps(team2)
                || placed.contains(&team2.0)
                || placed.contains(&team2.1)
                || universe.is_used(team2)
            {
                continue;
            }
            let score = load(team2, match_counts);
            if best.map_or(true, |(_, s)| score < s) {
                best = Some((team2, score));
            }
        }

        if let Some((team2, _)) = best {
            let team2 = *team2;
            universe.mark_used(team1);
            universe.mark_used(&team2);
            placed.extend(team1.members());
            placed.extend(team2.members());
            assignments.push(CourtAssignment {
                court,
                team1: *team1,
                team2,
            });
            court += 1;
        }
    }

    let byes = universe
        .players()
        .iter()
        .filter(|p| !placed.contains(p))
        .copied()
        .collect();

    RoundOutcome { assignments, byes }
}
