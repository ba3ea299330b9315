//! Schedule generation: drive the round builder until every partnership is used,
//! plus a closed-form preview and read-only diagnostics.

use crate::logic::pairing::{PairingUniverse, MIN_PLAYERS};
use crate::logic::round_builder::build_round;
use crate::models::{GameMatch, MatchId, Player, PlayerId, Schedule};
use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Generate the whole tournament schedule for `players` on `courts` courts.
///
/// Every partnership is aimed to be played exactly once. Stops when all partnerships are
/// used, when a round cannot place a single match, or after 2·n rounds. `rng` seeds the
/// roster shuffle and the match ids, so a fixed seed gives a fixed schedule.
///
/// Fewer than 4 players yields an empty schedule, which callers must reject.
pub fn generate_schedule<R: Rng + ?Sized>(
    players: &[Player],
    courts: u32,
    points_per_match: u32,
    rng: &mut R,
) -> Schedule {
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
    let n = ids.len();
    let mut universe = PairingUniverse::new(&ids, rng);
    if universe.is_empty() {
        debug!("Not scheduling: {} players, need at least {}", n, MIN_PLAYERS);
        return Schedule::default();
    }

    let safety_cap = 2 * n as u32;
    let mut match_counts: HashMap<PlayerId, u32> = ids.iter().map(|&id| (id, 0)).collect();
    let mut matches = Vec::new();
    let mut byes_by_round = BTreeMap::new();
    let mut round = 1;

    while !universe.is_exhausted() {
        let outcome = build_round(&mut universe, &match_counts, courts);
        if outcome.is_stall() {
            warn!(
                "Round {} could not place a match; {}/{} partnerships used",
                round,
                universe.used_count(),
                universe.len()
            );
            break;
        }
        debug!(
            "Round {}: {} match(es), {} bye(s)",
            round,
            outcome.assignments.len(),
            outcome.byes.len()
        );

        for a in &outcome.assignments {
            for p in a.team1.members().into_iter().chain(a.team2.members()) {
                *match_counts.entry(p).or_insert(0) += 1;
            }
            matches.push(GameMatch::new(
                random_match_id(rng),
                round,
                a.court,
                a.team1.members(),
                a.team2.members(),
            ));
        }
        byes_by_round.insert(round, outcome.byes);

        round += 1;
        if round > safety_cap {
            warn!("Stopping schedule generation at the {} round safety cap", safety_cap);
            break;
        }
    }

    let total_rounds = round - 1;
    info!(
        "Generated {} matches over {} rounds for {} players on {} court(s), {} points per match",
        matches.len(),
        total_rounds,
        n,
        courts,
        points_per_match
    );
    Schedule {
        matches,
        byes_by_round,
        total_rounds,
    }
}

fn random_match_id<R: Rng + ?Sized>(rng: &mut R) -> MatchId {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}

/// Closed-form preview of a schedule, without generating it.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEstimate {
    pub rounds: u32,
    /// n - 1 when the schedule is perfect.
    pub matches_per_player: u32,
    /// Every pair can partner exactly once with equal match counts: n·(n−1) divisible by 4.
    pub perfect_schedule: bool,
}

/// Estimate rounds and matches per player for `num_players` on `courts` courts.
pub fn estimate_schedule(num_players: u32, courts: u32) -> ScheduleEstimate {
    if (num_players as usize) < MIN_PLAYERS {
        return ScheduleEstimate::default();
    }
    let n = num_players;
    // Each match consumes two of the n·(n−1)/2 partnerships.
    let slots = u64::from(n) * u64::from(n - 1);
    let perfect_schedule = slots % 4 == 0;
    let matches_per_round = u64::from(courts.min(n / 4));
    let rounds = if matches_per_round == 0 {
        0
    } else {
        u32::try_from(slots.div_ceil(4 * matches_per_round)).unwrap_or(u32::MAX)
    };
    ScheduleEstimate {
        rounds,
        matches_per_player: n - 1,
        perfect_schedule,
    }
}

/// Partnership coverage of a generated schedule.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStats {
    pub matches_per_player: HashMap<PlayerId, u32>,
    /// Distinct partners per player.
    pub partnerships_count: HashMap<PlayerId, u32>,
    /// player -> partner -> times partnered. Symmetric; every other roster player is present.
    pub partnership_matrix: HashMap<PlayerId, HashMap<PlayerId, u32>>,
    pub min_matches: u32,
    pub max_matches: u32,
    /// Every player partnered every other player at least once.
    pub all_partnered: bool,
}

/// Count matches and partnerships per player over `matches`. Ids off the roster are ignored.
pub fn get_schedule_stats(matches: &[GameMatch], players: &[Player]) -> ScheduleStats {
    let mut matches_per_player: HashMap<PlayerId, u32> = players.iter().map(|p| (p.id, 0)).collect();
    let mut partnership_matrix: HashMap<PlayerId, HashMap<PlayerId, u32>> = players
        .iter()
        .map(|p| {
            let row = players
                .iter()
                .filter(|q| q.id != p.id)
                .map(|q| (q.id, 0))
                .collect();
            (p.id, row)
        })
        .collect();

    for m in matches {
        for pid in m.players() {
            if let Some(c) = matches_per_player.get_mut(&pid) {
                *c += 1;
            }
        }
        for [a, b] in [m.team1, m.team2] {
            if let Some(c) = partnership_matrix.get_mut(&a).and_then(|row| row.get_mut(&b)) {
                *c += 1;
            }
            if let Some(c) = partnership_matrix.get_mut(&b).and_then(|row| row.get_mut(&a)) {
                *c += 1;
            }
        }
    }

    let partnerships_count: HashMap<PlayerId, u32> = partnership_matrix
        .iter()
        .map(|(&id, row)| (id, row.values().filter(|&&c| c > 0).count() as u32))
        .collect();
    let all_partnered = partnership_matrix
        .values()
        .all(|row| row.values().all(|&c| c > 0));
    let min_matches = matches_per_player.values().copied().min().unwrap_or(0);
    let max_matches = matches_per_player.values().copied().max().unwrap_or(0);

    ScheduleStats {
        matches_per_player,
        partnerships_count,
        partnership_matrix,
        min_matches,
        max_matches,
        all_partnered,
    }
}
