//! Integration tests for the pairing scheduler: universe, round builder, schedule generation.

use padel_americano::logic::{build_round, PairKey, PairingUniverse, Partnership};
use padel_americano::{estimate_schedule, generate_schedule, get_schedule_stats, Player, PlayerId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};

fn roster(n: usize) -> Vec<Player> {
    (0..n).map(|i| Player::new(format!("P{i}"))).collect()
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn universe_enumerates_every_pair_once() {
    let players = roster(6);
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
    let universe = PairingUniverse::new(&ids, &mut rng());
    assert_eq!(universe.len(), 15);
    let keys: HashSet<PairKey> = universe.pairs().iter().map(|p| p.key()).collect();
    assert_eq!(keys.len(), 15);
    assert!(universe.pairs().iter().all(|p| p.0 != p.1));
}

#[test]
fn universe_is_empty_below_four_players() {
    let ids: Vec<PlayerId> = roster(3).iter().map(|p| p.id).collect();
    let universe = PairingUniverse::new(&ids, &mut rng());
    assert!(universe.is_empty());
    assert!(universe.players().is_empty());
}

#[test]
fn pair_key_ignores_order_and_used_tracking_follows_it() {
    let players = roster(4);
    let (a, b, c) = (players[0].id, players[1].id, players[2].id);
    assert_eq!(PairKey::new(a, b), PairKey::new(b, a));

    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
    let mut universe = PairingUniverse::new(&ids, &mut rng());
    universe.mark_used(&Partnership(a, b));
    assert!(universe.is_used(&Partnership(b, a)));
    assert!(!universe.is_used(&Partnership(a, c)));
    assert_eq!(universe.unused().len(), 5);

    assert!(Partnership(a, b).overlaps(&Partnership(b, c)));
    assert!(!Partnership(a, b).overlaps(&Partnership(c, players[3].id)));
}

#[test]
fn same_seed_gives_same_universe_order() {
    let ids: Vec<PlayerId> = roster(8).iter().map(|p| p.id).collect();
    let u1 = PairingUniverse::new(&ids, &mut StdRng::seed_from_u64(99));
    let u2 = PairingUniverse::new(&ids, &mut StdRng::seed_from_u64(99));
    assert_eq!(u1.pairs(), u2.pairs());
}

#[test]
fn round_builder_respects_courts_and_reports_byes() {
    let ids: Vec<PlayerId> = roster(9).iter().map(|p| p.id).collect();
    let mut universe = PairingUniverse::new(&ids, &mut rng());
    let counts: HashMap<PlayerId, u32> = ids.iter().map(|&id| (id, 0)).collect();

    let outcome = build_round(&mut universe, &counts, 1);
    assert_eq!(outcome.assignments.len(), 1);
    assert_eq!(outcome.assignments[0].court, 1);
    assert_eq!(outcome.byes.len(), 5);
    assert_eq!(universe.used_count(), 2);

    let outcome = build_round(&mut universe, &counts, 4);
    assert_eq!(outcome.assignments.len(), 2);
    assert_eq!(outcome.byes.len(), 1);
}

#[test]
fn round_builder_stalls_without_courts() {
    let ids: Vec<PlayerId> = roster(4).iter().map(|p| p.id).collect();
    let mut universe = PairingUniverse::new(&ids, &mut rng());
    let outcome = build_round(&mut universe, &HashMap::new(), 0);
    assert!(outcome.is_stall());
    assert_eq!(universe.used_count(), 0);
}

#[test]
fn fewer_than_four_players_gives_empty_schedule() {
    let schedule = generate_schedule(&roster(3), 2, 24, &mut rng());
    assert!(schedule.is_empty());
    assert_eq!(schedule.total_rounds, 0);
    assert!(schedule.byes_by_round.is_empty());
}

#[test]
fn four_players_two_courts() {
    let players = roster(4);
    let schedule = generate_schedule(&players, 2, 24, &mut rng());
    assert_eq!(schedule.total_rounds, 3);
    assert_eq!(schedule.matches.len(), 3);
    assert!(schedule.byes_by_round.values().all(|b| b.is_empty()));

    let stats = get_schedule_stats(&schedule.matches, &players);
    assert!(stats.matches_per_player.values().all(|&c| c == 3));
    assert!(stats.all_partnered);
}

#[test]
fn five_players_one_court() {
    let players = roster(5);
    let schedule = generate_schedule(&players, 1, 24, &mut rng());
    assert_eq!(schedule.total_rounds, 5);
    assert_eq!(schedule.matches.len(), 5);
    assert_eq!(schedule.byes_by_round.len(), 5);
    assert!(schedule.byes_by_round.values().all(|b| b.len() == 1));

    let stats = get_schedule_stats(&schedule.matches, &players);
    assert!(stats.matches_per_player.values().all(|&c| c == 4));
    assert!(stats.all_partnered);
}

#[test]
fn six_players_cannot_be_balanced() {
    assert!(!estimate_schedule(6, 1).perfect_schedule);
    let players = roster(6);
    let schedule = generate_schedule(&players, 1, 24, &mut rng());
    let stats = get_schedule_stats(&schedule.matches, &players);
    assert!(stats.max_matches - stats.min_matches >= 1);
    assert!(!stats.all_partnered);
}

#[test]
fn perfect_player_counts_partner_everyone_exactly_once() {
    for n in [4usize, 5, 8, 9, 12, 13] {
        let players = roster(n);
        let courts = (n / 4) as u32;
        let schedule = generate_schedule(&players, courts, 24, &mut rng());
        let stats = get_schedule_stats(&schedule.matches, &players);
        assert!(stats.all_partnered, "n={n}");
        assert!(
            stats.matches_per_player.values().all(|&c| c as usize == n - 1),
            "n={n}"
        );
        for row in stats.partnership_matrix.values() {
            assert!(row.values().all(|&c| c == 1), "n={n}");
        }
    }
}

#[test]
fn no_player_is_double_booked() {
    for n in 4..=13 {
        for courts in 1..=3 {
            let players = roster(n);
            let all: HashSet<PlayerId> = players.iter().map(|p| p.id).collect();
            let schedule = generate_schedule(&players, courts, 24, &mut rng());
            for round in 1..=schedule.total_rounds {
                let mut playing = HashSet::new();
                for m in schedule.matches.iter().filter(|m| m.round == round) {
                    assert!(m.court >= 1 && m.court <= courts);
                    for p in m.players() {
                        assert!(playing.insert(p), "n={n} courts={courts} round={round}");
                    }
                }
                let byes: HashSet<PlayerId> = schedule.byes_by_round[&round].iter().copied().collect();
                assert!(playing.is_disjoint(&byes));
                let union: HashSet<PlayerId> = playing.union(&byes).copied().collect();
                assert_eq!(union, all);
            }
        }
    }
}

#[test]
fn partnerships_never_repeat() {
    let players = roster(10);
    let schedule = generate_schedule(&players, 2, 24, &mut rng());
    let mut seen = HashSet::new();
    for m in &schedule.matches {
        assert!(seen.insert(PairKey::new(m.team1[0], m.team1[1])));
        assert!(seen.insert(PairKey::new(m.team2[0], m.team2[1])));
    }
}

#[test]
fn seeded_generation_is_reproducible() {
    let players = roster(7);
    let a = generate_schedule(&players, 1, 24, &mut StdRng::seed_from_u64(2024));
    let b = generate_schedule(&players, 1, 24, &mut StdRng::seed_from_u64(2024));
    assert_eq!(a, b);
}

#[test]
fn safety_cap_bounds_rounds() {
    let players = roster(12);
    let schedule = generate_schedule(&players, 1, 24, &mut rng());
    assert!(schedule.total_rounds <= 24);
    assert!(!schedule.is_empty());
}

#[test]
fn estimate_matches_closed_form() {
    let e = estimate_schedule(8, 2);
    assert_eq!(e.rounds, 7);
    assert_eq!(e.matches_per_player, 7);
    assert!(e.perfect_schedule);

    let e = estimate_schedule(6, 1);
    assert_eq!(e.rounds, 8);
    assert_eq!(e.matches_per_player, 5);
    assert!(!e.perfect_schedule);

    assert!(estimate_schedule(9, 3).perfect_schedule);
    assert_eq!(estimate_schedule(3, 1).rounds, 0);
    assert_eq!(estimate_schedule(8, 0).rounds, 0);
}

#[test]
fn estimate_handles_large_rosters() {
    let e = estimate_schedule(100_000, 1);
    assert!(e.perfect_schedule);
    assert_eq!(e.matches_per_player, 99_999);
    assert_eq!(e.rounds, 2_499_975_000);

    let e = estimate_schedule(u32::MAX, 1);
    assert_eq!(e.rounds, u32::MAX);
    assert!(!e.perfect_schedule);
}

#[test]
fn schedule_stats_matrix_is_symmetric() {
    let players = roster(7);
    let schedule = generate_schedule(&players, 1, 24, &mut rng());
    let stats = get_schedule_stats(&schedule.matches, &players);
    for (a, row) in &stats.partnership_matrix {
        assert_eq!(row.len(), 6);
        for (b, count) in row {
            assert_eq!(stats.partnership_matrix[b][a], *count);
        }
    }
    let total: u32 = stats.matches_per_player.values().sum();
    assert_eq!(total as usize, schedule.matches.len() * 4);
}
