//! Integration tests for the tournament lifecycle, export/import and repositories.

use padel_americano::export::{import_tournament, leaderboard_csv, matches_csv, tournament_json};
use padel_americano::{
    adjusted_leaderboard, advance_round, finish_tournament, start_tournament, submit_score,
    tournament_standings, AdjustmentMethod, InMemoryRepository, JsonFileRepository, Leaderboard, Player,
    Tournament, TournamentError, TournamentRepository, TournamentStatus,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

fn tournament_with_players(n: usize, courts: u32) -> Tournament {
    let players: Vec<Player> = (0..n).map(|i| Player::new(format!("P{i}"))).collect();
    let mut t = Tournament::with_players("Friday Americano", players);
    t.update_settings(Some(24), Some(courts)).unwrap();
    t
}

fn started(n: usize, courts: u32) -> Tournament {
    let mut t = tournament_with_players(n, courts);
    start_tournament(&mut t, &mut StdRng::seed_from_u64(1)).unwrap();
    t
}

fn play_current_round(t: &mut Tournament) {
    let ids: Vec<_> = t.current_round_matches().iter().map(|m| m.id).collect();
    for id in ids {
        submit_score(t, id, 14, 10).unwrap();
    }
}

#[test]
fn player_names_are_trimmed_and_unique() {
    let mut t = Tournament::new("Club night");
    t.add_player("  Ana ").unwrap();
    assert_eq!(t.players[0].name, "Ana");
    assert_eq!(t.add_player("ana"), Err(TournamentError::DuplicatePlayerName));
    assert_eq!(t.add_player("   "), Err(TournamentError::EmptyPlayerName));

    let ben = t.add_player("Ben").unwrap();
    assert_eq!(t.rename_player(ben, "ANA"), Err(TournamentError::DuplicatePlayerName));
    t.rename_player(ben, "Benjamin").unwrap();
    assert_eq!(t.get_player(ben).unwrap().name, "Benjamin");

    t.remove_player(ben).unwrap();
    assert_eq!(t.remove_player(ben), Err(TournamentError::PlayerNotFound(ben)));
}

#[test]
fn settings_are_validated() {
    let mut t = Tournament::new("Club night");
    assert_eq!(t.update_settings(Some(21), None), Err(TournamentError::InvalidPointsPerMatch(21)));
    assert_eq!(t.update_settings(None, Some(0)), Err(TournamentError::InvalidCourts(0)));
    t.update_settings(Some(32), Some(3)).unwrap();
    assert_eq!(t.settings.points_per_match, 32);
    assert_eq!(t.settings.courts, 3);
}

#[test]
fn start_requires_four_players() {
    let mut t = tournament_with_players(3, 1);
    assert_eq!(
        start_tournament(&mut t, &mut StdRng::seed_from_u64(1)),
        Err(TournamentError::NotEnoughPlayers)
    );
    assert_eq!(t.status, TournamentStatus::Setup);
    assert!(t.matches.is_empty());
}

#[test]
fn start_generates_schedule_and_locks_roster() {
    let mut t = started(5, 1);
    assert_eq!(t.status, TournamentStatus::Active);
    assert_eq!(t.settings.rounds, 5);
    assert_eq!(t.current_round, 1);
    assert_eq!(t.current_round_matches().len(), 1);
    assert_eq!(t.current_round_byes().len(), 1);

    let id = t.players[0].id;
    assert_eq!(t.remove_player(id), Err(TournamentError::InvalidState));
    assert_eq!(t.add_player("Late"), Err(TournamentError::InvalidState));
    assert_eq!(t.update_settings(Some(16), None), Err(TournamentError::InvalidState));
}

#[test]
fn scores_are_validated_and_entered_once() {
    let mut t = started(4, 1);
    let id = t.current_round_matches()[0].id;

    assert_eq!(
        submit_score(&mut t, id, 10, 10),
        Err(TournamentError::InvalidScore { expected: 24, got: 20 })
    );
    let unknown = Uuid::new_v4();
    assert_eq!(submit_score(&mut t, unknown, 12, 12), Err(TournamentError::MatchNotFound(unknown)));

    submit_score(&mut t, id, 15, 9).unwrap();
    let m = t.get_match(id).unwrap();
    assert_eq!((m.score1, m.score2, m.completed), (Some(15), Some(9), true));
    assert_eq!(submit_score(&mut t, id, 9, 15), Err(TournamentError::ScoreAlreadySubmitted(id)));
}

#[test]
fn rounds_advance_only_when_complete() {
    let mut t = started(5, 1);
    assert_eq!(advance_round(&mut t), Err(TournamentError::IncompleteResults));

    for round in 1..=5 {
        assert_eq!(t.current_round, round);
        play_current_round(&mut t);
        assert!(t.is_round_complete());
        if round < 5 {
            advance_round(&mut t).unwrap();
        }
    }
    assert_eq!(advance_round(&mut t), Err(TournamentError::InvalidState));
    assert!(t.is_tournament_complete());

    let standings = tournament_standings(&t);
    assert!(standings.iter().all(|s| s.matches_played == 4 && s.byes == 1));

    finish_tournament(&mut t).unwrap();
    assert_eq!(t.status, TournamentStatus::Completed);
    let first = t.matches[0].id;
    assert_eq!(submit_score(&mut t, first, 12, 12), Err(TournamentError::InvalidState));
}

#[test]
fn restart_keeps_roster_and_settings() {
    let mut t = started(6, 1);
    play_current_round(&mut t);
    t.restart_tournament().unwrap();
    assert_eq!(t.status, TournamentStatus::Setup);
    assert!(t.matches.is_empty());
    assert!(t.byes_by_round.is_empty());
    assert_eq!(t.players.len(), 6);
    assert_eq!(t.settings.rounds, 0);
    assert_eq!(t.settings.courts, 1);
    assert_eq!(t.restart_tournament(), Err(TournamentError::InvalidState));
}

#[test]
fn leaderboard_csv_has_expected_columns() {
    let mut t = started(4, 1);
    play_current_round(&mut t);
    let standings = tournament_standings(&t);

    let csv = leaderboard_csv(&Leaderboard::Actual { rows: standings.clone() }).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Rank;Player;Points;Matches;Average;Byes"));
    assert_eq!(csv.lines().count(), 5);
    assert!(csv.contains(";14;1;14.0;0"));

    let adjusted = adjusted_leaderboard(AdjustmentMethod::Average, &standings, &t.matches, 24);
    let csv = leaderboard_csv(&adjusted).unwrap();
    assert!(csv.starts_with("Rank;Player;Points;Adjusted (1 matches);Matches;Average;Byes"));
}

#[test]
fn matches_csv_lists_every_match() {
    let mut t = started(5, 1);
    play_current_round(&mut t);
    let csv = matches_csv(&t).unwrap();
    assert_eq!(csv.lines().count(), t.matches.len() + 1);
    let first = t.current_round_matches()[0].id.to_string();
    let line = csv.lines().find(|l| l.starts_with(&first)).unwrap();
    assert!(line.ends_with(";14;10;true"));
    assert!(csv.lines().last().unwrap().ends_with(";;;false"));
}

#[test]
fn json_export_imports_back() {
    let mut t = started(5, 1);
    play_current_round(&mut t);
    let json = tournament_json(&t).unwrap();
    assert_eq!(import_tournament(&json).unwrap(), t);
}

#[test]
fn import_rejects_inconsistent_data() {
    assert!(matches!(import_tournament("{}"), Err(TournamentError::InvalidImport(_))));

    let mut t = started(5, 1);
    t.matches[0].team1[0] = Uuid::new_v4();
    let json = tournament_json(&t).unwrap();
    assert!(matches!(import_tournament(&json), Err(TournamentError::InvalidImport(_))));

    let mut t = started(5, 1);
    t.matches[0].score1 = Some(3);
    t.matches[0].score2 = Some(3);
    t.matches[0].completed = true;
    let json = tournament_json(&t).unwrap();
    assert!(matches!(import_tournament(&json), Err(TournamentError::InvalidImport(_))));
}

#[test]
fn import_rejects_broken_schedule_invariants() {
    let rejects = |edit: fn(&mut Tournament)| {
        let mut t = started(5, 1);
        edit(&mut t);
        let json = tournament_json(&t).unwrap();
        matches!(import_tournament(&json), Err(TournamentError::InvalidImport(_)))
    };

    // Court beyond the configured count.
    assert!(rejects(|t| t.matches[0].court = 2));
    // Two matches in one round share players (5 players, 4 per match).
    assert!(rejects(|t| t.matches[1].round = t.matches[0].round));
    // Pending match already carrying a score.
    assert!(rejects(|t| t.matches[4].score1 = Some(12)));
    // Untouched schedule still imports.
    assert!(!rejects(|_| {}));
}

fn exercise_repository(repo: &dyn TournamentRepository) {
    let t = started(4, 1);
    assert_eq!(repo.load(t.id).unwrap(), None);
    repo.save(&t).unwrap();
    assert_eq!(repo.load(t.id).unwrap(), Some(t.clone()));
    assert_eq!(repo.list_ids().unwrap(), vec![t.id]);
    assert!(repo.delete(t.id).unwrap());
    assert!(!repo.delete(t.id).unwrap());
    assert!(repo.list_ids().unwrap().is_empty());
}

#[test]
fn in_memory_repository_round_trips() {
    exercise_repository(&InMemoryRepository::new());
}

#[test]
fn json_file_repository_round_trips() {
    let dir = std::env::temp_dir().join(format!("padel-americano-test-{}", Uuid::new_v4()));
    let repo = JsonFileRepository::open(&dir).unwrap();
    exercise_repository(&repo);
    std::fs::remove_dir_all(&dir).unwrap();
}
