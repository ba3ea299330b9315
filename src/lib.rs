//! Padel Americano organizer: library with models, the pairing scheduler, standings and
//! fairness engine, plus storage/export collaborators.

pub mod export;
pub mod logic;
pub mod models;
pub mod repository;

pub use logic::{
    adjust_standings, adjusted_leaderboard, advance_round, calculate_adjusted_standings,
    calculate_combined_adjustment, calculate_fairness_stats, calculate_opponent_based_adjustment,
    calculate_partner_based_adjustment, calculate_standings, estimate_schedule, finish_tournament,
    generate_schedule, get_players_with_fewer_matches, get_schedule_stats, has_fewer_matches,
    sort_by_adjusted, start_tournament, submit_score, tournament_standings, FairnessStats,
    FewerMatchesInfo, ScheduleEstimate, ScheduleStats,
};
pub use models::{
    AdjustedStanding, AdjustmentDetails, AdjustmentMethod, BreakdownEntry, GameMatch, Leaderboard,
    MatchId, Player, PlayerId, Schedule, Standing, Team, Tournament, TournamentError, TournamentId,
    TournamentSettings, TournamentStatus,
};
pub use repository::{InMemoryRepository, JsonFileRepository, TournamentRepository};
