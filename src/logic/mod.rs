//! Tournament business logic: pairing scheduler, standings, fairness, lifecycle.

pub mod fairness;
pub mod pairing;
mod play;
pub mod round_builder;
pub mod schedule;
mod setup;
mod standings;

pub use fairness::{
    adjust_standings, adjusted_leaderboard, calculate_adjusted_standings, calculate_combined_adjustment,
    calculate_fairness_stats, calculate_opponent_based_adjustment, calculate_partner_based_adjustment,
    get_players_with_fewer_matches, has_fewer_matches, sort_by_adjusted, FairnessStats, FewerMatchesInfo,
};
pub use pairing::{PairKey, PairingUniverse, Partnership, MIN_PLAYERS};
pub use play::{advance_round, finish_tournament, submit_score};
pub use round_builder::{build_round, CourtAssignment, RoundOutcome};
pub use schedule::{estimate_schedule, generate_schedule, get_schedule_stats, ScheduleEstimate, ScheduleStats};
pub use setup::start_tournament;
pub use standings::{calculate_standings, tournament_standings};
