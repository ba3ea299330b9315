//! Data structures for the Americano tournament: players, matches, standings, tournament state.

mod game;
mod player;
mod standing;
mod tournament;

pub use game::{GameMatch, MatchId, Schedule, Team};
pub use player::{Player, PlayerId};
pub use standing::{
    AdjustedStanding, AdjustmentDetails, AdjustmentMethod, BreakdownEntry, Leaderboard, Standing,
};
pub use tournament::{
    Tournament, TournamentError, TournamentId, TournamentSettings, TournamentStatus,
    POINTS_PER_MATCH_OPTIONS,
};
