//! Setup phase: start the tournament (Setup -> Active) by generating the schedule.

use crate::logic::schedule::generate_schedule;
use crate::models::{Tournament, TournamentError, TournamentStatus};
use log::info;
use rand::Rng;

/// Generate the schedule for the current roster and settings and move to Active.
///
/// An empty schedule (fewer than 4 players, or no court) is rejected with
/// `NotEnoughPlayers`; the tournament stays in Setup.
pub fn start_tournament<R: Rng + ?Sized>(tournament: &mut Tournament, rng: &mut R) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Setup {
        return Err(TournamentError::InvalidState);
    }
    let schedule = generate_schedule(
        &tournament.players,
        tournament.settings.courts,
        tournament.settings.points_per_match,
        rng,
    );
    if schedule.is_empty() {
        return Err(TournamentError::NotEnoughPlayers);
    }
    tournament.apply_schedule(schedule);
    tournament.status = TournamentStatus::Active;
    info!(
        "Tournament {} started: {} players, {} rounds",
        tournament.id,
        tournament.players.len(),
        tournament.settings.rounds
    );
    Ok(())
}
