//! Active phase: score entry, round advancement and finishing.

use crate::models::{MatchId, Tournament, TournamentError, TournamentStatus};
use log::{debug, info};

/// Record the score of one match. Each match takes exactly one submission, and the two
/// scores must add up to the tournament's points per match.
pub fn submit_score(
    tournament: &mut Tournament,
    match_id: MatchId,
    score1: u32,
    score2: u32,
) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Active {
        return Err(TournamentError::InvalidState);
    }
    let expected = tournament.settings.points_per_match;
    let m = tournament
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if m.completed || m.score1.is_some() || m.score2.is_some() {
        return Err(TournamentError::ScoreAlreadySubmitted(match_id));
    }
    let got = score1.saturating_add(score2);
    if got != expected {
        return Err(TournamentError::InvalidScore { expected, got });
    }
    m.score1 = Some(score1);
    m.score2 = Some(score2);
    m.completed = true;
    debug!("Match {} (round {}, court {}): {}-{}", m.id, m.round, m.court, score1, score2);
    Ok(())
}

/// Move on to the next round once every match of the current one has a score.
pub fn advance_round(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Active {
        return Err(TournamentError::InvalidState);
    }
    if !tournament.is_round_complete() {
        return Err(TournamentError::IncompleteResults);
    }
    if tournament.current_round >= tournament.settings.rounds {
        return Err(TournamentError::InvalidState);
    }
    tournament.current_round += 1;
    info!("Tournament {} advanced to round {}", tournament.id, tournament.current_round);
    Ok(())
}

/// End the tournament (Active -> Completed). Unplayed matches stay unplayed; the
/// fairness adjustment covers the resulting imbalance.
pub fn finish_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Active {
        return Err(TournamentError::InvalidState);
    }
    tournament.status = TournamentStatus::Completed;
    info!("Tournament {} completed", tournament.id);
    Ok(())
}
