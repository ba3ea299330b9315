//! Export and import collaborators: leaderboard/match CSV (semicolon separated) and
//! tournament JSON.

use crate::models::{Leaderboard, PlayerId, Tournament, TournamentError};
use std::collections::{HashMap, HashSet};

fn export_error(e: impl std::fmt::Display) -> TournamentError {
    TournamentError::Export(e.to_string())
}

fn csv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new().delimiter(b';').from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, TournamentError> {
    let bytes = writer.into_inner().map_err(export_error)?;
    String::from_utf8(bytes).map_err(export_error)
}

/// Leaderboard as CSV, one row per player in rank order. Adjusted tables get an extra
/// column with the projected total.
pub fn leaderboard_csv(leaderboard: &Leaderboard) -> Result<String, TournamentError> {
    let mut w = csv_writer();
    let mut headers = vec!["Rank".to_string(), "Player".to_string(), "Points".to_string()];
    if let Leaderboard::Adjusted { max_matches, .. } = leaderboard {
        headers.push(format!("Adjusted ({} matches)", max_matches));
    }
    headers.extend(["Matches", "Average", "Byes"].map(String::from));
    w.write_record(&headers).map_err(export_error)?;

    for (rank, (s, adjusted)) in leaderboard.entries().into_iter().enumerate() {
        let mut row = vec![(rank + 1).to_string(), s.player_name.clone(), s.points.to_string()];
        if let Some(a) = adjusted {
            row.push(format!("{:.1}", a));
        }
        row.push(s.matches_played.to_string());
        row.push(format!("{:.1}", s.average));
        row.push(s.byes.to_string());
        w.write_record(&row).map_err(export_error)?;
    }
    finish(w)
}

/// Every match in schedule order, using the match record fields.
pub fn matches_csv(tournament: &Tournament) -> Result<String, TournamentError> {
    let mut w = csv_writer();
    w.write_record([
        "id", "round", "court", "team1_a", "team1_b", "team2_a", "team2_b", "score1", "score2", "completed",
    ])
    .map_err(export_error)?;
    let opt = |s: Option<u32>| s.map(|v| v.to_string()).unwrap_or_default();
    for m in &tournament.matches {
        w.write_record([
            m.id.to_string(),
            m.round.to_string(),
            m.court.to_string(),
            m.team1[0].to_string(),
            m.team1[1].to_string(),
            m.team2[0].to_string(),
            m.team2[1].to_string(),
            opt(m.score1),
            opt(m.score2),
            m.completed.to_string(),
        ])
        .map_err(export_error)?;
    }
    finish(w)
}

/// Whole tournament as pretty JSON (the import format).
pub fn tournament_json(tournament: &Tournament) -> Result<String, TournamentError> {
    serde_json::to_string_pretty(tournament).map_err(export_error)
}

/// Parse and sanity-check a tournament exported with [`tournament_json`].
pub fn import_tournament(json: &str) -> Result<Tournament, TournamentError> {
    let t: Tournament = serde_json::from_str(json).map_err(|e| TournamentError::InvalidImport(e.to_string()))?;
    let roster: HashSet<PlayerId> = t.players.iter().map(|p| p.id).collect();
    if roster.len() != t.players.len() {
        return Err(TournamentError::InvalidImport("duplicate player id".to_string()));
    }

    let mut playing_by_round: HashMap<u32, HashSet<PlayerId>> = HashMap::new();
    for m in &t.matches {
        let ids = m.players();
        let distinct: HashSet<PlayerId> = ids.iter().copied().collect();
        if distinct.len() != 4 {
            return Err(TournamentError::InvalidImport(format!("match {} repeats a player", m.id)));
        }
        if !ids.iter().all(|id| roster.contains(id)) {
            return Err(TournamentError::InvalidImport(format!(
                "match {} references an unknown player",
                m.id
            )));
        }
        if m.round == 0 || m.court == 0 {
            return Err(TournamentError::InvalidImport(format!("match {} has no round or court", m.id)));
        }
        if m.court > t.settings.courts {
            return Err(TournamentError::InvalidImport(format!(
                "match {} is on court {} of {}",
                m.id, m.court, t.settings.courts
            )));
        }
        let playing = playing_by_round.entry(m.round).or_default();
        if !ids.iter().all(|&id| playing.insert(id)) {
            return Err(TournamentError::InvalidImport(format!(
                "match {} double-books a player in round {}",
                m.id, m.round
            )));
        }
        if !m.completed && (m.score1.is_some() || m.score2.is_some()) {
            return Err(TournamentError::InvalidImport(format!(
                "match {} has a score but is not completed",
                m.id
            )));
        }
        if m.completed {
            match (m.score1, m.score2) {
                (Some(a), Some(b)) if a.checked_add(b) == Some(t.settings.points_per_match) => {}
                _ => {
                    return Err(TournamentError::InvalidImport(format!(
                        "match {} is completed with an inconsistent score",
                        m.id
                    )))
                }
            }
        }
    }
    Ok(t)
}
