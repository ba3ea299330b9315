//! Tournament, TournamentSettings and TournamentStatus.

use crate::models::game::{GameMatch, MatchId, Schedule};
use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Not all matches of the current round have a score.
    IncompleteResults,
    /// Not enough players to generate a schedule (need at least 4).
    NotEnoughPlayers,
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// Player not found on the roster.
    PlayerNotFound(PlayerId),
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// Player names must not be blank.
    EmptyPlayerName,
    /// Match not found in the schedule.
    MatchNotFound(MatchId),
    /// Scores must add up to the points-per-match setting.
    InvalidScore { expected: u32, got: u32 },
    /// A score can be entered only once per match.
    ScoreAlreadySubmitted(MatchId),
    /// Points per match must be one of [`POINTS_PER_MATCH_OPTIONS`].
    InvalidPointsPerMatch(u32),
    /// At least one court is required.
    InvalidCourts(u32),
    /// Adjustment method name not recognised.
    UnknownAdjustmentMethod(String),
    /// Imported data is not a valid tournament.
    InvalidImport(String),
    /// The persistence collaborator failed.
    Storage(String),
    /// The export collaborator failed.
    Export(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::IncompleteResults => write!(f, "Not all matches of the round have a score"),
            TournamentError::NotEnoughPlayers => write!(f, "Need at least 4 players to generate a schedule"),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::PlayerNotFound(_) => write!(f, "Player not found"),
            TournamentError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
            TournamentError::EmptyPlayerName => write!(f, "Player name must not be empty"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::InvalidScore { expected, got } => {
                write!(f, "Scores must add up to {} (got {})", expected, got)
            }
            TournamentError::ScoreAlreadySubmitted(_) => write!(f, "Score for this match was already submitted"),
            TournamentError::InvalidPointsPerMatch(p) => {
                write!(f, "Points per match must be 16, 24 or 32 (got {})", p)
            }
            TournamentError::InvalidCourts(c) => write!(f, "Need at least one court (got {})", c),
            TournamentError::UnknownAdjustmentMethod(m) => write!(f, "Unknown adjustment method: {}", m),
            TournamentError::InvalidImport(msg) => write!(f, "Invalid tournament data: {}", msg),
            TournamentError::Storage(msg) => write!(f, "Storage error: {}", msg),
            TournamentError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Allowed values for points per match.
pub const POINTS_PER_MATCH_OPTIONS: [u32; 3] = [16, 24, 32];

/// Scoring and court configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentSettings {
    /// score1 + score2 of every completed match.
    pub points_per_match: u32,
    pub courts: u32,
    /// Rounds in the generated schedule; 0 until started.
    pub rounds: u32,
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self {
            points_per_match: 24,
            courts: 2,
            rounds: 0,
        }
    }
}

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Adding players and choosing settings; no schedule yet.
    #[default]
    Setup,
    /// Schedule generated; scores are being entered round by round.
    Active,
    /// Finished; standings are final.
    Completed,
}

/// Full tournament state: roster, schedule, scores and phase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub settings: TournamentSettings,
    pub players: Vec<Player>,
    /// Whole schedule, all rounds.
    pub matches: Vec<GameMatch>,
    /// 1-based round currently being played.
    pub current_round: u32,
    pub status: TournamentStatus,
    /// Round -> players sitting out that round.
    pub byes_by_round: BTreeMap<u32, Vec<PlayerId>>,
}

impl Tournament {
    /// Create a new tournament in Setup state with no players and default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
            settings: TournamentSettings::default(),
            players: Vec::new(),
            matches: Vec::new(),
            current_round: 1,
            status: TournamentStatus::Setup,
            byes_by_round: BTreeMap::new(),
        }
    }

    /// Create a tournament with an initial roster. Still in Setup until started.
    pub fn with_players(name: impl Into<String>, players: Vec<Player>) -> Self {
        Self {
            players,
            ..Self::new(name)
        }
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_match(&self, id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut GameMatch> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Trimmed, non-empty, and not used by another player (case-insensitive).
    fn validate_name<'a>(&self, name: &'a str, except: Option<PlayerId>) -> Result<&'a str, TournamentError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TournamentError::EmptyPlayerName);
        }
        let is_duplicate = self
            .players
            .iter()
            .filter(|p| Some(p.id) != except)
            .any(|p| p.name.eq_ignore_ascii_case(trimmed));
        if is_duplicate {
            return Err(TournamentError::DuplicatePlayerName);
        }
        Ok(trimmed)
    }

    /// Add a player (Setup only). Returns the new player's id.
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId, TournamentError> {
        if self.status != TournamentStatus::Setup {
            return Err(TournamentError::InvalidState);
        }
        let name = name.into();
        let trimmed = self.validate_name(&name, None)?;
        let player = Player::new(trimmed);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Remove a player by id (Setup only; the roster is fixed once scheduled).
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Setup {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?;
        self.players.remove(idx);
        Ok(())
    }

    /// Fix a typo in a player's name. Allowed in any phase; ids in matches are unaffected.
    pub fn rename_player(&mut self, player_id: PlayerId, name: &str) -> Result<(), TournamentError> {
        let trimmed = self.validate_name(name, Some(player_id))?.to_string();
        let p = self
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?;
        p.name = trimmed;
        Ok(())
    }

    /// Change points per match and/or court count (Setup only).
    pub fn update_settings(
        &mut self,
        points_per_match: Option<u32>,
        courts: Option<u32>,
    ) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Setup {
            return Err(TournamentError::InvalidState);
        }
        if let Some(p) = points_per_match {
            if !POINTS_PER_MATCH_OPTIONS.contains(&p) {
                return Err(TournamentError::InvalidPointsPerMatch(p));
            }
        }
        if let Some(c) = courts {
            if c == 0 {
                return Err(TournamentError::InvalidCourts(c));
            }
        }
        if let Some(p) = points_per_match {
            self.settings.points_per_match = p;
        }
        if let Some(c) = courts {
            self.settings.courts = c;
        }
        Ok(())
    }

    /// Install a freshly generated schedule.
    pub(crate) fn apply_schedule(&mut self, schedule: Schedule) {
        self.settings.rounds = schedule.total_rounds;
        self.matches = schedule.matches;
        self.byes_by_round = schedule.byes_by_round;
        self.current_round = 1;
    }

    /// Matches of the round being played.
    pub fn current_round_matches(&self) -> Vec<&GameMatch> {
        self.matches
            .iter()
            .filter(|m| m.round == self.current_round)
            .collect()
    }

    /// Players sitting out the round being played.
    pub fn current_round_byes(&self) -> &[PlayerId] {
        self.byes_by_round
            .get(&self.current_round)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_round_complete(&self) -> bool {
        let matches = self.current_round_matches();
        !matches.is_empty() && matches.iter().all(|m| m.completed)
    }

    pub fn is_tournament_complete(&self) -> bool {
        !self.matches.is_empty() && self.matches.iter().all(|m| m.completed)
    }

    /// Restart: back to Setup with the same roster and settings. Clears the schedule.
    pub fn restart_tournament(&mut self) -> Result<(), TournamentError> {
        if self.status == TournamentStatus::Setup {
            return Err(TournamentError::InvalidState);
        }
        self.matches.clear();
        self.byes_by_round.clear();
        self.current_round = 1;
        self.settings.rounds = 0;
        self.status = TournamentStatus::Setup;
        Ok(())
    }
}
