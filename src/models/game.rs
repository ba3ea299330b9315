//! Match (game) and Schedule for 2v2 Americano rounds.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Which side of the net a player is on.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    One,
    Two,
}

/// A single 2v2 match on one court in one round.
///
/// Round, court and teams are fixed at creation; only the score fields change, once.
/// This is also the record shape storage and export round-trip.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    /// 1-based round index.
    pub round: u32,
    /// 1-based court index, never above the configured court count.
    pub court: u32,
    pub team1: [PlayerId; 2],
    pub team2: [PlayerId; 2],
    /// None until a score is submitted.
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub completed: bool,
}

impl GameMatch {
    pub fn new(id: MatchId, round: u32, court: u32, team1: [PlayerId; 2], team2: [PlayerId; 2]) -> Self {
        Self {
            id,
            round,
            court,
            team1,
            team2,
            score1: None,
            score2: None,
            completed: false,
        }
    }

    /// All four players, team 1 first.
    pub fn players(&self) -> [PlayerId; 4] {
        [self.team1[0], self.team1[1], self.team2[0], self.team2[1]]
    }

    /// The side `player` is on, if they play in this match.
    pub fn team_of(&self, player: PlayerId) -> Option<Team> {
        if self.team1.contains(&player) {
            Some(Team::One)
        } else if self.team2.contains(&player) {
            Some(Team::Two)
        } else {
            None
        }
    }

    /// The teammate of `player`, if they play in this match.
    pub fn partner_of(&self, player: PlayerId) -> Option<PlayerId> {
        let team = match self.team_of(player)? {
            Team::One => &self.team1,
            Team::Two => &self.team2,
        };
        team.iter().copied().find(|&p| p != player)
    }

    /// The two players across the net from `player`.
    pub fn opponents_of(&self, player: PlayerId) -> Option<[PlayerId; 2]> {
        match self.team_of(player)? {
            Team::One => Some(self.team2),
            Team::Two => Some(self.team1),
        }
    }

    /// (points scored, points conceded) for `player`. Only meaningful when completed;
    /// missing scores count as zero.
    pub fn points_for(&self, player: PlayerId) -> Option<(u32, u32)> {
        let s1 = self.score1.unwrap_or(0);
        let s2 = self.score2.unwrap_or(0);
        match self.team_of(player)? {
            Team::One => Some((s1, s2)),
            Team::Two => Some((s2, s1)),
        }
    }
}

/// Output of the pairing scheduler: every match of the tournament plus byes per round.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub matches: Vec<GameMatch>,
    /// Round -> players not in any match that round.
    pub byes_by_round: BTreeMap<u32, Vec<PlayerId>>,
    /// Last round index that produced at least one match.
    pub total_rounds: u32,
}

impl Schedule {
    /// No matches: the caller must treat this as a validation failure.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
