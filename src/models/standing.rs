//! Leaderboard rows: actual standings and fairness-adjusted standings.
//!
//! Both are derived from the roster and match list on demand and never stored as
//! the source of truth.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};

/// One player's actual results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub player_id: PlayerId,
    pub player_name: String,
    pub points: u32,
    /// Completed matches.
    pub matches_played: u32,
    /// Scheduled matches, completed or not.
    pub matches_total: u32,
    pub byes: u32,
    /// points / matches_played, 0 when nothing has been played.
    pub average: f64,
}

/// Estimation model used to project short-played players to the maximum match count.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdjustmentMethod {
    /// Own average per missing match.
    #[default]
    Average,
    /// Average points conceded by the opponents not yet faced.
    OpponentBased,
    /// Average points won by the partners not yet played with.
    PartnerBased,
    /// Mean of the own-average and partner-based estimates.
    Combined,
}

impl std::fmt::Display for AdjustmentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AdjustmentMethod::Average => "average",
            AdjustmentMethod::OpponentBased => "opponent-based",
            AdjustmentMethod::PartnerBased => "partner-based",
            AdjustmentMethod::Combined => "combined",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for AdjustmentMethod {
    type Err = crate::models::TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "average" => Ok(AdjustmentMethod::Average),
            "opponent-based" => Ok(AdjustmentMethod::OpponentBased),
            "partner-based" => Ok(AdjustmentMethod::PartnerBased),
            "combined" => Ok(AdjustmentMethod::Combined),
            other => Err(crate::models::TournamentError::UnknownAdjustmentMethod(other.to_string())),
        }
    }
}

/// A single contributor to an estimate (an unfaced opponent or an unpartnered teammate).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub player_id: PlayerId,
    pub name: String,
    /// Average points lost (opponents) or won (partners) per match, one decimal.
    pub value: f64,
}

/// How an adjusted figure was reached. Display only; ranking never reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum AdjustmentDetails {
    Average {
        missing_matches: u32,
        own_average: f64,
    },
    OpponentBased {
        missing_matches: u32,
        avg_opponent_points_lost: f64,
        estimated_additional_points: f64,
        opponent_breakdown: Vec<BreakdownEntry>,
    },
    PartnerBased {
        missing_matches: u32,
        avg_partner_points_won: f64,
        estimated_additional_points: f64,
        partner_breakdown: Vec<BreakdownEntry>,
    },
    Combined {
        missing_matches: u32,
        own_average: f64,
        partner_estimate: f64,
        combined_estimate: f64,
        estimated_additional_points: f64,
    },
}

/// A standing plus its projection to the tournament's maximum match count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdjustedStanding {
    #[serde(flatten)]
    pub standing: Standing,
    pub adjusted_points: f64,
    pub adjusted_average: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<AdjustmentDetails>,
}

impl AdjustedStanding {
    /// Adjusted figures equal to the actual ones.
    pub fn unchanged(standing: &Standing) -> Self {
        Self {
            standing: standing.clone(),
            adjusted_points: f64::from(standing.points),
            adjusted_average: standing.average,
            details: None,
        }
    }

    /// Adjusted figures forced to zero.
    pub fn zeroed(standing: &Standing) -> Self {
        Self {
            standing: standing.clone(),
            adjusted_points: 0.0,
            adjusted_average: 0.0,
            details: None,
        }
    }
}

/// A ranked table, either actual or adjusted. Consumers match on the variant instead of
/// probing rows for adjusted fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Leaderboard {
    Actual {
        rows: Vec<Standing>,
    },
    Adjusted {
        method: AdjustmentMethod,
        /// Match count every row was projected to.
        max_matches: u32,
        rows: Vec<AdjustedStanding>,
    },
}

impl Leaderboard {
    pub fn len(&self) -> usize {
        match self {
            Leaderboard::Actual { rows } => rows.len(),
            Leaderboard::Adjusted { rows, .. } => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows in rank order as (standing, adjusted points if any).
    pub fn entries(&self) -> Vec<(&Standing, Option<f64>)> {
        match self {
            Leaderboard::Actual { rows } => rows.iter().map(|s| (s, None)).collect(),
            Leaderboard::Adjusted { rows, .. } => rows
                .iter()
                .map(|a| (&a.standing, Some(a.adjusted_points)))
                .collect(),
        }
    }
}
