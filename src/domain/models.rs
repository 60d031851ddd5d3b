use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ScoringError;

pub type EntrantId = i64;
pub type SeasonId = i64;
pub type MatchId = i64;
pub type RatingValue = f64;

/// Scoring scheme of a season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreType {
    #[serde(rename = "elo")]
    Elo,
    #[serde(rename = "elo-individual-vs-team")]
    EloIndividualVsTeam,
    #[serde(rename = "3-1-0")]
    PointsBased,
}

impl ScoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreType::Elo => "elo",
            ScoreType::EloIndividualVsTeam => "elo-individual-vs-team",
            ScoreType::PointsBased => "3-1-0",
        }
    }

    pub fn is_elo(&self) -> bool {
        !matches!(self, ScoreType::PointsBased)
    }
}

impl FromStr for ScoreType {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "elo" => Ok(ScoreType::Elo),
            "elo-individual-vs-team" => Ok(ScoreType::EloIndividualVsTeam),
            "3-1-0" => Ok(ScoreType::PointsBased),
            other => Err(ScoringError::InvalidScoreType(other.to_string())),
        }
    }
}

impl fmt::Display for ScoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a match from one side's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl MatchOutcome {
    pub fn as_char(&self) -> char {
        match self {
            MatchOutcome::Win => 'W',
            MatchOutcome::Draw => 'D',
            MatchOutcome::Loss => 'L',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOutcome::Win => "W",
            MatchOutcome::Draw => "D",
            MatchOutcome::Loss => "L",
        }
    }

    /// Actual score used by the Elo formulas
    pub fn actual_score(&self) -> f64 {
        match self {
            MatchOutcome::Win => 1.0,
            MatchOutcome::Draw => 0.5,
            MatchOutcome::Loss => 0.0,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "W" => Some(MatchOutcome::Win),
            "D" => Some(MatchOutcome::Draw),
            "L" => Some(MatchOutcome::Loss),
            _ => None,
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "home" => Some(Side::Home),
            "away" => Some(Side::Away),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Season configuration; every rating computation is scoped to one season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: SeasonId,
    pub name: String,
    pub score_type: ScoreType,
    pub initial_score: RatingValue,
    pub k_factor: f64,
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntrantKind {
    Player,
    Team { members: Vec<EntrantId> },
}

/// A player or a team taking part in a season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entrant {
    pub id: EntrantId,
    pub season_id: SeasonId,
    pub name: String,
    pub kind: EntrantKind,
    pub rating: RatingValue,
    pub active: bool,
}

/// A match as submitted for registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMatch {
    pub played_at: DateTime<Utc>,
    pub home_score: i32,
    pub away_score: i32,
    pub home: Vec<EntrantId>,
    pub away: Vec<EntrantId>,
}

/// A registered match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub season_id: SeasonId,
    pub played_at: DateTime<Utc>,
    pub home_score: i32,
    pub away_score: i32,
    pub home: Vec<EntrantId>,
    pub away: Vec<EntrantId>,
}

impl Match {
    /// Chronological sort key; registration order breaks timestamp ties
    pub fn order_key(&self) -> (DateTime<Utc>, MatchId) {
        (self.played_at, self.id)
    }
}

/// One entrant's part in one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchParticipation {
    pub match_id: MatchId,
    pub entrant_id: EntrantId,
    pub side: Side,
    pub played_at: DateTime<Utc>,
    pub rating_before: RatingValue,
    pub rating_after: RatingValue,
    pub outcome: MatchOutcome,
}

impl MatchParticipation {
    pub fn order_key(&self) -> (DateTime<Utc>, MatchId) {
        (self.played_at, self.match_id)
    }

    pub fn rating_change(&self) -> RatingValue {
        self.rating_after - self.rating_before
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub entrant_id: EntrantId,
    pub achievement_type: String,
    pub achieved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_type_parsing() {
        assert_eq!("elo".parse::<ScoreType>(), Ok(ScoreType::Elo));
        assert_eq!("3-1-0".parse::<ScoreType>(), Ok(ScoreType::PointsBased));
        assert_eq!(
            "elo-individual-vs-team".parse::<ScoreType>(),
            Ok(ScoreType::EloIndividualVsTeam)
        );
        assert_eq!(
            "glicko".parse::<ScoreType>(),
            Err(ScoringError::InvalidScoreType("glicko".to_string()))
        );
    }

    #[test]
    fn test_outcome_serializes_as_letter() {
        let json = serde_json::to_string(&vec![MatchOutcome::Win, MatchOutcome::Draw]).unwrap();
        assert_eq!(json, r#"["W","D"]"#);
    }
}
