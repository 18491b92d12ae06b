use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::turns::PlayerId;
use crate::domain::{Card, Suit};
use crate::errors::domain::DomainError;

pub type TeamId = String;

/// Missing fields default on input; a player without an id is dropped by
/// the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub team_id: Option<TeamId>,
    pub connected: bool,
    pub is_anonymous: bool,
    pub cards_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub players: Vec<Player>,
    /// Never exceeds `total_slots`.
    pub connected_count: u32,
    pub total_slots: u32,
    pub missing_count: u32,
    /// Cumulative trick points; never decreases within a match.
    pub score: u32,
    /// Rounds won; never decreases within a match.
    pub round_wins: u32,
}

/// One card contributed to the current trick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaygroundEntry {
    pub player_id: PlayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    pub card: Card,
}

impl PlaygroundEntry {
    pub fn new(player_id: impl Into<PlayerId>, card: Card) -> Self {
        Self {
            player_id: player_id.into(),
            player_name: None,
            card,
        }
    }
}

/// Match lifecycle as reported by the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Waiting,
    Paused,
    Active,
    Finished,
    Completed,
    Cancelled,
}

impl MatchStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Waiting => "waiting",
            MatchStatus::Paused => "paused",
            MatchStatus::Active => "active",
            MatchStatus::Finished => "finished",
            MatchStatus::Completed => "completed",
            MatchStatus::Cancelled => "cancelled",
        }
    }

    /// `finished`, `completed` and `cancelled` end the match lifecycle.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            MatchStatus::Finished | MatchStatus::Completed | MatchStatus::Cancelled
        )
    }
}

impl Display for MatchStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "waiting" => Ok(MatchStatus::Waiting),
            "paused" => Ok(MatchStatus::Paused),
            "active" => Ok(MatchStatus::Active),
            "finished" => Ok(MatchStatus::Finished),
            "completed" => Ok(MatchStatus::Completed),
            "cancelled" | "canceled" => Ok(MatchStatus::Cancelled),
            other => Err(DomainError::decode(format!("unknown match status '{other}'"))),
        }
    }
}

/// Sparse match metadata. Every field merges independently.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionState {
    pub match_id: Option<String>,
    pub match_status: Option<MatchStatus>,
    pub current_round: Option<u32>,
    pub total_rounds: Option<u32>,
    pub trump_suit: Option<Suit>,
    pub current_player_id: Option<PlayerId>,
    pub current_player_name: Option<String>,
    /// The viewing player (`players.current`).
    pub my_player_id: Option<PlayerId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundQuality {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundAnalysis {
    pub round_quality: RoundQuality,
    pub round_analysis: String,
}

/// Outcome of one resolved trick. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub winner: Player,
    pub winning_team: Option<TeamId>,
    pub winning_card: Card,
    pub points_earned: u32,
    pub played_cards: Vec<PlaygroundEntry>,
    pub analysis: RoundAnalysis,
}
