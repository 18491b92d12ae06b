//! Authoritative match-state snapshot as delivered by the external authority.
//!
//! Every top-level branch is optional and decoded on its own: a malformed
//! branch is logged and treated as absent instead of failing the snapshot.
//! Scalar fields inside `match` and `scores` are individually tolerant
//! (`DefaultOnError`), so one bad field does not discard its siblings.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::{serde_as, DefaultOnError, DisplayFromStr};
use tracing::{debug, warn};

use crate::domain::{Card, MatchStatus, Player, PlayerId, PlaygroundEntry, Suit, TeamId};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayersBranch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<Vec<Player>>,
    /// The viewing player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<Player>,
}

/// A team lists its members either by id or as full player objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TeamMember {
    Id(PlayerId),
    Player(Player),
}

impl TeamMember {
    pub fn id(&self) -> &str {
        match self {
            TeamMember::Id(id) => id,
            TeamMember::Player(p) => &p.id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamShape {
    /// Falls back to the branch key (`team1`, `team2`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TeamId>,
    #[serde(default)]
    pub players: Vec<TeamMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_slots: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_count: Option<u32>,
}

/// Keyed by branch name (`team1`, `team2`).
pub type TeamsBranch = BTreeMap<String, TeamShape>;

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoresBranch {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_points: Option<BTreeMap<TeamId, u32>>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_wins: Option<BTreeMap<TeamId, u32>>,
}

/// Replaced wholesale whenever present; missing or malformed lists are empty.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameplayBranch {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub your_hand: Vec<Card>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub playground: Vec<PlaygroundEntry>,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchBranch {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MatchStatus>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trump_suit: Option<Suit>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_round: Option<u32>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rounds: Option<u32>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_order: Option<Vec<PlayerId>>,
    /// Negative, fractional or non-numeric values decode as absent.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_player_index: Option<u32>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_player_id: Option<PlayerId>,
}

/// Typed view of one authoritative snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players: Option<PlayersBranch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<TeamsBranch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<ScoresBranch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gameplay: Option<GameplayBranch>,
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub match_info: Option<MatchBranch>,
}

impl MatchSnapshot {
    /// Decode a raw payload. Only a non-object payload is an error.
    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        let Value::Object(mut obj) = value else {
            return Err(DomainError::decode(format!(
                "snapshot must be a JSON object, got {}",
                kind_of(&value)
            )));
        };

        Ok(Self {
            players: decode_branch(&mut obj, "players"),
            teams: decode_teams(&mut obj),
            scores: decode_branch(&mut obj, "scores"),
            gameplay: decode_branch(&mut obj, "gameplay"),
            match_info: decode_branch(&mut obj, "match"),
        })
    }

    pub fn from_json_str(s: &str) -> Result<Self, DomainError> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| DomainError::decode(format!("invalid JSON: {e}")))?;
        Self::from_value(value)
    }

    pub fn to_value(&self) -> Result<Value, DomainError> {
        serde_json::to_value(self).map_err(|e| DomainError::decode(e.to_string()))
    }
}

fn take_present(obj: &mut Map<String, Value>, name: &str) -> Option<Value> {
    match obj.remove(name) {
        None | Some(Value::Null) => None,
        Some(v) => Some(v),
    }
}

fn decode_branch<T: DeserializeOwned>(obj: &mut Map<String, Value>, name: &'static str) -> Option<T> {
    let raw = take_present(obj, name)?;
    match serde_json::from_value::<T>(raw) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(branch = name, error = %e, "dropping malformed snapshot branch");
            None
        }
    }
}

/// Teams decode per entry so one malformed team does not hide the other.
fn decode_teams(obj: &mut Map<String, Value>) -> Option<TeamsBranch> {
    let raw = take_present(obj, "teams")?;
    let Value::Object(entries) = raw else {
        warn!(branch = "teams", "dropping non-object teams branch");
        return None;
    };

    let mut teams = TeamsBranch::new();
    for (key, value) in entries {
        if value.is_null() {
            debug!(team = %key, "skipping null team entry");
            continue;
        }
        match serde_json::from_value::<TeamShape>(value) {
            Ok(shape) => {
                teams.insert(key, shape);
            }
            Err(e) => warn!(team = %key, error = %e, "dropping malformed team entry"),
        }
    }
    if teams.is_empty() {
        return None;
    }
    Some(teams)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
