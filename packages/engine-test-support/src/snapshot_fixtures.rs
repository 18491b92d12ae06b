//! JSON snapshot fixtures in the authority's wire shape.
//!
//! The standard table: four players, `team1` = p1 + p3, `team2` = p2 + p4,
//! play order p1 → p2 → p3 → p4.

use serde_json::{json, Map, Value};

pub const PLAYER_IDS: [&str; 4] = ["p1", "p2", "p3", "p4"];
pub const PLAYER_NAMES: [&str; 4] = ["Aline", "Bosco", "Claudine", "Didier"];

pub fn team_of(idx: usize) -> &'static str {
    if idx % 2 == 0 {
        "team1"
    } else {
        "team2"
    }
}

pub fn player(idx: usize, connected: bool, cards_remaining: u32) -> Value {
    json!({
        "id": PLAYER_IDS[idx],
        "name": PLAYER_NAMES[idx],
        "teamId": team_of(idx),
        "connected": connected,
        "isAnonymous": false,
        "cardsRemaining": cards_remaining,
    })
}

pub fn players_all(cards_remaining: u32) -> Value {
    Value::Array((0..4).map(|i| player(i, true, cards_remaining)).collect())
}

pub fn teams() -> Value {
    json!({
        "team1": {"id": "team1", "players": ["p1", "p3"], "totalSlots": 2},
        "team2": {"id": "team2", "players": ["p2", "p4"], "totalSlots": 2},
    })
}

pub fn scores(team1: u32, team2: u32, wins1: u32, wins2: u32) -> Value {
    json!({
        "totalPoints": {"team1": team1, "team2": team2},
        "roundWins": {"team1": wins1, "team2": wins2},
    })
}

/// `hand` and `playground` use compact card tokens ("AH", "7S").
pub fn gameplay(hand: &[&str], playground: &[(&str, &str)]) -> Value {
    json!({
        "yourHand": hand,
        "playground": playground
            .iter()
            .map(|(player, card)| json!({"playerId": player, "card": card}))
            .collect::<Vec<_>>(),
    })
}

pub fn match_branch(id: &str, status: &str, trump: &str, current_player: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "trumpSuit": trump,
        "currentRound": 1,
        "totalRounds": 3,
        "playOrder": PLAYER_IDS,
        "firstPlayerIndex": 0,
        "currentPlayerId": current_player,
    })
}

/// Builder over a JSON object; branches are set verbatim.
#[derive(Debug, Default, Clone)]
pub struct SnapshotBuilder {
    branches: Map<String, Value>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, branch: &str, value: Value) -> Self {
        self.branches.insert(branch.to_string(), value);
        self
    }

    pub fn players(self, all: Value, current_idx: Option<usize>) -> Self {
        let mut branch = json!({"all": all});
        if let Some(idx) = current_idx {
            branch["current"] = player(idx, true, 9);
        }
        self.with("players", branch)
    }

    pub fn build(self) -> Value {
        Value::Object(self.branches)
    }
}

/// Every branch present: p1 viewing, p1 to act, nothing played yet.
pub fn full_snapshot(match_id: &str) -> Value {
    SnapshotBuilder::new()
        .players(players_all(9), Some(0))
        .with("teams", teams())
        .with("scores", scores(0, 0, 0, 0))
        .with("gameplay", gameplay(&["AH", "KH", "7S", "3C"], &[]))
        .with("match", match_branch(match_id, "active", "hearts", "p1"))
        .build()
}
