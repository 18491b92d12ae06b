//! Locally held, strongly typed view of a match. UI consumers read it only.

use serde::Serialize;

use crate::config::RuleConfig;
use crate::domain::state::RoundResult;
use crate::domain::{
    legal_cards, resolve_trick, Card, ConnectionState, Player, PlayerId, PlaygroundEntry, Suit,
    Team, TurnOrder,
};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::protocol::{PlaySink, PlaySubmission};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalMatchState {
    pub players: Vec<Player>,
    /// The viewing player, as last reported.
    pub me: Option<Player>,
    pub teams: Vec<Team>,
    pub hand: Vec<Card>,
    pub playground: Vec<PlaygroundEntry>,
    pub connection: ConnectionState,
    pub play_order: Vec<PlayerId>,
    pub first_player_index: Option<usize>,
}

impl LocalMatchState {
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn team(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn team_of(&self, player_id: &str) -> Option<&Team> {
        self.teams
            .iter()
            .find(|t| t.players.iter().any(|p| p.id == player_id))
    }

    /// Suit of the first card in the current trick.
    pub fn led_suit(&self) -> Option<Suit> {
        self.playground.first().map(|e| e.card.suit)
    }

    pub fn is_terminal(&self) -> bool {
        self.connection
            .match_status
            .is_some_and(|s| s.is_terminal())
    }

    pub fn is_my_turn(&self) -> bool {
        match (&self.connection.my_player_id, &self.connection.current_player_id) {
            (Some(me), Some(current)) => me == current,
            _ => false,
        }
    }

    pub fn turn_order(&self) -> TurnOrder {
        TurnOrder::new(self.play_order.clone(), self.first_player_index.unwrap_or(0))
    }

    /// Cards the viewer may play right now, for UI guidance.
    pub fn my_legal_cards(&self, rules: &RuleConfig) -> Vec<Card> {
        legal_cards(&self.hand, self.led_suit(), rules.follow_suit)
    }

    /// Resolve the playground when it already holds one card per player.
    ///
    /// `None` while the trick is still open or the trump suit is unknown.
    pub fn pending_trick_result(&self, rules: &RuleConfig) -> Option<Result<RoundResult, DomainError>> {
        let trump = self.connection.trump_suit?;
        if self.playground.is_empty() || self.playground.len() < self.players.len() {
            return None;
        }
        Some(resolve_trick(&self.playground, trump, &self.players, rules))
    }

    /// Forward a play by the viewer. Legality is left to the authority.
    pub fn submit_my_play(&self, sink: &dyn PlaySink, card: Card) -> Result<(), DomainError> {
        let me = self.connection.my_player_id.as_ref().ok_or_else(|| {
            DomainError::validation(
                ValidationKind::UnknownPlayer,
                "viewer identity not known yet",
            )
        })?;
        sink.submit(PlaySubmission::new(me.clone(), card))
    }
}
