//! Legal-card constraints and turn rotation.

use serde::{Deserialize, Serialize};

use crate::config::FollowSuitPolicy;
use crate::domain::{hand_has_suit, Card, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

pub type PlayerId = String;

/// Cards `hand` may legally play when `led` is the suit led in the current trick.
///
/// With no lead yet, the whole hand is legal. Hand order is preserved.
pub fn legal_cards(hand: &[Card], led: Option<Suit>, policy: FollowSuitPolicy) -> Vec<Card> {
    match (policy, led) {
        (FollowSuitPolicy::Enforced, Some(lead)) if hand_has_suit(hand, lead) => {
            hand.iter().copied().filter(|c| c.suit == lead).collect()
        }
        _ => hand.to_vec(),
    }
}

/// Check a single play against the hand and the follow-suit policy.
pub fn validate_play(
    hand: &[Card],
    card: Card,
    led: Option<Suit>,
    policy: FollowSuitPolicy,
) -> Result<(), DomainError> {
    if !hand.contains(&card) {
        return Err(DomainError::validation(
            ValidationKind::CardNotInHand,
            format!("{} is not in hand", card.id()),
        ));
    }
    if !legal_cards(hand, led, policy).contains(&card) {
        return Err(DomainError::validation(
            ValidationKind::MustFollowSuit,
            format!("must follow {}", led.map(Suit::as_str).unwrap_or("lead")),
        ));
    }
    Ok(())
}

/// Fixed rotation over an ordered player list.
///
/// `first_player_index` points at whoever leads the current trick; it is the
/// previous trick's winner once play is under way.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOrder {
    pub play_order: Vec<PlayerId>,
    pub first_player_index: usize,
}

impl TurnOrder {
    pub fn new(play_order: Vec<PlayerId>, first_player_index: usize) -> Self {
        let first_player_index = if play_order.is_empty() {
            0
        } else {
            first_player_index % play_order.len()
        };
        Self {
            play_order,
            first_player_index,
        }
    }

    pub fn len(&self) -> usize {
        self.play_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.play_order.is_empty()
    }

    pub fn position_of(&self, player: &str) -> Option<usize> {
        self.play_order.iter().position(|p| p == player)
    }

    pub fn leader(&self) -> Option<&PlayerId> {
        self.actor_after(0)
    }

    /// Who acts once `plays_made` cards are already in the trick.
    pub fn actor_after(&self, plays_made: usize) -> Option<&PlayerId> {
        if self.play_order.is_empty() {
            return None;
        }
        let idx = (self.first_player_index + plays_made) % self.play_order.len();
        self.play_order.get(idx)
    }

    /// The player after `player` in rotation, wrapping at the end.
    pub fn next_after(&self, player: &str) -> Option<&PlayerId> {
        let pos = self.position_of(player)?;
        self.play_order.get((pos + 1) % self.play_order.len())
    }

    /// Make `player` lead the next trick. Unknown players leave the order unchanged.
    pub fn set_leader(&mut self, player: &str) -> Result<(), DomainError> {
        let pos = self.position_of(player).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::UnknownPlayer,
                format!("player {player} is not in the play order"),
            )
        })?;
        self.first_player_index = pos;
        Ok(())
    }

    /// Enforce that `player` is the one due after `plays_made` plays.
    pub fn require_turn(&self, player: &str, plays_made: usize) -> Result<(), DomainError> {
        match self.actor_after(plays_made) {
            Some(expected) if expected == player => Ok(()),
            Some(expected) => Err(DomainError::validation(
                ValidationKind::OutOfTurn,
                format!("expected {expected} to play, got {player}"),
            )),
            None => Err(DomainError::validation(
                ValidationKind::OutOfTurn,
                "play order is empty",
            )),
        }
    }
}
