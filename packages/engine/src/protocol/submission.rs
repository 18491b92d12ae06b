//! Play submission channel towards the external authority.
//!
//! The engine forwards plays as-is. Legality is exposed separately (see
//! `domain::turns::legal_cards`) for UI guidance only; the authority decides.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::{Card, PlayerId};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaySubmission {
    pub player_id: PlayerId,
    pub card: Card,
}

impl PlaySubmission {
    pub fn new(player_id: impl Into<PlayerId>, card: Card) -> Self {
        Self {
            player_id: player_id.into(),
            card,
        }
    }
}

/// Destination for plays, implemented by whatever transport reaches the authority.
pub trait PlaySink {
    fn submit(&self, play: PlaySubmission) -> Result<(), DomainError>;
}

/// In-process sink backed by an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<PlaySubmission>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<PlaySubmission>) -> Self {
        Self { tx }
    }

    /// Sink plus the receiving end for the authority.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PlaySubmission>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl PlaySink for ChannelSink {
    fn submit(&self, play: PlaySubmission) -> Result<(), DomainError> {
        debug!(player = %play.player_id, card = %play.card.id(), "submitting play");
        self.tx
            .send(play)
            .map_err(|e| DomainError::channel(format!("authority gone, play for {} dropped", e.0.player_id)))
    }
}
