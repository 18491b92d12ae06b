#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod errors;
pub mod protocol;
pub mod reconcile;
pub mod telemetry;

// Re-exports for public API
pub use config::{EngineConfig, FollowSuitPolicy, RuleConfig, TieBreak};
pub use domain::{
    create_deck, deal_cards, legal_cards, random_trump_suit, resolve_trick, validate_play, Card,
    MatchStatus, Player, PlaygroundEntry, Rank, RoundResult, ScoreBoard, Suit, Team, TurnOrder,
};
pub use errors::{DomainError, ValidationKind};
pub use protocol::{ChannelSink, MatchSnapshot, PlaySink, PlaySubmission};
pub use reconcile::{spawn_feed, FeedHandle, LocalMatchState, MatchReconciler};
pub use telemetry::init_tracing;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    engine_test_support::test_logging::init();
}
