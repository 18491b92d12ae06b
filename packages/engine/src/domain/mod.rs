//! Domain layer: pure game logic types and helpers.

pub mod cards_logic;
pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod dealing;
pub mod scoring;
pub mod state;
pub mod tricks;
pub mod turns;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod tests_props_trick_winner;
#[cfg(test)]
mod tests_scoring;
#[cfg(test)]
mod tests_tricks;

// Re-exports for ergonomics
pub use cards_logic::{card_beats, hand_has_suit};
pub use cards_parsing::try_parse_cards;
pub use cards_types::{Card, Rank, Suit};
pub use dealing::{create_deck, create_deck_with, deal_cards, random_trump_suit, shuffle};
pub use scoring::ScoreBoard;
pub use state::{
    ConnectionState, MatchStatus, Player, PlaygroundEntry, RoundAnalysis, RoundQuality,
    RoundResult, Team, TeamId,
};
pub use tricks::resolve_trick;
pub use turns::{legal_cards, validate_play, PlayerId, TurnOrder};
