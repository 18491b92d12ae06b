// Proptest generators for domain types.
// These generators ensure unique cards so every trick is physically possible.

use std::env;

use proptest::prelude::*;

use crate::domain::dealing::full_deck;
use crate::domain::{Card, PlaygroundEntry, Suit};

/// Case count from `PROPTEST_CASES`, low default for fast CI.
pub fn proptest_config() -> ProptestConfig {
    let cases = env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(64);

    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

pub fn suit() -> impl Strategy<Value = Suit> {
    prop::sample::select(Suit::ALL.to_vec())
}

/// `count` distinct cards in random order.
pub fn unique_cards(count: usize) -> impl Strategy<Value = Vec<Card>> {
    prop::sample::subsequence(full_deck(), count).prop_shuffle()
}

/// A full trick of 2..=6 plays by players `p1..pn`, in play order.
pub fn complete_trick() -> impl Strategy<Value = Vec<PlaygroundEntry>> {
    (2usize..=6).prop_flat_map(|n| {
        unique_cards(n).prop_map(|cards| {
            cards
                .into_iter()
                .enumerate()
                .map(|(i, card)| PlaygroundEntry::new(format!("p{}", i + 1), card))
                .collect()
        })
    })
}

/// A hand of up to 9 distinct cards.
pub fn hand() -> impl Strategy<Value = Vec<Card>> {
    (0usize..=9).prop_flat_map(unique_cards)
}
