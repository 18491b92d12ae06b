//! Deck construction, shuffling and dealing.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use crate::domain::{Card, Rank, Suit};

pub const DECK_SIZE: usize = 36;

/// Generate the 36-card deck in canonical (suit, rank) order.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card { suit, rank });
        }
    }
    deck
}

/// Fisher-Yates shuffle. Every permutation is equally likely given a uniform `rng`.
pub fn shuffle<R: Rng + ?Sized>(deck: &mut [Card], rng: &mut R) {
    for i in (1..deck.len()).rev() {
        let j = rng.random_range(0..=i);
        deck.swap(i, j);
    }
}

/// Deterministic RNG for reproducible deals (simulations, tests).
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Build and shuffle a fresh deck using the thread-local RNG.
pub fn create_deck() -> Vec<Card> {
    create_deck_with(&mut rand::rng())
}

pub fn create_deck_with<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut deck = full_deck();
    shuffle(&mut deck, rng);
    deck
}

/// Deal round-robin, popping from the end of `deck`.
///
/// Callers size `players * cards_per_player <= deck.len()`. If the deck runs
/// out the remaining hands come back short (debug builds assert instead).
pub fn deal_cards(deck: &mut Vec<Card>, players: usize, cards_per_player: usize) -> Vec<Vec<Card>> {
    let needed = players.saturating_mul(cards_per_player);
    debug_assert!(
        needed <= deck.len(),
        "deal of {needed} cards exceeds deck of {}",
        deck.len()
    );
    if needed > deck.len() {
        warn!(
            needed,
            available = deck.len(),
            "deck exhausted while dealing, hands will be short"
        );
    }

    let mut hands: Vec<Vec<Card>> = (0..players)
        .map(|_| Vec::with_capacity(cards_per_player.min(deck.len())))
        .collect();
    'deal: for _ in 0..cards_per_player {
        for hand in hands.iter_mut() {
            let Some(card) = deck.pop() else {
                break 'deal;
            };
            hand.push(card);
        }
    }
    hands
}

/// Uniform pick over the four suits, independent of any deck.
pub fn random_trump_suit() -> Suit {
    random_trump_suit_with(&mut rand::rng())
}

pub fn random_trump_suit_with<R: Rng + ?Sized>(rng: &mut R) -> Suit {
    Suit::ALL[rng.random_range(0..Suit::ALL.len())]
}
