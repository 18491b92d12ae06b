//! Core card-related types: Card, Rank, Suit

use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// Lowercase name used on the wire and in card ids.
    pub const fn as_str(self) -> &'static str {
        match self {
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
        }
    }
}

impl Display for Suit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// The nine ranks of the 36-card deck (2, 8, 9 and 10 are not used).
///
/// Declaration order is face order, lowest first, so the derived `Ord`
/// reads A > K > Q > J > 7 > 6 > 5 > 4 > 3.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rank {
    Three,
    Four,
    Five,
    Six,
    Seven,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 9] = [
        Rank::Ace,
        Rank::King,
        Rank::Queen,
        Rank::Jack,
        Rank::Seven,
        Rank::Six,
        Rank::Five,
        Rank::Four,
        Rank::Three,
    ];

    /// Fixed point value of the rank. Suit and trump status do not matter.
    pub const fn points(self) -> u32 {
        match self {
            Rank::Ace => 11,
            Rank::Seven => 10,
            Rank::King => 4,
            Rank::Jack => 3,
            Rank::Queen => 2,
            Rank::Six | Rank::Five | Rank::Four | Rank::Three => 0,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::King => "K",
            Rank::Queen => "Q",
            Rank::Jack => "J",
            Rank::Seven => "7",
            Rank::Six => "6",
            Rank::Five => "5",
            Rank::Four => "4",
            Rank::Three => "3",
        }
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    pub const fn point_value(&self) -> u32 {
        self.rank.points()
    }

    /// Stable identifier, e.g. `hearts-A`.
    pub fn id(&self) -> String {
        format!("{}-{}", self.suit.as_str(), self.rank.symbol())
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} of {}", self.rank, self.suit)
    }
}

// Ord on Card is only for stable sorting (suit, then face rank).
// Trick resolution compares point values, see `cards_logic`.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.suit.cmp(&other.suit) {
            std::cmp::Ordering::Equal => self.rank.cmp(&other.rank),
            ord => ord,
        }
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
