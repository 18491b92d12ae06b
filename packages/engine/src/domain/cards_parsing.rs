//! Card parsing from string representations ("AH", "7S", "hearts-A")

use std::str::FromStr;

use super::cards_types::{Card, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

fn parse_error(s: &str) -> DomainError {
    DomainError::validation(ValidationKind::ParseCard, format!("Parse card: {s}"))
}

impl FromStr for Suit {
    type Err = DomainError;

    /// Case-insensitive suit names ("hearts", "HEARTS") or single letters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hearts" | "h" => Ok(Suit::Hearts),
            "diamonds" | "d" => Ok(Suit::Diamonds),
            "clubs" | "c" => Ok(Suit::Clubs),
            "spades" | "s" => Ok(Suit::Spades),
            _ => Err(parse_error(s)),
        }
    }
}

impl FromStr for Rank {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" | "ACE" => Ok(Rank::Ace),
            "K" | "KING" => Ok(Rank::King),
            "Q" | "QUEEN" => Ok(Rank::Queen),
            "J" | "JACK" => Ok(Rank::Jack),
            "7" => Ok(Rank::Seven),
            "6" => Ok(Rank::Six),
            "5" => Ok(Rank::Five),
            "4" => Ok(Rank::Four),
            "3" => Ok(Rank::Three),
            _ => Err(parse_error(s)),
        }
    }
}

impl FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Id form: "hearts-A"
        if let Some((suit, rank)) = s.split_once('-') {
            let suit = suit.parse::<Suit>().map_err(|_| parse_error(s))?;
            let rank = rank.parse::<Rank>().map_err(|_| parse_error(s))?;
            return Ok(Card { suit, rank });
        }

        // Compact form: rank symbol followed by suit letter, "AH", "7s"
        if s.len() != 2 || !s.is_ascii() {
            return Err(parse_error(s));
        }
        let (rank, suit) = s.split_at(1);
        let rank = rank.parse::<Rank>().map_err(|_| parse_error(s))?;
        let suit = suit.parse::<Suit>().map_err(|_| parse_error(s))?;
        Ok(Card { suit, rank })
    }
}

/// Non-panicking helper to parse card tokens into Card instances.
pub fn try_parse_cards<I, S>(tokens: I) -> Result<Vec<Card>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|s| s.as_ref().parse::<Card>())
        .collect()
}
