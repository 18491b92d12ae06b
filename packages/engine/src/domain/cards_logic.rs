//! Card game logic: checking suits in hands, comparing card strength

use super::cards_types::{Card, Suit};
use crate::config::TieBreak;

pub fn hand_has_suit(hand: &[Card], suit: Suit) -> bool {
    hand.iter().any(|c| c.suit == suit)
}

/// Whether `challenger` (played after `best`) takes the trick from `best`.
///
/// Trump outranks everything; otherwise only cards following `lead` contend.
/// Between contenders the higher point value wins, and equal point values go
/// to `tie_break`.
pub fn card_beats(challenger: Card, best: Card, lead: Suit, trump: Suit, tie_break: TieBreak) -> bool {
    let c_trump = challenger.suit == trump;
    let b_trump = best.suit == trump;
    if c_trump != b_trump {
        return c_trump;
    }
    if !c_trump {
        let c_follows = challenger.suit == lead;
        let b_follows = best.suit == lead;
        if c_follows != b_follows {
            return c_follows;
        }
        if !c_follows {
            // Neither trump nor lead: off-suit discards never contend.
            return false;
        }
    }
    beats_on_value(challenger, best, tie_break)
}

fn beats_on_value(challenger: Card, best: Card, tie_break: TieBreak) -> bool {
    let (cv, bv) = (challenger.point_value(), best.point_value());
    if cv != bv {
        return cv > bv;
    }
    match tie_break {
        TieBreak::EarliestPlay => false,
        TieBreak::FaceRank => challenger.rank > best.rank,
    }
}
