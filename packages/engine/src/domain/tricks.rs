//! Trick resolution: winner, points and analysis of a completed trick.

use std::collections::HashSet;

use crate::config::{RuleConfig, TieBreak};
use crate::domain::state::{Player, PlaygroundEntry, RoundAnalysis, RoundQuality, RoundResult};
use crate::domain::{card_beats, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

/// Index of the winning entry, or `None` for an empty trick.
///
/// The led suit is the first entry's suit.
pub fn winning_index(trick: &[PlaygroundEntry], trump: Suit, tie_break: TieBreak) -> Option<usize> {
    let lead = trick.first()?.card.suit;
    let mut best_idx = 0usize;
    for (i, entry) in trick.iter().enumerate().skip(1) {
        if card_beats(entry.card, trick[best_idx].card, lead, trump, tie_break) {
            best_idx = i;
        }
    }
    Some(best_idx)
}

pub fn trick_points(trick: &[PlaygroundEntry]) -> u32 {
    trick.iter().map(|e| e.card.point_value()).sum()
}

pub fn classify_points(points: u32, rules: &RuleConfig) -> RoundQuality {
    if points >= rules.high_value_points {
        RoundQuality::High
    } else if points >= rules.medium_value_points {
        RoundQuality::Medium
    } else {
        RoundQuality::Low
    }
}

/// Resolve a completed trick against the active `roster`.
///
/// The trick must hold exactly one entry per roster player.
pub fn resolve_trick(
    trick: &[PlaygroundEntry],
    trump: Suit,
    roster: &[Player],
    rules: &RuleConfig,
) -> Result<RoundResult, DomainError> {
    if trick.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::EmptyTrick,
            "cannot resolve a trick with no cards played",
        ));
    }
    if trick.len() != roster.len() {
        return Err(DomainError::validation(
            ValidationKind::IncompleteTrick,
            format!(
                "trick has {} plays but {} players are active",
                trick.len(),
                roster.len()
            ),
        ));
    }

    let mut seen = HashSet::with_capacity(trick.len());
    let mut played_cards = Vec::with_capacity(trick.len());
    for entry in trick {
        if !seen.insert(entry.player_id.as_str()) {
            return Err(DomainError::validation(
                ValidationKind::DuplicatePlayer,
                format!("player {} played twice in one trick", entry.player_id),
            ));
        }
        let player = find_player(roster, &entry.player_id)?;
        let mut entry = entry.clone();
        if entry.player_name.is_none() {
            entry.player_name = Some(player.name.clone());
        }
        played_cards.push(entry);
    }

    let best_idx = winning_index(trick, trump, rules.tie_break).ok_or_else(|| {
        DomainError::validation(ValidationKind::EmptyTrick, "no winning play")
    })?;
    let winning_entry = &trick[best_idx];
    let winner = find_player(roster, &winning_entry.player_id)?.clone();
    let points_earned = trick_points(trick);
    let analysis = analyse(&winner, winning_entry, trump, points_earned, rules);

    Ok(RoundResult {
        winning_team: winner.team_id.clone(),
        winner,
        winning_card: winning_entry.card,
        points_earned,
        played_cards,
        analysis,
    })
}

fn find_player<'a>(roster: &'a [Player], id: &str) -> Result<&'a Player, DomainError> {
    roster.iter().find(|p| p.id == id).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::UnknownPlayer,
            format!("player {id} is not part of this match"),
        )
    })
}

fn analyse(
    winner: &Player,
    winning: &PlaygroundEntry,
    trump: Suit,
    points: u32,
    rules: &RuleConfig,
) -> RoundAnalysis {
    let round_quality = classify_points(points, rules);
    let how = if winning.card.suit == trump {
        "trump"
    } else {
        "the led suit"
    };
    let label = match round_quality {
        RoundQuality::High => "a high-value trick",
        RoundQuality::Medium => "a solid trick",
        RoundQuality::Low => "a low-value trick",
    };
    RoundAnalysis {
        round_quality,
        round_analysis: format!(
            "{} won {label} worth {points} points with the {} ({how})",
            winner.name, winning.card
        ),
    }
}
