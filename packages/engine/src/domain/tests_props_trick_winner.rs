//! Property-based tests for trick winner resolution and legal plays

use proptest::prelude::*;

use crate::config::{FollowSuitPolicy, RuleConfig, TieBreak};
use crate::domain::test_gens;
use crate::domain::{legal_cards, resolve_trick, Card, Player, PlaygroundEntry, Suit};

/// Independent oracle: filter trump cards, else lead-suit cards, then take the
/// highest point value with the earliest play winning ties.
fn oracle_winner(plays: &[PlaygroundEntry], trump: Suit) -> usize {
    let lead = plays[0].card.suit;
    let trumps: Vec<usize> = (0..plays.len())
        .filter(|&i| plays[i].card.suit == trump)
        .collect();
    let pool = if trumps.is_empty() {
        (0..plays.len())
            .filter(|&i| plays[i].card.suit == lead)
            .collect()
    } else {
        trumps
    };
    let mut best = pool[0];
    for &i in &pool[1..] {
        if plays[i].card.point_value() > plays[best].card.point_value() {
            best = i;
        }
    }
    best
}

fn roster_for(plays: &[PlaygroundEntry]) -> Vec<Player> {
    plays
        .iter()
        .enumerate()
        .map(|(i, e)| Player {
            id: e.player_id.clone(),
            name: e.player_id.to_uppercase(),
            team_id: Some(if i % 2 == 0 { "team1" } else { "team2" }.into()),
            connected: true,
            ..Player::default()
        })
        .collect()
}

proptest! {
    #![proptest_config(test_gens::proptest_config())]

    /// The winner matches the filter-and-max oracle and points are the trick sum.
    #[test]
    fn prop_winner_matches_oracle(plays in test_gens::complete_trick(), trump in test_gens::suit()) {
        let roster = roster_for(&plays);
        let result = resolve_trick(&plays, trump, &roster, &RuleConfig::default()).unwrap();

        let oracle = oracle_winner(&plays, trump);
        prop_assert_eq!(&result.winner.id, &plays[oracle].player_id);

        let sum: u32 = plays.iter().map(|e| e.card.point_value()).sum();
        prop_assert_eq!(result.points_earned, sum);
        prop_assert_eq!(result.winning_team, roster[oracle].team_id.clone());
    }

    /// Trump wins whenever one is played; otherwise the winner followed the lead.
    #[test]
    fn prop_winner_suit(plays in test_gens::complete_trick(), trump in test_gens::suit()) {
        let roster = roster_for(&plays);
        let result = resolve_trick(&plays, trump, &roster, &RuleConfig::default()).unwrap();
        let any_trump = plays.iter().any(|e| e.card.suit == trump);
        if any_trump {
            prop_assert_eq!(result.winning_card.suit, trump);
        } else {
            prop_assert_eq!(result.winning_card.suit, plays[0].card.suit);
        }
    }

    /// Under face-rank tie-breaks the winner is the (points, rank) maximum of its class.
    #[test]
    fn prop_face_rank_tie_break(plays in test_gens::complete_trick(), trump in test_gens::suit()) {
        let rules = RuleConfig { tie_break: TieBreak::FaceRank, ..RuleConfig::default() };
        let result = resolve_trick(&plays, trump, &roster_for(&plays), &rules).unwrap();
        let won = result.winning_card;
        for e in plays.iter().filter(|e| e.card.suit == won.suit) {
            prop_assert!((won.point_value(), won.rank) >= (e.card.point_value(), e.card.rank));
        }
    }

    /// Legal cards are a subset of the hand, and are all of the led suit when the hand holds it.
    #[test]
    fn prop_legal_cards_follow_suit(hand in test_gens::hand(), lead in test_gens::suit()) {
        let legal = legal_cards(&hand, Some(lead), FollowSuitPolicy::Enforced);
        prop_assert!(legal.iter().all(|c| hand.contains(c)));
        let holds_lead = hand.iter().any(|c| c.suit == lead);
        if holds_lead {
            prop_assert!(legal.iter().all(|c| c.suit == lead));
            prop_assert!(!legal.is_empty());
        } else {
            prop_assert_eq!(legal.len(), hand.len());
        }
        let relaxed: Vec<Card> = legal_cards(&hand, Some(lead), FollowSuitPolicy::Relaxed);
        prop_assert_eq!(relaxed, hand);
    }
}
