use crate::config::{RuleConfig, TieBreak};
use crate::domain::state::{Player, PlaygroundEntry, RoundQuality};
use crate::domain::tricks::{classify_points, resolve_trick, winning_index};
use crate::domain::{Card, Suit};
use crate::errors::domain::ValidationKind;

fn player(id: &str, team: &str) -> Player {
    Player {
        id: id.into(),
        name: format!("name-{id}"),
        team_id: Some(team.into()),
        connected: true,
        is_anonymous: false,
        cards_remaining: 0,
    }
}

fn roster(n: usize) -> Vec<Player> {
    (1..=n)
        .map(|i| player(&format!("p{i}"), if i % 2 == 1 { "team1" } else { "team2" }))
        .collect()
}

fn trick(tokens: &[&str]) -> Vec<PlaygroundEntry> {
    tokens
        .iter()
        .enumerate()
        .map(|(i, t)| PlaygroundEntry::new(format!("p{}", i + 1), t.parse::<Card>().unwrap()))
        .collect()
}

#[test]
fn highest_trump_wins_and_points_sum() {
    let plays = trick(&["AH", "KH", "7S", "QH"]);
    let result = resolve_trick(&plays, Suit::Hearts, &roster(4), &RuleConfig::default()).unwrap();

    assert_eq!(result.winner.id, "p1");
    assert_eq!(result.winning_card, "AH".parse::<Card>().unwrap());
    assert_eq!(result.points_earned, 11 + 4 + 10 + 2);
    assert_eq!(result.winning_team.as_deref(), Some("team1"));
    assert_eq!(result.analysis.round_quality, RoundQuality::High);
    assert_eq!(result.played_cards.len(), 4);
}

#[test]
fn off_suit_ace_loses_to_led_seven_without_trump() {
    let plays = trick(&["7S", "3S", "AC"]);
    let result = resolve_trick(&plays, Suit::Hearts, &roster(3), &RuleConfig::default()).unwrap();

    assert_eq!(result.winner.id, "p1");
    assert_eq!(result.winning_card, "7S".parse::<Card>().unwrap());
    assert_eq!(result.points_earned, 21);
}

#[test]
fn low_trump_beats_led_ace() {
    let plays = trick(&["AS", "3D", "KS", "6S"]);
    let result = resolve_trick(&plays, Suit::Diamonds, &roster(4), &RuleConfig::default()).unwrap();
    assert_eq!(result.winner.id, "p2");
    assert_eq!(result.winning_team.as_deref(), Some("team2"));
    assert!(result.analysis.round_analysis.contains("trump"));
}

#[test]
fn zero_point_ties_use_tie_break() {
    let plays = trick(&["4C", "6C", "5C", "3C"]);
    let earliest = RuleConfig::default();
    let face = RuleConfig {
        tie_break: TieBreak::FaceRank,
        ..RuleConfig::default()
    };
    assert_eq!(winning_index(&plays, Suit::Hearts, earliest.tie_break), Some(0));
    assert_eq!(winning_index(&plays, Suit::Hearts, face.tie_break), Some(1));

    let result = resolve_trick(&plays, Suit::Hearts, &roster(4), &earliest).unwrap();
    assert_eq!(result.points_earned, 0);
    assert_eq!(result.analysis.round_quality, RoundQuality::Low);
}

#[test]
fn player_names_are_filled_from_roster() {
    let mut plays = trick(&["AH", "KH"]);
    plays[1].player_name = Some("Custom".into());
    let result = resolve_trick(&plays, Suit::Spades, &roster(2), &RuleConfig::default()).unwrap();
    assert_eq!(result.played_cards[0].player_name.as_deref(), Some("name-p1"));
    assert_eq!(result.played_cards[1].player_name.as_deref(), Some("Custom"));
}

#[test]
fn contract_violations_fail_fast() {
    let rules = RuleConfig::default();

    let err = resolve_trick(&[], Suit::Hearts, &roster(4), &rules).unwrap_err();
    assert_eq!(err.kind(), Some(ValidationKind::EmptyTrick));

    let err = resolve_trick(&trick(&["AH", "KH"]), Suit::Hearts, &roster(4), &rules).unwrap_err();
    assert_eq!(err.kind(), Some(ValidationKind::IncompleteTrick));

    let mut dup = trick(&["AH", "KH"]);
    dup[1].player_id = "p1".into();
    let err = resolve_trick(&dup, Suit::Hearts, &roster(2), &rules).unwrap_err();
    assert_eq!(err.kind(), Some(ValidationKind::DuplicatePlayer));

    let mut stranger = trick(&["AH", "KH"]);
    stranger[1].player_id = "zz".into();
    let err = resolve_trick(&stranger, Suit::Hearts, &roster(2), &rules).unwrap_err();
    assert_eq!(err.kind(), Some(ValidationKind::UnknownPlayer));
}

#[test]
fn quality_thresholds_are_configurable() {
    let rules = RuleConfig::default();
    assert_eq!(classify_points(20, &rules), RoundQuality::High);
    assert_eq!(classify_points(19, &rules), RoundQuality::Medium);
    assert_eq!(classify_points(10, &rules), RoundQuality::Medium);
    assert_eq!(classify_points(9, &rules), RoundQuality::Low);

    let strict = RuleConfig {
        high_value_points: 30,
        medium_value_points: 15,
        ..rules
    };
    assert_eq!(classify_points(27, &strict), RoundQuality::Medium);
}
