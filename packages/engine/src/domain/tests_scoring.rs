use crate::config::RuleConfig;
use crate::domain::scoring::{all_hands_exhausted, ScoreBoard};
use crate::domain::state::{Player, PlaygroundEntry};
use crate::domain::{resolve_trick, Card, Suit};

fn roster() -> Vec<Player> {
    ["team1", "team2", "team1", "team2"]
        .iter()
        .enumerate()
        .map(|(i, team)| Player {
            id: format!("p{}", i + 1),
            name: format!("P{}", i + 1),
            team_id: Some((*team).into()),
            connected: true,
            ..Player::default()
        })
        .collect()
}

fn play(board: &mut ScoreBoard, tokens: [&str; 4], trump: Suit) {
    let plays: Vec<PlaygroundEntry> = tokens
        .iter()
        .enumerate()
        .map(|(i, t)| PlaygroundEntry::new(format!("p{}", i + 1), t.parse::<Card>().unwrap()))
        .collect();
    let result = resolve_trick(&plays, trump, &roster(), &RuleConfig::default()).unwrap();
    board.record_trick(&result);
}

#[test]
fn trick_points_accumulate_per_team() {
    let mut board = ScoreBoard::new(["team1", "team2"]);
    play(&mut board, ["AH", "KH", "QH", "3H"], Suit::Spades); // p1 wins 17
    play(&mut board, ["3C", "7C", "4C", "5C"], Suit::Spades); // p2 wins 10

    assert_eq!(board.total_points()["team1"], 17);
    assert_eq!(board.total_points()["team2"], 10);
    assert_eq!(board.round_points()["team1"], 17);
}

#[test]
fn finish_round_awards_strict_leader_and_resets_round_points() {
    let mut board = ScoreBoard::new(["team1", "team2"]);
    play(&mut board, ["AH", "KH", "QH", "3H"], Suit::Spades);

    assert_eq!(board.finish_round().as_deref(), Some("team1"));
    assert_eq!(board.round_wins()["team1"], 1);
    assert_eq!(board.round_wins()["team2"], 0);
    assert!(board.round_points().values().all(|p| *p == 0));
    // totals survive the round boundary
    assert_eq!(board.total_points()["team1"], 17);
}

#[test]
fn tied_round_awards_nothing() {
    let mut board = ScoreBoard::new(["team1", "team2"]);
    play(&mut board, ["KH", "3H", "4H", "5H"], Suit::Spades); // team1 +4
    play(&mut board, ["3D", "KD", "4D", "5D"], Suit::Spades); // team2 +4
    assert_eq!(board.finish_round(), None);
    assert!(board.round_wins().values().all(|w| *w == 0));

    let mut empty = ScoreBoard::new(["team1", "team2"]);
    assert_eq!(empty.finish_round(), None);
}

#[test]
fn teamless_winner_is_not_tallied() {
    let mut board = ScoreBoard::new(["team1"]);
    let mut result = {
        let plays = vec![PlaygroundEntry::new("solo", "AH".parse().unwrap())];
        let roster = vec![Player {
            id: "solo".into(),
            name: "Solo".into(),
            ..Player::default()
        }];
        resolve_trick(&plays, Suit::Hearts, &roster, &RuleConfig::default()).unwrap()
    };
    result.winning_team = None;
    board.record_trick(&result);
    assert_eq!(board.total_points()["team1"], 0);
}

#[test]
fn hands_exhaustion() {
    assert!(all_hands_exhausted(&[vec![], vec![]]));
    assert!(!all_hands_exhausted(&[vec![], vec!["AH".parse().unwrap()]]));
}
