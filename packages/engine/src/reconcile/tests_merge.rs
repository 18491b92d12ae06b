use engine_test_support::snapshot_fixtures::{
    full_snapshot, gameplay, match_branch, player, players_all, scores, teams, SnapshotBuilder,
};
use serde_json::json;

use crate::config::RuleConfig;
use crate::domain::{Card, MatchStatus, Suit};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::protocol::ChannelSink;
use crate::reconcile::MatchReconciler;

fn seeded(match_id: &str) -> MatchReconciler {
    let mut r = MatchReconciler::new();
    r.apply_value(full_snapshot(match_id)).unwrap();
    r
}

#[test]
fn full_snapshot_populates_every_slice() {
    let r = seeded("m1");
    let s = r.state();

    assert_eq!(s.players.len(), 4);
    assert_eq!(s.me.as_ref().unwrap().id, "p1");
    assert_eq!(s.connection.my_player_id.as_deref(), Some("p1"));
    assert_eq!(s.connection.match_id.as_deref(), Some("m1"));
    assert_eq!(s.connection.match_status, Some(MatchStatus::Active));
    assert_eq!(s.connection.trump_suit, Some(Suit::Hearts));
    assert_eq!(s.connection.current_round, Some(1));
    assert_eq!(s.connection.total_rounds, Some(3));
    assert_eq!(s.connection.current_player_name.as_deref(), Some("Aline"));
    assert_eq!(s.play_order, vec!["p1", "p2", "p3", "p4"]);
    assert_eq!(s.first_player_index, Some(0));
    assert_eq!(s.hand.len(), 4);
    assert!(s.playground.is_empty());

    let t1 = s.team("team1").unwrap();
    assert_eq!(t1.players.len(), 2);
    assert_eq!(t1.players[1].name, "Claudine");
    assert_eq!(t1.connected_count, 2);
    assert_eq!(t1.total_slots, 2);
    assert_eq!(t1.missing_count, 0);
    assert_eq!(s.team_of("p4").unwrap().id, "team2");
    assert!(s.is_my_turn());
    assert_eq!(r.applied_count(), 1);
}

#[test]
fn applying_twice_equals_applying_once() {
    let once = seeded("m1");
    let mut twice = seeded("m1");
    twice.apply_value(full_snapshot("m1")).unwrap();
    assert_eq!(once.state(), twice.state());
}

#[test]
fn missing_match_branch_preserves_metadata() {
    let mut r = seeded("m1");
    let before = r.state().connection.clone();

    r.apply_value(
        SnapshotBuilder::new()
            .with("gameplay", gameplay(&["AH"], &[("p1", "KH")]))
            .build(),
    )
    .unwrap();

    let after = &r.state().connection;
    assert_eq!(after.match_status, before.match_status);
    assert_eq!(after.trump_suit, before.trump_suit);
    assert_eq!(after.current_round, before.current_round);
    assert_eq!(after.match_id, before.match_id);
}

#[test]
fn partial_match_branch_merges_field_wise() {
    let mut r = seeded("m1");
    r.apply_value(json!({"match": {"status": "paused"}})).unwrap();
    let c = &r.state().connection;
    assert_eq!(c.match_status, Some(MatchStatus::Paused));
    assert_eq!(c.trump_suit, Some(Suit::Hearts));
    assert_eq!(c.current_player_id.as_deref(), Some("p1"));
    assert_eq!(r.state().play_order.len(), 4);
}

#[test]
fn empty_playground_clears_previous_entries() {
    let mut r = seeded("m1");
    r.apply_value(json!({"gameplay": gameplay(&["AH"], &[("p1", "KH"), ("p2", "3H")])}))
        .unwrap();
    assert_eq!(r.state().playground.len(), 2);
    assert_eq!(r.state().playground[1].player_name.as_deref(), Some("Bosco"));

    r.apply_value(json!({"gameplay": {"yourHand": ["AH"], "playground": []}}))
        .unwrap();
    assert!(r.state().playground.is_empty());
    assert_eq!(r.state().hand.len(), 1);

    // gameplay present without hand: replaced with empty, not kept stale
    r.apply_value(json!({"gameplay": {}})).unwrap();
    assert!(r.state().hand.is_empty());
}

#[test]
fn absent_gameplay_leaves_hand_alone() {
    let mut r = seeded("m1");
    r.apply_value(json!({"match": {"currentRound": 2}})).unwrap();
    assert_eq!(r.state().hand.len(), 4);
    assert_eq!(r.state().connection.current_round, Some(2));
}

#[test]
fn player_list_is_replaced_wholesale() {
    let mut r = seeded("m1");
    r.apply_value(
        SnapshotBuilder::new()
            .players(json!([player(0, true, 8), player(1, false, 8)]), None)
            .build(),
    )
    .unwrap();
    let s = r.state();
    assert_eq!(s.players.len(), 2);
    assert!(!s.player("p2").unwrap().connected);
    assert_eq!(s.me.as_ref().unwrap().cards_remaining, 8);
    assert!(s.player("p3").is_none());
}

#[test]
fn scores_need_teams_in_the_same_snapshot() {
    let mut r = seeded("m1");

    r.apply_value(json!({"scores": scores(30, 10, 1, 0)})).unwrap();
    assert_eq!(r.state().team("team1").unwrap().score, 0);

    r.apply_value(json!({"teams": teams(), "scores": scores(30, 10, 1, 0)}))
        .unwrap();
    assert_eq!(r.state().team("team1").unwrap().score, 30);
    assert_eq!(r.state().team("team2").unwrap().score, 10);
    assert_eq!(r.state().team("team1").unwrap().round_wins, 1);

    // teams alone leave shape and tallies untouched
    let before = r.state().teams.clone();
    r.apply_value(json!({
        "teams": {"team1": {"players": ["p1"], "totalSlots": 3}}
    }))
    .unwrap();
    assert_eq!(r.state().teams, before);
    assert_eq!(r.state().team("team1").unwrap().score, 30);
    assert_eq!(r.state().team("team1").unwrap().round_wins, 1);
}

#[test]
fn lone_teams_branch_is_idempotent() {
    let mut once = seeded("m1");
    let snapshot = json!({"teams": {"team1": {"players": ["p3"]}}});
    once.apply_value(snapshot.clone()).unwrap();
    let mut twice = once.clone();
    twice.apply_value(snapshot).unwrap();

    assert_eq!(once.state(), twice.state());
    assert_eq!(once.state().teams.len(), 2);
    assert_eq!(once.state().team_of("p1").unwrap().id, "team1");
}

#[test]
fn player_who_left_every_team_has_no_team() {
    let snapshot = json!({
        "players": {"all": [
            {"id": "p1", "name": "Aline"},
            {"id": "p3", "name": "Claudine"}
        ]},
        "teams": {"team1": {"players": ["p3"]}},
        "scores": scores(0, 0, 0, 0)
    });
    let mut once = seeded("m1");
    once.apply_value(snapshot.clone()).unwrap();
    let mut twice = once.clone();
    twice.apply_value(snapshot).unwrap();

    assert_eq!(once.state(), twice.state());
    let s = once.state();
    assert_eq!(s.player("p1").unwrap().team_id, None);
    assert_eq!(s.player("p3").unwrap().team_id.as_deref(), Some("team1"));
    assert!(s.team_of("p1").is_none());
}

#[test]
fn player_team_id_never_comes_from_earlier_teams() {
    let snapshot = json!({
        "players": {"all": [{"id": "p1", "name": "Aline"}]},
        "teams": {"team1": {"players": ["p3"]}}
    });
    let mut once = seeded("m1");
    once.apply_value(snapshot.clone()).unwrap();
    let mut twice = once.clone();
    twice.apply_value(snapshot).unwrap();

    assert_eq!(once.state(), twice.state());
    // retained teams still list p1, but the fresh entry carried no team id
    assert_eq!(once.state().player("p1").unwrap().team_id, None);
}

#[test]
fn stale_scores_do_not_move_backwards() {
    let mut r = seeded("m1");
    r.apply_value(json!({"teams": teams(), "scores": scores(40, 12, 2, 1)}))
        .unwrap();
    r.apply_value(json!({"teams": teams(), "scores": scores(35, 20, 1, 1)}))
        .unwrap();

    let t1 = r.state().team("team1").unwrap();
    let t2 = r.state().team("team2").unwrap();
    assert_eq!((t1.score, t1.round_wins), (40, 2));
    assert_eq!((t2.score, t2.round_wins), (20, 1));
}

#[test]
fn new_match_id_starts_from_scratch() {
    let mut r = seeded("m1");
    r.apply_value(json!({"teams": teams(), "scores": scores(40, 12, 2, 1)}))
        .unwrap();

    r.apply_value(json!({
        "teams": teams(),
        "scores": scores(0, 0, 0, 0),
        "match": {"id": "m2", "status": "waiting"}
    }))
    .unwrap();

    let s = r.state();
    assert_eq!(s.team("team1").unwrap().score, 0);
    assert!(s.hand.is_empty());
    assert!(s.play_order.is_empty());
    assert_eq!(s.connection.match_id.as_deref(), Some("m2"));
    assert_eq!(s.connection.trump_suit, None);
}

#[test]
fn play_order_and_first_index_resist_transient_blanks() {
    let mut r = seeded("m1");
    r.apply_value(json!({"match": {"playOrder": [], "firstPlayerIndex": "x"}}))
        .unwrap();
    assert_eq!(r.state().play_order.len(), 4);
    assert_eq!(r.state().first_player_index, Some(0));

    r.apply_value(json!({"match": {"playOrder": ["p3", "p4", "p1", "p2"], "firstPlayerIndex": 2}}))
        .unwrap();
    let order = r.state().turn_order();
    assert_eq!(order.leader().unwrap(), "p1");
    assert_eq!(order.actor_after(1).unwrap(), "p2");
}

#[test]
fn connected_count_is_clamped_to_slots() {
    let mut r = seeded("m1");
    r.apply_value(json!({
        "teams": {"team1": {"players": ["p1"], "connectedCount": 5, "totalSlots": 2}},
        "scores": scores(0, 0, 0, 0)
    }))
    .unwrap();
    let t = r.state().team("team1").unwrap();
    assert_eq!(t.connected_count, 2);
    assert_eq!(t.missing_count, 0);
    assert_eq!(r.state().teams.len(), 1);
}

#[test]
fn current_player_name_follows_fresh_player_list() {
    let mut r = seeded("m1");
    r.apply_value(json!({"match": {"currentPlayerId": "p3"}})).unwrap();
    assert_eq!(
        r.state().connection.current_player_name.as_deref(),
        Some("Claudine")
    );
    assert!(!r.state().is_my_turn());

    r.apply_value(json!({"match": {"currentPlayerId": "ghost"}})).unwrap();
    assert_eq!(r.state().connection.current_player_name, None);
}

#[test]
fn undecodable_payload_leaves_state_untouched() {
    let mut r = seeded("m1");
    let before = r.state().clone();
    let err = r.apply_value(json!(["not", "an", "object"])).unwrap_err();
    assert!(matches!(err, DomainError::Decode(_)));
    assert_eq!(r.state(), &before);
    assert_eq!(r.applied_count(), 1);
}

#[test]
fn malformed_players_branch_is_a_no_op() {
    let mut r = seeded("m1");
    r.apply_value(json!({"players": {"all": "nobody"}, "match": {"currentRound": 2}}))
        .unwrap();
    assert_eq!(r.state().players.len(), 4);
    assert_eq!(r.state().connection.current_round, Some(2));
}

#[test]
fn local_view_helpers() {
    let rules = RuleConfig::default();
    let mut r = seeded("m1");
    // p2 led spades; viewer holds 7S so must follow
    r.apply_value(json!({"gameplay": gameplay(&["AH", "KH", "7S", "3C"], &[("p2", "AS")])}))
        .unwrap();
    let legal = r.state().my_legal_cards(&rules);
    assert_eq!(legal, vec!["7S".parse::<Card>().unwrap()]);
    assert!(r.state().pending_trick_result(&rules).is_none());

    r.apply_value(json!({"gameplay": gameplay(
        &["AH", "KH", "3C"],
        &[("p2", "AS"), ("p3", "3S"), ("p4", "QH"), ("p1", "7S")]
    )}))
    .unwrap();
    let result = r.state().pending_trick_result(&rules).unwrap().unwrap();
    assert_eq!(result.winner.id, "p4");
    assert_eq!(result.winning_team.as_deref(), Some("team2"));
    assert_eq!(result.points_earned, 11 + 2 + 10);
}

#[test]
fn submit_requires_known_viewer() {
    let (sink, mut rx) = ChannelSink::channel();
    let anonymous = MatchReconciler::new();
    let err = anonymous
        .state()
        .submit_my_play(&sink, "AH".parse().unwrap())
        .unwrap_err();
    assert_eq!(err.kind(), Some(ValidationKind::UnknownPlayer));

    let r = seeded("m1");
    r.state()
        .submit_my_play(&sink, "3C".parse().unwrap())
        .unwrap();
    let sent = rx.try_recv().unwrap();
    assert_eq!(sent.player_id, "p1");
}

#[test]
fn terminal_status_is_reported() {
    let mut r = seeded("m1");
    assert!(!r.state().is_terminal());
    r.apply_value(json!({"match": match_branch("m1", "finished", "hearts", "p1")}))
        .unwrap();
    assert!(r.state().is_terminal());
    // players_all fixture is reusable for reconnect-style refreshes
    r.apply_value(SnapshotBuilder::new().players(players_all(0), None).build())
        .unwrap();
    assert_eq!(r.state().me.as_ref().unwrap().cards_remaining, 0);
}
