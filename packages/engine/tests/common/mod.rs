#![allow(dead_code)]

// tests/common/mod.rs
use ishema_engine::domain::PlayerId;
use ishema_engine::Player;

// Logging is auto-installed for every integration binary
#[ctor::ctor]
fn init_logging() {
    engine_test_support::test_logging::init();
}

/// Four seated players, teams alternating by seat (0/2 vs 1/3).
pub fn table() -> Vec<Player> {
    (0..4)
        .map(|seat| Player {
            id: format!("p{}", seat + 1),
            name: format!("Player {}", seat + 1),
            team_id: Some(if seat % 2 == 0 { "team1" } else { "team2" }.to_string()),
            connected: true,
            cards_remaining: 9,
            ..Player::default()
        })
        .collect()
}

pub fn seat_ids(players: &[Player]) -> Vec<PlayerId> {
    players.iter().map(|p| p.id.clone()).collect()
}
