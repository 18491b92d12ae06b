//! In-memory match authority.
//!
//! Owns the true match state, accepts plays through a [`ChannelSink`], and
//! renders per-seat snapshots in the same wire shape a remote authority would
//! send. Every play is validated here; clients only get guidance.

use std::collections::BTreeMap;

use ishema_engine::domain::dealing::{create_deck_with, random_trump_suit_with};
use ishema_engine::domain::scoring::all_hands_exhausted;
use ishema_engine::domain::PlayerId;
use ishema_engine::protocol::{
    GameplayBranch, MatchBranch, MatchSnapshot, PlayersBranch, ScoresBranch, TeamMember,
    TeamShape,
};
use ishema_engine::{
    deal_cards, resolve_trick, validate_play, Card, ChannelSink, DomainError, MatchStatus, Player,
    PlaySubmission, PlaygroundEntry, RoundResult, RuleConfig, ScoreBoard, Suit, TurnOrder,
    ValidationKind,
};
use rand::Rng;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub const SEATS: usize = 4;
pub const HAND_SIZE: usize = 9;
pub const TEAM_IDS: [&str; 2] = ["team1", "team2"];
const SEAT_NAMES: [&str; SEATS] = ["Aline", "Bosco", "Claudine", "Didier"];

/// What a single accepted play led to.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayOutcome {
    Played,
    TrickComplete(RoundResult),
    RoundComplete {
        trick: RoundResult,
        round_winner: Option<String>,
    },
}

pub struct LocalAuthority {
    match_id: String,
    rules: RuleConfig,
    roster: Vec<Player>,
    hands: Vec<Vec<Card>>,
    order: TurnOrder,
    playground: Vec<PlaygroundEntry>,
    last_trick: Vec<PlaygroundEntry>,
    trump: Option<Suit>,
    status: MatchStatus,
    round: u32,
    total_rounds: u32,
    board: ScoreBoard,
    plays: mpsc::UnboundedReceiver<PlaySubmission>,
}

fn team_for_seat(seat: usize) -> &'static str {
    TEAM_IDS[seat % 2]
}

impl LocalAuthority {
    /// New match in `waiting` state plus the sink players submit through.
    pub fn new(match_id: impl Into<String>, total_rounds: u32, rules: RuleConfig) -> (Self, ChannelSink) {
        let roster: Vec<Player> = SEAT_NAMES
            .iter()
            .enumerate()
            .map(|(seat, name)| Player {
                id: format!("p{}", seat + 1),
                name: (*name).to_string(),
                team_id: Some(team_for_seat(seat).to_string()),
                connected: true,
                ..Player::default()
            })
            .collect();
        let order = TurnOrder::new(roster.iter().map(|p| p.id.clone()).collect(), 0);
        let (sink, plays) = ChannelSink::channel();

        let authority = Self {
            match_id: match_id.into(),
            rules,
            roster,
            hands: vec![Vec::new(); SEATS],
            order,
            playground: Vec::new(),
            last_trick: Vec::new(),
            trump: None,
            status: MatchStatus::Waiting,
            round: 0,
            total_rounds,
            board: ScoreBoard::new(TEAM_IDS),
            plays,
        };
        (authority, sink)
    }

    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn board(&self) -> &ScoreBoard {
        &self.board
    }

    pub fn hand(&self, seat: usize) -> &[Card] {
        self.hands.get(seat).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whoever must act now; `None` outside active play.
    pub fn current_player(&self) -> Option<&PlayerId> {
        if self.status != MatchStatus::Active || all_hands_exhausted(&self.hands) {
            return None;
        }
        self.order.actor_after(self.playground.len())
    }

    /// Shuffle, deal and draw trump for the next round.
    pub fn start_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Suit, DomainError> {
        if self.status.is_terminal() || self.round >= self.total_rounds {
            return Err(DomainError::validation(
                ValidationKind::MatchNotActive,
                format!("match {} has no rounds left", self.match_id),
            ));
        }
        self.round += 1;

        let mut deck = create_deck_with(rng);
        self.hands = deal_cards(&mut deck, SEATS, HAND_SIZE);
        for (player, hand) in self.roster.iter_mut().zip(&self.hands) {
            player.cards_remaining = u32::try_from(hand.len()).unwrap_or(u32::MAX);
        }

        let trump = random_trump_suit_with(rng);
        self.trump = Some(trump);
        let opener = (self.round as usize - 1) % SEATS;
        self.order = TurnOrder::new(self.order.play_order.clone(), opener);
        self.playground.clear();
        self.last_trick.clear();
        self.status = MatchStatus::Active;

        info!(
            match_id = %self.match_id,
            round = self.round,
            trump = %trump,
            leader = ?self.order.leader(),
            "round dealt"
        );
        Ok(trump)
    }

    /// Process every play waiting in the channel, in arrival order.
    ///
    /// Stops at the first rejected play; plays after it stay queued.
    pub fn drain(&mut self) -> Result<Vec<PlayOutcome>, DomainError> {
        let mut outcomes = Vec::new();
        while let Ok(play) = self.plays.try_recv() {
            outcomes.push(self.accept(play)?);
        }
        Ok(outcomes)
    }

    pub fn accept(&mut self, play: PlaySubmission) -> Result<PlayOutcome, DomainError> {
        if self.status != MatchStatus::Active {
            return Err(DomainError::validation(
                ValidationKind::MatchNotActive,
                format!("match is {}", self.status),
            ));
        }
        let trump = self.trump.ok_or_else(|| {
            DomainError::validation(ValidationKind::MatchNotActive, "no trump drawn yet")
        })?;
        let seat = self.seat_of(&play.player_id)?;
        self.order.require_turn(&play.player_id, self.playground.len())?;

        let led = self.playground.first().map(|e| e.card.suit);
        validate_play(&self.hands[seat], play.card, led, self.rules.follow_suit)?;

        self.hands[seat].retain(|c| *c != play.card);
        self.roster[seat].cards_remaining = self.roster[seat].cards_remaining.saturating_sub(1);
        debug!(player = %play.player_id, card = %play.card, "play accepted");
        self.playground.push(PlaygroundEntry::new(play.player_id, play.card));

        if self.playground.len() < self.roster.len() {
            return Ok(PlayOutcome::Played);
        }

        let result = resolve_trick(&self.playground, trump, &self.roster, &self.rules)?;
        self.board.record_trick(&result);
        self.order.set_leader(&result.winner.id)?;
        self.last_trick = std::mem::take(&mut self.playground);

        if !all_hands_exhausted(&self.hands) {
            return Ok(PlayOutcome::TrickComplete(result));
        }

        let round_winner = self.board.finish_round();
        if self.round >= self.total_rounds {
            self.status = MatchStatus::Finished;
        }
        info!(
            match_id = %self.match_id,
            round = self.round,
            round_winner = ?round_winner,
            totals = ?self.board.total_points(),
            "round complete"
        );
        Ok(PlayOutcome::RoundComplete {
            trick: result,
            round_winner,
        })
    }

    /// Team with the most round wins, then the most points. `None` on a full tie.
    pub fn match_winner(&self) -> Option<String> {
        let key = |team: &str| {
            (
                self.board.round_wins().get(team).copied().unwrap_or(0),
                self.board.total_points().get(team).copied().unwrap_or(0),
            )
        };
        let (a, b) = (key(TEAM_IDS[0]), key(TEAM_IDS[1]));
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Some(TEAM_IDS[0].to_string()),
            std::cmp::Ordering::Less => Some(TEAM_IDS[1].to_string()),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Full snapshot as seen from `seat`.
    pub fn snapshot_for(&self, seat: usize) -> Result<Value, DomainError> {
        self.render(seat, self.playground.clone())
    }

    /// Snapshot showing the trick that just closed, before the table clears.
    pub fn reveal_for(&self, seat: usize) -> Result<Value, DomainError> {
        self.render(seat, self.last_trick.clone())
    }

    fn render(&self, seat: usize, playground: Vec<PlaygroundEntry>) -> Result<Value, DomainError> {
        let viewer = self.roster.get(seat).ok_or_else(|| {
            DomainError::validation(ValidationKind::UnknownPlayer, format!("no seat {seat}"))
        })?;

        let teams = TEAM_IDS
            .iter()
            .enumerate()
            .map(|(t, id)| {
                let members: Vec<&Player> = self
                    .roster
                    .iter()
                    .enumerate()
                    .filter(|(s, _)| s % 2 == t)
                    .map(|(_, p)| p)
                    .collect();
                let connected = members.iter().filter(|p| p.connected).count() as u32;
                let slots = members.len() as u32;
                let shape = TeamShape {
                    id: Some((*id).to_string()),
                    players: members.iter().map(|p| TeamMember::Id(p.id.clone())).collect(),
                    connected_count: Some(connected),
                    total_slots: Some(slots),
                    missing_count: Some(slots - connected),
                };
                ((*id).to_string(), shape)
            })
            .collect::<BTreeMap<_, _>>();

        let snapshot = MatchSnapshot {
            players: Some(PlayersBranch {
                all: Some(self.roster.clone()),
                current: Some(viewer.clone()),
            }),
            teams: Some(teams),
            scores: Some(ScoresBranch {
                total_points: Some(self.board.total_points().clone()),
                round_wins: Some(self.board.round_wins().clone()),
            }),
            gameplay: Some(GameplayBranch {
                your_hand: self.hand(seat).to_vec(),
                playground,
            }),
            match_info: Some(MatchBranch {
                id: Some(self.match_id.clone()),
                status: Some(self.status),
                trump_suit: self.trump,
                current_round: Some(self.round),
                total_rounds: Some(self.total_rounds),
                play_order: Some(self.order.play_order.clone()),
                first_player_index: u32::try_from(self.order.first_player_index).ok(),
                current_player_id: self.current_player().cloned(),
            }),
        };
        snapshot.to_value()
    }

    fn seat_of(&self, player_id: &str) -> Result<usize, DomainError> {
        self.roster
            .iter()
            .position(|p| p.id == player_id)
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::UnknownPlayer,
                    format!("{player_id} is not seated in {}", self.match_id),
                )
            })
    }
}
