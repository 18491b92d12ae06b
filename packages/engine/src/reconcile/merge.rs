//! Snapshot reconciliation.
//!
//! Merge rules, per branch:
//! - `players.all`: replaces the player list. A player's team id comes from
//!   the entry itself or from the teams in the same snapshot, never from
//!   earlier state.
//! - `teams` + `scores`: rebuild team shape and tallies, and only together.
//!   Either branch alone leaves the team state as it was.
//! - `gameplay`: hand and playground replaced wholesale (empty when missing).
//! - `match`: field-wise into `ConnectionState`. `playOrder` only when
//!   non-empty, `firstPlayerIndex` only when well-typed.
//!
//! Within one match id, team score and round wins never go backwards.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::{Player, PlaygroundEntry, Team, TeamId};
use crate::errors::domain::DomainError;
use crate::protocol::snapshot::{
    GameplayBranch, MatchBranch, MatchSnapshot, PlayersBranch, ScoresBranch, TeamMember,
    TeamShape, TeamsBranch,
};
use crate::reconcile::local_state::LocalMatchState;

/// Owns the local match view and is its only writer.
#[derive(Debug, Clone, Default)]
pub struct MatchReconciler {
    state: LocalMatchState,
    applied: u64,
}

impl MatchReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: LocalMatchState) -> Self {
        Self { state, applied: 0 }
    }

    pub fn state(&self) -> &LocalMatchState {
        &self.state
    }

    pub fn into_state(self) -> LocalMatchState {
        self.state
    }

    /// Number of snapshots merged so far.
    pub fn applied_count(&self) -> u64 {
        self.applied
    }

    /// Decode a raw payload and merge it.
    pub fn apply_value(&mut self, value: Value) -> Result<&LocalMatchState, DomainError> {
        let snapshot = MatchSnapshot::from_value(value)?;
        Ok(self.apply(&snapshot))
    }

    /// Merge one snapshot. Synchronous and atomic with respect to callers.
    pub fn apply(&mut self, snapshot: &MatchSnapshot) -> &LocalMatchState {
        self.reset_on_new_match(snapshot.match_info.as_ref());

        if let Some(players) = &snapshot.players {
            self.merge_players(players);
        }

        match (&snapshot.teams, &snapshot.scores) {
            (Some(teams), Some(scores)) => self.merge_teams(teams, scores),
            (Some(_), None) => debug!("teams without scores branch, keeping team state"),
            (None, Some(_)) => debug!("scores without teams branch, keeping team state"),
            (None, None) => {}
        }

        if let Some(gameplay) = &snapshot.gameplay {
            self.replace_gameplay(gameplay);
        }

        if let Some(m) = &snapshot.match_info {
            self.merge_match(m);
        }

        if snapshot.players.is_some() || snapshot.match_info.is_some() {
            self.resolve_current_player_name();
        }

        self.applied += 1;
        &self.state
    }

    fn reset_on_new_match(&mut self, m: Option<&MatchBranch>) {
        let (Some(incoming), Some(known)) = (
            m.and_then(|m| m.id.as_deref()),
            self.state.connection.match_id.as_deref(),
        ) else {
            return;
        };
        if incoming != known {
            info!(from = %known, to = %incoming, "match id changed, discarding previous match state");
            self.state = LocalMatchState::default();
        }
    }

    fn merge_players(&mut self, branch: &PlayersBranch) {
        if let Some(all) = &branch.all {
            let (players, dropped): (Vec<&Player>, Vec<&Player>) =
                all.iter().partition(|p| !p.id.trim().is_empty());
            if !dropped.is_empty() {
                warn!(count = dropped.len(), "dropping players without an id");
            }
            self.state.players = players.into_iter().cloned().collect();
        }

        match &branch.current {
            Some(current) if !current.id.trim().is_empty() => {
                self.state.connection.my_player_id = Some(current.id.clone());
                self.state.me = Some(current.clone());
            }
            Some(_) => warn!("ignoring players.current without an id"),
            None => {
                // Refresh the viewer from the new list when we know who we are.
                if let Some(me_id) = self.state.connection.my_player_id.as_deref() {
                    if let Some(fresh) = self.state.players.iter().find(|p| p.id == me_id) {
                        self.state.me = Some(fresh.clone());
                    }
                }
            }
        }
    }

    fn merge_teams(&mut self, branch: &TeamsBranch, scores: &ScoresBranch) {
        let prior: BTreeMap<TeamId, (u32, u32)> = self
            .state
            .teams
            .iter()
            .map(|t| (t.id.clone(), (t.score, t.round_wins)))
            .collect();

        let teams: Vec<Team> = branch
            .iter()
            .map(|(key, shape)| {
                let id = shape.id.clone().unwrap_or_else(|| key.clone());
                let carried = prior.get(&id).copied().unwrap_or((0, 0));
                self.build_team(id, shape, carried, scores)
            })
            .collect();

        // Rebuilt teams are authoritative for membership.
        for player in self.state.players.iter_mut() {
            player.team_id = teams
                .iter()
                .find(|t| t.players.iter().any(|m| m.id == player.id))
                .map(|t| t.id.clone());
        }
        debug!(teams = teams.len(), "teams rebuilt");
        self.state.teams = teams;
    }

    fn build_team(
        &self,
        id: TeamId,
        shape: &TeamShape,
        (prior_score, prior_wins): (u32, u32),
        scores: &ScoresBranch,
    ) -> Team {
        let players: Vec<Player> = shape
            .players
            .iter()
            .map(|member| self.resolve_member(member, &id))
            .collect();

        let member_count = u32::try_from(players.len()).unwrap_or(u32::MAX);
        let total_slots = shape.total_slots.unwrap_or(member_count);
        let connected = shape.connected_count.unwrap_or_else(|| {
            u32::try_from(players.iter().filter(|p| p.connected).count()).unwrap_or(u32::MAX)
        });
        let connected_count = if connected > total_slots {
            warn!(team = %id, connected, total_slots, "connected count exceeds slots, clamping");
            total_slots
        } else {
            connected
        };
        let missing_count = shape
            .missing_count
            .unwrap_or(total_slots - connected_count);

        let score = monotonic(
            &id,
            "score",
            prior_score,
            scores
                .total_points
                .as_ref()
                .and_then(|m| m.get(&id).copied()),
        );
        let round_wins = monotonic(
            &id,
            "roundWins",
            prior_wins,
            scores
                .round_wins
                .as_ref()
                .and_then(|m| m.get(&id).copied()),
        );

        Team {
            id,
            players,
            connected_count,
            total_slots,
            missing_count,
            score,
            round_wins,
        }
    }

    /// Prefer the freshly supplied player record; fall back to what the team lists.
    fn resolve_member(&self, member: &TeamMember, team_id: &str) -> Player {
        let mut player = match self.state.player(member.id()) {
            Some(known) => known.clone(),
            None => match member {
                TeamMember::Player(p) => p.clone(),
                TeamMember::Id(id) => Player {
                    id: id.clone(),
                    name: id.clone(),
                    ..Player::default()
                },
            },
        };
        player.team_id = Some(team_id.to_string());
        player
    }

    fn replace_gameplay(&mut self, gameplay: &GameplayBranch) {
        self.state.hand = gameplay.your_hand.clone();
        self.state.playground = gameplay
            .playground
            .iter()
            .map(|entry| self.named_entry(entry))
            .collect();
        debug!(
            hand = self.state.hand.len(),
            playground = self.state.playground.len(),
            "gameplay replaced"
        );
    }

    fn named_entry(&self, entry: &PlaygroundEntry) -> PlaygroundEntry {
        let mut entry = entry.clone();
        if entry.player_name.is_none() {
            entry.player_name = self.state.player(&entry.player_id).map(|p| p.name.clone());
        }
        entry
    }

    fn merge_match(&mut self, m: &MatchBranch) {
        let conn = &mut self.state.connection;

        if let Some(id) = &m.id {
            conn.match_id = Some(id.clone());
        }
        if let Some(status) = m.status {
            if conn.match_status != Some(status) {
                info!(from = ?conn.match_status, to = %status, "match status changed");
            }
            conn.match_status = Some(status);
        }
        if let Some(trump) = m.trump_suit {
            conn.trump_suit = Some(trump);
        }
        if let Some(round) = m.current_round {
            conn.current_round = Some(round);
        }
        if let Some(total) = m.total_rounds {
            conn.total_rounds = Some(total);
        }
        if let Some(current) = &m.current_player_id {
            conn.current_player_id = Some(current.clone());
        }

        match &m.play_order {
            Some(order) if !order.is_empty() => self.state.play_order = order.clone(),
            Some(_) => debug!("empty playOrder ignored"),
            None => {}
        }
        if let Some(idx) = m.first_player_index {
            self.state.first_player_index = usize::try_from(idx).ok();
        }
    }

    fn resolve_current_player_name(&mut self) {
        let Some(current) = self.state.connection.current_player_id.as_deref() else {
            return;
        };
        let name = self
            .state
            .players
            .iter()
            .find(|p| p.id == current)
            .map(|p| p.name.clone());
        if name.is_none() {
            debug!(current, "current player not in player list");
        }
        self.state.connection.current_player_name = name;
    }
}

/// Accept `incoming` unless it would move a tally backwards.
fn monotonic(team: &str, field: &'static str, prior: u32, incoming: Option<u32>) -> u32 {
    match incoming {
        Some(v) if v < prior => {
            warn!(team, field, prior, incoming = v, "ignoring decreasing tally from stale snapshot");
            prior
        }
        Some(v) => v,
        None => prior,
    }
}
