use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::state::{RoundResult, TeamId};
use crate::domain::Card;

/// Per-match tally keyed by team id.
///
/// Trick points land in the totals as soon as a trick resolves; a round win is
/// awarded only when the round's cards run out (`finish_round`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBoard {
    total_points: BTreeMap<TeamId, u32>,
    round_wins: BTreeMap<TeamId, u32>,
    round_points: BTreeMap<TeamId, u32>,
}

impl ScoreBoard {
    pub fn new<I, S>(team_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TeamId>,
    {
        let mut board = Self::default();
        for id in team_ids {
            let id = id.into();
            board.total_points.insert(id.clone(), 0);
            board.round_wins.insert(id.clone(), 0);
            board.round_points.insert(id, 0);
        }
        board
    }

    pub fn record_trick(&mut self, result: &RoundResult) {
        let Some(team) = result.winning_team.as_ref() else {
            warn!(
                winner = %result.winner.id,
                points = result.points_earned,
                "trick winner has no team, points not tallied"
            );
            return;
        };
        *self.total_points.entry(team.clone()).or_default() += result.points_earned;
        *self.round_points.entry(team.clone()).or_default() += result.points_earned;
        self.round_wins.entry(team.clone()).or_default();
    }

    /// Close the round: the team with strictly the most round points gets a
    /// round win. A tie awards nothing.
    pub fn finish_round(&mut self) -> Option<TeamId> {
        let best = self.round_points.values().copied().max().unwrap_or(0);
        let leaders: Vec<&TeamId> = self
            .round_points
            .iter()
            .filter(|(_, pts)| **pts == best)
            .map(|(id, _)| id)
            .collect();
        let winner = match leaders.as_slice() {
            [only] if best > 0 => Some((*only).clone()),
            _ => None,
        };
        if let Some(team) = &winner {
            *self.round_wins.entry(team.clone()).or_default() += 1;
        }
        debug!(round_points = ?self.round_points, ?winner, "round finished");
        for pts in self.round_points.values_mut() {
            *pts = 0;
        }
        winner
    }

    pub fn total_points(&self) -> &BTreeMap<TeamId, u32> {
        &self.total_points
    }

    pub fn round_wins(&self) -> &BTreeMap<TeamId, u32> {
        &self.round_wins
    }

    pub fn round_points(&self) -> &BTreeMap<TeamId, u32> {
        &self.round_points
    }
}

/// A round ends once every hand is empty.
pub fn all_hands_exhausted(hands: &[Vec<Card>]) -> bool {
    hands.iter().all(Vec::is_empty)
}
