//! Plays complete matches in memory.
//!
//! Each seat is a client: it only sees its own reconciled snapshot view and
//! picks a random legal card from it. The authority validates everything.
//! After every broadcast the client views are cross-checked against the
//! authority's true state.

use std::collections::BTreeMap;

use ishema_engine::domain::dealing::seeded_rng;
use ishema_engine::domain::RoundQuality;
use ishema_engine::{
    Card, ChannelSink, DomainError, LocalMatchState, MatchReconciler, RoundResult, RuleConfig,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::authority::{LocalAuthority, PlayOutcome, SEATS};

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("engine rejected the simulation: {0}")]
    Domain(#[from] DomainError),
    #[error("seat {seat} view diverged from the authority: {detail}")]
    Divergence { seat: usize, detail: String },
    #[error("no seat believes it is their turn")]
    Stalled,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrickSummary {
    pub winner: String,
    pub winning_card: Card,
    pub points: u32,
    pub quality: RoundQuality,
}

impl From<&RoundResult> for TrickSummary {
    fn from(result: &RoundResult) -> Self {
        Self {
            winner: result.winner.id.clone(),
            winning_card: result.winning_card,
            points: result.points_earned,
            quality: result.analysis.round_quality,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundSummary {
    pub round: u32,
    pub trump: String,
    pub tricks: Vec<TrickSummary>,
    pub round_winner: Option<String>,
}

/// One JSONL line per match.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub match_no: u32,
    pub match_id: String,
    pub seed: u64,
    pub rounds: Vec<RoundSummary>,
    pub total_points: BTreeMap<String, u32>,
    pub round_wins: BTreeMap<String, u32>,
    pub winner: Option<String>,
    pub snapshots_applied: u64,
}

/// Seat clients that persist across matches; a new match id resets them.
pub struct Simulator {
    rules: RuleConfig,
    viewers: Vec<MatchReconciler>,
}

impl Simulator {
    pub fn new(rules: RuleConfig) -> Self {
        Self {
            rules,
            viewers: (0..SEATS).map(|_| MatchReconciler::new()).collect(),
        }
    }

    #[cfg(test)]
    pub fn view(&self, seat: usize) -> Option<&LocalMatchState> {
        self.viewers.get(seat).map(MatchReconciler::state)
    }

    pub fn run_match(
        &mut self,
        match_no: u32,
        seed: u64,
        total_rounds: u32,
    ) -> Result<MatchSummary, SimulatorError> {
        let mut rng = seeded_rng(seed);
        let match_id = format!("sim-{match_no}-{seed:016x}");
        let (mut authority, sink) = LocalAuthority::new(match_id.clone(), total_rounds, self.rules);
        let applied_before: u64 = self.viewers.iter().map(|v| v.applied_count()).sum();

        self.broadcast(&authority)?;

        let mut rounds = Vec::new();
        while !authority.status().is_terminal() {
            let trump = authority.start_round(&mut rng)?;
            let mut summary = RoundSummary {
                round: authority.round(),
                trump: trump.as_str().to_string(),
                tricks: Vec::new(),
                round_winner: None,
            };
            self.broadcast(&authority)?;

            loop {
                self.play_one(&sink, &mut rng)?;
                let mut round_over = false;
                for outcome in authority.drain()? {
                    match outcome {
                        PlayOutcome::Played => {}
                        PlayOutcome::TrickComplete(result) => {
                            self.reveal(&authority, &result)?;
                            summary.tricks.push(TrickSummary::from(&result));
                        }
                        PlayOutcome::RoundComplete {
                            trick,
                            round_winner,
                        } => {
                            self.reveal(&authority, &trick)?;
                            summary.tricks.push(TrickSummary::from(&trick));
                            summary.round_winner = round_winner;
                            round_over = true;
                        }
                    }
                }
                self.broadcast(&authority)?;
                if round_over {
                    break;
                }
            }
            rounds.push(summary);
        }

        let applied_after: u64 = self.viewers.iter().map(|v| v.applied_count()).sum();
        let winner = authority.match_winner();
        info!(match_id = %match_id, ?winner, "match finished");

        Ok(MatchSummary {
            match_no,
            match_id,
            seed,
            rounds,
            total_points: authority.board().total_points().clone(),
            round_wins: authority.board().round_wins().clone(),
            winner,
            snapshots_applied: applied_after - applied_before,
        })
    }

    /// The seat whose view says it is on turn plays a random legal card.
    fn play_one(&self, sink: &ChannelSink, rng: &mut ChaCha8Rng) -> Result<(), SimulatorError> {
        let (seat, view) = self
            .viewers
            .iter()
            .map(MatchReconciler::state)
            .enumerate()
            .find(|(_, v)| v.is_my_turn())
            .ok_or(SimulatorError::Stalled)?;

        let legal = view.my_legal_cards(&self.rules);
        if legal.is_empty() {
            return Err(SimulatorError::Divergence {
                seat,
                detail: "on turn with no legal card".into(),
            });
        }
        let card = legal[rng.random_range(0..legal.len())];
        debug!(seat, card = %card, "client plays");
        view.submit_my_play(sink, card)?;
        Ok(())
    }

    fn broadcast(&mut self, authority: &LocalAuthority) -> Result<(), SimulatorError> {
        for seat in 0..SEATS {
            let snapshot = authority.snapshot_for(seat)?;
            let state = self.viewers[seat].apply_value(snapshot)?;
            cross_check(seat, state, authority)?;
        }
        Ok(())
    }

    /// Show the closed trick to every seat and confirm they resolve it the same way.
    fn reveal(&mut self, authority: &LocalAuthority, result: &RoundResult) -> Result<(), SimulatorError> {
        for seat in 0..SEATS {
            let snapshot = authority.reveal_for(seat)?;
            let state = self.viewers[seat].apply_value(snapshot)?;
            let local = state
                .pending_trick_result(&self.rules)
                .ok_or_else(|| SimulatorError::Divergence {
                    seat,
                    detail: "closed trick not visible".into(),
                })??;
            if local.winner.id != result.winner.id || local.points_earned != result.points_earned {
                return Err(SimulatorError::Divergence {
                    seat,
                    detail: format!(
                        "trick resolved to {} for {} points, authority says {} for {}",
                        local.winner.id, local.points_earned, result.winner.id, result.points_earned
                    ),
                });
            }
        }
        Ok(())
    }
}

fn cross_check(
    seat: usize,
    state: &LocalMatchState,
    authority: &LocalAuthority,
) -> Result<(), SimulatorError> {
    let diverged = |detail: String| SimulatorError::Divergence { seat, detail };

    if state.hand != authority.hand(seat) {
        return Err(diverged(format!(
            "hand has {} cards, authority dealt {}",
            state.hand.len(),
            authority.hand(seat).len()
        )));
    }
    if state.connection.match_id.as_deref() != Some(authority.match_id()) {
        return Err(diverged("match id".into()));
    }
    if state.connection.current_player_id.as_ref() != authority.current_player() {
        // A finished match keeps the last known actor locally.
        if authority.current_player().is_some() {
            return Err(diverged(format!(
                "current player {:?}, authority {:?}",
                state.connection.current_player_id,
                authority.current_player()
            )));
        }
    }
    for team in &state.teams {
        let expected = authority
            .board()
            .total_points()
            .get(&team.id)
            .copied()
            .unwrap_or(0);
        if team.score != expected {
            return Err(diverged(format!(
                "{} score {} vs {expected}",
                team.id, team.score
            )));
        }
    }
    Ok(())
}
