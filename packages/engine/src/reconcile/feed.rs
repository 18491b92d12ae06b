//! Single-consumer snapshot queue in front of a [`MatchReconciler`].
//!
//! Snapshots may arrive from any number of producers; one task drains them in
//! arrival order so merges never overlap. Each merged state is published on a
//! `watch` channel for read-only consumers.

use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::errors::domain::DomainError;
use crate::reconcile::local_state::LocalMatchState;
use crate::reconcile::merge::MatchReconciler;

/// Producer side of the feed. Cheap to clone.
#[derive(Debug, Clone)]
pub struct FeedHandle {
    tx: mpsc::UnboundedSender<Value>,
}

impl FeedHandle {
    pub fn push(&self, snapshot: Value) -> Result<(), DomainError> {
        self.tx
            .send(snapshot)
            .map_err(|_| DomainError::channel("snapshot feed stopped"))
    }
}

/// Spawn the consumer task on the current tokio runtime.
///
/// The task ends once every [`FeedHandle`] is dropped and returns the
/// reconciler with its final state.
pub fn spawn_feed(
    reconciler: MatchReconciler,
) -> (
    FeedHandle,
    watch::Receiver<LocalMatchState>,
    JoinHandle<MatchReconciler>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(reconciler.state().clone());
    let handle = tokio::spawn(run_feed(reconciler, rx, state_tx));
    (FeedHandle { tx }, state_rx, handle)
}

async fn run_feed(
    mut reconciler: MatchReconciler,
    mut rx: mpsc::UnboundedReceiver<Value>,
    state_tx: watch::Sender<LocalMatchState>,
) -> MatchReconciler {
    while let Some(raw) = rx.recv().await {
        match reconciler.apply_value(raw) {
            Ok(state) => {
                state_tx.send_replace(state.clone());
            }
            Err(e) => warn!(error = %e, "skipping undecodable snapshot"),
        }
    }
    debug!(applied = reconciler.applied_count(), "snapshot feed closed");
    reconciler
}
