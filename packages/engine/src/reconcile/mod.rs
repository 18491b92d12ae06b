//! Merging authoritative snapshots into local typed state.

pub mod feed;
pub mod local_state;
pub mod merge;

#[cfg(test)]
mod tests_merge;

pub use feed::{spawn_feed, FeedHandle};
pub use local_state::LocalMatchState;
pub use merge::MatchReconciler;
