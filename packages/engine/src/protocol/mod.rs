//! Wire-facing types: inbound snapshots and outbound play submissions.

pub mod snapshot;
pub mod submission;

pub use snapshot::{
    GameplayBranch, MatchBranch, MatchSnapshot, PlayersBranch, ScoresBranch, TeamMember,
    TeamShape, TeamsBranch,
};
pub use submission::{ChannelSink, PlaySink, PlaySubmission};
