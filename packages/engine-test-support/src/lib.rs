//! Engine test support utilities
//!
//! Unified test logging initialization and JSON snapshot fixtures shared by
//! unit tests and integration tests.

pub mod snapshot_fixtures;
pub mod test_logging;
