//! Domain-level error type used across the engine.
//!
//! This error type is transport-agnostic. Callers that sit behind a network
//! boundary are expected to map it into their own wire errors.

use thiserror::Error;

/// Rule and input-contract violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    EmptyTrick,
    IncompleteTrick,
    DuplicatePlayer,
    UnknownPlayer,
    ParseCard,
    CardNotInHand,
    MustFollowSuit,
    OutOfTurn,
    MatchNotActive,
}

/// Central domain error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input validation or game rule violation
    #[error("validation error ({kind:?}): {detail}")]
    Validation { kind: ValidationKind, detail: String },
    /// Payload could not be decoded into a snapshot at all
    #[error("decode error: {0}")]
    Decode(String),
    /// Invalid engine configuration
    #[error("configuration error: {0}")]
    Config(String),
    /// A submission or snapshot channel was closed
    #[error("channel closed: {0}")]
    Channel(String),
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation {
            kind,
            detail: detail.into(),
        }
    }

    pub fn decode(detail: impl Into<String>) -> Self {
        Self::Decode(detail.into())
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config(detail.into())
    }

    pub fn channel(detail: impl Into<String>) -> Self {
        Self::Channel(detail.into())
    }

    /// Validation kind, if this is a rule violation.
    pub fn kind(&self) -> Option<ValidationKind> {
        match self {
            DomainError::Validation { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
