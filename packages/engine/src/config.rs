//! Rule configuration for trick legality, tie-breaks and round-quality labels.
//!
//! Values come from the environment (all optional):
//! - `ISHEMA_FOLLOW_SUIT`: `enforced` (default) or `relaxed`
//! - `ISHEMA_TIE_BREAK`: `earliest` (default) or `face_rank`
//! - `ISHEMA_HIGH_VALUE_POINTS`: trick points for a "high" trick (default 20)
//! - `ISHEMA_MEDIUM_VALUE_POINTS`: trick points for a "medium" trick (default 10)

use std::env;
use std::str::FromStr;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::errors::domain::DomainError;

pub const DEFAULT_HIGH_VALUE_POINTS: u32 = 20;
pub const DEFAULT_MEDIUM_VALUE_POINTS: u32 = 10;

/// Whether a player holding the led suit must follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowSuitPolicy {
    /// Follow suit if able, otherwise any card (trump included).
    #[default]
    Enforced,
    /// Any card in hand is legal.
    Relaxed,
}

impl FromStr for FollowSuitPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enforced" => Ok(FollowSuitPolicy::Enforced),
            "relaxed" => Ok(FollowSuitPolicy::Relaxed),
            other => Err(DomainError::config(format!(
                "unknown follow-suit policy '{other}' (expected enforced|relaxed)"
            ))),
        }
    }
}

/// How two contending cards with equal point value are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// The card played first wins.
    #[default]
    EarliestPlay,
    /// Higher face rank (A > K > Q > J > 7 > 6 > 5 > 4 > 3) wins, then earliest.
    FaceRank,
}

impl FromStr for TieBreak {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "earliest" | "earliest_play" => Ok(TieBreak::EarliestPlay),
            "face_rank" | "face" => Ok(TieBreak::FaceRank),
            other => Err(DomainError::config(format!(
                "unknown tie-break '{other}' (expected earliest|face_rank)"
            ))),
        }
    }
}

/// Rules that the visible game leaves open, pinned down explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleConfig {
    pub follow_suit: FollowSuitPolicy,
    pub tie_break: TieBreak,
    /// Minimum trick points labelled `High`.
    pub high_value_points: u32,
    /// Minimum trick points labelled `Medium`.
    pub medium_value_points: u32,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            follow_suit: FollowSuitPolicy::default(),
            tie_break: TieBreak::default(),
            high_value_points: DEFAULT_HIGH_VALUE_POINTS,
            medium_value_points: DEFAULT_MEDIUM_VALUE_POINTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    pub rules: RuleConfig,
}

static GLOBAL: OnceCell<EngineConfig> = OnceCell::new();

impl EngineConfig {
    /// Build configuration from environment variables, defaulting unset ones.
    pub fn from_env() -> Result<Self, DomainError> {
        let mut rules = RuleConfig::default();

        if let Some(v) = opt_var("ISHEMA_FOLLOW_SUIT") {
            rules.follow_suit = v.parse()?;
        }
        if let Some(v) = opt_var("ISHEMA_TIE_BREAK") {
            rules.tie_break = v.parse()?;
        }
        if let Some(v) = opt_var("ISHEMA_HIGH_VALUE_POINTS") {
            rules.high_value_points = parse_points("ISHEMA_HIGH_VALUE_POINTS", &v)?;
        }
        if let Some(v) = opt_var("ISHEMA_MEDIUM_VALUE_POINTS") {
            rules.medium_value_points = parse_points("ISHEMA_MEDIUM_VALUE_POINTS", &v)?;
        }

        let config = Self { rules };
        config.validate()?;
        debug!(?config, "engine config loaded from environment");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.rules.medium_value_points > self.rules.high_value_points {
            return Err(DomainError::config(format!(
                "medium threshold {} exceeds high threshold {}",
                self.rules.medium_value_points, self.rules.high_value_points
            )));
        }
        Ok(())
    }

    /// Process-wide configuration, loaded from the environment on first use.
    pub fn global() -> Result<&'static EngineConfig, DomainError> {
        GLOBAL.get_or_try_init(Self::from_env)
    }
}

fn opt_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_points(name: &str, value: &str) -> Result<u32, DomainError> {
    value.trim().parse::<u32>().map_err(|_| {
        DomainError::config(format!(
            "environment variable '{name}' must be a non-negative integer, got '{value}'"
        ))
    })
}
