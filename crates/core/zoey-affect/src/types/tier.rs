//! Burst tiers
//!
//! The regulator's distress classification for a channel on a given turn.

use crate::error::{AffectError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distress classification, ordered from calm to most severe
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BurstTier {
    /// No burst
    #[default]
    Baseline,
    /// Mild burst
    Mild,
    /// Moderate burst
    Moderate,
    /// Severe burst
    Severe,
}

impl BurstTier {
    /// Burst tiers in the order they are evaluated (most severe first)
    pub const ESCALATION_ORDER: [BurstTier; 3] =
        [BurstTier::Severe, BurstTier::Moderate, BurstTier::Mild];

    /// Stable token for this tier
    pub fn as_str(&self) -> &'static str {
        match self {
            BurstTier::Baseline => "baseline",
            BurstTier::Mild => "mild",
            BurstTier::Moderate => "moderate",
            BurstTier::Severe => "severe",
        }
    }

    /// Whether this tier represents an actual burst
    pub fn is_burst(&self) -> bool {
        !matches!(self, BurstTier::Baseline)
    }
}

impl fmt::Display for BurstTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BurstTier {
    type Err = AffectError;

    fn from_str(s: &str) -> Result<Self> {
        // An empty tier string is the historical spelling of "no burst"
        match s.trim().to_lowercase().as_str() {
            "" | "baseline" => Ok(BurstTier::Baseline),
            "mild" => Ok(BurstTier::Mild),
            "moderate" => Ok(BurstTier::Moderate),
            "severe" => Ok(BurstTier::Severe),
            _ => Err(AffectError::unknown_name(
                "burst tier",
                s,
                "baseline, mild, moderate, severe",
            )),
        }
    }
}
