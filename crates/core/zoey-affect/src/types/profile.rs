//! User profile traits and the burst thresholds derived from them

use crate::error::{AffectError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base energy threshold before profile scaling
pub const BASE_ENERGY_THRESHOLD: f64 = 1.0;

/// Base debt threshold before profile scaling
pub const BASE_DEBT_THRESHOLD: f64 = 2.5;

/// Personality trait of the user a conversation is regulated for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserProfile {
    /// Thresholds scaled down (0.8x)
    Resilient,
    /// Thresholds scaled up (1.2x)
    Neurotic,
    /// Unscaled thresholds
    #[default]
    Neutral,
}

impl UserProfile {
    /// Multiplier applied to every base threshold
    pub fn threshold_scale(&self) -> f64 {
        match self {
            UserProfile::Resilient => 0.8,
            UserProfile::Neurotic => 1.2,
            UserProfile::Neutral => 1.0,
        }
    }

    /// Stable token for this profile
    pub fn as_str(&self) -> &'static str {
        match self {
            UserProfile::Resilient => "resilient",
            UserProfile::Neurotic => "neurotic",
            UserProfile::Neutral => "neutral",
        }
    }
}

impl fmt::Display for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for UserProfile {
    type Err = AffectError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "resilient" => Ok(UserProfile::Resilient),
            "neurotic" => Ok(UserProfile::Neurotic),
            "neutral" | "" => Ok(UserProfile::Neutral),
            _ => Err(AffectError::unknown_name(
                "profile",
                s,
                "resilient, neurotic, neutral",
            )),
        }
    }
}

/// Per-metric burst thresholds, fixed when a state is constructed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurstThresholds {
    /// Scaled energy threshold
    pub energy: f64,
    /// Scaled debt threshold
    pub debt: f64,
}

impl BurstThresholds {
    /// Derive thresholds for a profile
    pub fn for_profile(profile: UserProfile) -> Self {
        let scale = profile.threshold_scale();
        Self {
            energy: BASE_ENERGY_THRESHOLD * scale,
            debt: BASE_DEBT_THRESHOLD * scale,
        }
    }

    /// Factor applied to tier energy thresholds
    pub fn energy_scale(&self) -> f64 {
        self.energy / BASE_ENERGY_THRESHOLD
    }

    /// Factor applied to tier debt thresholds
    pub fn debt_scale(&self) -> f64 {
        self.debt / BASE_DEBT_THRESHOLD
    }
}

impl Default for BurstThresholds {
    fn default() -> Self {
        Self::for_profile(UserProfile::Neutral)
    }
}
