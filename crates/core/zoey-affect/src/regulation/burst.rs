//! Burst detection
//!
//! A tier fires only when low energy, a negative recent trend on the channel
//! and high (display) debt all line up. Tiers are checked from most to least
//! severe and the first match wins.

use super::debt::DebtModel;
use super::ledger::RECENCY_WEIGHTS;
use crate::types::{BurstThresholds, BurstTier, RegulatorState};
use serde::{Deserialize, Serialize};

/// Thresholds for a single burst tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    /// Energy must be strictly below this
    pub energy: f64,
    /// Display debt must be at or above this
    pub debt: f64,
}

/// Unscaled thresholds for a tier; `None` for baseline
pub fn tier_thresholds(tier: BurstTier) -> Option<TierThresholds> {
    match tier {
        BurstTier::Severe => Some(TierThresholds { energy: 0.3, debt: 5.0 }),
        BurstTier::Moderate => Some(TierThresholds { energy: 0.5, debt: 3.0 }),
        BurstTier::Mild => Some(TierThresholds { energy: 0.7, debt: 2.0 }),
        BurstTier::Baseline => None,
    }
}

/// Classifies a channel's current turn into a burst tier
#[derive(Debug, Clone, Copy)]
pub struct BurstDetector {
    /// How many recent events feed the trend average
    pub recent_window: usize,
}

impl Default for BurstDetector {
    fn default() -> Self {
        Self { recent_window: 3 }
    }
}

impl BurstDetector {
    /// Create a detector reading `recent_window` events
    pub fn new(recent_window: usize) -> Self {
        Self {
            recent_window: recent_window.max(1),
        }
    }

    /// Classify the state for a channel
    pub fn classify(&self, state: &RegulatorState, channel: &str) -> BurstTier {
        let recent_avg = state.history.weighted_recent_average(
            channel,
            self.recent_window,
            &RECENCY_WEIGHTS,
            true,
        );
        let debt = DebtModel::display(state.emotion_debt);
        let scale = state.burst_thresholds();

        let tier = BurstTier::ESCALATION_ORDER
            .into_iter()
            .find(|tier| match scaled_thresholds(*tier, &scale) {
                Some(t) => state.energy < t.energy && recent_avg < 0.0 && debt >= t.debt,
                None => false,
            })
            .unwrap_or(BurstTier::Baseline);

        tracing::trace!(
            channel = %channel,
            energy = state.energy,
            display_debt = debt,
            recent_avg,
            tier = %tier,
            "Burst classification"
        );

        tier
    }
}

/// Tier thresholds after applying the profile scale
pub fn scaled_thresholds(tier: BurstTier, scale: &BurstThresholds) -> Option<TierThresholds> {
    tier_thresholds(tier).map(|t| TierThresholds {
        energy: t.energy * scale.energy_scale(),
        debt: t.debt * scale.debt_scale(),
    })
}

/// Debt-only pressure reading, independent of energy and trend.
///
/// Cut points sit at 20%, 60% and 100% of the profile's debt threshold.
/// Diagnostic only; it never triggers recovery.
pub fn pressure_level(debt: f64, thresholds: &BurstThresholds) -> BurstTier {
    let t = thresholds.debt;
    if debt >= t {
        BurstTier::Severe
    } else if debt >= 0.6 * t {
        BurstTier::Moderate
    } else if debt > 0.2 * t {
        BurstTier::Mild
    } else {
        BurstTier::Baseline
    }
}
