//! Post-burst recovery
//!
//! Severe bursts get a smaller immediate energy bump, a larger debt
//! write-down and a longer cooling period than mild ones.

use crate::types::{BurstTier, RegulatorState};
use serde::{Deserialize, Serialize};

/// Recovery applied after a tier fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryParams {
    /// Energy added (capped at 1.0)
    pub energy_recovery: f64,
    /// Multiplier applied to emotion debt
    pub debt_decay: f64,
    /// Cooling period in turns
    pub cooldown_turns: u32,
}

/// Recovery parameters for a tier; `None` for baseline
pub fn recovery_params(tier: BurstTier) -> Option<RecoveryParams> {
    match tier {
        BurstTier::Mild => Some(RecoveryParams {
            energy_recovery: 0.2,
            debt_decay: 0.7,
            cooldown_turns: 1,
        }),
        BurstTier::Moderate => Some(RecoveryParams {
            energy_recovery: 0.1,
            debt_decay: 0.5,
            cooldown_turns: 2,
        }),
        BurstTier::Severe => Some(RecoveryParams {
            energy_recovery: 0.05,
            debt_decay: 0.3,
            cooldown_turns: 3,
        }),
        BurstTier::Baseline => None,
    }
}

/// Applies recovery after a burst
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveryController;

impl RecoveryController {
    /// Restore energy, write down debt and start the cooling period.
    /// Returns whether anything was applied.
    pub fn apply(state: &mut RegulatorState, tier: BurstTier) -> bool {
        let Some(params) = recovery_params(tier) else {
            return false;
        };

        state.energy = (state.energy + params.energy_recovery).min(1.0);
        state.emotion_debt *= params.debt_decay;
        state.cooling_period = params.cooldown_turns;

        tracing::debug!(
            tier = %tier,
            energy = state.energy,
            debt = state.emotion_debt,
            cooling = state.cooling_period,
            "Burst recovery applied"
        );

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_per_tier() {
        let cases = [
            (BurstTier::Mild, 0.5, 2.0, 1),
            (BurstTier::Moderate, 0.3, 3.5, 2),
            (BurstTier::Severe, 0.1, 6.0, 3),
        ];
        for (tier, energy, debt, cooling) in cases {
            let mut state = RegulatorState::default();
            state.energy = energy;
            state.emotion_debt = debt;

            assert!(RecoveryController::apply(&mut state, tier));
            assert!(state.energy > energy, "{tier}");
            assert!(state.emotion_debt < debt, "{tier}");
            assert_eq!(state.cooling_period, cooling);
        }
    }

    #[test]
    fn test_baseline_is_noop() {
        let mut state = RegulatorState::default();
        state.energy = 0.4;
        state.emotion_debt = 2.0;
        assert!(!RecoveryController::apply(&mut state, BurstTier::Baseline));
        assert_eq!(state.energy, 0.4);
        assert_eq!(state.emotion_debt, 2.0);
        assert_eq!(state.cooling_period, 0);
    }

    #[test]
    fn test_energy_capped() {
        let mut state = RegulatorState::default();
        state.energy = 0.95;
        state.emotion_debt = 2.5;
        RecoveryController::apply(&mut state, BurstTier::Mild);
        assert_eq!(state.energy, 1.0);
    }

    #[test]
    fn test_severe_bump_is_smallest() {
        let mild = recovery_params(BurstTier::Mild).unwrap();
        let severe = recovery_params(BurstTier::Severe).unwrap();
        assert!(severe.energy_recovery < mild.energy_recovery);
        assert!(severe.debt_decay < mild.debt_decay);
        assert!(severe.cooldown_turns > mild.cooldown_turns);
    }
}
