//! Energy and resilience bookkeeping
//!
//! Resilience moves first on every turn; energy is then drained, restored
//! or left to drift using the updated resilience. Recovery is deliberately
//! slower than drain.

use crate::types::{clamp_feedback, RegulatorState, RESILIENCE_FLOOR};

/// Per-turn energy/resilience update
#[derive(Debug, Clone, Copy, Default)]
pub struct EnergyResilienceTracker;

impl EnergyResilienceTracker {
    /// Apply one turn of feedback.
    ///
    /// `external_baseline` replaces the state's own energy as the starting
    /// point for this turn only (e.g. a system-load signal).
    pub fn update(state: &mut RegulatorState, feedback: f64, external_baseline: Option<f64>) {
        let feedback = clamp_feedback(feedback);

        state.resilience = next_resilience(state.resilience, feedback);

        let baseline = external_baseline
            .filter(|b| !b.is_nan())
            .unwrap_or(state.energy)
            .clamp(0.0, 1.0);

        state.energy = next_energy(baseline, feedback, state.resilience);
    }
}

fn next_resilience(resilience: f64, feedback: f64) -> f64 {
    if feedback > 0.0 {
        (resilience + 0.05).min(1.0)
    } else if feedback < 0.0 {
        (resilience - 0.03).max(RESILIENCE_FLOOR)
    } else {
        (resilience - 0.005).max(RESILIENCE_FLOOR)
    }
}

fn next_energy(baseline: f64, feedback: f64, resilience: f64) -> f64 {
    let energy = if feedback < 0.0 {
        let drain = 0.10 + 0.10 * feedback.abs();
        let modifier = 1.0 + 0.60 * (1.0 - resilience);
        baseline - drain * modifier
    } else if feedback > 0.0 {
        baseline + 0.04 * feedback + 0.02 * resilience
    } else {
        baseline - 0.01 * (1.0 + 0.3 * (1.0 - resilience))
    };
    energy.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_feedback_drains() {
        let mut state = RegulatorState::default();
        EnergyResilienceTracker::update(&mut state, -1.0, None);
        assert!((state.resilience - 0.97).abs() < 1e-9);
        // drain 0.2 amplified by 1 + 0.6 * 0.03
        assert!((state.energy - (1.0 - 0.2 * 1.018)).abs() < 1e-9);
    }

    #[test]
    fn test_positive_feedback_recovers_slowly() {
        let mut state = RegulatorState::default();
        state.energy = 0.5;
        state.resilience = 0.9;
        EnergyResilienceTracker::update(&mut state, 1.0, None);
        assert!((state.resilience - 0.95).abs() < 1e-9);
        assert!((state.energy - (0.5 + 0.04 + 0.02 * 0.95)).abs() < 1e-9);
    }

    #[test]
    fn test_neutral_feedback_drifts() {
        let mut state = RegulatorState::default();
        EnergyResilienceTracker::update(&mut state, 0.0, None);
        assert!((state.resilience - 0.995).abs() < 1e-9);
        assert!(state.energy < 1.0);
        assert!(state.energy > 0.98);
    }

    #[test]
    fn test_external_baseline_overrides_energy() {
        let mut state = RegulatorState::default();
        EnergyResilienceTracker::update(&mut state, -1.0, Some(0.4));
        assert!(state.energy < 0.4);

        let mut state = RegulatorState::default();
        EnergyResilienceTracker::update(&mut state, 0.5, Some(7.0));
        assert_eq!(state.energy, 1.0);
    }

    #[test]
    fn test_low_resilience_amplifies_drain() {
        let mut sturdy = RegulatorState::default();
        sturdy.energy = 0.8;
        let mut fragile = RegulatorState::default();
        fragile.energy = 0.8;
        fragile.resilience = RESILIENCE_FLOOR;

        EnergyResilienceTracker::update(&mut sturdy, -0.5, None);
        EnergyResilienceTracker::update(&mut fragile, -0.5, None);
        assert!(fragile.energy < sturdy.energy);
        assert_eq!(fragile.resilience, RESILIENCE_FLOOR);
    }
}
