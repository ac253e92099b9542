//! Coping style selection with switch suppression
//!
//! Style and tone both follow the burst tier, but a new token is only
//! accepted when it differs from the current one and the cooldown since the
//! last accepted switch has elapsed. Style and tone keep separate switch
//! clocks and share the cooldown length.

use crate::types::{BurstTier, CopingStyle, RegulatorState, Tone};
use chrono::{DateTime, Duration, Utc};

/// Default minimum dwell time between switches, in seconds
pub const DEFAULT_SWITCH_COOLDOWN_SECS: i64 = 60;

/// Fixed tier to coping-style table
pub fn style_for_tier(tier: BurstTier) -> CopingStyle {
    match tier {
        BurstTier::Baseline => CopingStyle::EmotionFocused,
        BurstTier::Mild => CopingStyle::ProblemFocused,
        BurstTier::Moderate => CopingStyle::Avoidance,
        BurstTier::Severe => CopingStyle::Resentful,
    }
}

/// Fixed tier to tone table
pub fn tone_for_tier(tier: BurstTier) -> Tone {
    match tier {
        BurstTier::Baseline => Tone::Calm,
        BurstTier::Mild => Tone::Assertive,
        BurstTier::Moderate => Tone::Firm,
        BurstTier::Severe => Tone::Commanding,
    }
}

/// Cooldown-gated selector
#[derive(Debug, Clone, Copy)]
pub struct CopingStyleSelector {
    cooldown: Duration,
}

impl Default for CopingStyleSelector {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_SWITCH_COOLDOWN_SECS))
    }
}

impl CopingStyleSelector {
    /// Create a selector with the given cooldown
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown: cooldown.max(Duration::zero()),
        }
    }

    /// Cooldown between accepted switches
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Whether a switch away from `current` to `candidate` is allowed
    pub fn should_switch<T: PartialEq>(
        &self,
        current: T,
        candidate: T,
        last_switch: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> bool {
        if candidate == current {
            return false;
        }
        match last_switch {
            None => true,
            Some(at) => now.signed_duration_since(at) > self.cooldown,
        }
    }

    /// Gate a candidate style. Returns the style in effect after the gate.
    pub fn decide(&self, state: &mut RegulatorState, candidate: CopingStyle, now: DateTime<Utc>) -> CopingStyle {
        if self.should_switch(state.last_style, candidate, state.last_switch_time, now) {
            tracing::info!(
                from = %state.last_style,
                to = %candidate,
                "Coping style switch accepted"
            );
            state.last_style = candidate;
            state.last_switch_time = Some(advance(state.last_switch_time, now));
        } else if candidate != state.last_style {
            tracing::debug!(
                current = %state.last_style,
                candidate = %candidate,
                "Coping style switch suppressed"
            );
        }
        state.last_style
    }

    /// Gate a candidate tone. Returns the tone in effect after the gate.
    pub fn decide_tone(&self, state: &mut RegulatorState, candidate: Tone, now: DateTime<Utc>) -> Tone {
        if self.should_switch(state.last_tone, candidate, state.last_tone_switch_time, now) {
            tracing::debug!(from = %state.last_tone, to = %candidate, "Tone switch accepted");
            state.last_tone = candidate;
            state.last_tone_switch_time = Some(advance(state.last_tone_switch_time, now));
        }
        state.last_tone
    }

    /// Gate both tokens for a tier
    pub fn select(&self, state: &mut RegulatorState, tier: BurstTier, now: DateTime<Utc>) -> (CopingStyle, Tone) {
        let style = self.decide(state, style_for_tier(tier), now);
        let tone = self.decide_tone(state, tone_for_tier(tier), now);
        (style, tone)
    }
}

/// Switch times never move backwards
fn advance(previous: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    match previous {
        Some(prev) if prev > now => prev,
        _ => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_tables() {
        assert_eq!(style_for_tier(BurstTier::Baseline), CopingStyle::EmotionFocused);
        assert_eq!(style_for_tier(BurstTier::Mild), CopingStyle::ProblemFocused);
        assert_eq!(style_for_tier(BurstTier::Moderate), CopingStyle::Avoidance);
        assert_eq!(style_for_tier(BurstTier::Severe), CopingStyle::Resentful);
        assert_eq!(tone_for_tier(BurstTier::Severe), Tone::Commanding);
    }

    #[test]
    fn test_first_switch_is_accepted() {
        let selector = CopingStyleSelector::default();
        let mut state = RegulatorState::default();
        let now = Utc::now();

        let style = selector.decide(&mut state, CopingStyle::ProblemFocused, now);
        assert_eq!(style, CopingStyle::ProblemFocused);
        assert_eq!(state.last_switch_time, Some(now));
    }

    #[test]
    fn test_same_style_is_never_a_switch() {
        let selector = CopingStyleSelector::default();
        let mut state = RegulatorState::default();
        let style = selector.decide(&mut state, CopingStyle::EmotionFocused, Utc::now());
        assert_eq!(style, CopingStyle::EmotionFocused);
        assert!(state.last_switch_time.is_none());
    }

    #[test]
    fn test_switch_suppressed_within_cooldown() {
        let selector = CopingStyleSelector::default();
        let mut state = RegulatorState::default();
        let t0 = Utc::now();

        selector.decide(&mut state, CopingStyle::ProblemFocused, t0);
        let kept = selector.decide(&mut state, CopingStyle::Avoidance, t0 + Duration::seconds(30));
        assert_eq!(kept, CopingStyle::ProblemFocused);
        assert_eq!(state.last_switch_time, Some(t0));

        // Exactly at the cooldown is still too early
        let kept = selector.decide(&mut state, CopingStyle::Avoidance, t0 + Duration::seconds(60));
        assert_eq!(kept, CopingStyle::ProblemFocused);

        let switched = selector.decide(&mut state, CopingStyle::Avoidance, t0 + Duration::seconds(61));
        assert_eq!(switched, CopingStyle::Avoidance);
        assert_eq!(state.last_switch_time, Some(t0 + Duration::seconds(61)));
    }

    #[test]
    fn test_repeat_call_is_idempotent() {
        let selector = CopingStyleSelector::default();
        let mut state = RegulatorState::default();
        let t0 = Utc::now();

        selector.decide(&mut state, CopingStyle::Resentful, t0);
        let first = state.last_switch_time;
        selector.decide(&mut state, CopingStyle::Resentful, t0 + Duration::seconds(5));
        assert_eq!(state.last_switch_time, first);
    }

    #[test]
    fn test_tone_has_its_own_clock() {
        let selector = CopingStyleSelector::default();
        let mut state = RegulatorState::default();
        let t0 = Utc::now();

        let (style, tone) = selector.select(&mut state, BurstTier::Mild, t0);
        assert_eq!(style, CopingStyle::ProblemFocused);
        assert_eq!(tone, Tone::Assertive);

        let (style, tone) = selector.select(&mut state, BurstTier::Severe, t0 + Duration::seconds(10));
        assert_eq!(style, CopingStyle::ProblemFocused);
        assert_eq!(tone, Tone::Assertive);
        assert_eq!(state.last_tone_switch_time, Some(t0));
    }

    #[test]
    fn test_zero_cooldown_switches_immediately() {
        let selector = CopingStyleSelector::new(Duration::zero());
        let mut state = RegulatorState::default();
        let t0 = Utc::now();
        selector.decide(&mut state, CopingStyle::Avoidance, t0);
        let style = selector.decide(&mut state, CopingStyle::Resentful, t0 + Duration::milliseconds(1));
        assert_eq!(style, CopingStyle::Resentful);
    }
}
