//! Regulator state
//!
//! One instance per conversation, owned by whoever handles that
//! conversation. Every field exists from construction on; nothing is
//! attached later.

use super::{BurstThresholds, CopingStyle, Tone, UserProfile};
use crate::error::Result;
use crate::regulation::{FeedbackLedger, StrategyTracker};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lower bound on resilience
pub const RESILIENCE_FLOOR: f64 = 0.2;

/// Complete affective state of one conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatorState {
    /// Cumulative unresolved negative affect (>= 0)
    pub emotion_debt: f64,

    /// Available coping capacity (0.0 to 1.0)
    pub energy: f64,

    /// Dampens energy drain (0.2 to 1.0)
    pub resilience: f64,

    /// Per-channel feedback history
    pub history: FeedbackLedger,

    /// Coping style currently in effect
    pub last_style: CopingStyle,

    /// When the coping style last changed
    pub last_switch_time: Option<DateTime<Utc>>,

    /// Tone currently in effect
    pub last_tone: Tone,

    /// When the tone last changed
    pub last_tone_switch_time: Option<DateTime<Utc>>,

    /// Turns left before a new burst may trigger recovery again
    pub cooling_period: u32,

    /// Adaptive per-strategy cooldowns
    pub strategies: StrategyTracker,

    /// Turns processed since construction or the last reset
    pub turn_count: u64,

    profile: UserProfile,

    burst_thresholds: BurstThresholds,
}

impl Default for RegulatorState {
    fn default() -> Self {
        Self::new(UserProfile::Neutral)
    }
}

impl RegulatorState {
    /// Create a fresh state for a user profile
    pub fn new(profile: UserProfile) -> Self {
        Self {
            emotion_debt: 0.0,
            energy: 1.0,
            resilience: 1.0,
            history: FeedbackLedger::new(),
            last_style: CopingStyle::default(),
            last_switch_time: None,
            last_tone: Tone::default(),
            last_tone_switch_time: None,
            cooling_period: 0,
            strategies: StrategyTracker::new(),
            turn_count: 0,
            profile,
            burst_thresholds: BurstThresholds::for_profile(profile),
        }
    }

    /// Create a fresh state whose ledger keeps at most `max_events` per channel
    pub fn with_retention(profile: UserProfile, max_events: Option<usize>) -> Self {
        let mut state = Self::new(profile);
        state.history = FeedbackLedger::with_retention(max_events);
        state
    }

    /// Profile this state was built for
    pub fn profile(&self) -> UserProfile {
        self.profile
    }

    /// Thresholds derived from the profile at construction
    pub fn burst_thresholds(&self) -> BurstThresholds {
        self.burst_thresholds
    }

    /// Restore the initial affective state. Profile, thresholds and the
    /// ledger's retention bound are kept.
    pub fn reset(&mut self) {
        let retention = self.history.retention();
        *self = Self::with_retention(self.profile, retention);
    }

    /// Re-establish the numeric invariants
    pub fn clamp_invariants(&mut self) {
        self.energy = if self.energy.is_nan() { 0.0 } else { self.energy.clamp(0.0, 1.0) };
        self.resilience = if self.resilience.is_nan() {
            RESILIENCE_FLOOR
        } else {
            self.resilience.clamp(RESILIENCE_FLOOR, 1.0)
        };
        self.emotion_debt = if self.emotion_debt.is_nan() { 0.0 } else { self.emotion_debt.max(0.0) };
    }

    /// Pretty JSON snapshot for diagnostics
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to context for LLM prompts
    pub fn to_context(&self) -> String {
        format!(
            "Affective state: style={}, tone={}\n\
             Emotion debt: {:.2}\n\
             Energy: {:.2} (exhausted to rested)\n\
             Resilience: {:.2}\n\
             Cooling turns left: {}",
            self.last_style,
            self.last_tone,
            self.emotion_debt,
            self.energy,
            self.resilience,
            self.cooling_period
        )
    }
}
