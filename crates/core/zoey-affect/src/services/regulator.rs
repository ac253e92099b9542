//! Regulator Service
//!
//! Runs one conversational turn through the full pipeline:
//!
//! ```text
//! ledger append → debt → energy/resilience → classify → recovery → style/tone → prompt
//! ```
//!
//! The regulator itself holds only configuration; all mutable state lives in
//! the caller-owned [`RegulatorState`].

use crate::config::RegulatorConfig;
use crate::regulation::{
    evaluate, pressure_level, prompt_style, rank, BurstDetector, CopingStyleSelector, DebtModel,
    EnergyResilienceTracker, RecoveryController, StrategyScore,
};
use crate::types::{clamp_feedback, BurstTier, CopingStyle, RegulatorState, Tone};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// Source of the current time for turns that do not carry their own
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Result of one regulated turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Coping style in effect after suppression
    pub style: CopingStyle,

    /// Tone in effect after suppression
    pub tone: Tone,

    /// Tier detected this turn
    pub tier: BurstTier,

    /// Debt-only pressure reading (diagnostic)
    pub pressure: BurstTier,

    /// Raw emotion debt after recovery
    pub emotion_debt: f64,

    /// Display debt the tier was classified on
    pub display_debt: f64,

    /// Energy after recovery
    pub energy: f64,

    /// Resilience after this turn
    pub resilience: f64,

    /// Mean channel feedback over the configured time window
    pub window_average: f64,

    /// Turns of cooling left
    pub cooling_period: u32,

    /// Adaptive cooldown of the turn's channel
    pub strategy_cooldown: u32,

    /// Whether recovery ran this turn
    pub recovery_applied: bool,

    /// Style prompt text for (style, tone)
    pub prompt: Arc<str>,
}

impl TurnOutcome {
    /// The (style, tone) token pair
    pub fn tokens(&self) -> (CopingStyle, Tone) {
        (self.style, self.tone)
    }

    /// Serialize to context for LLM prompts
    pub fn to_context(&self) -> String {
        format!(
            "Coping style: {} (tone: {})\n\
             Distress: {} (pressure: {})\n\
             Emotion debt: {:.2}\n\
             Energy: {:.2}, resilience: {:.2}\n\
             {}",
            self.style,
            self.tone,
            self.tier,
            self.pressure,
            self.emotion_debt,
            self.energy,
            self.resilience,
            self.prompt
        )
    }

    /// Flat template values for prompt assembly
    pub fn to_values(&self) -> HashMap<String, String> {
        let mut values = HashMap::new();
        values.insert("COPING_STYLE".to_string(), self.style.to_string());
        values.insert("TONE".to_string(), self.tone.to_string());
        values.insert("BURST_TIER".to_string(), self.tier.to_string());
        values.insert("EMOTION_DEBT".to_string(), format!("{:.2}", self.emotion_debt));
        values.insert("ENERGY".to_string(), format!("{:.2}", self.energy));
        values.insert("RESILIENCE".to_string(), format!("{:.2}", self.resilience));
        values.insert("STYLE_PROMPT".to_string(), self.prompt.to_string());
        values
    }

    /// Structured diagnostics
    pub fn to_data(&self) -> HashMap<String, serde_json::Value> {
        let mut data = HashMap::new();
        data.insert("style".to_string(), serde_json::json!(self.style));
        data.insert("tone".to_string(), serde_json::json!(self.tone));
        data.insert("tier".to_string(), serde_json::json!(self.tier));
        data.insert("pressure".to_string(), serde_json::json!(self.pressure));
        data.insert("emotion_debt".to_string(), serde_json::json!(self.emotion_debt));
        data.insert("display_debt".to_string(), serde_json::json!(self.display_debt));
        data.insert("energy".to_string(), serde_json::json!(self.energy));
        data.insert("resilience".to_string(), serde_json::json!(self.resilience));
        data.insert("window_average".to_string(), serde_json::json!(self.window_average));
        data.insert("cooling_period".to_string(), serde_json::json!(self.cooling_period));
        data.insert("strategy_cooldown".to_string(), serde_json::json!(self.strategy_cooldown));
        data.insert("recovery_applied".to_string(), serde_json::json!(self.recovery_applied));
        data
    }
}

/// Per-turn affective regulator
#[derive(Clone)]
pub struct Regulator {
    config: RegulatorConfig,
    detector: BurstDetector,
    selector: CopingStyleSelector,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Regulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Regulator")
            .field("config", &self.config)
            .field("detector", &self.detector)
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}

impl Default for Regulator {
    fn default() -> Self {
        Self::new(RegulatorConfig::default())
    }
}

impl Regulator {
    /// Create a regulator on the wall clock
    pub fn new(config: RegulatorConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a regulator with a custom clock
    pub fn with_clock(config: RegulatorConfig, clock: Arc<dyn Clock>) -> Self {
        let cooldown_secs = i64::try_from(config.style_cooldown_secs)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);
        Self {
            detector: BurstDetector::new(config.recent_window),
            selector: CopingStyleSelector::new(Duration::seconds(cooldown_secs)),
            config,
            clock,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &RegulatorConfig {
        &self.config
    }

    /// Current time from the regulator's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Fresh state for the configured profile and retention
    pub fn new_state(&self) -> RegulatorState {
        RegulatorState::with_retention(self.config.profile, self.config.max_events_per_channel)
    }

    /// Process one turn at the clock's current time
    pub fn process_turn(&self, state: &mut RegulatorState, channel: &str, feedback: f64) -> TurnOutcome {
        self.process_turn_at(state, channel, feedback, self.clock.now(), None)
    }

    /// Process one turn at an explicit time.
    ///
    /// `external_energy` replaces the state's energy as the starting point of
    /// the energy update for this turn only.
    pub fn process_turn_at(
        &self,
        state: &mut RegulatorState,
        channel: &str,
        feedback: f64,
        now: DateTime<Utc>,
        external_energy: Option<f64>,
    ) -> TurnOutcome {
        let score = clamp_feedback(feedback);
        if score != feedback {
            tracing::warn!(channel = %channel, given = feedback, clamped = score, "Feedback out of range, clamping");
        }

        let cooling = state.cooling_period > 0;
        if cooling {
            state.cooling_period -= 1;
        }

        state.history.append(channel, score, now, state.energy);
        state.emotion_debt = DebtModel::accumulate(state.emotion_debt, score);
        EnergyResilienceTracker::update(state, score, external_energy);
        let strategy_cooldown = state.strategies.record(channel, score);

        let tier = self.detector.classify(state, channel);
        let display_debt = DebtModel::display(state.emotion_debt);

        let recovery_applied = if !tier.is_burst() {
            false
        } else if cooling {
            tracing::debug!(
                channel = %channel,
                tier = %tier,
                cooling = state.cooling_period,
                "Burst detected while cooling, recovery skipped"
            );
            false
        } else {
            tracing::info!(
                channel = %channel,
                tier = %tier,
                display_debt,
                energy = state.energy,
                "Emotional burst detected"
            );
            RecoveryController::apply(state, tier)
        };

        let (style, tone) = self.selector.select(state, tier, now);

        state.turn_count += 1;
        state.clamp_invariants();

        tracing::debug!(
            channel = %channel,
            feedback = score,
            debt = state.emotion_debt,
            energy = state.energy,
            tier = %tier,
            style = %style,
            "Turn regulated"
        );

        TurnOutcome {
            style,
            tone,
            tier,
            pressure: pressure_level(state.emotion_debt, &state.burst_thresholds()),
            emotion_debt: state.emotion_debt,
            display_debt,
            energy: state.energy,
            resilience: state.resilience,
            window_average: state
                .history
                .windowed_average(channel, self.config.feedback_window_secs, now),
            cooling_period: state.cooling_period,
            strategy_cooldown,
            recovery_applied,
            prompt: prompt_style(style.as_str(), tone.as_str()),
        }
    }

    /// Composite score of one strategy from the state's ledger
    pub fn evaluate_strategy(&self, state: &RegulatorState, channel: &str) -> StrategyScore {
        evaluate(&state.history, channel, self.config.recent_window)
    }

    /// All strategies seen in the state, best composite first
    pub fn rank_strategies(&self, state: &RegulatorState) -> Vec<(String, StrategyScore)> {
        rank(&state.history, self.config.recent_window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserProfile;

    fn fixed_clock(at: DateTime<Utc>) -> Arc<dyn Clock> {
        let mut clock = MockClock::new();
        clock.expect_now().returning(move || at);
        Arc::new(clock)
    }

    #[test]
    fn test_turn_uses_clock() {
        let at = Utc::now() - Duration::hours(2);
        let regulator = Regulator::with_clock(RegulatorConfig::default(), fixed_clock(at));
        let mut state = regulator.new_state();

        regulator.process_turn(&mut state, "reflective_listening", -0.4);
        let events = state.history.events("reflective_listening");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp, at);
        assert_eq!(state.turn_count, 1);
    }

    #[test]
    fn test_positive_turn_stays_baseline() {
        let regulator = Regulator::default();
        let mut state = regulator.new_state();
        let outcome = regulator.process_turn(&mut state, "praise", 0.8);

        assert_eq!(outcome.tier, BurstTier::Baseline);
        assert_eq!(outcome.tokens(), (CopingStyle::EmotionFocused, Tone::Calm));
        assert!(!outcome.recovery_applied);
        assert!(outcome.window_average > 0.0);
    }

    #[test]
    fn test_out_of_range_feedback_is_clamped() {
        let regulator = Regulator::default();
        let mut state = regulator.new_state();
        regulator.process_turn(&mut state, "x", -7.0);
        regulator.process_turn(&mut state, "x", f64::NAN);

        let events = state.history.events("x");
        assert_eq!(events[0].feedback, -1.0);
        assert_eq!(events[1].feedback, 0.0);
        assert!(state.energy >= 0.0 && state.energy <= 1.0);
    }

    #[test]
    fn test_third_hostile_turn_fires_mild() {
        let t0 = Utc::now();
        let regulator = Regulator::default();
        let mut state = regulator.new_state();

        let mut outcome = None;
        for i in 0..3 {
            outcome = Some(regulator.process_turn_at(
                &mut state,
                "reflective_listening",
                -1.0,
                t0 + Duration::seconds(i * 5),
                None,
            ));
        }
        let outcome = outcome.unwrap();

        assert_eq!(outcome.tier, BurstTier::Mild);
        assert!(outcome.display_debt > 2.0);
        assert!(outcome.recovery_applied);
        assert_eq!(outcome.cooling_period, 1);
        assert_eq!(outcome.style, CopingStyle::ProblemFocused);
        assert_eq!(outcome.tone, Tone::Assertive);
        assert!(outcome.energy < 0.7);
        assert!(outcome.prompt.contains("problem_focused"));
    }

    #[test]
    fn test_cooling_blocks_repeat_recovery() {
        let t0 = Utc::now();
        let regulator = Regulator::default();
        let mut state = regulator.new_state();
        state.energy = 0.2;
        state.emotion_debt = 6.0;
        state.cooling_period = 2;

        let outcome = regulator.process_turn_at(&mut state, "c", -1.0, t0, None);
        assert_eq!(outcome.tier, BurstTier::Severe);
        assert!(!outcome.recovery_applied);
        assert_eq!(outcome.cooling_period, 1);
        // The tier still steers the style
        assert_eq!(outcome.style, CopingStyle::Resentful);

        let outcome = regulator.process_turn_at(&mut state, "c", -1.0, t0 + Duration::seconds(1), None);
        assert!(outcome.tier.is_burst());
        assert!(!outcome.recovery_applied);
        assert_eq!(outcome.cooling_period, 0);

        let outcome = regulator.process_turn_at(&mut state, "c", -1.0, t0 + Duration::seconds(2), None);
        assert_eq!(outcome.tier, BurstTier::Severe);
        assert!(outcome.recovery_applied);
        assert_eq!(outcome.cooling_period, 3);
    }

    #[test]
    fn test_values_and_context() {
        let regulator = Regulator::default();
        let mut state = regulator.new_state();
        let outcome = regulator.process_turn(&mut state, "praise", 0.5);

        let values = outcome.to_values();
        assert_eq!(values.get("COPING_STYLE").map(String::as_str), Some("emotion_focused"));
        assert_eq!(values.get("TONE").map(String::as_str), Some("calm"));
        assert_eq!(values.get("BURST_TIER").map(String::as_str), Some("baseline"));
        assert!(values.contains_key("STYLE_PROMPT"));
        assert!(outcome.to_context().contains("Coping style: emotion_focused"));
        assert_eq!(outcome.to_data()["tier"], serde_json::json!("baseline"));
    }

    #[test]
    fn test_profile_and_retention_flow_into_state() {
        let config = RegulatorConfig::default()
            .with_profile(UserProfile::Neurotic)
            .with_max_events_per_channel(2);
        let regulator = Regulator::new(config);
        let mut state = regulator.new_state();
        assert_eq!(state.profile(), UserProfile::Neurotic);

        let t0 = Utc::now();
        for i in 0..5 {
            regulator.process_turn_at(&mut state, "c", -0.1, t0 + Duration::seconds(i), None);
        }
        assert_eq!(state.history.events("c").len(), 2);
    }

    #[test]
    fn test_rank_strategies() {
        let regulator = Regulator::default();
        let mut state = regulator.new_state();
        let t0 = Utc::now();
        for i in 0..3 {
            let at = t0 + Duration::seconds(i);
            regulator.process_turn_at(&mut state, "praise", 0.9, at, None);
            regulator.process_turn_at(&mut state, "lecture", -0.9, at, None);
        }
        let ranking = regulator.rank_strategies(&state);
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].0, "praise");
        assert!(regulator.evaluate_strategy(&state, "lecture").efficacy < 0.0);
    }
}
