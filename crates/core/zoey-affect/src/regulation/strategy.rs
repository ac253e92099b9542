//! Strategy bookkeeping
//!
//! Adaptive per-channel cooldowns and a composite efficacy score used by the
//! collaborator that rotates between conversational strategies.

use super::ledger::{population_std_dev, regression_slope, FeedbackLedger, RECENCY_WEIGHTS};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Recent scores kept per strategy for cooldown adaptation
pub const STRATEGY_FEEDBACK_WINDOW: usize = 5;

/// Upper bound on a strategy cooldown, in turns
pub const MAX_STRATEGY_COOLDOWN: u32 = 10;

/// Cooldown state for one strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyCooldown {
    /// Turns to wait before re-selecting this strategy
    pub cooldown: u32,

    /// Most recent feedback scores, oldest first
    pub recent_feedback: VecDeque<f64>,
}

impl Default for StrategyCooldown {
    fn default() -> Self {
        Self {
            cooldown: 1,
            recent_feedback: VecDeque::with_capacity(STRATEGY_FEEDBACK_WINDOW),
        }
    }
}

impl StrategyCooldown {
    fn record(&mut self, feedback: f64) {
        if self.recent_feedback.len() == STRATEGY_FEEDBACK_WINDOW {
            self.recent_feedback.pop_front();
        }
        self.recent_feedback.push_back(feedback);
    }

    fn adapt(&mut self) {
        if self.recent_feedback.is_empty() {
            return;
        }
        let avg = self.recent_feedback.iter().sum::<f64>() / self.recent_feedback.len() as f64;
        if avg < -0.5 {
            self.cooldown = (self.cooldown + 2).min(MAX_STRATEGY_COOLDOWN);
        } else if avg < 0.0 {
            self.cooldown = self.cooldown.saturating_sub(1).max(1);
        }
    }
}

/// Cooldowns for every strategy seen in a conversation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyTracker {
    strategies: HashMap<String, StrategyCooldown>,
}

impl StrategyTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record feedback for a strategy and adapt its cooldown. Returns the
    /// cooldown after adaptation.
    pub fn record(&mut self, strategy: &str, feedback: f64) -> u32 {
        let entry = self.strategies.entry(strategy.to_string()).or_default();
        entry.record(feedback);
        entry.adapt();
        entry.cooldown
    }

    /// Current cooldown for a strategy (1 for unseen strategies)
    pub fn cooldown(&self, strategy: &str) -> u32 {
        self.strategies.get(strategy).map(|s| s.cooldown).unwrap_or(1)
    }

    /// Cooldown state for a strategy
    pub fn get(&self, strategy: &str) -> Option<&StrategyCooldown> {
        self.strategies.get(strategy)
    }

    /// Forget every strategy
    pub fn clear(&mut self) {
        self.strategies.clear();
    }
}

/// Composite evaluation of a strategy's track record
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyScore {
    /// Recency-weighted, trend-adjusted average feedback
    pub efficacy: f64,
    /// 1 - population std-dev of all feedback, floored at 0
    pub stability: f64,
    /// tanh of the slope over the whole history (-1 to 1)
    pub trend: f64,
    /// 0.6 efficacy + 0.2 stability + 0.2 normalised trend
    pub composite: f64,
}

/// Score a strategy from its full ledger history
pub fn evaluate(ledger: &FeedbackLedger, strategy: &str, window_count: usize) -> StrategyScore {
    let history: Vec<f64> = ledger.events(strategy).iter().map(|e| e.feedback).collect();
    if history.is_empty() {
        return StrategyScore::default();
    }

    let efficacy = ledger.weighted_recent_average(strategy, window_count, &RECENCY_WEIGHTS, true);
    let stability = 1.0 - population_std_dev(&history).min(1.0);
    let trend = regression_slope(&history).tanh();
    let composite = efficacy * 0.6 + stability * 0.2 + (trend + 1.0) / 2.0 * 0.2;

    StrategyScore {
        efficacy,
        stability,
        trend,
        composite,
    }
}

/// Every strategy in the ledger with its score, best composite first
pub fn rank(ledger: &FeedbackLedger, window_count: usize) -> Vec<(String, StrategyScore)> {
    let mut scored: Vec<(String, StrategyScore)> = ledger
        .channels()
        .map(|channel| (channel.to_string(), evaluate(ledger, channel, window_count)))
        .collect();

    scored.sort_by_key(|(name, score)| (std::cmp::Reverse(OrderedFloat(score.composite)), name.clone()));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_cooldown_grows_on_hostile_feedback() {
        let mut tracker = StrategyTracker::new();
        tracker.record("reflective_listening", -1.0);
        tracker.record("reflective_listening", -0.5);
        let cooldown = tracker.record("reflective_listening", -1.0);
        assert!(cooldown >= 4);
        assert!(cooldown <= MAX_STRATEGY_COOLDOWN);
    }

    #[test]
    fn test_cooldown_relaxes_on_mildly_negative_feedback() {
        let mut tracker = StrategyTracker::new();
        for _ in 0..3 {
            tracker.record("mirror", -1.0);
        }
        let peak = tracker.cooldown("mirror");
        // The window still holds the hostile scores for a few turns
        for _ in 0..10 {
            tracker.record("mirror", -0.2);
        }
        assert!(tracker.cooldown("mirror") < peak);
        assert!(tracker.cooldown("mirror") >= 1);
    }

    #[test]
    fn test_cooldown_window_is_bounded() {
        let mut tracker = StrategyTracker::new();
        for i in 0..12 {
            tracker.record("echo", i as f64 / 12.0);
        }
        let state = tracker.get("echo").unwrap();
        assert_eq!(state.recent_feedback.len(), STRATEGY_FEEDBACK_WINDOW);
        assert_eq!(state.cooldown, 1);
        assert_eq!(tracker.cooldown("unseen"), 1);
    }

    #[test]
    fn test_evaluate_and_rank() {
        let now = Utc::now();
        let mut ledger = FeedbackLedger::new();
        for i in 0..4 {
            let t = now + Duration::seconds(i);
            ledger.append("praise", 0.8, t, 1.0);
            ledger.append("silence", -0.6 - 0.1 * i as f64, t, 1.0);
        }

        let empty = evaluate(&ledger, "unknown", 3);
        assert_eq!(empty, StrategyScore::default());

        let praise = evaluate(&ledger, "praise", 3);
        assert!((praise.stability - 1.0).abs() < 1e-9);
        assert!(praise.trend.abs() < 1e-9);

        let silence = evaluate(&ledger, "silence", 3);
        assert!(silence.trend < 0.0);
        assert!(silence.composite < praise.composite);

        let ranking = rank(&ledger, 3);
        assert_eq!(ranking[0].0, "praise");
        assert_eq!(ranking[1].0, "silence");
    }
}
