//! Feedback Ledger
//!
//! Per-channel, append-only log of feedback events. Provides the two
//! averages the regulator reads:
//! - a time-windowed arithmetic mean
//! - a recency-weighted mean with an optional least-squares trend correction
//!
//! Channels are created lazily on first append; reads on unknown or empty
//! channels return a neutral `0.0`.

use crate::types::FeedbackEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Recency weights, most recent event first. Positions past the end of the
/// table carry no weight.
pub const RECENCY_WEIGHTS: [f64; 3] = [0.6, 0.3, 0.1];

/// Multiplier applied to the regression slope when trend correction is on
pub const TREND_COEFFICIENT: f64 = 0.3;

/// Per-channel feedback history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackLedger {
    channels: HashMap<String, Vec<FeedbackEvent>>,

    /// Oldest events beyond this count are dropped (None = keep everything)
    #[serde(default)]
    max_events_per_channel: Option<usize>,
}

impl FeedbackLedger {
    /// Create an unbounded ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger that keeps at most `max_events` per channel
    pub fn with_retention(max_events: Option<usize>) -> Self {
        Self {
            channels: HashMap::new(),
            max_events_per_channel: max_events.map(|m| m.max(1)),
        }
    }

    /// Retention bound, if any
    pub fn retention(&self) -> Option<usize> {
        self.max_events_per_channel
    }

    /// Append an event to a channel and return the stored event.
    ///
    /// Timestamps older than the channel's latest event are moved up to it so
    /// a channel's history never goes backwards in time.
    pub fn append(
        &mut self,
        channel: &str,
        feedback: f64,
        timestamp: DateTime<Utc>,
        energy_snapshot: f64,
    ) -> FeedbackEvent {
        let history = self.channels.entry(channel.to_string()).or_default();

        let timestamp = match history.last() {
            Some(last) if timestamp < last.timestamp => {
                tracing::warn!(
                    channel = %channel,
                    given = %timestamp,
                    latest = %last.timestamp,
                    "Out-of-order feedback timestamp, clamping to latest"
                );
                last.timestamp
            }
            _ => timestamp,
        };

        let event = FeedbackEvent::new(feedback, timestamp, energy_snapshot);
        history.push(event);

        if let Some(max) = self.max_events_per_channel {
            if history.len() > max {
                let excess = history.len() - max;
                history.drain(..excess);
            }
        }

        event
    }

    /// All events recorded for a channel, oldest first
    pub fn events(&self, channel: &str) -> &[FeedbackEvent] {
        self.channels
            .get(channel)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Known channel ids
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    /// Whether a channel has been seen
    pub fn contains(&self, channel: &str) -> bool {
        self.channels.contains_key(channel)
    }

    /// Total number of events across all channels
    pub fn total_events(&self) -> usize {
        self.channels.values().map(Vec::len).sum()
    }

    /// Drop every channel
    pub fn clear(&mut self) {
        self.channels.clear();
    }

    /// Mean feedback over events no older than `window_secs`
    pub fn windowed_average(&self, channel: &str, window_secs: f64, now: DateTime<Utc>) -> f64 {
        let (sum, count) = self
            .events(channel)
            .iter()
            .filter(|e| e.age_secs(now) <= window_secs)
            .fold((0.0, 0usize), |(sum, count), e| (sum + e.feedback, count + 1));

        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    /// Recency-weighted average over the last `window_count` events.
    ///
    /// The most recent event takes `weights[0]`, the one before it
    /// `weights[1]` and so on; events beyond the weight table contribute
    /// nothing. With `apply_trend` and at least two events, the slope of
    /// feedback over chronological index is added, scaled by
    /// [`TREND_COEFFICIENT`].
    pub fn weighted_recent_average(
        &self,
        channel: &str,
        window_count: usize,
        weights: &[f64],
        apply_trend: bool,
    ) -> f64 {
        let history = self.events(channel);
        if history.is_empty() || window_count == 0 {
            return 0.0;
        }

        let recent = &history[history.len().saturating_sub(window_count)..];

        let weighted: f64 = recent
            .iter()
            .rev()
            .zip(weights.iter())
            .map(|(event, weight)| event.feedback * weight)
            .sum();

        if apply_trend && recent.len() >= 2 {
            let values: Vec<f64> = recent.iter().map(|e| e.feedback).collect();
            weighted + regression_slope(&values) * TREND_COEFFICIENT
        } else {
            weighted
        }
    }

    /// Weighted average with the default weight table and trend correction
    pub fn recent_trend(&self, channel: &str, window_count: usize) -> f64 {
        self.weighted_recent_average(channel, window_count, &RECENCY_WEIGHTS, true)
    }
}

/// Ordinary least-squares slope of `values` over their index
pub(crate) fn regression_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let mean_x = (n - 1) as f64 / 2.0;
    let mean_y = values.iter().sum::<f64>() / n as f64;

    let (num, den) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, y)| {
            let dx = i as f64 - mean_x;
            (num + dx * (y - mean_y), den + dx * dx)
        });

    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Population standard deviation; fewer than two values read as 0
pub(crate) fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn seeded(values: &[f64]) -> FeedbackLedger {
        let mut ledger = FeedbackLedger::new();
        let start = Utc::now() - Duration::seconds(values.len() as i64 * 10);
        for (i, v) in values.iter().enumerate() {
            ledger.append("probe", *v, start + Duration::seconds(i as i64 * 10), 1.0);
        }
        ledger
    }

    #[test]
    fn test_unknown_channel_is_neutral() {
        let ledger = FeedbackLedger::new();
        assert_eq!(ledger.windowed_average("nope", 300.0, Utc::now()), 0.0);
        assert_eq!(ledger.recent_trend("nope", 3), 0.0);
        assert!(ledger.events("nope").is_empty());
    }

    #[test]
    fn test_windowed_average_ignores_stale_events() {
        let now = Utc::now();
        let mut ledger = FeedbackLedger::new();
        ledger.append("mirror", -1.0, now - Duration::seconds(600), 1.0);
        ledger.append("mirror", 0.5, now - Duration::seconds(100), 1.0);
        ledger.append("mirror", 1.0, now - Duration::seconds(10), 1.0);

        let avg = ledger.windowed_average("mirror", 300.0, now);
        assert!((avg - 0.75).abs() < 1e-9);

        // Everything stale
        assert_eq!(ledger.windowed_average("mirror", 5.0, now), 0.0);
    }

    #[test]
    fn test_weighted_average_favours_recent() {
        // Oldest 1.0, then 0.5, newest -1.0
        let ledger = seeded(&[1.0, 0.5, -1.0]);
        let plain = ledger.weighted_recent_average("probe", 3, &RECENCY_WEIGHTS, false);
        assert!((plain - (-0.6 + 0.15 + 0.1)).abs() < 1e-9);

        // A falling run is pulled further down by the trend term
        let trended = ledger.recent_trend("probe", 3);
        assert!(trended < plain);
        assert!((trended - (plain - 0.3)).abs() < 1e-9);
    }

    #[test]
    fn test_weights_beyond_table_are_zero() {
        let ledger = seeded(&[-1.0, -1.0, -1.0, 1.0, 1.0, 1.0]);
        let three = ledger.weighted_recent_average("probe", 3, &RECENCY_WEIGHTS, false);
        let six = ledger.weighted_recent_average("probe", 6, &RECENCY_WEIGHTS, false);
        assert!((three - 1.0).abs() < 1e-9);
        assert!((six - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_event_uses_truncated_weights() {
        let ledger = seeded(&[-1.0]);
        assert!((ledger.recent_trend("probe", 3) + 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_order_append_is_clamped() {
        let now = Utc::now();
        let mut ledger = FeedbackLedger::new();
        ledger.append("echo", 0.1, now, 1.0);
        let event = ledger.append("echo", 0.2, now - Duration::seconds(30), 1.0);
        assert_eq!(event.timestamp, now);

        let events = ledger.events("echo");
        assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_retention_bound() {
        let mut ledger = FeedbackLedger::with_retention(Some(2));
        let now = Utc::now();
        for i in 0..5 {
            ledger.append("echo", i as f64 / 10.0, now + Duration::seconds(i), 1.0);
        }
        let events = ledger.events("echo");
        assert_eq!(events.len(), 2);
        assert!((events[0].feedback - 0.3).abs() < 1e-9);
        assert_eq!(ledger.total_events(), 2);
    }

    #[test]
    fn test_regression_slope() {
        assert_eq!(regression_slope(&[0.4]), 0.0);
        assert!((regression_slope(&[1.0, 0.5, -1.0]) + 1.0).abs() < 1e-9);
        assert_eq!(regression_slope(&[0.2, 0.2, 0.2]), 0.0);
    }

    #[test]
    fn test_population_std_dev() {
        assert_eq!(population_std_dev(&[1.0]), 0.0);
        assert!((population_std_dev(&[1.0, -1.0]) - 1.0).abs() < 1e-9);
    }
}
