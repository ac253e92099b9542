//! Feedback events recorded by the ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One feedback observation on a channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    /// Feedback score (-1.0 to 1.0)
    pub feedback: f64,

    /// When the feedback was recorded
    pub timestamp: DateTime<Utc>,

    /// Energy level at the time of recording
    pub energy_snapshot: f64,
}

impl FeedbackEvent {
    /// Create an event, clamping the score into range
    pub fn new(feedback: f64, timestamp: DateTime<Utc>, energy_snapshot: f64) -> Self {
        Self {
            feedback: clamp_feedback(feedback),
            timestamp,
            energy_snapshot: energy_snapshot.clamp(0.0, 1.0),
        }
    }

    /// Seconds between this event and `now`
    pub fn age_secs(&self, now: DateTime<Utc>) -> f64 {
        now.signed_duration_since(self.timestamp).num_milliseconds() as f64 / 1000.0
    }
}

/// Clamp a feedback score into [-1, 1], treating NaN as neutral
pub fn clamp_feedback(feedback: f64) -> f64 {
    if feedback.is_nan() {
        0.0
    } else {
        feedback.clamp(-1.0, 1.0)
    }
}
