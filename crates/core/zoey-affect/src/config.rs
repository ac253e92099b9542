//! Configuration management and environment variable loading

use crate::error::{AffectError, Result};
use crate::types::UserProfile;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Load environment variables from a .env file.
///
/// A missing file is not an error; the process environment is used as is.
///
/// # Example
///
/// ```no_run
/// use zoey_affect::load_env;
///
/// load_env().ok();
/// let config = zoey_affect::RegulatorConfig::from_env();
/// ```
pub fn load_env() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!("Loaded environment from: {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::LineParse(line, pos)) => Err(AffectError::config(format!(
            "Failed to parse .env file at line {}, position {}",
            line, pos
        ))),
        Err(dotenvy::Error::Io(_)) => {
            tracing::debug!("No .env file found - using system environment variables only");
            Ok(())
        }
        Err(e) => Err(AffectError::config(format!("Failed to load .env file: {}", e))),
    }
}

/// Parse an environment variable, falling back to `default` when it is unset
/// or malformed
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Tunables for a [`crate::Regulator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatorConfig {
    /// Minimum seconds between accepted style (and tone) switches
    pub style_cooldown_secs: u64,

    /// Events feeding the recency-weighted trend average
    pub recent_window: usize,

    /// Look-back for the plain windowed feedback average, in seconds
    pub feedback_window_secs: f64,

    /// Per-channel history bound (None = unbounded)
    pub max_events_per_channel: Option<usize>,

    /// Profile used for states built by the regulator
    pub profile: UserProfile,
}

impl Default for RegulatorConfig {
    fn default() -> Self {
        Self {
            style_cooldown_secs: 60,
            recent_window: 3,
            feedback_window_secs: 300.0,
            max_events_per_channel: None,
            profile: UserProfile::Neutral,
        }
    }
}

impl RegulatorConfig {
    /// Load from environment variables. Malformed values fall back to the
    /// defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            style_cooldown_secs: env_or("AFFECT_STYLE_COOLDOWN_SECS", defaults.style_cooldown_secs),
            recent_window: env_or("AFFECT_RECENT_WINDOW", defaults.recent_window).max(1),
            feedback_window_secs: env_or("AFFECT_FEEDBACK_WINDOW_SECS", defaults.feedback_window_secs),
            max_events_per_channel: env::var("AFFECT_MAX_EVENTS_PER_CHANNEL")
                .ok()
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|n| *n > 0),
            profile: env::var("AFFECT_PROFILE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.profile),
        }
    }

    /// Like [`RegulatorConfig::from_env`], but a malformed `AFFECT_PROFILE`
    /// is an error
    pub fn try_from_env() -> Result<Self> {
        let mut config = Self::from_env();
        if let Ok(raw) = env::var("AFFECT_PROFILE") {
            config.profile = raw.parse()?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.recent_window == 0 {
            return Err(AffectError::validation("recent_window must be at least 1"));
        }
        if !(self.feedback_window_secs.is_finite() && self.feedback_window_secs > 0.0) {
            return Err(AffectError::validation(format!(
                "feedback_window_secs must be positive, got {}",
                self.feedback_window_secs
            )));
        }
        if self.max_events_per_channel == Some(0) {
            return Err(AffectError::validation("max_events_per_channel must be at least 1"));
        }
        Ok(())
    }

    /// Set the profile
    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set the style switch cooldown
    pub fn with_style_cooldown_secs(mut self, secs: u64) -> Self {
        self.style_cooldown_secs = secs;
        self
    }

    /// Bound per-channel history
    pub fn with_max_events_per_channel(mut self, max: usize) -> Self {
        self.max_events_per_channel = Some(max.max(1));
        self
    }
}

/// Limits for a [`crate::SessionRegistry`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session idle timeout in seconds
    pub session_idle_timeout: u64,

    /// Maximum sessions to keep in memory
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_idle_timeout: 3600, // 1 hour
            max_sessions: 1000,
        }
    }
}

impl SessionConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            session_idle_timeout: env_or("AFFECT_SESSION_IDLE_TIMEOUT", defaults.session_idle_timeout),
            max_sessions: env_or("AFFECT_MAX_SESSIONS", defaults.max_sessions).max(1),
        }
    }
}
