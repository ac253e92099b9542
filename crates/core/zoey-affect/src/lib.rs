//! ZoeyOS Affective Regulation Core
//!
//! Tracks the cumulative affective load of a conversation and turns it into
//! two tokens for response generation: a coping style and a tone.
//!
//! # Overview
//!
//! Each turn the caller supplies a feedback score in `[-1, 1]` and the
//! channel (conversational strategy or topic) it applies to. The regulator
//! then:
//!
//! - **FeedbackLedger**: appends the score to the channel's time-stamped
//!   history and computes recency-weighted, trend-adjusted averages.
//!
//! - **DebtModel**: grows emotion debt along a saturating curve and maps it
//!   onto a breakdown curve for burst comparison.
//!
//! - **EnergyResilienceTracker**: drains or restores energy, with resilience
//!   dampening the drain.
//!
//! - **BurstDetector**: classifies the turn as baseline, mild, moderate or
//!   severe when low energy, a negative trend and high debt coincide.
//!
//! - **RecoveryController**: partially restores energy, writes down debt and
//!   starts a cooling period after a burst.
//!
//! - **CopingStyleSelector**: maps the tier to a style and tone, suppressing
//!   switches inside a cooldown window.
//!
//! - **PromptStyleCache**: memoized style/tone prompt text.
//!
//! # Example Usage
//!
//! ```rust
//! use zoey_affect::{Regulator, RegulatorConfig, UserProfile};
//!
//! let regulator = Regulator::new(RegulatorConfig::default().with_profile(UserProfile::Neutral));
//! let mut state = regulator.new_state();
//!
//! let outcome = regulator.process_turn(&mut state, "reflective_listening", -0.6);
//! println!("{} / {}", outcome.style, outcome.tone);
//! println!("{}", outcome.prompt);
//! ```
//!
//! State is owned by the caller; hosts serving many conversations can keep
//! states in a [`SessionRegistry`].

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Error types
pub mod error;
/// Configuration and environment loading
pub mod config;
/// Core types
pub mod types;
/// Per-turn regulation components
pub mod regulation;
/// Regulator and session services
pub mod services;

pub use config::{load_env, RegulatorConfig, SessionConfig};
pub use error::{AffectError, Result};
pub use regulation::{
    prompt_style, BurstDetector, CopingStyleSelector, DebtModel, EnergyResilienceTracker,
    FeedbackLedger, PromptStyleCache, RecoveryController, StrategyScore, StrategyTracker,
};
pub use services::{Clock, RegistryStats, Regulator, Session, SessionRegistry, SystemClock, TurnOutcome};
pub use types::*;

/// Regulator with default settings for a profile
pub fn regulator_for_profile(profile: UserProfile) -> Regulator {
    Regulator::new(RegulatorConfig::default().with_profile(profile))
}
