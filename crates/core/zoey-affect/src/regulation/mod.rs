//! Per-turn regulation components
//!
//! Leaf-first: debt and ledger feed energy bookkeeping and burst detection,
//! which drive recovery and coping-style selection.

pub mod burst;
pub mod coping;
pub mod debt;
pub mod energy;
pub mod ledger;
pub mod prompt_style;
pub mod recovery;
pub mod strategy;

pub use burst::{pressure_level, scaled_thresholds, tier_thresholds, BurstDetector, TierThresholds};
pub use coping::{style_for_tier, tone_for_tier, CopingStyleSelector, DEFAULT_SWITCH_COOLDOWN_SECS};
pub use debt::DebtModel;
pub use energy::EnergyResilienceTracker;
pub use ledger::{FeedbackLedger, RECENCY_WEIGHTS, TREND_COEFFICIENT};
pub use prompt_style::{prompt_style, PromptStyleCache, PROMPT_CACHE_CAPACITY};
pub use recovery::{recovery_params, RecoveryController, RecoveryParams};
pub use strategy::{evaluate, rank, StrategyCooldown, StrategyScore, StrategyTracker};
