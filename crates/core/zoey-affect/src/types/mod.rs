//! Core types for affective regulation
//!
//! - BurstTier: distress classification of a turn
//! - CopingStyle / Tone: the tokens handed to prompt assembly
//! - UserProfile: trait that scales burst thresholds
//! - FeedbackEvent: one scored observation on a channel
//! - RegulatorState: the per-conversation state record

mod feedback;
mod profile;
mod state;
mod style;
mod tier;

pub use feedback::*;
pub use profile::*;
pub use state::*;
pub use style::*;
pub use tier::*;
