//! Services that drive regulation turns

pub mod regulator;
pub mod sessions;

pub use regulator::{Clock, Regulator, SystemClock, TurnOutcome};
pub use sessions::{RegistryStats, Session, SessionRegistry};
