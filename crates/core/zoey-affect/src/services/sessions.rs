//! Session registry
//!
//! Hosts serving many conversations keep one [`RegulatorState`] per
//! conversation here. Each session sits behind its own async mutex, so a
//! turn runs the whole regulation pipeline under one lock.

use super::regulator::{Regulator, TurnOutcome};
use crate::config::SessionConfig;
use crate::types::RegulatorState;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// One regulated conversation
#[derive(Debug, Clone)]
pub struct Session {
    /// Affective state of the conversation
    pub state: RegulatorState,

    /// Session start
    pub created_at: DateTime<Utc>,

    /// Last turn (or creation)
    pub last_activity: DateTime<Utc>,
}

impl Session {
    fn new(state: RegulatorState, now: DateTime<Utc>) -> Self {
        Self {
            state,
            created_at: now,
            last_activity: now,
        }
    }

    /// Check if this session has been idle too long
    pub fn is_stale(&self, max_idle_secs: u64, now: DateTime<Utc>) -> bool {
        let elapsed = now.signed_duration_since(self.last_activity).num_seconds();
        elapsed > 0 && elapsed as u64 > max_idle_secs
    }
}

/// Registry statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryStats {
    /// Sessions in memory
    pub active_sessions: usize,
    /// Turns processed across those sessions
    pub total_turns: u64,
    /// Sessions currently in a cooling period
    pub cooling_sessions: usize,
    /// Mean energy across sessions (1.0 when empty)
    pub avg_energy: f64,
}

/// Conversation-keyed regulator sessions
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    regulator: Regulator,
    config: SessionConfig,
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(Regulator::default(), SessionConfig::default())
    }
}

impl SessionRegistry {
    /// Create a registry
    pub fn new(regulator: Regulator, config: SessionConfig) -> Self {
        Self {
            regulator,
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The shared regulator
    pub fn regulator(&self) -> &Regulator {
        &self.regulator
    }

    /// Get or create the session for a conversation
    pub async fn session(&self, conversation: Uuid) -> Arc<Mutex<Session>> {
        if let Some(session) = self.sessions.read().await.get(&conversation) {
            return Arc::clone(session);
        }

        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(conversation).or_insert_with(|| {
            tracing::debug!(conversation = %conversation, "Creating regulator session");
            Arc::new(Mutex::new(Session::new(
                self.regulator.new_state(),
                self.regulator.now(),
            )))
        });
        Arc::clone(session)
    }

    /// Regulate one turn of a conversation
    pub async fn process_turn(&self, conversation: Uuid, channel: &str, feedback: f64) -> TurnOutcome {
        let session = self.session(conversation).await;
        let mut session = session.lock().await;

        let now = self.regulator.now();
        let outcome = self
            .regulator
            .process_turn_at(&mut session.state, channel, feedback, now, None);
        if now > session.last_activity {
            session.last_activity = now;
        }
        outcome
    }

    /// Reset a conversation's state. Returns false for unknown conversations.
    pub async fn reset(&self, conversation: Uuid) -> bool {
        let session = self.sessions.read().await.get(&conversation).cloned();
        match session {
            Some(session) => {
                let mut session = session.lock().await;
                session.state.reset();
                session.last_activity = self.regulator.now();
                tracing::info!(conversation = %conversation, "Regulator session reset");
                true
            }
            None => false,
        }
    }

    /// Drop a conversation
    pub async fn remove(&self, conversation: Uuid) -> bool {
        self.sessions.write().await.remove(&conversation).is_some()
    }

    /// Number of sessions in memory
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the registry holds no sessions
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Evict idle sessions, then the least recently active ones beyond
    /// `max_sessions`. Returns how many were removed.
    pub async fn run_maintenance(&self) -> usize {
        let now = self.regulator.now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        let mut activity = Vec::with_capacity(sessions.len());
        for (id, session) in sessions.iter() {
            let session = session.lock().await;
            activity.push((*id, session.last_activity, session.is_stale(self.config.session_idle_timeout, now)));
        }

        for (id, _, stale) in &activity {
            if *stale {
                sessions.remove(id);
            }
        }

        if sessions.len() > self.config.max_sessions {
            let mut live: Vec<_> = activity.into_iter().filter(|(_, _, stale)| !stale).collect();
            live.sort_by_key(|(_, last_activity, _)| *last_activity);
            let excess = sessions.len() - self.config.max_sessions;
            for (id, _, _) in live.into_iter().take(excess) {
                sessions.remove(&id);
            }
        }

        let removed = before - sessions.len();
        if removed > 0 {
            tracing::info!(removed, remaining = sessions.len(), "Evicted regulator sessions");
        }
        removed
    }

    /// Get statistics about the registry
    pub async fn stats(&self) -> RegistryStats {
        let sessions = self.sessions.read().await;
        let mut stats = RegistryStats {
            active_sessions: sessions.len(),
            ..Default::default()
        };

        let mut energy = 0.0;
        for session in sessions.values() {
            let session = session.lock().await;
            stats.total_turns += session.state.turn_count;
            if session.state.cooling_period > 0 {
                stats.cooling_sessions += 1;
            }
            energy += session.state.energy;
        }
        stats.avg_energy = if sessions.is_empty() {
            1.0
        } else {
            energy / sessions.len() as f64
        };
        stats
    }
}
