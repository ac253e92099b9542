//! Style/tone prompt text
//!
//! The cache is keyed purely on the two input strings, so repeated lookups
//! return the same allocation.

use crate::types::{CopingStyle, Tone};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, OnceLock};

/// Default number of (style, tone) pairs kept
pub const PROMPT_CACHE_CAPACITY: usize = 128;

static PROMPT_CACHE: OnceLock<Mutex<PromptStyleCache>> = OnceLock::new();

/// Bounded memo of rendered style prompts, FIFO eviction
#[derive(Debug)]
pub struct PromptStyleCache {
    capacity: usize,
    entries: HashMap<(String, String), Arc<str>>,
    order: VecDeque<(String, String)>,
}

impl Default for PromptStyleCache {
    fn default() -> Self {
        Self::with_capacity(PROMPT_CACHE_CAPACITY)
    }
}

impl PromptStyleCache {
    /// Create a cache holding at most `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Rendered text for a (style, tone) pair
    pub fn get(&mut self, style: &str, tone: &str) -> Arc<str> {
        let key = (style.to_string(), tone.to_string());
        if let Some(text) = self.entries.get(&key) {
            return Arc::clone(text);
        }

        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }

        let text: Arc<str> = Arc::from(render(style, tone));
        self.entries.insert(key.clone(), Arc::clone(&text));
        self.order.push_back(key);
        text
    }

    /// Number of cached pairs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Prompt text for a style/tone pair from the process-wide cache
pub fn prompt_style(style: &str, tone: &str) -> Arc<str> {
    let cache = PROMPT_CACHE.get_or_init(|| Mutex::new(PromptStyleCache::default()));
    let mut guard = cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.get(style, tone)
}

fn render(style: &str, tone: &str) -> String {
    let traits = style
        .parse::<CopingStyle>()
        .map(|s| s.traits().join(", "))
        .unwrap_or_else(|_| "neutral".to_string());
    let tone = tone.parse::<Tone>().unwrap_or_default();

    format!(
        "You are an AI assistant adopting a {} strategy ({}). Respond with a tone that is {}.",
        style,
        traits,
        tone.description().to_lowercase()
    )
}
