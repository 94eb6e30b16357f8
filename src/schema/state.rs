use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Maximum length of the recency window. Oldest ids are evicted FIFO when
/// a new event id is recorded.
pub const RECENT_WINDOW: usize = 12;

/// Clocks are progress-clock style counters clamped to `0..=CLOCK_MAX`.
pub const CLOCK_MAX: i32 = 12;

/// Immutable engine state snapshot.
///
/// The serde shape of this struct is also the save format consumed and
/// produced by external tooling:
/// `{"clocks": {...}, "recent_event_ids": [...], "tag_cooldowns": {...}, "flags": {...}}`.
/// It must round-trip losslessly. All transitions go through the pure
/// functions in [`crate::core::state`]; nothing mutates a snapshot in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub clocks: FxHashMap<String, i32>,
    /// Most-recent-first, bounded to [`RECENT_WINDOW`]. Not time-decayed:
    /// eviction only happens when a new id is pushed.
    pub recent_event_ids: Vec<String>,
    /// Remaining ticks per tag. Entries are removed when they reach zero.
    pub tag_cooldowns: FxHashMap<String, u32>,
    pub flags: FxHashMap<String, bool>,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            clocks: FxHashMap::default(),
            recent_event_ids: Vec::new(),
            tag_cooldowns: FxHashMap::default(),
            flags: FxHashMap::default(),
        }
    }
}

impl EngineState {
    /// Fresh state with no history, no cooldowns, no clocks, no flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of `event_id` in the recency window, 0 = just used.
    pub fn recency_position(&self, event_id: &str) -> Option<usize> {
        self.recent_event_ids.iter().position(|id| id == event_id)
    }

    /// True if any of the given tags currently has a nonzero cooldown.
    pub fn any_tag_cooling(&self, tags: &[String]) -> bool {
        tags.iter()
            .any(|t| self.tag_cooldowns.get(t).copied().unwrap_or(0) > 0)
    }
}

/// Changes produced by one generated event, applied by the caller via
/// [`crate::core::state::apply_state_delta`]. Cooldown values are *set*
/// (max-merged), not added.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StateDelta {
    pub event_id: String,
    pub tag_cooldowns_set: FxHashMap<String, u32>,
    pub clock_deltas: FxHashMap<String, i32>,
    pub flag_changes: FxHashMap<String, bool>,
}
