/// Pure state transitions. Snapshots in, snapshots out; nothing mutates.

use crate::schema::state::{EngineState, StateDelta, CLOCK_MAX, RECENT_WINDOW};

/// Advance time by `ticks`: every tag cooldown drops by that much,
/// floored at zero, and expired entries are removed.
///
/// `recent_event_ids` is deliberately not time-decayed. The window only
/// shrinks through FIFO eviction when a new id is recorded; other
/// invariants assume exactly that behavior.
pub fn tick_state(state: &EngineState, ticks: u32) -> EngineState {
    let tag_cooldowns = state
        .tag_cooldowns
        .iter()
        .filter_map(|(tag, remaining)| {
            let left = remaining.saturating_sub(ticks);
            (left > 0).then(|| (tag.clone(), left))
        })
        .collect();

    EngineState {
        clocks: state.clocks.clone(),
        recent_event_ids: state.recent_event_ids.clone(),
        tag_cooldowns,
        flags: state.flags.clone(),
    }
}

/// Fold one event's delta into the state.
///
/// The event id is pushed to the front of the recency window (oldest
/// evicted past [`RECENT_WINDOW`]); cooldowns are max-merged so repeated
/// triggers never shorten an active cooldown; clock deltas clamp to
/// `0..=CLOCK_MAX`; flag changes overwrite.
pub fn apply_state_delta(state: &EngineState, delta: &StateDelta) -> EngineState {
    let mut recent = Vec::with_capacity(RECENT_WINDOW);
    recent.push(delta.event_id.clone());
    recent.extend(state.recent_event_ids.iter().cloned());
    recent.truncate(RECENT_WINDOW);

    let mut tag_cooldowns = state.tag_cooldowns.clone();
    for (tag, value) in &delta.tag_cooldowns_set {
        let slot = tag_cooldowns.entry(tag.clone()).or_insert(0);
        *slot = (*slot).max(*value);
    }
    tag_cooldowns.retain(|_, v| *v > 0);

    let mut clocks = state.clocks.clone();
    for (name, d) in &delta.clock_deltas {
        let current = clocks.get(name).copied().unwrap_or(0);
        clocks.insert(name.clone(), (current + d).clamp(0, CLOCK_MAX));
    }

    let mut flags = state.flags.clone();
    for (name, value) in &delta.flag_changes {
        flags.insert(name.clone(), *value);
    }

    EngineState {
        clocks,
        recent_event_ids: recent,
        tag_cooldowns,
        flags,
    }
}
