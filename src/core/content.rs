/// Content pack loading, schema validation, and the candidate filter pipeline.

use std::fmt;
use std::path::Path;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::schema::entry::ContentEntry;
use crate::schema::scene::ScenePhase;
use crate::schema::state::EngineState;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schema error in entry '{event_id}': {reason}")]
    Schema { event_id: String, reason: String },
}

/// How many candidates each filter dimension eliminated, so a caller can
/// decide which constraint to relax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterBreakdown {
    pub pool: usize,
    pub phase: usize,
    pub environment: usize,
    pub include_tags: usize,
    pub exclude_tags: usize,
    pub recent: usize,
    pub cooldowns: usize,
}

impl fmt::Display for FilterBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pool={} eliminated by phase={}, environment={}, include_tags={}, \
             exclude_tags={}, recent={}, cooldowns={}",
            self.pool,
            self.phase,
            self.environment,
            self.include_tags,
            self.exclude_tags,
            self.recent,
            self.cooldowns
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// Every entry was eliminated. Fatal to the call; the core never
    /// relaxes filters on its own.
    #[error("content pool exhausted ({0})")]
    PoolExhausted(FilterBreakdown),
}

/// Parse a JSON content pack (an array of entries), validating each entry
/// once at load time. Generation never re-validates.
pub fn parse_pack(input: &str) -> Result<Vec<ContentEntry>, PackError> {
    let entries: Vec<ContentEntry> = serde_json::from_str(input)?;
    for entry in &entries {
        validate_entry(entry)?;
    }
    Ok(entries)
}

/// Load a content pack from a JSON file.
pub fn load_pack(path: &Path) -> Result<Vec<ContentEntry>, PackError> {
    let contents = std::fs::read_to_string(path)?;
    parse_pack(&contents)
}

/// Union several packs in load order. On duplicate `event_id`, the
/// later-loaded entry overrides the earlier one in place, so ordering
/// stays deterministic.
pub fn merge_packs(packs: Vec<Vec<ContentEntry>>) -> Vec<ContentEntry> {
    let mut merged: Vec<ContentEntry> = Vec::new();
    let mut index_by_id: FxHashMap<String, usize> = FxHashMap::default();

    for pack in packs {
        for entry in pack {
            match index_by_id.get(&entry.event_id).copied() {
                Some(i) => merged[i] = entry,
                None => {
                    index_by_id.insert(entry.event_id.clone(), merged.len());
                    merged.push(entry);
                }
            }
        }
    }
    merged
}

fn validate_entry(entry: &ContentEntry) -> Result<(), PackError> {
    let fail = |reason: &str| -> Result<(), PackError> {
        Err(PackError::Schema {
            event_id: entry.event_id.clone(),
            reason: reason.to_string(),
        })
    };

    if entry.event_id.is_empty() {
        return fail("event_id must not be empty");
    }
    if entry.title.is_empty() {
        return fail("title must not be empty");
    }
    if !entry.severity_band.is_valid() {
        return fail("severity_band must satisfy 1 <= min <= max <= 10");
    }
    if !(entry.weight.is_finite() && entry.weight > 0.0) {
        return fail("weight must be a positive finite number");
    }
    if entry.phases.is_empty() {
        return fail("phases must not be empty");
    }
    if entry.environments.is_empty() {
        return fail("environments must not be empty");
    }
    Ok(())
}

/// Narrow `entries` to the candidates valid for this call.
///
/// Filters apply in a fixed order: phase, environment intersection,
/// include/exclude tags, recent-event rejection, tag cooldowns. An empty
/// result is a hard failure carrying the per-dimension breakdown.
pub fn filter_entries<'a>(
    entries: &'a [ContentEntry],
    phase: ScenePhase,
    environment: &[String],
    include_tags: &[String],
    exclude_tags: &[String],
    state: &EngineState,
) -> Result<Vec<&'a ContentEntry>, FilterError> {
    let mut breakdown = FilterBreakdown {
        pool: entries.len(),
        ..FilterBreakdown::default()
    };

    let mut candidates: Vec<&ContentEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !entry.allows_phase(phase) {
            breakdown.phase += 1;
            continue;
        }
        if !entry.matches_environment(environment) {
            breakdown.environment += 1;
            continue;
        }
        if !include_tags.is_empty() && !include_tags.iter().any(|t| entry.has_tag(t)) {
            breakdown.include_tags += 1;
            continue;
        }
        if exclude_tags.iter().any(|t| entry.has_tag(t)) {
            breakdown.exclude_tags += 1;
            continue;
        }
        if state.recency_position(&entry.event_id).is_some() {
            breakdown.recent += 1;
            continue;
        }
        if state.any_tag_cooling(&entry.tags) {
            breakdown.cooldowns += 1;
            continue;
        }
        candidates.push(entry);
    }

    debug!(
        phase = phase.name(),
        remaining = candidates.len(),
        %breakdown,
        "filtered content pool"
    );

    if candidates.is_empty() {
        return Err(FilterError::PoolExhausted(breakdown));
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::entry::{Fiction, SeverityBand};

    fn entry(id: &str, tags: &[&str], phases: &[ScenePhase], envs: &[&str]) -> ContentEntry {
        ContentEntry {
            event_id: id.to_string(),
            title: format!("Entry {id}"),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            phases: phases.to_vec(),
            environments: envs.iter().map(|e| e.to_string()).collect(),
            severity_band: SeverityBand(1, 10),
            weight: 1.0,
            cooldown: FxHashMap::default(),
            effect_vector: Default::default(),
            fiction: Fiction {
                prompt: "...".to_string(),
                choices: Vec::new(),
            },
            followups: Vec::new(),
        }
    }

    fn pool() -> Vec<ContentEntry> {
        vec![
            entry("ev_a", &["hazard"], &[ScenePhase::Engage], &["dungeon"]),
            entry("ev_b", &["mystic"], &[ScenePhase::Engage], &["dungeon", "ruins"]),
            entry("ev_c", &["hazard"], &[ScenePhase::Approach], &["dungeon"]),
            entry("ev_d", &["social_friction"], &[ScenePhase::Engage], &["city"]),
        ]
    }

    fn strs(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_pack_valid_json() {
        let json = r#"[{
            "event_id": "ev_one",
            "title": "One",
            "tags": ["hazard"],
            "phases": ["engage"],
            "environments": ["dungeon"],
            "severity_band": [1, 5],
            "weight": 1.0,
            "fiction": {"prompt": "p", "choices": []}
        }]"#;
        let entries = parse_pack(json).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event_id, "ev_one");
    }

    #[test]
    fn parse_pack_missing_field_is_json_error() {
        let json = r#"[{"event_id": "ev_broken", "title": "Broken"}]"#;
        assert!(matches!(parse_pack(json), Err(PackError::Json(_))));
    }

    #[test]
    fn parse_pack_invalid_band_is_schema_error() {
        let json = r#"[{
            "event_id": "ev_band",
            "title": "Bad Band",
            "tags": [],
            "phases": ["engage"],
            "environments": ["dungeon"],
            "severity_band": [7, 2],
            "weight": 1.0,
            "fiction": {"prompt": "p"}
        }]"#;
        match parse_pack(json) {
            Err(PackError::Schema { event_id, reason }) => {
                assert_eq!(event_id, "ev_band");
                assert!(reason.contains("severity_band"));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn parse_pack_rejects_zero_weight() {
        let json = r#"[{
            "event_id": "ev_w",
            "title": "Weightless",
            "tags": [],
            "phases": ["engage"],
            "environments": ["dungeon"],
            "severity_band": [1, 5],
            "weight": 0.0,
            "fiction": {"prompt": "p"}
        }]"#;
        assert!(matches!(parse_pack(json), Err(PackError::Schema { .. })));
    }

    #[test]
    fn merge_later_pack_overrides() {
        let mut a = entry("ev_shared", &["hazard"], &[ScenePhase::Engage], &["dungeon"]);
        a.weight = 1.0;
        let mut b = entry("ev_shared", &["hazard"], &[ScenePhase::Engage], &["dungeon"]);
        b.weight = 5.0;
        let only = entry("ev_only", &["mystic"], &[ScenePhase::Engage], &["ruins"]);

        let merged = merge_packs(vec![vec![a, only], vec![b]]);
        assert_eq!(merged.len(), 2);
        // Override lands at the original position with the new content
        assert_eq!(merged[0].event_id, "ev_shared");
        assert_eq!(merged[0].weight, 5.0);
        assert_eq!(merged[1].event_id, "ev_only");
    }

    #[test]
    fn filter_by_phase_and_environment() {
        let entries = pool();
        let state = EngineState::default();
        let result = filter_entries(
            &entries,
            ScenePhase::Engage,
            &strs(&["dungeon"]),
            &[],
            &[],
            &state,
        )
        .unwrap();
        let ids: Vec<&str> = result.iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, vec!["ev_a", "ev_b"]);
    }

    #[test]
    fn filter_include_tags_any_of() {
        let entries = pool();
        let state = EngineState::default();
        let result = filter_entries(
            &entries,
            ScenePhase::Engage,
            &strs(&["dungeon", "ruins"]),
            &strs(&["mystic"]),
            &[],
            &state,
        )
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].event_id, "ev_b");
    }

    #[test]
    fn filter_exclude_tags_reject() {
        let entries = pool();
        let state = EngineState::default();
        let result = filter_entries(
            &entries,
            ScenePhase::Engage,
            &strs(&["dungeon"]),
            &[],
            &strs(&["mystic"]),
            &state,
        )
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].event_id, "ev_a");
    }

    #[test]
    fn filter_rejects_recent_events() {
        let entries = pool();
        let mut state = EngineState::default();
        state.recent_event_ids.push("ev_a".to_string());
        let result = filter_entries(
            &entries,
            ScenePhase::Engage,
            &strs(&["dungeon"]),
            &[],
            &[],
            &state,
        )
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].event_id, "ev_b");
    }

    #[test]
    fn filter_rejects_cooling_tags() {
        let entries = pool();
        let mut state = EngineState::default();
        state.tag_cooldowns.insert("hazard".to_string(), 2);
        let result = filter_entries(
            &entries,
            ScenePhase::Engage,
            &strs(&["dungeon"]),
            &[],
            &[],
            &state,
        )
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].event_id, "ev_b");
    }

    #[test]
    fn exhausted_pool_reports_breakdown() {
        let entries = pool();
        let mut state = EngineState::default();
        state.tag_cooldowns.insert("hazard".to_string(), 1);
        state.tag_cooldowns.insert("mystic".to_string(), 1);
        let err = filter_entries(
            &entries,
            ScenePhase::Engage,
            &strs(&["dungeon"]),
            &[],
            &[],
            &state,
        )
        .unwrap_err();
        let FilterError::PoolExhausted(b) = err;
        assert_eq!(b.pool, 4);
        assert_eq!(b.phase, 1);
        assert_eq!(b.environment, 1);
        assert_eq!(b.cooldowns, 2);

        let msg = FilterError::PoolExhausted(b).to_string();
        assert!(msg.contains("content pool exhausted"));
        assert!(msg.contains("cooldowns=2"));
    }
}
