/// The engine's single public entry point: scene + state + filters → event.
///
/// Wires together the filter pipeline, severity sampler, cutoff resolver,
/// and selection engine, then assembles the event and its state delta.
/// Applying the delta is the caller's job; generation itself performs no
/// I/O and touches no shared state.

use thiserror::Error;
use tracing::debug;

use crate::schema::entry::ContentEntry;
use crate::schema::event::{CutoffArchetype, GeneratedEvent};
use crate::schema::scene::SceneContext;
use crate::schema::selection::SelectionContext;
use crate::schema::state::{EngineState, StateDelta};

use super::content::{filter_entries, FilterError};
use super::cutoff::resolve_cutoff;
use super::rng::{RngError, TraceRng};
use super::select::select_entry;
use super::severity::{compute_alpha, compute_severity_cap, sample_severity};

#[derive(Debug, Error)]
pub enum EngineError {
    /// Filtering removed every candidate. The message enumerates which
    /// dimensions eliminated entries so the caller can decide what to relax.
    #[error("{0}")]
    PoolExhausted(#[from] FilterError),
    /// Scene or selection inputs violate documented ranges. Raised before
    /// any RNG draw, so a failed call leaves the trace untouched.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("rng error: {0}")]
    Rng(#[from] RngError),
}

/// Generate one complication event.
///
/// Pure except for advancing `rng` (and its trace). The returned event
/// carries the `StateDelta` the caller must fold in via
/// [`super::state::apply_state_delta`] before the next call; nothing is
/// retried or relaxed internally.
pub fn generate_event(
    scene: &SceneContext,
    state: &EngineState,
    selection: &SelectionContext,
    entries: &[ContentEntry],
    rng: &mut TraceRng,
) -> Result<GeneratedEvent, EngineError> {
    validate_inputs(scene)?;

    let candidates = filter_entries(
        entries,
        scene.phase,
        &scene.environment,
        &selection.include_tags,
        &selection.exclude_tags,
        state,
    )?;

    let alpha = compute_alpha(selection.rarity_mode, &scene.morphology);
    let cap = compute_severity_cap(
        scene.party_band,
        scene.phase,
        &scene.morphology,
        state,
        selection.rarity_mode,
    );

    let raw = sample_severity(rng, alpha)?;
    let severity = raw.min(cap);
    let cutoff_applied = raw > cap;
    let cutoff_resolution = if cutoff_applied {
        Some(resolve_cutoff(raw - cap, rng)?)
    } else {
        None
    };

    let entry = select_entry(&candidates, severity, state, rng)?;

    debug!(
        scene = scene.scene_id.as_str(),
        event = entry.event_id.as_str(),
        raw,
        severity,
        cap,
        cutoff_applied,
        "generated complication"
    );

    let state_delta = build_delta(entry, cutoff_resolution.as_ref().map(|r| r.archetype));

    let mut followups = entry.followups.clone();
    if matches!(
        cutoff_resolution.as_ref().map(|r| r.archetype),
        Some(CutoffArchetype::Omen)
    ) {
        followups.push("omen_foreshadow".to_string());
    }

    Ok(GeneratedEvent {
        event_id: entry.event_id.clone(),
        title: entry.title.clone(),
        severity,
        cap,
        cutoff_applied,
        cutoff_resolution,
        tags: entry.tags.clone(),
        effect_vector: entry.effect_vector,
        fiction: entry.fiction.clone(),
        followups,
        state_delta,
        trace: rng.trace().to_vec(),
    })
}

fn validate_inputs(scene: &SceneContext) -> Result<(), EngineError> {
    if !scene.morphology.in_range() {
        return Err(EngineError::InvalidConfiguration(format!(
            "morphology components must be in [0, 1]: confinement={}, connectivity={}, visibility={}",
            scene.morphology.confinement, scene.morphology.connectivity, scene.morphology.visibility
        )));
    }
    if scene.environment.is_empty() {
        return Err(EngineError::InvalidConfiguration(
            "scene environment set must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn build_delta(entry: &ContentEntry, cutoff: Option<CutoffArchetype>) -> StateDelta {
    let mut delta = StateDelta {
        event_id: entry.event_id.clone(),
        ..StateDelta::default()
    };

    for (tag, ticks) in &entry.cooldown {
        delta.tag_cooldowns_set.insert(tag.clone(), *ticks);
    }

    if entry.effect_vector.pressure != 0 {
        delta
            .clock_deltas
            .insert("tension".to_string(), entry.effect_vector.pressure);
    }
    if entry.effect_vector.heat != 0 {
        delta
            .clock_deltas
            .insert("heat".to_string(), entry.effect_vector.heat);
    }
    if cutoff == Some(CutoffArchetype::ClockTick) {
        *delta.clock_deltas.entry("omens".to_string()).or_insert(0) += 1;
    }

    delta
}
