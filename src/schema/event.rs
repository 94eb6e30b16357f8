use serde::{Deserialize, Serialize};

use crate::core::rng::TraceRecord;

use super::entry::{EffectVector, Fiction};
use super::state::StateDelta;

/// How an over-cap severity draw resolves narratively. The excess never
/// becomes a bigger mechanical number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutoffArchetype {
    /// Mild overflow: the complication lands softer than it threatened to.
    Downshift,
    /// Moderate overflow: an offstage clock advances instead.
    ClockTick,
    /// Large overflow: foreshadowing of something worse to come.
    Omen,
}

impl CutoffArchetype {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Downshift => "downshift",
            Self::ClockTick => "clock_tick",
            Self::Omen => "omen",
        }
    }
}

/// The narrative substitute attached to a cutoff event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutoffResolution {
    pub archetype: CutoffArchetype,
    pub text: String,
}

/// One generated complication: the selected entry's content, the final
/// severity, any cutoff resolution, the state delta the caller should
/// apply, and the full RNG trace for reproducibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedEvent {
    pub event_id: String,
    pub title: String,
    /// Post-cutoff severity, always in `[1, 10]` and never above the cap.
    pub severity: u8,
    /// The cap that was in force, in `[3, 10]`.
    pub cap: u8,
    pub cutoff_applied: bool,
    pub cutoff_resolution: Option<CutoffResolution>,
    pub tags: Vec<String>,
    pub effect_vector: EffectVector,
    pub fiction: Fiction,
    pub followups: Vec<String>,
    pub state_delta: StateDelta,
    pub trace: Vec<TraceRecord>,
}
