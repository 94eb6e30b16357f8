use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::scene::ScenePhase;

/// Inclusive severity range an entry is authored for, serialized as
/// `[min, max]` in pack JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBand(pub u8, pub u8);

impl SeverityBand {
    pub fn min(&self) -> u8 {
        self.0
    }

    pub fn max(&self) -> u8 {
        self.1
    }

    /// True if `severity` falls inside the band.
    pub fn contains(&self, severity: u8) -> bool {
        (self.0..=self.1).contains(&severity)
    }

    /// Bands must satisfy `1 <= min <= max <= 10`.
    pub fn is_valid(&self) -> bool {
        self.0 >= 1 && self.0 <= self.1 && self.1 <= 10
    }
}

/// Mechanical nudges an event suggests to the layer above. The engine
/// copies `pressure` and `heat` into the state delta's clock changes; the
/// rest is advisory and passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EffectVector {
    #[serde(default)]
    pub pressure: i32,
    #[serde(default)]
    pub heat: i32,
    #[serde(default)]
    pub cost: i32,
    #[serde(default)]
    pub opportunity: i32,
}

/// The narrative payload of an entry: a prompt for the table and the
/// immediate choices it puts in front of the players.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fiction {
    pub prompt: String,
    #[serde(default)]
    pub choices: Vec<String>,
}

/// One authored complication. Immutable once loaded from a pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub event_id: String,
    pub title: String,
    pub tags: Vec<String>,
    pub phases: Vec<ScenePhase>,
    pub environments: Vec<String>,
    pub severity_band: SeverityBand,
    pub weight: f64,
    #[serde(default)]
    pub cooldown: FxHashMap<String, u32>,
    #[serde(default)]
    pub effect_vector: EffectVector,
    pub fiction: Fiction,
    #[serde(default)]
    pub followups: Vec<String>,
}

impl ContentEntry {
    /// Returns true if this entry carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns true if this entry is authored for the given phase.
    pub fn allows_phase(&self, phase: ScenePhase) -> bool {
        self.phases.contains(&phase)
    }

    /// Returns true if any of the entry's environments appears in
    /// the scene's environment set.
    pub fn matches_environment(&self, scene_envs: &[String]) -> bool {
        self.environments
            .iter()
            .any(|e| scene_envs.iter().any(|s| s == e))
    }
}
