use serde::{Deserialize, Serialize};

/// Which beat of the scene the table is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenePhase {
    Approach,
    Engage,
    Aftermath,
}

impl ScenePhase {
    /// Returns the pack-format string for this phase (e.g., "engage").
    pub fn name(&self) -> &'static str {
        match self {
            Self::Approach => "approach",
            Self::Engage => "engage",
            Self::Aftermath => "aftermath",
        }
    }
}

/// Rough capability tier of the party, used to pick the base severity cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyBand {
    Low,
    Mid,
    High,
    Unknown,
}

impl Default for PartyBand {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Structural metrics of the scene's space, each in `[0, 1]`.
///
/// The composite morphology score `confinement + visibility - connectivity`
/// (roughly `-1..2`) stands in for how fragile the situation is: confined,
/// exposed scenes with few exits escalate harder than open, well-connected
/// ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Morphology {
    pub confinement: f64,
    pub connectivity: f64,
    pub visibility: f64,
}

impl Morphology {
    pub fn new(confinement: f64, connectivity: f64, visibility: f64) -> Self {
        Self {
            confinement,
            connectivity,
            visibility,
        }
    }

    /// Returns a copy with every component clamped into `[0, 1]`.
    pub fn clamped(&self) -> Self {
        Self {
            confinement: self.confinement.clamp(0.0, 1.0),
            connectivity: self.connectivity.clamp(0.0, 1.0),
            visibility: self.visibility.clamp(0.0, 1.0),
        }
    }

    /// Composite morphology score in roughly `[-1, 2]`.
    pub fn score(&self) -> f64 {
        let c = self.clamped();
        c.confinement + c.visibility - c.connectivity
    }

    /// True when every component is inside its documented `[0, 1]` range.
    pub fn in_range(&self) -> bool {
        let ok = |x: f64| (0.0..=1.0).contains(&x);
        ok(self.confinement) && ok(self.connectivity) && ok(self.visibility)
    }
}

/// Everything the engine needs to know about the current scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneContext {
    pub scene_id: String,
    pub phase: ScenePhase,
    pub environment: Vec<String>,
    pub tone: Vec<String>,
    pub morphology: Morphology,
    pub party_band: PartyBand,
    pub spotlight: Vec<String>,
}
