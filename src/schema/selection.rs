use serde::{Deserialize, Serialize};

/// Named preset controlling both the severity distribution's tail and how
/// aggressively the cap converts big draws into narrative cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RarityMode {
    Calm,
    Normal,
    Spiky,
}

impl RarityMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Calm => "calm",
            Self::Normal => "normal",
            Self::Spiky => "spiky",
        }
    }
}

impl Default for RarityMode {
    fn default() -> Self {
        Self::Normal
    }
}

/// Caller-side filters narrowing which content is eligible this call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionContext {
    pub enabled_packs: Vec<String>,
    pub include_tags: Vec<String>,
    pub exclude_tags: Vec<String>,
    pub factions_present: Vec<String>,
    pub rarity_mode: RarityMode,
}
