/// Heavy-tail severity sampling and the finite-size severity cap.

use tracing::debug;

use crate::schema::scene::{Morphology, PartyBand, ScenePhase};
use crate::schema::selection::RarityMode;
use crate::schema::state::EngineState;

use super::rng::{RngError, TraceRng};

/// Severities are mechanical in `[1, 10]`; raw draws range further so the
/// cap has overflow to convert.
pub const SEVERITY_MAX: u8 = 10;
pub const RAW_SEVERITY_MAX: u8 = 20;
pub const CAP_MIN: u8 = 3;
pub const CAP_MAX: u8 = 10;

// Zipf exponent calibration. Fit against target cutoff rates on the
// reference scene presets: calm <=1%, normal <=3%, spiky 5-10% in
// confined terrain and 2-5% in open terrain.
const ALPHA_BASE_CALM: f64 = 3.05;
const ALPHA_BASE_NORMAL: f64 = 2.55;
const ALPHA_BASE_SPIKY: f64 = 2.25;
const ALPHA_MORPH_SLOPE: f64 = 0.35;
const ALPHA_MIN: f64 = 0.8;
const ALPHA_MAX: f64 = 3.5;

// Clocks at or past this value loosen the cap by one each.
const CLOCK_CAP_BONUS_AT: i32 = 9;

fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    x.clamp(lo, hi)
}

/// Zipf-like exponent for the severity distribution.
///
/// Lower alpha means a fatter tail (more big severities); higher alpha a
/// steeper drop. Derived from the rarity mode and the scene's morphology
/// score: fragile scenes shift every mode toward the dramatic.
pub fn compute_alpha(rarity_mode: RarityMode, morphology: &Morphology) -> f64 {
    let base = match rarity_mode {
        RarityMode::Calm => ALPHA_BASE_CALM,
        RarityMode::Normal => ALPHA_BASE_NORMAL,
        RarityMode::Spiky => ALPHA_BASE_SPIKY,
    };
    let alpha = base - ALPHA_MORPH_SLOPE * morphology.score();
    clamp(alpha, ALPHA_MIN, ALPHA_MAX)
}

/// Hard severity cap for the current scene, always in `[3, 10]`.
///
/// This is the finite-size safety rail: raw draws above the cap are
/// converted to narrative resolutions, never clamped silently.
///
/// Tuning:
/// - spiky: graduated compression in high-morphology scenes (more
///   conversions exactly where escalation would hurt most)
/// - calm: one extra point of headroom (fewer conversions)
pub fn compute_severity_cap(
    party_band: PartyBand,
    phase: ScenePhase,
    morphology: &Morphology,
    state: &EngineState,
    rarity_mode: RarityMode,
) -> u8 {
    let base: i32 = match (party_band, phase) {
        (PartyBand::Low, ScenePhase::Approach) => 6,
        (PartyBand::Low, ScenePhase::Engage) => 7,
        (PartyBand::Low, ScenePhase::Aftermath) => 6,
        (PartyBand::Mid, ScenePhase::Approach) => 7,
        (PartyBand::Mid, ScenePhase::Engage) => 8,
        (PartyBand::Mid, ScenePhase::Aftermath) => 7,
        (PartyBand::High, ScenePhase::Approach) => 8,
        (PartyBand::High, ScenePhase::Engage) => 9,
        (PartyBand::High, ScenePhase::Aftermath) => 8,
        (PartyBand::Unknown, ScenePhase::Approach) => 7,
        (PartyBand::Unknown, ScenePhase::Engage) => 8,
        (PartyBand::Unknown, ScenePhase::Aftermath) => 7,
    };

    let morph = morphology.score();
    let adj = (clamp(morph, -1.0, 2.0) * 0.75).round() as i32;
    let mut cap = base + adj;

    let tension = state.clocks.get("tension").copied().unwrap_or(0);
    let heat = state.clocks.get("heat").copied().unwrap_or(0);
    if tension >= CLOCK_CAP_BONUS_AT {
        cap += 1;
    }
    if heat >= CLOCK_CAP_BONUS_AT {
        cap += 1;
    }

    match rarity_mode {
        RarityMode::Spiky => {
            if morph >= 0.9 {
                cap -= 1;
            }
            if morph >= 1.4 {
                cap -= 1;
            }
        }
        RarityMode::Calm => cap += 1,
        RarityMode::Normal => {}
    }

    let cap = cap.clamp(CAP_MIN as i32, CAP_MAX as i32) as u8;
    debug!(
        band = ?party_band,
        phase = phase.name(),
        morph,
        mode = rarity_mode.name(),
        cap,
        "computed severity cap"
    );
    cap
}

/// Draw a raw severity from the truncated zipf distribution over
/// `1..=RAW_SEVERITY_MAX`. The cap is applied by the caller.
pub fn sample_severity(rng: &mut TraceRng, alpha: f64) -> Result<u8, RngError> {
    let weights: Vec<f64> = (1..=RAW_SEVERITY_MAX)
        .map(|s| 1.0 / f64::from(s).powf(alpha))
        .collect();
    let label = format!("severity(zipf,alpha={alpha:.2})");
    let idx = rng.weighted_index(&label, &weights)?;
    Ok(idx as u8 + 1)
}
