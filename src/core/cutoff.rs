/// Cutoff resolution: overflow above the cap becomes fiction, not numbers.

use crate::schema::event::{CutoffArchetype, CutoffResolution};

use super::rng::{RngError, TraceRng};

const DOWNSHIFT_LINES: [&str; 3] = [
    "It should have been worse. Somehow, it isn't. Yet.",
    "The moment teeters on the edge of disaster, then pulls back.",
    "A near thing. Everyone feels how close that came.",
];

const CLOCK_TICK_LINES: [&str; 3] = [
    "Somewhere offstage, a plan moves one step closer to completion.",
    "Nothing lands here, but the pressure elsewhere visibly grows.",
    "The danger passes the party by and goes looking for leverage instead.",
];

const OMEN_LINES: [&str; 3] = [
    "A sign of something far worse: this was only the tremor before the quake.",
    "The scene goes quiet in the wrong way. Whatever this was, it will return bigger.",
    "An ominous hook is set. The table now knows a storm is owed.",
];

/// Which archetype an overflow of `excess = raw - cap` maps to. Small
/// overflows soften, moderate ones advance an offstage clock, large ones
/// foreshadow.
pub fn archetype_for_excess(excess: u8) -> CutoffArchetype {
    match excess {
        0 | 1 => CutoffArchetype::Downshift,
        2 => CutoffArchetype::ClockTick,
        _ => CutoffArchetype::Omen,
    }
}

/// Build the narrative resolution for an over-cap draw. The line is drawn
/// through the shared RNG so it lands in the trace and replays exactly.
pub fn resolve_cutoff(excess: u8, rng: &mut TraceRng) -> Result<CutoffResolution, RngError> {
    let archetype = archetype_for_excess(excess);
    let lines: &[&str] = match archetype {
        CutoffArchetype::Downshift => &DOWNSHIFT_LINES,
        CutoffArchetype::ClockTick => &CLOCK_TICK_LINES,
        CutoffArchetype::Omen => &OMEN_LINES,
    };
    let weights = vec![1.0; lines.len()];
    let label = format!("cutoff({})", archetype.name());
    let idx = rng.weighted_index(&label, &weights)?;
    Ok(CutoffResolution {
        archetype,
        text: lines[idx].to_string(),
    })
}
