/// Weighted candidate selection with tiered recency penalties.

use tracing::debug;

use crate::schema::entry::ContentEntry;
use crate::schema::state::EngineState;

use super::rng::{RngError, TraceRng};

/// Divisor applied to an authored weight for a candidate sitting at
/// `position` in the recency window (0 = just used). Entries outside the
/// window carry no penalty.
pub fn recency_penalty(position: Option<usize>) -> f64 {
    match position {
        None => 1.0,
        Some(0) => 10.0,
        Some(1) => 6.0,
        Some(2) => 4.0,
        Some(3..=4) => 3.0,
        Some(5..=6) => 2.0,
        Some(_) => 1.5,
    }
}

/// Pick one candidate via a single weighted draw.
///
/// Candidates whose severity band contains `target_severity` are
/// preferred; when none match, the full filtered set stays in play.
/// Adjusted weight is `authored_weight / recency_penalty`.
pub fn select_entry<'a>(
    candidates: &[&'a ContentEntry],
    target_severity: u8,
    state: &EngineState,
    rng: &mut TraceRng,
) -> Result<&'a ContentEntry, RngError> {
    let banded: Vec<&ContentEntry> = candidates
        .iter()
        .copied()
        .filter(|e| e.severity_band.contains(target_severity))
        .collect();
    let pool: &[&ContentEntry] = if banded.is_empty() { candidates } else { &banded };

    let weights: Vec<f64> = pool
        .iter()
        .map(|e| e.weight / recency_penalty(state.recency_position(&e.event_id)))
        .collect();

    let label = format!("select(pool={},severity={})", pool.len(), target_severity);
    let idx = rng.weighted_index(&label, &weights)?;

    debug!(
        chosen = pool[idx].event_id.as_str(),
        pool = pool.len(),
        banded = !banded.is_empty(),
        "selected candidate"
    );
    Ok(pool[idx])
}
