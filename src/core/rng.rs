/// Deterministic RNG wrapper: every draw is labelled and recorded.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RngError {
    #[error("weighted draw '{label}' has no positive weights")]
    DegenerateWeights { label: String },
}

/// One recorded draw: the label the caller gave it, the raw roll, and the
/// outcome it produced. Same seed + same ordered call sequence gives a
/// byte-identical trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub label: String,
    pub roll: f64,
    pub outcome: String,
}

/// Seeded generator shared by every sampling step of one generation
/// session. The trace exists purely for debugging and reproducibility;
/// it is read-only to callers and never feeds back into control flow.
#[derive(Debug, Clone)]
pub struct TraceRng {
    rng: StdRng,
    seed: u64,
    trace: Vec<TraceRecord>,
}

impl TraceRng {
    pub fn seed_from(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            trace: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in `[0, 1)`.
    pub fn uniform(&mut self, label: &str) -> f64 {
        let roll: f64 = self.rng.gen();
        self.trace.push(TraceRecord {
            label: label.to_string(),
            roll,
            outcome: format!("{roll:.6}"),
        });
        roll
    }

    /// Single weighted draw over the cumulative distribution of `weights`.
    /// Returns the chosen index. Fails if no weight is positive.
    pub fn weighted_index(&mut self, label: &str, weights: &[f64]) -> Result<usize, RngError> {
        let total: f64 = weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();
        if total <= 0.0 {
            return Err(RngError::DegenerateWeights {
                label: label.to_string(),
            });
        }

        let roll = self.rng.gen::<f64>() * total;
        let mut acc = 0.0;
        let mut chosen = None;
        for (i, w) in weights.iter().enumerate() {
            if !w.is_finite() || *w <= 0.0 {
                continue;
            }
            acc += w;
            // Remember the last positive index so float rounding at the
            // top of the accumulator cannot select a zero-weight slot.
            chosen = Some(i);
            if roll < acc {
                break;
            }
        }
        let chosen = chosen.ok_or_else(|| RngError::DegenerateWeights {
            label: label.to_string(),
        })?;

        self.trace.push(TraceRecord {
            label: label.to_string(),
            roll,
            outcome: chosen.to_string(),
        });
        Ok(chosen)
    }

    /// The ordered record of every draw made so far.
    pub fn trace(&self) -> &[TraceRecord] {
        &self.trace
    }
}
