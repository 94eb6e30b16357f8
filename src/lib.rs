//! Complication Engine: bounded-severity event generation for narrative scenes.
//!
//! Generates procedural "complication" events with a heavy-tail severity
//! sampler under scene-dependent finite caps, tag-based content filtering
//! with cooldowns, recency-weighted selection, and pure state transitions
//! for anti-repetition. The engine is deterministic: every random draw goes
//! through a seeded, trace-recording RNG.

pub mod core;
pub mod schema;
