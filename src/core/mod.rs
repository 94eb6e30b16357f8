pub mod content;
pub mod cutoff;
pub mod engine;
pub mod rng;
pub mod select;
pub mod severity;
pub mod state;
