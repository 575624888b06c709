//! Core data types for the lumen light show.
//!
//! This crate defines the immutable inputs (audio buffer, pattern
//! sequence) and the diagnostic record types shared by the engine and
//! the log emitters. Loaders produce these types, the engine consumes
//! them.

mod audio;
mod pattern;
mod timing;

pub use audio::AudioBuffer;
pub use pattern::{
    quantize_duration_ms, PatternSequence, PatternStep, LED_LINES, MIN_STEP_MS, TICK_MS,
};
pub use timing::{StepTrace, TimingSample};
