//! Audio and GPIO backends for the lumen light show.
//!
//! Implements the engine's seam traits against real hardware: a CPAL
//! output stream for the audio sink and a memory-mapped register window
//! for the LED lines, plus the realtime thread-spawning primitive both
//! workers are launched through.

mod cpal_sink;
#[cfg(unix)]
mod gpio_mem;
pub mod rt;

pub use cpal_sink::CpalSink;
#[cfg(unix)]
pub use gpio_mem::{GpioError, MappedGpio, DEFAULT_LED_PINS, GPIO_BASE_PI1};
