//! Allocation-free realtime path tests.
//!
//! Once a worker is constructed, its per-cycle path must not touch the
//! heap: trace storage is reserved up front and the chunk writes borrow
//! the audio buffer. These tests run both workers to completion under
//! an allocation-aborting allocator.
//!
//! Just run `cargo test` — no feature flags needed.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use std::time::Duration;

use lumen_engine::{
    AudioFeeder, AudioSink, FeederConfig, GpioOutput, PatternSequencer, SequencerConfig, SinkError,
};
use lumen_ir::{AudioBuffer, PatternSequence, PatternStep};

struct NullSink;

impl AudioSink for NullSink {
    fn write(&mut self, interleaved: &[i16]) -> Result<usize, SinkError> {
        Ok(interleaved.len() / 2)
    }

    fn prepare(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn delay(&mut self) -> Result<usize, SinkError> {
        Ok(0)
    }
}

struct NullGpio;

impl GpioOutput for NullGpio {
    fn set_lines(&mut self, _mask: u8) {}
    fn clear_lines(&mut self, _mask: u8) {}
}

#[test]
fn feeder_cycles_are_alloc_free() {
    let audio = AudioBuffer::new(44100, 2, vec![0i16; 1323 * 50 * 2]);
    let config = FeederConfig {
        period: Duration::ZERO,
        ..FeederConfig::default()
    };
    let mut feeder = AudioFeeder::new(audio, NullSink, config);

    assert_no_alloc(|| feeder.run());
    assert_eq!(feeder.cycles(), 50);
}

#[test]
fn sequencer_ticks_are_alloc_free() {
    let steps = (0..64).map(|i| PatternStep::new(70, i as u8)).collect();
    let mut sequencer = PatternSequencer::new(
        PatternSequence::new(steps),
        NullGpio,
        SequencerConfig::default(),
    );

    assert_no_alloc(|| {
        while !sequencer.is_done() {
            sequencer.tick(0);
        }
    });
    assert_eq!(sequencer.ticks(), 64 * 7);
}
