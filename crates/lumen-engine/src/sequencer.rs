//! Periodic realtime worker that steps the LED pattern.

use std::time::Duration;

use lumen_ir::{PatternSequence, StepTrace};

use crate::clock;
use crate::diagnostics::TraceBuffer;
use crate::gpio::GpioOutput;

/// Sequencer tick period.
pub const TICK_PERIOD: Duration = Duration::from_millis(10);

const DEFAULT_TRACE_CAPACITY: usize = 1024;

/// Scheduling geometry for the sequencer.
#[derive(Clone, Copy, Debug)]
pub struct SequencerConfig {
    /// Tick period.
    pub tick: Duration,
    /// Capacity of the step trace.
    pub trace_capacity: usize,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            tick: TICK_PERIOD,
            trace_capacity: DEFAULT_TRACE_CAPACITY,
        }
    }
}

/// Where the sequencer is within the pattern walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerState {
    /// Waiting for the tick that starts the next step.
    WaitingTick,
    /// Issuing the hardware write pair for a newly entered step.
    StepEntry,
    /// Holding the current step; no hardware writes.
    StepHold,
    /// All steps played.
    Done,
}

/// Periodic worker that walks the pattern sequence on a 10 ms tick,
/// touching the hardware only on step transitions.
///
/// Holding without rewriting is deliberate: the register state stays
/// correct until the next transition, so each step costs exactly one
/// set/clear pair no matter how long it holds.
pub struct PatternSequencer<G: GpioOutput> {
    seq: PatternSequence,
    gpio: G,
    config: SequencerConfig,
    trace: TraceBuffer<StepTrace>,
    state: SequencerState,
    step_index: usize,
    remaining_ticks: u32,
    tick_index: u64,
}

impl<G: GpioOutput> PatternSequencer<G> {
    pub fn new(seq: PatternSequence, gpio: G, config: SequencerConfig) -> Self {
        let state = if seq.is_empty() {
            SequencerState::Done
        } else {
            SequencerState::WaitingTick
        };
        let trace = TraceBuffer::with_capacity(config.trace_capacity);
        Self {
            seq,
            gpio,
            config,
            trace,
            state,
            step_index: 0,
            remaining_ticks: 0,
            tick_index: 0,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == SequencerState::Done
    }

    /// Index of the step currently held (or, once done, the sequence
    /// length).
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Ticks consumed so far.
    pub fn ticks(&self) -> u64 {
        self.tick_index
    }

    /// Walk the whole sequence on the fixed absolute tick schedule.
    pub fn run(&mut self) {
        let start = clock::now();
        let mut deadline = start;
        while !self.is_done() {
            clock::sleep_until(deadline);
            let elapsed_us = clock::signed_micros(start, clock::now());
            self.tick(elapsed_us);
            deadline = clock::advance(deadline, self.config.tick);
        }
    }

    /// Advance the state machine by one tick. Entering a step also
    /// consumes one tick of its hold.
    pub fn tick(&mut self, elapsed_us: i64) {
        match self.state {
            SequencerState::Done => return,
            SequencerState::WaitingTick | SequencerState::StepEntry => {
                self.enter_step(elapsed_us)
            }
            SequencerState::StepHold => {}
        }
        if self.state == SequencerState::StepHold {
            self.hold_tick();
        }
        self.tick_index += 1;
    }

    /// Step entry: one set/clear write pair plus the trace record.
    fn enter_step(&mut self, elapsed_us: i64) {
        self.state = SequencerState::StepEntry;
        let Some(step) = self.seq.step(self.step_index) else {
            self.state = SequencerState::Done;
            return;
        };

        let set = step.line_mask();
        let clear = !set;
        let write_start = clock::now();
        self.gpio.set_lines(set);
        self.gpio.clear_lines(clear);
        let write_us = clock::signed_micros(write_start, clock::now());

        self.remaining_ticks = step.ticks();
        self.trace.push(StepTrace {
            tick: self.tick_index,
            elapsed_us,
            write_us,
        });
        self.state = SequencerState::StepHold;
    }

    /// Consume one tick of the current hold.
    fn hold_tick(&mut self) {
        self.remaining_ticks -= 1;
        if self.remaining_ticks == 0 {
            self.step_index += 1;
            self.state = if self.step_index >= self.seq.len() {
                SequencerState::Done
            } else {
                SequencerState::WaitingTick
            };
        }
    }

    pub fn trace(&self) -> &TraceBuffer<StepTrace> {
        &self.trace
    }

    pub fn into_trace(self) -> TraceBuffer<StepTrace> {
        self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_ir::PatternStep;

    /// Records every bulk write issued.
    #[derive(Default)]
    struct RecordingGpio {
        sets: Vec<u8>,
        clears: Vec<u8>,
    }

    impl GpioOutput for RecordingGpio {
        fn set_lines(&mut self, mask: u8) {
            self.sets.push(mask);
        }

        fn clear_lines(&mut self, mask: u8) {
            self.clears.push(mask);
        }
    }

    fn sequencer(steps: Vec<PatternStep>) -> PatternSequencer<RecordingGpio> {
        PatternSequencer::new(
            PatternSequence::new(steps),
            RecordingGpio::default(),
            SequencerConfig::default(),
        )
    }

    fn drive_to_done(seq: &mut PatternSequencer<RecordingGpio>) -> u64 {
        let mut ticks = 0;
        while !seq.is_done() {
            seq.tick(0);
            ticks += 1;
            assert!(ticks < 10_000, "sequencer never finished");
        }
        ticks
    }

    #[test]
    fn empty_sequence_is_done_immediately() {
        let mut seq = sequencer(vec![]);
        assert!(seq.is_done());
        seq.tick(0);
        assert_eq!(seq.ticks(), 0);
        assert!(seq.gpio.sets.is_empty());
    }

    #[test]
    fn seventy_ms_step_spans_seven_ticks() {
        let mut seq = sequencer(vec![PatternStep::new(70, 0xFF)]);
        let ticks = drive_to_done(&mut seq);
        assert_eq!(ticks, 7);
        assert_eq!(seq.step_index(), 1);
    }

    #[test]
    fn hold_never_rewrites_the_hardware() {
        // One write pair per step, no matter how long the hold.
        let mut seq = sequencer(vec![
            PatternStep::new(500, 0xF0),
            PatternStep::new(250, 0x0F),
        ]);
        drive_to_done(&mut seq);
        assert_eq!(seq.gpio.sets.len(), 2);
        assert_eq!(seq.gpio.clears.len(), 2);
    }

    #[test]
    fn set_and_clear_masks_partition_the_lines() {
        // Source mask 0xAA lights lines 0,2,4,6 -> line mask 0x55.
        let mut seq = sequencer(vec![PatternStep::new(70, 0xAA)]);
        seq.tick(0);
        assert_eq!(seq.gpio.sets, vec![0x55]);
        assert_eq!(seq.gpio.clears, vec![0xAA]);
        assert_eq!(seq.gpio.sets[0] & seq.gpio.clears[0], 0);
        assert_eq!(seq.gpio.sets[0] | seq.gpio.clears[0], 0xFF);
    }

    #[test]
    fn entry_ticks_follow_cumulative_durations() {
        let mut seq = sequencer(vec![
            PatternStep::new(70, 0x01),
            PatternStep::new(100, 0x02),
            PatternStep::new(80, 0x04),
        ]);
        drive_to_done(&mut seq);
        let entries: Vec<u64> = seq.trace().as_slice().iter().map(|t| t.tick).collect();
        assert_eq!(entries, vec![0, 7, 17]);
        assert_eq!(seq.ticks(), 25);
    }

    #[test]
    fn state_progression() {
        let mut seq = sequencer(vec![PatternStep::new(70, 0x01)]);
        assert_eq!(seq.state(), SequencerState::WaitingTick);
        seq.tick(0);
        assert_eq!(seq.state(), SequencerState::StepHold);
        for _ in 0..5 {
            seq.tick(0);
        }
        assert_eq!(seq.state(), SequencerState::StepHold);
        seq.tick(0);
        assert_eq!(seq.state(), SequencerState::Done);
    }

    #[test]
    fn elapsed_passes_through_to_the_trace() {
        let mut seq = sequencer(vec![PatternStep::new(70, 0x01)]);
        seq.tick(1234);
        assert_eq!(seq.trace().as_slice()[0].elapsed_us, 1234);
    }
}
