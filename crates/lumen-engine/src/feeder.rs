//! Periodic realtime worker that feeds the audio sink.

use std::time::{Duration, Instant};

use log::{debug, warn};
use lumen_ir::{AudioBuffer, TimingSample};

use crate::clock;
use crate::diagnostics::TraceBuffer;
use crate::sink::{AudioSink, SinkError};

/// Frames per sub-write chunk: 10 ms at 44.1 kHz.
pub const PERIOD_FRAMES: usize = 441;

/// Sub-writes per cycle.
pub const BURST_WRITES: usize = 3;

/// Cycle period; one burst of sub-writes covers exactly one period.
pub const CYCLE_PERIOD: Duration = Duration::from_millis(30);

const DEFAULT_TRACE_CAPACITY: usize = 60_000;
const DELAY_CHECK_INTERVAL: u64 = 100;

/// Scheduling geometry for the feeder; the defaults are the production
/// schedule, tests scale it down.
#[derive(Clone, Copy, Debug)]
pub struct FeederConfig {
    /// Cycle period.
    pub period: Duration,
    /// Frames per sub-write.
    pub chunk_frames: usize,
    /// Sub-writes per cycle.
    pub burst: usize,
    /// Capacity of the timing trace.
    pub trace_capacity: usize,
}

impl Default for FeederConfig {
    fn default() -> Self {
        Self {
            period: CYCLE_PERIOD,
            chunk_frames: PERIOD_FRAMES,
            burst: BURST_WRITES,
            trace_capacity: DEFAULT_TRACE_CAPACITY,
        }
    }
}

/// Whether underrun number `count` gets a log line: the first ten
/// always, then only every 50th.
pub fn underrun_should_report(count: u64) -> bool {
    count <= 10 || count % 50 == 0
}

/// Periodic worker that writes the audio buffer to the sink in fixed
/// chunks on an absolute 30 ms schedule.
///
/// Single-producer: exactly one thread runs a given feeder.
pub struct AudioFeeder<S: AudioSink> {
    audio: AudioBuffer,
    sink: S,
    config: FeederConfig,
    trace: TraceBuffer<TimingSample>,
    /// Next frame to write.
    cursor: usize,
    cycle: u64,
    underruns: u64,
}

impl<S: AudioSink> AudioFeeder<S> {
    pub fn new(audio: AudioBuffer, sink: S, config: FeederConfig) -> Self {
        let trace = TraceBuffer::with_capacity(config.trace_capacity);
        Self {
            audio,
            sink,
            config,
            trace,
            cursor: 0,
            cycle: 0,
            underruns: 0,
        }
    }

    /// True when fewer frames remain than one full burst.
    pub fn finished(&self) -> bool {
        self.cursor + self.config.chunk_frames * self.config.burst > self.audio.frames()
    }

    /// Feed the whole buffer on the fixed absolute schedule.
    pub fn run(&mut self) {
        let mut deadline = clock::now();
        let mut prev_wake: Option<Instant> = None;
        while !self.finished() {
            clock::sleep_until(deadline);
            let wake = clock::now();
            self.cycle_once(deadline, wake, prev_wake);
            prev_wake = Some(wake);
            deadline = clock::advance(deadline, self.config.period);
        }
    }

    /// One cycle: a burst of sub-writes plus the timing sample.
    fn cycle_once(&mut self, deadline: Instant, wake: Instant, prev_wake: Option<Instant>) {
        let mut runtime_us = 0i64;
        for _ in 0..self.config.burst {
            let chunk = self.audio.chunk(self.cursor, self.config.chunk_frames);
            let start = clock::now();
            match self.sink.write(chunk) {
                Ok(_) => runtime_us += clock::signed_micros(start, clock::now()),
                Err(err) => self.recover(&err),
            }
            // The failed chunk is dropped, not retried: losing 10 ms of
            // audio beats slipping the schedule.
            self.cursor += self.config.chunk_frames;
        }

        let jitter_us = clock::signed_micros(deadline, wake);
        if jitter_us < 0 {
            warn!("deadline miss at cycle {} by {} us", self.cycle, -jitter_us);
        }

        self.trace.push(TimingSample {
            cycle: self.cycle,
            runtime_us,
            wake_interval_us: prev_wake.map(|prev| clock::signed_micros(prev, wake)),
            jitter_us,
        });

        // Steady-state health check; advisory only.
        if self.cycle % DELAY_CHECK_INTERVAL == 0 {
            if let Ok(frames) = self.sink.delay() {
                debug!(
                    "cycle {}: sink delay {} frames ({:.2} ms)",
                    self.cycle,
                    frames,
                    frames as f64 * 1000.0 / self.audio.sample_rate() as f64
                );
            }
        }

        self.cycle += 1;
    }

    fn recover(&mut self, err: &SinkError) {
        self.underruns += 1;
        if underrun_should_report(self.underruns) {
            warn!("underrun #{}: {}", self.underruns, err);
        }
        if let Err(err) = self.sink.prepare() {
            warn!("sink re-prime failed: {}", err);
        }
    }

    pub fn cycles(&self) -> u64 {
        self.cycle
    }

    /// Total failed sub-writes; never reset.
    pub fn underruns(&self) -> u64 {
        self.underruns
    }

    pub fn trace(&self) -> &TraceBuffer<TimingSample> {
        &self.trace
    }

    pub fn into_trace(self) -> TraceBuffer<TimingSample> {
        self.trace
    }
}
