//! Dual realtime worker engine for the lumen light show.
//!
//! Two independent periodic workers run the show: the [`AudioFeeder`]
//! writes fixed chunks to the sound sink every 30 ms, and the
//! [`PatternSequencer`] walks the LED pattern on a 10 ms tick. Both are
//! paced by absolute deadlines ([`clock`]) so the long-run period stays
//! exact, and both record scheduling diagnostics into their own
//! [`TraceBuffer`].

pub mod clock;

mod diagnostics;
mod feeder;
mod gpio;
mod sequencer;
mod sink;

pub use diagnostics::TraceBuffer;
pub use feeder::{
    underrun_should_report, AudioFeeder, FeederConfig, BURST_WRITES, CYCLE_PERIOD, PERIOD_FRAMES,
};
pub use gpio::GpioOutput;
pub use sequencer::{PatternSequencer, SequencerConfig, SequencerState, TICK_PERIOD};
pub use sink::{AudioSink, SinkError};
