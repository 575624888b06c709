//! Headless show controller for lumen.
//!
//! Owns the loaded inputs, launches the two realtime workers with their
//! scheduling configs, waits for both to finish, and hands the
//! diagnostic traces back for log emission.

mod csv;

pub use csv::{write_audio_log, write_led_log};

use std::error::Error;
use std::fmt;
use std::io;
use std::sync::mpsc;

use log::info;
use lumen_engine::{
    AudioFeeder, AudioSink, FeederConfig, GpioOutput, PatternSequencer, SequencerConfig,
    SinkError, TraceBuffer,
};
use lumen_hw::rt::{self, ThreadConfig};
use lumen_ir::{AudioBuffer, PatternSequence, StepTrace, TimingSample};

/// Error type for running a show.
#[derive(Debug)]
pub enum ShowError {
    /// The audio sink could not be opened
    Sink(SinkError),
    /// A worker thread could not be spawned
    Spawn(io::Error),
    /// A worker thread died without finishing
    Worker(&'static str),
}

impl fmt::Display for ShowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShowError::Sink(err) => write!(f, "opening audio sink: {}", err),
            ShowError::Spawn(err) => write!(f, "spawning worker: {}", err),
            ShowError::Worker(name) => write!(f, "worker {} died", name),
        }
    }
}

impl Error for ShowError {}

/// Scheduling configuration for a show run.
///
/// The lighting worker runs at strictly higher priority than the audio
/// worker: a visible glitch in the lights is judged more disruptive
/// than a brief, recoverable audio underrun.
#[derive(Clone, Copy, Debug)]
pub struct ShowConfig {
    pub feeder: FeederConfig,
    pub sequencer: SequencerConfig,
    pub audio_thread: ThreadConfig,
    pub led_thread: ThreadConfig,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            feeder: FeederConfig::default(),
            sequencer: SequencerConfig::default(),
            audio_thread: ThreadConfig::fifo(75),
            led_thread: ThreadConfig::fifo(80),
        }
    }
}

/// Diagnostics handed back after both workers have joined.
pub struct ShowReport {
    pub audio: TraceBuffer<TimingSample>,
    pub led: TraceBuffer<StepTrace>,
    pub underruns: u64,
}

struct FeederOutcome {
    trace: TraceBuffer<TimingSample>,
    underruns: u64,
}

/// A loaded show, ready to run.
pub struct Show {
    audio: AudioBuffer,
    patterns: PatternSequence,
    config: ShowConfig,
}

impl Show {
    pub fn new(audio: AudioBuffer, patterns: PatternSequence) -> Self {
        Self::with_config(audio, patterns, ShowConfig::default())
    }

    pub fn with_config(audio: AudioBuffer, patterns: PatternSequence, config: ShowConfig) -> Self {
        Self {
            audio,
            patterns,
            config,
        }
    }

    /// Run the show to completion.
    ///
    /// The sink is opened by `sink_factory` inside the audio worker (an
    /// output stream cannot change threads); the lighting worker only
    /// starts once the sink is up, so a device failure aborts the whole
    /// show before anything blinks. The join is not cancellable; both
    /// workers are finite, data-driven pipelines.
    pub fn run<S, F, G>(self, sink_factory: F, gpio: G) -> Result<ShowReport, ShowError>
    where
        S: AudioSink + 'static,
        F: FnOnce() -> Result<S, SinkError> + Send + 'static,
        G: GpioOutput + Send + 'static,
    {
        let config = self.config;
        let (ready_tx, ready_rx) = mpsc::channel();

        let audio = self.audio;
        let audio_handle = rt::spawn("audio-feed", config.audio_thread, move || {
            let sink = match sink_factory() {
                Ok(sink) => {
                    let _ = ready_tx.send(true);
                    sink
                }
                Err(err) => {
                    let _ = ready_tx.send(false);
                    return Err(err);
                }
            };
            let mut feeder = AudioFeeder::new(audio, sink, config.feeder);
            feeder.run();
            Ok(FeederOutcome {
                underruns: feeder.underruns(),
                trace: feeder.into_trace(),
            })
        })
        .map_err(ShowError::Spawn)?;

        if !ready_rx.recv().unwrap_or(false) {
            return match audio_handle.join() {
                Ok(Err(err)) => Err(ShowError::Sink(err)),
                _ => Err(ShowError::Worker("audio-feed")),
            };
        }

        let patterns = self.patterns;
        let led_handle = rt::spawn("led-seq", config.led_thread, move || {
            let mut sequencer = PatternSequencer::new(patterns, gpio, config.sequencer);
            sequencer.run();
            sequencer.into_trace()
        })
        .map_err(ShowError::Spawn)?;

        let led = led_handle.join().map_err(|_| ShowError::Worker("led-seq"))?;
        let outcome = audio_handle
            .join()
            .map_err(|_| ShowError::Worker("audio-feed"))?
            .map_err(ShowError::Sink)?;

        if outcome.trace.dropped() > 0 || led.dropped() > 0 {
            info!(
                "trace overflow: {} audio and {} led samples dropped",
                outcome.trace.dropped(),
                led.dropped()
            );
        }

        Ok(ShowReport {
            audio: outcome.trace,
            led,
            underruns: outcome.underruns,
        })
    }
}
