//! CPAL-based audio sink.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, Stream, StreamConfig};
use log::warn;
use lumen_engine::{AudioSink, SinkError, PERIOD_FRAMES};
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Ring depth in write periods.
const RING_PERIODS: usize = 12;

/// Audio sink backed by a CPAL output stream.
///
/// Writes land in a bounded ring the stream callback drains. When the
/// callback runs dry after playback has started, the underrun flag is
/// raised and the next `write` fails until `prepare` clears it, the
/// same failure/recovery protocol a blocking PCM device presents.
///
/// A `Stream` cannot move between threads, so the sink must be opened
/// on the thread that will write to it.
pub struct CpalSink {
    _stream: Stream,
    producer: HeapProd<i16>,
    underrun: Arc<AtomicBool>,
    started: Arc<AtomicBool>,
    channels: usize,
}

impl CpalSink {
    /// Open the default output device at the given rate and channel
    /// count and start the stream.
    pub fn open(sample_rate: u32, channels: u16) -> Result<Self, SinkError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(SinkError::NoDevice)?;

        let config = StreamConfig {
            channels,
            sample_rate: SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let rb = HeapRb::<i16>::new(PERIOD_FRAMES * RING_PERIODS * channels as usize);
        let (producer, mut consumer) = rb.split();

        let underrun = Arc::new(AtomicBool::new(false));
        let started = Arc::new(AtomicBool::new(false));
        let underrun_cb = underrun.clone();
        let started_cb = started.clone();

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut ran_dry = false;
                    for sample in data.iter_mut() {
                        match consumer.try_pop() {
                            Some(s) => *sample = s as f32 / 32768.0,
                            None => {
                                *sample = 0.0;
                                ran_dry = true;
                            }
                        }
                    }
                    if ran_dry && started_cb.load(Ordering::Relaxed) {
                        underrun_cb.store(true, Ordering::Relaxed);
                    }
                },
                |err| warn!("audio stream error: {}", err),
                None,
            )
            .map_err(|e| SinkError::DeviceInit(e.to_string()))?;

        stream.play().map_err(|e| SinkError::Playback(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            producer,
            underrun,
            started,
            channels: channels as usize,
        })
    }
}

impl AudioSink for CpalSink {
    fn write(&mut self, interleaved: &[i16]) -> Result<usize, SinkError> {
        if self.underrun.load(Ordering::Relaxed) {
            return Err(SinkError::Underrun);
        }
        for &sample in interleaved {
            // Block until the ring has room, like a blocking PCM write.
            while self.producer.try_push(sample).is_err() {
                std::hint::spin_loop();
            }
        }
        self.started.store(true, Ordering::Relaxed);
        Ok(interleaved.len() / self.channels)
    }

    fn prepare(&mut self) -> Result<(), SinkError> {
        // Hold the dry-ring check off until the ring has been refilled.
        self.started.store(false, Ordering::Relaxed);
        self.underrun.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn delay(&mut self) -> Result<usize, SinkError> {
        Ok(self.producer.occupied_len() / self.channels)
    }
}
