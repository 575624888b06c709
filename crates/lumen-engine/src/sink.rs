//! Audio sink trait and error types.

use std::error::Error;
use std::fmt;

/// Error type for sink operations.
#[derive(Debug)]
pub enum SinkError {
    /// The sink buffer ran dry; the device needs re-priming
    Underrun,
    /// No audio device available
    NoDevice,
    /// Failed to initialize the device or stream
    DeviceInit(String),
    /// Playback error
    Playback(String),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Underrun => write!(f, "buffer underrun"),
            SinkError::NoDevice => write!(f, "no audio device available"),
            SinkError::DeviceInit(msg) => write!(f, "device init error: {}", msg),
            SinkError::Playback(msg) => write!(f, "playback error: {}", msg),
        }
    }
}

impl Error for SinkError {}

/// A blocking audio output accepting fixed-length interleaved writes.
///
/// The feeder drives exactly one sink from one thread; implementations
/// do not need to be re-entrant.
pub trait AudioSink {
    /// Queue interleaved 16-bit samples. Returns the number of whole
    /// frames accepted, or an error when the device has underrun.
    fn write(&mut self, interleaved: &[i16]) -> Result<usize, SinkError>;

    /// Recover the sink after a failed write so playback can continue.
    fn prepare(&mut self) -> Result<(), SinkError>;

    /// Frames currently buffered ahead of the device.
    fn delay(&mut self) -> Result<usize, SinkError>;
}
