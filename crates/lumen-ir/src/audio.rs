//! Decoded audio held in memory for playback.

/// Interleaved 16-bit PCM audio, immutable after load.
///
/// The feeder owns the buffer exclusively for the lifetime of the show
/// and addresses it in whole frames (one sample per channel).
#[derive(Clone, Debug)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: u16,
    samples: Vec<i16>,
}

impl AudioBuffer {
    /// Wrap decoded samples. A trailing partial frame is cut off.
    pub fn new(sample_rate: u32, channels: u16, mut samples: Vec<i16>) -> Self {
        debug_assert!(channels > 0);
        let whole = samples.len() - samples.len() % channels as usize;
        samples.truncate(whole);
        Self {
            sample_rate,
            channels,
            samples,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Total number of frames.
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// The interleaved samples for `count` frames starting at `frame`.
    ///
    /// Panics if the range runs past the end of the buffer; callers
    /// check remaining frames before asking.
    pub fn chunk(&self, frame: usize, count: usize) -> &[i16] {
        let start = frame * self.channels as usize;
        let end = (frame + count) * self.channels as usize;
        &self.samples[start..end]
    }
}
