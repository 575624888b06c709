//! Minimal WAV reading for the show's audio track.

use std::fs;
use std::path::Path;

use lumen_ir::AudioBuffer;

use crate::FormatError;

const HEADER_LEN: usize = 44;
const CHANNELS_OFFSET: usize = 22;
const SAMPLE_RATE_OFFSET: usize = 24;

/// Load a canonical-header WAV from raw bytes.
///
/// The reader is deliberately minimal: a fixed 44-byte header is
/// assumed, the channel count and sample rate are read at their fixed
/// offsets, and every byte after the header is treated as interleaved
/// 16-bit LE PCM. A trailing odd byte is ignored.
pub fn load_wav(data: &[u8]) -> Result<AudioBuffer, FormatError> {
    if data.len() < HEADER_LEN {
        return Err(FormatError::UnexpectedEof);
    }

    let channels = read_u16_le(data, CHANNELS_OFFSET);
    let sample_rate = read_u32_le(data, SAMPLE_RATE_OFFSET);
    if channels == 0 {
        return Err(FormatError::InvalidHeader);
    }

    let samples: Vec<i16> = data[HEADER_LEN..]
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .collect();

    Ok(AudioBuffer::new(sample_rate, channels, samples))
}

/// Load a WAV file from disk.
pub fn load_wav_file(path: impl AsRef<Path>) -> Result<AudioBuffer, FormatError> {
    let data = fs::read(path).map_err(|e| FormatError::Io(e.to_string()))?;
    load_wav(&data)
}

fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}
