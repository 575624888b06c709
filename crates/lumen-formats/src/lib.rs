//! Show input loaders for lumen.
//!
//! Parses the WAV audio track and the pattern text file into the IR the
//! engine consumes.

mod pattern_format;
mod wav_format;

pub use pattern_format::{load_patterns, load_patterns_file};
pub use wav_format::{load_wav, load_wav_file};

use std::error::Error;
use std::fmt;

/// Error type for input loading.
#[derive(Debug)]
pub enum FormatError {
    /// File shorter than the fixed header
    UnexpectedEof,
    /// Header fields are unusable
    InvalidHeader,
    /// A pattern step's bitstring is malformed
    InvalidStep(String),
    /// I/O error
    Io(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::UnexpectedEof => write!(f, "file ends before the header does"),
            FormatError::InvalidHeader => write!(f, "unusable header fields"),
            FormatError::InvalidStep(token) => write!(f, "malformed pattern step {:?}", token),
            FormatError::Io(msg) => write!(f, "i/o error: {}", msg),
        }
    }
}

impl Error for FormatError {}
