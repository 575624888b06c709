//! Pattern text file parsing.

use std::fs;
use std::path::Path;

use lumen_ir::{PatternSequence, PatternStep, LED_LINES};

use crate::FormatError;

/// Parse pattern text: one `"<duration_ms> <bitstring>"` step per line.
///
/// Lines that do not split into the two fields (blank lines, comments,
/// garbage) are skipped. A recognized bitstring must reduce to exactly
/// 8 `'0'`/`'1'` characters after discarding at most one `'.'`
/// separator; the characters map left-to-right onto LED lines 0..7.
/// Durations are quantized onto the hold grid as they load.
pub fn load_patterns(text: &str) -> Result<PatternSequence, FormatError> {
    let mut steps = Vec::new();
    for line in text.lines() {
        let mut fields = line.split_whitespace();
        let (Some(duration), Some(bits)) = (fields.next(), fields.next()) else {
            continue;
        };
        let Ok(duration) = duration.parse::<u32>() else {
            continue;
        };
        steps.push(PatternStep::new(duration, parse_bitstring(bits)?));
    }
    Ok(PatternSequence::new(steps))
}

/// Load a pattern file from disk.
pub fn load_patterns_file(path: impl AsRef<Path>) -> Result<PatternSequence, FormatError> {
    let text = fs::read_to_string(path).map_err(|e| FormatError::Io(e.to_string()))?;
    load_patterns(&text)
}

/// Fold a bitstring into the step mask, left-to-right, first character
/// into the most significant bit.
fn parse_bitstring(bits: &str) -> Result<u8, FormatError> {
    let mut mask = 0u8;
    let mut count = 0;
    let mut dots = 0;
    for c in bits.chars() {
        match c {
            '.' => {
                dots += 1;
                if dots > 1 {
                    return Err(FormatError::InvalidStep(bits.to_string()));
                }
            }
            '0' | '1' => {
                if count == LED_LINES {
                    return Err(FormatError::InvalidStep(bits.to_string()));
                }
                mask = (mask << 1) | (c == '1') as u8;
                count += 1;
            }
            _ => return Err(FormatError::InvalidStep(bits.to_string())),
        }
    }
    if count != LED_LINES {
        return Err(FormatError::InvalidStep(bits.to_string()));
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitstring_maps_left_to_right() {
        let seq = load_patterns("100 10101010").unwrap();
        let step = seq.step(0).unwrap();
        assert_eq!(step.mask(), 0xAA);
        assert!(step.line(0));
        assert!(!step.line(1));
        assert!(!step.line(7));
    }

    #[test]
    fn dot_separator_is_discarded() {
        let plain = load_patterns("100 10101010").unwrap();
        let dotted = load_patterns("100 1010.1010").unwrap();
        assert_eq!(plain.step(0), dotted.step(0));

        let leading = load_patterns("100 .10101010").unwrap();
        assert_eq!(plain.step(0), leading.step(0));
    }

    #[test]
    fn durations_are_quantized_on_load() {
        let seq = load_patterns("34 11111111\n76 00000000").unwrap();
        assert_eq!(seq.step(0).unwrap().duration_ms(), 70);
        assert_eq!(seq.step(1).unwrap().duration_ms(), 80);
    }

    #[test]
    fn unrecognized_lines_are_skipped() {
        let text = "\n100 11110000\nnot a step\n250\n90 00001111\n";
        let seq = load_patterns(text).unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.step(0).unwrap().mask(), 0xF0);
        assert_eq!(seq.step(1).unwrap().mask(), 0x0F);
    }

    #[test]
    fn wrong_bit_count_is_an_error() {
        assert!(load_patterns("100 1010101").is_err());
        assert!(load_patterns("100 101010101").is_err());
    }

    #[test]
    fn two_dots_are_an_error() {
        assert!(load_patterns("100 10.10.1010").is_err());
    }

    #[test]
    fn non_binary_characters_are_an_error() {
        assert!(load_patterns("100 1010x010").is_err());
    }

    #[test]
    fn empty_text_is_an_empty_sequence() {
        assert!(load_patterns("").unwrap().is_empty());
    }
}
