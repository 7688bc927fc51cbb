use thiserror::Error;

use crate::Word;

pub const COMMENT_MARKER: char = '#';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProgramError {
    #[error("Line {line}: {text:?} is not a {bit_count}-bit binary word")]
    BadWord {
        line: usize,
        text: String,
        bit_count: u32,
    },
}

/// Parses a program image: one base-2 word per line, `#` comments and blank lines ignored.
/// Words wider than `bit_count` bits are rejected.
///
/// Line order is memory order, starting at address 0.
pub fn parse_program(source: &str, bit_count: u32) -> Result<Vec<Word>, ProgramError> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let text = line
                .split(COMMENT_MARKER)
                .next()
                .unwrap_or_default()
                .trim();

            (!text.is_empty()).then_some((index + 1, text))
        })
        .map(|(line, text)| {
            Word::from_str_radix(text, 2)
                .ok()
                .filter(|word| (*word as u32).checked_shr(bit_count).unwrap_or(0) == 0)
                .ok_or_else(|| ProgramError::BadWord {
                    line,
                    text: text.to_string(),
                    bit_count,
                })
        })
        .collect()
}
