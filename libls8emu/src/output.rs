use std::io::{self, Write};

use libls8isa::Word;

/// Sink for PRN and PRA. Emission is one-way; nothing is reported back to the processor.
pub trait Output {
    fn print_number(&mut self, value: Word);

    fn print_alpha(&mut self, character: char);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutOutput;

impl Output for StdoutOutput {
    fn print_number(&mut self, value: Word) {
        println!("{}", value);
    }

    fn print_alpha(&mut self, character: char) {
        print!("{}", character);

        if let Err(e) = io::stdout().flush() {
            log::warn!("Couldn't flush stdout: {}", e);
        }
    }
}

/// Collects output text in memory, formatted as [`StdoutOutput`] would print it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferedOutput {
    pub text: String,
}

impl Output for BufferedOutput {
    fn print_number(&mut self, value: Word) {
        self.text.push_str(&value.to_string());
        self.text.push('\n');
    }

    fn print_alpha(&mut self, character: char) {
        self.text.push(character);
    }
}

/// Code point of `value` as a character, or U+FFFD where the value isn't a valid scalar.
pub fn alpha(value: Word) -> char {
    char::from_u32(value as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
}
