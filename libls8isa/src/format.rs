use crate::Word;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Binary,
    Tetral,
    Octal,
    Hexadecimal,
}

impl Radix {
    pub fn base(&self) -> u32 {
        match self {
            Self::Binary => 2,
            Self::Tetral => 4,
            Self::Octal => 8,
            Self::Hexadecimal => 16,
        }
    }

    pub fn bits_per_digit(&self) -> u32 {
        self.base().trailing_zeros()
    }

    /// Digits needed to show any word of `bit_count` bits.
    pub fn width(&self, bit_count: u32) -> usize {
        bit_count.div_ceil(self.bits_per_digit()) as usize
    }
}

/// Formats `value` zero-padded to the digit width of a `bit_count`-bit word.
pub fn format_word(value: Word, radix: Radix, bit_count: u32) -> String {
    let digits = digits(value, radix.base());
    format!("{:0>width$}", digits, width = radix.width(bit_count))
}

fn digits(mut value: Word, base: u32) -> String {
    const ALPHABET: &[u8] = b"0123456789ABCDEF";

    if value == 0 {
        return "0".to_string();
    }

    let mut reversed = Vec::new();
    while value != 0 {
        reversed.push(ALPHABET[(value as u32 % base) as usize] as char);
        value = (value as u32 / base) as Word;
    }

    reversed.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_follow_the_word() {
        assert_eq!(Radix::Binary.width(8), 8);
        assert_eq!(Radix::Tetral.width(8), 4);
        assert_eq!(Radix::Octal.width(8), 3);
        assert_eq!(Radix::Hexadecimal.width(8), 2);
        assert_eq!(Radix::Hexadecimal.width(10), 3);
    }

    #[test]
    fn formats_each_radix() {
        assert_eq!(format_word(0xF4, Radix::Binary, 8), "11110100");
        assert_eq!(format_word(0xF4, Radix::Tetral, 8), "3310");
        assert_eq!(format_word(0xF4, Radix::Octal, 8), "364");
        assert_eq!(format_word(0xF4, Radix::Hexadecimal, 8), "F4");
        assert_eq!(format_word(0x5, Radix::Hexadecimal, 8), "05");
        assert_eq!(format_word(0, Radix::Binary, 8), "00000000");
    }
}
