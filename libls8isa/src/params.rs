use thiserror::Error;

use crate::{masks, Register, Word};

pub const MIN_BIT_COUNT: u32 = 8;
pub const MAX_BIT_COUNT: u32 = Word::BITS;

/// Distance of the initial stack pointer below the end of memory (0xF4 on 8 bits).
pub const STACK_TOP_OFFSET: usize = 0x0C;

pub const FLAG_WIDTH: u32 = 1;
pub const FLAG_EQ_SHIFT: u32 = 0;
pub const FLAG_GT_SHIFT: u32 = 1;
pub const FLAG_LT_SHIFT: u32 = 2;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParamsError {
    #[error("Unsupported bit count {0} (expected {min}..={max})", min = MIN_BIT_COUNT, max = MAX_BIT_COUNT)]
    UnsupportedBitCount(u32),
}

/// A contiguous bit field inside a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub width: u32,
    pub shift: u32,
}

impl Field {
    pub const fn new(width: u32, shift: u32) -> Self {
        Self { width, shift }
    }

    pub fn mask(&self) -> Word {
        masks::block(self.width, self.shift)
    }

    pub fn extract(&self, bits: Word) -> Word {
        masks::unblock(self.width, self.shift, bits)
    }

    pub fn insert(&self, value: Word) -> Word {
        (value << self.shift) & self.mask()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchParams {
    pub bit_count: u32,
    pub word_size: usize,

    pub operation_args: Field,
    pub operation_uses_alu: Field,
    pub operation_sets_pointer: Field,
    pub operation_identifier: Field,

    pub flag_eq: Field,
    pub flag_gt: Field,
    pub flag_lt: Field,

    pub register_of_stack_pointer: Register,
    pub register_of_interrupt_status: Register,
    pub register_of_interrupt_mask: Register,
}

impl ArchParams {
    pub fn new(bit_count: u32) -> Result<Self, ParamsError> {
        if !(MIN_BIT_COUNT..=MAX_BIT_COUNT).contains(&bit_count) {
            return Err(ParamsError::UnsupportedBitCount(bit_count));
        }

        Ok(Self::derive(bit_count))
    }

    fn derive(bit_count: u32) -> Self {
        let register_of_stack_pointer = bit_count as Register - 1;

        Self {
            bit_count,
            word_size: 1 << bit_count,

            operation_args: Field::new(2, bit_count - 2),
            operation_uses_alu: Field::new(1, bit_count - 3),
            operation_sets_pointer: Field::new(1, bit_count - 4),
            operation_identifier: Field::new(4, 0),

            flag_eq: Field::new(FLAG_WIDTH, FLAG_EQ_SHIFT),
            flag_gt: Field::new(FLAG_WIDTH, FLAG_GT_SHIFT),
            flag_lt: Field::new(FLAG_WIDTH, FLAG_LT_SHIFT),

            register_of_stack_pointer,
            register_of_interrupt_status: register_of_stack_pointer - 1,
            register_of_interrupt_mask: register_of_stack_pointer - 2,
        }
    }

    pub fn register_count(&self) -> usize {
        self.bit_count as usize
    }

    /// Largest value a word can hold, all bits set.
    pub fn word_max(&self) -> Word {
        (self.word_size - 1) as Word
    }

    pub fn initial_stack_pointer(&self) -> Word {
        (self.word_size - STACK_TOP_OFFSET) as Word
    }
}

impl Default for ArchParams {
    fn default() -> Self {
        Self::derive(crate::DEFAULT_BIT_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_bit_layout() {
        let params = ArchParams::default();

        assert_eq!(params.word_size, 256);
        assert_eq!(params.word_max(), 0xFF);
        assert_eq!(params.operation_args, Field::new(2, 6));
        assert_eq!(params.operation_uses_alu, Field::new(1, 5));
        assert_eq!(params.operation_sets_pointer, Field::new(1, 4));
        assert_eq!(params.operation_identifier, Field::new(4, 0));
        assert_eq!(params.initial_stack_pointer(), 0xF4);
    }

    #[test]
    fn reserved_registers_are_distinct() {
        let params = ArchParams::default();

        assert_eq!(params.register_count(), 8);
        assert_eq!(params.register_of_stack_pointer, 7);
        assert_eq!(params.register_of_interrupt_status, 6);
        assert_eq!(params.register_of_interrupt_mask, 5);
    }

    #[test]
    fn wider_words_move_opcode_fields_up() {
        let params = ArchParams::new(12).unwrap();

        assert_eq!(params.word_size, 4096);
        assert_eq!(params.operation_args.shift, 10);
        assert_eq!(params.operation_sets_pointer.shift, 8);
        assert_eq!(params.register_of_stack_pointer, 11);
    }

    #[test]
    fn rejects_unsupported_bit_counts() {
        assert_eq!(
            ArchParams::new(7),
            Err(ParamsError::UnsupportedBitCount(7))
        );
        assert_eq!(
            ArchParams::new(17),
            Err(ParamsError::UnsupportedBitCount(17))
        );
    }

    #[test]
    fn field_insert_and_extract() {
        let field = Field::new(2, 6);

        assert_eq!(field.mask(), 0b1100_0000);
        assert_eq!(field.insert(0b10), 0b1000_0000);
        assert_eq!(field.extract(0b1010_0111), 0b10);
    }
}
