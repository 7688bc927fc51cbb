use crate::{params::ArchParams, Word};

/// Contiguous run of `width` set bits, starting `shift` bits up.
pub const fn block(width: u32, shift: u32) -> Word {
    ((((1u32 << width) - 1) << shift) & Word::MAX as u32) as Word
}

/// Pulls the `width`-bit field at `shift` out of `bits`.
pub fn unblock(width: u32, shift: u32, bits: Word) -> Word {
    ((bits as u32 >> shift) & ((1u32 << width) - 1)) as Word
}

/// Masks over the configured word and field layout.
///
/// Every operation takes an optional mask; when none is given the full word mask is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Masks {
    pub word: Word,

    pub operation_args: Word,
    pub operation_uses_alu: Word,
    pub operation_sets_pointer: Word,
    pub operation_identifier: Word,

    pub flag_eq: Word,
    pub flag_gt: Word,
    pub flag_lt: Word,
    pub flag_neq: Word,
    pub flag_ngt: Word,
    pub flag_nlt: Word,
    pub flag_compare: Word,
}

impl Masks {
    pub fn new(params: &ArchParams) -> Self {
        let flag_eq = params.flag_eq.mask();
        let flag_gt = params.flag_gt.mask();
        let flag_lt = params.flag_lt.mask();

        Self {
            word: params.word_max(),

            operation_args: params.operation_args.mask(),
            operation_uses_alu: params.operation_uses_alu.mask(),
            operation_sets_pointer: params.operation_sets_pointer.mask(),
            operation_identifier: params.operation_identifier.mask(),

            flag_eq,
            flag_gt,
            flag_lt,
            flag_neq: flag_lt | flag_gt,
            flag_ngt: flag_lt | flag_eq,
            flag_nlt: flag_eq | flag_gt,
            flag_compare: flag_eq | flag_gt | flag_lt,
        }
    }

    pub fn mask_or_word(&self, mask: impl Into<Option<Word>>) -> Word {
        mask.into().unwrap_or(self.word)
    }

    pub fn word_mask(&self, bits: Word) -> Word {
        self.and_mask(bits, None)
    }

    /// Truncates a result computed at a wider width back down to a word.
    pub fn wrap(&self, value: u32) -> Word {
        (value & self.word as u32) as Word
    }

    pub fn and_mask(&self, bits: Word, mask: impl Into<Option<Word>>) -> Word {
        bits & self.mask_or_word(mask)
    }

    pub fn or_mask(&self, bits: Word, mask: impl Into<Option<Word>>) -> Word {
        bits | self.mask_or_word(mask)
    }

    pub fn xor_mask(&self, bits: Word, mask: impl Into<Option<Word>>) -> Word {
        bits ^ self.mask_or_word(mask)
    }

    /// True iff every bit of the mask is set in `bits`.
    pub fn is_masked_by(&self, bits: Word, mask: impl Into<Option<Word>>) -> bool {
        let mask = self.mask_or_word(mask);
        self.and_mask(bits, mask) == mask
    }

    pub fn is_not_masked_by(&self, bits: Word, mask: impl Into<Option<Word>>) -> bool {
        !self.is_masked_by(bits, mask)
    }

    pub fn equal_with_mask(&self, bits_a: Word, bits_b: Word, mask: impl Into<Option<Word>>) -> bool {
        let mask = self.mask_or_word(mask);
        self.and_mask(bits_a, mask) == self.and_mask(bits_b, mask)
    }

    pub fn not_equal_with_mask(
        &self,
        bits_a: Word,
        bits_b: Word,
        mask: impl Into<Option<Word>>,
    ) -> bool {
        !self.equal_with_mask(bits_a, bits_b, mask)
    }

    pub fn turn_on_masked(&self, bits: Word, mask: impl Into<Option<Word>>) -> Word {
        self.or_mask(bits, mask)
    }

    pub fn turn_off_masked(&self, bits: Word, mask: impl Into<Option<Word>>) -> Word {
        let mask = self.mask_or_word(mask);
        self.and_mask(bits, self.word - (mask & self.word))
    }

    pub fn toggle_masked(&self, on: bool, bits: Word, mask: impl Into<Option<Word>>) -> Word {
        if on {
            self.turn_on_masked(bits, mask)
        } else {
            self.turn_off_masked(bits, mask)
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn masks() -> Masks {
        Masks::new(&ArchParams::default())
    }

    #[test]
    fn block_and_unblock() {
        assert_eq!(block(2, 6), 0b1100_0000);
        assert_eq!(block(4, 0), 0b0000_1111);
        assert_eq!(block(16, 0), 0xFFFF);
        assert_eq!(unblock(2, 6, 0b1000_0010), 0b10);
        assert_eq!(unblock(1, 5, 0b1010_0000), 1);
        assert_eq!(unblock(4, 0, 0b1010_0111), 0b0111);
    }

    #[test]
    fn opcode_field_masks_cover_the_byte() {
        let masks = masks();

        assert_eq!(
            masks.operation_args
                | masks.operation_uses_alu
                | masks.operation_sets_pointer
                | masks.operation_identifier,
            masks.word
        );
    }

    #[test]
    fn composite_flag_masks() {
        let masks = masks();

        assert_eq!(masks.flag_eq, 0b001);
        assert_eq!(masks.flag_gt, 0b010);
        assert_eq!(masks.flag_lt, 0b100);
        assert_eq!(masks.flag_neq, 0b110);
        assert_eq!(masks.flag_ngt, 0b101);
        assert_eq!(masks.flag_nlt, 0b011);
        assert_eq!(masks.flag_compare, 0b111);
    }

    #[test]
    fn default_mask_is_the_word() {
        let masks = masks();

        assert_eq!(masks.and_mask(0x1FF, None), 0xFF);
        assert_eq!(masks.xor_mask(0b1010_1010, None), 0b0101_0101);
        assert_eq!(masks.or_mask(0, None), 0xFF);
        assert!(masks.is_masked_by(0xFF, None));
        assert!(masks.is_not_masked_by(0xFE, None));
    }

    #[test]
    fn is_masked_by_requires_every_bit() {
        let masks = masks();

        assert!(masks.is_masked_by(0b111, masks.flag_neq));
        assert!(!masks.is_masked_by(0b010, masks.flag_neq));
        assert!(masks.equal_with_mask(0b1011, 0b0011, 0b0011));
        assert!(masks.not_equal_with_mask(0b1011, 0b0011, None));
    }

    #[test]
    fn toggle_sets_and_clears() {
        let masks = masks();

        assert_eq!(masks.toggle_masked(true, 0b000, masks.flag_gt), 0b010);
        assert_eq!(masks.toggle_masked(false, 0b111, masks.flag_gt), 0b101);
        assert_eq!(masks.toggle_masked(false, 0b101, masks.flag_gt), 0b101);
    }

    proptest! {
        #[test]
        fn word_mask_is_idempotent_and_in_range(bit_count in 8u32..=16, bits in any::<Word>()) {
            let masks = Masks::new(&ArchParams::new(bit_count).unwrap());
            let masked = masks.word_mask(bits);

            prop_assert_eq!(masks.word_mask(masked), masked);
            prop_assert!((masked as u32) < (1u32 << bit_count));
        }

        #[test]
        fn toggle_leaves_other_bits(on in any::<bool>(), bits in 0u16..=0xFF, mask in 0u16..=0xFF) {
            let masks = masks();
            let toggled = masks.toggle_masked(on, bits, mask);

            prop_assert_eq!(toggled & !mask, bits & !mask);
            prop_assert_eq!(toggled & mask, if on { mask } else { 0 });
        }
    }
}
