use flags::ALUFlags;
use libls8isa::{masks::Masks, Word};

pub mod flags;

/// Word arithmetic. Results are computed at 32 bits and wrapped to the word width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ALU {
    pub flags: ALUFlags,
    masks: Masks,
}

impl ALU {
    pub fn new(masks: Masks) -> Self {
        Self {
            flags: ALUFlags::empty(),
            masks,
        }
    }

    pub fn add(&self, a: Word, b: Word) -> Word {
        self.masks.wrap(a as u32 + b as u32)
    }

    pub fn sub(&self, a: Word, b: Word) -> Word {
        self.masks.wrap((a as u32).wrapping_sub(b as u32))
    }

    pub fn mul(&self, a: Word, b: Word) -> Word {
        self.masks.wrap(a as u32 * b as u32)
    }

    /// Floor division, `None` on a zero divisor.
    pub fn div(&self, a: Word, b: Word) -> Option<Word> {
        a.checked_div(b).map(|value| self.masks.word_mask(value))
    }

    pub fn modulo(&self, a: Word, b: Word) -> Option<Word> {
        a.checked_rem(b).map(|value| self.masks.word_mask(value))
    }

    pub fn and(&self, a: Word, b: Word) -> Word {
        self.masks.word_mask(a & b)
    }

    pub fn or(&self, a: Word, b: Word) -> Word {
        self.masks.word_mask(a | b)
    }

    pub fn xor(&self, a: Word, b: Word) -> Word {
        self.masks.word_mask(a ^ b)
    }

    pub fn shl(&self, a: Word, b: Word) -> Word {
        self.masks
            .wrap((a as u32).checked_shl(b as u32).unwrap_or(0))
    }

    pub fn shr(&self, a: Word, b: Word) -> Word {
        self.masks
            .wrap((a as u32).checked_shr(b as u32).unwrap_or(0))
    }

    pub fn not(&self, a: Word) -> Word {
        self.masks.word_mask(self.masks.word - self.masks.word_mask(a))
    }

    pub fn inc(&self, a: Word) -> Word {
        self.add(a, 1)
    }

    pub fn dec(&self, a: Word) -> Word {
        self.sub(a, 1)
    }

    /// Sets exactly one of LT, EQ and GT.
    pub fn compare(&mut self, a: Word, b: Word) {
        self.set_flag(ALUFlags::LT, a < b);
        self.set_flag(ALUFlags::EQ, a == b);
        self.set_flag(ALUFlags::GT, a > b);
    }

    pub fn set_flag(&mut self, flag: ALUFlags, on: bool) {
        self.flags =
            ALUFlags::from_bits_retain(self.masks.toggle_masked(on, self.flags.bits(), flag.bits()));
    }

    /// True iff every bit of `flag` is set.
    pub fn flagged(&self, flag: ALUFlags) -> bool {
        self.masks.is_masked_by(self.flags.bits(), flag.bits())
    }

    /// True iff any bit of `flag` is set, which is how the composite flags are queried.
    pub fn flagged_any(&self, flag: ALUFlags) -> bool {
        self.flags.intersects(flag)
    }
}
