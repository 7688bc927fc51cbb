use libls8isa::{masks::Masks, Register, Word};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegFile {
    registers: Vec<Word>,
    masks: Masks,
}

impl RegFile {
    pub fn new(count: usize, masks: Masks) -> Self {
        Self {
            registers: vec![0; count],
            masks,
        }
    }

    pub fn len(&self) -> usize {
        self.registers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.registers.iter()
    }

    pub fn register(&self, index: Register) -> Option<Word> {
        self.registers.get(index).copied()
    }

    /// Stores `value` masked to the word width and returns what was stored.
    pub fn set_register(&mut self, index: Register, value: Word) -> Option<Word> {
        let masked = self.masks.word_mask(value);
        *self.registers.get_mut(index)? = masked;
        Some(masked)
    }
}
