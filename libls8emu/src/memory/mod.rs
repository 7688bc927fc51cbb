use libls8isa::{masks::Masks, Word};


/// Flat word-addressed memory. Every stored value is masked to the word width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    data: Vec<Word>,
    masks: Masks,
}

impl Memory {
    pub fn new(size: usize, masks: Masks) -> Self {
        Self {
            data: vec![0; size],
            masks,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn read(&self, addr: usize) -> Option<Word> {
        self.data.get(addr).copied()
    }

    /// Stores `value` masked to the word width and returns what was stored.
    pub fn write(&mut self, addr: usize, value: Word) -> Option<Word> {
        let masked = self.masks.word_mask(value);
        *self.data.get_mut(addr)? = masked;
        Some(masked)
    }

    /// Copies `words` into consecutive cells from `offset`. Fails without writing if they don't fit.
    pub fn load(&mut self, offset: usize, words: &[Word]) -> Option<()> {
        let end = offset.checked_add(words.len())?;
        let cells = self.data.get_mut(offset..end)?;

        for (cell, word) in cells.iter_mut().zip(words) {
            *cell = self.masks.word_mask(*word);
        }

        Some(())
    }

    pub fn slice(&self, begin: usize, len: usize) -> &[Word] {
        let begin = begin.min(self.data.len());
        let end = begin.saturating_add(len).min(self.data.len());
        &self.data[begin..end]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.data.iter()
    }
}
