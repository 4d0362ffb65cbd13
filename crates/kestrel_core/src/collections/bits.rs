//! # Bit Set
//!
//! Compact, growable set of small integers, 64 per `u64` word.
//!
//! Used for per-entity component membership and for the disabled-entity set.
//!
//! ## Performance
//!
//! - Insert / remove / contains: O(1)
//! - Clear: O(n/64)
//! - Iterate: O(words + set bits), using `trailing_zeros` to skip clear regions

/// Growable bitset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitSet {
    /// 1 = present, 0 = absent. 64 indices per word.
    words: Vec<u64>,
}

impl BitSet {
    /// Creates an empty bitset.
    #[must_use]
    pub const fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Creates an empty bitset that can hold indices below `bits` without growing.
    #[must_use]
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            words: vec![0u64; bits.div_ceil(64)],
        }
    }

    /// Adds `index` to the set. Returns `true` if it was not present.
    #[inline]
    pub fn insert(&mut self, index: usize) -> bool {
        let word = index / 64;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let mask = 1u64 << (index % 64);
        let was_clear = self.words[word] & mask == 0;
        self.words[word] |= mask;
        was_clear
    }

    /// Removes `index` from the set. Returns `true` if it was present.
    #[inline]
    pub fn remove(&mut self, index: usize) -> bool {
        let Some(word) = self.words.get_mut(index / 64) else {
            return false;
        };
        let mask = 1u64 << (index % 64);
        let was_set = *word & mask != 0;
        *word &= !mask;
        was_set
    }

    /// Checks whether `index` is in the set.
    #[inline]
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.words
            .get(index / 64)
            .is_some_and(|word| (word >> (index % 64)) & 1 == 1)
    }

    /// Removes every index. Allocated words are kept.
    pub fn clear(&mut self) {
        for word in &mut self.words {
            *word = 0;
        }
    }

    /// Returns `true` if no index is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Number of indices in the set.
    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Iterates over the set indices in ascending order.
    #[must_use]
    pub fn iter(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            word_idx: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl<'a> IntoIterator for &'a BitSet {
    type Item = usize;
    type IntoIter = Ones<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the set indices of a [`BitSet`].
pub struct Ones<'a> {
    words: &'a [u64],
    word_idx: usize,
    current_word: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let bit = self.current_word.trailing_zeros() as usize;
                // Clear lowest set bit
                self.current_word &= self.current_word - 1;
                return Some(self.word_idx * 64 + bit);
            }

            self.word_idx += 1;
            self.current_word = *self.words.get(self.word_idx)?;
        }
    }
}
