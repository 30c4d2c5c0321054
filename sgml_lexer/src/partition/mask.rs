//! Arbitrary-width subset membership flags

/// Bitset recording which interest subsets an equivalence class belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SubsetMask {
    words: Vec<u64>,
}

impl SubsetMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: usize) {
        let word = index / 64;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << (index % 64);
    }

    pub fn contains(&self, index: usize) -> bool {
        self.words
            .get(index / 64)
            .is_some_and(|w| w & (1u64 << (index % 64)) != 0)
    }

    /// Copy of `self` with `index` added
    pub fn with(&self, index: usize) -> Self {
        let mut mask = self.clone();
        mask.insert(index);
        mask
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Set indices in increasing order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            (0..64)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| i * 64 + bit)
        })
    }
}
