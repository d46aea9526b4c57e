//! Per-way block state and the LRU bookkeeping of one set.
//!
//! Recency is stored in the blocks themselves as a rank: 0 is the most
//! recently used way and `ways - 1` the least. Every set starts with way `i`
//! holding rank `i` and all ways invalid, and the only mutation of ranks is
//! [`CacheSet::touch`], so the ranks of a set are always a permutation of
//! `0..ways`. The victim is the way holding the maximum rank; invalid ways
//! need no special casing because they start at the bottom of the order and
//! only leave it by being filled.

/// State of one way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Block {
    valid: bool,
    dirty: bool,
    tag: u32,
    recency: u32,
}

impl Block {
    /// Whether the way holds a block.
    #[inline]
    pub const fn valid(&self) -> bool {
        self.valid
    }

    /// Whether the block has been written since it was installed.
    #[inline]
    pub const fn dirty(&self) -> bool {
        self.dirty
    }

    /// Tag of the resident block. Meaningless while invalid.
    #[inline]
    pub const fn tag(&self) -> u32 {
        self.tag
    }

    /// LRU rank; 0 is most recently used.
    #[inline]
    pub const fn recency(&self) -> u32 {
        self.recency
    }
}

/// One set: a fixed array of ways.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheSet {
    ways: Vec<Block>,
}

impl CacheSet {
    /// Creates a set of `ways` invalid ways ranked `0..ways`.
    pub fn new(ways: u32) -> Self {
        Self {
            ways: (0..ways)
                .map(|recency| Block {
                    recency,
                    ..Block::default()
                })
                .collect(),
        }
    }

    /// The ways in physical order.
    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.ways
    }

    /// The ways ordered from most to least recently used.
    pub fn mru_order(&self) -> Vec<&Block> {
        let mut order: Vec<&Block> = self.ways.iter().collect();
        order.sort_by_key(|block| block.recency);
        order
    }

    /// Way holding a valid block with `tag`, if any.
    #[inline]
    pub fn find(&self, tag: u32) -> Option<usize> {
        self.ways
            .iter()
            .position(|block| block.valid && block.tag == tag)
    }

    /// Way holding the maximum recency rank.
    #[inline]
    pub fn victim(&self) -> usize {
        self.ways
            .iter()
            .enumerate()
            .max_by_key(|(_, block)| block.recency)
            .map_or(0, |(way, _)| way)
    }

    /// Makes `way` the most recently used; every way that was more recent
    /// than it ages by one rank.
    pub fn touch(&mut self, way: usize) {
        let rank = self.ways[way].recency;
        for block in &mut self.ways {
            if block.recency < rank {
                block.recency += 1;
            }
        }
        self.ways[way].recency = 0;
    }

    /// Marks the block in `way` dirty.
    #[inline]
    pub(crate) fn mark_dirty(&mut self, way: usize) {
        self.ways[way].dirty = true;
    }

    /// Clears the dirty bit of `way` once its data has been written back.
    #[inline]
    pub(crate) fn clean(&mut self, way: usize) {
        self.ways[way].dirty = false;
    }

    /// Fills `way` with a new block. Recency is left to [`CacheSet::touch`].
    #[inline]
    pub(crate) fn install(&mut self, way: usize, tag: u32, dirty: bool) {
        let block = &mut self.ways[way];
        block.valid = true;
        block.tag = tag;
        block.dirty = dirty;
    }
}
