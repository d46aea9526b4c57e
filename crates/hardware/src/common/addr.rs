//! Address decomposition for set-associative lookup.
//!
//! A request address is split, from the least significant bit upward, into a
//! block offset, a set index, and a tag. This module provides:
//! 1. **Decoding:** `address -> (tag, index)` for a given level geometry.
//! 2. **Recoding:** `(tag, index) -> address` for writeback requests; the
//!    reconstructed address is always block-aligned.
//!
//! Every shift is total over `u32`: widths of 32 or more yield zero rather
//! than overflowing, so a codec never fails on any input.

/// Tag and set index of a block, as seen by one cache level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockAddr {
    /// High-order address bits identifying the block within its set.
    pub tag: u32,
    /// Set selected by the index bits.
    pub index: u32,
}

/// Splits and rebuilds addresses for one cache geometry.
///
/// # Examples
///
/// ```
/// use cachesim_core::common::AddressCodec;
///
/// // 4 sets (2 index bits), 4-byte blocks (2 offset bits).
/// let codec = AddressCodec::new(2, 2);
/// let block = codec.decode(0x1C);
/// assert_eq!((block.tag, block.index), (1, 3));
/// assert_eq!(codec.recode(block), 0x1C);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressCodec {
    index_bits: u32,
    offset_bits: u32,
}

impl AddressCodec {
    /// Creates a codec for `2^index_bits` sets of `2^offset_bits`-byte blocks.
    #[inline]
    pub const fn new(index_bits: u32, offset_bits: u32) -> Self {
        Self {
            index_bits,
            offset_bits,
        }
    }

    /// Number of set-index bits.
    #[inline]
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Number of block-offset bits.
    #[inline]
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Mask covering the low `index_bits` bits.
    #[inline]
    const fn index_mask(&self) -> u32 {
        match 1u32.checked_shl(self.index_bits) {
            Some(bit) => bit - 1,
            None => u32::MAX,
        }
    }

    /// Decomposes `addr` into its tag and set index.
    ///
    /// With zero index bits (a fully-associative level) the index is always 0.
    #[inline]
    pub const fn decode(&self, addr: u32) -> BlockAddr {
        let index = shr(addr, self.offset_bits) & self.index_mask();
        let tag = shr(addr, self.index_bits.saturating_add(self.offset_bits));
        BlockAddr { tag, index }
    }

    /// Rebuilds the block-aligned address of `block`.
    ///
    /// The offset bits of the result are always zero: forwarded requests
    /// address a whole block.
    #[inline]
    pub const fn recode(&self, block: BlockAddr) -> u32 {
        shl(shl(block.tag, self.index_bits) | block.index, self.offset_bits)
    }
}

#[inline]
const fn shr(value: u32, bits: u32) -> u32 {
    match value.checked_shr(bits) {
        Some(v) => v,
        None => 0,
    }
}

#[inline]
const fn shl(value: u32, bits: u32) -> u32 {
    match value.checked_shl(bits) {
        Some(v) => v,
        None => 0,
    }
}
