//! crates/signature/src/file.rs
//!
//! Ordered per-block checksum vector produced by an engine run.

use crate::layout::BlockLayout;

/// Signature vector: `checksums()[i]` is the checksum of block `i`'s padded buffer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileSignature {
    layout: BlockLayout,
    checksums: Vec<u32>,
}

impl FileSignature {
    pub(crate) const fn new(layout: BlockLayout, checksums: Vec<u32>) -> Self {
        Self { layout, checksums }
    }

    /// Creates a signature from raw components.
    ///
    /// Returns `None` when the number of checksums differs from the layout's block count.
    #[must_use]
    pub fn from_raw_parts(layout: BlockLayout, checksums: Vec<u32>) -> Option<Self> {
        (checksums.len() as u64 == layout.block_count()).then(|| Self::new(layout, checksums))
    }

    /// Returns the layout the signature was computed for.
    #[inline]
    #[must_use]
    pub const fn layout(&self) -> BlockLayout {
        self.layout
    }

    /// Returns the checksums in block order.
    #[inline]
    #[must_use]
    pub fn checksums(&self) -> &[u32] {
        &self.checksums
    }

    /// Returns the number of blocks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.checksums.len()
    }

    /// Reports whether the signature covers an empty input.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checksums.is_empty()
    }

    /// Consumes the signature, returning the checksum vector.
    #[must_use]
    pub fn into_checksums(self) -> Vec<u32> {
        self.checksums
    }
}
