//! crates/signature/src/layout.rs
//!
//! Partitioning of an input into fixed-size blocks.

use core::ops::Range;

use crate::error::{ConfigError, SignatureError};

/// One mebibyte, the unit in which block sizes are configured on the command line.
pub const MIB: u64 = 1024 * 1024;
/// Block size used when none is requested.
pub const DEFAULT_BLOCK_SIZE: u64 = MIB;
/// Largest accepted block size in bytes.
pub const MAX_BLOCK_SIZE: u64 = u32::MAX as u64;

/// Converts a block size expressed in MiB into bytes.
///
/// Values of zero or below are coerced to 1 MiB.
#[must_use]
pub fn block_size_from_mib(mib: i64) -> u64 {
    let mib = u64::try_from(mib).ok().filter(|&mib| mib > 0).unwrap_or(1);
    mib.saturating_mul(MIB)
}

/// Rejects block sizes outside `1..=MAX_BLOCK_SIZE`.
pub(crate) fn validate_block_size(block_size: u64) -> Result<(), ConfigError> {
    if block_size == 0 {
        return Err(ConfigError::ZeroBlockSize);
    }
    if block_size > MAX_BLOCK_SIZE || usize::try_from(block_size).is_err() {
        return Err(ConfigError::BlockSizeTooLarge {
            block_size,
            max: MAX_BLOCK_SIZE,
        });
    }
    Ok(())
}

/// Block partition of a file of known size.
///
/// Block `i` covers `[i * block_size, min((i + 1) * block_size, file_size))`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BlockLayout {
    file_size: u64,
    block_size: u64,
    block_count: u64,
}

impl BlockLayout {
    /// Partitions `file_size` bytes into blocks of `block_size` bytes.
    ///
    /// # Errors
    ///
    /// - [`SignatureError::InvalidConfiguration`] when `block_size` is zero or too large.
    /// - [`SignatureError::TooManyBlocks`] when the block count cannot be addressed.
    pub fn new(file_size: u64, block_size: u64) -> Result<Self, SignatureError> {
        validate_block_size(block_size)?;

        let block_count = file_size.div_ceil(block_size);
        if usize::try_from(block_count).is_err() {
            return Err(SignatureError::TooManyBlocks(block_count));
        }

        Ok(Self {
            file_size,
            block_size,
            block_count,
        })
    }

    /// Returns the input size in bytes.
    #[inline]
    #[must_use]
    pub const fn file_size(self) -> u64 {
        self.file_size
    }

    /// Returns the block size in bytes.
    #[inline]
    #[must_use]
    pub const fn block_size(self) -> u64 {
        self.block_size
    }

    /// Returns `ceil(file_size / block_size)`.
    #[inline]
    #[must_use]
    pub const fn block_count(self) -> u64 {
        self.block_count
    }

    /// Returns the length of the trailing partial block, or zero when the last block is full.
    #[inline]
    #[must_use]
    pub const fn remainder(self) -> u64 {
        self.file_size % self.block_size
    }

    /// Reports whether the layout contains no blocks.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.block_count == 0
    }

    /// Returns the byte range covered by block `index`.
    #[must_use]
    pub fn block_range(self, index: u64) -> Option<Range<u64>> {
        if index >= self.block_count {
            return None;
        }
        let start = index * self.block_size;
        let end = start.saturating_add(self.block_size).min(self.file_size);
        Some(start..end)
    }

    /// Returns the number of real bytes in block `index`, zero when out of range.
    #[must_use]
    pub fn block_len(self, index: u64) -> u64 {
        self.block_range(index)
            .map_or(0, |range| range.end - range.start)
    }

    /// Returns an iterator over every block range in index order.
    pub fn blocks(self) -> impl ExactSizeIterator<Item = Range<u64>> {
        (0..self.block_count_usize()).map(move |index| {
            let start = index as u64 * self.block_size;
            start..start.saturating_add(self.block_size).min(self.file_size)
        })
    }

    /// Block size as a buffer length. Validated on construction.
    pub(crate) const fn block_size_usize(self) -> usize {
        self.block_size as usize
    }

    /// Block count as a slice length. Validated on construction.
    pub(crate) const fn block_count_usize(self) -> usize {
        self.block_count as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_multiple_has_no_remainder() {
        let layout = BlockLayout::new(3 * MIB, MIB).expect("layout");
        assert_eq!(layout.block_count(), 3);
        assert_eq!(layout.remainder(), 0);
        assert_eq!(layout.block_len(2), MIB);
    }

    #[test]
    fn partial_last_block_rounds_up() {
        let layout = BlockLayout::new(2 * 4096 + 17, 4096).expect("layout");
        assert_eq!(layout.block_count(), 3);
        assert_eq!(layout.remainder(), 17);
        assert_eq!(layout.block_range(2), Some(8192..8209));
        assert_eq!(layout.block_len(2), 17);
    }

    #[test]
    fn empty_file_has_no_blocks() {
        let layout = BlockLayout::new(0, MIB).expect("layout");
        assert!(layout.is_empty());
        assert_eq!(layout.block_count(), 0);
        assert_eq!(layout.block_range(0), None);
        assert_eq!(layout.blocks().len(), 0);
    }

    #[test]
    fn single_byte_file_has_one_block() {
        let layout = BlockLayout::new(1, MIB).expect("layout");
        assert_eq!(layout.block_count(), 1);
        assert_eq!(layout.block_range(0), Some(0..1));
    }

    #[test]
    fn zero_block_size_is_rejected() {
        let error = BlockLayout::new(10, 0).expect_err("zero block size");
        assert!(matches!(
            error,
            SignatureError::InvalidConfiguration(ConfigError::ZeroBlockSize)
        ));
    }

    #[test]
    fn oversized_block_size_is_rejected() {
        let error = BlockLayout::new(10, MAX_BLOCK_SIZE + 1).expect_err("too large");
        assert!(matches!(
            error,
            SignatureError::InvalidConfiguration(ConfigError::BlockSizeTooLarge { .. })
        ));
    }

    #[test]
    fn out_of_range_block_has_zero_length() {
        let layout = BlockLayout::new(100, 10).expect("layout");
        assert_eq!(layout.block_len(10), 0);
        assert_eq!(layout.block_range(10), None);
    }

    #[test]
    fn blocks_iterator_matches_block_range() {
        let layout = BlockLayout::new(1_000, 300).expect("layout");
        let ranges: Vec<_> = layout.blocks().collect();
        assert_eq!(ranges, vec![0..300, 300..600, 600..900, 900..1_000]);
        for (index, range) in ranges.into_iter().enumerate() {
            assert_eq!(layout.block_range(index as u64), Some(range));
        }
    }

    #[test]
    fn mib_coercion() {
        assert_eq!(block_size_from_mib(1), MIB);
        assert_eq!(block_size_from_mib(4), 4 * MIB);
        assert_eq!(block_size_from_mib(0), MIB);
        assert_eq!(block_size_from_mib(-7), MIB);
    }
}
