//! crates/signature/src/block.rs
//!
//! Zero-padded block buffers and the per-block checksum worker.

use std::io::{self, Read};

use crate::algorithm::ChecksumAlgorithm;

/// Buffer of exactly `block_size` bytes holding a block's real bytes followed by zeros.
///
/// Each buffer is exclusively owned by the worker that checksums it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PaddedBlock {
    bytes: Vec<u8>,
    filled: usize,
}

impl PaddedBlock {
    /// Copies `data` into a zeroed buffer of `block_size` bytes.
    ///
    /// `data` longer than `block_size` is truncated.
    #[must_use]
    pub fn from_prefix(data: &[u8], block_size: usize) -> Self {
        let filled = data.len().min(block_size);
        let mut bytes = vec![0u8; block_size];
        bytes[..filled].copy_from_slice(&data[..filled]);
        Self { bytes, filled }
    }

    /// Reads up to `block_size` bytes from `reader` into a fresh buffer.
    ///
    /// Reading stops early only at end of input; the unread tail stays zeroed.
    /// Interrupted reads are retried.
    pub fn read_from<R: Read>(reader: &mut R, block_size: usize) -> io::Result<Self> {
        let mut bytes = vec![0u8; block_size];
        let mut filled = 0;
        while filled < block_size {
            match reader.read(&mut bytes[filled..]) {
                Ok(0) => break,
                Ok(read) => filled += read,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                Err(error) => return Err(error),
            }
        }
        Ok(Self { bytes, filled })
    }

    /// Number of real bytes in the block.
    #[inline]
    #[must_use]
    pub const fn filled(&self) -> usize {
        self.filled
    }

    /// Reports whether no real bytes were read.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Returns the full padded buffer.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Checksums the padded buffer.
    #[inline]
    pub fn checksum<A: ChecksumAlgorithm + ?Sized>(&self, algorithm: &A) -> u32 {
        algorithm.checksum(&self.bytes)
    }
}

/// Checksums a block's real bytes zero-padded out to `block_size`.
///
/// Full-length blocks are hashed in place; only a short block is copied into a
/// padded buffer.
pub fn checksum_block<A: ChecksumAlgorithm + ?Sized>(
    algorithm: &A,
    data: &[u8],
    block_size: usize,
) -> u32 {
    if data.len() == block_size {
        algorithm.checksum(data)
    } else {
        PaddedBlock::from_prefix(data, block_size).checksum(algorithm)
    }
}
