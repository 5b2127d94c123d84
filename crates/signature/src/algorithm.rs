//! crates/signature/src/algorithm.rs
//!
//! Block checksum algorithm used by both engines.

/// Function from a padded block to its 32-bit checksum.
///
/// Implementations must be deterministic: the same bytes always yield the same
/// value. Engines only ever pass buffers of exactly the configured block size.
pub trait ChecksumAlgorithm: Sync {
    /// Computes the checksum of `block`.
    fn checksum(&self, block: &[u8]) -> u32;
}

/// CRC-32 with the ISO-HDLC parameters (reflected polynomial `0xEDB88320`,
/// initial and final XOR `0xFFFFFFFF`).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Crc32;

impl ChecksumAlgorithm for Crc32 {
    #[inline]
    fn checksum(&self, block: &[u8]) -> u32 {
        crc32fast::hash(block)
    }
}

impl<F> ChecksumAlgorithm for F
where
    F: Fn(&[u8]) -> u32 + Sync,
{
    #[inline]
    fn checksum(&self, block: &[u8]) -> u32 {
        self(block)
    }
}
