#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `signature` splits a file into fixed-size blocks, computes a CRC-32 for
//! every block in parallel and writes the checksums, in block order, to a
//! signature file. Two engines produce byte-identical output:
//!
//! - the stream engine ([`generate_stream_signature`]) reads the input
//!   sequentially and hands each block to a bounded worker pool;
//! - the mapped engine ([`generate_mapped_signature`]) maps the input one
//!   window at a time and checksums the window's blocks straight out of the
//!   mapping.
//!
//! # Design
//!
//! [`BlockLayout`] is the partition both engines agree on. A final short block
//! is zero-padded to the full block size before it is checksummed, so every
//! checksum covers exactly `block_size` bytes. Each worker writes only the slot
//! of the block it owns; the vector is read after all workers have joined.
//!
//! [`SignatureJob`] validates the configuration and records the input size
//! before any engine runs, then drives an [`Engine`] and the writer.
//!
//! # Invariants
//!
//! - The signature holds `ceil(file_size / block_size)` checksums.
//! - Output is independent of worker count and scheduling order.
//! - An invalid configuration never creates an output file.
//!
//! # Examples
//!
//! ```
//! use signature::{BlockLayout, Crc32, SignatureConfig, generate_stream_signature};
//!
//! let data = vec![0u8; 3 * 1024];
//! let layout = BlockLayout::new(data.len() as u64, 1024).unwrap();
//! let config = SignatureConfig::new().with_block_size(1024);
//! let signature =
//!     generate_stream_signature(data.as_slice(), layout, &Crc32, &config).unwrap();
//!
//! assert_eq!(signature.len(), 3);
//! assert_eq!(signature.checksums()[0], crc32fast::hash(&[0u8; 1024]));
//! ```

mod algorithm;
mod block;
mod config;
mod engine;
mod error;
mod file;
mod layout;
mod mapped;
mod stream;
mod window;
mod writer;

pub use crate::algorithm::{ChecksumAlgorithm, Crc32};
pub use crate::block::{PaddedBlock, checksum_block};
pub use crate::config::{SignatureConfig, available_parallelism};
pub use crate::engine::{
    Engine, MAPPED_SUFFIX, ParseEngineError, STREAM_SUFFIX, SignatureJob, SignatureReport,
    generate_signature_file, query_input_size,
};
pub use crate::error::{
    ConfigError, EXIT_INPUT_UNAVAILABLE, EXIT_INVALID_CONFIGURATION, EXIT_IO_FAILURE,
    SignatureError,
};
pub use crate::file::FileSignature;
pub use crate::layout::{BlockLayout, DEFAULT_BLOCK_SIZE, MAX_BLOCK_SIZE, MIB, block_size_from_mib};
pub use crate::mapped::generate_mapped_signature;
pub use crate::stream::generate_stream_signature;
pub use crate::window::{Window, WindowPlan, WindowSlot};
pub use crate::writer::{
    CHECKSUM_WIDTH, MalformedSignature, decode_signature, with_suffix, write_signature,
    write_signature_file,
};
