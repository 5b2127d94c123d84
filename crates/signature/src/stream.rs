//! crates/signature/src/stream.rs
//!
//! Stream engine: sequential block reads feeding a bounded worker pool.
//!
//! The read loop allocates a fresh zero-padded buffer per block and moves it,
//! together with an exclusive reference to the block's slot in the signature
//! vector, into a worker task. At most `queue_depth` blocks are in flight at
//! once; the read loop waits for a permit before handing off the next block.
//! The end of the worker scope is the barrier after which the vector is read.

use std::io::{self, Read};

use crossbeam_channel::{Receiver, Sender, bounded};
use rayon::ThreadPoolBuilder;
use tracing::{debug, instrument};

use crate::algorithm::ChecksumAlgorithm;
use crate::block::PaddedBlock;
use crate::config::SignatureConfig;
use crate::error::SignatureError;
use crate::file::FileSignature;
use crate::layout::BlockLayout;

/// Counting permit pool capping the number of blocks held by workers.
struct InFlight {
    acquire: Sender<()>,
    release: Receiver<()>,
}

impl InFlight {
    fn new(depth: usize) -> Self {
        let (acquire, release) = bounded(depth);
        Self { acquire, release }
    }

    /// Blocks while `depth` permits are outstanding.
    fn acquire(&self) {
        // Both channel ends live in `self`, so neither operation can disconnect.
        let _ = self.acquire.send(());
    }

    fn release(&self) {
        let _ = self.release.recv();
    }
}

/// Generates a signature by reading `reader` block by block.
///
/// The reader must yield exactly `layout.file_size()` bytes. A final short
/// block is zero-padded to the block size before it is checksummed.
///
/// # Errors
///
/// - [`SignatureError::Read`] when the reader fails.
/// - [`SignatureError::InputChanged`] when the reader yields fewer or more bytes
///   than the layout describes.
/// - [`SignatureError::WorkerPool`] when the worker threads cannot be started.
#[instrument(skip_all, fields(block_count = layout.block_count(), block_size = layout.block_size()), name = "stream_signature")]
pub fn generate_stream_signature<R, A>(
    mut reader: R,
    layout: BlockLayout,
    algorithm: &A,
    config: &SignatureConfig,
) -> Result<FileSignature, SignatureError>
where
    R: Read,
    A: ChecksumAlgorithm + ?Sized,
{
    let block_size = layout.block_size_usize();
    let mut checksums = vec![0u32; layout.block_count_usize()];

    if !checksums.is_empty() {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.parallelism().get())
            .thread_name(|index| format!("crcsig-stream-{index}"))
            .build()?;
        let in_flight = InFlight::new(config.queue_depth().get());
        debug!(
            workers = config.parallelism().get(),
            queue_depth = config.queue_depth().get(),
            "starting stream workers"
        );

        pool.in_place_scope(|scope| -> Result<(), SignatureError> {
            let mut offset = 0u64;
            for (index, slot) in checksums.iter_mut().enumerate() {
                let block = PaddedBlock::read_from(&mut reader, block_size)
                    .map_err(SignatureError::Read)?;
                let expected = layout.block_len(index as u64);
                if block.filled() as u64 != expected {
                    return Err(SignatureError::InputChanged {
                        expected: layout.file_size(),
                        observed: offset + block.filled() as u64,
                    });
                }
                offset += expected;

                in_flight.acquire();
                let in_flight = &in_flight;
                scope.spawn(move |_| {
                    *slot = block.checksum(algorithm);
                    drop(block);
                    in_flight.release();
                });
            }
            Ok(())
        })?;
    }

    if has_trailing_data(&mut reader)? {
        return Err(SignatureError::InputChanged {
            expected: layout.file_size(),
            observed: layout.file_size() + 1,
        });
    }

    debug!(blocks = checksums.len(), "stream signature complete");
    Ok(FileSignature::new(layout, checksums))
}

fn has_trailing_data<R: Read>(reader: &mut R) -> Result<bool, SignatureError> {
    let mut probe = [0u8; 1];
    loop {
        match reader.read(&mut probe) {
            Ok(read) => return Ok(read != 0),
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => return Err(SignatureError::Read(error)),
        }
    }
}
