//! crates/signature/src/mapped.rs
//!
//! Mapped-window engine: read-only memory maps processed one window at a time.
//!
//! Each window of the [`WindowPlan`] is mapped, its blocks are checksummed in
//! parallel straight out of the mapping, and the batch is joined before the
//! mapping is dropped and the next window is mapped. Concurrency therefore
//! never exceeds one window's worth of blocks.

use std::fs::File;

use memmap2::{Mmap, MmapOptions};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::algorithm::ChecksumAlgorithm;
use crate::block::checksum_block;
use crate::config::SignatureConfig;
use crate::error::SignatureError;
use crate::file::FileSignature;
use crate::layout::BlockLayout;
use crate::window::{Window, WindowPlan, WindowSlot};

/// Generates a signature by mapping `file` window by window.
///
/// # Errors
///
/// - [`SignatureError::Read`] when the file's current length cannot be queried.
/// - [`SignatureError::InputChanged`] when the file length differs from the layout.
/// - [`SignatureError::Map`] when a window cannot be mapped. The run stops at the
///   first failing window.
/// - [`SignatureError::WorkerPool`] when the worker threads cannot be started.
#[instrument(skip_all, fields(block_count = layout.block_count(), block_size = layout.block_size()), name = "mapped_signature")]
pub fn generate_mapped_signature<A>(
    file: &File,
    layout: BlockLayout,
    algorithm: &A,
    config: &SignatureConfig,
) -> Result<FileSignature, SignatureError>
where
    A: ChecksumAlgorithm + ?Sized,
{
    let observed = file.metadata().map_err(SignatureError::Read)?.len();
    if observed != layout.file_size() {
        return Err(SignatureError::InputChanged {
            expected: layout.file_size(),
            observed,
        });
    }

    let mut checksums = vec![0u32; layout.block_count_usize()];
    if checksums.is_empty() {
        return Ok(FileSignature::new(layout, checksums));
    }

    let plan = WindowPlan::new(layout, config.parallelism());
    let pool = ThreadPoolBuilder::new()
        .num_threads(config.parallelism().get())
        .thread_name(|index| format!("crcsig-mapped-{index}"))
        .build()?;
    debug!(
        fanout = plan.fanout(),
        window_size = plan.window_size(),
        windows = plan.window_count(),
        "planned mapped windows"
    );

    let block_size = layout.block_size_usize();
    for window in plan.windows() {
        let map = map_window(file, &window)?;
        let slots: Vec<WindowSlot> = plan.slots(window).collect();
        let first = window.first_block() as usize;
        let targets = &mut checksums[first..first + slots.len()];
        debug!(
            window = window.index(),
            offset = window.offset(),
            blocks = slots.len(),
            "mapped window"
        );

        pool.install(|| {
            targets
                .par_iter_mut()
                .zip(slots.par_iter())
                .for_each(|(target, slot)| {
                    let start = slot.offset as usize;
                    let bytes = &map[start..start + slot.len as usize];
                    *target = checksum_block(algorithm, bytes, block_size);
                });
        });
        drop(map);
    }

    debug!(blocks = checksums.len(), "mapped signature complete");
    Ok(FileSignature::new(layout, checksums))
}

#[allow(unsafe_code)]
fn map_window(file: &File, window: &Window) -> Result<Mmap, SignatureError> {
    let map_error = |source| SignatureError::Map {
        offset: window.offset(),
        len: window.len(),
        source,
    };
    let len = usize::try_from(window.len()).map_err(|_| {
        map_error(std::io::Error::other("window exceeds the address space"))
    })?;

    // SAFETY: the mapping is read-only and dropped before the next window is
    // mapped. The file length was checked against the layout before mapping.
    unsafe { MmapOptions::new().offset(window.offset()).len(len).map(file) }.map_err(map_error)
}
