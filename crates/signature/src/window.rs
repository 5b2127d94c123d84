//! crates/signature/src/window.rs
//!
//! Window planning for the mapped engine.
//!
//! The plan is a pure function of the block layout and the hardware parallelism
//! `P`. Each window spans `fanout` blocks, where `fanout` is `P²` for inputs of
//! at least `block_size * P²` bytes and `P` for smaller inputs. Window `w` owns
//! the global blocks `[w * fanout, (w + 1) * fanout)`, clamped to the block
//! count, so the global index of sub-block `th` is `w * fanout + th`. For large
//! inputs this is the nominal `w * P² + th` stride.

use std::num::NonZeroUsize;

use crate::layout::BlockLayout;

/// Contiguous byte range of the input mapped as a unit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Window {
    index: u64,
    offset: u64,
    len: u64,
    first_block: u64,
    block_count: u64,
}

impl Window {
    /// Zero-based window index.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> u64 {
        self.index
    }

    /// Byte offset of the window within the input.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Window length in bytes, clamped to the end of the input.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Reports whether the window covers no bytes.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Global index of the window's first block.
    #[inline]
    #[must_use]
    pub const fn first_block(&self) -> u64 {
        self.first_block
    }

    /// Number of blocks that start inside the window.
    #[inline]
    #[must_use]
    pub const fn block_count(&self) -> u64 {
        self.block_count
    }
}

/// One block inside a window.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WindowSlot {
    /// Global block index.
    pub block: u64,
    /// Byte offset of the block relative to the window start.
    pub offset: u64,
    /// Number of real bytes in the block.
    pub len: u64,
}

/// Partition of a [`BlockLayout`] into mapped windows.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WindowPlan {
    layout: BlockLayout,
    fanout: u64,
    window_size: u64,
    window_count: u64,
}

impl WindowPlan {
    /// Plans windows for `layout` given hardware parallelism `P`.
    #[must_use]
    pub fn new(layout: BlockLayout, parallelism: NonZeroUsize) -> Self {
        let p = parallelism.get() as u64;
        let nominal = p.saturating_mul(p);
        let fanout = if layout.file_size() < layout.block_size().saturating_mul(nominal) {
            p
        } else {
            nominal
        };
        let window_size = layout.block_size().saturating_mul(fanout);
        let window_count = layout.file_size().div_ceil(window_size);

        Self {
            layout,
            fanout,
            window_size,
            window_count,
        }
    }

    /// Returns the layout being planned.
    #[inline]
    #[must_use]
    pub const fn layout(&self) -> BlockLayout {
        self.layout
    }

    /// Blocks per window.
    #[inline]
    #[must_use]
    pub const fn fanout(&self) -> u64 {
        self.fanout
    }

    /// Nominal window size in bytes; only the last window may be shorter.
    #[inline]
    #[must_use]
    pub const fn window_size(&self) -> u64 {
        self.window_size
    }

    /// Number of windows, `ceil(file_size / window_size)`.
    #[inline]
    #[must_use]
    pub const fn window_count(&self) -> u64 {
        self.window_count
    }

    /// Returns window `index`, or `None` past the last window.
    #[must_use]
    pub fn window(&self, index: u64) -> Option<Window> {
        if index >= self.window_count {
            return None;
        }

        let offset = index * self.window_size;
        let len = self.window_size.min(self.layout.file_size() - offset);
        let first_block = index * self.fanout;
        let block_count = self
            .fanout
            .min(self.layout.block_count().saturating_sub(first_block));

        Some(Window {
            index,
            offset,
            len,
            first_block,
            block_count,
        })
    }

    /// Iterates over every window in order.
    pub fn windows(&self) -> impl Iterator<Item = Window> + '_ {
        (0..self.window_count).filter_map(|index| self.window(index))
    }

    /// Lists the blocks of `window`.
    ///
    /// Iteration stops at the first global index past the end of the input, so
    /// no slot is produced once end of file has been reached.
    pub fn slots(&self, window: Window) -> impl Iterator<Item = WindowSlot> + '_ {
        let layout = self.layout;
        let base = window.first_block();
        (0..self.fanout).map_while(move |th| {
            let block = base + th;
            if block >= layout.block_count() {
                return None;
            }
            Some(WindowSlot {
                block,
                offset: th * layout.block_size(),
                len: layout.block_len(block),
            })
        })
    }
}
