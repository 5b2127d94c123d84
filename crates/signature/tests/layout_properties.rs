//! Property tests for block partitioning and window planning.

use std::num::NonZeroUsize;

use proptest::prelude::*;
use signature::{BlockLayout, PaddedBlock, WindowPlan, checksum_block};

proptest! {
    #[test]
    fn block_count_is_ceiling_division(file_size in 0u64..1_000_000, block_size in 1u64..10_000) {
        let layout = BlockLayout::new(file_size, block_size).expect("layout");
        prop_assert_eq!(layout.block_count(), file_size.div_ceil(block_size));

        let covered: u64 = layout.blocks().map(|range| range.end - range.start).sum();
        prop_assert_eq!(covered, file_size);
    }

    #[test]
    fn only_the_last_block_is_short(file_size in 1u64..100_000, block_size in 1u64..2_000) {
        let layout = BlockLayout::new(file_size, block_size).expect("layout");
        let last = layout.block_count() - 1;
        for index in 0..last {
            prop_assert_eq!(layout.block_len(index), block_size);
        }
        let tail = layout.block_len(last);
        prop_assert!(tail >= 1 && tail <= block_size);
    }

    #[test]
    fn windows_visit_each_block_once(
        file_size in 0u64..200_000,
        block_size in 1u64..4_096,
        workers in 1usize..9,
    ) {
        let layout = BlockLayout::new(file_size, block_size).expect("layout");
        let plan = WindowPlan::new(layout, NonZeroUsize::new(workers).expect("workers"));

        let mut next = 0u64;
        for window in plan.windows() {
            prop_assert!(window.len() <= plan.window_size());
            for slot in plan.slots(window) {
                prop_assert_eq!(slot.block, next);
                prop_assert_eq!(window.offset() + slot.offset, slot.block * block_size);
                prop_assert!(slot.offset + slot.len <= window.len());
                next += 1;
            }
        }
        prop_assert_eq!(next, layout.block_count());
    }

    #[test]
    fn padding_law_holds(data in proptest::collection::vec(any::<u8>(), 0..512), extra in 0usize..256) {
        let block_size = data.len() + extra;
        prop_assume!(block_size > 0);

        let mut padded = data.clone();
        padded.resize(block_size, 0);
        prop_assert_eq!(
            checksum_block(&signature::Crc32, &data, block_size),
            crc32fast::hash(&padded)
        );
        let padded_block = PaddedBlock::from_prefix(&data, block_size);
        prop_assert_eq!(padded_block.as_bytes(), padded.as_slice());
    }
}
