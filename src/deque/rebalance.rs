//! Merging and splitting of blocks.
//!
//! Every block between the head and the tail sentinels holds between
//! `capacity / 2` and `capacity` elements. The head block may hold fewer,
//! but it is only empty when the whole deque is empty.
//!
//! The bounds are restored locally, around the block an insertion or a
//! removal touches, so every operation moves at most a constant number of
//! blocks worth of slots.

use crate::deque::chain::{BlockKey, Chain};
use log::trace;

impl<T> Chain<T> {
    /// Bring the block `key` back into bounds before `incoming` elements
    /// (0 or 1) are put into it.
    ///
    /// A short block is merged with its successors; a block that cannot
    /// take the incoming elements is split in two. Slots may move to other
    /// blocks, so locations into `key` must be resolved again afterwards.
    pub(crate) fn rebalance(&mut self, key: BlockKey, incoming: usize, capacity: usize) {
        if key == self.tail() {
            return;
        }
        if self.len_of(key) < capacity / 2 {
            self.merge(key, capacity);
        }
        // a merge may fill the block up
        if self.len_of(key) + incoming > capacity {
            self.split(key, capacity);
        }
    }

    /// Absorb the successors of `key` while they fit, then top it up from
    /// the front of the next successor if it is still short.
    ///
    /// Slots are only appended to `key`, so locations into it stay valid.
    fn merge(&mut self, key: BlockKey, capacity: usize) {
        while let Some(next) = self.next_inner(key) {
            if self.len_of(key) + self.len_of(next) > capacity {
                break;
            }
            let mut absorbed = self.unlink(next);
            trace!("merge: absorb {} slots into {:?}", absorbed.len(), key);
            self.block_mut(key).append(&mut absorbed);
        }

        let deficit = (capacity / 2).saturating_sub(self.len_of(key));
        if deficit == 0 {
            return;
        }
        if let Some(next) = self.next_inner(key) {
            let mut moved = self.block_mut(next).take_front(deficit);
            trace!("merge: borrow {} slots from {:?} into {:?}", moved.len(), next, key);
            self.block_mut(key).append(&mut moved);
            if self.block(next).is_empty() {
                self.unlink(next);
            }
        }
    }

    /// Move the upper half of `key` into a new block linked right after it.
    fn split(&mut self, key: BlockKey, capacity: usize) -> BlockKey {
        let at = self.len_of(key) / 2;
        let upper = self.block_mut(key).split_off(at, capacity);
        let upper_len = upper.len();
        let new = self.link_after(key, upper);
        trace!("split: {:?} keeps {} slots, {:?} takes {}", key, at, new, upper_len);
        new
    }

    /// Restore the bounds of `key` after an element has been removed from
    /// it, and return where the location `(key, offset)` has moved to.
    ///
    /// A short block is merged with its successor. The last block has no
    /// successor to merge with, so it is folded into its predecessor or
    /// topped up from the back of it.
    pub(crate) fn settle(
        &mut self,
        key: BlockKey,
        offset: usize,
        capacity: usize,
    ) -> (BlockKey, usize) {
        let half = capacity / 2;
        if key == self.tail() || self.len_of(key) >= half {
            return (key, offset);
        }
        if self.next_inner(key).is_some() {
            self.merge(key, capacity);
            return (key, offset);
        }
        let prev = match self.prev(key) {
            Some(prev) => prev,
            // the head block is exempt
            None => return (key, offset),
        };

        let prev_len = self.len_of(prev);
        if prev_len + self.len_of(key) <= capacity {
            let mut absorbed = self.unlink(key);
            trace!("settle: fold {:?} into {:?}", key, prev);
            self.block_mut(prev).append(&mut absorbed);
            (prev, prev_len + offset)
        } else {
            let count = half - self.len_of(key);
            let moved = self.block_mut(prev).take_back(count);
            trace!("settle: borrow {} slots from {:?} into {:?}", count, prev, key);
            self.block_mut(key).prepend(moved);
            (key, offset + count)
        }
    }
}

#[cfg(test)]
impl<T> Chain<T> {
    /// Walk the whole chain and check its structure, returning the total
    /// number of elements.
    pub(crate) fn check(&self, capacity: usize) -> usize {
        let (head, tail) = (self.head(), self.tail());
        assert_eq!(self.prev(head), None, "head block has a predecessor");
        assert_eq!(self.next(tail), None, "tail block has a successor");
        assert!(self.block(tail).is_empty(), "tail block holds elements");

        let mut total = 0;
        let mut visited = 0;
        for key in self.keys() {
            visited += 1;
            if let Some(next) = self.next(key) {
                assert_eq!(self.prev(next), Some(key), "asymmetric links");
            }
            let len = self.len_of(key);
            assert!(len <= capacity, "block of {} slots overflows", len);
            if key != head && key != tail {
                assert!(
                    len >= capacity / 2,
                    "block of {} slots underflows {}",
                    len,
                    capacity / 2
                );
            }
            total += len;
        }
        assert_eq!(visited, self.block_count() + 1, "unreachable blocks");
        if self.block(head).is_empty() {
            assert_eq!(self.next(head), Some(tail), "empty head before blocks");
        }
        total
    }
}
