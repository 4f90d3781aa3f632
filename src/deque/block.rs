use crate::error::{Error, Result};
use std::fmt;

/// A run of consecutive elements of a deque.
///
/// Every slot is boxed on its own, so moving slots between blocks during
/// a merge or a split only moves the boxes and never touches the
/// elements themselves.
///
/// A block never grows past the capacity of its deque. Inserting and
/// removing shift the trailing slots, which costs *O*(*capacity*) at
/// most, independent of the length of the whole deque.
pub(crate) struct Block<T> {
    slots: Vec<Box<T>>,
}

impl<T> Block<T> {
    /// Create an empty block, with room for `capacity` slots.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn get(&self, offset: usize) -> Result<&T> {
        self.slots
            .get(offset)
            .map(|slot| &**slot)
            .ok_or(Error::IndexOutOfBound)
    }

    pub(crate) fn get_mut(&mut self, offset: usize) -> Result<&mut T> {
        self.slots
            .get_mut(offset)
            .map(|slot| &mut **slot)
            .ok_or(Error::IndexOutOfBound)
    }

    pub(crate) fn first(&self) -> Option<&T> {
        self.slots.first().map(|slot| &**slot)
    }

    pub(crate) fn last(&self) -> Option<&T> {
        self.slots.last().map(|slot| &**slot)
    }

    pub(crate) fn first_mut(&mut self) -> Option<&mut T> {
        self.slots.first_mut().map(|slot| &mut **slot)
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut T> {
        self.slots.last_mut().map(|slot| &mut **slot)
    }

    /// Insert `value` before the slot at `offset`, where `offset == len`
    /// appends it.
    pub(crate) fn insert(&mut self, offset: usize, value: T) -> Result<()> {
        if offset > self.len() {
            return Err(Error::IndexOutOfBound);
        }
        self.slots.insert(offset, Box::new(value));
        Ok(())
    }

    pub(crate) fn remove(&mut self, offset: usize) -> Result<T> {
        if offset >= self.len() {
            return Err(Error::IndexOutOfBound);
        }
        Ok(*self.slots.remove(offset))
    }

    /// Move all slots of `other` to the back of this block, leaving `other`
    /// empty.
    pub(crate) fn append(&mut self, other: &mut Block<T>) {
        self.slots.append(&mut other.slots);
    }

    /// Move the slots of `front` before the slots of this block.
    pub(crate) fn prepend(&mut self, front: Block<T>) {
        self.slots.splice(0..0, front.slots);
    }

    /// Detach the first `count` slots into a new block.
    pub(crate) fn take_front(&mut self, count: usize) -> Block<T> {
        let count = count.min(self.len());
        Block {
            slots: self.slots.drain(..count).collect(),
        }
    }

    /// Detach the last `count` slots into a new block.
    pub(crate) fn take_back(&mut self, count: usize) -> Block<T> {
        let at = self.len().saturating_sub(count);
        Block {
            slots: self.slots.split_off(at),
        }
    }

    /// Move the slots from `at` onwards into a new block with room for
    /// `capacity` slots.
    pub(crate) fn split_off(&mut self, at: usize, capacity: usize) -> Block<T> {
        let mut upper = Block::with_capacity(capacity);
        upper.slots.extend(self.slots.drain(at..));
        upper
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Box<T>> {
        self.slots.iter()
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Box<T>] {
        &mut self.slots
    }
}

impl<T: Clone> Clone for Block<T> {
    fn clone(&self) -> Self {
        let mut slots = Vec::with_capacity(self.slots.capacity());
        slots.extend(self.slots.iter().cloned());
        Self { slots }
    }

    fn clone_from(&mut self, source: &Self) {
        self.slots.clear();
        self.slots.extend(source.slots.iter().cloned());
    }
}

impl<T: fmt::Debug> fmt::Debug for Block<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.slots.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Block;
    use crate::Error;

    fn block_of(values: impl IntoIterator<Item = i32>) -> Block<i32> {
        let mut block = Block::with_capacity(8);
        for value in values {
            let len = block.len();
            block.insert(len, value).unwrap();
        }
        block
    }

    fn contents(block: &Block<i32>) -> Vec<i32> {
        block.iter().map(|slot| **slot).collect()
    }

    #[test]
    fn block_insert_and_remove() {
        let mut block = block_of([1, 3]);
        block.insert(1, 2).unwrap();
        block.insert(0, 0).unwrap();
        assert_eq!(contents(&block), vec![0, 1, 2, 3]);

        assert_eq!(block.insert(5, 9), Err(Error::IndexOutOfBound));
        assert_eq!(block.remove(4), Err(Error::IndexOutOfBound));
        assert_eq!(block.get(4), Err(Error::IndexOutOfBound));

        assert_eq!(block.remove(2), Ok(2));
        assert_eq!(block.remove(0), Ok(0));
        assert_eq!(contents(&block), vec![1, 3]);
        assert_eq!(block.get(1), Ok(&3));
    }

    #[test]
    fn block_moves_slots_without_copying() {
        let mut lower = block_of(0..6);
        let address = &**lower.iter().nth(4).unwrap() as *const i32;

        let mut upper = lower.split_off(3, 8);
        assert_eq!(contents(&lower), vec![0, 1, 2]);
        assert_eq!(contents(&upper), vec![3, 4, 5]);
        assert_eq!(&**upper.iter().nth(1).unwrap() as *const i32, address);

        let mut front = upper.take_front(2);
        assert_eq!(contents(&front), vec![3, 4]);
        lower.append(&mut front);
        assert!(front.is_empty());
        assert_eq!(contents(&lower), vec![0, 1, 2, 3, 4]);
        assert_eq!(&**lower.iter().nth(4).unwrap() as *const i32, address);

        let back = lower.take_back(2);
        upper.prepend(back);
        assert_eq!(contents(&lower), vec![0, 1, 2]);
        assert_eq!(contents(&upper), vec![3, 4, 5]);
    }

    #[test]
    fn block_deep_clone() {
        let block = block_of(0..4);
        let mut cloned = block.clone();
        *cloned.get_mut(0).unwrap() = 10;
        assert_eq!(contents(&block), vec![0, 1, 2, 3]);
        assert_eq!(contents(&cloned), vec![10, 1, 2, 3]);

        cloned.clone_from(&block_of([7]));
        assert_eq!(contents(&cloned), vec![7]);
    }
}
