use std::sync::atomic::{AtomicU64, Ordering};

use log::trace;

use crate::deque::chain::{BlockKey, Chain};
use crate::deque::cursor::{Cursor, CursorMut, Position};
use crate::deque::iterator::{Iter, IterMut};
use crate::error::{Error, Result};

pub mod cursor;
pub mod iterator;

mod algorithms;
mod block;
mod chain;
mod rebalance;

/// The number of elements a block holds at most, unless another capacity
/// is chosen with the second type parameter of [`Deque`].
pub const DEFAULT_BLOCK_CAPACITY: usize = 512;

/// Identity of a deque, shared by all the cursors over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct DequeId(u64);

impl DequeId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        DequeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// The `Deque` is a double-ended sequence stored as an unrolled linked list:
/// a doubly linked chain of blocks, each holding up to `N` elements.
///
/// Accessing an element by index walks the blocks instead of the elements,
/// and inserting or removing an element shifts the slots of a single block,
/// so all of them take *O*(*n* / `N` + `N`) time.
///
/// Every block between the first and the last one is kept between half full
/// and full: short blocks are merged with their neighbours and full blocks
/// are split before an element is inserted into them.
///
/// # Positions
///
/// In a deque with length *n* there are *n* + 1 locations, indexed by
/// 0, 1, ..., *n*, where *n* is the end of the deque. A location is
/// addressed by:
/// - a [`Position`], a detached handle accepted and returned by
///   [`insert`] and [`erase`];
/// - a [`Cursor`], a borrowed view which can move around, compare and
///   compute distances;
/// - a [`CursorMut`], which edits the deque at its location.
///
/// Every structural change invalidates the positions issued before it,
/// except the one returned by the change itself. Using an outdated
/// position is either detected ([`Error::InvalidCursor`]) or walked to
/// the nearest existing location.
///
/// # Examples
///
/// ```
/// use blocked_deque::{Deque, Error};
///
/// let mut deque: Deque<i32> = Deque::new();
/// deque.push_back(1);
/// deque.push_back(2);
/// deque.push_front(0);
/// assert_eq!(deque.at(1), Ok(&1));
///
/// let second = deque.cursor(1).unwrap().position();
/// let next = deque.erase(second).unwrap();
/// assert_eq!(deque.cursor_at(next).unwrap().current(), Some(&2));
///
/// assert_eq!(deque.pop_back(), Ok(2));
/// assert_eq!(deque.pop_back(), Ok(0));
/// assert_eq!(deque.pop_back(), Err(Error::ContainerIsEmpty));
/// ```
///
/// [`insert`]: Deque::insert
/// [`erase`]: Deque::erase
pub struct Deque<T, const N: usize = DEFAULT_BLOCK_CAPACITY> {
    pub(crate) id: DequeId,
    pub(crate) chain: Chain<T>,
    pub(crate) len: usize,
}

// private methods
impl<T, const N: usize> Deque<T, N> {
    const CAPACITY: usize = {
        assert!(N >= 2, "a block must hold at least 2 elements");
        N
    };

    pub(crate) fn position(&self, key: BlockKey, offset: usize) -> Position {
        Position::new(self.id, key, offset)
    }

    fn check_owner(&self, position: Position) -> Result<()> {
        if position.deque != self.id {
            return Err(Error::InvalidCursor);
        }
        Ok(())
    }

    /// Resolve `position` to a location an element can be inserted at.
    pub(crate) fn resolve_gap(&self, position: Position) -> Result<(BlockKey, usize)> {
        self.check_owner(position)?;
        self.chain.resolve_gap(position.key, position.offset)
    }

    /// Insert `value` at the location `(key, offset)`, which must be
    /// resolved already.
    fn insert_resolved(&mut self, key: BlockKey, offset: usize, value: T) -> Result<Position> {
        // Insert at the end of the previous block instead of the start of
        // this one, so that the block to rebalance is always the same.
        let (key, offset) = match (offset, self.chain.prev(key)) {
            (0, Some(prev)) => (prev, self.chain.len_of(prev)),
            _ => (key, offset),
        };
        self.chain.rebalance(key, 1, Self::CAPACITY);
        let (key, offset) = self.chain.resolve_gap(key, offset)?;
        self.chain.block_mut(key).insert(offset, value)?;
        self.len += 1;
        Ok(self.position(key, offset))
    }

    /// Remove the element at `(key, offset)`, which must be resolved
    /// already, and return the location following it.
    fn remove_resolved(&mut self, key: BlockKey, offset: usize) -> Result<(Position, T)> {
        self.chain.rebalance(key, 0, Self::CAPACITY);
        let (key, offset) = self.chain.resolve_slot(key, offset)?;
        let value = self.chain.block_mut(key).remove(offset)?;
        self.len -= 1;
        let (key, offset) = self.chain.settle(key, offset, Self::CAPACITY);
        let (key, offset) = self.chain.canonical(key, offset);
        Ok((self.position(key, offset), value))
    }
}

impl<T, const N: usize> Deque<T, N> {
    /// Creates an empty `Deque`.
    ///
    /// # Examples
    /// ```
    /// use blocked_deque::Deque;
    /// let deque: Deque<u32> = Deque::new();
    /// assert!(deque.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            id: DequeId::next(),
            chain: Chain::new(Self::CAPACITY),
            len: 0,
        }
    }

    /// Returns the number of elements in the `Deque`.
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the `Deque` is empty.
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of blocks holding the elements.
    ///
    /// An empty deque still has one (empty) block.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::Deque;
    ///
    /// let mut deque: Deque<_, 4> = Deque::new();
    /// deque.extend(0..4);
    /// assert_eq!(deque.block_count(), 1);
    /// deque.push_back(4);
    /// assert_eq!(deque.block_count(), 2);
    /// ```
    #[inline]
    pub fn block_count(&self) -> usize {
        self.chain.block_count()
    }

    /// Provides a reference to the element at `index`.
    ///
    /// Fails with [`Error::IndexOutOfBound`] if `index >= len`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* / `N`) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::{Deque, Error};
    ///
    /// let deque: Deque<_> = (0..10).collect();
    /// assert_eq!(deque.at(3), Ok(&3));
    /// assert_eq!(deque.at(10), Err(Error::IndexOutOfBound));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T> {
        if index >= self.len {
            return Err(Error::IndexOutOfBound);
        }
        let (key, offset) = self.chain.locate(index)?;
        self.chain.block(key).get(offset)
    }

    /// Provides a mutable reference to the element at `index`.
    ///
    /// Fails with [`Error::IndexOutOfBound`] if `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        if index >= self.len {
            return Err(Error::IndexOutOfBound);
        }
        let (key, offset) = self.chain.locate(index)?;
        self.chain.block_mut(key).get_mut(offset)
    }

    /// Like [`Deque::at`], but returns `None` if `index` is out of bound.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.at(index).ok()
    }

    /// Like [`Deque::at_mut`], but returns `None` if `index` is out of bound.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.at_mut(index).ok()
    }

    /// Provides a reference to the front element, or fails with
    /// [`Error::ContainerIsEmpty`].
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::{Deque, Error};
    ///
    /// let mut deque: Deque<i32> = Deque::new();
    /// assert_eq!(deque.front(), Err(Error::ContainerIsEmpty));
    ///
    /// deque.push_front(1);
    /// assert_eq!(deque.front(), Ok(&1));
    /// ```
    pub fn front(&self) -> Result<&T> {
        self.chain
            .block(self.chain.head())
            .first()
            .ok_or(Error::ContainerIsEmpty)
    }

    /// Provides a mutable reference to the front element, or fails with
    /// [`Error::ContainerIsEmpty`].
    pub fn front_mut(&mut self) -> Result<&mut T> {
        let head = self.chain.head();
        self.chain
            .block_mut(head)
            .first_mut()
            .ok_or(Error::ContainerIsEmpty)
    }

    /// Provides a reference to the back element, or fails with
    /// [`Error::ContainerIsEmpty`].
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::{Deque, Error};
    ///
    /// let mut deque: Deque<i32> = Deque::new();
    /// assert_eq!(deque.back(), Err(Error::ContainerIsEmpty));
    ///
    /// deque.push_back(1);
    /// deque.push_back(2);
    /// assert_eq!(deque.back(), Ok(&2));
    /// ```
    pub fn back(&self) -> Result<&T> {
        self.chain
            .block(self.chain.back_block())
            .last()
            .ok_or(Error::ContainerIsEmpty)
    }

    /// Provides a mutable reference to the back element, or fails with
    /// [`Error::ContainerIsEmpty`].
    pub fn back_mut(&mut self) -> Result<&mut T> {
        let back = self.chain.back_block();
        self.chain
            .block_mut(back)
            .last_mut()
            .ok_or(Error::ContainerIsEmpty)
    }

    /// Returns the position of the first element, which is the end position
    /// if the deque is empty.
    pub fn begin(&self) -> Position {
        let (key, offset) = self.chain.canonical(self.chain.head(), 0);
        self.position(key, offset)
    }

    /// Returns the end position, one past the last element.
    pub fn end(&self) -> Position {
        self.position(self.chain.tail(), 0)
    }

    /// Inserts `value` in front of `position`, and returns the position of
    /// the inserted element.
    ///
    /// Fails with [`Error::InvalidCursor`] if `position` belongs to another
    /// deque or to a deleted block, and with [`Error::IndexOutOfBound`] if it
    /// lies past the end of the deque. The deque is left untouched on
    /// failure.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(`N`) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::Deque;
    ///
    /// let mut deque: Deque<_> = [1, 3].into_iter().collect();
    /// let third = deque.cursor(1).unwrap().position();
    ///
    /// let inserted = deque.insert(third, 2).unwrap();
    /// assert_eq!(deque.cursor_at(inserted).unwrap().current(), Some(&2));
    ///
    /// deque.insert(deque.end(), 4).unwrap();
    /// assert_eq!(Vec::from_iter(deque), vec![1, 2, 3, 4]);
    /// ```
    pub fn insert(&mut self, position: Position, value: T) -> Result<Position> {
        let (key, offset) = self.resolve_gap(position)?;
        self.insert_resolved(key, offset, value)
    }

    /// Removes the element at `position`, and returns the position of the
    /// element following it, or the end position if the last element was
    /// removed.
    ///
    /// Fails with [`Error::ContainerIsEmpty`] if the deque is empty, with
    /// [`Error::InvalidCursor`] if `position` is the end position, belongs to
    /// another deque or to a deleted block, and with
    /// [`Error::IndexOutOfBound`] if it lies past the end of the deque. The
    /// deque is left untouched on failure.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(`N`) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::{Deque, Error};
    ///
    /// let mut deque: Deque<_> = [1].into_iter().collect();
    /// assert_eq!(deque.erase(deque.end()).unwrap_err(), Error::InvalidCursor);
    ///
    /// let next = deque.erase(deque.begin()).unwrap();
    /// assert!(deque.cursor_at(next).unwrap().is_end());
    /// assert!(deque.is_empty());
    /// ```
    pub fn erase(&mut self, position: Position) -> Result<Position> {
        self.remove(position).map(|(next, _)| next)
    }

    /// Like [`Deque::erase`], but also returns the removed element.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::Deque;
    ///
    /// let mut deque: Deque<_> = ['a', 'b', 'c'].into_iter().collect();
    /// let (next, removed) = deque.remove(deque.begin()).unwrap();
    /// assert_eq!(removed, 'a');
    /// assert_eq!(deque.cursor_at(next).unwrap().current(), Some(&'b'));
    /// ```
    pub fn remove(&mut self, position: Position) -> Result<(Position, T)> {
        if self.is_empty() {
            return Err(Error::ContainerIsEmpty);
        }
        let (key, offset) = self.resolve_gap(position)?;
        let (key, offset) = self.chain.canonical(key, offset);
        if key == self.chain.tail() {
            return Err(Error::InvalidCursor);
        }
        self.remove_resolved(key, offset)
    }

    /// Appends an element to the back of the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::Deque;
    ///
    /// let mut deque: Deque<_> = Deque::new();
    /// deque.push_back(1);
    /// deque.push_back(3);
    /// assert_eq!(deque.back(), Ok(&3));
    /// ```
    pub fn push_back(&mut self, value: T) {
        let key = self.chain.back_block();
        let offset = self.chain.len_of(key);
        let inserted = self.insert_resolved(key, offset, value);
        debug_assert!(inserted.is_ok(), "the back of a deque is always valid");
    }

    /// Adds an element first in the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::Deque;
    ///
    /// let mut deque: Deque<_> = Deque::new();
    /// deque.push_front(2);
    /// deque.push_front(1);
    /// assert_eq!(deque.front(), Ok(&1));
    /// ```
    pub fn push_front(&mut self, value: T) {
        let inserted = self.insert_resolved(self.chain.head(), 0, value);
        debug_assert!(inserted.is_ok(), "the front of a deque is always valid");
    }

    /// Removes the last element and returns it, or fails with
    /// [`Error::ContainerIsEmpty`].
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::{Deque, Error};
    ///
    /// let mut deque: Deque<_> = Deque::new();
    /// deque.push_back(1);
    /// deque.push_back(3);
    /// assert_eq!(deque.pop_back(), Ok(3));
    /// assert_eq!(deque.pop_back(), Ok(1));
    /// assert_eq!(deque.pop_back(), Err(Error::ContainerIsEmpty));
    /// ```
    pub fn pop_back(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(Error::ContainerIsEmpty);
        }
        let key = self.chain.back_block();
        let offset = self
            .chain
            .len_of(key)
            .checked_sub(1)
            .ok_or(Error::ContainerIsEmpty)?;
        self.remove_resolved(key, offset).map(|(_, value)| value)
    }

    /// Removes the first element and returns it, or fails with
    /// [`Error::ContainerIsEmpty`].
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::{Deque, Error};
    ///
    /// let mut deque: Deque<_> = Deque::new();
    /// deque.push_front(1);
    /// deque.push_front(3);
    /// assert_eq!(deque.pop_front(), Ok(3));
    /// assert_eq!(deque.pop_front(), Ok(1));
    /// assert_eq!(deque.pop_front(), Err(Error::ContainerIsEmpty));
    /// ```
    pub fn pop_front(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(Error::ContainerIsEmpty);
        }
        let (key, offset) = self.chain.locate(0)?;
        self.remove_resolved(key, offset).map(|(_, value)| value)
    }

    /// Removes all elements from the `Deque`.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::{Deque, Error};
    ///
    /// let mut deque: Deque<_, 4> = (0..10).collect();
    /// deque.clear();
    /// assert!(deque.is_empty());
    /// assert_eq!(deque.block_count(), 1);
    /// assert_eq!(deque.front(), Err(Error::ContainerIsEmpty));
    /// ```
    pub fn clear(&mut self) {
        trace!("clear: drop {} blocks", self.chain.block_count());
        self.chain.clear();
        self.len = 0;
    }

    /// Provides a cursor at the element with given index.
    ///
    /// The cursor is at the end position if `index == len`; it fails with
    /// [`Error::IndexOutOfBound`] if `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::Deque;
    ///
    /// let deque: Deque<_> = [1, 2, 3].into_iter().collect();
    /// assert_eq!(deque.cursor(1).unwrap().current(), Some(&2));
    /// assert_eq!(deque.cursor(3).unwrap().current(), None);
    /// assert!(deque.cursor(4).is_err());
    /// ```
    pub fn cursor(&self, index: usize) -> Result<Cursor<'_, T>> {
        let mut cursor = self.cursor_start();
        cursor.seek_forward(index)?;
        Ok(cursor)
    }

    /// Provides a cursor at the first element.
    pub fn cursor_start(&self) -> Cursor<'_, T> {
        let Position { key, offset, .. } = self.begin();
        Cursor::new(&self.chain, self.id, key, offset)
    }

    /// Provides a cursor at the end position.
    pub fn cursor_end(&self) -> Cursor<'_, T> {
        Cursor::new(&self.chain, self.id, self.chain.tail(), 0)
    }

    /// Provides a cursor at `position`.
    ///
    /// Fails with [`Error::InvalidCursor`] if `position` belongs to another
    /// deque or to a deleted block, and with [`Error::IndexOutOfBound`] if it
    /// lies past the end of the deque.
    pub fn cursor_at(&self, position: Position) -> Result<Cursor<'_, T>> {
        let (key, offset) = self.resolve_gap(position)?;
        Ok(Cursor::new(&self.chain, self.id, key, offset))
    }

    /// Provides a cursor with editing operations at the first element.
    pub fn cursor_start_mut(&mut self) -> CursorMut<'_, T, N> {
        let position = self.begin();
        CursorMut::new(self, position)
    }

    /// Provides a cursor with editing operations at the end position.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T, N> {
        let position = self.end();
        CursorMut::new(self, position)
    }

    /// Provides a cursor with editing operations at `position`.
    ///
    /// Fails like [`Deque::cursor_at`].
    pub fn cursor_mut_at(&mut self, position: Position) -> Result<CursorMut<'_, T, N>> {
        let (key, offset) = self.resolve_gap(position)?;
        let position = self.position(key, offset);
        Ok(CursorMut::new(self, position))
    }

    /// Provides a forward iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::Deque;
    ///
    /// let deque: Deque<_> = [0, 1, 2].into_iter().collect();
    /// let mut iter = deque.iter();
    /// assert_eq!(iter.next(), Some(&0));
    /// assert_eq!(iter.next_back(), Some(&2));
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Provides a forward iterator with mutable references.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::Deque;
    ///
    /// let mut deque: Deque<_> = [0, 1, 2].into_iter().collect();
    /// for element in deque.iter_mut() {
    ///     *element += 10;
    /// }
    /// assert_eq!(Vec::from_iter(deque), vec![10, 11, 12]);
    /// ```
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self)
    }
}

impl<T, const N: usize> Default for Deque<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl<T, const N: usize> Deque<T, N> {
    /// Check the whole structure of the deque.
    pub(crate) fn check(&self) {
        assert_eq!(self.chain.check(Self::CAPACITY), self.len, "length mismatch");
    }
}

#[cfg(test)]
mod tests {
    use crate::{Deque, Error};
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    fn contents<T: Clone, const N: usize>(deque: &Deque<T, N>) -> Vec<T> {
        deque.iter().cloned().collect()
    }

    #[test]
    fn deque_create() {
        let mut deque = Deque::<i32>::new();
        assert!(deque.is_empty());
        deque.push_back(1);
        assert!(!deque.is_empty());
        assert_eq!(deque.pop_back(), Ok(1));
        assert!(deque.is_empty());
        deque.check();
    }

    #[test]
    fn deque_drop() {
        #[derive(Debug)]
        struct DropChecker<'a, T: Copy> {
            value: T,
            dropped: &'a RefCell<Vec<T>>,
        }
        impl<'a, T: Copy> DropChecker<'a, T> {
            fn new(value: T, dropped: &'a RefCell<Vec<T>>) -> Self {
                Self { value, dropped }
            }
        }
        impl<'a, T: Copy> Drop for DropChecker<'a, T> {
            fn drop(&mut self) {
                self.dropped.borrow_mut().push(self.value);
            }
        }
        let dropped = RefCell::new(Vec::<i32>::new());
        let mut deque: Deque<_, 4> = Deque::new();
        for value in 0..10 {
            deque.push_back(DropChecker::new(value, &dropped));
        }
        drop(deque.pop_front());
        assert_eq!(dropped.borrow().as_slice(), &[0]);
        drop(deque);
        let mut dropped = dropped.into_inner();
        dropped.sort_unstable();
        assert_eq!(dropped, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn deque_scenario() {
        let mut deque = Deque::<i32>::new();
        deque.push_back(1);
        deque.push_back(2);
        deque.push_front(0);
        assert_eq!(contents(&deque), vec![0, 1, 2]);
        assert_eq!(deque.at(1), Ok(&1));

        let second = deque.cursor_start().offset_by(1).unwrap().position();
        let next = deque.erase(second).unwrap();
        assert_eq!(contents(&deque), vec![0, 2]);
        assert_eq!(deque.cursor_at(next).unwrap().current(), Some(&2));

        assert_eq!(deque.pop_back(), Ok(2));
        assert_eq!(deque.pop_back(), Ok(0));
        assert!(deque.is_empty());
        assert_eq!(deque.pop_back(), Err(Error::ContainerIsEmpty));
        deque.check();
    }

    #[test]
    fn deque_front_and_back() {
        let mut deque: Deque<i32, 4> = Deque::new();
        assert_eq!(deque.front(), Err(Error::ContainerIsEmpty));
        assert_eq!(deque.back(), Err(Error::ContainerIsEmpty));
        assert_eq!(deque.front_mut(), Err(Error::ContainerIsEmpty));
        assert_eq!(deque.back_mut(), Err(Error::ContainerIsEmpty));
        assert_eq!(deque.pop_front(), Err(Error::ContainerIsEmpty));

        deque.extend(0..9);
        assert_eq!(deque.front(), Ok(&0));
        assert_eq!(deque.back(), Ok(&8));
        *deque.front_mut().unwrap() = 10;
        *deque.back_mut().unwrap() = 18;
        assert_eq!(deque.pop_front(), Ok(10));
        assert_eq!(deque.pop_back(), Ok(18));
        assert_eq!(contents(&deque), (1..8).collect::<Vec<_>>());
        deque.check();
    }

    #[test]
    fn deque_at() {
        let mut deque: Deque<_, 4> = (0..20).collect();
        for index in 0..20 {
            assert_eq!(deque.at(index), Ok(&index));
        }
        assert_eq!(deque.at(20), Err(Error::IndexOutOfBound));
        assert_eq!(deque.get(20), None);

        *deque.at_mut(7).unwrap() = 70;
        assert_eq!(deque.get(7), Some(&70));
        assert_eq!(deque.at_mut(20), Err(Error::IndexOutOfBound));
    }

    #[test]
    fn deque_split_and_merge() {
        const CAPACITY: usize = 512;
        let mut deque = Deque::<usize>::new();
        for value in 0..CAPACITY {
            deque.push_back(value);
        }
        assert_eq!(deque.block_count(), 1);
        deque.push_back(CAPACITY);
        assert!(deque.block_count() > 1);
        deque.check();

        while deque.len() >= CAPACITY / 2 {
            let middle = deque.cursor(deque.len() / 2).unwrap().position();
            deque.erase(middle).unwrap();
            deque.check();
        }
        assert_eq!(deque.block_count(), 1);
    }

    #[test]
    fn deque_insert_at_end_is_push_back() {
        let mut pushed: Deque<_, 4> = Deque::new();
        let mut inserted: Deque<_, 4> = Deque::new();
        for value in 0..13 {
            pushed.push_back(value);
            let end = inserted.end();
            let position = inserted.insert(end, value).unwrap();
            assert_eq!(inserted.cursor_at(position).unwrap().current(), Some(&value));
            assert_eq!(pushed.block_count(), inserted.block_count());
        }
        assert_eq!(pushed, inserted);
        inserted.check();
    }

    #[test]
    fn deque_erase_then_insert_restores() {
        let mut deque: Deque<_, 4> = (0..11).collect();
        for index in 0..=11 {
            let before = contents(&deque);
            let position = deque.cursor(index).unwrap().position();
            let inserted = deque.insert(position, 100).unwrap();
            let next = deque.erase(inserted).unwrap();
            assert_eq!(contents(&deque), before);
            assert_eq!(deque.cursor_at(next).unwrap().index(), index);
            assert_eq!(deque.cursor_at(next).unwrap(), deque.cursor(index).unwrap());
            deque.check();
        }
    }

    #[test]
    fn deque_erase_last_returns_end() {
        let mut deque: Deque<_, 4> = (0..9).collect();
        let last = deque.cursor(8).unwrap().position();
        let next = deque.erase(last).unwrap();
        assert_eq!(deque.cursor_at(next).unwrap(), deque.cursor_end());

        let mut deque: Deque<_, 4> = Deque::new();
        deque.push_back(1);
        let next = deque.erase(deque.begin()).unwrap();
        assert_eq!(deque.cursor_at(next).unwrap(), deque.cursor_end());
        assert_eq!(deque.cursor_start(), deque.cursor_end());
    }

    #[test]
    fn deque_invalid_positions() {
        let mut deque: Deque<_, 4> = (0..9).collect();
        let other: Deque<_, 4> = (0..9).collect();

        assert_eq!(deque.insert(other.begin(), 1).err(), Some(Error::InvalidCursor));
        assert_eq!(deque.erase(other.begin()).err(), Some(Error::InvalidCursor));
        assert_eq!(deque.erase(deque.end()).err(), Some(Error::InvalidCursor));
        assert!(deque.cursor_at(other.end()).is_err());

        // a position into a block deleted by a merge
        let last = deque.cursor(8).unwrap().position();
        while deque.len() > 1 {
            deque.pop_back().unwrap();
        }
        assert_eq!(deque.erase(last).err(), Some(Error::InvalidCursor));
        assert_eq!(deque.insert(last, 1).err(), Some(Error::InvalidCursor));
        assert_eq!(contents(&deque), vec![0]);

        // a position past the end of a shrunken block
        let mut deque: Deque<_, 4> = (0..3).collect();
        let end = deque.cursor(3).unwrap().position();
        let past = deque.cursor(2).unwrap().position();
        deque.pop_back().unwrap();
        deque.pop_back().unwrap();
        assert_eq!(deque.erase(past).err(), Some(Error::IndexOutOfBound));
        assert_eq!(deque.len(), 1);
        assert!(deque.cursor_at(end).unwrap().is_end());
        deque.check();
    }

    #[test]
    fn deque_failures_leave_deque_untouched() {
        let mut deque: Deque<_, 4> = (0..10).collect();
        let blocks = deque.block_count();
        let other: Deque<i32, 4> = Deque::new();
        assert!(deque.insert(other.end(), 0).is_err());
        assert!(deque.erase(deque.end()).is_err());
        assert_eq!(deque.len(), 10);
        assert_eq!(deque.block_count(), blocks);
        assert_eq!(contents(&deque), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn deque_clear() {
        let mut deque: Deque<_, 4> = (0..30).collect();
        let stale = deque.begin();
        deque.clear();
        assert!(deque.is_empty());
        assert_eq!(deque.block_count(), 1);
        assert_eq!(deque.begin().offset, 0);
        assert_eq!(deque.cursor_start(), deque.cursor_end());
        deque.check();

        deque.push_back(1);
        assert_eq!(contents(&deque), vec![1]);
        assert!(deque.cursor_at(stale).is_ok());
    }

    #[test]
    fn deque_clone_is_deep() {
        let mut deque: Deque<_, 4> = (0..10).map(|value| vec![value]).collect();
        let cloned = deque.clone();
        deque.at_mut(3).unwrap().push(100);
        assert_eq!(cloned.at(3), Ok(&vec![3]));
        assert_eq!(cloned.len(), 10);
        assert_eq!(cloned.block_count(), deque.block_count());
        cloned.check();

        assert_eq!(cloned.cursor_at(deque.begin()).unwrap_err(), Error::InvalidCursor);

        let mut assigned: Deque<_, 4> = (0..3).map(|value| vec![value]).collect();
        let stale = assigned.begin();
        assigned.clone_from(&cloned);
        assert_eq!(assigned, cloned);
        assert_eq!(assigned.cursor_at(stale).unwrap_err(), Error::InvalidCursor);
        assigned.check();
    }

    #[derive(Debug, Clone)]
    enum Op {
        PushBack(i32),
        PushFront(i32),
        PopBack,
        PopFront,
        Insert(usize, i32),
        Erase(usize),
    }

    impl Arbitrary for Op {
        fn arbitrary(g: &mut Gen) -> Self {
            let value = i32::arbitrary(g);
            let index = usize::arbitrary(g);
            match u8::arbitrary(g) % 6 {
                0 => Op::PushBack(value),
                1 => Op::PushFront(value),
                2 => Op::PopBack,
                3 => Op::PopFront,
                4 => Op::Insert(index, value),
                _ => Op::Erase(index),
            }
        }
    }

    fn simulate<const N: usize>(ops: &[Op]) -> bool {
        let mut expected = VecDeque::new();
        let mut actual: Deque<i32, N> = Deque::new();
        for op in ops {
            match *op {
                Op::PushBack(value) => {
                    expected.push_back(value);
                    actual.push_back(value);
                }
                Op::PushFront(value) => {
                    expected.push_front(value);
                    actual.push_front(value);
                }
                Op::PopBack => {
                    let popped = actual.pop_back();
                    match expected.pop_back() {
                        Some(value) => assert_eq!(popped, Ok(value)),
                        None => assert_eq!(popped, Err(Error::ContainerIsEmpty)),
                    }
                }
                Op::PopFront => {
                    let popped = actual.pop_front();
                    match expected.pop_front() {
                        Some(value) => assert_eq!(popped, Ok(value)),
                        None => assert_eq!(popped, Err(Error::ContainerIsEmpty)),
                    }
                }
                Op::Insert(index, value) => {
                    let index = index % (expected.len() + 1);
                    expected.insert(index, value);
                    let position = actual.cursor(index).unwrap().position();
                    let inserted = actual.insert(position, value).unwrap();
                    assert_eq!(actual.cursor_at(inserted).unwrap().index(), index);
                }
                Op::Erase(index) => {
                    if expected.is_empty() {
                        assert_eq!(actual.erase(actual.begin()).err(), Some(Error::ContainerIsEmpty));
                        continue;
                    }
                    let index = index % expected.len();
                    expected.remove(index);
                    let position = actual.cursor(index).unwrap().position();
                    let next = actual.erase(position).unwrap();
                    assert_eq!(actual.cursor_at(next).unwrap().index(), index);
                }
            }
            actual.check();
            assert_eq!(actual.len(), expected.len());
        }
        (0..expected.len()).all(|index| actual.at(index) == Ok(&expected[index]))
            && actual.iter().eq(expected.iter())
    }

    #[quickcheck]
    fn deque_behaves_like_vec_deque(ops: Vec<Op>) -> bool {
        simulate::<2>(&ops) && simulate::<3>(&ops) && simulate::<4>(&ops) && simulate::<16>(&ops)
    }

    #[quickcheck]
    fn deque_walks_from_begin_to_end(len: u8) -> bool {
        let deque: Deque<_, 4> = (0..len).collect();
        let mut cursor = deque.cursor_start();
        for _ in 0..len {
            if cursor.move_next().is_err() {
                return false;
            }
        }
        cursor == deque.cursor_end() && cursor.move_next() == Err(Error::InvalidCursor)
    }
}
