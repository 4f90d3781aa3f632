use crate::deque::chain::{BlockKey, Chain};
use crate::deque::{Deque, DequeId};
use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;

/// A detached handle of a location in a [`Deque`].
///
/// A `Position` does not borrow the deque, so it survives mutation and is
/// checked again when it is used: a position of another deque or of a
/// deleted block fails with [`Error::InvalidCursor`], and an offset past
/// the end of a shrunken block is walked forward to the next blocks.
///
/// Use [`Deque::cursor_at`] to inspect the location a position denotes.
#[derive(Debug, Clone, Copy)]
pub struct Position {
    pub(crate) deque: DequeId,
    pub(crate) key: BlockKey,
    pub(crate) offset: usize,
}

impl Position {
    pub(crate) fn new(deque: DequeId, key: BlockKey, offset: usize) -> Self {
        Self { deque, key, offset }
    }
}

/// A cursor over a `Deque`.
///
/// A `Cursor` is like an iterator, except that it can freely seek
/// back-and-forth, and it can be copied around.
///
/// In a deque with length *n*, there are *n* + 1 valid locations for the
/// cursor, indexed by 0, 1, ..., *n*, where *n* is the end of the deque.
///
/// # Examples
///
/// Here is a simple example showing how the cursors work. (The end of the
/// deque is denoted by `#`).
/// ```
/// use blocked_deque::Deque;
///
/// // Create a deque: [ A B C D #]
/// let deque: Deque<_> = ['A', 'B', 'C', 'D'].into_iter().collect();
///
/// // Create a cursor at start: [|A B C D #] (index = 0)
/// let mut cursor = deque.cursor_start();
/// assert_eq!(cursor.current(), Some(&'A'));
///
/// // Move cursor forward: [ A|B C D #] (index = 1)
/// assert!(cursor.move_next().is_ok());
/// assert_eq!(cursor.current(), Some(&'B'));
///
/// // Create a cursor in the end: [ A B C D|#] (index = 4)
/// let mut cursor = deque.cursor_end();
/// assert_eq!(cursor.current(), None);
/// assert!(cursor.move_next().is_err());
///
/// // Move cursor backward: [ A B C|D #] (index = 3)
/// assert!(cursor.move_prev().is_ok());
/// assert_eq!(cursor.current(), Some(&'D'));
///
/// // Jump around: [ A|B C D #] (index = 1)
/// let cursor = cursor.offset_by(-2).unwrap();
/// assert_eq!(cursor.current(), Some(&'B'));
/// assert_eq!(cursor.distance(&deque.cursor_end()), Ok(-3));
/// ```
pub struct Cursor<'a, T: 'a> {
    chain: &'a Chain<T>,
    deque: DequeId,
    key: BlockKey,
    offset: usize,
}

/// A cursor over a `Deque` with editing operations.
///
/// A `CursorMut` is like a [`Cursor`], except that it can mutate the
/// deque at its location. The lifetime of its yielded references is tied
/// to its own lifetime, instead of just the underlying deque.
///
/// For convenience, [`CursorMut::view`] temporarily borrows the deque
/// immutably.
///
/// # Examples
///
/// ```compile_fail
/// use blocked_deque::Deque;
///
/// let mut deque: Deque<_> = [1, 2, 3].into_iter().collect();
/// let mut cursor = deque.cursor_start_mut();
/// println!("{:?}", deque.back());
/// println!("{:?}", cursor.current());
/// ```
pub struct CursorMut<'a, T: 'a, const N: usize> {
    deque: &'a mut Deque<T, N>,
    key: BlockKey,
    offset: usize,
}

macro_rules! impl_cursor {
    ([$($generics:tt)*] $CURSOR:ty) => {
        // Private methods
        impl<$($generics)*> $CURSOR {
            fn canonical(&self) -> (BlockKey, usize) {
                self.chain().canonical(self.key, self.offset)
            }
        }

        impl<$($generics)*> $CURSOR {
            /// Returns a detached handle of the cursor location, which can be
            /// passed to [`Deque::insert`] or [`Deque::erase`].
            pub fn position(&self) -> Position {
                Position::new(self.id(), self.key, self.offset)
            }

            /// Returns the index of the cursor location, walking the blocks
            /// before it.
            pub fn index(&self) -> usize {
                self.chain().index_of(self.key, self.offset)
            }

            /// Returns `true` if the cursor is at the end of the deque.
            pub fn is_end(&self) -> bool {
                self.canonical().0 == self.chain().tail()
            }

            /// Move the cursor to the next element.
            ///
            /// Fails with [`Error::InvalidCursor`] if the cursor is at the
            /// end of the deque, leaving the cursor unchanged.
            pub fn move_next(&mut self) -> Result<()> {
                self.seek_forward(1).map_err(|_| Error::InvalidCursor)
            }

            /// Move the cursor to the previous element.
            ///
            /// Fails with [`Error::InvalidCursor`] if the cursor is at the
            /// first element, leaving the cursor unchanged.
            pub fn move_prev(&mut self) -> Result<()> {
                self.seek_backward(1).map_err(|_| Error::InvalidCursor)
            }

            /// Move the cursor forward by `steps` elements. Reaching the end
            /// of the deque is allowed, passing it is not.
            ///
            /// Fails with [`Error::IndexOutOfBound`], leaving the cursor
            /// unchanged.
            ///
            /// # Complexity
            ///
            /// This operation should compute in *O*(`steps` / `N`) time.
            pub fn seek_forward(&mut self, steps: usize) -> Result<()> {
                let (key, offset) = self.chain().seek_forward(self.key, self.offset, steps)?;
                self.key = key;
                self.offset = offset;
                Ok(())
            }

            /// Move the cursor backward by `steps` elements.
            ///
            /// Fails with [`Error::IndexOutOfBound`] when passing the first
            /// element, leaving the cursor unchanged.
            ///
            /// # Complexity
            ///
            /// This operation should compute in *O*(`steps` / `N`) time.
            pub fn seek_backward(&mut self, steps: usize) -> Result<()> {
                let (key, offset) = self.chain().seek_backward(self.key, self.offset, steps)?;
                self.key = key;
                self.offset = offset;
                Ok(())
            }
        }
    };
}

impl_cursor!(['a, T: 'a] Cursor<'a, T>);
impl_cursor!(['a, T: 'a, const N: usize] CursorMut<'a, T, N>);

impl<'a, T: 'a> Cursor<'a, T> {
    pub(crate) fn new(chain: &'a Chain<T>, deque: DequeId, key: BlockKey, offset: usize) -> Self {
        Self {
            chain,
            deque,
            key,
            offset,
        }
    }

    fn chain(&self) -> &Chain<T> {
        self.chain
    }

    fn id(&self) -> DequeId {
        self.deque
    }

    fn same_deque_with(&self, other: &Self) -> bool {
        self.deque == other.deque
    }

    /// Provides a reference to the element at the cursor, or `None` at the
    /// end of the deque.
    pub fn current(&self) -> Option<&'a T> {
        let chain = self.chain;
        let (key, offset) = chain.canonical(self.key, self.offset);
        chain.block(key).get(offset).ok()
    }

    /// Returns a cursor moved by `n` elements, forward if `n` is positive
    /// and backward if it is negative.
    ///
    /// Fails with [`Error::IndexOutOfBound`] if the new location lies
    /// outside the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::{Deque, Error};
    ///
    /// let deque: Deque<_, 4> = (0..10).collect();
    /// let cursor = deque.cursor_start().offset_by(7).unwrap();
    /// assert_eq!(cursor.current(), Some(&7));
    /// assert_eq!(cursor.offset_by(-3).unwrap().current(), Some(&4));
    /// assert_eq!(cursor.offset_by(4).unwrap_err(), Error::IndexOutOfBound);
    /// assert_eq!(cursor.offset_by(-8).unwrap_err(), Error::IndexOutOfBound);
    /// ```
    pub fn offset_by(mut self, n: isize) -> Result<Self> {
        if n >= 0 {
            self.seek_forward(n.unsigned_abs())?;
        } else {
            self.seek_backward(n.unsigned_abs())?;
        }
        Ok(self)
    }

    /// Returns the signed number of elements from `other` to `self`.
    ///
    /// Fails with [`Error::InvalidCursor`] if the cursors belong to
    /// different deques.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::{Deque, Error};
    ///
    /// let deque: Deque<_, 4> = (0..10).collect();
    /// let start = deque.cursor_start();
    /// let end = deque.cursor_end();
    /// assert_eq!(end.distance(&start), Ok(10));
    /// assert_eq!(start.distance(&end), Ok(-10));
    ///
    /// let another = deque.clone();
    /// assert_eq!(start.distance(&another.cursor_start()), Err(Error::InvalidCursor));
    /// ```
    pub fn distance(&self, other: &Self) -> Result<isize> {
        if !self.same_deque_with(other) {
            return Err(Error::InvalidCursor);
        }
        self.chain
            .distance((self.key, self.offset), (other.key, other.offset))
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

/// Compare cursors by their locations.
///
/// Only cursors of the same deque denoting the same location are equal,
/// even if one of them points past the end of a block and the other one
/// at the start of the next block.
///
/// # Examples
/// ```
/// use blocked_deque::Deque;
///
/// let deque: Deque<_> = [1, 2, 3].into_iter().collect();
/// let cursor1 = deque.cursor_start();
/// let mut cursor2 = cursor1;
/// // The same deque, and the same location.
/// assert_eq!(cursor1, cursor2);
///
/// cursor2.move_next().unwrap();
/// // The same deque, but different locations.
/// assert_ne!(cursor1, cursor2);
///
/// let another = deque.clone();
/// // Different deques.
/// assert_ne!(cursor1, another.cursor_start());
/// ```
impl<'a, T: 'a> PartialEq for Cursor<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        if !self.same_deque_with(other) {
            return false;
        }
        let (key, offset) = self.canonical();
        let (other_key, other_offset) = other.canonical();
        key == other_key && (offset == other_offset || key == self.chain.tail())
    }
}

impl<'a, T: 'a> Eq for Cursor<'a, T> {}

/// Compare cursors by their indices.
///
/// Only cursors of the same deque can compare, so it is `PartialOrd` but
/// not `Ord`.
///
/// # Examples
/// ```
/// use blocked_deque::Deque;
///
/// let deque: Deque<_> = [1, 2, 3].into_iter().collect();
/// let cursor1 = deque.cursor_start();
/// let cursor2 = deque.cursor_end();
/// assert!(cursor1 < cursor2);
///
/// let another = deque.clone();
/// assert_eq!(cursor1.partial_cmp(&another.cursor_end()), None);
/// ```
impl<'a, T: 'a> PartialOrd for Cursor<'a, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !self.same_deque_with(other) {
            return None;
        }
        Some(self.index().cmp(&other.index()))
    }
}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("index", &self.index())
            .field("current", &self.current())
            .finish()
    }
}

impl<'a, T: 'a, const N: usize> CursorMut<'a, T, N> {
    pub(crate) fn new(deque: &'a mut Deque<T, N>, position: Position) -> Self {
        Self {
            deque,
            key: position.key,
            offset: position.offset,
        }
    }

    fn chain(&self) -> &Chain<T> {
        &self.deque.chain
    }

    fn id(&self) -> DequeId {
        self.deque.id
    }

    fn move_to(&mut self, position: Position) {
        self.key = position.key;
        self.offset = position.offset;
    }

    /// Provides a read-only cursor at the same location, borrowing this
    /// cursor.
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor::new(&self.deque.chain, self.deque.id, self.key, self.offset)
    }

    /// Temporarily borrows the deque immutably.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::Deque;
    ///
    /// let mut deque: Deque<_> = [1, 2, 3].into_iter().collect();
    /// let mut cursor = deque.cursor_start_mut();
    /// assert_eq!(cursor.view().back(), Ok(&3));
    /// *cursor.current_mut().unwrap() = 0;
    /// assert_eq!(cursor.view().front(), Ok(&0));
    /// ```
    pub fn view(&self) -> &Deque<T, N> {
        self.deque
    }

    /// Provides a reference to the element at the cursor, or `None` at the
    /// end of the deque.
    pub fn current(&self) -> Option<&T> {
        let (key, offset) = self.canonical();
        self.chain().block(key).get(offset).ok()
    }

    /// Provides a mutable reference to the element at the cursor, or `None`
    /// at the end of the deque.
    pub fn current_mut(&mut self) -> Option<&mut T> {
        let (key, offset) = self.canonical();
        self.deque.chain.block_mut(key).get_mut(offset).ok()
    }

    /// Inserts `value` in front of the cursor, and moves the cursor to the
    /// inserted element.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::Deque;
    ///
    /// let mut deque: Deque<_, 4> = [1, 3].into_iter().collect();
    /// let mut cursor = deque.cursor_end_mut();
    /// cursor.insert(4).unwrap();
    /// cursor.move_prev().unwrap();
    /// cursor.insert(2).unwrap();
    /// assert_eq!(cursor.current(), Some(&2));
    /// cursor.seek_backward(1).unwrap();
    /// cursor.insert(0).unwrap();
    /// assert_eq!(cursor.index(), 0);
    /// assert_eq!(Vec::from_iter(deque), vec![0, 1, 2, 3, 4]);
    /// ```
    pub fn insert(&mut self, value: T) -> Result<()> {
        let position = self.deque.insert(self.position(), value)?;
        self.move_to(position);
        Ok(())
    }

    /// Removes the element at the cursor and returns it, moving the cursor
    /// to the following element.
    ///
    /// Fails with [`Error::ContainerIsEmpty`] if the deque is empty, and
    /// with [`Error::InvalidCursor`] at the end of the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::{Deque, Error};
    ///
    /// let mut deque: Deque<_, 4> = (0..6).collect();
    /// let mut cursor = deque.cursor_start_mut();
    /// cursor.seek_forward(4).unwrap();
    /// assert_eq!(cursor.remove(), Ok(4));
    /// assert_eq!(cursor.remove(), Ok(5));
    /// assert_eq!(cursor.remove(), Err(Error::InvalidCursor));
    /// assert_eq!(Vec::from_iter(deque), vec![0, 1, 2, 3]);
    /// ```
    pub fn remove(&mut self) -> Result<T> {
        let (position, value) = self.deque.remove(self.position())?;
        self.move_to(position);
        Ok(value)
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for CursorMut<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("index", &self.index())
            .field("current", &self.current())
            .finish()
    }
}
