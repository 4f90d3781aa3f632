use crate::deque::{Deque, DequeId};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};

impl<T: PartialEq, const N: usize> PartialEq for Deque<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other)
    }
}

impl<T: Eq, const N: usize> Eq for Deque<T, N> {}

impl<T: PartialOrd, const N: usize> PartialOrd for Deque<T, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other)
    }
}

impl<T: Ord, const N: usize> Ord for Deque<T, N> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other)
    }
}

/// Deep copy of every block, in order.
///
/// The copy is a new deque: positions of the source are rejected by it
/// with [`Error::InvalidCursor`](crate::Error::InvalidCursor).
impl<T: Clone, const N: usize> Clone for Deque<T, N> {
    fn clone(&self) -> Self {
        Self {
            id: DequeId::next(),
            chain: self.chain.clone(),
            len: self.len,
        }
    }

    fn clone_from(&mut self, other: &Self) {
        self.id = DequeId::next();
        self.chain.clone_from(&other.chain);
        self.len = other.len;
    }
}

impl<T: Hash, const N: usize> Hash for Deque<T, N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for elt in self {
            elt.hash(state);
        }
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for Deque<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

impl<T, const N: usize> Index<usize> for Deque<T, N> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index` is out of bound.
    fn index(&self, index: usize) -> &Self::Output {
        match self.at(index) {
            Ok(elt) => elt,
            Err(_) => panic!(
                "index out of bound: the len is {} but the index is {}",
                self.len, index
            ),
        }
    }
}

impl<T, const N: usize> IndexMut<usize> for Deque<T, N> {
    /// # Panics
    ///
    /// Panics if `index` is out of bound.
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let len = self.len;
        match self.at_mut(index) {
            Ok(elt) => elt,
            Err(_) => panic!(
                "index out of bound: the len is {} but the index is {}",
                len, index
            ),
        }
    }
}

impl<T, const N: usize> Deque<T, N> {
    /// Returns `true` if the `Deque` contains an element equal to the given value.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocked_deque::Deque;
    ///
    /// let mut deque: Deque<_> = Deque::new();
    ///
    /// deque.push_back(0);
    /// deque.push_back(1);
    /// deque.push_back(2);
    ///
    /// assert_eq!(deque.contains(&0), true);
    /// assert_eq!(deque.contains(&10), false);
    /// ```
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq<T>,
    {
        self.iter().any(|elt| elt == x)
    }
}
