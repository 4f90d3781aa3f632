use crate::deque::chain::{BlockKey, Chain};
use crate::deque::Deque;
use slotmap::SecondaryMap;
use std::fmt;
use std::iter::FusedIterator;
use std::slice;

/// An iterator over the elements of a `Deque`.
///
/// It walks the blocks from both ends, reading each block as a slice, and
/// stops once it has yielded `len` elements.
///
/// # Examples
///
/// ```compile_fail
/// use blocked_deque::Deque;
///
/// let mut deque: Deque<_> = [1, 2, 3].into_iter().collect();
/// let mut iter = deque.iter();
///
/// // Won't compile, because deque is already borrowed immutably.
/// deque.push_back(4);
/// println!("{:?}", iter.next());
/// ```
pub struct Iter<'a, T: 'a> {
    chain: &'a Chain<T>,
    front: slice::Iter<'a, Box<T>>,
    back: slice::Iter<'a, Box<T>>,
    next_front: Option<BlockKey>,
    next_back: Option<BlockKey>,
    len: usize,
}

impl<'a, T: 'a> Iter<'a, T> {
    pub(crate) fn new<const N: usize>(deque: &'a Deque<T, N>) -> Self {
        let chain = &deque.chain;
        Self {
            chain,
            front: Default::default(),
            back: Default::default(),
            next_front: Some(chain.head()),
            next_back: Some(chain.back_block()),
            len: deque.len(),
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain,
            front: self.front.clone(),
            back: self.back.clone(),
            next_front: self.next_front,
            next_back: self.next_back,
            len: self.len,
        }
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.len).finish()
    }
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        loop {
            if let Some(slot) = self.front.next() {
                self.len -= 1;
                return Some(&**slot);
            }
            let key = self.next_front?;
            self.front = self.chain.block(key).iter();
            self.next_front = self.chain.next(key);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a, T: 'a> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        loop {
            if let Some(slot) = self.back.next_back() {
                self.len -= 1;
                return Some(&**slot);
            }
            let key = self.next_back?;
            self.back = self.chain.block(key).iter();
            self.next_back = self.chain.prev(key);
        }
    }
}

impl<'a, T: 'a> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T: 'a> FusedIterator for Iter<'a, T> {}

/// A mutable iterator over the elements of a `Deque`.
///
/// The blocks are collected in order when the iterator is created, so that
/// each of them is borrowed mutably exactly once.
///
/// # Examples
///
/// ```compile_fail
/// use blocked_deque::Deque;
///
/// let mut deque: Deque<_> = [1, 2, 3].into_iter().collect();
/// let mut iter = deque.iter_mut();
///
/// // Won't compile, because deque is already borrowed mutably.
/// println!("{:?}", deque.front());
/// println!("{:?}", iter.next());
/// ```
pub struct IterMut<'a, T: 'a> {
    blocks: std::vec::IntoIter<&'a mut [Box<T>]>,
    front: slice::IterMut<'a, Box<T>>,
    back: slice::IterMut<'a, Box<T>>,
    len: usize,
}

impl<'a, T: 'a> IterMut<'a, T> {
    pub(crate) fn new<const N: usize>(deque: &'a mut Deque<T, N>) -> Self {
        let len = deque.len();
        let chain = &mut deque.chain;
        let ranks: SecondaryMap<BlockKey, usize> = chain
            .keys()
            .enumerate()
            .map(|(rank, key)| (key, rank))
            .collect();
        let mut ordered: Vec<Option<&'a mut [Box<T>]>> = (0..ranks.len()).map(|_| None).collect();
        for (key, node) in chain.nodes_mut() {
            if let Some(&rank) = ranks.get(key) {
                ordered[rank] = Some(node.block.as_mut_slice());
            }
        }
        let blocks: Vec<_> = ordered.into_iter().flatten().collect();
        Self {
            blocks: blocks.into_iter(),
            front: Default::default(),
            back: Default::default(),
            len,
        }
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for IterMut<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IterMut").field(&self.len).finish()
    }
}

impl<'a, T: 'a> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        loop {
            if let Some(slot) = self.front.next() {
                self.len -= 1;
                return Some(&mut **slot);
            }
            match self.blocks.next() {
                Some(block) => self.front = block.iter_mut(),
                // the rest lies in the block taken from the back
                None => {
                    let slot = self.back.next()?;
                    self.len -= 1;
                    return Some(&mut **slot);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a, T: 'a> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        loop {
            if let Some(slot) = self.back.next_back() {
                self.len -= 1;
                return Some(&mut **slot);
            }
            match self.blocks.next_back() {
                Some(block) => self.back = block.iter_mut(),
                None => {
                    let slot = self.front.next_back()?;
                    self.len -= 1;
                    return Some(&mut **slot);
                }
            }
        }
    }
}

impl<'a, T: 'a> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T: 'a> FusedIterator for IterMut<'a, T> {}

/// An owning iterator over the elements of a `Deque`.
///
/// This `struct` is created by the [`into_iter`] method on [`Deque`]
/// (provided by the `IntoIterator` trait). See its documentation for more.
///
/// [`into_iter`]: Deque::into_iter
pub struct IntoIter<T, const N: usize> {
    deque: Deque<T, N>,
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for IntoIter<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("deque", &self.deque)
            .finish()
    }
}

impl<T, const N: usize> Iterator for IntoIter<T, N> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.deque.pop_front().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.deque.len();
        (len, Some(len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<T, const N: usize> DoubleEndedIterator for IntoIter<T, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.deque.pop_back().ok()
    }
}

impl<T, const N: usize> ExactSizeIterator for IntoIter<T, N> {}

impl<T, const N: usize> FusedIterator for IntoIter<T, N> {}

impl<T, const N: usize> IntoIterator for Deque<T, N> {
    type Item = T;
    type IntoIter = IntoIter<T, N>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { deque: self }
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a Deque<T, N> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a mut Deque<T, N> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, const N: usize> FromIterator<T> for Deque<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut deque = Deque::new();
        deque.extend(iter);
        deque
    }
}

impl<T, const N: usize> Extend<T> for Deque<T, N> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|item| self.push_back(item));
    }
}

impl<'a, T: 'a + Copy, const N: usize> Extend<&'a T> for Deque<T, N> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use crate::Deque;
    use std::fmt::Debug;

    #[test]
    fn test_iter() {
        macro_rules! test_iter {
            ($FN:ident, $ITER:ident $(, $REV:ident)?) => {
                fn $FN<T, I>(input: I, mid: usize)
                where
                    T: Eq + Debug + Clone,
                    I: IntoIterator<Item = T>,
                {
                    #[allow(unused_mut)]
                    let mut vec = Vec::from_iter(input);
                    #[allow(unused_mut)]
                    let mut deque: Deque<_, 4> = Deque::from_iter(vec.clone());
                    let len = vec.len();
                    let mut iter = deque.$ITER() $( .$REV() )?;
                    for (i, item) in vec.$ITER() $( .$REV() )?.enumerate() {
                        assert_eq!(iter.next(), Some(item));
                        assert_eq!(iter.len(), len - i - 1);
                    }
                    assert_eq!(iter.next(), None);
                    assert_eq!(iter.next(), None);
                    assert_eq!(iter.next_back(), None);
                    assert_eq!(iter.len(), 0);

                    let mut iter = deque.$ITER() $( .$REV() )?;
                    for (i, item) in vec.$ITER() $( .$REV() )? .take(mid).enumerate() {
                        assert_eq!(iter.next(), Some(item));
                        assert_eq!(iter.len(), len - i - 1);
                    }
                    let mut iter = iter.rev();
                    for (i, item) in vec.$ITER() $( .$REV() )? .skip(mid).rev().enumerate() {
                        assert_eq!(iter.next(), Some(item));
                        assert_eq!(iter.len(), len - mid - i - 1);
                    }
                    assert_eq!(iter.next(), None);
                    assert_eq!(iter.next(), None);
                    assert_eq!(iter.next_back(), None);
                    assert_eq!(iter.len(), 0);
                }
            };
        }
        test_iter!(test_iter, iter);
        test_iter!(test_iter_mut, iter_mut);
        test_iter!(test_back_iter, iter, rev);
        test_iter!(test_back_iter_mut, iter_mut, rev);

        fn test_case<T, I>(input: I, mid: usize)
        where
            T: Eq + Debug + Clone,
            I: IntoIterator<Item = T> + Clone,
        {
            test_iter(input.clone(), mid);
            test_iter_mut(input.clone(), mid);
            test_back_iter(input.clone(), mid);
            test_back_iter_mut(input.clone(), mid);
        }
        test_case(0..30, 30);
        test_case(0..30, 17);
        test_case(0..30, 4);
        test_case(0..10, 10);
        test_case(0..10, 8);
        test_case(0..10, 5);
        test_case(0..10, 2);
        test_case(0..10, 0);
        test_case(0..2, 2);
        test_case(0..2, 1);
        test_case(0..2, 0);
        test_case(0..1, 1);
        test_case(0..1, 0);
        test_case(0..0, 0);
    }

    #[test]
    fn test_into_iter() {
        let deque: Deque<_, 4> = (0..25).collect();
        let mut iter = deque.into_iter();
        assert_eq!(iter.len(), 25);
        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.next_back(), Some(24));
        assert_eq!(iter.len(), 23);
        assert_eq!(iter.collect::<Vec<_>>(), (1..24).collect::<Vec<_>>());
    }

    #[test]
    fn test_iter_after_edits() {
        let mut deque: Deque<_, 4> = (0..40).collect();
        for _ in 0..10 {
            let middle = deque.cursor(deque.len() / 3).unwrap().position();
            deque.erase(middle).unwrap();
        }
        deque.push_front(-1);
        let expected: Vec<_> = deque.iter().copied().collect();
        assert_eq!(expected.len(), deque.len());
        assert_eq!(
            deque.iter().rev().copied().collect::<Vec<_>>(),
            expected.iter().rev().copied().collect::<Vec<_>>()
        );
        for (index, value) in expected.iter().enumerate() {
            assert_eq!(deque.at(index), Ok(value));
        }
        for value in &mut deque {
            *value += 1;
        }
        assert!(deque.iter().zip(&expected).all(|(lhs, rhs)| *lhs == rhs + 1));
    }

    #[test]
    fn test_extend() {
        let mut deque: Deque<i32, 4> = Deque::new();
        deque.extend(&[1, 2, 3]);
        deque.extend(vec![4, 5]);
        assert_eq!(Vec::from_iter(&deque), vec![&1, &2, &3, &4, &5]);
        assert_eq!(format!("{:?}", deque.iter()), "Iter(5)");
    }
}
