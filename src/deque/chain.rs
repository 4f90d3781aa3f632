use crate::deque::block::Block;
use crate::error::{Error, Result};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Versioned handle of a block. A key whose block has been deleted
    /// never resolves again, even after its slot is reused.
    pub(crate) struct BlockKey;
}

/// A block together with its links.
#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) block: Block<T>,
    pub(crate) prev: Option<BlockKey>,
    pub(crate) next: Option<BlockKey>,
}

/// The doubly linked chain of blocks of a deque.
///
/// The chain is bounded by two sentinel blocks which live as long as the
/// chain itself:
/// - the head block has no predecessor. It holds the first elements of
///   the deque directly, and it is emptied but never deleted;
/// - the tail block has no successor and never holds any element.
///
/// ```text
///   ╔══════╗     ┌──────┐            ┌──────┐     ╔══════╗
///   ║ head ║ ──→ │block │ ──→ ┄┄ ──→ │block │ ──→ ║ tail ║
///   ║      ║ ←── │      │ ←── ┄┄ ←── │      │ ←── ║ (0)  ║
///   ╚══════╝     └──────┘            └──────┘     ╚══════╝
/// ```
///
/// A position in the chain is a pair `(key, offset)` with
/// `offset <= len(key)`. The pairs `(key, len(key))` and `(key.next, 0)`
/// denote the same location; [`Chain::canonical`] picks the latter.
#[derive(Clone)]
pub(crate) struct Chain<T> {
    nodes: SlotMap<BlockKey, Node<T>>,
    head: BlockKey,
    tail: BlockKey,
}

// Links and storage.
impl<T> Chain<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        let mut nodes = SlotMap::with_key();
        let head = nodes.insert(Node {
            block: Block::with_capacity(capacity),
            prev: None,
            next: None,
        });
        let tail = nodes.insert(Node {
            block: Block::with_capacity(0),
            prev: Some(head),
            next: None,
        });
        nodes[head].next = Some(tail);
        Self { nodes, head, tail }
    }

    #[inline]
    pub(crate) fn head(&self) -> BlockKey {
        self.head
    }

    #[inline]
    pub(crate) fn tail(&self) -> BlockKey {
        self.tail
    }

    #[inline]
    pub(crate) fn contains(&self, key: BlockKey) -> bool {
        self.nodes.contains_key(key)
    }

    #[inline]
    pub(crate) fn next(&self, key: BlockKey) -> Option<BlockKey> {
        self.nodes[key].next
    }

    #[inline]
    pub(crate) fn prev(&self, key: BlockKey) -> Option<BlockKey> {
        self.nodes[key].prev
    }

    /// The successor of `key`, unless it is the tail sentinel.
    pub(crate) fn next_inner(&self, key: BlockKey) -> Option<BlockKey> {
        self.next(key).filter(|&next| next != self.tail)
    }

    /// The last block which may hold elements, i.e. the predecessor of the
    /// tail sentinel.
    pub(crate) fn back_block(&self) -> BlockKey {
        self.prev(self.tail).unwrap_or(self.head)
    }

    #[inline]
    pub(crate) fn len_of(&self, key: BlockKey) -> usize {
        self.nodes[key].block.len()
    }

    #[inline]
    pub(crate) fn block(&self, key: BlockKey) -> &Block<T> {
        &self.nodes[key].block
    }

    #[inline]
    pub(crate) fn block_mut(&mut self, key: BlockKey) -> &mut Block<T> {
        &mut self.nodes[key].block
    }

    /// The number of blocks that may hold elements: the head block and
    /// every block between head and tail.
    pub(crate) fn block_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = (BlockKey, &mut Node<T>)> {
        self.nodes.iter_mut()
    }

    /// Iterate over the keys from the head block to the tail block, both
    /// inclusive.
    pub(crate) fn keys(&self) -> Keys<'_, T> {
        Keys {
            chain: self,
            next: Some(self.head),
        }
    }

    /// Link `block` right after `key` and return its key.
    pub(crate) fn link_after(&mut self, key: BlockKey, block: Block<T>) -> BlockKey {
        debug_assert_ne!(key, self.tail, "Cannot link a block after the tail");
        let next = self.nodes[key].next;
        let new = self.nodes.insert(Node {
            block,
            prev: Some(key),
            next,
        });
        self.nodes[key].next = Some(new);
        if let Some(next) = next {
            self.nodes[next].prev = Some(new);
        }
        #[cfg(debug_assertions)]
        {
            self.assert_adjacent(key, new);
        }
        new
    }

    /// Unlink and delete the block `key`, returning its remaining slots.
    ///
    /// The sentinels are never unlinked.
    pub(crate) fn unlink(&mut self, key: BlockKey) -> Block<T> {
        debug_assert!(
            key != self.head && key != self.tail,
            "Cannot unlink a sentinel block"
        );
        let node = self.nodes.remove(key);
        match node {
            Some(Node { block, prev, next }) => {
                if let Some(prev) = prev {
                    self.nodes[prev].next = next;
                }
                if let Some(next) = next {
                    self.nodes[next].prev = prev;
                }
                #[cfg(debug_assertions)]
                {
                    if let (Some(prev), Some(next)) = (prev, next) {
                        self.assert_adjacent(prev, next);
                    }
                }
                block
            }
            None => Block::with_capacity(0),
        }
    }

    /// Delete every block but the sentinels, and empty the head block.
    pub(crate) fn clear(&mut self) {
        let (head, tail) = (self.head, self.tail);
        self.nodes.retain(|key, _| key == head || key == tail);
        self.nodes[head].block.clear();
        self.nodes[head].next = Some(tail);
        self.nodes[tail].prev = Some(head);
    }

    #[cfg(debug_assertions)]
    fn assert_adjacent(&self, prev: BlockKey, next: BlockKey) {
        assert_eq!(self.nodes[prev].next, Some(next));
        assert_eq!(self.nodes[next].prev, Some(prev));
    }
}

// Positions.
impl<T> Chain<T> {
    /// Rewrite `(key, len(key))` into `(key.next, 0)` as long as there is a
    /// successor, so that equal locations have equal representations.
    pub(crate) fn canonical(&self, mut key: BlockKey, mut offset: usize) -> (BlockKey, usize) {
        while offset >= self.len_of(key) {
            match self.next(key) {
                Some(next) => {
                    key = next;
                    offset = 0;
                }
                None => break,
            }
        }
        (key, offset)
    }

    /// Resolve a location in front of which an element can be inserted,
    /// walking forward while `offset` overflows its block.
    ///
    /// Fails with [`Error::InvalidCursor`] if `key` is not in the chain, and
    /// with [`Error::IndexOutOfBound`] if the walk runs off the end.
    pub(crate) fn resolve_gap(
        &self,
        mut key: BlockKey,
        mut offset: usize,
    ) -> Result<(BlockKey, usize)> {
        if !self.contains(key) {
            return Err(Error::InvalidCursor);
        }
        while offset > self.len_of(key) {
            offset -= self.len_of(key);
            key = self.next(key).ok_or(Error::IndexOutOfBound)?;
        }
        Ok((key, offset))
    }

    /// Resolve the location of an element, walking forward while `offset`
    /// does not fall inside its block.
    ///
    /// Fails with [`Error::InvalidCursor`] if `key` is not in the chain, and
    /// with [`Error::IndexOutOfBound`] if the walk reaches the tail.
    pub(crate) fn resolve_slot(
        &self,
        mut key: BlockKey,
        mut offset: usize,
    ) -> Result<(BlockKey, usize)> {
        if !self.contains(key) {
            return Err(Error::InvalidCursor);
        }
        while offset >= self.len_of(key) {
            if key == self.tail {
                return Err(Error::IndexOutOfBound);
            }
            offset -= self.len_of(key);
            key = self.next(key).ok_or(Error::IndexOutOfBound)?;
        }
        Ok((key, offset))
    }

    /// Move `steps` slots forward. Landing exactly on the tail sentinel is
    /// allowed, passing it is not.
    pub(crate) fn seek_forward(
        &self,
        mut key: BlockKey,
        mut offset: usize,
        mut steps: usize,
    ) -> Result<(BlockKey, usize)> {
        loop {
            let room = self.len_of(key) - offset;
            if steps < room {
                return Ok((key, offset + steps));
            }
            match self.next(key) {
                Some(next) => {
                    steps -= room;
                    key = next;
                    offset = 0;
                }
                None if steps == 0 => return Ok((key, offset)),
                None => return Err(Error::IndexOutOfBound),
            }
        }
    }

    /// Move `steps` slots backward, failing when passing the first slot of
    /// the head block.
    pub(crate) fn seek_backward(
        &self,
        mut key: BlockKey,
        mut offset: usize,
        mut steps: usize,
    ) -> Result<(BlockKey, usize)> {
        while steps > offset {
            steps -= offset;
            key = self.prev(key).ok_or(Error::IndexOutOfBound)?;
            offset = self.len_of(key);
        }
        Ok((key, offset - steps))
    }

    /// The number of slots from `(from, from_offset)` forward to
    /// `(to, to_offset)`, or `None` if `to` does not follow `from`.
    fn walk_distance(
        &self,
        from: BlockKey,
        from_offset: usize,
        to: BlockKey,
        to_offset: usize,
    ) -> Option<usize> {
        let mut distance = self.len_of(from) - from_offset;
        let mut key = self.next(from)?;
        while key != to {
            distance += self.len_of(key);
            key = self.next(key)?;
        }
        Some(distance + to_offset)
    }

    /// The signed distance `lhs - rhs`, searching in both directions since
    /// the relative order of the blocks is unknown.
    pub(crate) fn distance(
        &self,
        (lhs, lhs_offset): (BlockKey, usize),
        (rhs, rhs_offset): (BlockKey, usize),
    ) -> Result<isize> {
        if lhs == rhs {
            return Ok(lhs_offset as isize - rhs_offset as isize);
        }
        if let Some(forward) = self.walk_distance(rhs, rhs_offset, lhs, lhs_offset) {
            return Ok(forward as isize);
        }
        self.walk_distance(lhs, lhs_offset, rhs, rhs_offset)
            .map(|backward| -(backward as isize))
            .ok_or(Error::InvalidCursor)
    }

    /// The absolute index of `(key, offset)` in the deque.
    pub(crate) fn index_of(&self, key: BlockKey, offset: usize) -> usize {
        let mut index = 0;
        for current in self.keys() {
            if current == key {
                break;
            }
            index += self.len_of(current);
        }
        index + offset
    }

    /// Find the element with absolute index `index`.
    pub(crate) fn locate(&self, index: usize) -> Result<(BlockKey, usize)> {
        self.resolve_slot(self.head, index)
    }
}

/// Iterator over the keys of a chain, in order.
pub(crate) struct Keys<'a, T> {
    chain: &'a Chain<T>,
    next: Option<BlockKey>,
}

impl<T> Iterator for Keys<'_, T> {
    type Item = BlockKey;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.chain.next(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::Chain;
    use crate::deque::block::Block;
    use crate::Error;

    /// A chain with blocks `[0, 1, 2] [3, 4] [5]`.
    fn sample() -> Chain<i32> {
        let mut chain = Chain::new(4);
        let head = chain.head();
        for value in 0..3 {
            chain.block_mut(head).insert(value as usize, value).unwrap();
        }
        let mut middle = Block::with_capacity(4);
        middle.insert(0, 3).unwrap();
        middle.insert(1, 4).unwrap();
        let middle = chain.link_after(head, middle);
        let mut last = Block::with_capacity(4);
        last.insert(0, 5).unwrap();
        chain.link_after(middle, last);
        chain
    }

    #[test]
    fn chain_links() {
        let chain = Chain::<i32>::new(4);
        assert_eq!(chain.next(chain.head()), Some(chain.tail()));
        assert_eq!(chain.prev(chain.tail()), Some(chain.head()));
        assert_eq!(chain.prev(chain.head()), None);
        assert_eq!(chain.next(chain.tail()), None);
        assert_eq!(chain.block_count(), 1);

        let chain = sample();
        assert_eq!(chain.block_count(), 3);
        assert_eq!(chain.keys().count(), 4);
        let lens: Vec<_> = chain.keys().map(|key| chain.len_of(key)).collect();
        assert_eq!(lens, vec![3, 2, 1, 0]);
    }

    #[test]
    fn chain_unlink_and_clear() {
        let mut chain = sample();
        let middle = chain.next(chain.head()).unwrap();
        let block = chain.unlink(middle);
        assert_eq!(block.len(), 2);
        assert!(!chain.contains(middle));
        assert_eq!(chain.block_count(), 2);
        assert_eq!(chain.index_of(chain.back_block(), 0), 3);

        chain.clear();
        assert_eq!(chain.block_count(), 1);
        assert!(chain.block(chain.head()).is_empty());
        assert_eq!(chain.next(chain.head()), Some(chain.tail()));
    }

    #[test]
    fn chain_seek() {
        let chain = sample();
        let head = chain.head();
        let middle = chain.next(head).unwrap();

        assert_eq!(chain.seek_forward(head, 0, 3), Ok((middle, 0)));
        assert_eq!(chain.seek_forward(head, 1, 3), Ok((middle, 1)));
        assert_eq!(chain.seek_forward(head, 0, 6), Ok((chain.tail(), 0)));
        assert_eq!(chain.seek_forward(head, 0, 7), Err(Error::IndexOutOfBound));

        assert_eq!(chain.seek_backward(middle, 1, 1), Ok((middle, 0)));
        assert_eq!(chain.seek_backward(middle, 1, 2), Ok((head, 2)));
        assert_eq!(chain.seek_backward(chain.tail(), 0, 6), Ok((head, 0)));
        assert_eq!(
            chain.seek_backward(chain.tail(), 0, 7),
            Err(Error::IndexOutOfBound)
        );
    }

    #[test]
    fn chain_resolve_and_canonical() {
        let chain = sample();
        let head = chain.head();
        let middle = chain.next(head).unwrap();
        let last = chain.back_block();

        assert_eq!(chain.canonical(head, 3), (middle, 0));
        assert_eq!(chain.canonical(last, 1), (chain.tail(), 0));
        assert_eq!(chain.canonical(head, 1), (head, 1));

        assert_eq!(chain.resolve_gap(head, 3), Ok((head, 3)));
        assert_eq!(chain.resolve_gap(head, 4), Ok((middle, 1)));
        assert_eq!(chain.resolve_gap(head, 6), Ok((last, 1)));
        assert_eq!(chain.resolve_gap(head, 7), Err(Error::IndexOutOfBound));

        assert_eq!(chain.resolve_slot(head, 3), Ok((middle, 0)));
        assert_eq!(chain.resolve_slot(head, 5), Ok((last, 0)));
        assert_eq!(chain.resolve_slot(head, 6), Err(Error::IndexOutOfBound));
        assert_eq!(chain.locate(4), Ok((middle, 1)));
    }

    #[test]
    fn chain_distance() {
        let chain = sample();
        let head = chain.head();
        let middle = chain.next(head).unwrap();

        assert_eq!(chain.distance((middle, 1), (head, 1)), Ok(3));
        assert_eq!(chain.distance((head, 1), (middle, 1)), Ok(-3));
        assert_eq!(chain.distance((chain.tail(), 0), (head, 0)), Ok(6));
        assert_eq!(chain.distance((head, 2), (head, 0)), Ok(2));
        assert_eq!(chain.index_of(middle, 1), 4);
    }
}
