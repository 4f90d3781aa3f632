//! This crate provides a double-ended sequence, implemented as an unrolled
//! linked list of fixed-capacity blocks.
//!
//! The [`Deque`] allows pushing and popping at both ends, and inserting or
//! removing elements at any given position, by shifting the slots of a single
//! block. Accessing an element by index walks the blocks instead of the
//! elements, so it takes *O*(*n* / `N`) time, where `N` is the block capacity.
//!
//! Here is a quick example showing how the deque works.
//!
//! ```
//! use blocked_deque::Deque;
//!
//! let mut deque: Deque<_> = (1..=4).collect();
//!
//! let mut cursor = deque.cursor_start_mut();
//!
//! cursor.insert(0).unwrap(); // insert 0 at the beginning of the deque
//! assert_eq!(cursor.current(), Some(&0));
//!
//! cursor.seek_forward(3).unwrap(); // move the cursor to index 3, and remove it
//! assert_eq!(cursor.remove(), Ok(3));
//! assert_eq!(cursor.current(), Some(&4));
//!
//! assert_eq!(Vec::from_iter(deque), vec![0, 1, 2, 4]);
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the deque is like the following graph:
//! ```text
//!  ╔═══════════╗     ╔═══════════╗     ┌───────────┐            ┌───────────┐     ╔═══════════╗
//!  ║  (chain)  ║ ──→ ║   next    ║ ──→ │   next    │ ──→ ┄┄ ──→ │   next    │ ──→ ║   next    ║
//!  ╟───────────╢     ╟───────────╢     ├───────────┤            ├───────────┤     ╟───────────╢
//!  ║   (len)   ║     ║   prev    ║ ←── │   prev    │ ←── ┄┄ ←── │   prev    │ ←── ║   prev    ║
//!  ╚═══════════╝     ╟───────────╢     ├───────────┤            ├───────────┤     ╟───────────╢
//!      Deque         ║ [Box<T>]  ║     │ [Box<T>]  │            │ [Box<T>]  │     ┊ no slots  ┊
//!                    ╚═══════════╝     └───────────┘            └───────────┘     ╚═══════════╝
//!                     Head block            Blocks 1, 2, ...                       Tail block
//! ```
//! The `Deque` contains:
//! - the chain of blocks, stored in an arena and linked by versioned keys;
//! - a length field `len`, the total number of elements.
//!
//! Each block holds up to `N` slots, and each slot is a separately boxed
//! element, so merging and splitting blocks moves boxes and never moves the
//! elements themselves.
//!
//! The chain is bounded by two sentinel blocks:
//! - the head block holds the first elements, and is never deleted;
//! - the tail block holds nothing, and marks the end of the deque.
//!
//! Every block between them holds from `N / 2` up to `N` elements. Short
//! blocks are merged with their neighbours and full blocks are split, around
//! the block an operation touches only.
//!
//! The capacity `N` is chosen with a const generic parameter, which defaults
//! to [`DEFAULT_BLOCK_CAPACITY`]:
//! ```
//! use blocked_deque::Deque;
//!
//! let small: Deque<u8, 16> = (0..100).collect();
//! assert!(small.block_count() > 1);
//!
//! let large: Deque<u8> = (0..100).collect();
//! assert_eq!(large.block_count(), 1);
//! ```
//!
//! # Positions and Cursors
//!
//! In a deque with length *n*, there are *n* + 1 valid locations, indexed by
//! 0, 1, ..., *n*, where *n* is the end of the deque.
//!
//! A [`Position`] is a detached handle of a location. It is accepted and
//! returned by [`Deque::insert`] and [`Deque::erase`], and survives mutation:
//! it is checked again when it is used, so a position of another deque, or of
//! a block deleted in the meantime, fails with [`Error::InvalidCursor`].
//!
//! The cursors [`Cursor`] and [`CursorMut`] borrow the deque, and provide
//! flexible ways of viewing or editing it at a location.
//!
//! ## Examples
//!
//! ```
//! use blocked_deque::{Deque, Error};
//!
//! let mut deque: Deque<_, 4> = (0..10).collect();
//! let mut other = deque.clone();
//!
//! let position = deque.cursor(5).unwrap().position();
//! let next = deque.erase(position).unwrap();
//! assert_eq!(deque.cursor_at(next).unwrap().current(), Some(&6));
//!
//! // positions belong to a single deque
//! assert_eq!(other.erase(next).err(), Some(Error::InvalidCursor));
//!
//! let start = deque.cursor_start();
//! let end = deque.cursor_end();
//! assert_eq!(end.distance(&start), Ok(9));
//! assert_eq!(start.offset_by(4).unwrap().current(), Some(&4));
//! ```
//!
//! # Iteration
//!
//! Iterating over a deque is by the [`Iter`] and [`IterMut`] iterators. These
//! are double-ended, exact-size and fused iterators.
//!
//! ## Examples
//!
//! ```
//! use blocked_deque::Deque;
//!
//! let mut deque: Deque<_> = [1, 2, 3].into_iter().collect();
//! let mut iter = deque.iter();
//! assert_eq!(iter.next(), Some(&1));
//! assert_eq!(iter.next(), Some(&2));
//! assert_eq!(iter.next(), Some(&3));
//! assert_eq!(iter.next(), None);
//!
//! deque.iter_mut().for_each(|item| *item *= 2);
//! assert_eq!(Vec::from_iter(deque), vec![2, 4, 6]);
//! ```
//!
//! # Logging
//!
//! Every merge and split of blocks is reported with [`log::trace!`]. The
//! crate never installs a logger by itself.

#[doc(inline)]
pub use deque::cursor::{Cursor, CursorMut, Position};
#[doc(inline)]
pub use deque::iterator::{IntoIter, Iter, IterMut};
#[doc(inline)]
pub use deque::{Deque, DEFAULT_BLOCK_CAPACITY};
pub use error::{Error, Result};

pub mod deque;

mod error;
