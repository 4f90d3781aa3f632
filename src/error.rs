use thiserror::Error;

/// Errors reported by [`Deque`](crate::Deque) and its cursors.
///
/// Every failing operation reports its error before touching the
/// structure of the deque, so a failed `insert` or `erase` leaves both
/// the elements and the length untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Error {
    /// An index or offset lies outside the accessible range.
    #[error("index out of bound")]
    IndexOutOfBound,
    /// An element was read or popped from an empty deque.
    #[error("container is empty")]
    ContainerIsEmpty,
    /// The cursor belongs to another deque, points into a deleted block,
    /// or cannot be moved to a valid location.
    #[error("invalid cursor")]
    InvalidCursor,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
