//! The three error kinds exposed at the container boundary: bad index,
//! capacity overflow, and (via a cursor) a stale snapshot.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An index fell outside the valid range for the attempted operation.
    IndexOutOfRange { index: usize, len: usize },
    /// The operation would have grown the sequence past its addressable
    /// maximum.
    CapacityExceeded { requested: usize },
    /// A cursor's `fork_id` no longer matches the container it was taken
    /// from: the container was mutated (or forked) since.
    ConcurrentModification,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for length {}", index, len)
            }
            Error::CapacityExceeded { requested } => {
                write!(f, "requested size {} exceeds addressable capacity", requested)
            }
            Error::ConcurrentModification => {
                write!(f, "container was modified since the cursor was taken")
            }
        }
    }
}

impl std::error::Error for Error {}
