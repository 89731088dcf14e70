use std::collections::TryReserveError;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error that can be returned by [`crate::Catalog`] operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An argument is outside the operation's contract.
    #[error("invalid input")]
    InvalidInput,

    /// The course id is already taken.
    #[error("course {0} already exists")]
    CourseExists(i32),

    /// No course is registered under this id.
    #[error("course {0} does not exist")]
    CourseNotFound(i32),

    /// The requested rank exceeds the number of watched classes.
    #[error("rank {0} exceeds the number of watched classes")]
    RankOutOfRange(usize),

    /// A storage cell past the end of an array was addressed.
    #[error("index {0} is out of bounds")]
    OutOfBounds(usize),

    /// The key has no entry in the table.
    #[error("key {0} has no entry")]
    KeyNotFound(i32),

    /// A memory reservation could not be satisfied.
    #[error(transparent)]
    Allocation(#[from] TryReserveError),
}
