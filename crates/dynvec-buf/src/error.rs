//! Buffer-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during buffer operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BufError {
    /// The allocator could not provide the requested storage.
    AllocFailed {
        /// Total number of bytes the buffer tried to reserve.
        requested: usize,
    },
}

impl fmt::Display for BufError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocFailed { requested } => {
                write!(f, "buffer allocation failed: {requested} bytes requested")
            }
        }
    }
}

impl Error for BufError {}
