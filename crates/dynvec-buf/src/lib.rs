//! Growable raw byte buffer for the dynvec container.
//!
//! [`DynBuf`] is a contiguous byte region with a logical length that may be
//! shorter than the allocated capacity. It grows by a configurable
//! percentage [`grow factor`](DEFAULT_GROW_FACTOR) whenever an append would
//! exceed the current capacity, and it never inspects the bytes it stores —
//! element semantics (sizes, destructors) live entirely in the `dynvec`
//! crate built on top of it.
//!
//! Allocation failure is the only recoverable error: every growing
//! operation reports it through [`BufError`] and leaves the buffer in its
//! prior state.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buf;
pub mod error;

pub use buf::{DynBuf, DEFAULT_GROW_FACTOR};
pub use error::BufError;
