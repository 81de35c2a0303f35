//! Type-erased dynamic vector with per-element destructors.
//!
//! [`DynVec`] is a growable array whose element type is described at
//! runtime by a byte size rather than a type parameter, for use at
//! boundaries where compile-time generics are unavailable — plugin
//! interfaces, script runtimes, wire decoders. Callers fix the element
//! size at construction and may attach an element destructor that runs
//! on every element that is removed, overwritten or dropped, so arrays
//! of heap-owning values can be grown, shrunk, sorted, searched and
//! spliced without leaking or double-freeing.
//!
//! # Architecture
//!
//! ```text
//! DynVec (element semantics)
//! ├── DynBuf (dynvec-buf: raw growable byte storage)
//! ├── item.rs (owned string handles; the only module with unsafe code)
//! ├── strvec.rs (string splitting and bulk string appends)
//! └── search.rs (in-place sort, sorted range search)
//! ```
//!
//! # Destructor contract
//!
//! A destructor receives the element's byte representation and must
//! tolerate all-zero bytes: every move-like operation zeroes the source
//! slot it vacates, so a later destructor call on that slot releases
//! nothing. See [`ItemDestroyFn`].
//!
//! # Error handling
//!
//! Allocation failure is the only recoverable error and is reported as
//! [`BufError`] from every growing operation. Everything else that can go
//! wrong — out-of-bounds indices, element-size mismatches, destructor
//! identity mismatches — is a programming bug and panics.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod item;
pub mod search;
pub mod strvec;
pub mod vec;

pub use dynvec_buf::{BufError, DynBuf, DEFAULT_GROW_FACTOR};
pub use item::{ItemDestroyFn, DESTROY_STR_ITEM, STR_ITEM_SIZE};
pub use strvec::split_string;
pub use vec::DynVec;
