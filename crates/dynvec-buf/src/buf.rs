//! The growable byte buffer.

use crate::error::BufError;

/// Percentage of extra capacity reserved whenever the buffer reallocates.
///
/// With the default factor of 50, a reallocation for `n` required bytes
/// reserves `n + n / 2` bytes, trading some memory headroom for fewer
/// reallocations. Most users should not need to tune this.
pub const DEFAULT_GROW_FACTOR: u8 = 50;

/// A contiguous growable byte buffer.
///
/// The buffer tracks a logical length separately from its capacity: `cut`
/// and `reset` shrink the length without releasing storage, so repeated
/// fill/drain cycles reuse the same allocation. Growth is multiplicative
/// via the grow factor and fallible — see [`DynBuf::append`].
#[derive(Debug)]
pub struct DynBuf {
    /// Backing storage. `data.len()` is the logical length; spare
    /// capacity beyond it is reserved but unused.
    data: Vec<u8>,
    /// Percentage of extra capacity reserved on reallocation.
    grow_factor: u8,
}

impl DynBuf {
    /// Create an empty buffer with the given grow factor.
    ///
    /// No storage is allocated until the first append.
    pub fn new(grow_factor: u8) -> Self {
        Self {
            data: Vec::new(),
            grow_factor,
        }
    }

    /// Logical length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` if the logical length is zero.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Currently allocated capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// The configured grow factor percentage.
    pub fn grow_factor(&self) -> u8 {
        self.grow_factor
    }

    /// The buffer contents as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// The buffer contents as a mutable byte slice.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Make room for `add` more bytes, reallocating with grow-factor
    /// headroom if the current capacity is insufficient.
    ///
    /// On failure the buffer's length, contents and capacity are unchanged.
    fn ensure(&mut self, add: usize) -> Result<(), BufError> {
        let required = self
            .data
            .len()
            .checked_add(add)
            .ok_or(BufError::AllocFailed { requested: usize::MAX })?;
        if required <= self.data.capacity() {
            return Ok(());
        }
        let headroom = (required / 100).saturating_mul(usize::from(self.grow_factor));
        let target = required.saturating_add(headroom);
        if self.data.try_reserve_exact(target - self.data.len()).is_ok() {
            return Ok(());
        }
        // The padded reservation failed; retry with the exact requirement
        // before giving up.
        self.data
            .try_reserve_exact(required - self.data.len())
            .map_err(|_| BufError::AllocFailed { requested: target })
    }

    /// Append `bytes` to the end of the buffer, growing it if needed.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), BufError> {
        self.ensure(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Append `n` zero bytes to the end of the buffer, growing it if needed.
    pub fn append_zeroed(&mut self, n: usize) -> Result<(), BufError> {
        self.ensure(n)?;
        let new_len = self.data.len() + n;
        self.data.resize(new_len, 0);
        Ok(())
    }

    /// Reserve capacity for at least `n` more bytes without changing the
    /// logical length.
    pub fn expand(&mut self, n: usize) -> Result<(), BufError> {
        self.ensure(n)
    }

    /// Cut `count` bytes starting at `start`, compacting the remainder
    /// leftward. Out-of-range regions are clamped. Never reallocates.
    pub fn cut(&mut self, start: usize, count: usize) {
        if start >= self.data.len() {
            return;
        }
        let count = count.min(self.data.len() - start);
        self.data.drain(start..start + count);
    }

    /// Set the logical length to zero, keeping the allocated capacity.
    pub fn reset(&mut self) {
        self.data.clear();
    }

    /// Release the backing storage entirely. The buffer stays usable and
    /// will allocate again on the next append.
    pub fn release(&mut self) {
        self.data = Vec::new();
    }
}
