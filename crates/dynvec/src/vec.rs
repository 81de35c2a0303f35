//! The type-erased dynamic vector.

use dynvec_buf::{BufError, DynBuf, DEFAULT_GROW_FACTOR};

use crate::item::ItemDestroyFn;

/// A growable array of fixed-size, type-erased elements.
///
/// The element size is fixed at construction and every element is a
/// contiguous run of that many bytes inside a [`DynBuf`]. An optional
/// element destructor runs on each element immediately before its bytes
/// are discarded or overwritten; slots vacated by move-like operations
/// are zeroed so a later destructor call on them is harmless.
///
/// Element accessors hand out slices into the backing storage; the borrow
/// checker ensures they cannot outlive the next growing operation.
#[derive(Debug)]
pub struct DynVec {
    /// Raw byte storage. The vector is its exclusive owner.
    storage: DynBuf,
    /// Size of one element in bytes. Always positive.
    element_size: usize,
    /// Element destructor, if any. Sticky once elements exist — see
    /// [`DynVec::set_destroy_fn_safe`].
    destroy: Option<ItemDestroyFn>,
}

impl DynVec {
    /// Create an empty vector for elements of `element_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `element_size` is zero.
    pub fn new(element_size: usize, grow_factor: u8, destroy: Option<ItemDestroyFn>) -> Self {
        assert!(element_size > 0, "element size must be positive");
        Self {
            storage: DynBuf::new(grow_factor),
            element_size,
            destroy,
        }
    }

    /// Create an empty vector sized for values of type `T`, with the
    /// default grow factor and no destructor.
    pub fn of<T>() -> Self {
        Self::new(std::mem::size_of::<T>(), DEFAULT_GROW_FACTOR, None)
    }

    /// Create an empty vector sized for values of type `T`, with the
    /// default grow factor and the given destructor.
    pub fn of_with_destroy<T>(destroy: ItemDestroyFn) -> Self {
        Self::new(std::mem::size_of::<T>(), DEFAULT_GROW_FACTOR, Some(destroy))
    }

    /// Size of one element in bytes.
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// The element destructor currently in effect, if any.
    pub fn destroy_fn(&self) -> Option<ItemDestroyFn> {
        self.destroy
    }

    /// The grow factor of the backing storage.
    pub fn grow_factor(&self) -> u8 {
        self.storage.grow_factor()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        debug_assert!(self.storage.len() % self.element_size == 0);
        self.storage.len() / self.element_size
    }

    /// `true` if the vector holds no elements.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// The whole element storage as one byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.as_slice()
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.storage.as_mut_slice()
    }

    /// Install an element destructor with sanity checks.
    ///
    /// The rules minimise the risk of running a destructor on data it was
    /// not written for:
    ///
    /// - clearing the destructor (`None`) is always allowed;
    /// - re-installing the destructor already in effect is a no-op;
    /// - if the vector has a null destructor and already holds elements,
    ///   the destructor stays null — elements created before the
    ///   destructor existed must not be run through it;
    /// - otherwise the destructor takes effect.
    ///
    /// # Panics
    ///
    /// Panics if a different non-null destructor is already installed.
    pub fn set_destroy_fn_safe(&mut self, destroy: Option<ItemDestroyFn>) {
        match (self.destroy, destroy) {
            (_, None) => self.destroy = None,
            (Some(old), Some(new)) => {
                assert!(
                    old == new,
                    "attempt to replace an existing element destructor"
                );
            }
            (None, Some(_)) if !self.is_empty() => {
                // Legacy call sites built vectors before destructors
                // existed; their elements must keep bypassing cleanup.
            }
            (None, new) => self.destroy = new,
        }
    }

    fn byte_range(&self, index: usize) -> std::ops::Range<usize> {
        let start = index * self.element_size;
        start..start + self.element_size
    }

    /// Borrow the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn get(&self, index: usize) -> &[u8] {
        assert!(
            index < self.len(),
            "index {index} out of bounds (len {})",
            self.len()
        );
        &self.storage.as_slice()[self.byte_range(index)]
    }

    /// Mutably borrow the element at `index`.
    ///
    /// For vectors with a destructor prefer [`DynVec::replace`], which
    /// disposes of the old contents before overwriting.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn get_mut(&mut self, index: usize) -> &mut [u8] {
        assert!(
            index < self.len(),
            "index {index} out of bounds (len {})",
            self.len()
        );
        let range = self.byte_range(index);
        &mut self.storage.as_mut_slice()[range]
    }

    /// Like [`DynVec::get`], additionally guarding against a caller whose
    /// compile-time type does not match what the vector was built for.
    ///
    /// # Panics
    ///
    /// Panics if `expected_element_size` differs from the vector's element
    /// size, or if `index` is out of bounds.
    pub fn get_checked(&self, index: usize, expected_element_size: usize) -> &[u8] {
        assert!(
            expected_element_size == self.element_size,
            "expected element size {expected_element_size}, vector holds {} byte elements",
            self.element_size
        );
        self.get(index)
    }

    /// Mutable counterpart of [`DynVec::get_checked`].
    ///
    /// # Panics
    ///
    /// Panics if `expected_element_size` differs from the vector's element
    /// size, or if `index` is out of bounds.
    pub fn get_checked_mut(&mut self, index: usize, expected_element_size: usize) -> &mut [u8] {
        assert!(
            expected_element_size == self.element_size,
            "expected element size {expected_element_size}, vector holds {} byte elements",
            self.element_size
        );
        self.get_mut(index)
    }

    /// Index of the element `elem` points into.
    ///
    /// The result is meaningful only for slices previously obtained from
    /// this vector's accessors and not retained across a growing
    /// operation.
    pub fn index_of(&self, elem: &[u8]) -> usize {
        let base = self.storage.as_slice().as_ptr() as usize;
        let offset = (elem.as_ptr() as usize).wrapping_sub(base);
        debug_assert!(offset < self.storage.len(), "slice is not vector data");
        offset / self.element_size
    }

    /// Iterate over elements in storage order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.storage.as_slice().chunks_exact(self.element_size)
    }

    /// Iterate mutably over elements in storage order.
    ///
    /// The same caveat as for [`DynVec::get_mut`] applies to vectors with
    /// a destructor.
    pub fn iter_mut(&mut self) -> impl ExactSizeIterator<Item = &mut [u8]> + '_ {
        let element_size = self.element_size;
        self.storage.as_mut_slice().chunks_exact_mut(element_size)
    }

    /// Append one element. `None` appends a zero-filled element.
    ///
    /// # Panics
    ///
    /// Panics if the provided slice is not exactly one element long.
    pub fn push(&mut self, element: Option<&[u8]>) -> Result<(), BufError> {
        self.append_array(element, 1)
    }

    /// Append `count` contiguous elements by bytewise copy. `None`
    /// appends `count` zero-filled elements.
    ///
    /// The copied-in bytes are treated as freshly taking ownership; no
    /// destructor runs.
    ///
    /// # Panics
    ///
    /// Panics if the provided slice is not exactly `count` elements long.
    pub fn append_array(&mut self, elements: Option<&[u8]>, count: usize) -> Result<(), BufError> {
        let nbytes = count
            .checked_mul(self.element_size)
            .ok_or(BufError::AllocFailed { requested: usize::MAX })?;
        match elements {
            Some(bytes) => {
                assert!(
                    bytes.len() == nbytes,
                    "slice of {} bytes does not hold {count} elements of {} bytes",
                    bytes.len(),
                    self.element_size
                );
                self.storage.append(bytes)
            }
            None => self.storage.append_zeroed(nbytes),
        }
    }

    /// Append every element of `other` by bytewise copy.
    ///
    /// # Panics
    ///
    /// Panics if the element sizes differ, or if either vector has a
    /// destructor — duplicating destructor-managed bytes would create two
    /// owners of the same resource.
    pub fn append_vec(&mut self, other: &DynVec) -> Result<(), BufError> {
        assert!(
            self.element_size == other.element_size,
            "element sizes differ: {} vs {}",
            self.element_size,
            other.element_size
        );
        assert!(
            self.destroy.is_none() && other.destroy.is_none(),
            "bytewise append between destructor-managed vectors"
        );
        self.storage.append(other.storage.as_slice())
    }

    /// Replace the contents of the element at `index` with `new_val`
    /// (zeroes for `None`), returning the updated slot.
    ///
    /// If `index` is beyond the current length the vector grows with
    /// zero-filled elements until the slot exists. The destructor, if
    /// set, runs exactly once on the old contents of a pre-existing slot.
    ///
    /// # Panics
    ///
    /// Panics if `new_val` is not exactly one element long.
    pub fn replace(&mut self, index: usize, new_val: Option<&[u8]>) -> Result<&mut [u8], BufError> {
        if index >= self.len() {
            let missing = (index - self.len())
                .checked_add(1)
                .ok_or(BufError::AllocFailed { requested: usize::MAX })?;
            self.append_array(None, missing)?;
        } else if let Some(destroy) = self.destroy {
            destroy(self.get(index));
        }
        let element_size = self.element_size;
        let slot = self.get_mut(index);
        match new_val {
            Some(bytes) => {
                assert!(
                    bytes.len() == element_size,
                    "replacement value of {} bytes for {element_size} byte elements",
                    bytes.len()
                );
                slot.copy_from_slice(bytes);
            }
            None => slot.fill(0),
        }
        Ok(slot)
    }

    /// Move the contents of the element at `index` out of the vector.
    ///
    /// With a destination the element's bytes are copied there and no
    /// destructor runs — ownership moves to the destination. Without one
    /// the destructor, if set, runs on the element. In both cases the
    /// source slot is zeroed afterwards, so a later destructor call on it
    /// releases nothing.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds or the destination is not
    /// exactly one element long.
    pub fn transfer(&mut self, index: usize, dest: Option<&mut [u8]>) {
        let destroy = self.destroy;
        let element_size = self.element_size;
        let slot = self.get_mut(index);
        match dest {
            Some(out) => {
                assert!(
                    out.len() == element_size,
                    "destination of {} bytes for {element_size} byte elements",
                    out.len()
                );
                out.copy_from_slice(slot);
            }
            None => {
                if let Some(destroy) = destroy {
                    destroy(slot);
                }
            }
        }
        slot.fill(0);
    }

    /// Move at most `count` elements starting at `start_index` into
    /// `dest`, returning the number actually moved.
    ///
    /// `count` is clamped so the range never exceeds the vector. With a
    /// destination the elements are appended to it and no destructor
    /// runs; without one the destructor, if set, runs per element. The
    /// source slots are zeroed either way.
    ///
    /// # Panics
    ///
    /// Panics if the destination's element size differs, or if the
    /// destination has a destructor different from this vector's — moved
    /// elements must remain correctly cleanable.
    pub fn transfer_append(
        &mut self,
        start_index: usize,
        count: usize,
        dest: Option<&mut DynVec>,
    ) -> Result<usize, BufError> {
        let len = self.len();
        if start_index >= len {
            return Ok(0);
        }
        let count = count.min(len - start_index);
        if count == 0 {
            return Ok(0);
        }
        let byte_start = start_index * self.element_size;
        let byte_end = (start_index + count) * self.element_size;
        match dest {
            Some(dest) => {
                assert!(
                    dest.element_size == self.element_size,
                    "element sizes differ: {} vs {}",
                    dest.element_size,
                    self.element_size
                );
                assert!(
                    dest.destroy.is_none() || dest.destroy == self.destroy,
                    "destination has an incompatible element destructor"
                );
                dest.storage
                    .append(&self.storage.as_slice()[byte_start..byte_end])?;
            }
            None => {
                if let Some(destroy) = self.destroy {
                    for elem in self.storage.as_slice()[byte_start..byte_end]
                        .chunks_exact(self.element_size)
                    {
                        destroy(elem);
                    }
                }
            }
        }
        self.storage.as_mut_slice()[byte_start..byte_end].fill(0);
        Ok(count)
    }

    /// Destroy and remove `count` elements starting at `start_index`,
    /// compacting subsequent elements leftward.
    ///
    /// The range is clamped to the vector's bounds. The destructor, if
    /// set, runs once per removed element.
    pub fn remove(&mut self, start_index: usize, count: usize) {
        let len = self.len();
        if start_index >= len {
            return;
        }
        let count = count.min(len - start_index);
        if let Some(destroy) = self.destroy {
            for i in start_index..start_index + count {
                destroy(self.get(i));
            }
        }
        self.storage
            .cut(start_index * self.element_size, count * self.element_size);
    }

    /// Destroy and remove the element at `index`.
    pub fn remove_at(&mut self, index: usize) {
        self.remove(index, 1);
    }

    /// Destroy every element and set the length to zero, keeping the
    /// storage capacity for reuse.
    pub fn reset(&mut self) {
        if let Some(destroy) = self.destroy {
            for elem in self.iter() {
                destroy(elem);
            }
        }
        self.storage.reset();
    }
}

impl Drop for DynVec {
    /// Destroy every element and release the storage.
    fn drop(&mut self) {
        self.reset();
        self.storage.release();
    }
}
