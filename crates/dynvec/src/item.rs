//! Owned string handles stored as type-erased elements.
//!
//! This is the only module in the crate allowed to contain `unsafe`
//! code. A string handle is a heap-allocated [`String`] whose address is
//! stored as `usize` native-endian bytes in a [`STR_ITEM_SIZE`]-byte
//! element. All-zero bytes are the empty representation — the state a
//! slot is left in after its contents move out — and decode as "no
//! string", which gives [`DESTROY_STR_ITEM`] the zero tolerance the
//! destructor contract requires.
//!
//! Handle bytes carry ownership, so the usual element rules apply with
//! extra force here: only [`DynVec::push_owned_str`] and the helpers in
//! [`crate::strvec`] may produce non-zero handle bytes. Feeding raw bytes
//! into a string-handle vector (e.g. through
//! [`append_array`](DynVec::append_array)) and then decoding them is
//! undefined behaviour, which is why the decoding accessors are `unsafe`.

#![allow(unsafe_code)]

use std::fmt;

use dynvec_buf::BufError;

use crate::vec::DynVec;

/// Function type for vector element destructors.
///
/// The destructor receives the element's byte representation, *not* a
/// pointer to a deallocatable block, and must not modify it. It must
/// tolerate all-zero bytes without fault: zeroed slots are reachable
/// after every move-like operation.
pub type ItemDestroyFn = fn(item: &[u8]);

/// Byte size of an owned string handle element.
pub const STR_ITEM_SIZE: usize = std::mem::size_of::<usize>();

/// Destructor releasing elements that hold a single owned string handle.
pub const DESTROY_STR_ITEM: ItemDestroyFn = destroy_str_item;

fn destroy_str_item(item: &[u8]) {
    drop(decode(item));
}

/// Box a string and return its handle bytes. The caller takes over the
/// single ownership the handle represents.
fn encode(s: String) -> [u8; STR_ITEM_SIZE] {
    let raw = Box::into_raw(Box::new(s));
    (raw as usize).to_ne_bytes()
}

fn handle_addr(item: &[u8]) -> usize {
    let mut bytes = [0u8; STR_ITEM_SIZE];
    bytes.copy_from_slice(item);
    usize::from_ne_bytes(bytes)
}

/// Reclaim ownership of the string a handle refers to, or `None` for the
/// zero handle.
fn decode(item: &[u8]) -> Option<Box<String>> {
    let addr = handle_addr(item);
    if addr == 0 {
        return None;
    }
    // SAFETY: non-zero handle bytes are only ever produced by `encode`,
    // which stores the address of a live `Box<String>`, and every slot is
    // zeroed when ownership moves out of it, so a non-zero handle is the
    // unique owner of its allocation.
    Some(unsafe { Box::from_raw(addr as *mut String) })
}

/// Borrow the string a handle element refers to.
///
/// Returns `None` for the zero (moved-out) handle.
///
/// # Safety
///
/// Every non-zero byte pattern in `item` must have been produced by this
/// crate's string-handle API ([`DynVec::push_owned_str`],
/// [`crate::split_string`], ...). Decoding arbitrary bytes dereferences
/// an arbitrary address.
pub unsafe fn peek_str(item: &[u8]) -> Option<&str> {
    let addr = handle_addr(item);
    if addr == 0 {
        return None;
    }
    // SAFETY: per this function's contract the handle refers to a live
    // `Box<String>`; the returned borrow is tied to the element borrow,
    // and releasing the string requires mutable access to the vector.
    let s: &String = unsafe { &*(addr as *const String) };
    Some(s.as_str())
}

fn assert_str_vec(vec: &DynVec) {
    assert!(
        vec.element_size() == STR_ITEM_SIZE,
        "vector elements of {} bytes cannot hold string handles",
        vec.element_size()
    );
    assert!(
        vec.destroy_fn().is_none() || vec.destroy_fn() == Some(DESTROY_STR_ITEM),
        "vector has a non-string element destructor"
    );
}

impl DynVec {
    /// Append `s` as one owned string handle element.
    ///
    /// On allocation failure the string is released and the vector is
    /// unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the vector's element size is not the string handle size,
    /// or if it has a destructor other than [`DESTROY_STR_ITEM`].
    pub fn push_owned_str(&mut self, s: String) -> Result<(), BufError> {
        assert_str_vec(self);
        let handle = encode(s);
        match self.push(Some(&handle)) {
            Ok(()) => Ok(()),
            Err(e) => {
                drop(decode(&handle));
                Err(e)
            }
        }
    }

    /// Format `args` and append the result as one owned string handle
    /// element.
    ///
    /// # Panics
    ///
    /// As for [`DynVec::push_owned_str`].
    pub fn append_str_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), BufError> {
        self.push_owned_str(fmt::format(args))
    }

    /// Borrow the string held by the element at `index`, or `None` if the
    /// slot's handle has moved out.
    ///
    /// # Panics
    ///
    /// Panics on an out-of-bounds index or a non-string vector.
    ///
    /// # Safety
    ///
    /// Every non-zero element of this vector must have been produced by
    /// the string-handle API — see [`peek_str`].
    pub unsafe fn get_str(&self, index: usize) -> Option<&str> {
        assert_str_vec(self);
        // SAFETY: forwarded to the caller.
        unsafe { peek_str(self.get(index)) }
    }

    /// Move the string held by the element at `index` out of the vector,
    /// zeroing the slot. Returns `None` if the handle already moved out.
    ///
    /// # Panics
    ///
    /// Panics on an out-of-bounds index or a non-string vector.
    ///
    /// # Safety
    ///
    /// Every non-zero element of this vector must have been produced by
    /// the string-handle API — see [`peek_str`].
    pub unsafe fn take_str(&mut self, index: usize) -> Option<String> {
        assert_str_vec(self);
        let mut handle = [0u8; STR_ITEM_SIZE];
        self.transfer(index, Some(&mut handle));
        decode(&handle).map(|s| *s)
    }

    /// Release the vector, treating elements as owned string handles when
    /// no destructor was ever set.
    ///
    /// With a destructor installed this is plain drop. Without one, every
    /// element is decoded as a string handle and released first — a
    /// compatibility path for call sites that predate element
    /// destructors.
    ///
    /// # Safety
    ///
    /// When the vector has no destructor, every non-zero element must
    /// have been produced by the string-handle API — see [`peek_str`].
    #[deprecated(note = "construct the vector with DESTROY_STR_ITEM and rely on drop")]
    pub unsafe fn deep_free(mut self) {
        if self.destroy_fn().is_none() {
            for elem in self.iter() {
                drop(decode(elem));
            }
            // The handles are gone; drop must not see them again.
            self.as_bytes_mut().fill(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn str_vec() -> DynVec {
        DynVec::of_with_destroy::<usize>(DESTROY_STR_ITEM)
    }

    #[test]
    fn push_and_get_round_trip() {
        let mut vec = str_vec();
        vec.push_owned_str("hello".to_owned()).unwrap();
        vec.push_owned_str("world".to_owned()).unwrap();
        assert_eq!(unsafe { vec.get_str(0) }, Some("hello"));
        assert_eq!(unsafe { vec.get_str(1) }, Some("world"));
    }

    #[test]
    fn zero_handle_reads_as_none() {
        let mut vec = str_vec();
        vec.push(None).unwrap();
        assert_eq!(unsafe { vec.get_str(0) }, None);
    }

    #[test]
    fn take_str_moves_ownership_out() {
        let mut vec = str_vec();
        vec.push_owned_str("moved".to_owned()).unwrap();
        let taken = unsafe { vec.take_str(0) };
        assert_eq!(taken.as_deref(), Some("moved"));
        // The slot is zeroed; a second take finds nothing and drop is
        // harmless.
        assert_eq!(unsafe { vec.take_str(0) }, None);
    }

    #[test]
    fn append_str_fmt_formats_one_element() {
        let mut vec = str_vec();
        vec.append_str_fmt(format_args!("{}-{}", "id", 42)).unwrap();
        assert_eq!(unsafe { vec.get_str(0) }, Some("id-42"));
    }

    #[test]
    fn replace_releases_the_old_string() {
        let mut vec = str_vec();
        vec.push_owned_str("old".to_owned()).unwrap();
        vec.replace(0, None).unwrap();
        assert_eq!(unsafe { vec.get_str(0) }, None);
    }

    #[test]
    fn remove_and_reset_release_strings() {
        let mut vec = str_vec();
        for s in ["a", "b", "c"] {
            vec.push_owned_str(s.to_owned()).unwrap();
        }
        vec.remove_at(0);
        assert_eq!(vec.len(), 2);
        assert_eq!(unsafe { vec.get_str(0) }, Some("b"));
        vec.reset();
        assert!(vec.is_empty());
    }

    #[test]
    #[should_panic(expected = "cannot hold string handles")]
    fn wrong_element_size_is_rejected() {
        let mut vec = DynVec::new(2, crate::DEFAULT_GROW_FACTOR, None);
        let _ = vec.push_owned_str("nope".to_owned());
    }

    #[test]
    #[allow(deprecated)]
    fn deep_free_releases_destructorless_handles() {
        let mut vec = DynVec::of::<usize>();
        vec.push_owned_str("legacy".to_owned()).unwrap();
        vec.push(None).unwrap();
        // Leak-checked under miri/asan: the handle must be released
        // exactly once.
        unsafe { vec.deep_free() };
    }

    #[test]
    #[allow(deprecated)]
    fn deep_free_with_destructor_is_plain_drop() {
        let mut vec = str_vec();
        vec.push_owned_str("managed".to_owned()).unwrap();
        unsafe { vec.deep_free() };
    }
}
