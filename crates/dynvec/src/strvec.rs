//! Bulk helpers for vectors of owned string handles.

use dynvec_buf::BufError;

use crate::vec::DynVec;

/// Split `input` into chunks separated by `sep` and append an owned copy
/// of each chunk to `dest`.
///
/// Adjacent separators are never collapsed: `"a::b"` splits into `"a"`,
/// `""`, `"b"` with `':'` as the separator, and `":::"` into four empty
/// chunks. The only special case is the empty input, which yields no
/// chunks when `empty_is_none` is set and a single empty chunk otherwise.
/// Existing contents of `dest` are kept; new chunks go to the end.
///
/// # Panics
///
/// Panics unless `dest` can hold string handles — see
/// [`DynVec::push_owned_str`].
pub fn split_string(
    input: &str,
    dest: &mut DynVec,
    sep: char,
    empty_is_none: bool,
) -> Result<(), BufError> {
    if input.is_empty() && empty_is_none {
        return Ok(());
    }
    for chunk in input.split(sep) {
        dest.push_owned_str(chunk.to_owned())?;
    }
    Ok(())
}

impl DynVec {
    /// Append an owned copy of every string in `elements`.
    ///
    /// # Panics
    ///
    /// As for [`DynVec::push_owned_str`].
    pub fn append_str_slice(&mut self, elements: &[&str]) -> Result<(), BufError> {
        for s in elements {
            self.push_owned_str((*s).to_owned())?;
        }
        Ok(())
    }
}
