//! In-place sort and sorted range search over type-erased elements.

use std::cmp::Ordering;

use crate::vec::DynVec;

impl DynVec {
    /// Sort the elements in place according to `compar`.
    ///
    /// Equivalent to a standard unstable array sort: elements are
    /// permuted bytewise, so each element keeps its single owner and no
    /// destructor runs.
    pub fn sort_unstable_by<F>(&mut self, mut compar: F)
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        let element_size = self.element_size();
        let n = self.len();
        if n <= 1 {
            return;
        }
        let mut perm: Vec<usize> = (0..n).collect();
        {
            let data = self.as_bytes();
            perm.sort_unstable_by(|&a, &b| {
                compar(
                    &data[a * element_size..(a + 1) * element_size],
                    &data[b * element_size..(b + 1) * element_size],
                )
            });
        }
        // Apply the permutation through a scratch copy of the storage.
        let scratch = self.as_bytes().to_vec();
        let out = self.as_bytes_mut();
        for (dst, &src) in perm.iter().enumerate() {
            out[dst * element_size..(dst + 1) * element_size]
                .copy_from_slice(&scratch[src * element_size..(src + 1) * element_size]);
        }
    }

    /// Search a sorted vector for the contiguous index range of elements
    /// matching `key`.
    ///
    /// `compar` is called with the key as its first argument and an
    /// element as its second, the `bsearch`-compatible order. Unlike a
    /// plain binary search this works reliably on non-unique matches:
    /// the result is the inclusive `(lowest, highest)` pair of matching
    /// indices, or `None` when no element matches. An existence check is
    /// `search(...).is_some()`.
    ///
    /// The vector must already be sorted consistently with `compar`, e.g.
    /// by [`DynVec::sort_unstable_by`] with a compatible comparison; the
    /// search comparison may treat more elements as equal than the sort
    /// comparison did. Both boundaries are located by binary search, so
    /// the cost stays logarithmic even when many elements match.
    pub fn search<F>(&self, key: &[u8], compar: F) -> Option<(usize, usize)>
    where
        F: Fn(&[u8], &[u8]) -> Ordering,
    {
        let n = self.len();
        if n == 0 {
            return None;
        }
        // First index whose element is not below the key.
        let lowest = self.partition(|elem| compar(key, elem) == Ordering::Greater);
        if lowest == n || compar(key, self.get(lowest)) != Ordering::Equal {
            return None;
        }
        // First index whose element is above the key.
        let past = self.partition(|elem| compar(key, elem) != Ordering::Less);
        Some((lowest, past - 1))
    }

    /// Index of the first element for which `pred` is false, assuming
    /// the elements are partitioned with all `true` elements first.
    fn partition<P>(&self, mut pred: P) -> usize
    where
        P: FnMut(&[u8]) -> bool,
    {
        let mut lo = 0;
        let mut hi = self.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if pred(self.get(mid)) {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_vec(values: &[u32]) -> DynVec {
        let mut vec = DynVec::of::<u32>();
        for v in values {
            vec.push(Some(&v.to_ne_bytes())).unwrap();
        }
        vec
    }

    fn as_u32(elem: &[u8]) -> u32 {
        u32::from_ne_bytes(elem.try_into().unwrap())
    }

    fn cmp_u32(a: &[u8], b: &[u8]) -> Ordering {
        as_u32(a).cmp(&as_u32(b))
    }

    fn contents(vec: &DynVec) -> Vec<u32> {
        vec.iter().map(as_u32).collect()
    }

    #[test]
    fn sort_orders_elements() {
        let mut vec = u32_vec(&[5, 1, 4, 2, 3]);
        vec.sort_unstable_by(cmp_u32);
        assert_eq!(contents(&vec), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn sort_handles_duplicates_and_empty() {
        let mut vec = u32_vec(&[2, 1, 2, 1]);
        vec.sort_unstable_by(cmp_u32);
        assert_eq!(contents(&vec), [1, 1, 2, 2]);

        let mut empty = u32_vec(&[]);
        empty.sort_unstable_by(cmp_u32);
        assert!(empty.is_empty());
    }

    #[test]
    fn search_finds_the_full_matching_range() {
        let vec = u32_vec(&[1, 2, 2, 2, 3]);
        assert_eq!(vec.search(&2u32.to_ne_bytes(), cmp_u32), Some((1, 3)));
    }

    #[test]
    fn search_misses_an_absent_key() {
        let vec = u32_vec(&[1, 2, 2, 2, 3]);
        assert_eq!(vec.search(&4u32.to_ne_bytes(), cmp_u32), None);
        assert_eq!(vec.search(&0u32.to_ne_bytes(), cmp_u32), None);
    }

    #[test]
    fn search_single_match_at_each_end() {
        let vec = u32_vec(&[1, 2, 3]);
        assert_eq!(vec.search(&1u32.to_ne_bytes(), cmp_u32), Some((0, 0)));
        assert_eq!(vec.search(&3u32.to_ne_bytes(), cmp_u32), Some((2, 2)));
    }

    #[test]
    fn search_empty_vector_finds_nothing() {
        let vec = u32_vec(&[]);
        assert_eq!(vec.search(&1u32.to_ne_bytes(), cmp_u32), None);
    }

    #[test]
    fn search_all_elements_equal() {
        let vec = u32_vec(&[7, 7, 7, 7]);
        assert_eq!(vec.search(&7u32.to_ne_bytes(), cmp_u32), Some((0, 3)));
    }

    #[test]
    fn search_comparison_may_coarsen_the_sort_order() {
        // Sorted by exact value; searched by decade.
        let vec = u32_vec(&[11, 15, 19, 23, 27]);
        let by_decade = |key: &[u8], elem: &[u8]| (as_u32(key) / 10).cmp(&(as_u32(elem) / 10));
        assert_eq!(vec.search(&13u32.to_ne_bytes(), by_decade), Some((0, 2)));
        assert_eq!(vec.search(&20u32.to_ne_bytes(), by_decade), Some((3, 4)));
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn sort_matches_std_sort(values in proptest::collection::vec(any::<u32>(), 0..64)) {
                let mut vec = u32_vec(&values);
                vec.sort_unstable_by(cmp_u32);
                let mut expect = values.clone();
                expect.sort_unstable();
                prop_assert_eq!(contents(&vec), expect);
            }

            #[test]
            fn search_agrees_with_linear_scan(
                mut values in proptest::collection::vec(0u32..32, 0..64),
                key in 0u32..32,
            ) {
                values.sort_unstable();
                let vec = u32_vec(&values);
                let expect = {
                    let lowest = values.iter().position(|&v| v == key);
                    let highest = values.iter().rposition(|&v| v == key);
                    lowest.zip(highest)
                };
                prop_assert_eq!(vec.search(&key.to_ne_bytes(), cmp_u32), expect);
            }
        }
    }
}
