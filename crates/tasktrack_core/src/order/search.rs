//! Binary search over key-ordered sequences.

use super::SortDirection;
use std::cmp::Ordering;
use std::ops::Range;

/// Finds the position of an element whose key equals `target`.
///
/// `items` must already be ordered by `key` in `direction`. Returns `Ok(pos)`
/// for some matching element (not necessarily the first of a run), or
/// `Err(pos)` with the position where `target` would be inserted. Every
/// element before that position comes before `target` in `direction`.
pub fn boundary_search<T, K, F>(
    items: &[T],
    key: F,
    target: &K,
    direction: SortDirection,
) -> Result<usize, usize>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut low = 0;
    let mut high = items.len();
    while low < high {
        let mid = low + (high - low) / 2;
        match direction.orient(key(&items[mid]).cmp(target)) {
            Ordering::Equal => return Ok(mid),
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
        }
    }
    Err(low)
}

/// Expands a search hit to the full run of elements whose key equals `target`.
///
/// `hit` is expected to come from `boundary_search`; an out-of-range hit
/// yields an empty range at the end of `items`.
pub fn equal_run<T, K, F>(items: &[T], key: F, target: &K, hit: usize) -> Range<usize>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    if hit >= items.len() {
        return items.len()..items.len();
    }

    let mut start = hit;
    while start > 0 && key(&items[start - 1]) == *target {
        start -= 1;
    }
    let mut end = hit + 1;
    while end < items.len() && key(&items[end]) == *target {
        end += 1;
    }
    start..end
}
