//! Three-way partition sort.

use super::SortDirection;
use std::cmp::Ordering;

/// Returns a new vector ordered by `key` in `direction`.
///
/// The middle element's key is the pivot. Items are split into those that
/// come before, equal, and come after it; only the outer partitions recurse,
/// so a run of equal keys terminates immediately. Equal keys keep no
/// particular relative order.
pub fn partition_sort<T, K, F>(items: &[T], key: F, direction: SortDirection) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    sort_partition(items, &key, direction)
}

fn sort_partition<T, K, F>(items: &[T], key: &F, direction: SortDirection) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    if items.len() <= 1 {
        return items.to_vec();
    }

    let pivot = key(&items[items.len() / 2]);
    let mut before = Vec::new();
    let mut equal = Vec::new();
    let mut after = Vec::new();
    for item in items {
        match direction.orient(key(item).cmp(&pivot)) {
            Ordering::Less => before.push(item.clone()),
            Ordering::Equal => equal.push(item.clone()),
            Ordering::Greater => after.push(item.clone()),
        }
    }

    let mut sorted = sort_partition(&before, key, direction);
    sorted.extend(equal);
    sorted.extend(sort_partition(&after, key, direction));
    sorted
}
