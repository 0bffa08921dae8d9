//! Comparison-based ordering primitives for materialized task indices.
//!
//! # Responsibility
//! - Sort sequences by an extracted key in either direction.
//! - Locate exact-match positions and cut points in ordered sequences.
//!
//! # Invariants
//! - `boundary_search` callers pass a slice ordered by the same key and
//!   direction they search with.
//! - Neither primitive preserves the relative order of equal keys.

use std::cmp::Ordering;

pub mod search;
pub mod sort;

pub use search::{boundary_search, equal_run};
pub use sort::partition_sort;

/// Direction an ordered sequence runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            Self::Ascending
        } else {
            Self::Descending
        }
    }

    pub fn is_ascending(self) -> bool {
        self == Self::Ascending
    }

    /// Maps a natural key comparison onto this direction: `Less` always
    /// means "comes first".
    pub(crate) fn orient(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}
