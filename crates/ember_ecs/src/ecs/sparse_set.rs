//! # Sparse Set
//!
//! Index-mapping structure with O(1) insert/remove/membership and dense
//! iteration. One sparse set exists per component type; it tracks which
//! entity indices currently own that component.
//!
//! ```text
//! sparse: [ -, 2, -, 0, 1 ]     entity index -> dense position
//! dense:  [ 3, 4, 1 ]           dense position -> entity index
//! ```
//!
//! Removal swaps the last dense element into the freed slot, so dense order
//! is insertion order only until the first removal.

use std::ops::Index;

/// Dense/sparse index map over entity indices.
#[derive(Clone, Debug, Default)]
pub struct SparseSet {
    /// Entity indices that are present, densely packed.
    dense: Vec<u32>,
    /// Entity index -> position in `dense`. Stale slots are tolerated and
    /// rejected by [`SparseSet::find`].
    sparse: Vec<u32>,
}

impl SparseSet {
    /// Creates an empty sparse set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dense: Vec::new(),
            sparse: Vec::new(),
        }
    }

    /// Creates an empty sparse set with room for `capacity` dense entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            dense: Vec::with_capacity(capacity),
            sparse: Vec::new(),
        }
    }

    /// Inserts `value` into the set.
    ///
    /// If `value` is already present its dense slot is overwritten in place,
    /// which leaves the structure unchanged. Duplicate detection is the
    /// caller's job.
    pub fn insert(&mut self, value: u32) {
        if let Some(position) = self.find(value) {
            self.dense[position] = value;
            return;
        }

        let slot = value as usize;
        if slot >= self.sparse.len() {
            self.sparse.resize(slot + 1, u32::MAX);
        }
        self.sparse[slot] = self.dense.len() as u32;
        self.dense.push(value);
    }

    /// Removes `value` with a swap-with-last.
    ///
    /// # Returns
    ///
    /// The dense position `value` occupied, which now holds the former last
    /// element (or is past the end if `value` was last). The paired component
    /// storage must swap-remove the same position. Returns `None`, after
    /// logging a warning, if `value` was not in the set.
    pub fn remove(&mut self, value: u32) -> Option<usize> {
        let Some(position) = self.find(value) else {
            tracing::warn!(
                "attempted to remove {} from a sparse set it does not belong to",
                value
            );
            return None;
        };

        let removed = self.dense.swap_remove(position);
        debug_assert_eq!(removed, value);
        if position < self.dense.len() {
            let moved = self.dense[position];
            self.sparse[moved as usize] = position as u32;
        }
        self.sparse[value as usize] = u32::MAX;

        Some(position)
    }

    /// Returns the dense position of `value`, or `None` if absent.
    #[inline]
    #[must_use]
    pub fn find(&self, value: u32) -> Option<usize> {
        let position = *self.sparse.get(value as usize)? as usize;
        match self.dense.get(position) {
            Some(&stored) if stored == value => Some(position),
            _ => None,
        }
    }

    /// Checks whether `value` is present.
    #[inline]
    #[must_use]
    pub fn contains(&self, value: u32) -> bool {
        self.find(value).is_some()
    }

    /// Returns the number of values present.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns `true` if the set holds no values.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.dense.clear();
        self.sparse.clear();
    }

    /// Returns the dense array.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.dense
    }

    /// Iterates over the values in dense order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.dense.iter().copied()
    }
}

impl Index<usize> for SparseSet {
    type Output = u32;

    #[inline]
    fn index(&self, position: usize) -> &u32 {
        &self.dense[position]
    }
}
