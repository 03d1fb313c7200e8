use std::ops::Index;

use crate::error::{RingError, RingResult};

/// Sorted sequence of ring positions with circular neighbour lookups.
///
/// Duplicate checks are the caller's job: `insert` places the value at its
/// ordered spot even if it is already present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedIndex {
    values: Vec<u64>,
}

impl SortedIndex {
    #[inline]
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<u64> {
        self.values.get(idx).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.values.iter().copied()
    }

    /// Smallest index whose value is `>= value`, or `len()` if there is none.
    #[inline]
    pub fn locate(&self, value: u64) -> usize {
        self.values.partition_point(|v| *v < value)
    }

    pub fn contains(&self, value: u64) -> bool {
        self.get(self.locate(value)) == Some(value)
    }

    /// Inserts preserving order and returns the index the value landed on.
    pub fn insert(&mut self, value: u64) -> usize {
        let idx = self.locate(value);
        self.values.insert(idx, value);
        idx
    }

    pub fn remove_at(&mut self, idx: usize) -> RingResult<u64> {
        if idx >= self.values.len() {
            return Err(RingError::OutOfBounds {
                index: idx,
                len: self.values.len(),
            });
        }

        Ok(self.values.remove(idx))
    }

    /// Removes `value` if present. Returns whether anything was removed.
    pub fn remove(&mut self, value: u64) -> bool {
        let idx = self.locate(value);
        if self.get(idx) != Some(value) {
            return false;
        }

        self.values.remove(idx);
        true
    }

    #[inline]
    pub fn prev_index(&self, idx: usize) -> usize {
        match idx.checked_sub(1) {
            Some(prev) => prev,
            None => self.values.len().saturating_sub(1),
        }
    }

    #[inline]
    pub fn next_index(&self, idx: usize) -> usize {
        if idx + 1 >= self.values.len() {
            0
        } else {
            idx + 1
        }
    }
}

impl Index<usize> for SortedIndex {
    type Output = u64;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.values[idx]
    }
}

impl From<Vec<u64>> for SortedIndex {
    fn from(mut values: Vec<u64>) -> Self {
        values.sort_unstable();
        values.dedup();
        Self { values }
    }
}
