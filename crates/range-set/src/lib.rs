//! A growable collection type for storing non-overlapping ranges.
//!
//! `RangeSet` keeps a collection of `Range<usize>` values sorted by their
//! start positions. Overlapping and adjacent ranges are merged as soon as they
//! are inserted, so the set never holds two ranges that touch.
//!
//! The memory simulator uses it as the free-interval list of the contiguous
//! allocator: carving an allocation out of a free interval is a
//! [`RangeSet::remove`], and releasing a block is a [`RangeSet::insert`] that
//! coalesces with its neighbours.
//!
//! # Examples
//!
//! ```
//! use range_set::RangeSet;
//!
//! let mut set = RangeSet::new();
//!
//! set.insert(1..5);
//! set.insert(7..10);
//! set.insert(4..8); // bridges both ranges
//!
//! assert_eq!(set.as_slice(), &[1..10]);
//!
//! set.remove(3..6);
//! assert_eq!(set.as_slice(), &[1..3, 6..10]);
//! assert_eq!(set.total_len(), 6);
//! assert_eq!(set.max_len(), 4);
//! ```
//!
//! # Performance
//!
//! - Insert: O(n) worst case, where n is the number of stored ranges
//! - Remove: O(n) worst case
//! - `total_len` / `max_len`: O(n)

#![cfg_attr(not(test), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use core::{mem, ops::Range, slice};

/// A collection of non-overlapping, non-adjacent ranges in sorted order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct RangeSet {
    ranges: Vec<Range<usize>>,
}

impl RangeSet {
    /// Creates a new empty `RangeSet`.
    ///
    /// ```
    /// use range_set::RangeSet;
    ///
    /// let set = RangeSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Creates a set holding the single range `range`.
    ///
    /// An empty range yields an empty set.
    #[must_use]
    pub fn from_range(range: Range<usize>) -> Self {
        let mut this = Self::new();
        this.insert(range);
        this
    }

    /// Returns an iterator over the ranges in ascending start order.
    pub fn iter(&self) -> slice::Iter<'_, Range<usize>> {
        self.ranges.iter()
    }

    /// Returns a slice containing all ranges in ascending start order.
    #[must_use]
    pub fn as_slice(&self) -> &[Range<usize>] {
        self.ranges.as_slice()
    }

    /// Returns the range stored at `index`, counting in start order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Range<usize>> {
        self.ranges.get(index)
    }

    /// Returns the number of disjoint ranges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns `true` if the set contains no ranges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Returns the sum of the lengths of all ranges.
    ///
    /// ```
    /// use range_set::RangeSet;
    ///
    /// let set: RangeSet = [0..4, 10..12].into_iter().collect();
    /// assert_eq!(set.total_len(), 6);
    /// ```
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.ranges.iter().map(ExactSizeIterator::len).sum()
    }

    /// Returns the length of the longest range, or 0 for an empty set.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.ranges
            .iter()
            .map(ExactSizeIterator::len)
            .max()
            .unwrap_or(0)
    }

    /// Returns `true` if any stored range shares at least one point with
    /// `range`.
    #[must_use]
    pub fn overlaps(&self, range: &Range<usize>) -> bool {
        self.ranges
            .iter()
            .any(|r| r.start < range.end && range.start < r.end)
    }

    /// Inserts a range into the set.
    ///
    /// Ranges overlapping or adjacent to `insert_range` are merged with it.
    ///
    /// # Panics
    ///
    /// Panics if `insert_range.start > insert_range.end`.
    ///
    /// ```
    /// use range_set::RangeSet;
    ///
    /// let mut set = RangeSet::new();
    /// set.insert(1..3);
    /// set.insert(3..5); // adjacent
    /// assert_eq!(set.as_slice(), &[1..5]);
    /// ```
    pub fn insert(&mut self, insert_range: Range<usize>) {
        assert!(
            insert_range.start <= insert_range.end,
            "Invalid range: {insert_range:?}"
        );
        if insert_range.is_empty() {
            return;
        }

        let mut ir = insert_range;
        let mut ranges = mem::take(&mut self.ranges).into_iter();
        self.ranges.reserve(ranges.len() + 1);
        let mut inserted = false;
        for r in ranges.by_ref() {
            if ir.end < r.start {
                self.ranges.push(ir.clone());
                self.ranges.push(r);
                inserted = true;
                break;
            }
            if ir.start > r.end {
                self.ranges.push(r);
                continue;
            }
            ir.start = usize::min(ir.start, r.start);
            ir.end = usize::max(ir.end, r.end);
        }
        if inserted {
            self.ranges.extend(ranges);
        } else {
            self.ranges.push(ir);
        }
    }

    /// Removes a range from the set.
    ///
    /// Stored ranges overlapping `remove_range` are trimmed or split.
    ///
    /// # Panics
    ///
    /// Panics if `remove_range.start > remove_range.end`.
    ///
    /// ```
    /// use range_set::RangeSet;
    ///
    /// let mut set = RangeSet::from_range(1..10);
    /// set.remove(3..7);
    /// assert_eq!(set.as_slice(), &[1..3, 7..10]);
    /// ```
    pub fn remove(&mut self, remove_range: Range<usize>) {
        assert!(
            remove_range.start <= remove_range.end,
            "Invalid range: {remove_range:?}"
        );
        if remove_range.is_empty() {
            return;
        }

        let rr = remove_range;
        let mut ranges = mem::take(&mut self.ranges).into_iter();
        self.ranges.reserve(ranges.len() + 1);
        for r in ranges.by_ref() {
            if rr.end <= r.start {
                self.ranges.push(r);
                break;
            }
            if r.start < rr.end && rr.start < r.end {
                if r.start < rr.start {
                    self.ranges.push(r.start..rr.start);
                }
                if rr.end < r.end {
                    self.ranges.push(rr.end..r.end);
                }
            } else {
                self.ranges.push(r);
            }
        }
        self.ranges.extend(ranges);
    }
}

impl FromIterator<Range<usize>> for RangeSet {
    fn from_iter<T: IntoIterator<Item = Range<usize>>>(iter: T) -> Self {
        let mut this = Self::new();
        this.extend(iter);
        this
    }
}

impl Extend<Range<usize>> for RangeSet {
    fn extend<T: IntoIterator<Item = Range<usize>>>(&mut self, iter: T) {
        for range in iter {
            self.insert(range);
        }
    }
}

impl<'a> IntoIterator for &'a RangeSet {
    type Item = &'a Range<usize>;
    type IntoIter = slice::Iter<'a, Range<usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}
