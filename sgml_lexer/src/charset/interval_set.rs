//! Sorted, disjoint, coalesced interval sets over a discrete domain

use super::error::{CharsetError, CharsetResult};
use super::Domain;

/// An inclusive `[min, max]` range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T: Domain> Interval<T> {
    pub fn new(min: T, max: T) -> Self {
        debug_assert!(min <= max);
        Self { min, max }
    }

    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    /// Number of values covered, saturating for a full 64-bit interval
    pub fn len(&self) -> u64 {
        (self.max.to_u64() - self.min.to_u64()).saturating_add(1)
    }
}

/// A set of values stored as ranges.
///
/// Ranges are kept strictly increasing, pairwise disjoint and never adjacent:
/// adding `[3, 4]` to `{[1, 2]}` yields `{[1, 4]}`. All neighbour arithmetic is
/// done in `u64` with saturation so that the top of the domain never wraps.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntervalSet<T> {
    ranges: Vec<Interval<T>>,
}

impl<T> Default for IntervalSet<T> {
    fn default() -> Self {
        Self { ranges: Vec::new() }
    }
}

impl<T: Domain> IntervalSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set holding the single range `[min, max]`
    pub fn from_range(min: T, max: T) -> Self {
        let mut set = Self::new();
        set.add_range(min, max);
        set
    }

    /// Like `from_range`, but rejects `min > max` instead of asserting
    pub fn try_from_range(min: T, max: T) -> CharsetResult<Self> {
        if min > max {
            return Err(CharsetError::inverted_range(min.to_u64(), max.to_u64()));
        }
        Ok(Self::from_range(min, max))
    }

    /// The whole domain of `T`
    pub fn full() -> Self {
        Self::from_range(T::MIN, T::MAX)
    }

    pub fn add(&mut self, value: T) {
        self.add_range(value, value);
    }

    /// Add `[min, max]`, merging every range it overlaps or touches
    pub fn add_range(&mut self, min: T, max: T) {
        debug_assert!(min <= max, "inverted range {:?}..={:?}", min, max);
        let lo = min.to_u64();
        let hi = max.to_u64();

        // First range that overlaps or is adjacent from below
        let start = self
            .ranges
            .partition_point(|r| r.max.to_u64().saturating_add(1) < lo);
        // One past the last range that overlaps or is adjacent from above
        let end = self
            .ranges
            .partition_point(|r| r.min.to_u64() <= hi.saturating_add(1));

        if start == end {
            self.ranges.insert(start, Interval::new(min, max));
        } else {
            let merged = Interval::new(
                min.min(self.ranges[start].min),
                max.max(self.ranges[end - 1].max),
            );
            self.ranges.splice(start..end, std::iter::once(merged));
        }

        self.debug_check();
    }

    pub fn remove(&mut self, value: T) {
        self.remove_range(value, value);
    }

    /// Remove `[min, max]`, shrinking or splitting the ranges it touches
    pub fn remove_range(&mut self, min: T, max: T) {
        debug_assert!(min <= max, "inverted range {:?}..={:?}", min, max);
        let start = self.ranges.partition_point(|r| r.max < min);
        let end = self.ranges.partition_point(|r| r.min <= max);
        if start >= end {
            return;
        }

        let mut kept: Vec<Interval<T>> = Vec::with_capacity(2);
        let first = self.ranges[start];
        let last = self.ranges[end - 1];
        if first.min < min {
            kept.push(Interval::new(first.min, T::from_u64(min.to_u64() - 1)));
        }
        if last.max > max {
            kept.push(Interval::new(T::from_u64(max.to_u64() + 1), last.max));
        }
        self.ranges.splice(start..end, kept);

        self.debug_check();
    }

    pub fn contains(&self, value: T) -> bool {
        let idx = self.ranges.partition_point(|r| r.max < value);
        idx < self.ranges.len() && self.ranges[idx].min <= value
    }

    /// Union with another set
    pub fn add_set(&mut self, other: &IntervalSet<T>) {
        for range in &other.ranges {
            self.add_range(range.min, range.max);
        }
    }

    /// Values present in both sets
    pub fn intersection(&self, other: &IntervalSet<T>) -> IntervalSet<T> {
        let mut result = Vec::new();
        let (mut i, mut j) = (0, 0);

        while i < self.ranges.len() && j < other.ranges.len() {
            let a = self.ranges[i];
            let b = other.ranges[j];
            let lo = a.min.max(b.min);
            let hi = a.max.min(b.max);
            if lo <= hi {
                result.push(Interval::new(lo, hi));
            }
            if a.max < b.max {
                i += 1;
            } else {
                j += 1;
            }
        }

        // Pieces come from disjoint, non-adjacent inputs, so they are already coalesced
        let set = IntervalSet { ranges: result };
        set.debug_check();
        set
    }

    /// Values present in `self` but not in `other`
    pub fn difference(&self, other: &IntervalSet<T>) -> IntervalSet<T> {
        let mut result = self.clone();
        for range in &other.ranges {
            result.remove_range(range.min, range.max);
        }
        result
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    /// Number of ranges (not elements)
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Total number of elements, saturating at `u64::MAX`
    pub fn cardinality(&self) -> u64 {
        self.ranges
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.len()))
    }

    pub fn is_singleton(&self) -> bool {
        self.ranges.len() == 1 && self.ranges[0].min == self.ranges[0].max
    }

    pub fn single_value(&self) -> Option<T> {
        if self.is_singleton() {
            Some(self.ranges[0].min)
        } else {
            None
        }
    }

    pub fn ranges(&self) -> &[Interval<T>] {
        &self.ranges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval<T>> {
        self.ranges.iter()
    }

    /// Iterate individual values in increasing order
    pub fn elements(&self) -> impl Iterator<Item = T> + '_ {
        self.ranges
            .iter()
            .flat_map(|r| (r.min.to_u64()..=r.max.to_u64()).map(T::from_u64))
    }

    /// Check ordering and coalescing
    pub fn is_consistent(&self) -> bool {
        self.ranges.iter().all(|r| r.min <= r.max)
            && self
                .ranges
                .windows(2)
                .all(|w| w[0].max.to_u64().saturating_add(1) < w[1].min.to_u64())
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert!(self.is_consistent(), "interval set corrupted: {:?}", self.ranges);
    }
}

impl<'a, T> IntoIterator for &'a IntervalSet<T> {
    type Item = &'a Interval<T>;
    type IntoIter = std::slice::Iter<'a, Interval<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

impl<T: Domain> FromIterator<T> for IntervalSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.add(value);
        }
        set
    }
}

impl<T: Domain> Extend<T> for IntervalSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}
