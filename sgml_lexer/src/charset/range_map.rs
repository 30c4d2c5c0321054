//! Ordered range-to-range affine mappings with inverse lookup

use super::interval_set::IntervalSet;
use super::Domain;

/// `[from_min, from_max]` maps onto `[to_min, to_min + (from_max - from_min)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeMapEntry<From, To> {
    pub from_min: From,
    pub from_max: From,
    pub to_min: To,
}

impl<From: Domain, To: Domain> RangeMapEntry<From, To> {
    fn to_max(&self) -> u64 {
        self.to_min.to_u64() + (self.from_max.to_u64() - self.from_min.to_u64())
    }

    /// Signed offset `to - from`; entries with equal offsets may coalesce
    fn offset(&self) -> i128 {
        self.to_min.to_u64() as i128 - self.from_min.to_u64() as i128
    }
}

/// Result of a forward lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeLookup<From, To> {
    /// Mapped value, `None` when `from` is not covered
    pub to: Option<To>,
    /// Largest `from` for which the same answer shape holds: the end of the
    /// covering entry, or the end of the unmapped gap
    pub also_max: From,
}

/// Result of an inverse lookup.
///
/// `count` is a conservative run length: for every `k < count`, looking up
/// `to + k` yields the same variant with each `from` advanced by `k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InverseLookup<From> {
    None { count: u64 },
    Unique { from: From, count: u64 },
    Multiple { from_set: IntervalSet<From>, count: u64 },
}

impl<From> InverseLookup<From> {
    pub fn count(&self) -> u64 {
        match self {
            Self::None { count } | Self::Unique { count, .. } | Self::Multiple { count, .. } => {
                *count
            }
        }
    }

    /// 0, 1 or 2 (meaning two or more)
    pub fn ret(&self) -> u32 {
        match self {
            Self::None { .. } => 0,
            Self::Unique { .. } => 1,
            Self::Multiple { .. } => 2,
        }
    }
}

/// Ordered, non-overlapping set of affine range mappings.
///
/// Newer ranges take precedence: `add_range` truncates or deletes whatever it
/// overlaps, then merges with neighbours that share its offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeMap<From, To> {
    entries: Vec<RangeMapEntry<From, To>>,
}

impl<From, To> Default for RangeMap<From, To> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<From: Domain, To: Domain> RangeMap<From, To> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_range(&mut self, from_min: From, from_max: From, to_min: To) {
        debug_assert!(from_min <= from_max);
        debug_assert!(
            to_min.to_u64().checked_add(from_max.to_u64() - from_min.to_u64())
                .is_some_and(|to_max| to_max <= To::MAX.to_u64()),
            "target range overflows its domain"
        );

        let start = self.entries.partition_point(|e| e.from_max < from_min);
        let end = self.entries.partition_point(|e| e.from_min <= from_max);

        let mut replacement = Vec::with_capacity(3);
        if start < end {
            let first = self.entries[start];
            if first.from_min < from_min {
                replacement.push(RangeMapEntry {
                    from_min: first.from_min,
                    from_max: From::from_u64(from_min.to_u64() - 1),
                    to_min: first.to_min,
                });
            }
        }
        let new_index = start + replacement.len();
        replacement.push(RangeMapEntry {
            from_min,
            from_max,
            to_min,
        });
        if start < end {
            let last = self.entries[end - 1];
            if last.from_max > from_max {
                let skipped = from_max.to_u64() + 1 - last.from_min.to_u64();
                replacement.push(RangeMapEntry {
                    from_min: From::from_u64(from_max.to_u64() + 1),
                    from_max: last.from_max,
                    to_min: To::from_u64(last.to_min.to_u64() + skipped),
                });
            }
        }
        self.entries.splice(start..end, replacement);

        // Coalesce with the following entry, then the preceding one
        if self.mergeable(new_index) {
            let next = self.entries.remove(new_index + 1);
            self.entries[new_index].from_max = next.from_max;
        }
        if new_index > 0 && self.mergeable(new_index - 1) {
            let current = self.entries.remove(new_index);
            self.entries[new_index - 1].from_max = current.from_max;
        }

        debug_assert!(self.is_consistent(), "range map corrupted: {:?}", self.entries);
    }

    /// Entry `i` and entry `i + 1` are adjacent and share an offset
    fn mergeable(&self, i: usize) -> bool {
        match (self.entries.get(i), self.entries.get(i + 1)) {
            (Some(a), Some(b)) => {
                a.from_max.to_u64() + 1 == b.from_min.to_u64() && a.offset() == b.offset()
            }
            _ => false,
        }
    }

    pub fn map(&self, from: From) -> RangeLookup<From, To> {
        let idx = self.entries.partition_point(|e| e.from_max < from);
        match self.entries.get(idx) {
            Some(e) if e.from_min <= from => RangeLookup {
                to: Some(To::from_u64(
                    e.to_min.to_u64() + (from.to_u64() - e.from_min.to_u64()),
                )),
                also_max: e.from_max,
            },
            Some(e) => RangeLookup {
                to: None,
                also_max: From::from_u64(e.from_min.to_u64() - 1),
            },
            None => RangeLookup {
                to: None,
                also_max: From::MAX,
            },
        }
    }

    pub fn inverse_map(&self, to: To) -> InverseLookup<From> {
        let target = to.to_u64();
        let mut hits: Vec<From> = Vec::new();
        // Saturates when the whole of a 64-bit target domain is counted
        let mut count = (To::MAX.to_u64() - target).saturating_add(1);

        for entry in &self.entries {
            let lo = entry.to_min.to_u64();
            let hi = entry.to_max();
            if lo <= target && target <= hi {
                hits.push(From::from_u64(
                    entry.from_min.to_u64() + (target - lo),
                ));
                count = count.min((hi - target).saturating_add(1));
            } else if lo > target {
                count = count.min(lo - target);
            }
        }

        match hits.len() {
            0 => InverseLookup::None { count },
            1 => InverseLookup::Unique {
                from: hits[0],
                count,
            },
            _ => InverseLookup::Multiple {
                from_set: hits.into_iter().collect(),
                count,
            },
        }
    }

    pub fn entries(&self) -> &[RangeMapEntry<From, To>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_consistent(&self) -> bool {
        self.entries.iter().all(|e| e.from_min <= e.from_max)
            && self.entries.windows(2).all(|w| {
                let adjacent = w[0].from_max.to_u64() + 1 == w[1].from_min.to_u64();
                w[0].from_max < w[1].from_min && !(adjacent && w[0].offset() == w[1].offset())
            })
    }
}
