//! Four-level compressed radix map from characters to values
//!
//! Each node is either a scalar covering its whole subrange or an array of
//! children. Subranges are materialized only where values diverge and collapse
//! back to a scalar as soon as they become uniform again, so a map over a
//! 31-bit domain with a handful of distinct characters stays a few kilobytes.
//! Levels are named plane, page, column and cell from the top down.

use super::error::CharsetResult;
use super::{domain_max, validate_domain_bits, Char};
use std::ops::Index;

const LEVELS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
enum Node<T> {
    Scalar(T),
    Children(Box<[Node<T>]>),
}

/// Bit widths and spans of the four levels for one domain width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LevelLayout {
    bits: u32,
    widths: [u32; LEVELS],
    /// `spans[d]` is the number of characters covered by a node at depth `d`
    spans: [u64; LEVELS + 1],
}

impl LevelLayout {
    fn new(bits: u32) -> Self {
        let base = bits / 4;
        let extra = bits % 4;
        // Lower levels take the leftover bits first: 31 bits -> 7/8/8/8
        let widths = [
            base,
            base + u32::from(extra >= 3),
            base + u32::from(extra >= 2),
            base + u32::from(extra >= 1),
        ];

        let mut spans = [0u64; LEVELS + 1];
        spans[0] = 1u64 << bits;
        for depth in 0..LEVELS {
            spans[depth + 1] = spans[depth] >> widths[depth];
        }
        debug_assert_eq!(spans[LEVELS], 1);

        Self {
            bits,
            widths,
            spans,
        }
    }

    #[inline]
    fn child_index(&self, depth: usize, c: u64) -> usize {
        ((c / self.spans[depth + 1]) & ((1u64 << self.widths[depth]) - 1)) as usize
    }

    #[inline]
    fn fanout(&self, depth: usize) -> usize {
        1usize << self.widths[depth]
    }
}

/// Compressed map from `Char` to `T`.
///
/// Lookups descend at most four levels and stop at the first scalar. Indexing
/// with a character above `max_char()` is a caller error: validation builds
/// assert, release builds mask the character into the domain.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedCharMap<T> {
    root: Node<T>,
    layout: LevelLayout,
    max_char: Char,
}

impl<T: Clone + PartialEq> CompressedCharMap<T> {
    /// Create a map over a domain `bits` wide where every character maps to `default`
    pub fn new(bits: u32, default: T) -> CharsetResult<Self> {
        let bits = validate_domain_bits(bits)?;
        Ok(Self::with_layout(bits, default))
    }

    /// Map over the configured default domain width
    pub fn with_default_domain(default: T) -> Self {
        Self::with_layout(
            crate::config::compile_time::charset::DEFAULT_DOMAIN_BITS,
            default,
        )
    }

    fn with_layout(bits: u32, default: T) -> Self {
        Self {
            root: Node::Scalar(default),
            layout: LevelLayout::new(bits),
            max_char: domain_max(bits),
        }
    }

    pub fn domain_bits(&self) -> u32 {
        self.layout.bits
    }

    pub fn max_char(&self) -> Char {
        self.max_char
    }

    #[inline]
    fn clamp(&self, c: Char) -> u64 {
        debug_assert!(
            c <= self.max_char,
            "character {:#x} outside {}-bit domain",
            c,
            self.layout.bits
        );
        u64::from(c & self.max_char)
    }

    /// Value for `c`
    #[inline]
    pub fn get(&self, c: Char) -> &T {
        let c = self.clamp(c);
        let mut node = &self.root;
        let mut depth = 0;
        loop {
            match node {
                Node::Scalar(value) => return value,
                Node::Children(children) => {
                    node = &children[self.layout.child_index(depth, c)];
                    depth += 1;
                }
            }
        }
    }

    /// Scalar node covering `c` and the last character of that node
    fn leaf(&self, c: u64) -> (&T, u64) {
        let mut node = &self.root;
        let mut depth = 0;
        let mut lo = 0u64;
        loop {
            match node {
                Node::Scalar(value) => return (value, lo + self.layout.spans[depth] - 1),
                Node::Children(children) => {
                    let idx = self.layout.child_index(depth, c);
                    lo += idx as u64 * self.layout.spans[depth + 1];
                    node = &children[idx];
                    depth += 1;
                }
            }
        }
    }

    /// Value for `c` together with the largest character `m >= c` such that
    /// every character in `c..=m` has the same value
    pub fn get_range(&self, c: Char) -> (&T, Char) {
        let c = self.clamp(c);
        let (value, mut max) = self.leaf(c);
        let top = u64::from(self.max_char);

        while max < top {
            let (next, next_max) = self.leaf(max + 1);
            if next != value {
                break;
            }
            max = next_max;
        }

        (value, max as Char)
    }

    pub fn set_char(&mut self, c: Char, value: T) {
        self.set_range(c, c, value);
    }

    /// Assign `value` to every character in `min..=max`
    pub fn set_range(&mut self, min: Char, max: Char, value: T) {
        debug_assert!(min <= max, "inverted range {:#x}..={:#x}", min, max);
        let min = self.clamp(min);
        let max = self.clamp(max);
        let layout = self.layout;
        Self::set_in(&mut self.root, &layout, 0, 0, min, max, &value);
    }

    fn set_in(
        node: &mut Node<T>,
        layout: &LevelLayout,
        depth: usize,
        lo: u64,
        min: u64,
        max: u64,
        value: &T,
    ) {
        let hi = lo + layout.spans[depth] - 1;
        if min <= lo && hi <= max {
            *node = Node::Scalar(value.clone());
            return;
        }

        if let Node::Scalar(current) = node {
            if current == value {
                return;
            }
            let fill = current.clone();
            *node = Node::Children(vec![Node::Scalar(fill); layout.fanout(depth)].into_boxed_slice());
        }

        let collapsed = match node {
            Node::Children(children) => {
                let span = layout.spans[depth + 1];
                let first = ((min.max(lo) - lo) / span) as usize;
                let last = ((max.min(hi) - lo) / span) as usize;
                for (idx, child) in children.iter_mut().enumerate().take(last + 1).skip(first) {
                    Self::set_in(child, layout, depth + 1, lo + idx as u64 * span, min, max, value);
                }

                match children.first() {
                    Some(Node::Scalar(head))
                        if children
                            .iter()
                            .all(|child| matches!(child, Node::Scalar(v) if v == head)) =>
                    {
                        Some(head.clone())
                    }
                    _ => None,
                }
            }
            Node::Scalar(_) => None,
        };

        if let Some(uniform) = collapsed {
            *node = Node::Scalar(uniform);
        }
    }

    /// Reset every character to `value`, releasing all child arrays
    pub fn set_all(&mut self, value: T) {
        self.root = Node::Scalar(value);
    }

    /// Number of allocated nodes, scalars included
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            count += 1;
            if let Node::Children(children) = node {
                stack.extend(children.iter());
            }
        }
        count
    }

    /// Iterate maximal runs `(min, max, value)` covering the whole domain
    pub fn runs(&self) -> impl Iterator<Item = (Char, Char, &T)> + '_ {
        let top = u64::from(self.max_char);
        let mut next = Some(0u64);
        std::iter::from_fn(move || {
            let c = next?;
            let (value, max) = self.get_range(c as Char);
            next = if u64::from(max) < top {
                Some(u64::from(max) + 1)
            } else {
                None
            };
            Some((c as Char, max, value))
        })
    }
}

impl<T: Clone + PartialEq> Index<Char> for CompressedCharMap<T> {
    type Output = T;

    fn index(&self, c: Char) -> &T {
        self.get(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::CharsetError;
    use assert_matches::assert_matches;

    #[test]
    fn test_level_widths() {
        assert_eq!(LevelLayout::new(31).widths, [7, 8, 8, 8]);
        assert_eq!(LevelLayout::new(21).widths, [5, 5, 5, 6]);
        assert_eq!(LevelLayout::new(16).widths, [4, 4, 4, 4]);
        assert_eq!(LevelLayout::new(32).widths, [8, 8, 8, 8]);
        assert_eq!(LevelLayout::new(1).widths, [0, 0, 0, 1]);
    }

    #[test]
    fn test_invalid_domain_width() {
        assert_matches!(
            CompressedCharMap::new(0, 0u32),
            Err(CharsetError::InvalidDomainWidth { .. })
        );
    }

    #[test]
    fn test_fresh_map_is_single_node() {
        let map = CompressedCharMap::new(31, 7u32).unwrap();
        assert_eq!(map.node_count(), 1);
        assert_eq!(map[0], 7);
        assert_eq!(map[0x7fff_ffff], 7);
        assert_eq!(map.get_range(12345), (&7, 0x7fff_ffff));
    }

    #[test]
    fn test_set_char_materializes_one_path() {
        let mut map = CompressedCharMap::new(31, 0u32).unwrap();
        map.set_char(0x41, 5);

        assert_eq!(map[0x41], 5);
        assert_eq!(map[0x40], 0);
        assert_eq!(map[0x42], 0);
        assert_eq!(map[0x1234_5678], 0);
        // root + 128 planes + 256 pages + 256 columns + 256 cells
        assert_eq!(map.node_count(), 1 + 128 + 256 + 256 + 256);
    }

    #[test]
    fn test_set_range_values() {
        let mut map = CompressedCharMap::new(21, 0u8).unwrap();
        map.set_range(0x100, 0x2ffff, 3);

        assert_eq!(map[0xff], 0);
        assert_eq!(map[0x100], 3);
        assert_eq!(map[0x1_0000], 3);
        assert_eq!(map[0x2ffff], 3);
        assert_eq!(map[0x3_0000], 0);
    }

    #[test]
    fn test_uniform_subrange_collapses() {
        let mut map = CompressedCharMap::new(16, 0u32).unwrap();
        map.set_char(0x41, 1);
        assert!(map.node_count() > 1);

        map.set_char(0x41, 0);
        assert_eq!(map.node_count(), 1);

        map.set_range(0, 0x7fff, 9);
        map.set_range(0x8000, 0xffff, 9);
        assert_eq!(map.node_count(), 1);
        assert_eq!(map[0x1234], 9);
    }

    #[test]
    fn test_get_range_spans_equal_neighbours() {
        let mut map = CompressedCharMap::new(16, 0u32).unwrap();
        map.set_range(0x10, 0x2ff, 4);
        map.set_char(0x300, 5);

        assert_eq!(map.get_range(0x10), (&4, 0x2ff));
        assert_eq!(map.get_range(0x200), (&4, 0x2ff));
        assert_eq!(map.get_range(0x300), (&5, 0x300));
        assert_eq!(map.get_range(0x0), (&0, 0xf));
        assert_eq!(map.get_range(0x301), (&0, 0xffff));
    }

    #[test]
    fn test_set_all_restores_fresh_behaviour() {
        let mut map = CompressedCharMap::new(31, 0u32).unwrap();
        map.set_range(0x20, 0x7e, 1);
        map.set_char(0x10_ffff, 2);
        map.set_all(6);

        let fresh = CompressedCharMap::new(31, 6u32).unwrap();
        assert_eq!(map, fresh);
        assert_eq!(map.node_count(), 1);
    }

    #[test]
    fn test_full_32_bit_domain() {
        let mut map = CompressedCharMap::new(32, false).unwrap();
        map.set_char(u32::MAX, true);
        assert!(map[u32::MAX]);
        assert!(!map[u32::MAX - 1]);
        assert_eq!(map.get_range(u32::MAX), (&true, u32::MAX));
    }

    #[test]
    fn test_runs_cover_domain() {
        let mut map = CompressedCharMap::new(8, 0u32).unwrap();
        map.set_range(10, 19, 1);
        map.set_char(200, 2);

        let runs: Vec<_> = map.runs().map(|(lo, hi, v)| (lo, hi, *v)).collect();
        assert_eq!(
            runs,
            vec![(0, 9, 0), (10, 19, 1), (20, 199, 0), (200, 200, 2), (201, 255, 0)]
        );
    }

    #[test]
    fn test_matches_naive_model() {
        let mut map = CompressedCharMap::new(12, 0u16).unwrap();
        let mut model = vec![0u16; 1 << 12];
        let mut state: u32 = 7;

        for round in 0..300u16 {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let a = (state >> 12) % 4096;
            let len = (state >> 4) % 300;
            let b = (a + len).min(4095);
            let value = round % 5;
            map.set_range(a, b, value);
            model[a as usize..=b as usize].iter_mut().for_each(|m| *m = value);
        }

        for (c, expected) in model.iter().enumerate() {
            assert_eq!(map[c as Char], *expected);
        }
    }
}
