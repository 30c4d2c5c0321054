//! Token recognition automaton over equivalence codes
//!
//! A [`TrieBuilder`] registers token patterns one at a time; [`TrieBuilder::finish`]
//! compacts the result into an immutable [`Trie`] that scanners drive one code
//! at a time. Every node carries the best `(token, length, priority)` reachable
//! by stopping there, so a scanner can stop at any leaf and read its answer.
//!
//! Nodes may carry a blank trie: while sitting on such a node the scanner may
//! skip up to `max_blanks_to_scan` blank-class codes before continuing in the
//! blank trie's own subtree.

pub mod builder;
pub mod error;
pub mod priority;

pub use builder::TrieBuilder;
pub use error::{TrieError, TrieResult};
pub use priority::Priority;

use crate::partition::EquivCode;
use std::sync::Arc;

/// Identifier of a registered token; `NO_TOKEN` means nothing matched
pub type TokenId = u32;

pub const NO_TOKEN: TokenId = 0;

pub(crate) type NodeId = usize;

pub(crate) const ROOT: NodeId = 0;

/// Result of a recognition: the matched token and how many codes it covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recognition {
    pub token: TokenId,
    pub length: usize,
}

impl Recognition {
    pub fn is_match(&self) -> bool {
        self.token != NO_TOKEN
    }
}

/// Two tokens registered with the same pattern length and priority at one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ambiguity {
    /// Token kept by the automaton
    pub existing: TokenId,
    /// Token that lost the tie
    pub incoming: TokenId,
}

#[derive(Debug, Clone)]
pub(crate) struct TrieNode {
    pub(crate) token: TokenId,
    pub(crate) token_length: u32,
    pub(crate) priority: Priority,
    /// Match ends in an open blank run, so blanks scanned past this leaf extend it
    pub(crate) includes_blanks: bool,
    /// First of `n_codes` contiguous children
    pub(crate) children: Option<NodeId>,
    /// Only ever present on nodes without children
    pub(crate) blank: Option<BlankTrie>,
}

impl Default for TrieNode {
    fn default() -> Self {
        Self {
            token: NO_TOKEN,
            token_length: 0,
            priority: Priority::DATA,
            includes_blanks: false,
            children: None,
            blank: None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct BlankTrie {
    pub(crate) root: NodeId,
    /// Codes consumed before the blank run starts, counted into the final length
    pub(crate) additional_length: u32,
    pub(crate) max_blanks_to_scan: usize,
    pub(crate) codes: Arc<[bool]>,
}

/// Frozen automaton.
///
/// Holds no interior mutability and can be shared across threads.
#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Box<[TrieNode]>,
    n_codes: usize,
}

impl Trie {
    pub(crate) fn from_parts(nodes: Vec<TrieNode>, n_codes: usize) -> Self {
        Self {
            nodes: nodes.into_boxed_slice(),
            n_codes,
        }
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            trie: self,
            id: ROOT,
        }
    }

    /// Alphabet size, including the end-of-entity code
    pub fn n_codes(&self) -> usize {
        self.n_codes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn blank_trie_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.blank.is_some()).count()
    }

    /// Longest registered token at the start of `codes`.
    ///
    /// Descends until a leaf; a leaf with a blank trie then skips blank codes
    /// (up to its budget) and continues in the blank trie. When the blank trie
    /// yields nothing, the leaf's own match is reported, counting the skipped
    /// blanks only if that match itself ends in the blank run. Exhausted input
    /// stops at the current node.
    pub fn recognize<I>(&self, codes: I) -> Recognition
    where
        I: IntoIterator<Item = EquivCode>,
    {
        let mut input = codes.into_iter();
        let mut pos = self.root();

        while pos.has_next() {
            match input.next().and_then(|code| pos.next(code)) {
                Some(next) => pos = next,
                None => return pos.recognition(),
            }
        }

        let blank = match pos.blank() {
            Some(blank) => blank,
            None => return pos.recognition(),
        };

        let mut new_pos = blank.node();
        let mut n_blanks = 0;
        let mut exhausted = false;
        while n_blanks < blank.max_blanks_to_scan() {
            let code = match input.next() {
                Some(code) => code,
                None => {
                    exhausted = true;
                    break;
                }
            };
            if !blank.code_is_blank(code) {
                if let Some(next) = new_pos.next(code) {
                    new_pos = next;
                }
                break;
            }
            n_blanks += 1;
        }

        while !exhausted && new_pos.has_next() {
            match input.next().and_then(|code| new_pos.next(code)) {
                Some(next) => new_pos = next,
                None => break,
            }
        }

        if new_pos.token() != NO_TOKEN {
            Recognition {
                token: new_pos.token(),
                length: new_pos.token_length() + blank.additional_length() + n_blanks,
            }
        } else {
            let blanks = if pos.includes_blanks() { n_blanks } else { 0 };
            Recognition {
                token: pos.token(),
                length: pos.token_length() + blanks,
            }
        }
    }
}

/// Read-only handle on one node of a frozen trie
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    trie: &'a Trie,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    fn node(&self) -> &'a TrieNode {
        &self.trie.nodes[self.id]
    }

    pub fn token(&self) -> TokenId {
        self.node().token
    }

    pub fn token_length(&self) -> usize {
        self.node().token_length as usize
    }

    pub fn priority(&self) -> Priority {
        self.node().priority
    }

    /// Whether blanks skipped past this leaf count towards its match
    pub fn includes_blanks(&self) -> bool {
        self.node().includes_blanks
    }

    pub fn recognition(&self) -> Recognition {
        Recognition {
            token: self.token(),
            length: self.token_length(),
        }
    }

    pub fn has_next(&self) -> bool {
        self.node().children.is_some()
    }

    /// Child for `code`; `None` at a leaf or for a code outside the alphabet
    #[inline]
    pub fn next(&self, code: EquivCode) -> Option<NodeRef<'a>> {
        let code = code as usize;
        match self.node().children {
            Some(first) if code < self.trie.n_codes => Some(NodeRef {
                trie: self.trie,
                id: first + code,
            }),
            _ => None,
        }
    }

    pub fn blank(&self) -> Option<BlankRef<'a>> {
        self.node().blank.as_ref().map(|blank| BlankRef {
            trie: self.trie,
            blank,
        })
    }
}

/// Read-only handle on a blank trie attached to a leaf
#[derive(Debug, Clone, Copy)]
pub struct BlankRef<'a> {
    trie: &'a Trie,
    blank: &'a BlankTrie,
}

impl<'a> BlankRef<'a> {
    /// Root of the continuation after the blank run
    pub fn node(&self) -> NodeRef<'a> {
        NodeRef {
            trie: self.trie,
            id: self.blank.root,
        }
    }

    pub fn additional_length(&self) -> usize {
        self.blank.additional_length as usize
    }

    pub fn max_blanks_to_scan(&self) -> usize {
        self.blank.max_blanks_to_scan
    }

    pub fn code_is_blank(&self, code: EquivCode) -> bool {
        self.blank.codes.get(code as usize).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_trie_is_shareable() {
        assert_send_sync::<Trie>();
    }

    #[test]
    fn test_empty_trie_recognizes_nothing() {
        let trie = TrieBuilder::new(4).finish();
        assert_eq!(trie.recognize([1, 2, 3]), Recognition::default());
        assert_eq!(trie.node_count(), 1);
        assert!(!trie.recognize(Vec::new()).is_match());
    }

    #[test]
    fn test_node_navigation() {
        let mut builder = TrieBuilder::new(4);
        builder.recognize(&[1, 2], 7, Priority::DELIM).unwrap();
        let trie = builder.finish();

        let root = trie.root();
        assert!(root.has_next());
        let one = root.next(1).unwrap();
        assert_eq!(one.token(), NO_TOKEN);
        let two = one.next(2).unwrap();
        assert_eq!(two.recognition(), Recognition { token: 7, length: 2 });
        assert!(!two.has_next());
        assert!(two.next(0).is_none());
        assert!(root.next(9).is_none());
    }

    #[test]
    fn test_out_of_range_code_stops_descent() {
        let mut builder = TrieBuilder::new(3);
        builder.recognize(&[1], 5, Priority::DELIM).unwrap();
        builder.recognize(&[1, 2], 6, Priority::DELIM).unwrap();
        let trie = builder.finish();

        assert_eq!(trie.recognize([1, 99]), Recognition { token: 5, length: 1 });
    }

    #[test]
    fn test_blank_ref_accessors() {
        let mut builder = TrieBuilder::new(4);
        builder
            .recognize_b(&[1], 0, 2, &[3], &[2], 9)
            .unwrap();
        let trie = builder.finish();

        let leaf = trie.root().next(1).unwrap();
        let blank = leaf.blank().unwrap();
        assert_eq!(blank.additional_length(), 1);
        assert_eq!(blank.max_blanks_to_scan(), 2);
        assert!(blank.code_is_blank(3));
        assert!(!blank.code_is_blank(2));
        assert!(!blank.code_is_blank(100));
        assert_eq!(trie.blank_trie_count(), 1);
    }
}
