//! Incremental construction of the recognition trie
//!
//! Nodes live in one arena; a node's children are `n_codes` contiguous slots
//! allocated the first time the node is extended. New children start out with
//! their parent's current match so that shorter tokens stay answerable below
//! the point where a longer pattern diverges. All tree walks use explicit
//! worklists.

use super::error::{TrieError, TrieResult};
use super::{Ambiguity, BlankTrie, NodeId, Priority, TokenId, Trie, TrieNode, NO_TOKEN, ROOT};
use crate::config::compile_time::trie::{MAX_BLANK_RUN, MAX_TOKEN_LENGTH, MAX_TRIE_NODES};
use crate::config::runtime::lexer_preferences;
use crate::{log_success, logging::codes};
use crate::partition::EquivCode;
use std::collections::VecDeque;
use std::sync::Arc;

/// Mutable trie under construction.
///
/// `recognize_b` is all-or-nothing. Other registrations only fail part-way on
/// [`TrieError::NodeLimitExceeded`], after which the builder should be dropped
/// (see [`TrieError::requires_halt`]).
#[derive(Debug, Clone)]
pub struct TrieBuilder {
    nodes: Vec<TrieNode>,
    n_codes: usize,
    /// Ambiguities found during the registration in progress
    pending: Vec<Ambiguity>,
}

impl TrieBuilder {
    /// Builder for an alphabet of `n_codes` codes (`0..n_codes`)
    pub fn new(n_codes: usize) -> Self {
        debug_assert!(n_codes > 0);
        Self {
            nodes: vec![TrieNode::default()],
            n_codes,
            pending: Vec::new(),
        }
    }

    pub fn n_codes(&self) -> usize {
        self.n_codes
    }

    /// Arena size, including nodes that will be dropped by `finish`
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    /// Register `codes` as token `token`
    pub fn recognize(
        &mut self,
        codes: &[EquivCode],
        token: TokenId,
        priority: Priority,
    ) -> TrieResult<Vec<Ambiguity>> {
        self.check_token(token)?;
        if codes.is_empty() {
            return Err(TrieError::empty_pattern(token));
        }
        self.check_codes(codes)?;
        self.check_length(token, codes.len())?;

        self.pending.clear();
        let node = self.extend(ROOT, codes)?;
        self.set_token(node, codes.len() as u32, token, priority, false);
        Ok(std::mem::take(&mut self.pending))
    }

    /// Register `prefix` followed by any one code of `closing`
    pub fn recognize_closing(
        &mut self,
        prefix: &[EquivCode],
        closing: &[EquivCode],
        token: TokenId,
        priority: Priority,
    ) -> TrieResult<Vec<Ambiguity>> {
        self.check_token(token)?;
        if closing.is_empty() {
            return Err(TrieError::empty_pattern(token));
        }
        self.check_codes(prefix)?;
        self.check_codes(closing)?;
        self.check_length(token, prefix.len() + 1)?;

        self.pending.clear();
        let node = self.extend(ROOT, prefix)?;
        let length = prefix.len() as u32 + 1;
        for &code in closing {
            let end = self.force_next(node, code)?;
            self.set_token(end, length, token, priority, false);
        }
        Ok(std::mem::take(&mut self.pending))
    }

    /// Register `prefix`, then between `min` and `max` codes of `blank_codes`,
    /// then `suffix`.
    ///
    /// Blank runs up to `min` are spelled out in the trie. Past that point the
    /// leaf gets a blank trie that lets the scanner skip the remaining budget
    /// at match time; every path reaching a shared leaf must agree on that
    /// budget and on the number of codes consumed before it. A rejected
    /// registration leaves the builder unchanged.
    pub fn recognize_b(
        &mut self,
        prefix: &[EquivCode],
        min: usize,
        max: usize,
        blank_codes: &[EquivCode],
        suffix: &[EquivCode],
        token: TokenId,
    ) -> TrieResult<Vec<Ambiguity>> {
        self.check_token(token)?;
        if min > max || max > MAX_BLANK_RUN || blank_codes.is_empty() {
            return Err(TrieError::invalid_blank_run(token, min, max, blank_codes.len()));
        }
        if prefix.is_empty() && suffix.is_empty() && min == 0 {
            return Err(TrieError::empty_pattern(token));
        }
        self.check_codes(prefix)?;
        self.check_codes(blank_codes)?;
        self.check_codes(suffix)?;
        self.check_length(token, prefix.len() + max + suffix.len())?;

        self.pending.clear();
        let checkpoint = self.nodes.clone();
        match self.extend_blank_run(prefix, min, max, blank_codes, suffix, token) {
            Ok(()) => Ok(std::mem::take(&mut self.pending)),
            Err(e) => {
                self.nodes = checkpoint;
                self.pending.clear();
                Err(e)
            }
        }
    }

    /// Register `token` on the end-of-entity transition `code` from the root.
    ///
    /// The match has length 0: it consumes nothing from the input buffer.
    pub fn recognize_ee(&mut self, code: EquivCode, token: TokenId) -> TrieResult<()> {
        self.check_token(token)?;
        self.check_codes(&[code])?;

        let node = self.force_next(ROOT, code)?;
        let node = &mut self.nodes[node];
        node.token = token;
        node.token_length = 0;
        node.includes_blanks = false;
        Ok(())
    }

    // ========================================================================
    // FREEZING
    // ========================================================================

    /// Compact to the nodes reachable from the root and freeze
    pub fn finish(self) -> Trie {
        let n = self.n_codes;
        let mut compacted: Vec<TrieNode> = Vec::with_capacity(self.nodes.len());
        compacted.push(TrieNode::default());
        let mut queue = VecDeque::from([(ROOT, ROOT)]);

        while let Some((old, new)) = queue.pop_front() {
            let source = &self.nodes[old];
            let mut node = TrieNode {
                token: source.token,
                token_length: source.token_length,
                priority: source.priority,
                includes_blanks: source.includes_blanks,
                children: None,
                blank: None,
            };

            if let Some(first) = source.children {
                let base = compacted.len();
                compacted.resize_with(base + n, TrieNode::default);
                queue.extend((0..n).map(|i| (first + i, base + i)));
                node.children = Some(base);
            }
            if let Some(blank) = &source.blank {
                let root = compacted.len();
                compacted.push(TrieNode::default());
                queue.push_back((blank.root, root));
                node.blank = Some(BlankTrie {
                    root,
                    ..blank.clone()
                });
            }

            compacted[new] = node;
        }

        let trie = Trie::from_parts(compacted, n);
        if lexer_preferences().log_build_statistics {
            log_success!(
                codes::success::TRIE_FROZEN,
                "Recognition trie frozen",
                "nodes" => trie.node_count(),
                "dropped" => self.nodes.len().saturating_sub(trie.node_count()),
                "blank_tries" => trie.blank_trie_count(),
                "n_codes" => n
            );
        }
        trie
    }

    // ========================================================================
    // CORE OPERATIONS
    // ========================================================================

    fn check_token(&self, token: TokenId) -> TrieResult<()> {
        if token == NO_TOKEN {
            return Err(TrieError::ReservedTokenId);
        }
        Ok(())
    }

    fn check_codes(&self, codes: &[EquivCode]) -> TrieResult<()> {
        match codes.iter().find(|&&code| code as usize >= self.n_codes) {
            Some(&code) => Err(TrieError::code_out_of_range(code, self.n_codes)),
            None => Ok(()),
        }
    }

    fn check_length(&self, token: TokenId, length: usize) -> TrieResult<()> {
        if length > MAX_TOKEN_LENGTH as usize {
            return Err(TrieError::token_too_long(token, length));
        }
        Ok(())
    }

    fn extend_blank_run(
        &mut self,
        prefix: &[EquivCode],
        min: usize,
        max: usize,
        blank_codes: &[EquivCode],
        suffix: &[EquivCode],
        token: TokenId,
    ) -> TrieResult<()> {
        let priority = Priority::blank(min);
        let mut is_blank = vec![false; self.n_codes];
        for &code in blank_codes {
            is_blank[code as usize] = true;
        }
        let blank_set: Arc<[bool]> = is_blank.into();

        let start = self.extend(ROOT, prefix)?;
        let mut work = vec![(start, prefix.len() as u32, min, max)];

        while let Some((node, length, min, max)) = work.pop() {
            if min == 0 && self.nodes[node].children.is_none() {
                let existing = self.nodes[node]
                    .blank
                    .as_ref()
                    .map(|b| (b.root, b.additional_length, b.max_blanks_to_scan));
                let blank_root = match existing {
                    Some((root, existing_additional, existing_max)) => {
                        if existing_additional != length || existing_max != max {
                            return Err(TrieError::BlankTrieMismatch {
                                token,
                                existing_additional,
                                additional: length,
                                existing_max,
                                max,
                            });
                        }
                        root
                    }
                    None => {
                        let root = self.alloc(1)?;
                        self.nodes[node].blank = Some(BlankTrie {
                            root,
                            additional_length: length,
                            max_blanks_to_scan: max,
                            codes: Arc::clone(&blank_set),
                        });
                        root
                    }
                };

                if suffix.is_empty() {
                    self.set_token(node, length, token, priority, true);
                } else {
                    let end = self.extend(blank_root, suffix)?;
                    self.set_token(end, suffix.len() as u32, token, priority, false);
                }
            } else {
                if min == 0 {
                    let end = self.extend(node, suffix)?;
                    self.set_token(end, length + suffix.len() as u32, token, priority, false);
                }
                if max > 0 {
                    for &code in blank_codes {
                        let child = self.force_next(node, code)?;
                        work.push((child, length + 1, min.saturating_sub(1), max - 1));
                    }
                }
            }
        }

        Ok(())
    }

    /// Append `count` default nodes, returning the first id
    fn alloc(&mut self, count: usize) -> TrieResult<NodeId> {
        let first = self.nodes.len();
        if first + count > MAX_TRIE_NODES {
            return Err(TrieError::node_limit_exceeded());
        }
        self.nodes.resize_with(first + count, TrieNode::default);
        Ok(first)
    }

    fn extend(&mut self, mut node: NodeId, codes: &[EquivCode]) -> TrieResult<NodeId> {
        for &code in codes {
            node = self.force_next(node, code)?;
        }
        Ok(node)
    }

    /// Child of `node` for `code`, allocating the child block on first use.
    ///
    /// A leaf carrying a blank trie hands it down: children on blank codes get
    /// a copy with one more code consumed and one less blank to scan, and the
    /// zero-blank continuation is merged into `node` itself.
    fn force_next(&mut self, node: NodeId, code: EquivCode) -> TrieResult<NodeId> {
        if let Some(first) = self.nodes[node].children {
            return Ok(first + code as usize);
        }

        let first = self.alloc(self.n_codes)?;
        let parent = &mut self.nodes[node];
        parent.children = Some(first);
        let blank = parent.blank.take();
        let (token, token_length, priority, includes_blanks) = (
            parent.token,
            parent.token_length,
            parent.priority,
            parent.includes_blanks,
        );

        for child in &mut self.nodes[first..first + self.n_codes] {
            child.token = token;
            child.token_length = token_length;
            child.priority = priority;
        }

        if let Some(blank) = blank {
            if blank.max_blanks_to_scan > 0 {
                let handed_down = BlankTrie {
                    additional_length: blank.additional_length + 1,
                    max_blanks_to_scan: blank.max_blanks_to_scan - 1,
                    ..blank.clone()
                };
                let mut reused = false;
                for i in 0..self.n_codes {
                    if !blank.codes[i] {
                        continue;
                    }
                    let root = if reused {
                        self.clone_subtree(blank.root)?
                    } else {
                        reused = true;
                        blank.root
                    };
                    let child = &mut self.nodes[first + i];
                    child.blank = Some(BlankTrie {
                        root,
                        ..handed_down.clone()
                    });
                    // An open blank run at the parent now covers this blank too
                    if includes_blanks {
                        child.token_length = token_length + 1;
                        child.includes_blanks = true;
                    }
                }
            }
            self.copy_into(node, blank.root, blank.additional_length)?;
        }

        Ok(first + code as usize)
    }

    /// Longest match wins, then higher priority; equal length and priority
    /// with a different token is recorded. Applies to `node` and all its
    /// descendants; `includes_blanks` only marks `node` itself.
    fn set_token(
        &mut self,
        node: NodeId,
        length: u32,
        token: TokenId,
        priority: Priority,
        includes_blanks: bool,
    ) {
        let mut work = vec![node];

        while let Some(id) = work.pop() {
            let target = &mut self.nodes[id];
            if length > target.token_length
                || (length == target.token_length && priority > target.priority)
            {
                target.token = token;
                target.token_length = length;
                target.priority = priority;
                target.includes_blanks = includes_blanks && id == node;
            } else if length == target.token_length
                && priority == target.priority
                && target.token != token
                && target.token != NO_TOKEN
            {
                let ambiguity = Ambiguity {
                    existing: target.token,
                    incoming: token,
                };
                if !self.pending.contains(&ambiguity) {
                    self.pending.push(ambiguity);
                }
            }

            if let Some(first) = self.nodes[id].children {
                work.extend(first..first + self.n_codes);
            }
        }
    }

    /// Overlay the matches of the subtree at `from` onto `into`, shifting
    /// their lengths by `additional_length`
    fn copy_into(&mut self, into: NodeId, from: NodeId, additional_length: u32) -> TrieResult<()> {
        let mut work = vec![(into, from)];

        while let Some((into, from)) = work.pop() {
            let source = &self.nodes[from];
            let (token, length, priority, children) = (
                source.token,
                source.token_length,
                source.priority,
                source.children,
            );

            if token != NO_TOKEN {
                self.set_token(into, length + additional_length, token, priority, false);
            }
            if let Some(first) = children {
                for i in 0..self.n_codes {
                    let next = self.force_next(into, i as EquivCode)?;
                    work.push((next, first + i));
                }
            }
        }

        Ok(())
    }

    /// Deep copy of the subtree rooted at `root`, returning the copy's root
    fn clone_subtree(&mut self, root: NodeId) -> TrieResult<NodeId> {
        let copy = self.alloc(1)?;
        let mut work = vec![(root, copy)];

        while let Some((old, new)) = work.pop() {
            let mut node = self.nodes[old].clone();
            if let Some(first) = node.children {
                let base = self.alloc(self.n_codes)?;
                work.extend((0..self.n_codes).map(|i| (first + i, base + i)));
                node.children = Some(base);
            }
            if let Some(blank) = node.blank.as_mut() {
                let blank_copy = self.alloc(1)?;
                work.push((blank.root, blank_copy));
                blank.root = blank_copy;
            }
            self.nodes[new] = node;
        }

        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::Recognition;
    use assert_matches::assert_matches;

    const A: EquivCode = 1;
    const B: EquivCode = 2;
    const C: EquivCode = 3;
    const SP: EquivCode = 4;
    const TAB: EquivCode = 5;

    fn rec(token: TokenId, length: usize) -> Recognition {
        Recognition { token, length }
    }

    #[test]
    fn test_fixed_sequence_round_trip() {
        let mut builder = TrieBuilder::new(6);
        let ambiguities = builder.recognize(&[A, B, C], 10, Priority::DELIM).unwrap();
        assert!(ambiguities.is_empty());
        let trie = builder.finish();

        assert_eq!(trie.recognize([A, B, C]), rec(10, 3));
        assert_eq!(trie.recognize([A, B, C, A]), rec(10, 3));
        assert_eq!(trie.recognize([A, B]), rec(0, 0));
        assert_eq!(trie.recognize([A, C]), rec(0, 0));
    }

    #[test]
    fn test_longest_match_and_default_propagation() {
        let mut builder = TrieBuilder::new(6);
        builder.recognize(&[A, B, C], 2, Priority::DELIM).unwrap();
        builder.recognize(&[A], 1, Priority::DELIM).unwrap();
        let trie = builder.finish();

        // The shorter token answers wherever the longer one diverges
        assert_eq!(trie.recognize([A, C]), rec(1, 1));
        assert_eq!(trie.recognize([A, B, A]), rec(1, 1));
        assert_eq!(trie.recognize([A, B, C]), rec(2, 3));
    }

    #[test]
    fn test_shorter_registered_first_is_inherited_by_new_children() {
        let mut builder = TrieBuilder::new(6);
        builder.recognize(&[A], 1, Priority::DELIM).unwrap();
        builder.recognize(&[A, B, C], 2, Priority::DELIM).unwrap();
        let trie = builder.finish();

        assert_eq!(trie.recognize([A, B, B]), rec(1, 1));
        assert_eq!(trie.recognize([A, B, C]), rec(2, 3));
    }

    #[test]
    fn test_priority_breaks_equal_length_ties() {
        let mut builder = TrieBuilder::new(6);
        builder.recognize(&[A, B], 1, Priority::DATA_DELIM).unwrap();
        let ambiguities = builder.recognize(&[A, B], 2, Priority::DELIM).unwrap();
        assert!(ambiguities.is_empty());
        builder.recognize(&[A, B], 3, Priority::FUNCTION).unwrap();
        let trie = builder.finish();

        assert_eq!(trie.recognize([A, B]), rec(2, 2));
    }

    #[test]
    fn test_equal_priority_conflict_is_reported() {
        let mut builder = TrieBuilder::new(6);
        builder.recognize(&[A, B], 1, Priority::DELIM).unwrap();
        builder.recognize(&[A, B, C], 3, Priority::DELIM).unwrap();
        let ambiguities = builder.recognize(&[A, B], 2, Priority::DELIM).unwrap();

        assert_eq!(
            ambiguities,
            vec![Ambiguity {
                existing: 1,
                incoming: 2
            }]
        );

        // Re-registering the same token is not an ambiguity
        assert!(builder.recognize(&[A, B], 1, Priority::DELIM).unwrap().is_empty());

        // First registration wins deterministically
        let trie = builder.finish();
        assert_eq!(trie.recognize([A, B]), rec(1, 2));
        assert_eq!(trie.recognize([A, B, C]), rec(3, 3));
    }

    #[test]
    fn test_closing_set_fan_out() {
        let mut builder = TrieBuilder::new(6);
        builder
            .recognize_closing(&[A], &[B, C], 4, Priority::DELIM)
            .unwrap();
        let trie = builder.finish();

        assert_eq!(trie.recognize([A, B]), rec(4, 2));
        assert_eq!(trie.recognize([A, C]), rec(4, 2));
        assert_eq!(trie.recognize([A, A]), rec(0, 0));
    }

    #[test]
    fn test_blank_run_with_zero_minimum_matches_without_blanks() {
        let mut builder = TrieBuilder::new(6);
        builder
            .recognize_b(&[A], 0, 3, &[SP, TAB], &[B], 8)
            .unwrap();
        let trie = builder.finish();

        assert_eq!(trie.recognize([A, B]), rec(8, 2));
        assert_eq!(trie.recognize([A, SP, B]), rec(8, 3));
        assert_eq!(trie.recognize([A, SP, TAB, SP, B]), rec(8, 5));
        assert_eq!(trie.recognize([A, SP, TAB, SP, SP, B]), rec(0, 0));
        assert_eq!(trie.recognize([A, C]), rec(0, 0));
    }

    #[test]
    fn test_blank_run_with_minimum() {
        let mut builder = TrieBuilder::new(6);
        builder
            .recognize_b(&[A], 1, 2, &[SP], &[B], 8)
            .unwrap();
        let trie = builder.finish();

        assert_eq!(trie.recognize([A, B]), rec(0, 0));
        assert_eq!(trie.recognize([A, SP, B]), rec(8, 3));
        assert_eq!(trie.recognize([A, SP, SP, B]), rec(8, 4));
        assert_eq!(trie.recognize([A, SP, SP, SP, B]), rec(0, 0));
    }

    #[test]
    fn test_blank_run_without_suffix_counts_blanks() {
        let mut builder = TrieBuilder::new(6);
        builder.recognize_b(&[A], 0, 4, &[SP], &[], 8).unwrap();
        let trie = builder.finish();

        assert_eq!(trie.recognize([A, C]), rec(8, 1));
        assert_eq!(trie.recognize([A, SP, SP, C]), rec(8, 3));
    }

    #[test]
    fn test_extending_past_blank_leaf_keeps_blank_matches() {
        let mut builder = TrieBuilder::new(6);
        builder
            .recognize_b(&[A], 0, 2, &[SP], &[B, C], 8)
            .unwrap();
        // Forces children on the leaf that carries the blank trie
        builder.recognize(&[A, A], 9, Priority::DELIM).unwrap();
        let trie = builder.finish();

        assert_eq!(trie.recognize([A, A]), rec(9, 2));
        assert_eq!(trie.recognize([A, B, C]), rec(8, 3));
        assert_eq!(trie.recognize([A, SP, B, C]), rec(8, 4));
        assert_eq!(trie.recognize([A, SP, SP, B, C]), rec(8, 5));
        assert_eq!(trie.recognize([A, SP, SP, SP, B, C]), rec(0, 0));
    }

    #[test]
    fn test_shared_blank_leaf_must_agree() {
        let mut builder = TrieBuilder::new(6);
        builder.recognize_b(&[A], 0, 2, &[SP], &[B], 8).unwrap();
        builder.recognize_b(&[A], 0, 2, &[SP], &[C], 9).unwrap();
        assert_matches!(
            builder.recognize_b(&[A], 0, 3, &[SP], &[C], 10),
            Err(TrieError::BlankTrieMismatch { token: 10, .. })
        );

        let trie = builder.finish();
        assert_eq!(trie.recognize([A, SP, B]), rec(8, 3));
        assert_eq!(trie.recognize([A, SP, SP, C]), rec(9, 4));
    }

    #[test]
    fn test_rejected_blank_run_leaves_builder_unchanged() {
        let mut builder = TrieBuilder::new(6);
        builder.recognize_b(&[A], 0, 1, &[SP], &[B], 8).unwrap();
        builder.recognize(&[A, C], 9, Priority::DELIM).unwrap();
        let before = builder.node_count();

        // Extends A C B before reaching the A SP leaf, whose blank budget differs
        assert_matches!(
            builder.recognize_b(&[A], 0, 2, &[SP], &[C, B], 10),
            Err(TrieError::BlankTrieMismatch { token: 10, .. })
        );
        assert_eq!(builder.node_count(), before);

        let trie = builder.finish();
        assert_eq!(trie.recognize([A, C, B]), rec(9, 2));
        assert_eq!(trie.recognize([A, SP, B]), rec(8, 3));
    }

    #[test]
    fn test_fallback_ignores_blanks_of_other_patterns() {
        let mut builder = TrieBuilder::new(6);
        builder.recognize_b(&[A], 0, 2, &[SP], &[B], 1).unwrap();
        builder.recognize_b(&[A, B], 0, 1, &[SP], &[C], 2).unwrap();
        let trie = builder.finish();

        assert_eq!(trie.recognize([A, B, SP, A]), rec(1, 2));
        assert_eq!(trie.recognize([A, B, SP, C]), rec(2, 4));
        assert_eq!(trie.recognize([A, SP, B]), rec(1, 3));
    }

    #[test]
    fn test_open_blank_run_survives_extension() {
        let mut builder = TrieBuilder::new(6);
        builder.recognize_b(&[A], 0, 2, &[SP], &[], 8).unwrap();
        builder.recognize(&[A, SP, C], 9, Priority::DELIM).unwrap();
        let trie = builder.finish();

        assert_eq!(trie.recognize([A, B]), rec(8, 1));
        assert_eq!(trie.recognize([A, SP, B]), rec(8, 2));
        assert_eq!(trie.recognize([A, SP, SP, B]), rec(8, 3));
        assert_eq!(trie.recognize([A, SP, C]), rec(9, 3));
    }

    #[test]
    fn test_end_of_entity_has_zero_length() {
        let mut builder = TrieBuilder::new(6);
        builder.recognize(&[A], 1, Priority::DELIM).unwrap();
        builder.recognize_ee(0, 99).unwrap();
        let trie = builder.finish();

        assert_eq!(trie.recognize([0]), rec(99, 0));
        assert_eq!(trie.recognize([A]), rec(1, 1));
    }

    #[test]
    fn test_registration_errors() {
        let mut builder = TrieBuilder::new(4);

        assert_matches!(
            builder.recognize(&[1], NO_TOKEN, Priority::DELIM),
            Err(TrieError::ReservedTokenId)
        );
        assert_matches!(
            builder.recognize(&[], 1, Priority::DELIM),
            Err(TrieError::EmptyPattern { token: 1 })
        );
        assert_matches!(
            builder.recognize(&[1, 4], 1, Priority::DELIM),
            Err(TrieError::CodeOutOfRange { code: 4, n_codes: 4 })
        );
        assert_matches!(
            builder.recognize_closing(&[1], &[], 1, Priority::DELIM),
            Err(TrieError::EmptyPattern { .. })
        );
        assert_matches!(
            builder.recognize_b(&[1], 3, 2, &[2], &[1], 1),
            Err(TrieError::InvalidBlankRun { min: 3, max: 2, .. })
        );
        assert_matches!(
            builder.recognize_b(&[1], 0, 2, &[], &[1], 1),
            Err(TrieError::InvalidBlankRun { .. })
        );

        let too_long = vec![1; MAX_TOKEN_LENGTH as usize + 1];
        assert_matches!(
            builder.recognize(&too_long, 1, Priority::DELIM),
            Err(TrieError::TokenTooLong { .. })
        );
    }

    #[test]
    fn test_finish_drops_unreachable_nodes() {
        let mut builder = TrieBuilder::new(6);
        builder
            .recognize_b(&[A], 0, 1, &[SP], &[B], 8)
            .unwrap();
        builder.recognize(&[A, A], 9, Priority::DELIM).unwrap();
        let arena = builder.node_count();
        let trie = builder.finish();

        assert!(trie.node_count() <= arena);
        assert_eq!(trie.recognize([A, SP, B]), rec(8, 3));
        assert_eq!(trie.recognize([A, B]), rec(8, 2));
    }
}
