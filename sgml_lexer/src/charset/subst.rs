//! Caller-supplied character substitution (case folding)

use super::error::{CharsetError, CharsetResult};
use super::Char;

/// Maps each character to its canonical spelling.
///
/// `inverse(c)` lists every other character whose substitution is `c`.
pub trait Substitution {
    fn substitute(&self, c: Char) -> Char;

    fn inverse(&self, canonical: Char) -> Vec<Char>;
}

/// Substitution that leaves every character unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentitySubst;

impl Substitution for IdentitySubst {
    fn substitute(&self, c: Char) -> Char {
        c
    }

    fn inverse(&self, _canonical: Char) -> Vec<Char> {
        Vec::new()
    }
}

/// Explicit substitution table; characters without an entry map to themselves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstTable {
    /// `(from, to)` sorted by `from`, identity pairs omitted
    pairs: Vec<(Char, Char)>,
}

impl SubstTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table mapping `a`-`z` onto `A`-`Z`
    pub fn ascii_uppercase() -> Self {
        let mut table = Self::new();
        for c in b'a'..=b'z' {
            table.insert(Char::from(c), Char::from(c.to_ascii_uppercase()));
        }
        table
    }

    /// Table mapping `A`-`Z` onto `a`-`z`
    pub fn ascii_lowercase() -> Self {
        let mut table = Self::new();
        for c in b'A'..=b'Z' {
            table.insert(Char::from(c), Char::from(c.to_ascii_lowercase()));
        }
        table
    }

    pub fn from_pairs<I: IntoIterator<Item = (Char, Char)>>(pairs: I) -> Self {
        let mut table = Self::new();
        for (from, to) in pairs {
            table.insert(from, to);
        }
        table
    }

    /// Set the substitution for `from`, replacing any earlier one
    pub fn insert(&mut self, from: Char, to: Char) {
        match self.pairs.binary_search_by_key(&from, |&(f, _)| f) {
            Ok(idx) if from == to => {
                self.pairs.remove(idx);
            }
            Ok(idx) => self.pairs[idx].1 = to,
            Err(_) if from == to => {}
            Err(idx) => self.pairs.insert(idx, (from, to)),
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(Char, Char)] {
        &self.pairs
    }

    /// Reject any pair with a character above `max_char`
    pub fn check_domain(&self, max_char: Char) -> CharsetResult<()> {
        for &(from, to) in &self.pairs {
            for c in [from, to] {
                if c > max_char {
                    return Err(CharsetError::char_out_of_domain(c, max_char));
                }
            }
        }
        Ok(())
    }
}

impl Substitution for SubstTable {
    fn substitute(&self, c: Char) -> Char {
        match self.pairs.binary_search_by_key(&c, |&(f, _)| f) {
            Ok(idx) => self.pairs[idx].1,
            Err(_) => c,
        }
    }

    fn inverse(&self, canonical: Char) -> Vec<Char> {
        self.pairs
            .iter()
            .filter(|&&(_, to)| to == canonical)
            .map(|&(from, _)| from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_identity() {
        assert_eq!(IdentitySubst.substitute(0x41), 0x41);
        assert!(IdentitySubst.inverse(0x41).is_empty());
    }

    #[test]
    fn test_ascii_uppercase() {
        let table = SubstTable::ascii_uppercase();
        assert_eq!(table.len(), 26);
        assert_eq!(table.substitute('a' as Char), 'A' as Char);
        assert_eq!(table.substitute('A' as Char), 'A' as Char);
        assert_eq!(table.substitute('-' as Char), '-' as Char);
        assert_eq!(table.inverse('Q' as Char), vec!['q' as Char]);
        assert!(table.inverse('q' as Char).is_empty());
    }

    #[test]
    fn test_ascii_lowercase() {
        let table = SubstTable::ascii_lowercase();
        assert_eq!(table.substitute('Z' as Char), 'z' as Char);
        assert_eq!(table.inverse('z' as Char), vec!['Z' as Char]);
    }

    #[test]
    fn test_insert_replaces_and_drops_identity() {
        let mut table = SubstTable::from_pairs([(1, 2), (3, 2)]);
        assert_eq!(table.inverse(2), vec![1, 3]);

        table.insert(1, 5);
        assert_eq!(table.substitute(1), 5);
        assert_eq!(table.inverse(2), vec![3]);

        table.insert(3, 3);
        assert_eq!(table.len(), 1);
        assert_eq!(table.substitute(3), 3);
    }

    #[test]
    fn test_check_domain() {
        let table = SubstTable::from_pairs([(0x41, 0x61), (0x300, 0x41)]);
        assert!(table.check_domain(0xffff).is_ok());
        assert_matches!(
            table.check_domain(0xff),
            Err(CharsetError::CharOutOfDomain { char: 0x300, max: 0xff })
        );
    }
}
