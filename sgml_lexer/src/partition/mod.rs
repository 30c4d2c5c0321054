//! Minimal character equivalence classes
//!
//! Collapses the character domain into the smallest alphabet that still
//! tells apart every significant character and every interest subset. The
//! result drives both the scanner's per-character lookup and the trie's
//! branching factor.

pub mod error;
pub mod mask;

pub use error::{PartitionError, PartitionResult};
pub use mask::SubsetMask;

use crate::charset::{domain_max, validate_domain_bits, Char, CompressedCharMap, IntervalSet, Substitution};
use crate::config::compile_time::partition::{MAX_INTEREST_SUBSETS, MAX_SIGNIFICANT_CHARS};
use crate::config::runtime::lexer_preferences;
use crate::{log_success, logging::codes};

/// Dense code standing for a set of indistinguishable characters
pub type EquivCode = u32;

/// Reserved code fed to the automaton at end of entity; no character maps to it
pub const END_OF_ENTITY_CODE: EquivCode = 0;

#[derive(Debug, Clone)]
struct EquivClass {
    chars: IntervalSet<Char>,
    subsets: SubsetMask,
}

/// Character-to-code map plus per-subset code lists
#[derive(Debug, Clone)]
pub struct Partition {
    map: CompressedCharMap<EquivCode>,
    max_code: EquivCode,
    set_codes: Vec<Vec<EquivCode>>,
}

impl Partition {
    /// Compute the equivalence classes.
    ///
    /// `chars` are the characters the syntax references, `subsets` the ordered
    /// interest subsets, and `subst` the case folding applied before classing.
    /// Every character of `chars` ends up with a nonzero code; characters that
    /// substitute to the same canonical form share it.
    pub fn build(
        domain_bits: u32,
        chars: &IntervalSet<Char>,
        subsets: &[IntervalSet<Char>],
        subst: &dyn Substitution,
    ) -> PartitionResult<Self> {
        let bits = validate_domain_bits(domain_bits)?;
        let max_char = domain_max(bits);

        if subsets.len() > MAX_INTEREST_SUBSETS {
            return Err(PartitionError::too_many_subsets(subsets.len()));
        }
        let significant = chars.cardinality();
        if significant > MAX_SIGNIFICANT_CHARS {
            return Err(PartitionError::too_many_significant_chars(significant));
        }
        if let Some(last) = chars.ranges().last() {
            if last.max > max_char {
                return Err(crate::charset::CharsetError::char_out_of_domain(last.max, max_char).into());
            }
        }
        for (index, subset) in subsets.iter().enumerate() {
            if let Some(last) = subset.ranges().last() {
                if last.max > max_char {
                    return Err(PartitionError::subset_out_of_domain(index, last.max, max_char));
                }
            }
        }

        // Canonical spellings of every significant character
        let mut canonical = IntervalSet::new();
        for c in chars.elements() {
            let canon = subst.substitute(c);
            if canon > max_char {
                return Err(crate::charset::CharsetError::char_out_of_domain(canon, max_char).into());
            }
            canonical.add(canon);
        }

        // One class for everything unreferenced, one singleton per canonical character
        let mut classes = Vec::with_capacity(canonical.cardinality() as usize + 1);
        let rest = IntervalSet::from_range(0, max_char).difference(&canonical);
        if !rest.is_empty() {
            classes.push(EquivClass {
                chars: rest,
                subsets: SubsetMask::new(),
            });
        }
        for c in canonical.elements() {
            classes.push(EquivClass {
                chars: IntervalSet::from_range(c, c),
                subsets: SubsetMask::new(),
            });
        }

        for (index, subset) in subsets.iter().enumerate() {
            classes = refine(classes, index, subset);
        }

        let mut map = CompressedCharMap::new(bits, END_OF_ENTITY_CODE)?;
        let mut set_codes = vec![Vec::new(); subsets.len()];
        let mut code = END_OF_ENTITY_CODE;
        for class in &classes {
            code += 1;
            for range in &class.chars {
                map.set_range(range.min, range.max, code);
            }
            for index in class.subsets.iter() {
                set_codes[index].push(code);
            }
        }

        // Every spelling answers with its canonical character's code
        for canon in canonical.elements() {
            let canon_code = map[canon];
            for spelling in subst.inverse(canon) {
                if spelling <= max_char {
                    map.set_char(spelling, canon_code);
                }
            }
        }

        let partition = Self {
            map,
            max_code: code,
            set_codes,
        };

        let preferences = lexer_preferences();
        if preferences.verify_invariants || cfg!(debug_assertions) {
            assert!(
                classes.iter().all(|class| class.chars.is_consistent()),
                "equivalence class interval set corrupted"
            );
            assert!(
                partition.set_codes.iter().all(|codes| codes.windows(2).all(|w| w[0] < w[1])),
                "subset code lists must be strictly increasing"
            );
        }

        if preferences.log_build_statistics {
            log_success!(
                codes::success::PARTITION_COMPLETE,
                "Character partition built",
                "classes" => classes.len(),
                "max_code" => partition.max_code,
                "subsets" => subsets.len(),
                "map_nodes" => partition.map.node_count()
            );
        }

        Ok(partition)
    }

    /// Equivalence code for `c`
    #[inline]
    pub fn code(&self, c: Char) -> EquivCode {
        self.map[c]
    }

    pub fn map(&self) -> &CompressedCharMap<EquivCode> {
        &self.map
    }

    /// Largest assigned code; codes run `1..=max_code`
    pub fn max_code(&self) -> EquivCode {
        self.max_code
    }

    /// Alphabet size for the trie, counting the end-of-entity code
    pub fn n_codes(&self) -> usize {
        self.max_code as usize + 1
    }

    /// Sorted codes belonging to subset `index`
    pub fn set_codes(&self, index: usize) -> &[EquivCode] {
        self.set_codes.get(index).map_or(&[], Vec::as_slice)
    }

    pub fn subset_count(&self) -> usize {
        self.set_codes.len()
    }

    /// Membership test against a subset's code list
    pub fn code_in_subset(&self, code: EquivCode, index: usize) -> bool {
        self.set_codes(index).binary_search(&code).is_ok()
    }
}

/// Split every class against `subset`, flagging the parts inside it
fn refine(classes: Vec<EquivClass>, index: usize, subset: &IntervalSet<Char>) -> Vec<EquivClass> {
    let mut refined = Vec::with_capacity(classes.len() + 1);

    for class in classes {
        if let Some(c) = class.chars.single_value() {
            let subsets = if subset.contains(c) {
                class.subsets.with(index)
            } else {
                class.subsets
            };
            refined.push(EquivClass {
                chars: class.chars,
                subsets,
            });
            continue;
        }

        let inside = class.chars.intersection(subset);
        if inside.is_empty() {
            refined.push(class);
        } else if inside == class.chars {
            refined.push(EquivClass {
                subsets: class.subsets.with(index),
                chars: class.chars,
            });
        } else {
            let outside = class.chars.difference(subset);
            refined.push(EquivClass {
                chars: inside,
                subsets: class.subsets.with(index),
            });
            refined.push(EquivClass {
                chars: outside,
                subsets: class.subsets,
            });
        }
    }

    refined
}
