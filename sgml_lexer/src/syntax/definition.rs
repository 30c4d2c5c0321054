//! Serializable description of a concrete syntax
//!
//! ```toml
//! name = "comments"
//! domain_bits = 21
//! fold = "upper"
//! significant_chars = ["abc", { min = "0", max = "9" }]
//!
//! [[subsets]]
//! name = "blank"
//! chars = [" \t"]
//!
//! [[tokens]]
//! id = 1
//! name = "COM"
//! kind = "literal"
//! text = "--"
//! ```

use super::error::{SyntaxError, SyntaxResult};
use crate::charset::{Char, IntervalSet, SubstTable};
use crate::trie::{Priority, TokenId};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_domain_bits() -> u32 {
    crate::config::compile_time::charset::DEFAULT_DOMAIN_BITS
}

/// A single character, written either as a one-character string or a code point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharValue {
    Code(Char),
    Char(char),
}

impl CharValue {
    pub fn code(self) -> Char {
        match self {
            Self::Code(code) => code,
            Self::Char(c) => c as Char,
        }
    }
}

/// Characters given literally or as an inclusive range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharSpec {
    Chars(String),
    Range { min: CharValue, max: CharValue },
}

impl CharSpec {
    fn add_to(&self, set: &mut IntervalSet<Char>) -> SyntaxResult<()> {
        match self {
            Self::Chars(text) => set.extend(text.chars().map(|c| c as Char)),
            Self::Range { min, max } => {
                let range = IntervalSet::try_from_range(min.code(), max.code())?;
                set.add_set(&range);
            }
        }
        Ok(())
    }
}

fn collect_chars(specs: &[CharSpec]) -> SyntaxResult<IntervalSet<Char>> {
    let mut set = IntervalSet::new();
    for item in specs {
        item.add_to(&mut set)?;
    }
    Ok(set)
}

/// Named interest subset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsetDefinition {
    pub name: String,
    #[serde(default)]
    pub chars: Vec<CharSpec>,
}

impl SubsetDefinition {
    pub fn char_set(&self) -> SyntaxResult<IntervalSet<Char>> {
        collect_chars(&self.chars)
    }
}

/// Built-in case folding applied before explicit substitutions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseFold {
    #[default]
    None,
    Upper,
    Lower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionPair {
    pub from: CharValue,
    pub to: CharValue,
}

/// Named priority levels usable in definitions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPriority {
    Data,
    DataDelim,
    Function,
    #[default]
    Delim,
}

impl From<TokenPriority> for Priority {
    fn from(priority: TokenPriority) -> Self {
        match priority {
            TokenPriority::Data => Priority::DATA,
            TokenPriority::DataDelim => Priority::DATA_DELIM,
            TokenPriority::Function => Priority::FUNCTION,
            TokenPriority::Delim => Priority::DELIM,
        }
    }
}

/// Shape of a token pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenKind {
    /// Fixed text
    Literal { text: String },
    /// Fixed text followed by any one character of a subset
    Closing { text: String, closing_subset: String },
    /// `prefix`, a run of `min..=max` subset characters, then `suffix`
    BlankRun {
        #[serde(default)]
        prefix: String,
        blank_subset: String,
        #[serde(default)]
        min: usize,
        max: usize,
        #[serde(default)]
        suffix: String,
    },
    /// The end-of-entity transition
    EndOfEntity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDefinition {
    pub id: TokenId,
    pub name: String,
    /// Ignored for blank runs, whose priority follows from `min`
    #[serde(default)]
    pub priority: TokenPriority,
    #[serde(flatten)]
    pub kind: TokenKind,
}

impl TokenDefinition {
    /// Every character the pattern spells out literally
    pub fn literal_chars(&self) -> impl Iterator<Item = char> + '_ {
        let (first, second): (&str, &str) = match &self.kind {
            TokenKind::Literal { text } | TokenKind::Closing { text, .. } => (text.as_str(), ""),
            TokenKind::BlankRun { prefix, suffix, .. } => (prefix.as_str(), suffix.as_str()),
            TokenKind::EndOfEntity => ("", ""),
        };
        first.chars().chain(second.chars())
    }
}

/// Complete input to the syntax compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_domain_bits")]
    pub domain_bits: u32,
    #[serde(default)]
    pub significant_chars: Vec<CharSpec>,
    #[serde(default)]
    pub fold: CaseFold,
    #[serde(default)]
    pub substitutions: Vec<SubstitutionPair>,
    #[serde(default)]
    pub subsets: Vec<SubsetDefinition>,
    #[serde(default)]
    pub tokens: Vec<TokenDefinition>,
}

impl Default for SyntaxDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            domain_bits: default_domain_bits(),
            significant_chars: Vec::new(),
            fold: CaseFold::None,
            substitutions: Vec::new(),
            subsets: Vec::new(),
            tokens: Vec::new(),
        }
    }
}

impl SyntaxDefinition {
    pub fn from_toml_str(source: &str) -> SyntaxResult<Self> {
        toml::from_str(source).map_err(|e| SyntaxError::definition_parse("<string>", &e.to_string()))
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> SyntaxResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let source = std::fs::read_to_string(path)
            .map_err(|e| SyntaxError::definition_io(&display, &e.to_string()))?;

        let mut definition: Self = toml::from_str(&source)
            .map_err(|e| SyntaxError::definition_parse(&display, &e.to_string()))?;
        if definition.name.is_empty() {
            if let Some(stem) = path.file_stem() {
                definition.name = stem.to_string_lossy().into_owned();
            }
        }
        Ok(definition)
    }

    pub fn to_toml_string(&self) -> SyntaxResult<String> {
        toml::to_string(self).map_err(|e| SyntaxError::definition_parse(&self.name, &e.to_string()))
    }

    /// Declared significant characters plus every character spelled out by a token
    pub fn significant_set(&self) -> SyntaxResult<IntervalSet<Char>> {
        let mut set = collect_chars(&self.significant_chars)?;
        for token in &self.tokens {
            set.extend(token.literal_chars().map(|c| c as Char));
        }
        Ok(set)
    }

    /// Case folding followed by explicit substitutions
    pub fn substitution_table(&self) -> SubstTable {
        let mut table = match self.fold {
            CaseFold::None => SubstTable::new(),
            CaseFold::Upper => SubstTable::ascii_uppercase(),
            CaseFold::Lower => SubstTable::ascii_lowercase(),
        };
        for pair in &self.substitutions {
            table.insert(pair.from.code(), pair.to.code());
        }
        table
    }

    /// Index of the subset called `name`
    pub fn subset_index(&self, name: &str) -> Option<usize> {
        self.subsets.iter().position(|s| s.name == name)
    }
}
