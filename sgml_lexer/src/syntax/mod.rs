//! Concrete syntax definitions and their compilation into lexer tables
//!
//! A [`SyntaxDefinition`] names the significant characters, interest subsets,
//! case substitution and token patterns of one concrete syntax. The
//! [`SyntaxCompiler`] derives the [`Partition`](crate::partition::Partition)
//! and freezes a [`Trie`](crate::trie::Trie) over its codes.

pub mod compiler;
pub mod definition;
pub mod error;

pub use compiler::{CompiledSyntax, SyntaxCompiler};
pub use definition::{
    CaseFold, CharSpec, CharValue, SubsetDefinition, SubstitutionPair, SyntaxDefinition,
    TokenDefinition, TokenKind, TokenPriority,
};
pub use error::{SyntaxError, SyntaxResult};
