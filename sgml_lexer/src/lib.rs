// Internal modules
pub mod charset;
pub mod config;
#[macro_use]
pub mod logging;
pub mod partition;
pub mod syntax;
pub mod trie;

// Re-export key types for library consumers
pub use charset::{
    Char, CharsetError, CompressedCharMap, Domain, IdentitySubst, IntervalSet, RangeMap,
    SubstTable, Substitution,
};
pub use partition::{EquivCode, Partition, PartitionError};
pub use syntax::{CompiledSyntax, SyntaxCompiler, SyntaxDefinition, SyntaxError};
pub use trie::{Ambiguity, Priority, Recognition, TokenId, Trie, TrieBuilder, TrieError};
