//! Error types for syntax definition loading and compilation

use crate::charset::{Char, CharsetError};
use crate::partition::PartitionError;
use crate::trie::TrieError;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Token '{token}' refers to unknown subset '{subset}'")]
    UnknownSubset { token: String, subset: String },

    #[error("Token '{token}' contains {char:?}, outside the {bits}-bit character domain")]
    UnencodablePattern { token: String, char: char, bits: u32 },

    #[error("Failed to parse syntax definition {source_name}: {message}")]
    DefinitionParse { source_name: String, message: String },

    #[error("Failed to read syntax definition {path}: {message}")]
    DefinitionIo { path: String, message: String },

    #[error("Subset '{name}' is defined more than once")]
    DuplicateSubset { name: String },

    #[error(transparent)]
    Charset(#[from] CharsetError),

    #[error(transparent)]
    Partition(#[from] PartitionError),

    #[error("Failed to register token '{token}': {source}")]
    Registration {
        token: String,
        #[source]
        source: TrieError,
    },
}

impl SyntaxError {
    /// Create an unknown subset error
    pub fn unknown_subset(token: &str, subset: &str) -> Self {
        Self::UnknownSubset {
            token: token.to_string(),
            subset: subset.to_string(),
        }
    }

    /// Create an unencodable pattern error
    pub fn unencodable_pattern(token: &str, char: char, bits: u32) -> Self {
        Self::UnencodablePattern {
            token: token.to_string(),
            char,
            bits,
        }
    }

    /// Create a definition parse error
    pub fn definition_parse(source_name: &str, message: &str) -> Self {
        Self::DefinitionParse {
            source_name: source_name.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a definition IO error
    pub fn definition_io(path: &str, message: &str) -> Self {
        Self::DefinitionIo {
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a duplicate subset error
    pub fn duplicate_subset(name: &str) -> Self {
        Self::DuplicateSubset {
            name: name.to_string(),
        }
    }

    /// Create a registration error for a named token
    pub fn registration(token: &str, source: TrieError) -> Self {
        Self::Registration {
            token: token.to_string(),
            source,
        }
    }

    /// Character that could not be encoded, if any
    pub fn offending_char(&self) -> Option<Char> {
        match self {
            Self::UnencodablePattern { char, .. } => Some(*char as Char),
            Self::Charset(CharsetError::CharOutOfDomain { char, .. }) => Some(*char),
            _ => None,
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> crate::logging::codes::Code {
        use crate::logging::codes;
        match self {
            Self::UnknownSubset { .. } => codes::syntax::UNKNOWN_SUBSET,
            Self::UnencodablePattern { .. } => codes::syntax::UNENCODABLE_PATTERN,
            Self::DefinitionParse { .. } => codes::syntax::DEFINITION_PARSE_ERROR,
            Self::DefinitionIo { .. } => codes::syntax::DEFINITION_IO_ERROR,
            Self::DuplicateSubset { .. } => codes::syntax::DUPLICATE_SUBSET,
            Self::Charset(inner) => inner.error_code(),
            Self::Partition(inner) => inner.error_code(),
            Self::Registration { source, .. } => source.error_code(),
        }
    }
}

impl From<TrieError> for SyntaxError {
    fn from(source: TrieError) -> Self {
        Self::registration("<unnamed>", source)
    }
}
