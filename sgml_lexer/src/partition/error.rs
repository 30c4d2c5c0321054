//! Error types for partition construction

use crate::charset::{Char, CharsetError};

pub type PartitionResult<T> = Result<T, PartitionError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartitionError {
    #[error("Too many interest subsets: {count} given, at most {max} supported")]
    TooManySubsets { count: usize, max: usize },

    #[error("Too many significant characters: {count} given, at most {max} supported")]
    TooManySignificantChars { count: u64, max: u64 },

    #[error("Interest subset {index} contains character {char:#x} outside the domain (max {max:#x})")]
    SubsetOutOfDomain { index: usize, char: Char, max: Char },

    #[error(transparent)]
    Charset(#[from] CharsetError),
}

impl PartitionError {
    /// Create a too many subsets error
    pub fn too_many_subsets(count: usize) -> Self {
        Self::TooManySubsets {
            count,
            max: crate::config::compile_time::partition::MAX_INTEREST_SUBSETS,
        }
    }

    /// Create a too many significant characters error
    pub fn too_many_significant_chars(count: u64) -> Self {
        Self::TooManySignificantChars {
            count,
            max: crate::config::compile_time::partition::MAX_SIGNIFICANT_CHARS,
        }
    }

    /// Create a subset out of domain error
    pub fn subset_out_of_domain(index: usize, char: Char, max: Char) -> Self {
        Self::SubsetOutOfDomain { index, char, max }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> crate::logging::codes::Code {
        use crate::logging::codes;
        match self {
            Self::TooManySubsets { .. } => codes::partition::TOO_MANY_SUBSETS,
            Self::TooManySignificantChars { .. } => codes::partition::TOO_MANY_SIGNIFICANT_CHARS,
            Self::SubsetOutOfDomain { .. } => codes::partition::SUBSET_OUT_OF_DOMAIN,
            Self::Charset(inner) => inner.error_code(),
        }
    }
}
