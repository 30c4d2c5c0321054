//! Error types for character domain primitives

use super::Char;

/// Result type for fallible charset construction
pub type CharsetResult<T> = Result<T, CharsetError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CharsetError {
    #[error("Invalid character domain width {bits}: must be between 1 and {max} bits")]
    InvalidDomainWidth { bits: u32, max: u32 },

    #[error("Inverted range [{min}, {max}]: min must not exceed max")]
    InvertedRange { min: u64, max: u64 },

    #[error("Character {char:#x} lies outside the domain (max {max:#x})")]
    CharOutOfDomain { char: Char, max: Char },
}

impl CharsetError {
    /// Create an invalid domain width error
    pub fn invalid_domain_width(bits: u32) -> Self {
        Self::InvalidDomainWidth {
            bits,
            max: crate::config::compile_time::charset::MAX_DOMAIN_BITS,
        }
    }

    /// Create an inverted range error
    pub fn inverted_range(min: u64, max: u64) -> Self {
        Self::InvertedRange { min, max }
    }

    /// Create a character out of domain error
    pub fn char_out_of_domain(char: Char, max: Char) -> Self {
        Self::CharOutOfDomain { char, max }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> crate::logging::codes::Code {
        use crate::logging::codes;
        match self {
            Self::InvalidDomainWidth { .. } => codes::charset::INVALID_DOMAIN_WIDTH,
            Self::InvertedRange { .. } => codes::charset::INVERTED_RANGE,
            Self::CharOutOfDomain { .. } => codes::charset::CHAR_OUT_OF_DOMAIN,
        }
    }
}
