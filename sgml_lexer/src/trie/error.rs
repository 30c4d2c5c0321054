//! Error types for token registration

use super::TokenId;
use crate::partition::EquivCode;

pub type TrieResult<T> = Result<T, TrieError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrieError {
    #[error("Equivalence code {code} out of range: alphabet has {n_codes} codes")]
    CodeOutOfRange { code: EquivCode, n_codes: usize },

    #[error("Token {token} pattern length {length} exceeds maximum {max}")]
    TokenTooLong { token: TokenId, length: usize, max: u32 },

    #[error("Invalid blank run for token {token}: min {min}, max {max} (limit {limit}, {blank_codes} blank codes)")]
    InvalidBlankRun {
        token: TokenId,
        min: usize,
        max: usize,
        limit: usize,
        blank_codes: usize,
    },

    #[error("Token {token} has an empty pattern")]
    EmptyPattern { token: TokenId },

    #[error("Trie node limit of {max} exceeded")]
    NodeLimitExceeded { max: usize },

    #[error("Token {token} reaches a blank run already registered with different parameters: additional length {existing_additional}/{additional}, blank budget {existing_max}/{max}")]
    BlankTrieMismatch {
        token: TokenId,
        existing_additional: u32,
        additional: u32,
        existing_max: usize,
        max: usize,
    },

    #[error("Token id 0 is reserved and cannot be registered")]
    ReservedTokenId,
}

impl TrieError {
    /// Create a code out of range error
    pub fn code_out_of_range(code: EquivCode, n_codes: usize) -> Self {
        Self::CodeOutOfRange { code, n_codes }
    }

    /// Create a token too long error
    pub fn token_too_long(token: TokenId, length: usize) -> Self {
        Self::TokenTooLong {
            token,
            length,
            max: crate::config::compile_time::trie::MAX_TOKEN_LENGTH,
        }
    }

    /// Create an invalid blank run error
    pub fn invalid_blank_run(token: TokenId, min: usize, max: usize, blank_codes: usize) -> Self {
        Self::InvalidBlankRun {
            token,
            min,
            max,
            limit: crate::config::compile_time::trie::MAX_BLANK_RUN,
            blank_codes,
        }
    }

    /// Create an empty pattern error
    pub fn empty_pattern(token: TokenId) -> Self {
        Self::EmptyPattern { token }
    }

    /// Create a node limit exceeded error
    pub fn node_limit_exceeded() -> Self {
        Self::NodeLimitExceeded {
            max: crate::config::compile_time::trie::MAX_TRIE_NODES,
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> crate::logging::codes::Code {
        use crate::logging::codes;
        match self {
            Self::CodeOutOfRange { .. } => codes::trie::CODE_OUT_OF_RANGE,
            Self::TokenTooLong { .. } => codes::trie::TOKEN_TOO_LONG,
            Self::InvalidBlankRun { .. } => codes::trie::INVALID_BLANK_RUN,
            Self::EmptyPattern { .. } => codes::trie::EMPTY_PATTERN,
            Self::NodeLimitExceeded { .. } => codes::trie::NODE_LIMIT_EXCEEDED,
            Self::BlankTrieMismatch { .. } => codes::trie::BLANK_TRIE_MISMATCH,
            Self::ReservedTokenId => codes::trie::RESERVED_TOKEN_ID,
        }
    }

    /// Whether the builder is unusable after this error
    pub fn requires_halt(&self) -> bool {
        matches!(self, Self::NodeLimitExceeded { .. })
    }
}
