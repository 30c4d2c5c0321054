//! Consolidated error codes and classification system
//!
//! Single source of truth for the codes emitted while building lexical tables,
//! together with their behavioral metadata.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Character set primitive error codes
pub mod charset {
    use super::Code;

    pub const INVALID_DOMAIN_WIDTH: Code = Code::new("E010");
    pub const INVERTED_RANGE: Code = Code::new("E011");
    pub const CHAR_OUT_OF_DOMAIN: Code = Code::new("E012");
}

/// Partition error codes
pub mod partition {
    use super::Code;

    pub const TOO_MANY_SUBSETS: Code = Code::new("E020");
    pub const TOO_MANY_SIGNIFICANT_CHARS: Code = Code::new("E021");
    pub const SUBSET_OUT_OF_DOMAIN: Code = Code::new("E022");
}

/// Trie construction error and warning codes
pub mod trie {
    use super::Code;

    pub const CODE_OUT_OF_RANGE: Code = Code::new("E030");
    pub const TOKEN_TOO_LONG: Code = Code::new("E031");
    pub const INVALID_BLANK_RUN: Code = Code::new("E032");
    pub const EMPTY_PATTERN: Code = Code::new("E033");
    pub const NODE_LIMIT_EXCEEDED: Code = Code::new("E034");
    pub const BLANK_TRIE_MISMATCH: Code = Code::new("E035");
    pub const RESERVED_TOKEN_ID: Code = Code::new("E036");

    pub const TOKEN_AMBIGUITY: Code = Code::new("W030");
}

/// Syntax compile pipeline error codes
pub mod syntax {
    use super::Code;

    pub const UNKNOWN_SUBSET: Code = Code::new("E040");
    pub const UNENCODABLE_PATTERN: Code = Code::new("E041");
    pub const DEFINITION_PARSE_ERROR: Code = Code::new("E042");
    pub const DEFINITION_IO_ERROR: Code = Code::new("E043");
    pub const DUPLICATE_SUBSET: Code = Code::new("E044");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const PARTITION_COMPLETE: Code = Code::new("I020");
    pub const TRIE_FROZEN: Code = Code::new("I030");
    pub const SYNTAX_COMPILE_COMPLETE: Code = Code::new("I040");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

const REGISTRY_ENTRIES: &[ErrorMetadata] = &[
    // System
    ErrorMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        true,
        "Internal invariant violated",
        "Report a bug with the syntax definition that triggered it",
    ),
    ErrorMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        false,
        true,
        "Logging or configuration initialization failed",
        "Check environment variables and build profile",
    ),
    // Charset
    ErrorMetadata::new(
        "E010",
        "Charset",
        Severity::High,
        false,
        true,
        "Character domain width outside the supported range",
        "Use a domain width between 1 and the configured maximum",
    ),
    ErrorMetadata::new(
        "E011",
        "Charset",
        Severity::Medium,
        false,
        true,
        "Range lower bound exceeds its upper bound",
        "Swap or correct the range bounds",
    ),
    ErrorMetadata::new(
        "E012",
        "Charset",
        Severity::Medium,
        false,
        true,
        "Character lies outside the configured domain",
        "Widen the domain or drop the character",
    ),
    // Partition
    ErrorMetadata::new(
        "E020",
        "Partition",
        Severity::High,
        false,
        true,
        "More interest subsets than the configured limit",
        "Merge subsets or raise partition.max_interest_subsets",
    ),
    ErrorMetadata::new(
        "E021",
        "Partition",
        Severity::High,
        false,
        true,
        "Too many significant characters to enumerate",
        "Reduce the significant character set or raise partition.max_significant_chars",
    ),
    ErrorMetadata::new(
        "E022",
        "Partition",
        Severity::Medium,
        false,
        true,
        "Interest subset contains characters outside the domain",
        "Restrict the subset to the configured domain",
    ),
    // Trie
    ErrorMetadata::new(
        "E030",
        "Trie",
        Severity::High,
        false,
        true,
        "Equivalence code is not below the alphabet size",
        "Encode patterns with the partition that sized the builder",
    ),
    ErrorMetadata::new(
        "E031",
        "Trie",
        Severity::Medium,
        false,
        true,
        "Token pattern longer than the configured maximum",
        "Shorten the delimiter or raise trie.max_token_length",
    ),
    ErrorMetadata::new(
        "E032",
        "Trie",
        Severity::Medium,
        false,
        true,
        "Blank run bounds are inconsistent",
        "Ensure min <= max and max is within trie.max_blank_run",
    ),
    ErrorMetadata::new(
        "E033",
        "Trie",
        Severity::Medium,
        false,
        true,
        "Token pattern recognizes no characters",
        "Give the token at least one character",
    ),
    ErrorMetadata::new(
        "E034",
        "Trie",
        Severity::High,
        false,
        true,
        "Trie node budget exhausted",
        "Reduce blank run lengths or raise trie.max_trie_nodes",
    ),
    ErrorMetadata::new(
        "E035",
        "Trie",
        Severity::High,
        false,
        true,
        "Blank trie reached with different scan parameters",
        "Avoid delimiters that place blank characters next to a blank run",
    ),
    ErrorMetadata::new(
        "E036",
        "Trie",
        Severity::Medium,
        false,
        true,
        "Token id 0 is reserved for no match",
        "Assign token ids starting from 1",
    ),
    ErrorMetadata::new(
        "W030",
        "Trie",
        Severity::Low,
        true,
        false,
        "Two tokens match the same input at equal length and priority",
        "Change one delimiter or give the tokens distinct priorities",
    ),
    // Syntax
    ErrorMetadata::new(
        "E040",
        "Syntax",
        Severity::Medium,
        false,
        true,
        "Token refers to an interest subset that is not defined",
        "Define the subset or correct its name",
    ),
    ErrorMetadata::new(
        "E041",
        "Syntax",
        Severity::Medium,
        false,
        true,
        "Token text cannot be encoded into equivalence codes",
        "Check the token text against the domain width",
    ),
    ErrorMetadata::new(
        "E042",
        "Syntax",
        Severity::High,
        false,
        true,
        "Syntax definition is not valid TOML",
        "Fix the definition file",
    ),
    ErrorMetadata::new(
        "E043",
        "Syntax",
        Severity::High,
        false,
        true,
        "Syntax definition could not be read",
        "Check the path and its permissions",
    ),
    ErrorMetadata::new(
        "E044",
        "Syntax",
        Severity::Medium,
        false,
        true,
        "Two interest subsets share a name",
        "Rename one of the subsets",
    ),
    // Success
    ErrorMetadata::new(
        "I001",
        "System",
        Severity::Low,
        true,
        false,
        "Logging system initialized",
        "None",
    ),
    ErrorMetadata::new(
        "I020",
        "Partition",
        Severity::Low,
        true,
        false,
        "Character partition computed",
        "Continue to token registration",
    ),
    ErrorMetadata::new(
        "I030",
        "Trie",
        Severity::Low,
        true,
        false,
        "Token trie frozen",
        "Hand the trie to the scanner",
    ),
    ErrorMetadata::new(
        "I040",
        "Syntax",
        Severity::Low,
        true,
        false,
        "Syntax tables compiled",
        "None",
    ),
];

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    static REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        REGISTRY_ENTRIES
            .iter()
            .map(|metadata| (metadata.code, metadata.clone()))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
