//! Configuration module for the SGML lexer tables
//! Compile-time limits are generated from TOML configuration by build.rs

// Include generated constants from build.rs
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("SGML_LEXER_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("SGML_LEXER_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time::*;

    #[test]
    fn test_generated_limits_are_sane() {
        assert!(charset::DEFAULT_DOMAIN_BITS <= charset::MAX_DOMAIN_BITS);
        assert!(charset::MAX_DOMAIN_BITS <= 32);
        assert!(partition::MAX_INTEREST_SUBSETS > 0);
        assert!(trie::MAX_TOKEN_LENGTH > 0);
        assert!(trie::MAX_TRIE_NODES > 0);
    }

    #[test]
    fn test_source_info() {
        assert!(super::build_info::source_info().ends_with(".toml"));
    }
}
