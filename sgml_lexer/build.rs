// build.rs - TOML-driven constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    charset: CharsetLimits,
    partition: PartitionLimits,
    trie: TrieLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct CharsetLimits {
    default_domain_bits: u32,
    max_domain_bits: u32,
}

#[derive(serde::Deserialize)]
struct PartitionLimits {
    max_interest_subsets: usize,
    max_significant_chars: u64,
}

#[derive(serde::Deserialize)]
struct TrieLimits {
    max_token_length: u32,
    max_blank_run: usize,
    max_trie_nodes: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    max_ambiguities_logged: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SGML_LEXER_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=SGML_LEXER_CONFIG_DIR");

    let profile =
        env::var("SGML_LEXER_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("SGML_LEXER_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Find workspace root (parent of sgml_lexer directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_constraints(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_constraints(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_DOMAIN_BITS: u32 = 32;
    const ABSOLUTE_MAX_TOKEN_LENGTH: u32 = 65_535;
    const ABSOLUTE_MAX_TRIE_NODES: usize = 1 << 28;

    if config.charset.max_domain_bits > ABSOLUTE_MAX_DOMAIN_BITS {
        panic!("LIMIT: max_domain_bits exceeds absolute maximum of 32");
    }

    if config.charset.default_domain_bits == 0
        || config.charset.default_domain_bits > config.charset.max_domain_bits
    {
        panic!("LIMIT: default_domain_bits must be in 1..=max_domain_bits");
    }

    if config.partition.max_interest_subsets == 0 {
        panic!("LIMIT: max_interest_subsets cannot be zero");
    }

    if config.trie.max_token_length == 0 || config.trie.max_token_length > ABSOLUTE_MAX_TOKEN_LENGTH
    {
        panic!("LIMIT: max_token_length must be in 1..=65535");
    }

    if config.trie.max_trie_nodes > ABSOLUTE_MAX_TRIE_NODES {
        panic!("LIMIT: max_trie_nodes exceeds absolute maximum");
    }

    if config.logging.log_buffer_size < 10 {
        panic!("LIMIT: log_buffer_size too small");
    }

    if profile == "production" && config.trie.max_trie_nodes > 16 * 1024 * 1024 {
        panic!("PRODUCTION: max_trie_nodes too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod charset {{
        pub const DEFAULT_DOMAIN_BITS: u32 = {};
        pub const MAX_DOMAIN_BITS: u32 = {};
    }}

    pub mod partition {{
        pub const MAX_INTEREST_SUBSETS: usize = {};
        pub const MAX_SIGNIFICANT_CHARS: u64 = {};
    }}

    pub mod trie {{
        pub const MAX_TOKEN_LENGTH: u32 = {};
        pub const MAX_BLANK_RUN: usize = {};
        pub const MAX_TRIE_NODES: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const MAX_AMBIGUITIES_LOGGED: usize = {};
    }}
}}
"#,
        profile,
        // Charset
        config.charset.default_domain_bits,
        config.charset.max_domain_bits,
        // Partition
        config.partition.max_interest_subsets,
        config.partition.max_significant_chars,
        // Trie
        config.trie.max_token_length,
        config.trie.max_blank_run,
        config.trie.max_trie_nodes,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.max_ambiguities_logged,
    );

    fs::write(output_path, constants_code).unwrap();
}
