// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexerPreferences {
    /// Whether to run the interval/range consistency checks after table construction
    /// even in release builds (validation builds always check)
    pub verify_invariants: bool,

    /// Whether each token ambiguity is reported as a warning while compiling
    pub log_ambiguities: bool,

    /// Whether to log node and class counts once tables are built
    pub log_build_statistics: bool,
}

impl Default for LexerPreferences {
    fn default() -> Self {
        Self {
            verify_invariants: env::var(env_vars::LEXER_VERIFY_INVARIANTS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_ambiguities: env::var(env_vars::LEXER_LOG_AMBIGUITIES)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_build_statistics: env::var(env_vars::LEXER_LOG_BUILD_STATISTICS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

static LEXER_PREFERENCES: OnceLock<LexerPreferences> = OnceLock::new();

/// Install lexer preferences before the first table is built
pub fn init_lexer_preferences(preferences: LexerPreferences) -> Result<(), String> {
    LEXER_PREFERENCES
        .set(preferences)
        .map_err(|_| "Lexer preferences already initialized".to_string())
}

/// Active lexer preferences, read from the environment on first use
pub fn lexer_preferences() -> &'static LexerPreferences {
    LEXER_PREFERENCES.get_or_init(LexerPreferences::default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging (user preference)
    pub use_structured_logging: bool,

    /// Whether to enable console output (user preference)
    pub enable_console_logging: bool,

    /// User preferred minimum log level
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub lexer: LexerPreferences,
    pub logging: LoggingPreferences,
}

/// Environment variable names for configuration
pub mod env_vars {
    // Lexer tables
    pub const LEXER_VERIFY_INVARIANTS: &str = "SGML_LEXER_VERIFY_INVARIANTS";
    pub const LEXER_LOG_AMBIGUITIES: &str = "SGML_LEXER_LOG_AMBIGUITIES";
    pub const LEXER_LOG_BUILD_STATISTICS: &str = "SGML_LEXER_LOG_BUILD_STATISTICS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "SGML_LEXER_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "SGML_LEXER_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "SGML_LEXER_LOGGING_MIN_LEVEL";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_env_var_names_exist() {
        assert!(env_vars::LEXER_VERIFY_INVARIANTS.starts_with("SGML_LEXER_"));
        assert!(env_vars::LOGGING_MIN_LEVEL.starts_with("SGML_LEXER_"));
    }

    #[test]
    fn test_preferences_round_trip_through_json() {
        let config = RuntimeConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: RuntimeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.lexer.log_ambiguities, config.lexer.log_ambiguities);
        assert_eq!(parsed.logging.min_log_level, config.logging.min_log_level);
    }
}
