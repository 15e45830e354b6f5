//! Error handling with codes, context, and recovery suggestions
//!
//! Every failure the tool can surface carries:
//! - An [`ErrorCode`] for programmatic handling and exit-code mapping
//! - The offending field or path in the message
//! - Optional context and a recovery suggestion

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General errors (1xxx)
    /// Bug in the tool itself
    Internal = 1001,

    // IO errors (2xxx)
    /// Other IO failure
    IoError = 2000,
    /// File not found
    FileNotFound = 2001,
    /// Permission denied
    PermissionDenied = 2002,
    /// Target already exists
    AlreadyExists = 2003,

    // Configuration errors (3xxx)
    /// Tool configuration could not be read or encoded
    ConfigError = 3000,
    /// Explicit tool configuration path does not exist
    ConfigNotFound = 3001,
    /// Tool configuration syntax error
    ConfigParseError = 3002,
    /// Build profile is structurally invalid
    MalformedConfig = 3005,
    /// Build profile SDK levels are out of order
    InvalidRange = 3006,

    // Process errors (5xxx)
    /// A command could not be started
    ProcessError = 5000,
    /// A command is not installed
    CommandNotFound = 5001,

    // Build toolchain errors (8xxx)
    /// The Gradle hand-off could not start
    GradleError = 8002,
}

impl ErrorCode {
    /// Get the numeric code
    #[must_use]
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            5 => "Process",
            8 => "Toolchain",
            _ => "Unknown",
        }
    }

    /// CLI exit code for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.code() / 1000 {
            3 => exit_codes::CONFIG_ERROR,
            _ if *self == ErrorCode::CommandNotFound => exit_codes::COMMAND_NOT_FOUND,
            _ => exit_codes::FAILURE,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convert to a serializable report
    #[must_use]
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    // Convenience constructors

    /// A file the tool needs is missing
    pub fn file_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::FileNotFound,
            format!("File not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Check that the file exists and you have read permissions")
    }

    /// Generic configuration failure
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// An explicitly named configuration file is missing
    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a .build-profile.toml file or use --config to specify a path")
    }

    /// A required field is missing or has the wrong type
    pub fn malformed_config(field: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::MalformedConfig,
            format!("Malformed build profile at `{}`: {}", field, reason),
        )
    }

    /// A numeric invariant of the profile does not hold
    pub fn invalid_range(field: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidRange,
            format!("Invalid range at `{}`: {}", field, reason),
        )
        .with_suggestion("SDK levels must satisfy min <= target <= compile")
    }

    /// A command could not be started
    pub fn process(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProcessError, message)
    }

    /// A command is not on `PATH`
    pub fn command_not_found(cmd: &str) -> Self {
        Self::new(
            ErrorCode::CommandNotFound,
            format!("Command not found: {}", cmd),
        )
        .with_suggestion(format!("Install {} and ensure it's in your PATH", cmd))
    }

    /// The Gradle hand-off could not start
    pub fn gradle(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GradleError, message)
    }
}

/// Serializable error report for logging and `--json` output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error code
    pub code: ErrorCode,
    /// Display form of the code, e.g. `E3005`
    pub code_str: String,
    /// Code category
    pub category: String,
    /// Human-readable message
    pub message: String,
    /// Additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Recovery suggestion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Source error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    /// Everything passed
    pub const SUCCESS: i32 = 0;
    /// IO or toolchain failure
    pub const FAILURE: i32 = 1;
    /// The profile has validation violations
    pub const VALIDATION_ERROR: i32 = 2;
    /// The profile or tool configuration could not be loaded
    pub const CONFIG_ERROR: i32 = 3;
    /// A required command is not installed
    pub const COMMAND_NOT_FOUND: i32 = 127;
}

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            std::io::ErrorKind::AlreadyExists => ErrorCode::AlreadyExists,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("JSON parse error: {}", err))
            .with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {}", err))
            .with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::MalformedConfig.to_string(), "E3005");
        assert_eq!(ErrorCode::InvalidRange.to_string(), "E3006");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::InvalidRange.category(), "Configuration");
        assert_eq!(ErrorCode::GradleError.category(), "Toolchain");
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(ErrorCode::MalformedConfig.exit_code(), exit_codes::CONFIG_ERROR);
        assert_eq!(ErrorCode::InvalidRange.exit_code(), exit_codes::CONFIG_ERROR);
        assert_eq!(ErrorCode::GradleError.exit_code(), exit_codes::FAILURE);
        assert_eq!(ErrorCode::CommandNotFound.exit_code(), exit_codes::COMMAND_NOT_FOUND);
        assert_eq!(ErrorCode::IoError.exit_code(), exit_codes::FAILURE);
    }

    #[test]
    fn test_malformed_config_names_field() {
        let err = Error::malformed_config("application_id", "missing required field");
        assert_eq!(err.code, ErrorCode::MalformedConfig);
        assert!(err.to_string().contains("application_id"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::file_not_found("/path/to/profile.toml")
            .with_context("While loading build profile");

        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert!(err.context.is_some());
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_error_report_serialization() {
        let err = Error::invalid_range("sdk.min", "min (30) > target (20)")
            .with_context("android/app/build-profile.toml");

        let report = err.to_report();
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("E3006"));
        assert!(json.contains("Configuration"));
        assert!(json.contains("INVALID_RANGE"));
    }
}
