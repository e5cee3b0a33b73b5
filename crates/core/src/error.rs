//! Structured errors with codes, context, and recovery suggestions
//!
//! Every fatal branch of a build evaluation surfaces as an [`Error`]:
//! - A stable [`ErrorCode`] for programmatic handling
//! - Optional context describing what was being evaluated
//! - A recovery suggestion shown to the user
//! - A serializable [`ErrorReport`] for JSON output
//!
//! Error messages never carry credential values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General errors (1xxx)
    /// Bug or unexpected state
    Internal = 1001,

    // IO errors (2xxx)
    /// Any other IO failure
    IoError = 2000,
    /// A required file is missing
    FileNotFound = 2001,
    /// A file exists but cannot be read
    PermissionDenied = 2002,
    /// Refusing to overwrite a file
    FileExists = 2005,

    // Configuration errors (3xxx)
    /// An explicit config path does not exist
    ConfigNotFound = 3001,
    /// Config or properties text is malformed
    ConfigParseError = 3002,
    /// Config values are inconsistent
    ConfigValidationError = 3003,
    /// A catalog reference has no entry
    UnresolvedVersionRef = 3005,

    // Validation errors (6xxx)
    /// Application id or namespace is not a dotted identifier
    InvalidApplicationId = 6004,
    /// An enabled capability needs a newer platform
    PlatformVersionTooLow = 6005,

    // Security errors (7xxx)
    /// Signing properties exist but are incomplete
    MalformedCredentials = 7101,
    /// Signing is required but no properties file exists
    MissingCredentials = 7102,
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
            6 => "Validation",
            7 => "Security",
            _ => "Unknown",
        }
    }

    /// Process exit code for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.code() / 1000 {
            3 => exit_codes::CONFIG_ERROR,
            6 => exit_codes::VALIDATION_ERROR,
            7 => exit_codes::SECURITY_ERROR,
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
            write!(f, "\n  Context: {ctx}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {suggestion}")?;
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

    /// Process exit code for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.code.exit_code()
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

    /// Existing file that must not be overwritten
    pub fn file_exists(path: impl AsRef<Path>) -> Self {
        Self::new(
            ErrorCode::FileExists,
            format!("File already exists: {}", path.as_ref().display()),
        )
        .with_suggestion("Pass --force to overwrite it")
    }

    /// Explicit config path that does not exist
    pub fn config_not_found(path: impl AsRef<Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Run `appshell-android init` or use --config to specify a path")
    }

    /// Inconsistent configuration values
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigValidationError, message)
    }

    /// Catalog reference with no matching entry
    pub fn unresolved_version(reference: &str) -> Self {
        Self::new(
            ErrorCode::UnresolvedVersionRef,
            format!("Version reference '{reference}' is not defined in the catalog"),
        )
        .with_suggestion(format!(
            "Add \"{reference}\" = <number> under [catalog] or pin the version directly"
        ))
    }

    /// Credentials artifact exists but is unusable. Only key names are reported.
    pub fn malformed_credentials(path: impl AsRef<Path>, problems: &[String]) -> Self {
        Self::new(
            ErrorCode::MalformedCredentials,
            format!(
                "Malformed signing credentials in {}: {}",
                path.as_ref().display(),
                problems.join(", ")
            ),
        )
        .with_suggestion("Define keyAlias, keyPassword, storeFile and storePassword as non-empty values")
    }

    /// Signing required, but the properties file is absent
    pub fn missing_credentials(path: impl AsRef<Path>) -> Self {
        Self::new(
            ErrorCode::MissingCredentials,
            format!(
                "Signing credentials required but {} does not exist",
                path.as_ref().display()
            ),
        )
        .with_suggestion("Create the properties file or drop signing.required for unsigned release builds")
    }
}

/// Serializable error report for logging and JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error code
    pub code: ErrorCode,
    /// Code rendered as `E<NNNN>`
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
    /// Rendered source error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    /// Command completed
    pub const SUCCESS: i32 = 0;
    /// Generic failure
    pub const FAILURE: i32 = 1;
    /// Build target or capability requirements failed validation
    pub const VALIDATION_ERROR: i32 = 2;
    /// Config missing, malformed or inconsistent
    pub const CONFIG_ERROR: i32 = 3;
    /// Signing credentials malformed or missing when required
    pub const SECURITY_ERROR: i32 = 5;
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("JSON error: {err}")).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {err}"))
            .with_source(err)
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::new(ErrorCode::Internal, format!("TOML serialize error: {err}")).with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Attach context to the error
    fn context(self, context: impl Into<String>) -> Result<T>;
    /// Attach a recovery suggestion to the error
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::MalformedCredentials.to_string(), "E7101");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::UnresolvedVersionRef.category(), "Configuration");
        assert_eq!(ErrorCode::MalformedCredentials.category(), "Security");
    }

    #[test]
    fn test_exit_codes_follow_category() {
        assert_eq!(ErrorCode::MalformedCredentials.exit_code(), exit_codes::SECURITY_ERROR);
        assert_eq!(ErrorCode::ConfigParseError.exit_code(), exit_codes::CONFIG_ERROR);
        assert_eq!(ErrorCode::PlatformVersionTooLow.exit_code(), exit_codes::VALIDATION_ERROR);
        assert_eq!(ErrorCode::IoError.exit_code(), exit_codes::FAILURE);
    }

    #[test]
    fn test_malformed_credentials_lists_keys() {
        let err = Error::malformed_credentials(
            "key.properties",
            &["missing keyAlias".to_string(), "empty storePassword".to_string()],
        );

        assert_eq!(err.code, ErrorCode::MalformedCredentials);
        assert!(err.message.contains("missing keyAlias"));
        assert!(err.message.contains("empty storePassword"));
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::config_not_found("/path/to/appshell.toml")
            .with_context("While loading configuration");

        assert_eq!(err.code, ErrorCode::ConfigNotFound);
        assert!(err.to_string().contains("Context: While loading configuration"));
    }

    #[test]
    fn test_error_report_serialization() {
        let err = Error::unresolved_version("flutter.targetSdkVersion");

        let report = err.to_report();
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("E3005"));
        assert!(json.contains("Configuration"));
    }
}
