//! Build profile errors

use buildprofile_core::error::{Error, ErrorCode};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for profile operations
pub type Result<T> = std::result::Result<T, ProfileError>;

/// Errors raised while loading, serializing, or rendering a build profile
///
/// `MalformedConfig` and `InvalidRange` are fatal to the build; both name the
/// offending field.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// Missing required field, wrong type, unknown key, or bad syntax
    #[error("malformed build profile: `{field}` {reason}")]
    MalformedConfig {
        /// Dotted path of the offending field
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// SDK levels out of order
    #[error("invalid range: `{field}` {reason}")]
    InvalidRange {
        /// Lower field of the pair that breaks the ordering
        field: String,
        /// The values involved
        reason: String,
    },

    /// The document could not be read or written
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        /// Document path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The profile could not be encoded
    #[error("failed to serialize build profile: {0}")]
    Serialize(String),

    /// The Gradle script could not be rendered
    #[error("failed to render Gradle script: {0}")]
    Render(String),
}

impl ProfileError {
    pub(crate) fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::malformed(field, "is a required field but is missing")
    }

    pub(crate) fn range(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The offending field, for the two profile error kinds
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MalformedConfig { field, .. } | Self::InvalidRange { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Error code for programmatic handling
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedConfig { .. } => ErrorCode::MalformedConfig,
            Self::InvalidRange { .. } => ErrorCode::InvalidRange,
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                ErrorCode::FileNotFound
            }
            Self::Io { .. } => ErrorCode::IoError,
            Self::Serialize(_) => ErrorCode::ConfigError,
            Self::Render(_) => ErrorCode::Internal,
        }
    }
}

impl From<ProfileError> for Error {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::MalformedConfig { field, reason } => Error::malformed_config(&field, reason),
            ProfileError::InvalidRange { field, reason } => Error::invalid_range(&field, reason),
            ProfileError::Io { path, source } => {
                let context = format!("While accessing {}", path.display());
                if source.kind() == std::io::ErrorKind::NotFound {
                    Error::file_not_found(&path).with_source(source).with_context(context)
                } else {
                    Error::from(source).with_context(context)
                }
            }
            other => Error::new(other.code(), other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_converts_with_field() {
        let err: Error = ProfileError::missing("application_id").into();
        assert_eq!(err.code, ErrorCode::MalformedConfig);
        assert!(err.message.contains("application_id"));
    }

    #[test]
    fn test_range_converts_with_suggestion() {
        let err: Error = ProfileError::range("sdk.min", "min (30) exceeds target (20)").into();
        assert_eq!(err.code, ErrorCode::InvalidRange);
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_missing_file_code() {
        let err = ProfileError::Io {
            path: PathBuf::from("nope.toml"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(err.code(), ErrorCode::FileNotFound);
        assert_eq!(err.field(), None);
        let converted: Error = err.into();
        assert_eq!(converted.code, ErrorCode::FileNotFound);
    }
}
