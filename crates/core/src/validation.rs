//! Validation results and a fluent validator
//!
//! Violations are collected rather than returned one at a time, so a single
//! pass reports every problem in a document. Warnings never fail a result.
//!
//! # Example
//!
//! ```rust
//! use buildprofile_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .ordered("sdk", "SDK_RANGE", &[("min", 23), ("target", 35), ("compile", 35)])
//!     .warn_if("multidex", "MULTIDEX_UNNEEDED", false, "native multidex")
//!     .validate();
//!
//! assert!(result.is_valid());
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single violation or warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Machine-readable code
    pub code: String,
    /// Expected value (if applicable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Actual value (if applicable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl ValidationError {
    /// Create an entry without expected/actual values
    pub fn new(field: impl Into<String>, code: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.to_string(),
            expected: None,
            actual: None,
        }
    }

    /// Attach the expected value
    #[must_use]
    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Attach the actual value
    #[must_use]
    pub fn actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get all warnings
    #[must_use]
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Whether an error with this code was reported
    #[must_use]
    pub fn has_error(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// Whether a warning with this code was reported
    #[must_use]
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: ValidationError) {
        self.warnings.push(warning);
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Fluent validator builder
pub struct Validator {
    result: ValidationResult,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator
    #[must_use]
    pub fn new() -> Self {
        Self {
            result: ValidationResult::new(),
        }
    }

    /// Validate against a regex pattern
    #[must_use]
    pub fn pattern(mut self, field: &str, value: &str, re: &Regex, code: &str, description: &str) -> Self {
        if !re.is_match(value) {
            self.result.add_error(
                ValidationError::new(field, code, format!("Must match {}", description))
                    .expected(description)
                    .actual(value),
            );
        }
        self
    }

    /// Validate that named values are non-decreasing, in the given order
    ///
    /// Reports the first adjacent pair that breaks the ordering, naming the
    /// lower field of the pair.
    #[must_use]
    pub fn ordered<T: PartialOrd + std::fmt::Display>(
        mut self,
        field: &str,
        code: &str,
        values: &[(&str, T)],
    ) -> Self {
        for pair in values.windows(2) {
            let (lo_name, lo) = &pair[0];
            let (hi_name, hi) = &pair[1];
            if lo > hi {
                self.result.add_error(
                    ValidationError::new(
                        format!("{}.{}", field, lo_name),
                        code,
                        format!("{} ({}) must not exceed {} ({})", lo_name, lo, hi_name, hi),
                    )
                    .expected(format!("{} <= {}", lo_name, hi_name))
                    .actual(format!("{} > {}", lo, hi)),
                );
                break;
            }
        }
        self
    }

    /// Add a warning (non-blocking)
    #[must_use]
    pub fn warn_if(mut self, field: &str, code: &str, condition: bool, message: &str) -> Self {
        if condition {
            self.result.add_warning(ValidationError::new(field, code, message));
        }
        self
    }

    /// Complete validation and return result
    #[must_use]
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_validation() {
        let re = Regex::new(r"^\d+$").unwrap();
        let result = Validator::new()
            .pattern("ndk_version", "abc", &re, "PATTERN", "digits")
            .validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].actual.as_deref(), Some("abc"));
    }

    #[test]
    fn test_ordered_reports_lower_field() {
        let result = Validator::new()
            .ordered("sdk", "SDK_RANGE", &[("min", 30), ("target", 20), ("compile", 34)])
            .validate();
        assert!(result.has_error("SDK_RANGE"));
        assert_eq!(result.errors()[0].field, "sdk.min");
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn test_ordered_reports_given_code() {
        let result = Validator::new()
            .ordered("version", "VERSION_ORDER", &[("floor", 3), ("current", 2)])
            .validate();
        assert_eq!(result.errors()[0].code, "VERSION_ORDER");
        assert_eq!(result.errors()[0].field, "version.floor");
    }

    #[test]
    fn test_ordered_accepts_equal_values() {
        let result = Validator::new()
            .ordered("sdk", "SDK_RANGE", &[("min", 34), ("target", 34), ("compile", 34)])
            .validate();
        assert!(result.is_valid());
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let result = Validator::new()
            .warn_if("variants.release.minify", "RELEASE_NOT_MINIFIED", true, "not minified")
            .validate();
        assert!(result.is_valid());
        assert!(result.has_warning("RELEASE_NOT_MINIFIED"));
    }

    #[test]
    fn test_merge() {
        let re = Regex::new(r"^\d+$").unwrap();
        let mut a = Validator::new().pattern("a", "x", &re, "PATTERN", "digits").validate();
        let b = Validator::new().warn_if("b", "W", true, "warn").validate();
        a.merge(b);
        assert_eq!(a.errors().len(), 1);
        assert_eq!(a.warnings().len(), 1);
    }
}
