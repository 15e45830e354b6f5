//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output. Status lines for problems
//! go to stderr so stdout stays clean for `show` and `render`.

use buildprofile_core::validation::{ValidationError, ValidationResult};
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        eprintln!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        eprintln!();
        eprintln!("{}", message.bold());
        eprintln!("{}", "─".repeat(message.chars().count()));
    }
}

/// Format one violation or warning as a single line
#[must_use]
pub fn format_finding(finding: &ValidationError) -> String {
    let mut line = format!("{} [{}] {}", finding.field, finding.code, finding.message);
    match (&finding.expected, &finding.actual) {
        (Some(expected), Some(actual)) => {
            line.push_str(&format!(" (expected {}, found {})", expected, actual));
        }
        (Some(expected), None) => line.push_str(&format!(" (expected {})", expected)),
        (None, Some(actual)) => line.push_str(&format!(" (found {})", actual)),
        (None, None) => {}
    }
    line
}

/// Print every error and warning of a validation result
pub fn print_validation(result: &ValidationResult) {
    for error in result.errors() {
        Status::error(&format_finding(error));
    }
    for warning in result.warnings() {
        Status::warning(&format_finding(warning));
    }
}

/// Format a count with singular/plural
#[must_use]
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_finding_with_values() {
        let finding = ValidationError::new("sdk.min", "SDK_RANGE", "min must not exceed target")
            .expected("min <= target")
            .actual("30 > 20");
        assert_eq!(
            format_finding(&finding),
            "sdk.min [SDK_RANGE] min must not exceed target (expected min <= target, found 30 > 20)"
        );
    }

    #[test]
    fn test_format_finding_plain() {
        let finding = ValidationError::new("plugins", "PLUGIN_ORDER", "must be last");
        assert_eq!(format_finding(&finding), "plugins [PLUGIN_ORDER] must be last");
    }

    #[test]
    fn test_format_count_singular() {
        assert_eq!(format_count(1, "violation", "violations"), "1 violation");
    }

    #[test]
    fn test_format_count_plural() {
        assert_eq!(format_count(3, "warning", "warnings"), "3 warnings");
    }
}
