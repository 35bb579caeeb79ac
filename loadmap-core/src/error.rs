//! Core error types for `loadmap`
//!
//! Configuration and validation error types shared across the workspace.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// Building a table never fails; these errors cover reading a table from
/// text, checking it, and parsing the versioned identifiers it refers to.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Parsing the configuration text failed
    #[error("parse error in {path}{}: {message}", line.map_or_else(String::new, |l| format!(" (line {l})")))]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path to the configuration file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
        /// Warnings raised while loading the same file
        warnings: Vec<ValidationIssue>,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Environment variable referenced in configuration is not set
    #[error("environment variable '{var}' not set (referenced at {location})")]
    EnvVarNotSet {
        /// Name of the environment variable
        var: String,
        /// Location in the configuration where it was referenced
        location: String,
    },

    /// A string is not a versioned package identifier
    #[error("invalid package identifier '{value}': {reason}")]
    InvalidIdentifier {
        /// The rejected identifier
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// One or more configuration files failed validation.
    #[error("{count} file(s) failed validation")]
    ValidationFailed {
        /// Number of files that failed validation.
        count: usize,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found during configuration validation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    /// Path to the problematic entry (e.g., `map["jquery"]`)
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        if self.path.is_empty() {
            write!(f, "{}: {}", prefix, self.message)
        } else {
            write!(f, "{}: {} at {}", prefix, self.message, self.path)
        }
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - the table must not be registered
    Error,
    /// Warning - suspicious entry that does not block registration
    Warning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_issue_display() {
        let issue = ValidationIssue {
            path: "map[\"jquery\"]".to_string(),
            message: "missing version separator".to_string(),
            severity: Severity::Error,
        };
        assert_eq!(
            issue.to_string(),
            "error: missing version separator at map[\"jquery\"]"
        );
    }

    #[test]
    fn test_validation_issue_warning_display() {
        let issue = ValidationIssue {
            path: "transpiler".to_string(),
            message: "no alias for transpiler".to_string(),
            severity: Severity::Warning,
        };
        assert_eq!(
            issue.to_string(),
            "warning: no alias for transpiler at transpiler"
        );
    }

    #[test]
    fn test_validation_issue_without_path() {
        let issue = ValidationIssue {
            path: String::new(),
            message: "too many entries".to_string(),
            severity: Severity::Error,
        };
        assert_eq!(issue.to_string(), "error: too many entries");
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ParseError {
            path: PathBuf::from("config.js"),
            line: Some(42),
            message: "unexpected token".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("config.js"));
        assert!(msg.contains("line 42"));
        assert!(msg.contains("unexpected token"));
    }

    #[test]
    fn test_validation_error_display_names_path() {
        let err = ConfigError::ValidationError {
            path: "config.js".to_string(),
            errors: Vec::new(),
            warnings: Vec::new(),
        };
        assert_eq!(err.to_string(), "validation failed for config.js");
    }

    #[test]
    fn test_invalid_identifier_display() {
        let err = ConfigError::InvalidIdentifier {
            value: "jquery".to_string(),
            reason: "missing registry prefix".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid package identifier 'jquery': missing registry prefix"
        );
    }

    #[test]
    fn test_config_error_env_var_display() {
        let err = ConfigError::EnvVarNotSet {
            var: "LIB_ROOT".to_string(),
            location: "config.js".to_string(),
        };
        assert!(err.to_string().contains("LIB_ROOT"));
        assert!(err.to_string().contains("config.js"));
    }
}
