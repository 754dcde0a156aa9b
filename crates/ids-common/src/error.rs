//! Error types for the activity IDS.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! Structural problems (count mismatches, malformed lines, empty tables) are
//! errors. Data-quality problems found while estimating or scoring (malformed
//! cells, unknown event names) are not; they are reported as diagnostics by
//! the component that skipped them.
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Declared Count Mismatch
//!   Reason: events count mismatch: declared 2, found 1
//!   Fix: Make the first line of the file match the number of entries that follow.
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for activity IDS operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Catalogue, statistics, table and baseline file contents.
    Input,
    /// Catalogue and statistics disagree.
    Consistency,
    /// Simulation, estimation and scoring failures.
    Analysis,
    /// Settings file errors.
    Config,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Consistency => write!(f, "consistency"),
            ErrorCategory::Analysis => write!(f, "analysis"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for the activity IDS.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (10-19)
    #[error("{kind} count mismatch: declared {declared}, found {found}")]
    DeclaredCountMismatch {
        kind: String,
        declared: usize,
        found: usize,
    },

    #[error("{source_name}:{line}: {reason}")]
    MalformedLine {
        source_name: String,
        line: usize,
        reason: String,
    },

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("malformed activity table: {0}")]
    MalformedTable(String),

    #[error("malformed baseline statistics at line {line}: {reason}")]
    MalformedBaseline { line: usize, reason: String },

    // Consistency errors (20-29)
    #[error("definitions and statistics are inconsistent ({} issue(s))", .0.len())]
    Inconsistent(Vec<String>),

    // Analysis errors (30-39)
    #[error("no data rows found in {0}")]
    EmptySourceTable(String),

    #[error("event '{0}' is missing from the catalogue or the statistics")]
    UnknownEvent(String),

    // Config errors (40-49)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid settings file: {0}")]
    Toml(#[from] toml::de::Error),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Input errors
    /// - 20-29: Consistency errors
    /// - 30-39: Analysis errors
    /// - 40-49: Config errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::DeclaredCountMismatch { .. } => 10,
            Error::MalformedLine { .. } => 11,
            Error::InvalidValue { .. } => 12,
            Error::MalformedTable(_) => 13,
            Error::MalformedBaseline { .. } => 14,
            Error::Inconsistent(_) => 20,
            Error::EmptySourceTable(_) => 30,
            Error::UnknownEvent(_) => 31,
            Error::Config(_) => 40,
            Error::Toml(_) => 41,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::DeclaredCountMismatch { .. }
            | Error::MalformedLine { .. }
            | Error::InvalidValue { .. }
            | Error::MalformedTable(_)
            | Error::MalformedBaseline { .. } => ErrorCategory::Input,

            Error::Inconsistent(_) => ErrorCategory::Consistency,

            Error::EmptySourceTable(_) | Error::UnknownEvent(_) => ErrorCategory::Analysis,

            Error::Config(_) | Error::Toml(_) => ErrorCategory::Config,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether fixing the inputs and re-running can succeed.
    ///
    /// `UnknownEvent` is a caller bug: statistics were not checked against the
    /// catalogue before simulating.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::UnknownEvent(_))
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::DeclaredCountMismatch { .. } => {
                "Make the first line of the file match the number of entries that follow."
            }
            Error::MalformedLine { .. } => {
                "Check the line format: 'name:kind:min:max:weight' for events, 'name:mean:stddev' for statistics."
            }
            Error::InvalidValue { .. } => {
                "Use finite numbers; standard deviations must be >= 0 and weights positive integers."
            }
            Error::MalformedTable(_) => {
                "Regenerate the activity log with 'ids-core simulate'."
            }
            Error::MalformedBaseline { .. } => {
                "Regenerate the baseline with 'ids-core analyze'."
            }
            Error::Inconsistent(_) => {
                "Run 'ids-core check' and make both files list the same events; discrete events need integer means."
            }
            Error::EmptySourceTable(_) => {
                "Simulate at least one day before estimating a baseline."
            }
            Error::UnknownEvent(_) => {
                "Run the consistency check before simulating. If it passed, report this as a bug."
            }
            Error::Config(_) => "Check the settings file path and contents.",
            Error::Toml(_) => "Fix the TOML syntax in the settings file or remove it to use defaults.",
            Error::Io(_) => "Check that the file exists and that you have permission to read or write it.",
            Error::Json(_) => "Internal serialization failure. Retry with '--format human'.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::DeclaredCountMismatch { .. } => "Declared Count Mismatch",
            Error::MalformedLine { .. } => "Malformed Input Line",
            Error::InvalidValue { .. } => "Invalid Value",
            Error::MalformedTable(_) => "Malformed Activity Table",
            Error::MalformedBaseline { .. } => "Malformed Baseline",
            Error::Inconsistent(_) => "Inconsistent Inputs",
            Error::EmptySourceTable(_) => "Empty Source Table",
            Error::UnknownEvent(_) => "Unknown Event",
            Error::Config(_) => "Configuration Error",
            Error::Toml(_) => "Invalid Settings File",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context (e.g., declared/found counts).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::DeclaredCountMismatch {
                kind,
                declared,
                found,
            } => {
                context.insert("kind".to_string(), serde_json::json!(kind));
                context.insert("declared".to_string(), serde_json::json!(declared));
                context.insert("found".to_string(), serde_json::json!(found));
            }
            Error::MalformedLine {
                source_name, line, ..
            } => {
                context.insert("source".to_string(), serde_json::json!(source_name));
                context.insert("line".to_string(), serde_json::json!(line));
            }
            Error::MalformedBaseline { line, .. } => {
                context.insert("line".to_string(), serde_json::json!(line));
            }
            Error::Inconsistent(issues) => {
                context.insert("issues".to_string(), serde_json::json!(issues));
            }
            Error::UnknownEvent(name) => {
                context.insert("event".to_string(), serde_json::json!(name));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    let mut out = format!(
        "{red}✗{reset} {headline}\n  Reason: {message}",
        headline = err.headline(),
        message = err,
    );
    if let Error::Inconsistent(issues) = err {
        for issue in issues {
            out.push_str(&format!("\n   - {}", issue));
        }
    }
    out.push_str(&format!(
        "\n  {cyan}Fix:{reset} {remediation}",
        remediation = err.remediation()
    ));
    out
}
