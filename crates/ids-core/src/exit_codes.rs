//! Process exit codes for the `ids-core` CLI.
//!
//! Ranges:
//! - 0-9: operational outcomes (parse outcome from code, not output)
//! - 10-19: user/input errors (fixable by the caller)
//! - 20-29: internal or I/O failures

use ids_common::{Error, ErrorCategory};

/// Stable exit codes for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Run finished and no day alerted.
    Clean = 0,

    /// Run finished and at least one day alerted.
    AlertRaised = 1,

    /// Invalid arguments.
    ArgsError = 10,

    /// An input file was malformed or unusable.
    InputError = 11,

    /// Definitions and statistics disagree.
    ConsistencyError = 12,

    /// Internal error (bug - please report).
    InternalError = 20,

    /// I/O error.
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Codes below 10 are outcomes, not failures.
    pub fn is_operational(self) -> bool {
        (self as i32) < 10
    }

    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }

    /// Stable name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::AlertRaised => "OK_ALERT",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::ConsistencyError => "ERR_CONSISTENCY",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Outcome code for a finished scoring run.
    pub fn for_alerts(any_alert: bool) -> Self {
        if any_alert {
            ExitCode::AlertRaised
        } else {
            ExitCode::Clean
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        if !err.is_recoverable() {
            return ExitCode::InternalError;
        }
        match err.category() {
            ErrorCategory::Input | ErrorCategory::Analysis => ExitCode::InputError,
            ErrorCategory::Consistency => ExitCode::ConsistencyError,
            ErrorCategory::Config => ExitCode::ArgsError,
            ErrorCategory::Io => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        assert!(ExitCode::Clean.is_operational());
        assert!(ExitCode::AlertRaised.is_operational());
        assert!(!ExitCode::AlertRaised.is_error());
        assert!(ExitCode::InputError.is_user_error());
        assert!(ExitCode::IoError.is_error());
        assert!(!ExitCode::IoError.is_user_error());
    }

    #[test]
    fn test_error_mapping() {
        let err = Error::Inconsistent(vec!["x".into()]);
        assert_eq!(ExitCode::from(&err), ExitCode::ConsistencyError);
        let err = Error::MalformedTable("no header".into());
        assert_eq!(ExitCode::from(&err), ExitCode::InputError);
        let err = Error::Config("bad".into());
        assert_eq!(ExitCode::from(&err), ExitCode::ArgsError);
        let err = Error::EmptySourceTable("activity_log.csv".into());
        assert_eq!(ExitCode::from(&err), ExitCode::InputError);
        let err = Error::UnknownEvent("Logins".into());
        assert_eq!(ExitCode::from(&err), ExitCode::InternalError);
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::AlertRaised.to_string(), "OK_ALERT (1)");
        assert_eq!(ExitCode::for_alerts(false), ExitCode::Clean);
    }
}
