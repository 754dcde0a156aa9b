//! Activity IDS input loading and validation.
//!
//! This crate provides:
//! - Parsers for the event catalogue and statistics files
//! - The definitions/statistics consistency check
//! - Run settings (TOML) and their resolution order

pub mod catalogue;
pub mod resolve;
pub mod settings;
pub mod stats;
pub mod validate;

pub use catalogue::{load_events, parse_events};
pub use resolve::{load_settings, resolve_settings_path, ConfigSource, ResolvedSettings};
pub use settings::Settings;
pub use stats::{load_stats, parse_stats};
pub use validate::{check_consistency, ensure_consistent, ConsistencyIssue};

/// Default settings file name.
pub const SETTINGS_FILENAME: &str = "ids.toml";

/// Split a declaration file into its declared count and numbered entry lines.
///
/// Blank lines are ignored. Line numbers are 1-based and refer to the
/// physical line in the source.
pub(crate) fn split_declared<'a>(
    text: &'a str,
    source: &str,
    what: &str,
) -> ids_common::Result<(usize, Vec<(usize, &'a str)>)> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (count_line, count_text) = lines.next().ok_or_else(|| ids_common::Error::MalformedLine {
        source_name: source.to_string(),
        line: 1,
        reason: format!("missing declared {} count", what),
    })?;

    let declared = count_text
        .parse::<usize>()
        .map_err(|_| ids_common::Error::MalformedLine {
            source_name: source.to_string(),
            line: count_line,
            reason: format!("declared {} count '{}' is not a whole number", what, count_text),
        })?;

    Ok((declared, lines.collect()))
}

/// Parse a finite float field, reporting the field name on failure.
pub(crate) fn parse_finite(
    text: &str,
    field: &str,
    source: &str,
    line: usize,
) -> ids_common::Result<f64> {
    let value = text
        .trim()
        .parse::<f64>()
        .map_err(|_| ids_common::Error::MalformedLine {
            source_name: source.to_string(),
            line,
            reason: format!("{} '{}' is not a number", field, text.trim()),
        })?;
    if !value.is_finite() {
        return Err(ids_common::Error::InvalidValue {
            field: field.to_string(),
            message: format!("must be finite, got {}", value),
        });
    }
    Ok(value)
}
