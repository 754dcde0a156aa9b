//! Event catalogue parsing.
//!
//! Format: the first line declares the number of events, then one
//! `name:kind:min:max:weight` entry per line.

use crate::{parse_finite, split_declared};
use ids_common::{Error, EventCatalogue, EventDefinition, EventKind, Result};
use std::path::Path;

/// Lower bound used when the `min` field is blank.
pub const DEFAULT_MIN: f64 = 0.0;

/// Weight used when the `weight` field is blank.
pub const DEFAULT_WEIGHT: u32 = 1;

/// Load an event catalogue from a file.
pub fn load_events(path: &Path) -> Result<EventCatalogue> {
    let text = std::fs::read_to_string(path)?;
    parse_events(&text, &path.display().to_string())
}

/// Parse an event catalogue.
///
/// A repeated name replaces the earlier entry, so duplicates surface as a
/// count mismatch. Nothing is returned unless the whole file parses.
pub fn parse_events(text: &str, source: &str) -> Result<EventCatalogue> {
    let (declared, entries) = split_declared(text, source, "event")?;

    let mut events = EventCatalogue::new();
    for (line, entry) in entries {
        let def = parse_event_line(entry, source, line)?;
        if let (Some(min), Some(max)) = (def.min, def.max) {
            if min > max {
                tracing::warn!(
                    source = source,
                    line = line,
                    event = %def.name,
                    min = min,
                    max = max,
                    "event bounds are inverted; the upper bound wins when clamping"
                );
            }
        }
        if events.insert(def.name.clone(), def).is_some() {
            tracing::debug!(source = source, line = line, "duplicate event name replaced");
        }
    }

    if events.len() != declared {
        return Err(Error::DeclaredCountMismatch {
            kind: "events".to_string(),
            declared,
            found: events.len(),
        });
    }

    tracing::debug!(source = source, count = events.len(), "loaded event catalogue");
    Ok(events)
}

fn parse_event_line(entry: &str, source: &str, line: usize) -> Result<EventDefinition> {
    let parts: Vec<&str> = entry.split(':').collect();
    if parts.len() < 5 {
        return Err(Error::MalformedLine {
            source_name: source.to_string(),
            line,
            reason: format!(
                "expected 'name:kind:min:max:weight', got {} field(s)",
                parts.len()
            ),
        });
    }

    let name = parts[0].trim();
    if name.is_empty() {
        return Err(Error::MalformedLine {
            source_name: source.to_string(),
            line,
            reason: "event name is empty".to_string(),
        });
    }

    let kind = EventKind::from_marker(parts[1].trim());

    let min = match parts[2].trim() {
        "" => Some(DEFAULT_MIN),
        text => Some(parse_finite(text, &format!("events.{}.min", name), source, line)?),
    };
    let max = match parts[3].trim() {
        "" => None,
        text => Some(parse_finite(text, &format!("events.{}.max", name), source, line)?),
    };

    let weight = match parts[4].trim() {
        "" => DEFAULT_WEIGHT,
        text => text.parse::<u32>().map_err(|_| Error::MalformedLine {
            source_name: source.to_string(),
            line,
            reason: format!("weight '{}' is not a whole number", text),
        })?,
    };
    if weight == 0 {
        return Err(Error::InvalidValue {
            field: format!("events.{}.weight", name),
            message: "must be a positive integer".to_string(),
        });
    }

    Ok(EventDefinition {
        name: name.to_string(),
        kind,
        min,
        max,
        weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "3\n\
        Logins:D:0::3\n\
        Time online:C:0:1440:2\n\
        Emails sent:D:::\n";

    #[test]
    fn parses_all_fields_and_defaults() {
        let events = parse_events(SAMPLE, "Events.txt").unwrap();
        assert_eq!(events.len(), 3);

        let logins = &events["Logins"];
        assert_eq!(logins.kind, EventKind::Discrete);
        assert_eq!(logins.min, Some(0.0));
        assert_eq!(logins.max, None);
        assert_eq!(logins.weight, 3);

        let online = &events["Time online"];
        assert_eq!(online.kind, EventKind::Continuous);
        assert_eq!(online.max, Some(1440.0));

        let emails = &events["Emails sent"];
        assert_eq!(emails.min, Some(DEFAULT_MIN));
        assert_eq!(emails.max, None);
        assert_eq!(emails.weight, DEFAULT_WEIGHT);
    }

    #[test]
    fn declared_count_mismatch() {
        let err = parse_events("2\nA:D:0:10:1\n", "Events.txt").unwrap_err();
        match err {
            Error::DeclaredCountMismatch {
                declared, found, ..
            } => {
                assert_eq!(declared, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicate_name_counts_once() {
        let err = parse_events("2\nA:D:0:10:1\nA:D:0:5:1\n", "Events.txt").unwrap_err();
        assert!(matches!(err, Error::DeclaredCountMismatch { found: 1, .. }));
    }

    #[test]
    fn blank_lines_ignored() {
        let events = parse_events("\n1\n\nA:D:0:10:1\n\n", "Events.txt").unwrap();
        assert!(events.contains_key("A"));
    }

    #[test]
    fn short_line_is_malformed() {
        let err = parse_events("1\nA:D:0\n", "Events.txt").unwrap_err();
        assert!(matches!(err, Error::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn bad_count_is_malformed() {
        let err = parse_events("two\nA:D:0:10:1\n", "Events.txt").unwrap_err();
        assert!(matches!(err, Error::MalformedLine { line: 1, .. }));
        let err = parse_events("", "Events.txt").unwrap_err();
        assert!(matches!(err, Error::MalformedLine { .. }));
    }

    #[test]
    fn zero_weight_rejected() {
        let err = parse_events("1\nA:D:0:10:0\n", "Events.txt").unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
    }

    #[test]
    fn non_numeric_bound_rejected() {
        let err = parse_events("1\nA:C:low:10:1\n", "Events.txt").unwrap_err();
        assert!(err.to_string().contains("events.A.min"));
    }
}
