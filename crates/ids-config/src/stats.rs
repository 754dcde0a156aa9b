//! Statistics file parsing.
//!
//! Format: the first line declares the number of entries, then one
//! `name:mean:stddev` entry per line. Used for both baseline parameters
//! and live-generation parameters.

use crate::{parse_finite, split_declared};
use ids_common::{Error, EventStatistics, Result, StatsSet};
use std::path::Path;

/// Load a statistics set from a file.
pub fn load_stats(path: &Path) -> Result<StatsSet> {
    let text = std::fs::read_to_string(path)?;
    parse_stats(&text, &path.display().to_string())
}

/// Parse a statistics set. Same count policy as [`crate::parse_events`].
pub fn parse_stats(text: &str, source: &str) -> Result<StatsSet> {
    let (declared, entries) = split_declared(text, source, "statistics")?;

    let mut stats = StatsSet::new();
    for (line, entry) in entries {
        let parts: Vec<&str> = entry.split(':').collect();
        if parts.len() < 3 {
            return Err(Error::MalformedLine {
                source_name: source.to_string(),
                line,
                reason: format!("expected 'name:mean:stddev', got {} field(s)", parts.len()),
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

        let mean = parse_finite(parts[1], &format!("stats.{}.mean", name), source, line)?;
        let std_dev = parse_finite(parts[2], &format!("stats.{}.std_dev", name), source, line)?;
        if std_dev < 0.0 {
            return Err(Error::InvalidValue {
                field: format!("stats.{}.std_dev", name),
                message: format!("must be >= 0, got {}", std_dev),
            });
        }

        stats.insert(name.to_string(), EventStatistics::new(mean, std_dev));
    }

    if stats.len() != declared {
        return Err(Error::DeclaredCountMismatch {
            kind: "statistics".to_string(),
            declared,
            found: stats.len(),
        });
    }

    tracing::debug!(source = source, count = stats.len(), "loaded statistics");
    Ok(stats)
}
