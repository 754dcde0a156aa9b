//! Consistency between an event catalogue and a statistics set.

use ids_common::{EventCatalogue, EventKind, StatsSet};
use ids_math::is_integral;
use serde::Serialize;

/// One disagreement between definitions and statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ConsistencyIssue {
    /// Defined event with no statistics entry.
    MissingStatistics { name: String },
    /// Statistics entry with no matching definition.
    MissingDefinition { name: String },
    /// Discrete event whose mean is not a whole number.
    NonIntegerMean { name: String, mean: f64 },
}

impl ConsistencyIssue {
    pub fn name(&self) -> &str {
        match self {
            ConsistencyIssue::MissingStatistics { name }
            | ConsistencyIssue::MissingDefinition { name }
            | ConsistencyIssue::NonIntegerMean { name, .. } => name,
        }
    }
}

impl std::fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsistencyIssue::MissingStatistics { name } => {
                write!(f, "{} is present in definitions but missing statistics", name)
            }
            ConsistencyIssue::MissingDefinition { name } => {
                write!(f, "{} is present in statistics but missing a definition", name)
            }
            ConsistencyIssue::NonIntegerMean { name, mean } => {
                write!(f, "discrete event {} has non-integer mean: {}", name, mean)
            }
        }
    }
}

/// Check that `events` and `stats` describe the same events.
///
/// All rules are evaluated; an empty result means the pair is consistent.
/// Issues for catalogue names come first (sorted), then names that only
/// appear in the statistics.
pub fn check_consistency(events: &EventCatalogue, stats: &StatsSet) -> Vec<ConsistencyIssue> {
    let mut issues = Vec::new();

    for (name, def) in events {
        match stats.get(name) {
            None => issues.push(ConsistencyIssue::MissingStatistics { name: name.clone() }),
            Some(stat) if def.kind == EventKind::Discrete && !is_integral(stat.mean) => {
                issues.push(ConsistencyIssue::NonIntegerMean {
                    name: name.clone(),
                    mean: stat.mean,
                });
            }
            Some(_) => {}
        }
    }

    for name in stats.keys() {
        if !events.contains_key(name) {
            issues.push(ConsistencyIssue::MissingDefinition { name: name.clone() });
        }
    }

    issues
}

/// Lift a non-empty issue list into an [`ids_common::Error::Inconsistent`].
pub fn ensure_consistent(events: &EventCatalogue, stats: &StatsSet) -> ids_common::Result<()> {
    let issues = check_consistency(events, stats);
    if issues.is_empty() {
        return Ok(());
    }
    Err(ids_common::Error::Inconsistent(
        issues.iter().map(ToString::to_string).collect(),
    ))
}
