//! Weighted anomaly scoring of a live run against a baseline.
//!
//! For each day, every event with a baseline contributes
//! `|value - mean| / std_dev * weight` to the day's score; a zero baseline
//! standard deviation contributes nothing. The day alerts when its score
//! reaches the threshold, twice the total catalogue weight.
//!
//! Names that appear in the live table but not in the baseline or the
//! catalogue are skipped and counted in [`ScoreDiagnostics`].

use crate::table::ActivityTable;
use ids_common::{Baseline, BaselineStats, EventCatalogue};
use serde::Serialize;
use std::collections::BTreeMap;

/// Day verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Ok,
    Alert,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Ok => write!(f, "OK"),
            Verdict::Alert => write!(f, "ALERT"),
        }
    }
}

/// Score and verdict for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayScore {
    pub day: u32,
    pub score: f64,
    pub threshold: f64,
    pub verdict: Verdict,
}

impl std::fmt::Display for DayScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Day {}: {} (Score={:.2} Threshold={})",
            self.day, self.verdict, self.score, self.threshold
        )
    }
}

/// Live names that did not contribute to any score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreDiagnostics {
    /// Occurrences per skipped name across all days.
    pub skipped_names: BTreeMap<String, usize>,
}

impl ScoreDiagnostics {
    pub fn total_skipped(&self) -> usize {
        self.skipped_names.values().sum()
    }
}

/// Scores for a whole live run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub threshold: f64,
    pub days: BTreeMap<u32, DayScore>,
    pub diagnostics: ScoreDiagnostics,
}

impl ScoreReport {
    /// Days whose verdict is [`Verdict::Alert`], ascending.
    pub fn alert_days(&self) -> Vec<u32> {
        self.days
            .values()
            .filter(|d| d.verdict == Verdict::Alert)
            .map(|d| d.day)
            .collect()
    }

    pub fn any_alert(&self) -> bool {
        self.days.values().any(|d| d.verdict == Verdict::Alert)
    }
}

/// Alert threshold: twice the total weight of the catalogue.
pub fn threshold(events: &EventCatalogue) -> f64 {
    2.0 * events.values().map(|e| f64::from(e.weight)).sum::<f64>()
}

/// Absolute z-score of `value` against `baseline`; 0 for a zero-spread baseline.
pub fn z_score(value: f64, baseline: &Baseline) -> f64 {
    if baseline.std_dev == 0.0 {
        return 0.0;
    }
    (value - baseline.mean).abs() / baseline.std_dev
}

/// Score every day of `live` against `baseline`.
pub fn score(events: &EventCatalogue, baseline: &BaselineStats, live: &ActivityTable) -> ScoreReport {
    let threshold = threshold(events);
    let mut diagnostics = ScoreDiagnostics::default();
    let mut days = BTreeMap::new();

    for (day, row) in live.days() {
        let mut total = 0.0;
        for (name, value) in row {
            let (Some(base), Some(def)) = (baseline.get(name), events.get(name)) else {
                *diagnostics.skipped_names.entry(name.clone()).or_insert(0) += 1;
                continue;
            };
            total += z_score(value.as_f64(), base) * f64::from(def.weight);
        }

        let verdict = if total >= threshold {
            Verdict::Alert
        } else {
            Verdict::Ok
        };
        days.insert(
            day,
            DayScore {
                day,
                score: total,
                threshold,
                verdict,
            },
        );
    }

    if diagnostics.total_skipped() > 0 {
        tracing::warn!(
            names = ?diagnostics.skipped_names.keys().collect::<Vec<_>>(),
            "live events without a baseline or definition were skipped"
        );
    }

    ScoreReport {
        threshold,
        days,
        diagnostics,
    }
}
