//! Event catalogue and per-event statistics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Catalogue of event definitions keyed by unique name.
///
/// Iteration order is lexicographic by name, which is also the column order
/// of every generated table.
pub type EventCatalogue = BTreeMap<String, EventDefinition>;

/// Per-event generation or baseline parameters keyed by name.
pub type StatsSet = BTreeMap<String, EventStatistics>;

/// Per-event baseline computed from an activity table.
pub type BaselineStats = BTreeMap<String, Baseline>;

/// Whether an event takes integer or real values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Integer-valued; marked `D` in catalogue files.
    Discrete,
    /// Real-valued, reported to two decimal places.
    Continuous,
}

impl EventKind {
    /// Parse the catalogue marker. `D` is discrete; any other marker is continuous.
    pub fn from_marker(marker: &str) -> Self {
        if marker == "D" {
            EventKind::Discrete
        } else {
            EventKind::Continuous
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Discrete => write!(f, "discrete"),
            EventKind::Continuous => write!(f, "continuous"),
        }
    }
}

/// A named measurable activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub name: String,
    pub kind: EventKind,
    /// Lower bound; `None` means unbounded below.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound; `None` means unbounded above.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Contribution of this event to the daily anomaly score. Always >= 1.
    pub weight: u32,
}

impl EventDefinition {
    pub fn new(name: impl Into<String>, kind: EventKind) -> Self {
        Self {
            name: name.into(),
            kind,
            min: None,
            max: None,
            weight: 1,
        }
    }

    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }
}

impl std::fmt::Display for EventDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bound = |b: Option<f64>| b.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{} ({}, min={}, max={}, weight={})",
            self.name,
            self.kind,
            bound(self.min),
            bound(self.max),
            self.weight
        )
    }
}

/// Gaussian parameters for one event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventStatistics {
    pub mean: f64,
    /// Always finite and >= 0 once loaded.
    pub std_dev: f64,
}

impl EventStatistics {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }
}

impl std::fmt::Display for EventStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mean={} std_dev={}", self.mean, self.std_dev)
    }
}

/// Baseline mean and sample standard deviation, stored at two-decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub mean: f64,
    pub std_dev: f64,
}

impl Baseline {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }
}

/// One generated measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleValue {
    /// Value of a discrete event.
    Int(i64),
    /// Value of a continuous event, already rounded to two decimals.
    Real(f64),
}

impl SampleValue {
    pub fn as_f64(self) -> f64 {
        match self {
            SampleValue::Int(v) => v as f64,
            SampleValue::Real(v) => v,
        }
    }
}

impl std::fmt::Display for SampleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleValue::Int(v) => write!(f, "{}", v),
            SampleValue::Real(v) => write!(f, "{:.2}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_marker_parsing() {
        assert_eq!(EventKind::from_marker("D"), EventKind::Discrete);
        assert_eq!(EventKind::from_marker("C"), EventKind::Continuous);
        assert_eq!(EventKind::from_marker("anything"), EventKind::Continuous);
        // Marker is case-sensitive.
        assert_eq!(EventKind::from_marker("d"), EventKind::Continuous);
    }

    #[test]
    fn sample_value_display() {
        assert_eq!(SampleValue::Int(5).to_string(), "5");
        assert_eq!(SampleValue::Real(5.0).to_string(), "5.00");
        assert_eq!(SampleValue::Real(12.346).to_string(), "12.35");
        assert_eq!(SampleValue::Int(-3).as_f64(), -3.0);
    }

    #[test]
    fn catalogue_iterates_sorted() {
        let mut cat = EventCatalogue::new();
        for name in ["Logins", "Emails sent", "Time online"] {
            cat.insert(name.into(), EventDefinition::new(name, EventKind::Discrete));
        }
        let names: Vec<&str> = cat.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Emails sent", "Logins", "Time online"]);
    }

    #[test]
    fn definition_display() {
        let def = EventDefinition::new("Logins", EventKind::Discrete)
            .with_bounds(Some(0.0), None)
            .with_weight(2);
        assert_eq!(def.to_string(), "Logins (discrete, min=0, max=-, weight=2)");
    }

    #[test]
    fn sample_value_json_is_bare_number() {
        assert_eq!(serde_json::to_string(&SampleValue::Int(4)).unwrap(), "4");
        assert_eq!(serde_json::to_string(&SampleValue::Real(1.5)).unwrap(), "1.5");
    }
}
