//! Baseline estimation from an activity table.
//!
//! Each event column is reduced to a mean and a Bessel-corrected sample
//! standard deviation, both stored at two decimals. Empty or non-numeric
//! cells are left out of their column's sample and counted in
//! [`EstimateDiagnostics`]; a column with nothing left gets `(0.0, 0.0)`.
//! A table with no data rows at all is an error.

use crate::csv::{parse_record, write_record};
use crate::table::{ActivityTable, RawLog};
use ids_common::{Baseline, BaselineStats, Error, Result};
use ids_math::{round2, SampleSummary};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Header of the baseline artifact.
pub const BASELINE_HEADER: [&str; 3] = ["Event", "Mean", "StdDev"];

/// What estimation had to leave out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EstimateDiagnostics {
    /// Data rows read.
    pub rows: usize,
    /// Cells omitted per column (empty, non-numeric, or missing from a short row).
    pub skipped_cells: BTreeMap<String, usize>,
}

impl EstimateDiagnostics {
    pub fn total_skipped(&self) -> usize {
        self.skipped_cells.values().sum()
    }

    fn skip(&mut self, column: &str) {
        *self.skipped_cells.entry(column.to_string()).or_insert(0) += 1;
    }
}

/// Baseline statistics together with their diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineEstimate {
    pub stats: BaselineStats,
    pub diagnostics: EstimateDiagnostics,
}

/// Estimate a baseline from a generated table.
pub fn estimate(table: &ActivityTable) -> Result<BaselineEstimate> {
    if table.is_empty() {
        return Err(Error::EmptySourceTable("activity table".to_string()));
    }

    let mut diagnostics = EstimateDiagnostics {
        rows: table.len(),
        ..Default::default()
    };
    let mut samples: Vec<(&str, Vec<f64>)> = Vec::with_capacity(table.columns().len());
    for name in table.columns() {
        let mut values = Vec::with_capacity(table.len());
        for (_, row) in table.days() {
            match row.get(name) {
                Some(v) if v.as_f64().is_finite() => values.push(v.as_f64()),
                _ => diagnostics.skip(name),
            }
        }
        samples.push((name.as_str(), values));
    }

    Ok(finish(samples, diagnostics))
}

/// Estimate a baseline from a persisted log, skipping bad cells.
///
/// The first column is the day index and is not summarized.
pub fn estimate_log(log: &RawLog) -> Result<BaselineEstimate> {
    if log.header.is_empty() {
        return Err(Error::EmptySourceTable("log (no header)".to_string()));
    }
    if log.rows.is_empty() {
        return Err(Error::EmptySourceTable("log".to_string()));
    }

    let columns = log.event_columns();
    let mut diagnostics = EstimateDiagnostics::default();
    let mut samples: Vec<(&str, Vec<f64>)> = columns
        .iter()
        .map(|name| (name.as_str(), Vec::with_capacity(log.rows.len())))
        .collect();

    for row in &log.rows {
        diagnostics.rows += 1;
        for (col, (name, values)) in samples.iter_mut().enumerate() {
            match row.get(col + 1).and_then(|cell| parse_cell(cell)) {
                Some(v) => values.push(v),
                None => diagnostics.skip(*name),
            }
        }
        if diagnostics.rows == 1 || diagnostics.rows % 10 == 0 {
            tracing::debug!(rows = diagnostics.rows, "processed days from log");
        }
    }

    Ok(finish(samples, diagnostics))
}

fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn finish(samples: Vec<(&str, Vec<f64>)>, diagnostics: EstimateDiagnostics) -> BaselineEstimate {
    let stats = samples
        .into_iter()
        .map(|(name, values)| {
            let summary = SampleSummary::from_values(&values);
            (
                name.to_string(),
                Baseline::new(round2(summary.mean), round2(summary.std_dev)),
            )
        })
        .collect();

    if diagnostics.total_skipped() > 0 {
        tracing::warn!(
            skipped = diagnostics.total_skipped(),
            "omitted malformed or empty cells from baseline samples"
        );
    }

    BaselineEstimate { stats, diagnostics }
}

/// Write the `Event,Mean,StdDev` artifact.
pub fn write_baseline_csv<W: Write + ?Sized>(stats: &BaselineStats, w: &mut W) -> Result<()> {
    write_record(w, BASELINE_HEADER)?;
    for (name, b) in stats {
        write_record(
            w,
            [name.clone(), format!("{:.2}", b.mean), format!("{:.2}", b.std_dev)],
        )?;
    }
    Ok(())
}

/// Write the baseline artifact to `path`.
pub fn save_baseline(stats: &BaselineStats, path: &Path) -> Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_baseline_csv(stats, &mut file)?;
    file.flush()?;
    tracing::debug!(path = %path.display(), events = stats.len(), "wrote baseline statistics");
    Ok(())
}

/// Parse a baseline artifact.
///
/// The first line is the header. Rows with fewer than three fields are
/// skipped; unparsable numbers are an error.
pub fn parse_baseline_csv(text: &str) -> Result<BaselineStats> {
    let mut stats = BaselineStats::new();
    for (idx, line) in text.lines().enumerate().skip(1) {
        let fields = parse_record(line);
        if fields.len() < 3 {
            continue;
        }
        let number = |field: &str, what: &str| {
            field
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| Error::MalformedBaseline {
                    line: idx + 1,
                    reason: format!("{} '{}' is not a number", what, field.trim()),
                })
        };
        let mean = number(fields[1].as_str(), "mean")?;
        let std_dev = number(fields[2].as_str(), "stddev")?;
        stats.insert(fields[0].clone(), Baseline::new(mean, std_dev));
    }
    Ok(stats)
}

/// Load a baseline artifact from `path`.
pub fn load_baseline(path: &Path) -> Result<BaselineStats> {
    let text = std::fs::read_to_string(path)?;
    parse_baseline_csv(&text)
}
