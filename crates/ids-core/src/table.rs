//! Day-indexed activity tables and their CSV form.
//!
//! An [`ActivityTable`] is the typed in-memory result of a simulation. A
//! [`RawLog`] is whatever was read back from disk, cell text untouched, so
//! that baseline estimation can decide for itself what to skip.

use crate::csv::{parse_record, write_record};
use ids_common::{Error, Result, SampleValue};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Header of the leading day column.
pub const DAY_COLUMN: &str = "day";

/// Values for one day keyed by event name.
pub type DayRow = BTreeMap<String, SampleValue>;

/// Generated (or reloaded) activity, one row per day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityTable {
    columns: Vec<String>,
    days: BTreeMap<u32, DayRow>,
}

impl ActivityTable {
    /// Empty table with the given event columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            days: BTreeMap::new(),
        }
    }

    /// Event columns in output order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Insert or replace the row for `day`.
    pub fn insert_day(&mut self, day: u32, row: DayRow) {
        self.days.insert(day, row);
    }

    pub fn value(&self, day: u32, event: &str) -> Option<SampleValue> {
        self.days.get(&day).and_then(|row| row.get(event)).copied()
    }

    /// Rows in ascending day order.
    pub fn days(&self) -> impl Iterator<Item = (u32, &DayRow)> {
        self.days.iter().map(|(d, row)| (*d, row))
    }

    /// Number of day rows.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// All values of one column in day order. Days missing the column are skipped.
    pub fn column_values(&self, event: &str) -> Vec<SampleValue> {
        self.days
            .values()
            .filter_map(|row| row.get(event).copied())
            .collect()
    }

    /// Write `day,<columns...>` followed by one row per day.
    ///
    /// A day missing a column writes an empty cell.
    pub fn write_csv<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        write_record(
            w,
            std::iter::once(DAY_COLUMN).chain(self.columns.iter().map(String::as_str)),
        )?;
        for (day, row) in &self.days {
            let mut cells = Vec::with_capacity(self.columns.len() + 1);
            cells.push(day.to_string());
            for name in &self.columns {
                cells.push(row.get(name).map(|v| v.to_string()).unwrap_or_default());
            }
            write_record(w, &cells)?;
        }
        Ok(())
    }

    /// Write the table to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        self.write_csv(&mut file)?;
        file.flush()?;
        tracing::debug!(path = %path.display(), days = self.len(), "wrote activity table");
        Ok(())
    }

    /// Strict conversion from a raw log. Any unparsable cell is an error.
    ///
    /// Whole-number cells become [`SampleValue::Int`], other numbers
    /// [`SampleValue::Real`].
    pub fn from_raw(raw: &RawLog) -> Result<Self> {
        let mut table = ActivityTable::new(raw.event_columns().to_vec());

        for (idx, row) in raw.rows.iter().enumerate() {
            let line = idx + 2;
            let day_cell = row.first().map(|c| c.trim()).unwrap_or_default();
            let day = day_cell.parse::<u32>().map_err(|_| {
                Error::MalformedTable(format!("line {}: day '{}' is not a whole number", line, day_cell))
            })?;
            if row.len() < raw.header.len() {
                return Err(Error::MalformedTable(format!(
                    "line {}: expected {} cells, found {}",
                    line,
                    raw.header.len(),
                    row.len()
                )));
            }

            let mut values = DayRow::new();
            for (name, cell) in raw.event_columns().iter().zip(&row[1..]) {
                values.insert(name.clone(), parse_value(cell).ok_or_else(|| {
                    Error::MalformedTable(format!(
                        "line {}: value '{}' for {} is not a number",
                        line,
                        cell.trim(),
                        name
                    ))
                })?);
            }

            if table.days.insert(day, values).is_some() {
                return Err(Error::MalformedTable(format!("line {}: day {} repeated", line, day)));
            }
        }

        Ok(table)
    }
}

fn parse_value(cell: &str) -> Option<SampleValue> {
    let cell = cell.trim();
    if let Ok(v) = cell.parse::<i64>() {
        return Some(SampleValue::Int(v));
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(SampleValue::Real(v)),
        _ => None,
    }
}

/// A persisted table as text: header plus non-empty rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLog {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawLog {
    /// Parse CSV text. Empty lines are dropped; an input with no lines has
    /// an empty header.
    pub fn parse(text: &str) -> Self {
        let mut lines = text.lines();
        let header = lines.next().map(parse_record).unwrap_or_default();
        if !header.is_empty() && !header[0].trim().eq_ignore_ascii_case(DAY_COLUMN) {
            tracing::warn!(first = %header[0], "first column is not 'day' as expected");
        }
        let rows = lines
            .map(parse_record)
            .filter(|row| !row.is_empty())
            .collect();
        Self { header, rows }
    }

    /// Read and parse a CSV file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Event column names (header without the day column).
    pub fn event_columns(&self) -> &[String] {
        self.header.get(1..).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ActivityTable {
        let mut table = ActivityTable::new(vec!["A".into(), "B".into()]);
        for day in 1..=3 {
            let mut row = DayRow::new();
            row.insert("A".into(), SampleValue::Int(day as i64));
            row.insert("B".into(), SampleValue::Real(0.5 * day as f64));
            table.insert_day(day, row);
        }
        table
    }

    #[test]
    fn csv_layout() {
        let mut buf = Vec::new();
        sample_table().write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "day,A,B\n1,1,0.50\n2,2,1.00\n3,3,1.50\n");
    }

    #[test]
    fn strict_reload_matches() {
        let mut buf = Vec::new();
        let table = sample_table();
        table.write_csv(&mut buf).unwrap();
        let raw = RawLog::parse(std::str::from_utf8(&buf).unwrap());
        let reloaded = ActivityTable::from_raw(&raw).unwrap();
        assert_eq!(reloaded.columns(), table.columns());
        assert_eq!(reloaded.value(2, "A"), Some(SampleValue::Int(2)));
        assert_eq!(reloaded.value(3, "B"), Some(SampleValue::Real(1.5)));
    }

    #[test]
    fn strict_reload_rejects_bad_cell() {
        let raw = RawLog::parse("day,A\n1,oops\n");
        let err = ActivityTable::from_raw(&raw).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn strict_reload_rejects_repeated_day() {
        let raw = RawLog::parse("day,A\n1,1\n1,2\n");
        assert!(matches!(ActivityTable::from_raw(&raw), Err(Error::MalformedTable(_))));
    }

    #[test]
    fn raw_log_drops_empty_lines() {
        let raw = RawLog::parse("day,A\n\n1,4\n\n");
        assert_eq!(raw.header, vec!["day", "A"]);
        assert_eq!(raw.rows, vec![vec!["1".to_string(), "4".to_string()]]);
        assert_eq!(raw.event_columns(), ["A".to_string()]);
    }

    #[test]
    fn empty_text_has_no_header() {
        let raw = RawLog::parse("");
        assert!(raw.header.is_empty());
        assert!(raw.event_columns().is_empty());
    }

    #[test]
    fn column_values_in_day_order() {
        let values = sample_table().column_values("A");
        assert_eq!(values, vec![SampleValue::Int(1), SampleValue::Int(2), SampleValue::Int(3)]);
    }
}
