//! Column type inference from a sample of CSV rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use model::{
    core::{data_type::TypeTag, value::Value},
    records::row::RowData,
};
use std::collections::HashMap;

/// Number of leading rows examined when no other size is configured.
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// What the non-empty cells of a column seen so far are compatible with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnEvidence {
    seen: bool,
    integer: bool,
    numeric: bool,
    temporal: bool,
}

impl Default for ColumnEvidence {
    fn default() -> Self {
        ColumnEvidence {
            seen: false,
            integer: true,
            numeric: true,
            temporal: true,
        }
    }
}

impl ColumnEvidence {
    fn observe(&mut self, cell: &str) {
        self.seen = true;
        if self.numeric && !is_numeric(cell) {
            self.numeric = false;
        }
        if self.integer && !is_integer(cell) {
            self.integer = false;
        }
        if self.temporal && !is_temporal(cell) {
            self.temporal = false;
        }
    }

    fn resolve(&self) -> TypeTag {
        if !self.seen {
            TypeTag::String
        } else if self.integer {
            TypeTag::Int64
        } else if self.numeric {
            TypeTag::Float64
        } else if self.temporal {
            TypeTag::DateTime
        } else {
            TypeTag::String
        }
    }
}

/// The leading `size` rows of `rows`.
pub fn sample(rows: &[RowData], size: usize) -> &[RowData] {
    &rows[..rows.len().min(size)]
}

/// Infers one type per header from `sample`.
///
/// Empty and null cells carry no evidence, so a column with no values in the
/// sample resolves to `String`. An empty sample yields an empty mapping and
/// callers treat absent columns as `String`.
pub fn infer_column_types(headers: &[String], sample: &[RowData]) -> HashMap<String, TypeTag> {
    if sample.is_empty() {
        return HashMap::new();
    }

    headers
        .iter()
        .map(|header| {
            let mut evidence = ColumnEvidence::default();
            for row in sample {
                match row.value(header) {
                    None | Some(Value::Null) => {}
                    Some(Value::String(s)) if s.is_empty() => {}
                    Some(Value::String(s)) => evidence.observe(s),
                    Some(other) => evidence.observe(&other.to_string()),
                }
            }
            (header.clone(), evidence.resolve())
        })
        .collect()
}

/// Matches `^-?\d+$` with ASCII digits.
fn is_integer(cell: &str) -> bool {
    let digits = cell.strip_prefix('-').unwrap_or(cell);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_numeric(cell: &str) -> bool {
    cell.trim().parse::<f64>().is_ok_and(f64::is_finite)
}

fn is_temporal(cell: &str) -> bool {
    let cell = cell.trim();
    DateTime::parse_from_rfc3339(cell).is_ok()
        || DateTime::parse_from_rfc2822(cell).is_ok()
        || DATETIME_FORMATS
            .iter()
            .any(|f| NaiveDateTime::parse_from_str(cell, f).is_ok())
        || DATE_FORMATS
            .iter()
            .any(|f| NaiveDate::parse_from_str(cell, f).is_ok())
}
