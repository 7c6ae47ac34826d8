//! Column names as the user selects them: either bare (`id`) or qualified with
//! the table they come from (`orders.id`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A selected column name split into its optional table prefix and column part.
///
/// Only the first `.` separates the prefix, so `a.b.c` is column `b.c` of table `a`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef<'a> {
    pub table: Option<&'a str>,
    pub column: &'a str,
}

impl<'a> ColumnRef<'a> {
    pub fn parse(name: &'a str) -> Self {
        match name.split_once('.') {
            Some((table, column)) => ColumnRef {
                table: Some(table),
                column,
            },
            None => ColumnRef {
                table: None,
                column: name,
            },
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.table.is_some()
    }

    pub fn belongs_to(&self, table: &str) -> bool {
        self.table == Some(table)
    }
}

impl fmt::Display for ColumnRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.table {
            Some(table) => write!(f, "{table}.{}", self.column),
            None => f.write_str(self.column),
        }
    }
}

/// Ordered list of column names chosen by the user.
///
/// The order is significant: it becomes the destination column order on import
/// and the header order on export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(Vec<String>);

impl Selection {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection(names.into_iter().map(Into::into).collect())
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    /// First selected name that is a duplicate of an earlier one.
    pub fn first_duplicate(&self) -> Option<&str> {
        self.0
            .iter()
            .enumerate()
            .find(|(i, name)| self.0[..*i].contains(name))
            .map(|(_, name)| name.as_str())
    }
}

impl From<Vec<String>> for Selection {
    fn from(names: Vec<String>) -> Self {
        Selection(names)
    }
}
