//! Defines the AST for an INSERT statement whose rows travel in the request body.

use crate::query::ast::common::TableRef;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insert {
    pub table: TableRef,
    /// Explicit column list; empty means every column of the table.
    pub columns: Vec<String>,
    pub format: InsertFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertFormat {
    /// One JSON object per line.
    #[default]
    JsonEachRow,
}

impl InsertFormat {
    pub fn name(&self) -> &'static str {
        match self {
            InsertFormat::JsonEachRow => "JSONEachRow",
        }
    }
}
