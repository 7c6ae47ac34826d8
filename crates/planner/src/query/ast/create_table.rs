//! Defines the AST for a CREATE TABLE statement.

use crate::query::ast::common::TableRef;
use model::core::data_type::TypeTag;

/// Represents a complete CREATE TABLE statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateTable {
    pub table: TableRef,
    pub columns: Vec<ColumnDef>,
    pub engine: TableEngine,
    pub if_not_exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: TypeTag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEngine {
    /// `MergeTree()` ordered by the given columns; an empty list renders
    /// as `ORDER BY tuple()`, i.e. no sorting key.
    MergeTree { order_by: Vec<String> },
}

impl Default for TableEngine {
    fn default() -> Self {
        TableEngine::MergeTree {
            order_by: Vec::new(),
        }
    }
}
