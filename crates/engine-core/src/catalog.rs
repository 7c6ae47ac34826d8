//! Allow-list of table and column names, read from the warehouse catalog.
//!
//! User-supplied names are interpolated into statements only after they have
//! been found here.

use crate::error::ValidationError;
use connectors::warehouse::{adapter::Warehouse, error::DbError};
use model::core::column::ColumnDescriptor;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    database: String,
    tables: Vec<String>,
    columns: HashMap<String, Vec<ColumnDescriptor>>,
}

impl CatalogSnapshot {
    pub fn new(
        database: impl Into<String>,
        tables: Vec<String>,
        columns: HashMap<String, Vec<ColumnDescriptor>>,
    ) -> Self {
        CatalogSnapshot {
            database: database.into(),
            tables,
            columns,
        }
    }

    /// Reads the table list of `database` and the columns of every table in
    /// `wanted` that exists. Missing tables are reported later by
    /// [`CatalogSnapshot::require_table`].
    pub async fn load(
        warehouse: &dyn Warehouse,
        database: &str,
        wanted: &[String],
    ) -> Result<Self, DbError> {
        let tables = warehouse.list_tables(database).await?;

        let mut columns = HashMap::new();
        for table in wanted {
            if tables.contains(table) && !columns.contains_key(table) {
                let cols = warehouse.list_columns(database, table).await?;
                debug!(table = %table, columns = cols.len(), "Loaded catalog columns");
                columns.insert(table.clone(), cols);
            }
        }

        Ok(CatalogSnapshot::new(database, tables, columns))
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.iter().any(|t| t == table)
    }

    pub fn columns(&self, table: &str) -> Option<&[ColumnDescriptor]> {
        self.columns.get(table).map(Vec::as_slice)
    }

    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.columns(table)
            .is_some_and(|cols| cols.iter().any(|c| c.name == column))
    }

    pub fn require_table(&self, table: &str) -> Result<(), ValidationError> {
        if self.has_table(table) {
            Ok(())
        } else {
            Err(ValidationError::UnknownTable {
                database: self.database.clone(),
                table: table.to_string(),
            })
        }
    }

    pub fn require_column(&self, table: &str, column: &str) -> Result<(), ValidationError> {
        self.require_table(table)?;
        if self.has_column(table, column) {
            Ok(())
        } else {
            Err(ValidationError::UnknownColumn {
                table: table.to_string(),
                column: column.to_string(),
            })
        }
    }

    /// Requires `column` to exist in at least one of `tables`.
    pub fn require_column_in_any(
        &self,
        tables: &[&str],
        column: &str,
    ) -> Result<(), ValidationError> {
        if tables.iter().any(|t| self.has_column(t, column)) {
            Ok(())
        } else {
            Err(ValidationError::UnknownColumn {
                table: tables.join(", "),
                column: column.to_string(),
            })
        }
    }
}
