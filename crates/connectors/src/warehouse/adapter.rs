use crate::warehouse::error::DbError;
use async_trait::async_trait;
use model::{core::column::ColumnDescriptor, records::row::RowData};
use planner::query::{
    ast::{common::TableRef, create_table::CreateTable},
    renderer::Statement,
};

/// The analytical store rows are exported from and imported into.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Database the connection is scoped to.
    fn database(&self) -> &str;

    async fn ping(&self) -> Result<(), DbError>;

    // Statements
    async fn execute_query(&self, statement: &Statement) -> Result<Vec<RowData>, DbError>;
    async fn create_table(&self, table: &CreateTable) -> Result<(), DbError>;
    async fn insert_rows(&self, table: &TableRef, rows: &[RowData]) -> Result<(), DbError>;

    // Introspection
    async fn table_exists(&self, database: &str, table: &str) -> Result<bool, DbError>;
    async fn list_tables(&self, database: &str) -> Result<Vec<String>, DbError>;
    async fn list_columns(
        &self,
        database: &str,
        table: &str,
    ) -> Result<Vec<ColumnDescriptor>, DbError>;
}
