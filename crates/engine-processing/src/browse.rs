//! Read-only operations: connection checks, catalog listings, ad-hoc queries
//! and CSV inspection.

use crate::error::TransferError;
use connectors::{
    file::csv::{
        adapter::{CsvAdapter, CsvTable},
        settings::CsvSettings,
    },
    warehouse::adapter::Warehouse,
};
use model::{
    core::{column::ColumnDescriptor, data_type::TypeTag},
    records::row::RowData,
};
use planner::query::renderer::Statement;
use std::path::Path;
use tracing::info;

pub const DEFAULT_FILE_PREVIEW_LIMIT: usize = 100;

pub async fn connect(warehouse: &dyn Warehouse) -> Result<(), TransferError> {
    warehouse.ping().await.map_err(TransferError::Connection)?;
    info!(database = %warehouse.database(), "Connection verified");
    Ok(())
}

pub async fn list_tables(warehouse: &dyn Warehouse) -> Result<Vec<String>, TransferError> {
    Ok(warehouse.list_tables(warehouse.database()).await?)
}

pub async fn list_columns(
    warehouse: &dyn Warehouse,
    table: &str,
) -> Result<Vec<ColumnDescriptor>, TransferError> {
    Ok(warehouse.list_columns(warehouse.database(), table).await?)
}

/// Runs `sql` as written. The caller is trusted with the statement text.
pub async fn run_query(warehouse: &dyn Warehouse, sql: &str) -> Result<Vec<RowData>, TransferError> {
    Ok(warehouse.execute_query(&Statement::raw(sql)).await?)
}

/// Header names of a CSV file, each reported as a `String` column.
pub fn file_columns(path: &Path, settings: CsvSettings) -> Result<Vec<ColumnDescriptor>, TransferError> {
    let headers = CsvAdapter::new(path, settings)?.read_headers()?;
    Ok(headers
        .into_iter()
        .map(|name| ColumnDescriptor::new(name, TypeTag::String))
        .collect())
}

pub fn file_preview(
    path: &Path,
    settings: CsvSettings,
    limit: usize,
) -> Result<CsvTable, TransferError> {
    Ok(CsvAdapter::new(path, settings)?.read_limit(limit)?)
}
