//! Warehouse to CSV export and table previews.

use crate::error::TransferError;
use connectors::{
    file::csv::{settings::CsvSettings, writer},
    warehouse::adapter::Warehouse,
};
use engine_core::{
    catalog::CatalogSnapshot,
    export::{check_join_arity, join_query, preview_query, table_query},
    projection::{ExportProjector, Fallback},
};
use model::{core::identifiers::Selection, records::row::RowData};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub table: String,
    pub selection: Selection,
    pub limit: Option<u64>,
    pub output: PathBuf,
    pub settings: CsvSettings,
}

#[derive(Debug, Clone)]
pub struct JoinExportRequest {
    /// The first table anchors the join.
    pub tables: Vec<String>,
    /// Condition joining `tables[i + 1]`; blank entries skip that table.
    pub conditions: Vec<String>,
    pub selection: Selection,
    pub limit: Option<u64>,
    pub output: PathBuf,
    pub settings: CsvSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub file_path: PathBuf,
    pub rows: usize,
}

pub async fn export_table(
    warehouse: &dyn Warehouse,
    request: &ExportRequest,
) -> Result<ExportSummary, TransferError> {
    let database = warehouse.database();
    let catalog =
        CatalogSnapshot::load(warehouse, database, std::slice::from_ref(&request.table)).await?;
    let statement = table_query(&catalog, &request.table, &request.selection, request.limit)?;

    let rows = warehouse
        .execute_query(&statement)
        .await
        .map_err(TransferError::from)?;
    let rows = ExportProjector::new(&request.selection, Fallback::Raw).project_all(&rows);

    let written = writer::write_all(
        &request.output,
        &rows,
        request.selection.names(),
        request.settings,
    )?;
    info!(
        table = %request.table,
        rows = written,
        path = %request.output.display(),
        "Exported table"
    );

    Ok(ExportSummary {
        file_path: request.output.clone(),
        rows: written,
    })
}

/// Exports the join of `request.tables`. A single table is exported with
/// [`export_table`].
pub async fn export_join(
    warehouse: &dyn Warehouse,
    request: &JoinExportRequest,
) -> Result<ExportSummary, TransferError> {
    check_join_arity(&request.tables, &request.conditions)?;

    if let [table] = request.tables.as_slice() {
        return export_table(
            warehouse,
            &ExportRequest {
                table: table.clone(),
                selection: request.selection.clone(),
                limit: request.limit,
                output: request.output.clone(),
                settings: request.settings,
            },
        )
        .await;
    }

    let catalog = CatalogSnapshot::load(warehouse, warehouse.database(), &request.tables).await?;
    let statement = join_query(
        &catalog,
        &request.tables,
        &request.conditions,
        &request.selection,
        request.limit,
    )?;

    let rows = warehouse.execute_query(&statement).await?;
    let rows = ExportProjector::new(&request.selection, Fallback::Raw).project_all(&rows);

    let written = writer::write_all(
        &request.output,
        &rows,
        request.selection.names(),
        request.settings,
    )?;
    info!(
        tables = ?request.tables,
        rows = written,
        path = %request.output.display(),
        "Exported joined tables"
    );

    Ok(ExportSummary {
        file_path: request.output.clone(),
        rows: written,
    })
}

/// First `limit` rows of `table`, keyed by the selected names. Keys that match
/// no selected name are prefixed with the table name.
pub async fn preview_table(
    warehouse: &dyn Warehouse,
    table: &str,
    selection: &Selection,
    limit: u64,
) -> Result<Vec<RowData>, TransferError> {
    let catalog =
        CatalogSnapshot::load(warehouse, warehouse.database(), &[table.to_string()]).await?;
    let statement = preview_query(&catalog, table, selection, limit)?;

    let rows = warehouse.execute_query(&statement).await?;
    Ok(ExportProjector::new(selection, Fallback::Qualify(table)).project_all(&rows))
}
