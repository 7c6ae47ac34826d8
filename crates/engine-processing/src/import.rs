//! CSV to warehouse import.

use crate::{
    error::TransferError,
    loader::{BatchLoader, DEFAULT_BATCH_SIZE, WarehouseSink},
};
use connectors::{
    file::csv::{adapter::CsvAdapter, settings::CsvSettings},
    warehouse::adapter::Warehouse,
};
use engine_core::{
    catalog::CatalogSnapshot,
    error::ValidationError,
    inference::{DEFAULT_SAMPLE_SIZE, infer_column_types, sample},
    projection::ImportProjector,
    sanitize::NameMapping,
    schema::plan::SchemaPlan,
};
use model::core::{column::ColumnDescriptor, identifiers::Selection};
use planner::query::{ast::common::TableRef, ident::validate_identifier};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub file: PathBuf,
    pub settings: CsvSettings,
    pub table: String,
    /// CSV columns to import; their order is the destination column order.
    pub selection: Selection,
    /// Create the table from the inferred schema when it does not exist.
    pub create_table: bool,
    pub batch_size: usize,
    pub sample_size: usize,
}

impl ImportRequest {
    pub fn new(file: impl Into<PathBuf>, table: impl Into<String>, selection: Selection) -> Self {
        ImportRequest {
            file: file.into(),
            settings: CsvSettings::default(),
            table: table.into(),
            selection,
            create_table: false,
            batch_size: DEFAULT_BATCH_SIZE,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub table: String,
    pub created: bool,
    /// Destination columns, with inferred types on the create path.
    pub columns: Vec<ColumnDescriptor>,
    pub rows_inserted: usize,
    pub batches: Vec<usize>,
}

/// Imports the selected columns of a CSV file into `request.table`.
///
/// Everything that can be checked without writing is checked first: the file,
/// the selection, the connection and, for an existing table, its columns.
pub async fn import_csv(
    warehouse: &dyn Warehouse,
    request: &ImportRequest,
    cancel: &CancellationToken,
) -> Result<ImportSummary, TransferError> {
    let adapter = CsvAdapter::new(&request.file, request.settings)?;
    if request.selection.is_empty() {
        return Err(ValidationError::EmptySelection.into());
    }
    if let Some(dup) = request.selection.first_duplicate() {
        return Err(ValidationError::DuplicateColumn(dup.to_string()).into());
    }
    validate_identifier(&request.table).map_err(ValidationError::from)?;

    warehouse.ping().await.map_err(TransferError::Connection)?;
    info!(database = %warehouse.database(), "Connected to warehouse");

    let csv = adapter.read_all()?;
    if csv.is_empty() {
        return Err(ValidationError::EmptyFile.into());
    }
    if let Some(missing) = request.selection.iter().find(|c| !csv.has_column(c)) {
        return Err(ValidationError::MissingSourceColumn(missing.to_string()).into());
    }
    info!(
        file = %request.file.display(),
        rows = csv.rows.len(),
        columns = csv.headers.len(),
        "Read CSV file"
    );

    let database = warehouse.database().to_string();
    let target = TableRef::new(&database, &request.table);
    let exists = warehouse.table_exists(&database, &request.table).await?;
    debug!(table = %request.table, exists, "Checked destination table");

    let (columns, mapping) = if request.create_table && !exists {
        let types = infer_column_types(&csv.headers, sample(&csv.rows, request.sample_size));
        let mapping = NameMapping::build(&request.selection)?;
        let plan = SchemaPlan::new(target.clone(), &request.selection, &types, mapping)?;

        warehouse
            .create_table(&plan.create_table())
            .await
            .map_err(|source| TransferError::Schema {
                table: request.table.clone(),
                source,
            })?;
        info!(table = %request.table, columns = plan.columns().len(), "Created table");

        (plan.columns().to_vec(), Some(plan.mapping().clone()))
    } else {
        let catalog = CatalogSnapshot::load(
            warehouse,
            &database,
            std::slice::from_ref(&request.table),
        )
        .await?;
        catalog.require_table(&request.table)?;

        let existing = catalog.columns(&request.table).unwrap_or_default();
        let columns = request
            .selection
            .iter()
            .map(|name| {
                existing
                    .iter()
                    .find(|c| c.name == name)
                    .cloned()
                    .ok_or_else(|| ValidationError::UnknownColumn {
                        table: request.table.clone(),
                        column: name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        (columns, None)
    };

    let names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
    let rows = ImportProjector::new(&names, mapping.as_ref()).project_all(&csv.rows);

    let sink = WarehouseSink::new(warehouse, target);
    let report = BatchLoader::new(request.batch_size)
        .load(&rows, &sink, cancel)
        .await?;

    info!(
        table = %request.table,
        rows = report.rows_inserted,
        batches = report.batches.len(),
        "Import finished"
    );

    Ok(ImportSummary {
        table: request.table.clone(),
        created: mapping.is_some(),
        columns,
        rows_inserted: report.rows_inserted,
        batches: report.batches,
    })
}
