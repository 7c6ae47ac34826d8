//! Sequential, row-at-a-time insertion of projected rows.

use crate::error::LoadError;
use async_trait::async_trait;
use connectors::warehouse::{adapter::Warehouse, error::DbError};
use model::records::{
    batch::{batch_count, partition},
    row::RowData,
};
use planner::query::ast::common::TableRef;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Destination that accepts one row per call.
#[async_trait]
pub trait RowSink: Send + Sync {
    async fn insert_row(&self, row: &RowData) -> Result<(), DbError>;
}

/// Inserts into one warehouse table.
pub struct WarehouseSink<'a> {
    warehouse: &'a dyn Warehouse,
    table: TableRef,
}

impl<'a> WarehouseSink<'a> {
    pub fn new(warehouse: &'a dyn Warehouse, table: TableRef) -> Self {
        Self { warehouse, table }
    }
}

#[async_trait]
impl RowSink for WarehouseSink<'_> {
    async fn insert_row(&self, row: &RowData) -> Result<(), DbError> {
        self.warehouse
            .insert_rows(&self.table, std::slice::from_ref(row))
            .await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_inserted: usize,
    /// Size of every completed batch, in order.
    pub batches: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct BatchLoader {
    batch_size: usize,
}

impl Default for BatchLoader {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl BatchLoader {
    /// A size of zero is treated as one.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Inserts `rows` in order, stopping at the first rejected row.
    ///
    /// Rows inserted before a failure or a cancellation stay in the destination.
    /// Cancellation is checked before each batch starts.
    pub async fn load(
        &self,
        rows: &[RowData],
        sink: &dyn RowSink,
        cancel: &CancellationToken,
    ) -> Result<LoadReport, LoadError> {
        let total_batches = batch_count(rows.len(), self.batch_size);
        let mut report = LoadReport::default();

        for batch in partition(rows, self.batch_size) {
            if cancel.is_cancelled() {
                warn!(
                    batch = batch.number,
                    inserted = report.rows_inserted,
                    "Load cancelled before batch"
                );
                return Err(LoadError::Cancelled {
                    inserted: report.rows_inserted,
                });
            }

            info!(
                batch = batch.number,
                of = total_batches,
                rows = batch.len(),
                "Inserting batch"
            );

            for (index, row) in batch.rows.iter().enumerate() {
                if let Err(source) = sink.insert_row(row).await {
                    let row_number = batch.row_number(index);
                    error!(
                        batch = batch.number,
                        row = row_number,
                        inserted = report.rows_inserted,
                        error = %source,
                        "Row insert failed"
                    );
                    return Err(LoadError::Row {
                        inserted: report.rows_inserted,
                        row_number,
                        batch: batch.number,
                        row: row.clone(),
                        source,
                    });
                }
                report.rows_inserted += 1;
            }

            report.batches.push(batch.len());
            info!(
                batch = batch.number,
                total_rows = report.rows_inserted,
                "Batch inserted"
            );
        }

        Ok(report)
    }
}
