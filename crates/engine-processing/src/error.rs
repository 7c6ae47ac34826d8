use connectors::{file::csv::error::FileError, warehouse::error::DbError};
use engine_core::error::ValidationError;
use model::records::row::RowData;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to insert row {row_number} (batch {batch}) after {inserted} rows: {source}")]
    Row {
        inserted: usize,
        /// 1-based position of the row in the full row set.
        row_number: usize,
        batch: usize,
        row: RowData,
        #[source]
        source: DbError,
    },

    #[error("Load cancelled after {inserted} rows")]
    Cancelled { inserted: usize },
}

impl LoadError {
    /// Rows committed before the load stopped.
    pub fn inserted(&self) -> usize {
        match self {
            LoadError::Row { inserted, .. } | LoadError::Cancelled { inserted } => *inserted,
        }
    }
}

/// Failure classes reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Connection,
    Validation,
    Schema,
    Row,
    FileNotFound,
    Cancelled,
    Query,
    File,
}

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Failed to connect to ClickHouse: {0}")]
    Connection(#[source] DbError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to create table '{table}': {source}")]
    Schema {
        table: String,
        #[source]
        source: DbError,
    },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Query failed: {0}")]
    Query(#[source] DbError),

    #[error(transparent)]
    File(FileError),
}

impl TransferError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::Connection(_) => ErrorKind::Connection,
            TransferError::Validation(_) => ErrorKind::Validation,
            TransferError::Schema { .. } => ErrorKind::Schema,
            TransferError::Load(LoadError::Row { .. }) => ErrorKind::Row,
            TransferError::Load(LoadError::Cancelled { .. }) => ErrorKind::Cancelled,
            TransferError::FileNotFound(_) => ErrorKind::FileNotFound,
            TransferError::Query(_) => ErrorKind::Query,
            TransferError::File(FileError::InvalidDelimiter(_)) => ErrorKind::Validation,
            TransferError::File(_) => ErrorKind::File,
        }
    }

    /// Rows already written when the failure happened, if any were attempted.
    pub fn partial_count(&self) -> Option<usize> {
        match self {
            TransferError::Load(e) => Some(e.inserted()),
            _ => None,
        }
    }
}

impl From<DbError> for TransferError {
    fn from(err: DbError) -> Self {
        if err.is_connection() {
            TransferError::Connection(err)
        } else {
            TransferError::Query(err)
        }
    }
}

impl From<FileError> for TransferError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::NotFound(path) => TransferError::FileNotFound(path),
            other => TransferError::File(other),
        }
    }
}
