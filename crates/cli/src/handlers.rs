//! One handler per subcommand. Every handler reports a `TransferOutcome`,
//! failures included.

use crate::{
    commands::{Commands, ConnArgs},
    conn,
    env::{EXPORT_DIR, EnvManager, UPLOAD_DIR},
};
use connectors::{
    file::{csv::settings::CsvSettings, storage::FileStore},
    warehouse::adapter::Warehouse,
};
use engine_processing::{
    browse,
    error::TransferError,
    export::{ExportRequest, JoinExportRequest, export_join, export_table, preview_table},
    import::{ImportRequest, import_csv},
    outcome::TransferOutcome,
};
use model::core::identifiers::Selection;
use serde_json::json;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

pub async fn execute(
    command: Commands,
    env: &EnvManager,
    cancel: &CancellationToken,
) -> TransferOutcome {
    let result = match command {
        Commands::Connect { conn } => connect(&conn, env).await,
        Commands::Tables { conn } => tables(&conn, env).await,
        Commands::Columns { conn, table } => columns(&conn, env, &table).await,
        Commands::Query { conn, sql } => query(&conn, env, &sql).await,
        Commands::Preview {
            conn,
            table,
            columns,
            limit,
        } => preview(&conn, env, &table, Selection::new(columns), limit).await,
        Commands::Export {
            conn,
            table,
            columns,
            limit,
            output,
            delimiter,
        } => {
            export(
                &conn,
                env,
                table,
                Selection::new(columns),
                limit,
                output,
                &delimiter,
            )
            .await
        }
        Commands::JoinExport {
            conn,
            tables,
            conditions,
            columns,
            limit,
            output,
            delimiter,
        } => {
            join_export(
                &conn,
                env,
                tables,
                conditions,
                Selection::new(columns),
                limit,
                output,
                &delimiter,
            )
            .await
        }
        Commands::FileColumns { file, delimiter } => file_columns(&file, &delimiter),
        Commands::FilePreview {
            file,
            delimiter,
            limit,
        } => file_preview(&file, &delimiter, limit),
        Commands::Import {
            conn,
            file,
            table,
            columns,
            create_table,
            delimiter,
            batch_size,
        } => {
            let mut request = ImportRequest::new(file, table, Selection::new(columns));
            request.create_table = create_table;
            request.batch_size = batch_size;
            import(&conn, env, request, &delimiter, cancel).await
        }
        Commands::Upload { file } => upload(&file, env),
    };

    result.unwrap_or_else(|err| {
        error!(error = %err, kind = ?err.kind(), "Operation failed");
        TransferOutcome::failure(&err)
    })
}

/// Upload and export directories: `FLATBRIDGE_UPLOAD_DIR` / `FLATBRIDGE_EXPORT_DIR`,
/// else `~/.flatbridge/{uploads,exports}`.
pub fn file_store(env: &EnvManager) -> FileStore {
    let base = dirs::home_dir()
        .unwrap_or_else(|| {
            warn!("Could not determine home directory, using the working directory");
            PathBuf::from(".")
        })
        .join(".flatbridge");

    let dir = |key: &str, name: &str| {
        env.get(key)
            .map(PathBuf::from)
            .unwrap_or_else(|| base.join(name))
    };
    FileStore::new(dir(UPLOAD_DIR, "uploads"), dir(EXPORT_DIR, "exports"))
}

fn export_target(output: Option<PathBuf>, env: &EnvManager) -> Result<PathBuf, TransferError> {
    match output {
        Some(path) => Ok(path),
        None => Ok(file_store(env).export_path()?),
    }
}

async fn connect(args: &ConnArgs, env: &EnvManager) -> Result<TransferOutcome, TransferError> {
    let warehouse = conn::connect(args, env)?;
    browse::connect(&warehouse).await?;
    Ok(TransferOutcome::ok(format!(
        "Connected to ClickHouse database '{}'",
        warehouse.database()
    )))
}

async fn tables(args: &ConnArgs, env: &EnvManager) -> Result<TransferOutcome, TransferError> {
    let warehouse = conn::connect(args, env)?;
    let tables = browse::list_tables(&warehouse).await?;
    Ok(TransferOutcome::ok(format!("Found {} tables", tables.len()))
        .with_count(tables.len())
        .with_data(&tables))
}

async fn columns(
    args: &ConnArgs,
    env: &EnvManager,
    table: &str,
) -> Result<TransferOutcome, TransferError> {
    let warehouse = conn::connect(args, env)?;
    let columns = browse::list_columns(&warehouse, table).await?;
    Ok(
        TransferOutcome::ok(format!("Found {} columns in '{table}'", columns.len()))
            .with_count(columns.len())
            .with_data(&columns),
    )
}

async fn query(
    args: &ConnArgs,
    env: &EnvManager,
    sql: &str,
) -> Result<TransferOutcome, TransferError> {
    let warehouse = conn::connect(args, env)?;
    let rows = browse::run_query(&warehouse, sql).await?;
    Ok(TransferOutcome::ok(format!("Query returned {} rows", rows.len()))
        .with_count(rows.len())
        .with_data(&rows))
}

async fn preview(
    args: &ConnArgs,
    env: &EnvManager,
    table: &str,
    selection: Selection,
    limit: u64,
) -> Result<TransferOutcome, TransferError> {
    let warehouse = conn::connect(args, env)?;
    let rows = preview_table(&warehouse, table, &selection, limit).await?;
    Ok(TransferOutcome::ok(format!("Previewing {} rows of '{table}'", rows.len()))
        .with_count(rows.len())
        .with_data(&rows))
}

async fn export(
    args: &ConnArgs,
    env: &EnvManager,
    table: String,
    selection: Selection,
    limit: Option<u64>,
    output: Option<PathBuf>,
    delimiter: &str,
) -> Result<TransferOutcome, TransferError> {
    let settings = CsvSettings::new(delimiter)?;
    let warehouse = conn::connect(args, env)?;
    let request = ExportRequest {
        table,
        selection,
        limit,
        output: export_target(output, env)?,
        settings,
    };

    let summary = export_table(&warehouse, &request).await?;
    Ok(exported(summary.rows, &summary.file_path))
}

#[allow(clippy::too_many_arguments)]
async fn join_export(
    args: &ConnArgs,
    env: &EnvManager,
    tables: Vec<String>,
    conditions: Vec<String>,
    selection: Selection,
    limit: Option<u64>,
    output: Option<PathBuf>,
    delimiter: &str,
) -> Result<TransferOutcome, TransferError> {
    let settings = CsvSettings::new(delimiter)?;
    let warehouse = conn::connect(args, env)?;
    let request = JoinExportRequest {
        tables,
        conditions,
        selection,
        limit,
        output: export_target(output, env)?,
        settings,
    };

    let summary = export_join(&warehouse, &request).await?;
    Ok(exported(summary.rows, &summary.file_path))
}

fn exported(rows: usize, path: &Path) -> TransferOutcome {
    TransferOutcome::ok(format!("Exported {rows} rows to {}", path.display()))
        .with_count(rows)
        .with_file_path(path.display().to_string())
}

fn file_columns(file: &Path, delimiter: &str) -> Result<TransferOutcome, TransferError> {
    let columns = browse::file_columns(file, CsvSettings::new(delimiter)?)?;
    Ok(TransferOutcome::ok(format!("Found {} columns", columns.len()))
        .with_count(columns.len())
        .with_data(&columns))
}

fn file_preview(file: &Path, delimiter: &str, limit: usize) -> Result<TransferOutcome, TransferError> {
    let preview = browse::file_preview(file, CsvSettings::new(delimiter)?, limit)?;
    Ok(
        TransferOutcome::ok(format!("Previewing {} rows", preview.rows.len()))
            .with_count(preview.rows.len())
            .with_data(&json!({ "headers": preview.headers, "rows": preview.rows })),
    )
}

async fn import(
    args: &ConnArgs,
    env: &EnvManager,
    mut request: ImportRequest,
    delimiter: &str,
    cancel: &CancellationToken,
) -> Result<TransferOutcome, TransferError> {
    request.settings = CsvSettings::new(delimiter)?;
    let warehouse = conn::connect(args, env)?;

    let summary = import_csv(&warehouse, &request, cancel).await?;
    Ok(TransferOutcome::ok(format!(
        "Imported {} rows into '{}'",
        summary.rows_inserted, summary.table
    ))
    .with_count(summary.rows_inserted)
    .with_data(&summary.columns)
    .with_details(json!({ "created": summary.created, "batches": summary.batches })))
}

fn upload(file: &Path, env: &EnvManager) -> Result<TransferOutcome, TransferError> {
    let stored = file_store(env).store_upload(file)?;
    Ok(TransferOutcome::ok("File uploaded").with_file_path(stored.display().to_string()))
}
